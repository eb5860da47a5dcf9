//! HTTP access to the translation server.

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, Response, StatusCode,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::{
    domain::ArtifactId,
    error::ReplyDecodeError,
    protocol::{
        ApiReply, ConnectionReply, FileInfoReply, HealthReply, TerminologyMatchReply,
        TerminologyMatchRequest, TestConnectionRequest, TranslateReply, TranslateRequest,
        UploadReply,
    },
};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::validation::LocalFile;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned HTTP {0}")]
    Status(StatusCode),
    #[error("unexpected response: {0}")]
    Decode(#[from] ReplyDecodeError),
    #[error("failed to read {name}: {source}")]
    Io {
        name: String,
        source: std::io::Error,
    },
    #[error("invalid server url: {0}")]
    InvalidUrl(String),
}

/// The remote operations one session can issue; each call is a single round trip.
#[async_trait]
pub trait TranslatorBackend: Send + Sync {
    async fn test_connection(
        &self,
        api_key: &str,
    ) -> Result<ApiReply<ConnectionReply>, TransportError>;
    async fn upload(&self, file: &LocalFile) -> Result<ApiReply<UploadReply>, TransportError>;
    async fn file_info(
        &self,
        filename: &ArtifactId,
    ) -> Result<ApiReply<FileInfoReply>, TransportError>;
    async fn terminology_match(
        &self,
        request: &TerminologyMatchRequest,
    ) -> Result<ApiReply<TerminologyMatchReply>, TransportError>;
    async fn translate(
        &self,
        request: &TranslateRequest,
    ) -> Result<ApiReply<TranslateReply>, TransportError>;
    async fn download(&self, filename: &ArtifactId) -> Result<Vec<u8>, TransportError>;
    async fn health(&self) -> Result<HealthReply, TransportError>;
}

pub struct HttpBackend {
    http: Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(server_url: &str) -> Result<Self, TransportError> {
        Self::with_client(Client::new(), server_url)
    }

    pub fn with_client(http: Client, server_url: &str) -> Result<Self, TransportError> {
        let base_url = Url::parse(server_url)
            .map_err(|e| TransportError::InvalidUrl(format!("{server_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(TransportError::InvalidUrl(server_url.to_string()));
        }
        Ok(Self { http, base_url })
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, TransportError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| TransportError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // The server answers `{success:false}` with 4xx/5xx too, so the body wins over the status.
    async fn decode_reply<T: DeserializeOwned>(
        response: Response,
    ) -> Result<ApiReply<T>, TransportError> {
        let status = response.status();
        let body = response.bytes().await?;
        match serde_json::from_slice::<Value>(&body) {
            Ok(value) => Ok(ApiReply::from_value(value)?),
            Err(_) if !status.is_success() => Err(TransportError::Status(status)),
            Err(err) => Err(ReplyDecodeError::Payload(err).into()),
        }
    }
}

#[async_trait]
impl TranslatorBackend for HttpBackend {
    async fn test_connection(
        &self,
        api_key: &str,
    ) -> Result<ApiReply<ConnectionReply>, TransportError> {
        let url = self.endpoint(&["api", "test-connection"])?;
        debug!(%url, "POST test-connection");
        let response = self
            .http
            .post(url)
            .json(&TestConnectionRequest {
                api_key: api_key.to_string(),
            })
            .send()
            .await?;
        Self::decode_reply(response).await
    }

    async fn upload(&self, file: &LocalFile) -> Result<ApiReply<UploadReply>, TransportError> {
        let url = self.endpoint(&["api", "upload"])?;
        let bytes = file
            .read_bytes()
            .await
            .map_err(|source| TransportError::Io {
                name: file.name.clone(),
                source,
            })?;

        let mut part = Part::bytes(bytes).file_name(file.name.clone());
        if let Some(mime_type) = &file.mime_type {
            part = part.mime_str(mime_type)?;
        }

        debug!(%url, name = %file.name, size = file.size, "POST upload");
        let response = self
            .http
            .post(url)
            .multipart(Form::new().part("file", part))
            .send()
            .await?;
        Self::decode_reply(response).await
    }

    async fn file_info(
        &self,
        filename: &ArtifactId,
    ) -> Result<ApiReply<FileInfoReply>, TransportError> {
        let url = self.endpoint(&["api", "file-info", filename.as_str()])?;
        debug!(%url, "GET file-info");
        let response = self.http.get(url).send().await?;
        Self::decode_reply(response).await
    }

    async fn terminology_match(
        &self,
        request: &TerminologyMatchRequest,
    ) -> Result<ApiReply<TerminologyMatchReply>, TransportError> {
        let url = self.endpoint(&["api", "terminology-match"])?;
        debug!(%url, filename = %request.filename, "POST terminology-match");
        let response = self.http.post(url).json(request).send().await?;
        Self::decode_reply(response).await
    }

    async fn translate(
        &self,
        request: &TranslateRequest,
    ) -> Result<ApiReply<TranslateReply>, TransportError> {
        let url = self.endpoint(&["api", "translate"])?;
        debug!(%url, filename = %request.filename, "POST translate");
        let response = self.http.post(url).json(request).send().await?;
        Self::decode_reply(response).await
    }

    async fn download(&self, filename: &ArtifactId) -> Result<Vec<u8>, TransportError> {
        let url = self.endpoint(&["api", "download", filename.as_str()])?;
        debug!(%url, "GET download");
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status));
        }
        Ok(response.bytes().await?.to_vec())
    }

    async fn health(&self) -> Result<HealthReply, TransportError> {
        let url = self.endpoint(&["health"])?;
        let reply = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(reply)
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
