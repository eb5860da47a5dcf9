use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::{domain::ArtifactId, error::ReplyDecodeError};

const UNSPECIFIED_REJECTION: &str = "request was rejected by the server";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestConnectionRequest {
    pub api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerminologyMatchRequest {
    pub api_key: String,
    pub filename: ArtifactId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateRequest {
    pub api_key: String,
    pub filename: ArtifactId,
    #[serde(default)]
    pub keywords: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionReply {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReply {
    pub filename: ArtifactId,
    pub original_name: String,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileInfoReply {
    pub info: FileAnalysis,
}

/// Workbook statistics computed server-side, or the reason they could not be.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileAnalysis {
    Unavailable {
        error: String,
    },
    Stats {
        total_sheets: u32,
        #[serde(rename = "chinese_cells")]
        target_script_cells: u64,
        #[serde(default)]
        sheets: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminologyMatchReply {
    pub download_filename: ArtifactId,
    pub matched_filename: ArtifactId,
    pub replacement_count: u64,
    #[serde(default)]
    pub file_size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslateReply {
    pub download_filename: ArtifactId,
    pub output_size: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReply {
    pub status: String,
    #[serde(default)]
    pub timestamp: f64,
}

/// Outcome of a JSON endpoint that reports `{success, message, ...}`.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiReply<T> {
    Accepted(T),
    Rejected(String),
}

impl<T: DeserializeOwned> ApiReply<T> {
    pub fn from_value(value: Value) -> Result<Self, ReplyDecodeError> {
        let success = value
            .get("success")
            .and_then(Value::as_bool)
            .ok_or(ReplyDecodeError::MissingSuccessFlag)?;

        if success {
            return Ok(Self::Accepted(serde_json::from_value(value)?));
        }

        let message = value
            .get("message")
            .and_then(Value::as_str)
            .filter(|message| !message.trim().is_empty())
            .unwrap_or(UNSPECIFIED_REJECTION)
            .to_string();
        Ok(Self::Rejected(message))
    }
}

impl<T> ApiReply<T> {
    pub fn into_result(self) -> Result<T, String> {
        match self {
            Self::Accepted(body) => Ok(body),
            Self::Rejected(message) => Err(message),
        }
    }
}
