use std::collections::HashMap;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use shared::{
    domain::ArtifactId,
    protocol::{
        ApiReply, ConnectionReply, FileAnalysis, FileInfoReply, HealthReply,
        TerminologyMatchReply, TerminologyMatchRequest, TranslateReply, TranslateRequest,
        UploadReply,
    },
};
use tokio::sync::Mutex;

use crate::{
    transport::{TransportError, TranslatorBackend},
    validation::{FileContents, LocalFile},
    view::{Control, Field, Panel, PanelContent, Progress, SessionView, Toast},
};

#[derive(Default)]
pub struct RecordingView {
    pub fields: HashMap<Field, String>,
    pub enabled: HashMap<Control, bool>,
    pub busy_history: Vec<(Control, bool)>,
    pub progress: HashMap<Progress, bool>,
    pub panels: HashMap<Panel, PanelContent>,
    pub toasts: Vec<Toast>,
    pub key_masked: Option<bool>,
    pub saved: Vec<(String, Vec<u8>)>,
    pub fail_saves: bool,
}

impl RecordingView {
    pub fn with_key(api_key: &str) -> Self {
        let mut view = Self::default();
        view.fields.insert(Field::ApiKey, api_key.to_string());
        view
    }

    pub fn is_enabled(&self, control: Control) -> bool {
        self.enabled.get(&control).copied().unwrap_or(false)
    }

    pub fn is_busy(&self, control: Control) -> bool {
        self.busy_history
            .iter()
            .rev()
            .find(|(recorded, _)| *recorded == control)
            .is_some_and(|(_, busy)| *busy)
    }

    pub fn progress_visible(&self, progress: Progress) -> bool {
        self.progress.get(&progress).copied().unwrap_or(false)
    }

    pub fn last_toast(&self) -> &Toast {
        self.toasts.last().expect("at least one toast")
    }
}

impl SessionView for RecordingView {
    fn field(&self, field: Field) -> String {
        self.fields.get(&field).cloned().unwrap_or_default()
    }

    fn set_field(&mut self, field: Field, value: &str) {
        self.fields.insert(field, value.to_string());
    }

    fn set_enabled(&mut self, control: Control, enabled: bool) {
        self.enabled.insert(control, enabled);
    }

    fn set_busy(&mut self, control: Control, busy: bool) {
        self.busy_history.push((control, busy));
    }

    fn set_progress(&mut self, progress: Progress, visible: bool) {
        self.progress.insert(progress, visible);
    }

    fn show(&mut self, content: PanelContent) {
        self.panels.insert(content.panel(), content);
    }

    fn hide(&mut self, panel: Panel) {
        self.panels.remove(&panel);
    }

    fn notify(&mut self, toast: Toast) {
        self.toasts.push(toast);
    }

    fn set_key_masked(&mut self, masked: bool) {
        self.key_masked = Some(masked);
    }

    fn save_artifact(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        if self.fail_saves {
            return Err(anyhow!("disk full"));
        }
        self.saved.push((name.to_string(), bytes.to_vec()));
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub enum Scripted<T> {
    Accept(T),
    Reject(String),
    Status(StatusCode),
}

impl<T: Clone> Scripted<T> {
    fn play(&self) -> Result<ApiReply<T>, TransportError> {
        match self {
            Self::Accept(body) => Ok(ApiReply::Accepted(body.clone())),
            Self::Reject(message) => Ok(ApiReply::Rejected(message.clone())),
            Self::Status(status) => Err(TransportError::Status(*status)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    TestConnection {
        api_key: String,
    },
    Upload {
        name: String,
    },
    FileInfo(ArtifactId),
    TerminologyMatch {
        api_key: String,
        filename: ArtifactId,
    },
    Translate {
        api_key: String,
        filename: ArtifactId,
        keywords: String,
    },
    Download(ArtifactId),
    Health,
}

pub const UPLOADED: &str = "abc123.xlsx";
pub const TERMINOLOGY_DOWNLOAD: &str = "abc123_terminology_matched.xlsx";
pub const TERMINOLOGY_INPUT: &str = "abc123_terminology_input.xlsx";
pub const TRANSLATED: &str = "abc123_translated.xlsx";

pub struct ScriptedBackend {
    pub connection: Scripted<ConnectionReply>,
    pub upload: Scripted<UploadReply>,
    pub file_info: Scripted<FileInfoReply>,
    pub terminology: Scripted<TerminologyMatchReply>,
    pub translation: Scripted<TranslateReply>,
    pub health: Scripted<HealthReply>,
    pub download: Result<Vec<u8>, StatusCode>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedBackend {
    pub fn happy() -> Self {
        Self {
            connection: Scripted::Accept(ConnectionReply {
                message: "API connection succeeded".into(),
            }),
            upload: Scripted::Accept(UploadReply {
                filename: ArtifactId::new(UPLOADED),
                original_name: "report.xlsx".into(),
                size: 500 * 1024,
            }),
            file_info: Scripted::Accept(FileInfoReply {
                info: FileAnalysis::Stats {
                    total_sheets: 2,
                    target_script_cells: 37,
                    sheets: vec!["Summary".into(), "Detail".into()],
                },
            }),
            terminology: Scripted::Accept(TerminologyMatchReply {
                download_filename: ArtifactId::new(TERMINOLOGY_DOWNLOAD),
                matched_filename: ArtifactId::new(TERMINOLOGY_INPUT),
                replacement_count: 12,
                file_size: 2048,
            }),
            translation: Scripted::Accept(TranslateReply {
                download_filename: ArtifactId::new(TRANSLATED),
                output_size: 510000,
            }),
            health: Scripted::Accept(HealthReply {
                status: "healthy".into(),
                timestamp: 0.0,
            }),
            download: Ok(b"translated-workbook".to_vec()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub async fn calls(&self) -> Vec<Call> {
        self.calls.lock().await.clone()
    }

    async fn record(&self, call: Call) {
        self.calls.lock().await.push(call);
    }
}

#[async_trait]
impl TranslatorBackend for ScriptedBackend {
    async fn test_connection(
        &self,
        api_key: &str,
    ) -> Result<ApiReply<ConnectionReply>, TransportError> {
        self.record(Call::TestConnection {
            api_key: api_key.to_string(),
        })
        .await;
        self.connection.play()
    }

    async fn upload(&self, file: &LocalFile) -> Result<ApiReply<UploadReply>, TransportError> {
        self.record(Call::Upload {
            name: file.name.clone(),
        })
        .await;
        self.upload.play()
    }

    async fn file_info(
        &self,
        filename: &ArtifactId,
    ) -> Result<ApiReply<FileInfoReply>, TransportError> {
        self.record(Call::FileInfo(filename.clone())).await;
        self.file_info.play()
    }

    async fn terminology_match(
        &self,
        request: &TerminologyMatchRequest,
    ) -> Result<ApiReply<TerminologyMatchReply>, TransportError> {
        self.record(Call::TerminologyMatch {
            api_key: request.api_key.clone(),
            filename: request.filename.clone(),
        })
        .await;
        self.terminology.play()
    }

    async fn translate(
        &self,
        request: &TranslateRequest,
    ) -> Result<ApiReply<TranslateReply>, TransportError> {
        self.record(Call::Translate {
            api_key: request.api_key.clone(),
            filename: request.filename.clone(),
            keywords: request.keywords.clone(),
        })
        .await;
        self.translation.play()
    }

    async fn download(&self, filename: &ArtifactId) -> Result<Vec<u8>, TransportError> {
        self.record(Call::Download(filename.clone())).await;
        self.download.clone().map_err(TransportError::Status)
    }

    async fn health(&self) -> Result<HealthReply, TransportError> {
        self.record(Call::Health).await;
        self.health.play()?.into_result().map_err(|_| {
            TransportError::Status(StatusCode::SERVICE_UNAVAILABLE)
        })
    }
}

/// A workbook descriptor whose declared size need not match its contents.
pub fn workbook(name: &str, size: u64) -> LocalFile {
    LocalFile {
        name: name.to_string(),
        mime_type: None,
        size,
        contents: FileContents::Memory(Vec::new()),
    }
}
