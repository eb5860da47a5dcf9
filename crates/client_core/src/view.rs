//! View binding: everything the controller reads from or renders to the UI.

use anyhow::Result;
use shared::{domain::ArtifactId, protocol::FileAnalysis};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    ApiKey,
    FileInput,
    Keywords,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    TestConnection,
    TerminologyMatch,
    StartTranslation,
    TranslateAfterTerminology,
    DownloadResult,
    DownloadTerminology,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    ConnectionStatus,
    FileInfo,
    TerminologyResult,
    TranslationResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Progress {
    Terminology,
    Translation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub title: String,
    pub message: String,
}

impl Toast {
    pub fn new(kind: ToastKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(ToastKind::Success, "Success", message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ToastKind::Error, "Error", message)
    }

    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ToastKind::Info, title, message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connected(String),
    Failed(String),
}

/// Inspection result shown under the upload; `None` when inspection failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDetails {
    pub original_name: String,
    pub size: u64,
    pub analysis: Option<FileAnalysis>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminologySummary {
    pub download_filename: ArtifactId,
    pub replacement_count: u64,
    pub file_size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationSummary {
    pub source_name: Option<String>,
    pub download_filename: ArtifactId,
    pub output_size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelContent {
    ConnectionStatus(ConnectionStatus),
    FileInfo(FileDetails),
    TerminologyResult(TerminologySummary),
    TranslationResult(TranslationSummary),
}

impl PanelContent {
    pub fn panel(&self) -> Panel {
        match self {
            Self::ConnectionStatus(_) => Panel::ConnectionStatus,
            Self::FileInfo(_) => Panel::FileInfo,
            Self::TerminologyResult(_) => Panel::TerminologyResult,
            Self::TranslationResult(_) => Panel::TranslationResult,
        }
    }
}

pub trait SessionView {
    fn field(&self, field: Field) -> String;
    fn set_field(&mut self, field: Field, value: &str);
    fn set_enabled(&mut self, control: Control, enabled: bool);
    fn set_busy(&mut self, control: Control, busy: bool);
    fn set_progress(&mut self, progress: Progress, visible: bool);
    fn show(&mut self, content: PanelContent);
    fn hide(&mut self, panel: Panel);
    fn notify(&mut self, toast: Toast);
    fn set_key_masked(&mut self, masked: bool);
    /// Persists a downloaded artifact wherever this front end keeps files.
    fn save_artifact(&mut self, name: &str, bytes: &[u8]) -> Result<()>;

    fn clear_field(&mut self, field: Field) {
        self.set_field(field, "");
    }
}
