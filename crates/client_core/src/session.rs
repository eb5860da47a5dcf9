use shared::domain::ArtifactId;

/// The local workbook the user picked, kept for display only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub size: u64,
}

/// Ephemeral state of one translation workflow.
///
/// Every artifact slot starts empty and is only filled by a successful server
/// reply; [`Session::clear`] returns all of them to empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Last key the server accepted. Cached only, never re-sent on its own.
    pub api_key: String,
    pub uploaded_file: Option<UploadedFile>,
    pub current_filename: Option<ArtifactId>,
    pub download_filename: Option<ArtifactId>,
    pub terminology_download_filename: Option<ArtifactId>,
    /// Terminology output staged as the input of a follow-up translation.
    pub terminology_matched_filename: Option<ArtifactId>,
    pub key_visible: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn has_upload(&self) -> bool {
        self.current_filename.is_some()
    }

    /// Drops every artifact derived from a previous upload.
    pub(crate) fn forget_derived_artifacts(&mut self) {
        self.download_filename = None;
        self.terminology_download_filename = None;
        self.terminology_matched_filename = None;
    }
}

/// Whether the match and translate actions may run.
pub fn is_ready(api_key_field: &str, session: &Session) -> bool {
    !api_key_field.trim().is_empty() && session.has_upload()
}
