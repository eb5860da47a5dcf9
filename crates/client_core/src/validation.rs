use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::error::ValidationError;

pub const MAX_UPLOAD_BYTES: u64 = 16 * 1024 * 1024;
pub const ACCEPTED_EXTENSIONS: [&str; 2] = [".xlsx", ".xls"];
pub const ACCEPTED_MIME_TYPES: [&str; 2] = [
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-excel",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContents {
    Memory(Vec<u8>),
    /// Read only once the file has passed validation.
    Path(PathBuf),
}

/// A workbook picked on the local machine, not yet sent anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    pub name: String,
    pub mime_type: Option<String>,
    pub size: u64,
    pub contents: FileContents,
}

impl LocalFile {
    pub fn in_memory(name: impl Into<String>, mime_type: Option<&str>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.map(str::to_string),
            size: bytes.len() as u64,
            contents: FileContents::Memory(bytes),
        }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path)
            .await
            .with_context(|| format!("failed to stat '{}'", path.display()))?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .with_context(|| format!("'{}' does not name a file", path.display()))?;
        let mime_type = mime_guess::from_path(path)
            .first()
            .map(|mime| mime.essence_str().to_string());

        Ok(Self {
            name,
            mime_type,
            size: metadata.len(),
            contents: FileContents::Path(path.to_path_buf()),
        })
    }

    pub async fn read_bytes(&self) -> std::io::Result<Vec<u8>> {
        match &self.contents {
            FileContents::Memory(bytes) => Ok(bytes.clone()),
            FileContents::Path(path) => tokio::fs::read(path).await,
        }
    }
}

fn has_accepted_extension(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    ACCEPTED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

fn has_accepted_mime(mime_type: Option<&str>) -> bool {
    mime_type.is_some_and(|mime| ACCEPTED_MIME_TYPES.contains(&mime))
}

/// Type first, then size; a file passes the type rule on MIME or extension.
pub fn validate_upload(file: &LocalFile) -> Result<(), ValidationError> {
    if !has_accepted_mime(file.mime_type.as_deref()) && !has_accepted_extension(&file.name) {
        return Err(ValidationError::UnsupportedFileType {
            name: file.name.clone(),
        });
    }

    if file.size > MAX_UPLOAD_BYTES {
        return Err(ValidationError::FileTooLarge {
            size: file.size,
            limit: MAX_UPLOAD_BYTES,
        });
    }

    Ok(())
}

/// Server-chosen artifact names end up as local file names, so they must be a
/// single path component.
pub fn artifact_file_name(name: &str) -> Result<&str, ValidationError> {
    let single_component = Path::new(name).file_name().is_some_and(|last| last == name);
    if !single_component || name.contains(['/', '\\', '\0']) {
        return Err(ValidationError::UnsafeArtifactName {
            name: name.to_string(),
        });
    }
    Ok(name)
}
