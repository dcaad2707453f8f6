//! File candidates and the validated upload selection built from them.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use shared::{
    domain::{ImageMime, MAX_UPLOAD_BYTES},
    error::ValidationError,
};

#[derive(Debug, Clone)]
enum CandidateSource {
    Memory(Arc<[u8]>),
    Disk(PathBuf),
}

/// A file the user picked but that has not been validated yet. Only its
/// declared name, type and size are known up front; disk contents are read
/// after the cheap checks pass.
#[derive(Debug, Clone)]
pub struct FileCandidate {
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    source: CandidateSource,
}

impl FileCandidate {
    pub fn in_memory(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        let bytes = bytes.into();
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            size_bytes: bytes.len() as u64,
            source: CandidateSource::Memory(bytes),
        }
    }

    /// Stats `path` without reading it. The type is guessed from the extension.
    pub fn open(path: &Path) -> std::io::Result<Self> {
        let metadata = fs::metadata(path)?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload")
            .to_string();
        let mime_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Ok(Self {
            file_name,
            mime_type,
            size_bytes: metadata.len(),
            source: CandidateSource::Disk(path.to_path_buf()),
        })
    }

    /// Size is checked before type, matching what the user sees first.
    pub fn validate(&self) -> Result<ImageMime, ValidationError> {
        if self.size_bytes > MAX_UPLOAD_BYTES {
            return Err(ValidationError::FileTooLarge {
                size_bytes: self.size_bytes,
            });
        }
        ImageMime::from_mime_str(&self.mime_type).ok_or_else(|| ValidationError::UnsupportedType {
            mime_type: self.mime_type.clone(),
        })
    }

    /// Validates and loads the candidate into an owned selection.
    pub fn into_selection(self) -> Result<UploadSelection, ValidationError> {
        let mime = self.validate()?;
        let bytes = match self.source {
            CandidateSource::Memory(bytes) => bytes,
            CandidateSource::Disk(path) => {
                let bytes = fs::read(&path).map_err(|err| ValidationError::Unreadable {
                    reason: format!("{}: {err}", path.display()),
                })?;
                if bytes.len() as u64 > MAX_UPLOAD_BYTES {
                    return Err(ValidationError::FileTooLarge {
                        size_bytes: bytes.len() as u64,
                    });
                }
                Arc::from(bytes)
            }
        };

        Ok(UploadSelection {
            file_name: self.file_name,
            mime,
            bytes,
        })
    }
}

/// A validated image, replaced wholesale on every new choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSelection {
    pub file_name: String,
    pub mime: ImageMime,
    pub bytes: Arc<[u8]>,
}

impl UploadSelection {
    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }
}
