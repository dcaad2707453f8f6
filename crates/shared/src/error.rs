use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shown when the backend fails without a usable message.
pub const GENERIC_SERVICE_FAILURE: &str = "Backend failed to stylize the image.";
pub const TRANSPORT_FAILURE: &str = "Could not reach the stylization backend.";
pub const INVALID_PAYLOAD: &str = "Backend returned an unreadable image.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Transport,
    Service,
    MalformedServiceResponse,
}

/// Input problems caught locally, before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Max file size is 10 MB.")]
    FileTooLarge { size_bytes: u64 },
    #[error("Only PNG and JPEG images are supported.")]
    UnsupportedType { mime_type: String },
    #[error("Please upload an image first.")]
    MissingFile,
    #[error("Could not read the selected file.")]
    Unreadable { reason: String },
}

impl ValidationError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_carry_user_messages() {
        let too_large = ValidationError::FileTooLarge {
            size_bytes: 11 * 1024 * 1024,
        };
        assert_eq!(too_large.to_string(), "Max file size is 10 MB.");
        assert_eq!(too_large.kind(), ErrorKind::Validation);
        assert_eq!(
            ValidationError::MissingFile.to_string(),
            "Please upload an image first."
        );
    }
}
