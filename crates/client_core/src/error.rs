use shared::error::{
    ErrorKind, ValidationError, GENERIC_SERVICE_FAILURE, INVALID_PAYLOAD, TRANSPORT_FAILURE,
};
use thiserror::Error;

/// Failure of a single stylization call. `Display` is the message shown to
/// the user.
#[derive(Debug, Error)]
pub enum StylizeError {
    #[error("{}", TRANSPORT_FAILURE)]
    Transport(#[source] reqwest::Error),
    #[error("{detail}")]
    Service { status: u16, detail: String },
    #[error("{}", GENERIC_SERVICE_FAILURE)]
    MalformedServiceResponse { status: u16 },
    #[error("{}", INVALID_PAYLOAD)]
    InvalidPayload { reason: String },
}

impl StylizeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StylizeError::Transport(_) => ErrorKind::Transport,
            StylizeError::Service { .. } | StylizeError::InvalidPayload { .. } => {
                ErrorKind::Service
            }
            StylizeError::MalformedServiceResponse { .. } => ErrorKind::MalformedServiceResponse,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            StylizeError::Service { status, .. }
            | StylizeError::MalformedServiceResponse { status } => Some(*status),
            StylizeError::Transport(err) => err.status().map(|status| status.as_u16()),
            StylizeError::InvalidPayload { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreviewError {
    #[error("preview handles exhausted (limit {limit})")]
    Exhausted { limit: usize },
}

/// Outcome of a refused file choice. `Rejected` is recoverable and shown
/// inline; `Preview` is fatal for the owning surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error(transparent)]
    Rejected(#[from] ValidationError),
    #[error(transparent)]
    Preview(#[from] PreviewError),
}

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("no stylized result to download")]
    NoResult,
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
