//! Client core for the style studio: preview lifecycle, upload validation,
//! the stylization HTTP client and the orchestration controller that ties
//! them together.

pub mod client;
pub mod config;
pub mod controller;
pub mod download;
pub mod error;
pub mod preview;
pub mod runtime;
pub mod upload;

pub use client::{ResultImage, StylizationClient, StylizeRequest, Stylizer};
pub use config::{load_settings, ClientSettings};
pub use controller::{
    JobOutcome, RequestState, RequestTicket, StudioController, StylizeJob, ViewState,
};
pub use error::{DownloadError, PreviewError, SelectionError, StylizeError};
pub use preview::{ObjectUrlStore, PreviewHandle, PreviewId, PreviewManager, PreviewStore};
pub use runtime::StylizeDispatcher;
pub use upload::{FileCandidate, UploadSelection};
