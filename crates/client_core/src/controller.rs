//! Orchestration of the upload, configure, submit and result flow.
//!
//! [`StudioController`] owns the single [`RequestState`], the current upload
//! selection and its preview. It never awaits: [`StudioController::submit`]
//! hands out a [`StylizeJob`] tagged with a [`RequestTicket`], and the outcome
//! is fed back through [`StudioController::resolve`], which drops anything
//! that no longer matches the in-flight ticket.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use shared::{
    domain::{clamp_to, StyleId, StyleParameters, GUIDANCE_SCALE_RANGE, STRENGTH_RANGE},
    error::ValidationError,
    presets::{self, Preset},
};
use tracing::{debug, info, warn};

use crate::{
    client::{ResultImage, StylizeRequest, Stylizer},
    download,
    error::{DownloadError, SelectionError, StylizeError},
    preview::{PreviewId, PreviewManager, PreviewStore},
    upload::{FileCandidate, UploadSelection},
};

/// Identifies one submit and the selection it was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestTicket {
    pub request_id: u64,
    pub selection_generation: u64,
}

#[derive(Debug)]
pub enum RequestState {
    Idle {
        error: Option<ValidationError>,
    },
    Validating,
    InFlight {
        ticket: RequestTicket,
        started_file: Arc<UploadSelection>,
        started_parameters: StyleParameters,
    },
    Succeeded {
        result: ResultImage,
    },
    Failed {
        message: String,
    },
}

impl RequestState {
    fn name(&self) -> &'static str {
        match self {
            RequestState::Idle { .. } => "idle",
            RequestState::Validating => "validating",
            RequestState::InFlight { .. } => "in_flight",
            RequestState::Succeeded { .. } => "succeeded",
            RequestState::Failed { .. } => "failed",
        }
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self, RequestState::InFlight { .. })
    }

    pub fn error_message(&self) -> Option<String> {
        match self {
            RequestState::Idle { error: Some(err) } => Some(err.to_string()),
            RequestState::Failed { message } => Some(message.clone()),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&ResultImage> {
        match self {
            RequestState::Succeeded { result } => Some(result),
            _ => None,
        }
    }
}

pub struct StylizeJob {
    pub ticket: RequestTicket,
    pub request: StylizeRequest,
}

impl StylizeJob {
    pub async fn run(self, stylizer: &dyn Stylizer) -> JobOutcome {
        let result = stylizer.stylize(self.request).await;
        JobOutcome {
            ticket: self.ticket,
            result,
        }
    }
}

#[derive(Debug)]
pub struct JobOutcome {
    pub ticket: RequestTicket,
    pub result: Result<ResultImage, StylizeError>,
}

/// Snapshot the presentation layer renders from.
#[derive(Debug)]
pub struct ViewState<'a> {
    pub preview: Option<&'a PreviewId>,
    pub file_name: Option<&'a str>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub result: Option<&'a ResultImage>,
    pub can_submit: bool,
    pub can_download: bool,
    pub upload_enabled: bool,
    pub active_preset: &'static Preset,
    pub parameters: &'a StyleParameters,
}

pub struct StudioController {
    state: RequestState,
    selection: Option<Arc<UploadSelection>>,
    selection_generation: u64,
    next_request_id: u64,
    parameters: StyleParameters,
    preview: PreviewManager,
}

impl StudioController {
    pub fn new(preview_store: Arc<dyn PreviewStore>) -> Self {
        Self {
            state: RequestState::Idle { error: None },
            selection: None,
            selection_generation: 0,
            next_request_id: 0,
            parameters: StyleParameters::default(),
            preview: PreviewManager::new(preview_store),
        }
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn selection(&self) -> Option<&UploadSelection> {
        self.selection.as_deref()
    }

    pub fn parameters(&self) -> &StyleParameters {
        &self.parameters
    }

    pub fn preview(&self) -> Option<&PreviewId> {
        self.preview.current()
    }

    /// Handles a file choice. Size and type are checked here; `None` clears
    /// the selection. A valid choice replaces the selection wholesale, clears
    /// any result or error and supersedes an in-flight request.
    ///
    /// `SelectionError::Preview` means the preview store is exhausted and is
    /// not recoverable by the user.
    pub fn choose_file(&mut self, candidate: Option<FileCandidate>) -> Result<(), SelectionError> {
        let Some(candidate) = candidate else {
            self.clear_selection();
            return Ok(());
        };

        let selection = match candidate.into_selection() {
            Ok(selection) => selection,
            Err(err) => {
                info!(kind = ?err.kind(), error = %err, "controller: file rejected");
                // Rejections never disturb a request that is already out.
                if !self.state.is_in_flight() {
                    self.transition(RequestState::Idle {
                        error: Some(err.clone()),
                    });
                }
                return Err(err.into());
            }
        };

        self.preview.set_selection(Some(&selection))?;
        if self.state.is_in_flight() {
            debug!("controller: new selection supersedes in-flight request");
        }
        info!(
            file = %selection.file_name,
            mime = %selection.mime,
            size_bytes = selection.size_bytes(),
            "controller: file selected"
        );
        self.selection = Some(Arc::new(selection));
        self.selection_generation += 1;
        self.transition(RequestState::Idle { error: None });
        Ok(())
    }

    fn clear_selection(&mut self) {
        self.preview.dispose();
        self.selection = None;
        self.selection_generation += 1;
        if self.state.is_in_flight() {
            self.transition(RequestState::Idle { error: None });
        }
    }

    pub fn set_style(&mut self, style: StyleId) {
        self.parameters.style = style;
    }

    /// Non-finite values are ignored; others are clamped into range.
    pub fn set_strength(&mut self, strength: f64) {
        if strength.is_finite() {
            self.parameters.strength = clamp_to(&STRENGTH_RANGE, strength);
        }
    }

    pub fn set_guidance_scale(&mut self, guidance_scale: f64) {
        if guidance_scale.is_finite() {
            self.parameters.guidance_scale = clamp_to(&GUIDANCE_SCALE_RANGE, guidance_scale);
        }
    }

    pub fn set_seed(&mut self, seed: Option<u64>) {
        self.parameters.seed = seed;
    }

    /// Starts a request for the current selection and parameters. Returns
    /// `None` when a request is already in flight or no file is selected.
    pub fn submit(&mut self) -> Option<StylizeJob> {
        if self.state.is_in_flight() {
            debug!("controller: submit ignored while a request is in flight");
            return None;
        }

        self.transition(RequestState::Validating);
        let Some(selection) = self.selection.clone() else {
            self.transition(RequestState::Idle {
                error: Some(ValidationError::MissingFile),
            });
            return None;
        };

        self.next_request_id += 1;
        let ticket = RequestTicket {
            request_id: self.next_request_id,
            selection_generation: self.selection_generation,
        };
        let parameters = self.parameters.clone();
        info!(
            request_id = ticket.request_id,
            style = %parameters.style,
            strength = parameters.strength,
            guidance_scale = parameters.guidance_scale,
            "controller: submitting"
        );
        self.transition(RequestState::InFlight {
            ticket,
            started_file: Arc::clone(&selection),
            started_parameters: parameters.clone(),
        });

        Some(StylizeJob {
            ticket,
            request: StylizeRequest {
                image: selection,
                parameters,
            },
        })
    }

    /// Applies a finished job. Returns `false` when the outcome is stale and
    /// was discarded.
    pub fn resolve(&mut self, outcome: JobOutcome) -> bool {
        let current = match &self.state {
            RequestState::InFlight { ticket, .. } => Some(*ticket),
            _ => None,
        };
        if current != Some(outcome.ticket)
            || outcome.ticket.selection_generation != self.selection_generation
        {
            debug!(
                request_id = outcome.ticket.request_id,
                "controller: discarding stale response"
            );
            return false;
        }

        match outcome.result {
            Ok(result) => {
                info!(
                    request_id = outcome.ticket.request_id,
                    size_bytes = result.bytes().len(),
                    "controller: stylization succeeded"
                );
                self.transition(RequestState::Succeeded { result });
            }
            Err(err) => {
                warn!(
                    request_id = outcome.ticket.request_id,
                    kind = ?err.kind(),
                    error = %err,
                    "controller: stylization failed"
                );
                self.transition(RequestState::Failed {
                    message: err.to_string(),
                });
            }
        }
        true
    }

    /// Writes the held result as `<style>-art.png` into `dir`.
    pub fn download(&self, dir: &Path) -> Result<PathBuf, DownloadError> {
        let result = self.state.result().ok_or(DownloadError::NoResult)?;
        download::save_result(dir, self.parameters.style, result)
    }

    /// Drops the selection, its preview and any result or error.
    pub fn reset(&mut self) {
        self.preview.dispose();
        self.selection = None;
        self.selection_generation += 1;
        self.transition(RequestState::Idle { error: None });
    }

    pub fn view(&self) -> ViewState<'_> {
        let is_loading = self.state.is_in_flight();
        let result = self.state.result();
        ViewState {
            preview: self.preview.current(),
            file_name: self.selection.as_deref().map(|s| s.file_name.as_str()),
            is_loading,
            error: self.state.error_message(),
            result,
            can_submit: !is_loading,
            can_download: result.is_some() && !is_loading,
            upload_enabled: !is_loading,
            active_preset: presets::preset(self.parameters.style),
            parameters: &self.parameters,
        }
    }

    fn transition(&mut self, next: RequestState) {
        debug!(
            from = self.state.name(),
            to = next.name(),
            "controller: transition"
        );
        self.state = next;
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
