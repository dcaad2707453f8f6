use std::{sync::Arc, time::Duration};

use anyhow::Context;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{
    multipart::{Form, Part},
    Client, Response, StatusCode,
};
use shared::{
    domain::{format_decimal, StyleParameters},
    protocol::{fields, ErrorResponse, HealthResponse, StylizeResponse},
};
use tracing::{info, warn};

use crate::{config::ClientSettings, error::StylizeError, upload::UploadSelection};

const DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Immutable snapshot of what gets sent for one stylization attempt.
#[derive(Debug, Clone)]
pub struct StylizeRequest {
    pub image: Arc<UploadSelection>,
    pub parameters: StyleParameters,
}

/// Decoded PNG returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultImage {
    png: Vec<u8>,
}

impl ResultImage {
    pub fn from_png_bytes(png: Vec<u8>) -> Self {
        Self { png }
    }

    pub fn from_base64(payload: &str) -> Result<Self, StylizeError> {
        let png = STANDARD
            .decode(payload.trim())
            .map_err(|err| StylizeError::InvalidPayload {
                reason: format!("image_base64 is not valid base64: {err}"),
            })?;
        if png.is_empty() {
            return Err(StylizeError::InvalidPayload {
                reason: "image_base64 is empty".to_string(),
            });
        }
        Ok(Self { png })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.png
    }

    pub fn data_uri(&self) -> String {
        format!("{DATA_URI_PREFIX}{}", STANDARD.encode(&self.png))
    }
}

/// One remote stylization attempt: no retries, no re-validation of input.
#[async_trait]
pub trait Stylizer: Send + Sync {
    async fn stylize(&self, request: StylizeRequest) -> Result<ResultImage, StylizeError>;
}

pub struct StylizationClient {
    http: Client,
    base_url: String,
}

impl StylizationClient {
    pub fn new(settings: &ClientSettings) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if settings.request_timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(settings.request_timeout_secs));
        }
        let http = builder.build().context("failed to build http client")?;

        Ok(Self {
            http,
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn health(&self) -> Result<HealthResponse, StylizeError> {
        let response = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .map_err(StylizeError::Transport)?;
        let body = read_success_body(response).await?;
        serde_json::from_slice(&body).map_err(|err| StylizeError::InvalidPayload {
            reason: format!("health body: {err}"),
        })
    }

    fn build_form(request: &StylizeRequest) -> Result<Form, StylizeError> {
        let image = Part::bytes(request.image.bytes.to_vec())
            .file_name(request.image.file_name.clone())
            .mime_str(request.image.mime.as_str())
            .map_err(StylizeError::Transport)?;
        let params = &request.parameters;

        let mut form = Form::new()
            .part(fields::IMAGE, image)
            .text(fields::STYLE, params.style.as_str())
            .text(fields::STRENGTH, format_decimal(params.strength))
            .text(fields::GUIDANCE_SCALE, format_decimal(params.guidance_scale));
        if let Some(seed) = params.seed {
            form = form.text(fields::SEED, seed.to_string());
        }
        Ok(form)
    }
}

#[async_trait]
impl Stylizer for StylizationClient {
    async fn stylize(&self, request: StylizeRequest) -> Result<ResultImage, StylizeError> {
        let form = Self::build_form(&request)?;
        info!(
            style = %request.parameters.style,
            file = %request.image.file_name,
            size_bytes = request.image.size_bytes(),
            "stylize: sending request"
        );

        let response = self
            .http
            .post(format!("{}/stylize", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(|err| {
                warn!(error = %err, timeout = err.is_timeout(), "stylize: transport failure");
                StylizeError::Transport(err)
            })?;

        let body = read_success_body(response).await?;
        let payload: StylizeResponse =
            serde_json::from_slice(&body).map_err(|err| StylizeError::InvalidPayload {
                reason: format!("stylize body: {err}"),
            })?;
        if let Some(metadata) = &payload.metadata {
            info!(
                style = payload.style.as_deref().unwrap_or_default(),
                strength = metadata.strength,
                guidance_scale = metadata.guidance_scale,
                seed = metadata.seed,
                "stylize: completed"
            );
        }

        ResultImage::from_base64(&payload.image_base64)
    }
}

async fn read_success_body(response: Response) -> Result<Vec<u8>, StylizeError> {
    let status = response.status();
    if !status.is_success() {
        // An unreadable error body is treated like a malformed one.
        let body = response.bytes().await.unwrap_or_default();
        let err = service_error(status, &body);
        warn!(status = status.as_u16(), error = %err, "backend rejected request");
        return Err(err);
    }

    let body = response.bytes().await.map_err(StylizeError::Transport)?;
    Ok(body.to_vec())
}

pub(crate) fn service_error(status: StatusCode, body: &[u8]) -> StylizeError {
    let status = status.as_u16();
    let payload = ErrorResponse::from_slice(body);
    match payload.as_ref().and_then(ErrorResponse::message) {
        Some(detail) => StylizeError::Service {
            status,
            detail: detail.to_string(),
        },
        None => StylizeError::MalformedServiceResponse { status },
    }
}

#[cfg(test)]
#[path = "tests/client_tests.rs"]
mod tests;
