use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Multipart field names of `POST /stylize`.
pub mod fields {
    pub const IMAGE: &str = "image";
    pub const STYLE: &str = "style";
    pub const STRENGTH: &str = "strength";
    pub const GUIDANCE_SCALE: &str = "guidance_scale";
    pub const SEED: &str = "seed";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StylizeResponse {
    pub image_base64: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<StylizeMetadata>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StylizeMetadata {
    #[serde(default)]
    pub strength: Option<f64>,
    #[serde(default)]
    pub guidance_scale: Option<f64>,
    #[serde(default)]
    pub seed: Option<i64>,
}

/// Error body of a non-2xx response. `detail` is usually a string, but
/// request validation failures carry a list of objects instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub detail: Option<Value>,
}

impl ErrorResponse {
    /// Parses an error body. Only a JSON object counts as one.
    pub fn from_slice(body: &[u8]) -> Option<Self> {
        match serde_json::from_slice::<Value>(body).ok()? {
            Value::Object(mut object) => Some(Self {
                detail: object.remove("detail"),
            }),
            _ => None,
        }
    }

    /// The server's detail text, untouched, when it is a non-empty string.
    pub fn message(&self) -> Option<&str> {
        self.detail
            .as_ref()
            .and_then(Value::as_str)
            .filter(|detail| !detail.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub device: Option<String>,
    #[serde(default)]
    pub available_styles: Vec<String>,
}
