use std::{fmt, ops::RangeInclusive, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest upload accepted by the client, in bytes (10 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

pub const STRENGTH_RANGE: RangeInclusive<f64> = 0.2..=0.95;
pub const GUIDANCE_SCALE_RANGE: RangeInclusive<f64> = 3.0..=12.0;

pub const DEFAULT_STRENGTH: f64 = 0.65;
pub const DEFAULT_GUIDANCE_SCALE: f64 = 7.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleId {
    Ghibli,
    Naruto,
    Dragonball,
    Picasso,
    Davinci,
}

impl StyleId {
    pub const ALL: [StyleId; 5] = [
        StyleId::Ghibli,
        StyleId::Naruto,
        StyleId::Dragonball,
        StyleId::Picasso,
        StyleId::Davinci,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StyleId::Ghibli => "ghibli",
            StyleId::Naruto => "naruto",
            StyleId::Dragonball => "dragonball",
            StyleId::Picasso => "picasso",
            StyleId::Davinci => "davinci",
        }
    }
}

impl fmt::Display for StyleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown style \"{0}\"")]
pub struct UnknownStyle(pub String);

impl FromStr for StyleId {
    type Err = UnknownStyle;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        StyleId::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(raw))
            .ok_or_else(|| UnknownStyle(raw.to_string()))
    }
}

/// Image encodings the stylization backend accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageMime {
    #[serde(rename = "image/png")]
    Png,
    #[serde(rename = "image/jpeg")]
    Jpeg,
}

impl ImageMime {
    pub fn from_mime_str(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "image/png" => Some(ImageMime::Png),
            "image/jpeg" => Some(ImageMime::Jpeg),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ImageMime::Png => "image/png",
            ImageMime::Jpeg => "image/jpeg",
        }
    }
}

impl fmt::Display for ImageMime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-tunable knobs sent along with every stylization request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleParameters {
    pub style: StyleId,
    pub strength: f64,
    pub guidance_scale: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for StyleParameters {
    fn default() -> Self {
        Self {
            style: StyleId::ALL[0],
            strength: DEFAULT_STRENGTH,
            guidance_scale: DEFAULT_GUIDANCE_SCALE,
            seed: None,
        }
    }
}

pub fn clamp_to(range: &RangeInclusive<f64>, value: f64) -> f64 {
    value.clamp(*range.start(), *range.end())
}

/// Renders a parameter the way it travels in the form body: `0.65`, `7.0`.
pub fn format_decimal(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}
