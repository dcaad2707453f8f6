//! Text renderings of the studio surfaces. Each function reads a
//! [`ViewState`] and never touches controller state.

use std::fmt::Write as _;

use client_core::ViewState;
use shared::{domain::StyleId, presets};

const UPLOAD_PLACEHOLDER: &str =
    "Drop an image (PNG/JPG) or click to browse\nMax 10 MB • Face-forward portraits work best";

pub fn strength_label(strength: f64) -> String {
    format!("Strength: {strength:.2}")
}

pub fn guidance_label(guidance_scale: f64) -> String {
    format!("Guidance: {guidance_scale:.1}")
}

pub fn submit_label(view: &ViewState<'_>) -> &'static str {
    if view.is_loading {
        "Processing…"
    } else {
        "Process image"
    }
}

pub fn render_header(view: &ViewState<'_>) -> String {
    format!(
        "DreamForge Studio | Active preset: {} ({})",
        view.active_preset.label, view.active_preset.accent_color
    )
}

pub fn render_style_grid(selected: StyleId) -> String {
    let mut out = String::new();
    for preset in presets::all() {
        let marker = if preset.id == selected { "(*)" } else { "( )" };
        let _ = writeln!(
            out,
            "{marker} {:<11} {:<16} {}",
            preset.id.as_str(),
            preset.label,
            preset.tagline
        );
    }
    out
}

pub fn render_preset_catalog() -> String {
    let mut out = String::new();
    for preset in presets::all() {
        let _ = writeln!(out, "{} - {} [{}]", preset.id, preset.label, preset.accent_color);
        let _ = writeln!(out, "  {}", preset.tagline);
        let _ = writeln!(out, "  prompt:   {}", preset.prompt);
        let _ = writeln!(out, "  negative: {}", preset.negative_prompt);
    }
    out
}

pub fn render_upload_zone(view: &ViewState<'_>) -> String {
    match (view.preview, view.file_name) {
        (Some(preview), Some(file_name)) => format!("Preview: {file_name} <{preview}>"),
        _ => UPLOAD_PLACEHOLDER.to_string(),
    }
}

pub fn render_controls(view: &ViewState<'_>) -> String {
    let mut out = format!(
        "{}\n{}",
        strength_label(view.parameters.strength),
        guidance_label(view.parameters.guidance_scale)
    );
    if let Some(seed) = view.parameters.seed {
        let _ = write!(out, "\nSeed: {seed}");
    }
    out
}

pub fn render_result_pane(view: &ViewState<'_>) -> String {
    if view.is_loading {
        return "Generating… this usually takes 10-15 seconds.".to_string();
    }
    if let Some(error) = &view.error {
        return format!("Error: {error}");
    }
    match view.result {
        Some(result) => format!("Stylized output ready ({} bytes)", result.bytes().len()),
        None => "Your stylized result will appear here.".to_string(),
    }
}
