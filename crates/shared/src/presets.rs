//! Static style catalog. Order matters: the first entry is the default
//! selection and the fallback for unknown ids.

use crate::domain::StyleId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preset {
    pub id: StyleId,
    pub label: &'static str,
    pub tagline: &'static str,
    pub accent_color: &'static str,
    pub prompt: &'static str,
    pub negative_prompt: &'static str,
}

pub static STYLE_PRESETS: [Preset; 5] = [
    Preset {
        id: StyleId::Ghibli,
        label: "Studio Ghibli",
        tagline: "Soft palettes, painterly fantasy vibes.",
        accent_color: "#5fb3b3",
        prompt: "Studio Ghibli concept art, whimsical atmosphere, painterly textures, soft natural lighting, high detail",
        negative_prompt: "grainy, noisy, distorted, low resolution, dull colors, ugly, deformed, watermark, text",
    },
    Preset {
        id: StyleId::Naruto,
        label: "Naruto Manga",
        tagline: "High-contrast shonen ink style.",
        accent_color: "#f78f3f",
        prompt: "Naruto manga panel, dynamic cel shading, crisp inked lines, hyper stylized shonen jump aesthetic",
        negative_prompt: "photorealistic, blurry, washed out colors, realistic lighting, low detail, text",
    },
    Preset {
        id: StyleId::Dragonball,
        label: "Dragon Ball Z",
        tagline: "Bold lines, saturated energy.",
        accent_color: "#f3d03e",
        prompt: "Dragon Ball Z anime frame, bold outlines, saturated cel shading, kinetic energy fx, toriyama style",
        negative_prompt: "painterly, watercolor, muted tones, noise, low detail, soft focus, text",
    },
    Preset {
        id: StyleId::Picasso,
        label: "Picasso Cubism",
        tagline: "Abstract cubist reinterpretation.",
        accent_color: "#d66c6c",
        prompt: "Picasso cubist portrait, angular geometry, abstract forms, bold color blocking, overlapping perspective",
        negative_prompt: "photorealistic, smooth shading, realistic proportions, soft lighting, text",
    },
    Preset {
        id: StyleId::Davinci,
        label: "Da Vinci Sketch",
        tagline: "Renaissance graphite study.",
        accent_color: "#c2a878",
        prompt: "Leonardo da Vinci charcoal sketch, sfumato shading, renaissance study, parchment background, precise anatomy",
        negative_prompt: "bright colors, comic style, digital artifacts, sharp modern lines, text",
    },
];

pub fn all() -> &'static [Preset] {
    &STYLE_PRESETS
}

/// Resolves a raw identifier, falling back to the first catalog entry.
pub fn lookup(id: &str) -> &'static Preset {
    STYLE_PRESETS
        .iter()
        .find(|preset| preset.id.as_str() == id)
        .unwrap_or(&STYLE_PRESETS[0])
}

pub fn preset(id: StyleId) -> &'static Preset {
    lookup(id.as_str())
}
