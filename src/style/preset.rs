use crate::foundation::error::{QuoteError, QuoteResult};
use crate::preview::region::TextAlign;
use crate::style::color::Rgba;

/// Overlay as entered in the form: hex color plus opacity percentage.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OverlayControl {
    pub color: String,
    /// Percentage in `0..=100`.
    pub opacity: f64,
}

/// A named bundle of style control values.
#[derive(Clone, Debug, PartialEq)]
pub struct StylePreset {
    pub name: &'static str,
    pub font_size_px: f32,
    pub text_color: Rgba,
    pub background_color: Rgba,
    pub overlay: Option<(&'static str, f64)>,
    pub align: TextAlign,
}

impl StylePreset {
    pub fn overlay_control(&self) -> Option<OverlayControl> {
        self.overlay.map(|(color, opacity)| OverlayControl {
            color: color.to_owned(),
            opacity,
        })
    }
}

pub static PRESETS: &[StylePreset] = &[
    StylePreset {
        name: "classic",
        font_size_px: 36.0,
        text_color: Rgba::opaque(0x22, 0x22, 0x22),
        background_color: Rgba::opaque(0xf5, 0xf0, 0xe6),
        overlay: None,
        align: TextAlign::Center,
    },
    StylePreset {
        name: "midnight",
        font_size_px: 40.0,
        text_color: Rgba::opaque(0xe8, 0xea, 0xf6),
        background_color: Rgba::opaque(0x12, 0x14, 0x1c),
        overlay: Some(("#000000", 35.0)),
        align: TextAlign::Center,
    },
    StylePreset {
        name: "sunset",
        font_size_px: 42.0,
        text_color: Rgba::WHITE,
        background_color: Rgba::opaque(0xff, 0x7e, 0x5f),
        overlay: Some(("#feb47b", 40.0)),
        align: TextAlign::Center,
    },
    StylePreset {
        name: "minimal",
        font_size_px: 28.0,
        text_color: Rgba::BLACK,
        background_color: Rgba::WHITE,
        overlay: None,
        align: TextAlign::Left,
    },
    StylePreset {
        name: "bold",
        font_size_px: 56.0,
        text_color: Rgba::opaque(0xff, 0xe6, 0x00),
        background_color: Rgba::BLACK,
        overlay: Some(("#ff0000", 20.0)),
        align: TextAlign::Center,
    },
];

/// Look up a preset by case-insensitive name.
pub fn find_preset(name: &str) -> QuoteResult<&'static StylePreset> {
    let name = name.trim();
    PRESETS
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| QuoteError::validation(format!("unknown preset \"{name}\"")))
}

#[cfg(test)]
#[path = "../../tests/unit/style/preset.rs"]
mod tests;
