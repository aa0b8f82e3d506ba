use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::animation::presets::AnimationName;
use crate::foundation::core::Canvas;
use crate::foundation::error::{QuoteError, QuoteResult};
use crate::preview::region::{CaptionStyle, FontFace, PreviewRegion, TextAlign};
use crate::style::color::{Rgba, hex_to_rgba};
use crate::style::image::BackgroundImage;
use crate::style::preset::{OverlayControl, find_preset};

const DEFAULT_BACKGROUND: Rgba = Rgba::opaque(0x22, 0x22, 0x22);

/// Form state: every control a caption card widget exposes.
///
/// Unset optional controls fall back to the selected preset, then to built-in defaults.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StyleControls {
    pub caption: String,
    pub preset: Option<String>,
    pub font_path: Option<PathBuf>,
    pub font_size_px: Option<f32>,
    pub text_color: Option<Rgba>,
    pub text_align: Option<TextAlign>,
    pub background_color: Option<Rgba>,
    pub overlay: Option<OverlayControl>,
    pub background_image: Option<PathBuf>,
    /// Embed the background image as a data URL (upload) instead of linking it.
    pub embed_image: bool,
    /// Variants built around a photo refuse to render without one.
    pub require_image: bool,
    pub animation: AnimationName,
    pub canvas: Canvas,
}

impl Default for StyleControls {
    fn default() -> Self {
        Self {
            caption: String::new(),
            preset: None,
            font_path: None,
            font_size_px: None,
            text_color: None,
            text_align: None,
            background_color: None,
            overlay: None,
            background_image: None,
            embed_image: true,
            require_image: false,
            animation: AnimationName::FadeIn,
            canvas: Canvas::default(),
        }
    }
}

impl StyleControls {
    /// Apply a named preset atomically: either every preset-controlled value changes, or (for an
    /// unknown name) nothing does.
    pub fn apply_preset(&mut self, name: &str) -> QuoteResult<()> {
        let preset = find_preset(name)?;
        self.preset = Some(preset.name.to_owned());
        self.font_size_px = None;
        self.text_color = None;
        self.text_align = None;
        self.background_color = None;
        self.overlay = None;
        Ok(())
    }

    /// Merge preset values and explicit controls.
    pub fn resolve(&self) -> QuoteResult<ResolvedStyle> {
        let preset = self.preset.as_deref().map(find_preset).transpose()?;

        let overlay_ctl = self
            .overlay
            .clone()
            .or_else(|| preset.and_then(|p| p.overlay_control()));
        let overlay = overlay_ctl
            .map(|o| hex_to_rgba(&o.color, o.opacity))
            .transpose()?;

        let font_size_px = self
            .font_size_px
            .or(preset.map(|p| p.font_size_px))
            .unwrap_or(CaptionStyle::default().font_size_px);
        if !font_size_px.is_finite() || font_size_px <= 0.0 {
            return Err(QuoteError::validation(
                "font size must be finite and > 0",
            ));
        }

        Ok(ResolvedStyle {
            font_size_px,
            text_color: self
                .text_color
                .or(preset.map(|p| p.text_color))
                .unwrap_or(Rgba::WHITE),
            align: self
                .text_align
                .or(preset.map(|p| p.align))
                .unwrap_or_default(),
            background_color: self
                .background_color
                .or(preset.map(|p| p.background_color))
                .unwrap_or(DEFAULT_BACKGROUND),
            overlay,
        })
    }
}

/// Style values after preset fallback.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedStyle {
    pub font_size_px: f32,
    pub text_color: Rgba,
    pub align: TextAlign,
    pub background_color: Rgba,
    pub overlay: Option<Rgba>,
}

/// Validate the controls and bind them onto `region`.
///
/// All fallible work (preset lookup, font and image loading) happens before the region is
/// touched, so a failed bind leaves the previous preview intact.
#[tracing::instrument(skip_all, fields(animation = %controls.animation))]
pub fn bind(controls: &StyleControls, region: &mut PreviewRegion) -> QuoteResult<()> {
    if controls.caption.trim().is_empty() {
        return Err(QuoteError::EmptyInput);
    }
    if controls.require_image && controls.background_image.is_none() {
        return Err(QuoteError::MissingImage);
    }
    controls.canvas.validate()?;

    let style = controls.resolve()?;
    let font = match controls.font_path.as_deref() {
        Some(path) => load_font(path)?,
        None => FontFace::builtin(),
    };
    let image = match controls.background_image.as_deref() {
        Some(p) if controls.embed_image => Some(BackgroundImage::load(p)?),
        Some(p) => Some(BackgroundImage::link(p)?),
        None => None,
    };

    region.clear();
    region.size = controls.canvas;
    region.background_color = Some(style.background_color);
    region.background_image = image;
    region.overlay = style.overlay;
    region.set_caption(&controls.caption);
    region.caption_style = CaptionStyle {
        font,
        font_size_px: style.font_size_px,
        color: style.text_color,
        align: style.align,
        ..CaptionStyle::default()
    };
    region.animate_caption(controls.animation);
    tracing::debug!(
        background = %style.background_color,
        overlay = ?style.overlay.map(|o| o.to_string()),
        "bound controls onto preview"
    );
    Ok(())
}

/// Read a TrueType/OpenType font file for the caption.
pub fn load_font(path: &Path) -> QuoteResult<FontFace> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read font '{}'", path.display()))?;
    if bytes.is_empty() {
        return Err(QuoteError::validation(format!(
            "font file '{}' is empty",
            path.display()
        )));
    }
    let label = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "font".to_owned());
    Ok(FontFace::new(label, bytes))
}

#[cfg(test)]
#[path = "../../tests/unit/style/binding.rs"]
mod tests;
