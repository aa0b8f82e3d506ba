use std::collections::BTreeSet;
use std::sync::{Arc, LazyLock};

use crate::animation::presets::{ANIMATED_MARKER, AnimationName, CAPTION_MARKER};
use crate::foundation::core::Canvas;
use crate::style::color::Rgba;
use crate::style::image::BackgroundImage;

/// Horizontal caption alignment.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    serde::Serialize,
    serde::Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

static BUILTIN_FONT: LazyLock<FontFace> = LazyLock::new(|| {
    FontFace::new(
        "DejaVu Sans",
        include_bytes!("../../assets/DejaVuSans.ttf").to_vec(),
    )
});

/// Font bytes used for the caption.
#[derive(Clone, Debug)]
pub struct FontFace {
    /// Display label (usually the file stem).
    pub label: String,
    bytes: Arc<Vec<u8>>,
    /// xxh3 of `bytes`; identifies the face independently of its label.
    id: u64,
}

impl FontFace {
    pub fn new(label: impl Into<String>, bytes: Vec<u8>) -> Self {
        let id = xxhash_rust::xxh3::xxh3_64(&bytes);
        Self {
            label: label.into(),
            bytes: Arc::new(bytes),
            id,
        }
    }

    /// The face used when no font file is configured (DejaVu Sans).
    pub fn builtin() -> Self {
        BUILTIN_FONT.clone()
    }

    pub fn bytes(&self) -> &Arc<Vec<u8>> {
        &self.bytes
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

impl PartialEq for FontFace {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.bytes == other.bytes
    }
}

/// Resolved caption style as bound onto the preview.
#[derive(Clone, Debug)]
pub struct CaptionStyle {
    pub font: FontFace,
    pub font_size_px: f32,
    pub color: Rgba,
    pub align: TextAlign,
    /// Maximum line width as a fraction of the region width.
    pub max_width_frac: f32,
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            font: FontFace::builtin(),
            font_size_px: 36.0,
            color: Rgba::WHITE,
            align: TextAlign::Center,
            max_width_frac: 0.8,
        }
    }
}

/// Animation attached to the caption element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationState {
    pub name: AnimationName,
    /// Number of times the animation has (re)started.
    pub starts: u64,
    /// Animation-local time the next snapshot samples.
    pub playhead_ms: f64,
}

/// The on-screen element whose appearance is captured.
///
/// Marker mutations follow layout semantics: adding a marker only (re)starts the animation when
/// the marker was absent at the last layout pass. Removing and re-adding without a layout pass in
/// between is coalesced and leaves the running animation untouched.
#[derive(Clone, Debug)]
pub struct PreviewRegion {
    pub size: Canvas,
    pub background_color: Option<Rgba>,
    pub background_image: Option<BackgroundImage>,
    pub overlay: Option<Rgba>,
    caption: Option<String>,
    pub caption_style: CaptionStyle,

    markers: BTreeSet<String>,
    laid_out_markers: BTreeSet<String>,
    layout_generation: u64,
    animation: Option<AnimationState>,
}

impl PreviewRegion {
    pub fn new(size: Canvas) -> Self {
        Self {
            size,
            background_color: None,
            background_image: None,
            overlay: None,
            caption: None,
            caption_style: CaptionStyle::default(),
            markers: BTreeSet::new(),
            laid_out_markers: BTreeSet::new(),
            layout_generation: 0,
            animation: None,
        }
    }

    /// Remove caption, background and markers.
    pub fn clear(&mut self) {
        self.caption = None;
        self.background_color = None;
        self.background_image = None;
        self.overlay = None;
        self.markers.clear();
        self.animation = None;
        self.force_layout();
    }

    /// Caption text, if a non-blank caption is present.
    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref().filter(|c| !c.trim().is_empty())
    }

    /// Set caption text. Stored trimmed; blank text removes the caption.
    pub fn set_caption(&mut self, text: &str) {
        let t = text.trim();
        self.caption = (!t.is_empty()).then(|| t.to_owned());
    }

    /// Attach an animated caption: static markers plus the activation marker for `name`.
    pub fn animate_caption(&mut self, name: AnimationName) {
        if let Some(prev) = self.animation.take() {
            self.markers.remove(&prev.name.marker());
        }
        self.markers.insert(CAPTION_MARKER.to_owned());
        self.markers.insert(ANIMATED_MARKER.to_owned());
        self.animation = Some(AnimationState {
            name,
            starts: 0,
            playhead_ms: 0.0,
        });
        self.add_marker(&name.marker());
    }

    pub fn animation(&self) -> Option<AnimationState> {
        self.animation
    }

    pub fn has_marker(&self, marker: &str) -> bool {
        self.markers.contains(marker)
    }

    pub fn markers(&self) -> impl Iterator<Item = &str> {
        self.markers.iter().map(String::as_str)
    }

    pub fn remove_marker(&mut self, marker: &str) {
        self.markers.remove(marker);
    }

    /// Add a marker; restarts the attached animation if it is the activation marker and it was
    /// not present at the last layout pass.
    pub fn add_marker(&mut self, marker: &str) {
        let newly_laid_out = !self.laid_out_markers.contains(marker);
        self.markers.insert(marker.to_owned());
        if let Some(anim) = self.animation.as_mut()
            && newly_laid_out
            && anim.name.marker() == marker
        {
            anim.starts += 1;
            anim.playhead_ms = 0.0;
        }
    }

    /// Commit pending marker mutations (the forced reflow between remove and re-add).
    pub fn force_layout(&mut self) -> u64 {
        self.laid_out_markers.clone_from(&self.markers);
        self.layout_generation += 1;
        self.layout_generation
    }

    pub fn layout_generation(&self) -> u64 {
        self.layout_generation
    }

    /// Restart the attached animation from frame zero. Returns `false` when none is attached.
    pub fn restart_animation(&mut self) -> bool {
        let Some(anim) = self.animation else {
            return false;
        };
        let marker = anim.name.marker();
        self.remove_marker(&marker);
        self.force_layout();
        self.add_marker(&marker);
        true
    }

    /// Move the animation playhead (animation-local milliseconds).
    pub fn seek_animation(&mut self, playhead_ms: f64) {
        if let Some(anim) = self.animation.as_mut() {
            anim.playhead_ms = playhead_ms.max(0.0);
        }
    }

    pub(crate) fn caption_animation_frame(&self) -> crate::animation::presets::AnimationFrame {
        match self.animation {
            Some(anim) if self.has_marker(&anim.name.marker()) => {
                anim.name.sample(anim.playhead_ms)
            }
            _ => crate::animation::presets::AnimationFrame::IDENTITY,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/preview/region.rs"]
mod tests;
