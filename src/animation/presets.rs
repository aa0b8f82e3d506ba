use std::fmt;
use std::str::FromStr;

use crate::animation::keyframes::{Ease, Track};
use crate::foundation::core::Vec2;
use crate::foundation::error::{QuoteError, QuoteResult};

/// Length of every preset animation, matching the stylesheet default of 1s.
pub const ANIMATION_DURATION_MS: f64 = 1000.0;

/// Static marker carried by every animated caption.
pub const ANIMATED_MARKER: &str = "animate__animated";
/// Static marker identifying the caption element.
pub const CAPTION_MARKER: &str = "animated-text";

/// The enumerated set of caption animations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnimationName {
    FadeIn,
    FadeInUp,
    FadeInDown,
    FadeInLeft,
    FadeInRight,
    ZoomIn,
    BounceIn,
    SlideInLeft,
    SlideInRight,
    Pulse,
    Bounce,
    ShakeX,
}

impl AnimationName {
    pub const ALL: [AnimationName; 12] = [
        Self::FadeIn,
        Self::FadeInUp,
        Self::FadeInDown,
        Self::FadeInLeft,
        Self::FadeInRight,
        Self::ZoomIn,
        Self::BounceIn,
        Self::SlideInLeft,
        Self::SlideInRight,
        Self::Pulse,
        Self::Bounce,
        Self::ShakeX,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FadeIn => AnimationFrame {
                opacity: FADE.sample(t),
                ..AnimationFrame::IDENTITY
            },
            Self::FadeInUp => fade_in_from(t, Vec2::new(0.0, 1.0)),
            Self::FadeInDown => fade_in_from(t, Vec2::new(0.0, -1.0)),
            Self::FadeInLeft => fade_in_from(t, Vec2::new(-1.0, 0.0)),
            Self::FadeInRight => fade_in_from(t, Vec2::new(1.0, 0.0)),
            Self::ZoomIn => AnimationFrame {
                opacity: ZOOM_IN_OPACITY.sample(t),
                scale: ZOOM_IN_SCALE.sample(t),
                ..AnimationFrame::IDENTITY
            },
            Self::BounceIn => AnimationFrame {
                opacity: BOUNCE_IN_OPACITY.sample(t),
                scale: BOUNCE_IN_SCALE.sample(t),
                ..AnimationFrame::IDENTITY
            },
            Self::SlideInLeft => slide_in_from(t, -1.0),
            Self::SlideInRight => slide_in_from(t, 1.0),
            Self::Pulse => AnimationFrame {
                scale: PULSE_SCALE.sample(t),
                ..AnimationFrame::IDENTITY
            },
            Self::Bounce => AnimationFrame {
                translate: Vec2::new(0.0, BOUNCE_Y.sample(t)),
                ..AnimationFrame::IDENTITY
            },
            Self::ShakeX => AnimationFrame {
                translate: Vec2::new(SHAKE_X.sample(t), 0.0),
                ..AnimationFrame::IDENTITY
            },
        }
    }
}

// Keyframe tracks. Translations are fractions of the caption block size.

const FADE: Track<'static> = Track::new(&[(0.0, 0.0), (1.0, 1.0)], Ease::Linear);
const ENTER_OFFSET: Track<'static> = Track::new(&[(0.0, 1.0), (1.0, 0.0)], Ease::OutCubic);
const SLIDE_OFFSET: Track<'static> = Track::new(&[(0.0, 1.0), (1.0, 0.0)], Ease::OutQuad);

const ZOOM_IN_OPACITY: Track<'static> =
    Track::new(&[(0.0, 0.0), (0.5, 1.0), (1.0, 1.0)], Ease::Linear);
const ZOOM_IN_SCALE: Track<'static> =
    Track::new(&[(0.0, 0.3), (0.5, 1.0), (1.0, 1.0)], Ease::OutQuad);

const BOUNCE_IN_OPACITY: Track<'static> =
    Track::new(&[(0.0, 0.0), (0.6, 1.0), (1.0, 1.0)], Ease::Linear);
const BOUNCE_IN_SCALE: Track<'static> = Track::new(
    &[
        (0.0, 0.3),
        (0.2, 1.1),
        (0.4, 0.9),
        (0.6, 1.03),
        (0.8, 0.97),
        (1.0, 1.0),
    ],
    Ease::InOutCubic,
);

const PULSE_SCALE: Track<'static> =
    Track::new(&[(0.0, 1.0), (0.5, 1.05), (1.0, 1.0)], Ease::InOutQuad);

const BOUNCE_Y: Track<'static> = Track::new(
    &[
        (0.0, 0.0),
        (0.2, 0.0),
        (0.4, -0.3),
        (0.43, -0.3),
        (0.53, 0.0),
        (0.7, -0.15),
        (0.8, 0.0),
        (0.9, -0.04),
        (1.0, 0.0),
    ],
    Ease::InOutQuad,
);

const SHAKE_X: Track<'static> = Track::new(
    &[
        (0.0, 0.0),
        (0.1, -0.02),
        (0.2, 0.02),
        (0.3, -0.02),
        (0.4, 0.02),
        (0.5, -0.02),
        (0.6, 0.02),
        (0.7, -0.02),
        (0.8, 0.02),
        (0.9, -0.02),
        (1.0, 0.0),
    ],
    Ease::Linear,
);

impl fmt::Display for AnimationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnimationName {
    type Err = QuoteError;

    fn from_str(s: &str) -> QuoteResult<Self> {
        let s = s.trim();
        let s = s.strip_prefix("animate__").unwrap_or(s);
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| QuoteError::validation(format!("unknown animation \"{s}\"")))
    }
}

/// Caption transform at one instant of an animation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationFrame {
    pub opacity: f64,
    /// Offset as a fraction of the caption block size.
    pub translate: Vec2,
    /// Uniform scale around the caption block center.
    pub scale: f64,
}

impl AnimationFrame {
    pub const IDENTITY: Self = Self {
        opacity: 1.0,
        translate: Vec2::ZERO,
        scale: 1.0,
    };
}

impl Default for AnimationFrame {
    fn default() -> Self {
        Self::IDENTITY
    }
}

fn fade_in_from(t: f64, dir: Vec2) -> AnimationFrame {
    AnimationFrame {
        opacity: FADE.sample(t),
        translate: dir * ENTER_OFFSET.sample(t),
        scale: 1.0,
    }
}

fn slide_in_from(t: f64, dir_x: f64) -> AnimationFrame {
    AnimationFrame {
        translate: Vec2::new(dir_x * SLIDE_OFFSET.sample(t), 0.0),
        ..AnimationFrame::IDENTITY
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/presets.rs"]
mod tests;
