use crate::foundation::error::{QuoteError, QuoteResult};

pub use kurbo::Vec2;

/// 0-based index of a captured frame within one recording session.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> QuoteResult<Self> {
        if den == 0 {
            return Err(QuoteError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(QuoteError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Spacing between two frame ticks in milliseconds (`1000 / fps`).
    pub fn frame_interval_ms(self) -> f64 {
        1000.0 * f64::from(self.den) / f64::from(self.num)
    }

    /// Elapsed milliseconds after `ticks` frame intervals.
    pub fn ticks_to_ms(self, ticks: u64) -> f64 {
        (ticks as f64) * self.frame_interval_ms()
    }

    /// Whether `ticks` intervals cover at least `duration_ms`.
    ///
    /// Exact integer comparison of `ticks * 1000 * den >= duration_ms * num`, so 60 ticks at
    /// 30 fps reach 2000 ms without floating-point drift.
    pub fn ticks_reach(self, ticks: u64, duration_ms: u64) -> bool {
        let lhs = u128::from(ticks) * 1000 * u128::from(self.den);
        let rhs = u128::from(duration_ms) * u128::from(self.num);
        lhs >= rhs
    }

    /// Number of ticks needed to cover `duration_ms` (ceiling).
    pub fn ticks_for_duration(self, duration_ms: u64) -> u64 {
        let num = u128::from(duration_ms) * u128::from(self.num);
        let den = 1000 * u128::from(self.den);
        num.div_ceil(den) as u64
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self { num: 30, den: 1 }
    }
}

/// Preview region dimensions in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a validated canvas; both sides must be in `1..=u16::MAX`.
    pub fn new(width: u32, height: u32) -> QuoteResult<Self> {
        let c = Self { width, height };
        c.validate()?;
        Ok(c)
    }

    pub fn validate(self) -> QuoteResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(QuoteError::validation("canvas width/height must be non-zero"));
        }
        if self.width > u32::from(u16::MAX) || self.height > u32::from(u16::MAX) {
            return Err(QuoteError::validation("canvas width/height exceed 65535"));
        }
        Ok(())
    }

    /// Pixel size after applying a snapshot scale factor (rounded, at least 1px).
    pub fn scaled(self, scale: f32) -> Self {
        let s = f64::from(scale);
        Self {
            width: ((f64::from(self.width) * s).round() as u32).max(1),
            height: ((f64::from(self.height) * s).round() as u32).max(1),
        }
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 600,
            height: 400,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
