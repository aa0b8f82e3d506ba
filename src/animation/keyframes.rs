/// Timing curve applied within each keyframe segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Ease {
    Linear,
    OutQuad,
    InOutQuad,
    OutCubic,
    InOutCubic,
}

impl Ease {
    /// Map segment progress `t` (clamped to `[0, 1]`).
    pub(crate) fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::OutQuad => 1.0 - (1.0 - t).powi(2),
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutQuad if t < 0.5 => 2.0 * t * t,
            Self::InOutQuad => 1.0 - (2.0 - 2.0 * t).powi(2) / 2.0,
            Self::InOutCubic if t < 0.5 => 4.0 * t.powi(3),
            Self::InOutCubic => 1.0 - (2.0 - 2.0 * t).powi(3) / 2.0,
        }
    }
}

/// One animated property: `(offset, value)` stops sorted by offset in `[0, 1]`.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Track<'a> {
    stops: &'a [(f64, f64)],
    ease: Ease,
}

impl<'a> Track<'a> {
    pub(crate) const fn new(stops: &'a [(f64, f64)], ease: Ease) -> Self {
        Self { stops, ease }
    }

    /// Value at normalized animation time `t`. Before the first stop and after the last, the
    /// nearest stop holds.
    pub(crate) fn sample(&self, t: f64) -> f64 {
        let Some(&(first_at, first_v)) = self.stops.first() else {
            return 0.0;
        };
        if t <= first_at {
            return first_v;
        }
        for w in self.stops.windows(2) {
            let (a_at, a_v) = w[0];
            let (b_at, b_v) = w[1];
            if t <= b_at {
                let span = b_at - a_at;
                if span <= 0.0 {
                    return b_v;
                }
                return a_v + (b_v - a_v) * self.ease.apply((t - a_at) / span);
            }
        }
        self.stops.last().map_or(first_v, |&(_, v)| v)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/keyframes.rs"]
mod tests;
