//! Raster snapshot service: turns the preview region into a frame.

use crate::foundation::error::{QuoteError, QuoteResult};
use crate::preview::region::PreviewRegion;
use crate::render::backend::FrameRGBA;
use crate::render::cpu::PreviewRenderer;

/// Which background image sources a snapshot may rasterize.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CrossOrigin {
    /// Only embedded (`data:` URL) images; linked images are skipped.
    #[default]
    Anonymous,
    /// Embedded and linked images.
    UseCredentials,
}

/// Options passed with every snapshot request.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SnapshotOpts {
    /// Leave pixels not covered by the region transparent instead of filling them white.
    pub transparent_background: bool,
    /// Output pixel multiplier.
    pub scale: f32,
    pub cross_origin: CrossOrigin,
}

impl Default for SnapshotOpts {
    fn default() -> Self {
        Self {
            transparent_background: true,
            scale: 1.0,
            cross_origin: CrossOrigin::Anonymous,
        }
    }
}

impl SnapshotOpts {
    pub fn validate(&self) -> QuoteResult<()> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(QuoteError::validation(
                "snapshot scale must be finite and > 0",
            ));
        }
        Ok(())
    }
}

/// Outcome of one snapshot request.
///
/// `latency_ms` is how long after the request the result becomes available. Zero-latency jobs
/// are delivered within the requesting tick; others complete later on the timeline.
#[derive(Debug)]
pub struct SnapshotJob {
    pub latency_ms: f64,
    pub result: QuoteResult<FrameRGBA>,
}

impl SnapshotJob {
    pub fn ready(result: QuoteResult<FrameRGBA>) -> Self {
        Self {
            latency_ms: 0.0,
            result,
        }
    }
}

/// The external region-to-raster collaborator.
pub trait Snapshotter {
    /// Capture `region` as it looks right now.
    fn snapshot(&mut self, region: &PreviewRegion, opts: &SnapshotOpts) -> SnapshotJob;
}

/// Snapshotter backed by the built-in CPU renderer; completes synchronously.
#[derive(Default)]
pub struct CpuSnapshotter {
    renderer: PreviewRenderer,
}

impl CpuSnapshotter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Snapshotter for CpuSnapshotter {
    fn snapshot(&mut self, region: &PreviewRegion, opts: &SnapshotOpts) -> SnapshotJob {
        SnapshotJob::ready(self.renderer.render(region, opts))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/snapshot/mod.rs"]
mod tests;
