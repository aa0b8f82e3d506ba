use std::path::PathBuf;

use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{QuoteError, QuoteResult};
use crate::render::backend::FrameRGBA;

/// Configuration provided to a [`VideoEncoder`] when a recording starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames-per-second.
    pub fps: Fps,
}

/// The artifact produced by a finished recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedVideo {
    /// Where the container file was delivered; `None` for encoders that keep frames in memory.
    pub path: Option<PathBuf>,
    /// Frames written to the container.
    pub frames_encoded: u64,
    /// Frame slots left empty because their snapshot never arrived in time.
    pub frames_skipped: u64,
}

/// Incremental video encoder contract.
///
/// Lifecycle: `start`, any number of `capture`, `stop` (finalize the container), `save`
/// (deliver the artifact).
pub trait VideoEncoder {
    /// Called once before any frame is captured.
    fn start(&mut self, cfg: EncoderConfig) -> QuoteResult<()>;
    /// Accept one frame. Frames may arrive out of index order.
    fn capture(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> QuoteResult<()>;
    /// Flush buffered frames and finalize the container.
    fn stop(&mut self) -> QuoteResult<()>;
    /// Deliver the finalized artifact.
    fn save(&mut self) -> QuoteResult<EncodedVideo>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Phase {
    #[default]
    Idle,
    Capturing,
    Stopped,
}

/// In-memory encoder for tests and debugging. Keeps frames in arrival order.
#[derive(Debug, Default)]
pub struct InMemoryEncoder {
    cfg: Option<EncoderConfig>,
    phase: Phase,
    pub(crate) frames: Vec<(FrameIndex, FrameRGBA)>,
    saves: u64,
}

impl InMemoryEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `start`, if any.
    pub fn config(&self) -> Option<EncoderConfig> {
        self.cfg
    }

    /// Frames in arrival order.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    /// Number of completed `save` calls.
    pub fn saves(&self) -> u64 {
        self.saves
    }

    pub fn is_capturing(&self) -> bool {
        self.phase == Phase::Capturing
    }
}

impl VideoEncoder for InMemoryEncoder {
    fn start(&mut self, cfg: EncoderConfig) -> QuoteResult<()> {
        if self.phase == Phase::Capturing {
            return Err(QuoteError::encode("encoder already started"));
        }
        self.cfg = Some(cfg);
        self.frames.clear();
        self.phase = Phase::Capturing;
        Ok(())
    }

    fn capture(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> QuoteResult<()> {
        if self.phase != Phase::Capturing {
            return Err(QuoteError::encode("encoder is not capturing"));
        }
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn stop(&mut self) -> QuoteResult<()> {
        if self.phase != Phase::Capturing {
            return Err(QuoteError::encode("encoder is not capturing"));
        }
        self.phase = Phase::Stopped;
        Ok(())
    }

    fn save(&mut self) -> QuoteResult<EncodedVideo> {
        if self.phase != Phase::Stopped {
            return Err(QuoteError::encode("save called before stop"));
        }
        self.saves += 1;
        self.phase = Phase::Idle;
        Ok(EncodedVideo {
            path: None,
            frames_encoded: self.frames.len() as u64,
            frames_skipped: 0,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
