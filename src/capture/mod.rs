//! Fixed-rate capture loop.
//!
//! A [`CaptureController`] owns at most one [`CaptureSession`]. Each tick restarts the caption
//! animation, requests a snapshot of the preview region and forwards completed frames to the
//! encoder. The tick that covers the requested duration stops the session from inside the loop.
//!
//! Scheduling goes through a [`Timeline`]; with a [`crate::timeline::VirtualClock`] a whole
//! recording runs instantly and deterministically.

use serde::{Deserialize, Serialize};

use crate::animation::presets::AnimationName;
use crate::encode::sink::{EncodedVideo, EncoderConfig, VideoEncoder};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{QuoteError, QuoteResult};
use crate::preview::region::PreviewRegion;
use crate::render::backend::FrameRGBA;
use crate::snapshot::{SnapshotOpts, Snapshotter};
use crate::timeline::{Clock, SessionId, Timeline, TimelineEvent};

/// Requested recording length and frame rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureSettings {
    pub total_duration_ms: u64,
    pub fps: Fps,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            total_duration_ms: 2000,
            fps: Fps::default(),
        }
    }
}

impl CaptureSettings {
    pub fn validate(&self) -> QuoteResult<()> {
        if self.total_duration_ms == 0 {
            return Err(QuoteError::validation("recording duration must be > 0 ms"));
        }
        Fps::new(self.fps.num, self.fps.den)?;
        Ok(())
    }
}

/// State of the active recording.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaptureSession {
    pub id: SessionId,
    pub fps: Fps,
    pub total_duration_ms: u64,
    /// Ticks completed so far.
    pub ticks: u64,
}

impl CaptureSession {
    /// Time covered by the completed ticks.
    pub fn elapsed_ms(&self) -> f64 {
        self.fps.ticks_to_ms(self.ticks)
    }

    pub fn frame_interval_ms(&self) -> f64 {
        self.fps.frame_interval_ms()
    }

    fn is_complete(&self) -> bool {
        self.fps.ticks_reach(self.ticks, self.total_duration_ms)
    }
}

/// Counters for the most recent session. Reset by `start`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CaptureStats {
    pub ticks: u64,
    pub frames_requested: u64,
    pub frames_delivered: u64,
    pub frames_dropped: u64,
    pub late_frames_discarded: u64,
}

pub struct CaptureController<S: Snapshotter, E: VideoEncoder> {
    snapshotter: S,
    encoder: E,
    opts: SnapshotOpts,
    session: Option<CaptureSession>,
    next_session: u64,
    stats: CaptureStats,
    outcome: Option<QuoteResult<EncodedVideo>>,
}

impl<S: Snapshotter, E: VideoEncoder> CaptureController<S, E> {
    pub fn new(snapshotter: S, encoder: E) -> Self {
        Self::with_snapshot_opts(snapshotter, encoder, SnapshotOpts::default())
    }

    pub fn with_snapshot_opts(snapshotter: S, encoder: E, opts: SnapshotOpts) -> Self {
        Self {
            snapshotter,
            encoder,
            opts,
            session: None,
            next_session: 0,
            stats: CaptureStats::default(),
            outcome: None,
        }
    }

    pub fn is_recording(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&CaptureSession> {
        self.session.as_ref()
    }

    pub fn stats(&self) -> CaptureStats {
        self.stats
    }

    pub fn snapshot_opts(&self) -> &SnapshotOpts {
        &self.opts
    }

    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    pub fn snapshotter(&self) -> &S {
        &self.snapshotter
    }

    /// Result of the last auto-stop, if not yet taken.
    pub fn take_outcome(&mut self) -> Option<QuoteResult<EncodedVideo>> {
        self.outcome.take()
    }

    /// Begin a recording and run its first tick immediately.
    #[tracing::instrument(skip(self, region, timeline), fields(fps = settings.fps.as_f64()))]
    pub fn start<C: Clock>(
        &mut self,
        region: &mut PreviewRegion,
        animation: AnimationName,
        settings: CaptureSettings,
        timeline: &mut Timeline<C>,
    ) -> QuoteResult<SessionId> {
        if self.session.is_some() {
            return Err(QuoteError::AlreadyRecording);
        }
        if region.caption().is_none() {
            return Err(QuoteError::EmptyInput);
        }
        settings.validate()?;
        self.opts.validate()?;

        let px = region.size.scaled(self.opts.scale);
        self.encoder.start(EncoderConfig {
            width: px.width,
            height: px.height,
            fps: settings.fps,
        })?;
        region.animate_caption(animation);

        let id = SessionId(self.next_session);
        self.next_session += 1;
        self.session = Some(CaptureSession {
            id,
            fps: settings.fps,
            total_duration_ms: settings.total_duration_ms,
            ticks: 0,
        });
        self.stats = CaptureStats::default();
        self.outcome = None;
        tracing::debug!(
            session = id.0,
            frames = settings.fps.ticks_for_duration(settings.total_duration_ms),
            "recording started"
        );

        self.tick(region, timeline);
        Ok(id)
    }

    /// Finalize the encoder and deliver the artifact.
    ///
    /// The session is cleared even when finalization fails.
    #[tracing::instrument(skip(self))]
    pub fn stop(&mut self) -> QuoteResult<EncodedVideo> {
        let Some(session) = self.session.take() else {
            return Err(QuoteError::NotRecording);
        };
        tracing::debug!(
            session = session.id.0,
            ticks = session.ticks,
            elapsed_ms = session.elapsed_ms(),
            "recording stopped"
        );
        self.encoder.stop()?;
        self.encoder.save()
    }

    /// Route one timeline event to the controller.
    pub fn dispatch<C: Clock>(
        &mut self,
        event: TimelineEvent,
        region: &mut PreviewRegion,
        timeline: &mut Timeline<C>,
    ) {
        match event {
            TimelineEvent::Tick { session } => {
                if self.session.as_ref().is_some_and(|s| s.id == session) {
                    self.tick(region, timeline);
                } else {
                    tracing::debug!(session = session.0, "tick for inactive session ignored");
                }
            }
            TimelineEvent::SnapshotReady {
                session,
                frame,
                result,
            } => self.on_snapshot(session, frame, result),
        }
    }

    /// Drain the timeline and return the artifact of the session that stopped itself.
    pub fn run<C: Clock>(
        &mut self,
        region: &mut PreviewRegion,
        timeline: &mut Timeline<C>,
    ) -> QuoteResult<Option<EncodedVideo>> {
        while let Some(event) = timeline.next_event() {
            self.dispatch(event, region, timeline);
        }
        self.outcome.take().transpose()
    }

    fn tick<C: Clock>(&mut self, region: &mut PreviewRegion, timeline: &mut Timeline<C>) {
        let Some(session) = self.session else {
            return;
        };

        region.restart_animation();
        region.seek_animation(session.elapsed_ms());

        let frame = FrameIndex(session.ticks);
        let job = self.snapshotter.snapshot(region, &self.opts);
        self.stats.frames_requested += 1;
        if job.latency_ms > 0.0 {
            timeline.schedule_after(
                job.latency_ms,
                TimelineEvent::SnapshotReady {
                    session: session.id,
                    frame,
                    result: job.result,
                },
            );
        } else {
            self.on_snapshot(session.id, frame, job.result);
        }

        let Some(active) = self.session.as_mut() else {
            return;
        };
        active.ticks += 1;
        self.stats.ticks += 1;

        if active.is_complete() {
            let result = self.stop();
            if let Err(err) = &result {
                tracing::warn!(error = %err, "finalizing recording failed");
            }
            self.outcome = Some(result);
        } else {
            timeline.schedule_after(
                active.frame_interval_ms(),
                TimelineEvent::Tick { session: active.id },
            );
        }
    }

    fn on_snapshot(
        &mut self,
        session: SessionId,
        frame: FrameIndex,
        result: QuoteResult<FrameRGBA>,
    ) {
        if self.session.as_ref().is_none_or(|s| s.id != session) {
            tracing::debug!(session = session.0, frame = frame.0, "late snapshot discarded");
            self.stats.late_frames_discarded += 1;
            return;
        }
        let delivered = result.and_then(|f| self.encoder.capture(frame, &f));
        match delivered {
            Ok(()) => self.stats.frames_delivered += 1,
            Err(err) => {
                tracing::warn!(frame = frame.0, error = %err, "frame dropped");
                self.stats.frames_dropped += 1;
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/mod.rs"]
mod tests;
