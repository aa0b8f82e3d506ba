//! Incremental video encoders.
//!
//! Encoders receive frames as snapshots complete, which is not necessarily request order; each
//! frame carries its [`FrameIndex`](crate::FrameIndex) so an encoder can restore timeline order.

/// `ffmpeg`-based MP4 encoder.
pub mod ffmpeg;
/// Encoder trait and the in-memory encoder.
pub mod sink;
