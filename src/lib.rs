//! quotecast: caption cards rendered to PNG stills or short animated MP4 clips.
//!
//! Form controls ([`StyleControls`]) are bound onto a [`PreviewRegion`]. The region is rasterized
//! by a [`Snapshotter`], either once ([`export_png`]) or at a fixed rate by the
//! [`CaptureController`], which feeds frames to a [`VideoEncoder`].

#![forbid(unsafe_code)]

mod foundation;

pub mod animation;
pub mod capture;
pub mod config;
pub mod encode;
pub mod export;
pub mod preview;
pub mod render;
pub mod snapshot;
pub mod style;
pub mod timeline;

pub use animation::presets::{ANIMATION_DURATION_MS, AnimationFrame, AnimationName};
pub use capture::{CaptureController, CaptureSession, CaptureSettings, CaptureStats};
pub use config::CardConfig;
pub use encode::ffmpeg::{FfmpegEncoder, FfmpegEncoderOpts, is_ffmpeg_on_path};
pub use encode::sink::{EncodedVideo, EncoderConfig, InMemoryEncoder, VideoEncoder};
pub use export::{export_png, timestamped_filename, write_png};
pub use foundation::core::{Canvas, Fps, FrameIndex, Vec2};
pub use foundation::error::{ErrorKind, QuoteError, QuoteResult};
pub use preview::region::{CaptionStyle, FontFace, PreviewRegion, TextAlign};
pub use render::backend::FrameRGBA;
pub use render::cpu::PreviewRenderer;
pub use snapshot::{CpuSnapshotter, CrossOrigin, SnapshotJob, SnapshotOpts, Snapshotter};
pub use style::binding::{StyleControls, bind};
pub use style::color::{Rgba, hex_to_rgba, parse_color};
pub use style::image::BackgroundImage;
pub use style::preset::{OverlayControl, PRESETS, StylePreset};
pub use timeline::{Clock, SessionId, SystemClock, Timeline, TimelineEvent, VirtualClock};
