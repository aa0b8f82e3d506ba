//! Still-image export: snapshot the preview and deliver it as a timestamped PNG.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use chrono::{DateTime, TimeZone};

use crate::foundation::error::{QuoteError, QuoteResult};
use crate::preview::region::PreviewRegion;
use crate::render::backend::FrameRGBA;
use crate::snapshot::{SnapshotOpts, Snapshotter};

/// `<prefix>-YYYYMMDD-HHMMSS-mmm.<ext>`, e.g. `quotecast-20260301-142530-042.png`.
pub fn timestamped_filename<Tz>(prefix: &str, ext: &str, at: DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!("{prefix}-{}.{ext}", at.format("%Y%m%d-%H%M%S-%3f"))
}

/// Write `frame` as a straight-alpha PNG at `path`.
pub fn write_png(frame: &FrameRGBA, path: &Path) -> QuoteResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let rgba = frame.to_straight_rgba8();
    image::save_buffer_with_format(
        path,
        &rgba,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

/// Snapshot `region` and deliver the PNG into `out_dir` under a timestamped name.
///
/// Unlike the capture loop, a snapshot failure here is returned to the caller.
#[tracing::instrument(skip(region, snapshotter, opts))]
pub fn export_png(
    region: &PreviewRegion,
    snapshotter: &mut dyn Snapshotter,
    opts: &SnapshotOpts,
    out_dir: &Path,
) -> QuoteResult<PathBuf> {
    if region.caption().is_none() {
        return Err(QuoteError::EmptyInput);
    }
    let frame = snapshotter.snapshot(region, opts).result?;
    let path = out_dir.join(timestamped_filename(
        "quotecast",
        "png",
        chrono::Local::now(),
    ));
    write_png(&frame, &path)?;
    tracing::info!(path = %path.display(), "image saved");
    Ok(path)
}

#[cfg(test)]
#[path = "../../tests/unit/export/mod.rs"]
mod tests;
