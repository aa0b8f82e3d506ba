use super::*;
use crate::foundation::core::Canvas;
use crate::snapshot::{CpuSnapshotter, SnapshotJob};
use crate::style::color::Rgba;
use chrono::Utc;

struct FailingSnapshotter;

impl Snapshotter for FailingSnapshotter {
    fn snapshot(&mut self, _region: &PreviewRegion, _opts: &SnapshotOpts) -> SnapshotJob {
        SnapshotJob::ready(Err(QuoteError::snapshot("tainted canvas")))
    }
}

fn out_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("quotecast_export_{name}_{}", std::process::id()))
}

#[test]
fn filename_is_derived_from_timestamp() {
    let at = Utc.with_ymd_and_hms(2026, 3, 1, 14, 25, 30).unwrap();
    assert_eq!(
        timestamped_filename("quotecast", "png", at),
        "quotecast-20260301-142530-000.png"
    );
}

#[test]
fn export_writes_straight_alpha_png() {
    let mut region = PreviewRegion::new(Canvas::new(200, 100).unwrap());
    region.set_caption("hello");
    region.background_color = Some(Rgba {
        r: 255,
        g: 0,
        b: 0,
        a: 0.5,
    });

    let dir = out_dir("ok");
    let path = export_png(
        &region,
        &mut CpuSnapshotter::new(),
        &SnapshotOpts::default(),
        &dir,
    )
    .unwrap();
    assert!(path.starts_with(&dir));
    assert_eq!(path.extension().unwrap(), "png");

    let img = image::open(&path).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (200, 100));
    // Corner pixel, outside the caption block.
    let px = img.get_pixel(2, 2).0;
    assert!(px[0] >= 253, "red should survive unpremultiply, got {px:?}");
    assert_eq!(px[1], 0);
    assert!((i16::from(px[3]) - 128).abs() <= 1);
}

#[test]
fn export_requires_caption() {
    let region = PreviewRegion::new(Canvas::new(2, 2).unwrap());
    let err = export_png(
        &region,
        &mut CpuSnapshotter::new(),
        &SnapshotOpts::default(),
        &out_dir("empty"),
    )
    .unwrap_err();
    assert!(matches!(err, QuoteError::EmptyInput));
}

#[test]
fn snapshot_failure_surfaces_to_caller() {
    let mut region = PreviewRegion::new(Canvas::new(2, 2).unwrap());
    region.set_caption("x");
    let err = export_png(
        &region,
        &mut FailingSnapshotter,
        &SnapshotOpts::default(),
        &out_dir("fail"),
    )
    .unwrap_err();
    assert_eq!(err.kind(), crate::foundation::error::ErrorKind::Snapshot);
}
