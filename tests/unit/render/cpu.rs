use std::io::Cursor;

use super::*;
use crate::animation::presets::AnimationName;

fn region(w: u32, h: u32) -> PreviewRegion {
    PreviewRegion::new(Canvas::new(w, h).unwrap())
}

fn opts(transparent: bool) -> SnapshotOpts {
    SnapshotOpts {
        transparent_background: transparent,
        ..SnapshotOpts::default()
    }
}

fn png_1x1(rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_raw(1, 1, rgba.to_vec()).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn empty_region_is_transparent_or_white() {
    let r = region(8, 4);
    let mut renderer = PreviewRenderer::new();

    let f = renderer.render(&r, &opts(true)).unwrap();
    assert_eq!((f.width, f.height), (8, 4));
    assert!(f.premultiplied);
    assert!(f.data.iter().all(|&b| b == 0));

    let f = renderer.render(&r, &opts(false)).unwrap();
    assert_eq!(f.pixel(4, 2), Some([255, 255, 255, 255]));
}

#[test]
fn background_color_fills_region() {
    let mut r = region(8, 4);
    r.background_color = Some(Rgba::opaque(255, 0, 0));
    let f = PreviewRenderer::new().render(&r, &opts(true)).unwrap();
    assert_eq!(f.pixel(0, 0), Some([255, 0, 0, 255]));
    assert_eq!(f.pixel(7, 3), Some([255, 0, 0, 255]));
}

#[test]
fn scale_multiplies_output_size() {
    let mut r = region(8, 4);
    r.background_color = Some(Rgba::BLACK);
    let o = SnapshotOpts {
        scale: 2.0,
        ..SnapshotOpts::default()
    };
    let f = PreviewRenderer::new().render(&r, &o).unwrap();
    assert_eq!((f.width, f.height), (16, 8));
    assert_eq!(f.pixel(15, 7), Some([0, 0, 0, 255]));
}

#[test]
fn half_overlay_darkens_background() {
    let mut r = region(8, 4);
    r.background_color = Some(Rgba::WHITE);
    r.overlay = Some(crate::style::color::hex_to_rgba("#000000", 50.0).unwrap());
    let f = PreviewRenderer::new().render(&r, &opts(true)).unwrap();
    let [red, green, blue, a] = f.pixel(4, 2).unwrap();
    assert_eq!(a, 255);
    for c in [red, green, blue] {
        assert!((i16::from(c) - 127).abs() <= 2, "got {c}");
    }
}

#[test]
fn linked_image_respects_cross_origin_mode() {
    let dir = std::env::temp_dir().join(format!("quotecast_cors_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("blue.png");
    std::fs::write(&path, png_1x1([0, 0, 255, 255])).unwrap();

    let mut r = region(8, 4);
    r.background_color = Some(Rgba::opaque(255, 0, 0));
    r.background_image = Some(BackgroundImage::link(&path).unwrap());

    let mut renderer = PreviewRenderer::new();
    let anon = renderer.render(&r, &opts(true)).unwrap();
    assert_eq!(anon.pixel(4, 2), Some([255, 0, 0, 255]));

    let cred = SnapshotOpts {
        cross_origin: CrossOrigin::UseCredentials,
        ..opts(true)
    };
    let f = renderer.render(&r, &cred).unwrap();
    assert_eq!(f.pixel(4, 2), Some([0, 0, 255, 255]));
}

#[test]
fn embedded_image_covers_region() {
    let mut r = region(8, 4);
    r.background_image = Some(BackgroundImage::from_upload(&png_1x1([0, 255, 0, 255])).unwrap());
    let f = PreviewRenderer::new().render(&r, &opts(true)).unwrap();
    assert_eq!(f.pixel(1, 1), Some([0, 255, 0, 255]));
    assert_eq!(f.pixel(6, 2), Some([0, 255, 0, 255]));
}

fn captioned(text: &str, align: TextAlign) -> PreviewRegion {
    let mut r = region(200, 100);
    r.set_caption(text);
    r.caption_style.align = align;
    r
}

/// Horizontal extent and peak alpha of every pixel with any coverage.
fn ink(f: &FrameRGBA) -> Option<(u32, u32, u8)> {
    let mut found: Option<(u32, u32, u8)> = None;
    for y in 0..f.height {
        for x in 0..f.width {
            let a = f.pixel(x, y).unwrap()[3];
            if a == 0 {
                continue;
            }
            found = Some(match found {
                None => (x, x, a),
                Some((lo, hi, peak)) => (lo.min(x), hi.max(x), peak.max(a)),
            });
        }
    }
    found
}

#[test]
fn caption_draws_with_builtin_font() {
    let r = captioned("Hi", TextAlign::Center);
    let f = PreviewRenderer::new().render(&r, &opts(true)).unwrap();
    let (lo, hi, peak) = ink(&f).expect("caption left no ink");
    assert_eq!(peak, 255);
    // Centered block: ink straddles the middle column.
    assert!(lo < 100 && hi > 100, "ink spans {lo}..={hi}");
}

#[test]
fn alignment_shifts_caption_ink() {
    let mut renderer = PreviewRenderer::new();
    let left = renderer
        .render(&captioned("Hi", TextAlign::Left), &opts(true))
        .unwrap();
    let right = renderer
        .render(&captioned("Hi", TextAlign::Right), &opts(true))
        .unwrap();
    let (left_lo, left_hi, _) = ink(&left).unwrap();
    let (right_lo, right_hi, _) = ink(&right).unwrap();

    // The caption block spans x = 20..180.
    assert!((20..40).contains(&left_lo), "left ink starts at {left_lo}");
    assert!((160..=180).contains(&right_hi), "right ink ends at {right_hi}");
    assert!(right_lo > left_hi);
}

#[test]
fn fade_in_at_first_frame_draws_no_ink() {
    let mut r = captioned("Hi", TextAlign::Center);
    r.animate_caption(AnimationName::FadeIn);
    r.seek_animation(0.0);
    let f = PreviewRenderer::new().render(&r, &opts(true)).unwrap();
    assert_eq!(ink(&f), None);
}

#[test]
fn fade_in_midway_draws_translucent_ink() {
    let mut r = captioned("Hi", TextAlign::Center);
    r.animate_caption(AnimationName::FadeIn);
    r.seek_animation(500.0);
    let f = PreviewRenderer::new().render(&r, &opts(true)).unwrap();
    let (_, _, peak) = ink(&f).unwrap();
    assert!((100..=155).contains(&peak), "peak alpha {peak}");
}

#[test]
fn repeated_renders_are_identical() {
    let mut r = captioned("Stay curious", TextAlign::Center);
    r.background_color = Some(Rgba::opaque(20, 40, 60));
    let mut renderer = PreviewRenderer::new();
    let first = renderer.render(&r, &opts(true)).unwrap();
    let cached = renderer.render(&r, &opts(true)).unwrap();
    let fresh = PreviewRenderer::new().render(&r, &opts(true)).unwrap();
    assert_eq!(first.data, cached.data);
    assert_eq!(first.data, fresh.data);
}

#[test]
fn switching_font_invalidates_caption_layout() {
    let mono = crate::style::binding::load_font(
        &std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures/fonts/DejaVuSansMono.ttf"),
    )
    .unwrap();
    let mut r = captioned("iiii", TextAlign::Left);
    let mut renderer = PreviewRenderer::new();
    let sans = renderer.render(&r, &opts(true)).unwrap();
    r.caption_style.font = mono;
    let mono = renderer.render(&r, &opts(true)).unwrap();

    let (_, sans_hi, _) = ink(&sans).unwrap();
    let (_, mono_hi, _) = ink(&mono).unwrap();
    assert!(mono_hi > sans_hi, "sans ends at {sans_hi}, mono at {mono_hi}");
}

#[test]
fn invalid_scale_is_rejected() {
    let r = region(8, 4);
    let o = SnapshotOpts {
        scale: 0.0,
        ..SnapshotOpts::default()
    };
    assert!(PreviewRenderer::new().render(&r, &o).is_err());
}
