use super::*;

fn region() -> PreviewRegion {
    PreviewRegion::new(Canvas::new(200, 100).unwrap())
}

#[test]
fn blank_caption_counts_as_missing() {
    let mut r = region();
    r.set_caption("   ");
    assert_eq!(r.caption(), None);
    r.set_caption("  hello ");
    assert_eq!(r.caption(), Some("hello"));
}

#[test]
fn animate_caption_installs_markers_and_starts_once() {
    let mut r = region();
    r.animate_caption(AnimationName::FadeIn);
    assert!(r.has_marker("animated-text"));
    assert!(r.has_marker("animate__animated"));
    assert!(r.has_marker("animate__fadeIn"));
    assert_eq!(r.animation().unwrap().starts, 1);
}

#[test]
fn restart_with_layout_pass_restarts_from_zero() {
    let mut r = region();
    r.animate_caption(AnimationName::ZoomIn);
    r.force_layout();
    r.seek_animation(400.0);

    let gen_before = r.layout_generation();
    assert!(r.restart_animation());
    let anim = r.animation().unwrap();
    assert_eq!(anim.starts, 2);
    assert_eq!(anim.playhead_ms, 0.0);
    assert!(r.layout_generation() > gen_before);
    assert!(r.has_marker("animate__zoomIn"));
}

#[test]
fn remove_and_add_without_layout_is_coalesced() {
    let mut r = region();
    r.animate_caption(AnimationName::Pulse);
    r.force_layout();
    r.seek_animation(300.0);

    r.remove_marker("animate__pulse");
    r.add_marker("animate__pulse");
    let anim = r.animation().unwrap();
    assert_eq!(anim.starts, 1);
    assert_eq!(anim.playhead_ms, 300.0);
}

#[test]
fn switching_animation_drops_old_marker() {
    let mut r = region();
    r.animate_caption(AnimationName::FadeIn);
    r.animate_caption(AnimationName::Bounce);
    assert!(!r.has_marker("animate__fadeIn"));
    assert!(r.has_marker("animate__bounce"));
    assert_eq!(r.animation().unwrap().name, AnimationName::Bounce);
}

#[test]
fn restart_without_animation_is_noop() {
    let mut r = region();
    assert!(!r.restart_animation());
}

#[test]
fn clear_resets_content() {
    let mut r = region();
    r.set_caption("x");
    r.background_color = Some(Rgba::BLACK);
    r.animate_caption(AnimationName::FadeIn);
    r.clear();
    assert_eq!(r.caption(), None);
    assert!(r.background_color.is_none());
    assert!(r.animation().is_none());
    assert_eq!(r.markers().count(), 0);
}

#[test]
fn animation_frame_is_identity_without_activation_marker() {
    let mut r = region();
    r.animate_caption(AnimationName::FadeIn);
    assert_eq!(r.caption_animation_frame().opacity, 0.0);
    r.remove_marker("animate__fadeIn");
    assert_eq!(
        r.caption_animation_frame(),
        crate::animation::presets::AnimationFrame::IDENTITY
    );
}

#[test]
fn align_flag_names_match_card_names() {
    use clap::ValueEnum as _;
    for align in [TextAlign::Left, TextAlign::Center, TextAlign::Right] {
        let name = serde_json::to_value(align).unwrap();
        let name = name.as_str().unwrap();
        assert_eq!(TextAlign::from_str(name, false).unwrap(), align);
    }
    assert!(TextAlign::from_str("justify", false).is_err());
}

#[test]
fn builtin_font_is_shared_and_identified_by_bytes() {
    let a = FontFace::builtin();
    let b = FontFace::builtin();
    assert!(Arc::ptr_eq(a.bytes(), b.bytes()));
    assert_eq!(a, b);

    let renamed = FontFace::new("Other", a.bytes().as_ref().clone());
    assert_eq!(renamed.id(), a.id());
    let other = FontFace::new("DejaVu Sans", b"not a font".to_vec());
    assert_ne!(other.id(), a.id());
    assert_eq!(CaptionStyle::default().font, a);
}
