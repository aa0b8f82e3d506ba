use super::*;

fn controls(caption: &str) -> StyleControls {
    StyleControls {
        caption: caption.to_owned(),
        canvas: Canvas::new(64, 32).unwrap(),
        ..StyleControls::default()
    }
}

#[test]
fn empty_caption_is_rejected_and_region_untouched() {
    let mut region = PreviewRegion::new(Canvas::new(10, 10).unwrap());
    region.set_caption("keep me");

    let err = bind(&controls("  \n "), &mut region).unwrap_err();
    assert!(matches!(err, QuoteError::EmptyInput));
    assert_eq!(region.caption(), Some("keep me"));
}

#[test]
fn required_image_must_be_present() {
    let mut c = controls("hello");
    c.require_image = true;
    let mut region = PreviewRegion::new(Canvas::default());
    assert!(matches!(
        bind(&c, &mut region).unwrap_err(),
        QuoteError::MissingImage
    ));
}

#[test]
fn bind_applies_style_and_animation() {
    let mut c = controls("  Stay curious  ");
    c.background_color = Some(Rgba::opaque(1, 2, 3));
    c.overlay = Some(OverlayControl {
        color: "#ff0000".to_owned(),
        opacity: 50.0,
    });
    c.animation = AnimationName::ZoomIn;

    let mut region = PreviewRegion::new(Canvas::default());
    bind(&c, &mut region).unwrap();

    assert_eq!(region.caption(), Some("Stay curious"));
    assert_eq!(region.size, Canvas::new(64, 32).unwrap());
    assert_eq!(region.background_color, Some(Rgba::opaque(1, 2, 3)));
    assert_eq!(
        region.overlay.unwrap().to_string(),
        "rgba(255, 0, 0, 0.5)"
    );
    assert!(region.has_marker("animate__zoomIn"));
    assert_eq!(region.animation().unwrap().name, AnimationName::ZoomIn);
}

#[test]
fn preset_values_fill_unset_controls_and_explicit_values_win() {
    let mut c = controls("x");
    c.preset = Some("midnight".to_owned());
    c.text_color = Some(Rgba::opaque(9, 9, 9));
    let s = c.resolve().unwrap();
    assert_eq!(s.font_size_px, 40.0);
    assert_eq!(s.text_color, Rgba::opaque(9, 9, 9));
    assert_eq!(s.overlay.unwrap().to_string(), "rgba(0, 0, 0, 0.35)");
}

#[test]
fn apply_preset_is_atomic() {
    let mut c = controls("x");
    c.font_size_px = Some(12.0);

    assert!(c.apply_preset("nope").is_err());
    assert_eq!(c.font_size_px, Some(12.0));
    assert_eq!(c.preset, None);

    c.apply_preset("bold").unwrap();
    assert_eq!(c.preset.as_deref(), Some("bold"));
    assert_eq!(c.font_size_px, None);
    assert_eq!(c.resolve().unwrap().font_size_px, 56.0);
}

#[test]
fn invalid_font_size_is_rejected() {
    let mut c = controls("x");
    c.font_size_px = Some(0.0);
    assert!(c.resolve().is_err());
}

#[test]
fn controls_deserialize_with_defaults() {
    let c: StyleControls = serde_json::from_value(serde_json::json!({
        "caption": "hi",
        "animation": "bounceIn",
        "overlay": { "color": "#00ff00", "opacity": 25 }
    }))
    .unwrap();
    assert_eq!(c.caption, "hi");
    assert_eq!(c.animation, AnimationName::BounceIn);
    assert!(c.embed_image);
    assert_eq!(c.canvas, Canvas::default());
    assert_eq!(
        c.resolve().unwrap().overlay.unwrap().to_string(),
        "rgba(0, 255, 0, 0.25)"
    );
}

#[test]
fn missing_font_file_is_an_error() {
    assert!(load_font(Path::new("/nonexistent/quotecast/font.ttf")).is_err());
}

fn mono_font_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/fonts/DejaVuSansMono.ttf")
}

#[test]
fn bind_without_font_uses_builtin_face() {
    let mut region = PreviewRegion::new(Canvas::default());
    bind(&controls("hello"), &mut region).unwrap();
    assert_eq!(region.caption_style.font, FontFace::builtin());
}

#[test]
fn configured_font_file_replaces_builtin_face() {
    let mut c = controls("hello");
    c.font_path = Some(mono_font_path());
    let mut region = PreviewRegion::new(Canvas::default());
    bind(&c, &mut region).unwrap();

    let font = &region.caption_style.font;
    assert_eq!(font.label, "DejaVuSansMono");
    assert_ne!(font.id(), FontFace::builtin().id());
}
