use super::*;

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
    assert_eq!(Fps::new(30, 1).unwrap(), Fps::default());
}

#[test]
fn thirty_fps_covers_two_seconds_in_sixty_ticks() {
    let fps = Fps::default();
    assert!((fps.frame_interval_ms() - 1000.0 / 30.0).abs() < 1e-12);
    assert_eq!(fps.ticks_for_duration(2000), 60);
    assert!(!fps.ticks_reach(59, 2000));
    assert!(fps.ticks_reach(60, 2000));
}

#[test]
fn ntsc_rate_rounds_tick_count_up() {
    let fps = Fps::new(30000, 1001).unwrap();
    // 1000 ms * 29.97 fps = 29.97 frames.
    assert_eq!(fps.ticks_for_duration(1000), 30);
    assert!(fps.ticks_reach(30, 1000));
    assert!(!fps.ticks_reach(29, 1000));
}

#[test]
fn canvas_validation_and_scaling() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(70_000, 10).is_err());
    let c = Canvas::new(300, 200).unwrap();
    assert_eq!(
        c.scaled(2.0),
        Canvas {
            width: 600,
            height: 400
        }
    );
    assert_eq!(c.scaled(0.001).width, 1);
}
