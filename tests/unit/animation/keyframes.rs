use super::*;

#[test]
fn curves_keep_segment_endpoints() {
    for e in [
        Ease::Linear,
        Ease::OutQuad,
        Ease::InOutQuad,
        Ease::OutCubic,
        Ease::InOutCubic,
    ] {
        assert!(e.apply(0.0).abs() < 1e-12, "{e:?}");
        assert!((e.apply(1.0) - 1.0).abs() < 1e-12, "{e:?}");
    }
    assert!((Ease::InOutCubic.apply(0.5) - 0.5).abs() < 1e-12);
    assert!(Ease::OutQuad.apply(0.5) > 0.5);
}

#[test]
fn track_interpolates_between_stops() {
    let t = Track::new(&[(0.0, 0.0), (0.5, 10.0), (1.0, 10.0)], Ease::Linear);
    assert_eq!(t.sample(0.25), 5.0);
    assert_eq!(t.sample(0.75), 10.0);
}

#[test]
fn track_holds_outside_its_stops() {
    let t = Track::new(&[(0.2, 1.0), (0.8, 3.0)], Ease::OutCubic);
    assert_eq!(t.sample(0.0), 1.0);
    assert_eq!(t.sample(1.0), 3.0);
    assert_eq!(Track::new(&[], Ease::Linear).sample(0.5), 0.0);
}

#[test]
fn coincident_stops_jump() {
    let t = Track::new(&[(0.0, 0.0), (0.5, 0.0), (0.5, 4.0), (1.0, 4.0)], Ease::Linear);
    assert_eq!(t.sample(0.5), 0.0);
    assert_eq!(t.sample(0.51), 4.0);
}
