use super::*;

fn cfg() -> EncoderConfig {
    EncoderConfig {
        width: 2,
        height: 2,
        fps: Fps::default(),
    }
}

#[test]
fn in_memory_lifecycle_records_frames() {
    let mut enc = InMemoryEncoder::new();
    enc.start(cfg()).unwrap();
    assert!(enc.is_capturing());
    enc.capture(FrameIndex(1), &FrameRGBA::transparent(2, 2)).unwrap();
    enc.capture(FrameIndex(0), &FrameRGBA::transparent(2, 2)).unwrap();
    enc.stop().unwrap();
    let out = enc.save().unwrap();

    assert_eq!(out.frames_encoded, 2);
    assert_eq!(out.path, None);
    assert_eq!(enc.config(), Some(cfg()));
    assert_eq!(enc.saves(), 1);
    let order: Vec<u64> = enc.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(order, vec![1, 0]);
}

#[test]
fn in_memory_rejects_out_of_lifecycle_calls() {
    let mut enc = InMemoryEncoder::new();
    assert!(enc.capture(FrameIndex(0), &FrameRGBA::transparent(1, 1)).is_err());
    assert!(enc.stop().is_err());
    assert!(enc.save().is_err());

    enc.start(cfg()).unwrap();
    assert!(enc.start(cfg()).is_err());
    assert!(enc.save().is_err());
}
