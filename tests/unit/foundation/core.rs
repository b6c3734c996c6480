use super::*;

#[test]
fn fps_validation() {
    assert!(Fps::new(30, 1).is_ok());
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
}

#[test]
fn frame_time_uses_rational_rate() {
    let fps = Fps::new(5, 1).unwrap();
    assert_eq!(fps.frame_time_secs(FrameIndex(0)), 0.0);
    assert_eq!(fps.frame_time_secs(FrameIndex(5)), 1.0);

    let ntsc = Fps::new(30000, 1001).unwrap();
    let t = ntsc.frame_time_secs(FrameIndex(30000));
    assert!((t - 1001.0).abs() < 1e-9);
}

#[test]
fn secs_to_frames_floor_absorbs_summation_error() {
    let fps = Fps::new(10, 1).unwrap();
    assert_eq!(fps.secs_to_frames_floor(0.1 + 0.2), 3);
    assert_eq!(fps.secs_to_frames_floor(0.35), 3);
    assert_eq!(fps.secs_to_frames_floor(0.0), 0);
    assert_eq!(fps.secs_to_frames_floor(-1.0), 0);
    assert_eq!(fps.secs_to_frames_floor(f64::NAN), 0);
}

#[test]
fn parse_ratio_accepts_ffprobe_forms() {
    assert_eq!(Fps::parse_ratio("30/1"), Some(Fps { num: 30, den: 1 }));
    assert_eq!(
        Fps::parse_ratio("30000/1001"),
        Some(Fps {
            num: 30000,
            den: 1001
        })
    );
    assert_eq!(Fps::parse_ratio("25"), Some(Fps { num: 25, den: 1 }));
    assert_eq!(Fps::parse_ratio("0/0"), None);
    assert_eq!(Fps::parse_ratio("0/1"), None);
    assert_eq!(Fps::parse_ratio("abc"), None);
}

#[test]
fn display_is_ffmpeg_ratio() {
    assert_eq!(Fps::new(24, 1).unwrap().to_string(), "24/1");
}
