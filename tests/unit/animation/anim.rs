use super::*;
use serde_json::json;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn pulse_hits_documented_values() {
    let m = modifiers(AnimationMode::Pulse, 0.25);
    assert!(approx(m.opacity, 1.0), "got {}", m.opacity);
    assert_eq!(m.offset, (0, 0));

    let m = modifiers(AnimationMode::Pulse, 0.0);
    assert!(approx(m.opacity, 0.7), "got {}", m.opacity);

    let m = modifiers(AnimationMode::Pulse, 0.75);
    assert!(approx(m.opacity, 0.4), "got {}", m.opacity);
}

#[test]
fn pulse_does_not_decay() {
    let a = modifiers(AnimationMode::Pulse, 0.25);
    let b = modifiers(AnimationMode::Pulse, 10.25);
    assert!((a.opacity - b.opacity).abs() < 1e-4);
}

#[test]
fn fade_ramps_in_then_holds() {
    assert!(approx(modifiers(AnimationMode::Fade, 0.0).opacity, 0.0));
    assert!(approx(modifiers(AnimationMode::Fade, 0.25).opacity, 0.5));
    assert!(approx(modifiers(AnimationMode::Fade, 0.5).opacity, 1.0));
    assert!(approx(modifiers(AnimationMode::Fade, 30.0).opacity, 1.0));
}

#[test]
fn slide_settles_after_one_second() {
    assert_eq!(modifiers(AnimationMode::Slide, 0.0).offset, (0, 50));
    assert_eq!(modifiers(AnimationMode::Slide, 0.5).offset, (0, 25));
    assert_eq!(modifiers(AnimationMode::Slide, 1.0).offset, (0, 0));
    assert_eq!(modifiers(AnimationMode::Slide, 4.0).offset, (0, 0));
    assert!(approx(modifiers(AnimationMode::Slide, 0.3).opacity, 1.0));
}

#[test]
fn unknown_modes_are_identity() {
    let Ok(mode) = "wobble".parse::<AnimationMode>();
    assert_eq!(mode, AnimationMode::None);
    for t in [0.0, 0.3, 7.0] {
        assert_eq!(modifiers(mode, t), Modifiers::IDENTITY);
    }
}

#[test]
fn mode_names_parse_case_insensitively() {
    let Ok(mode) = "Fade".parse::<AnimationMode>();
    assert_eq!(mode, AnimationMode::Fade);
    let Ok(mode) = " PULSE ".parse::<AnimationMode>();
    assert_eq!(mode, AnimationMode::Pulse);
}

#[test]
fn fade_out_needs_segment_duration() {
    let anim = Animation {
        mode: AnimationMode::Fade,
        ease: Ease::Linear,
        fade_out: true,
    };
    assert!(approx(anim.modifiers(1.9).opacity, 1.0));
    assert!(approx(anim.modifiers_in_segment(1.0, 2.0).opacity, 1.0));
    assert!(approx(anim.modifiers_in_segment(1.75, 2.0).opacity, 0.5));
    assert!(approx(anim.modifiers_in_segment(2.0, 2.0).opacity, 0.0));

    let no_fade_out = Animation::from(AnimationMode::Fade);
    assert!(approx(no_fade_out.modifiers_in_segment(1.75, 2.0).opacity, 1.0));
}

#[test]
fn easing_reshapes_slide_progress() {
    let anim = Animation {
        mode: AnimationMode::Slide,
        ease: Ease::OutQuad,
        fade_out: false,
    };
    // OutQuad(0.5) = 0.75
    assert_eq!(anim.modifiers(0.5).offset, (0, 13));
}

#[test]
fn negative_or_non_finite_time_is_treated_as_start() {
    assert_eq!(
        modifiers(AnimationMode::Slide, -1.0),
        modifiers(AnimationMode::Slide, 0.0)
    );
    assert_eq!(
        modifiers(AnimationMode::Fade, f64::NAN),
        modifiers(AnimationMode::Fade, 0.0)
    );
}

#[test]
fn deserializes_from_name_or_object() {
    let a: Animation = serde_json::from_value(json!("slide")).unwrap();
    assert_eq!(a, Animation::from(AnimationMode::Slide));

    let a: Animation = serde_json::from_value(json!("sparkle")).unwrap();
    assert_eq!(a.mode, AnimationMode::None);

    let a: Animation =
        serde_json::from_value(json!({"mode": "fade", "ease": "out_cubic", "fade_out": true}))
            .unwrap();
    assert_eq!(
        a,
        Animation {
            mode: AnimationMode::Fade,
            ease: Ease::OutCubic,
            fade_out: true,
        }
    );
}
