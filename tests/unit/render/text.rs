use super::*;
use crate::color::Rgb8;
use crate::foundation::error::CaptionError;

/// Every character is a solid 10px-wide block, `size` tall.
#[derive(Default)]
struct SolidRasterizer {
    calls: usize,
}

impl GlyphRasterizer for SolidRasterizer {
    fn rasterize(&mut self, text: &str, size_px: f32) -> CaptionResult<GlyphMask> {
        self.calls += 1;
        if size_px <= 0.0 {
            return Err(CaptionError::validation("size"));
        }
        let w = 10 * text.chars().count() as u32;
        let h = size_px as u32;
        GlyphMask::new(w, h, vec![255; (w * h) as usize])
    }
}

const BASE: Rgb8 = Rgb8::new(40, 80, 120);

fn frame() -> Frame {
    Frame::solid(200, 100, BASE)
}

fn style() -> Style {
    Style {
        size: 20.0,
        ..Style::default()
    }
}

fn art(style: &Style) -> CaptionArt {
    CaptionArt::prepare(&mut SolidRasterizer::default(), "ab", style).unwrap()
}

#[test]
fn text_is_centered() {
    let s = style();
    let a = art(&s);
    assert_eq!((a.fill.width, a.fill.height), (20, 20));
    assert_eq!(a.origin_in(200, 100, (0, 0)), (90, 40));
    assert_eq!(a.origin_in(200, 100, (0, 50)), (90, 90));
    // Wider than the frame: still centered, starting left of 0.
    assert_eq!(a.origin_in(10, 10, (0, 0)), (-5, -5));
}

#[test]
fn full_opacity_fill_replaces_text_pixels() {
    let s = style();
    let mut f = frame();
    draw_caption(&mut f, &art(&s), &s, Modifiers::IDENTITY).unwrap();
    assert_eq!(f.rgb_at(100, 50), s.color);
    assert_eq!(f.rgb_at(5, 5), BASE);
}

#[test]
fn background_panel_at_full_opacity_is_pure_color() {
    let s = Style {
        bg_color: Some(Rgb8::new(255, 0, 0)),
        bg_opacity: 1.0,
        ..style()
    };
    let mut f = frame();
    draw_caption(&mut f, &art(&s), &s, Modifiers::IDENTITY).unwrap();

    // Panel is [70, 130) x [20, 80); glyph, outline and shadow stay inside [88, 114) x [38, 64).
    for (x, y) in [(70, 20), (75, 50), (129, 79), (120, 30)] {
        assert_eq!(f.rgb_at(x, y), Rgb8::new(255, 0, 0), "({x}, {y})");
    }
    assert_eq!(f.rgb_at(69, 50), BASE);
    assert_eq!(f.rgb_at(130, 50), BASE);
    assert_eq!(f.rgb_at(100, 19), BASE);
}

#[test]
fn background_panel_at_zero_opacity_keeps_frame() {
    let s = Style {
        bg_color: Some(Rgb8::new(255, 0, 0)),
        bg_opacity: 0.0,
        ..style()
    };
    let mut f = frame();
    draw_caption(&mut f, &art(&s), &s, Modifiers::IDENTITY).unwrap();
    assert_eq!(f.rgb_at(75, 50), BASE);
    assert_eq!(f.rgb_at(100, 50), s.color);
}

#[test]
fn background_panel_blends_linearly() {
    let s = Style {
        bg_color: Some(Rgb8::new(240, 0, 0)),
        bg_opacity: 0.5,
        ..style()
    };
    let mut f = Frame::solid(200, 100, Rgb8::BLACK);
    draw_caption(&mut f, &art(&s), &s, Modifiers::IDENTITY).unwrap();
    assert_eq!(f.rgb_at(75, 50), Rgb8::new(120, 0, 0));
}

#[test]
fn panel_is_clipped_to_frame() {
    let s = Style {
        size: 90.0,
        bg_color: Some(Rgb8::WHITE),
        bg_opacity: 1.0,
        ..style()
    };
    let mut f = frame();
    draw_caption(&mut f, &art(&s), &s, Modifiers::IDENTITY).unwrap();
    assert_eq!(f.rgb_at(75, 0), Rgb8::WHITE);
    assert_eq!(f.rgb_at(75, 99), Rgb8::WHITE);
}

#[test]
fn stroke_surrounds_glyphs() {
    let s = Style {
        shadow: false,
        stroke_color: Rgb8::new(0, 255, 0),
        ..style()
    };
    let mut f = frame();
    draw_caption(&mut f, &art(&s), &s, Modifiers::IDENTITY).unwrap();
    assert_eq!(f.rgb_at(89, 50), Rgb8::new(0, 255, 0));
    assert_eq!(f.rgb_at(88, 50), Rgb8::new(0, 255, 0));
    assert_eq!(f.rgb_at(87, 50), BASE);
    assert_eq!(f.rgb_at(110, 38), Rgb8::new(0, 255, 0));
    assert_eq!(f.rgb_at(90, 50), s.color);
}

#[test]
fn zero_stroke_width_draws_no_outline() {
    let s = Style {
        shadow: false,
        stroke_width: 0,
        ..style()
    };
    let a = art(&s);
    assert!(a.outline.is_none());
    let mut f = frame();
    draw_caption(&mut f, &a, &s, Modifiers::IDENTITY).unwrap();
    assert_eq!(f.rgb_at(89, 50), BASE);
}

#[test]
fn shadow_is_offset() {
    let s = Style {
        stroke_width: 0,
        shadow_color: Rgb8::new(0, 0, 255),
        shadow_offset: (3, 3),
        ..style()
    };
    let mut f = frame();
    draw_caption(&mut f, &art(&s), &s, Modifiers::IDENTITY).unwrap();
    assert_eq!(f.rgb_at(111, 61), Rgb8::new(0, 0, 255));
    assert_eq!(f.rgb_at(100, 50), s.color);
    assert_eq!(f.rgb_at(91, 41), s.color);
}

#[test]
fn zero_opacity_leaves_frame_untouched() {
    let s = Style {
        bg_color: Some(Rgb8::WHITE),
        bg_opacity: 1.0,
        ..style()
    };
    let mut f = frame();
    let before = f.clone();
    let m = Modifiers {
        opacity: 0.0,
        offset: (0, 0),
    };
    draw_caption(&mut f, &art(&s), &s, m).unwrap();
    assert_eq!(f, before);
}

#[test]
fn partial_opacity_blends_against_original() {
    let s = Style {
        color: Rgb8::new(200, 200, 200),
        ..style()
    };
    let mut f = Frame::solid(200, 100, Rgb8::BLACK);
    let m = Modifiers {
        opacity: 0.5,
        offset: (0, 0),
    };
    draw_caption(&mut f, &art(&s), &s, m).unwrap();
    assert_eq!(f.rgb_at(100, 50), Rgb8::new(100, 100, 100));
}

#[test]
fn offset_moves_the_caption() {
    let s = Style {
        shadow: false,
        stroke_width: 0,
        ..style()
    };
    let mut f = frame();
    let m = Modifiers {
        opacity: 1.0,
        offset: (0, 30),
    };
    draw_caption(&mut f, &art(&s), &s, m).unwrap();
    assert_eq!(f.rgb_at(100, 50), BASE);
    assert_eq!(f.rgb_at(100, 75), s.color);
}

#[test]
fn caption_fully_off_frame_is_a_noop() {
    let s = style();
    let mut f = frame();
    let before = f.clone();
    let m = Modifiers {
        opacity: 1.0,
        offset: (0, 500),
    };
    draw_caption(&mut f, &art(&s), &s, m).unwrap();
    assert_eq!(f, before);
}

#[test]
fn renderer_caches_rasterized_text() {
    let s = style();
    let mut r = TextRenderer::new(SolidRasterizer::default());
    let mut f = frame();
    r.render(&mut f, "ab", &s, Modifiers::IDENTITY).unwrap();
    r.render(&mut f, "ab", &s, Modifiers::IDENTITY).unwrap();
    r.render(&mut f, "abc", &s, Modifiers::IDENTITY).unwrap();
    assert_eq!(r.into_inner().calls, 2);
}

#[test]
fn renderer_skips_rasterizing_invisible_captions() {
    let s = style();
    let mut r = TextRenderer::new(SolidRasterizer::default());
    let mut f = frame();
    let m = Modifiers {
        opacity: 0.0,
        offset: (0, 0),
    };
    r.render(&mut f, "ab", &s, m).unwrap();
    assert_eq!(r.into_inner().calls, 0);
}

#[test]
fn extreme_offsets_clip_instead_of_overflowing() {
    let s = style();
    let a = art(&s);
    let far_shadow = Style {
        shadow_offset: (i32::MAX, i32::MIN),
        ..style()
    };
    let mut f = frame();
    draw_caption(&mut f, &a, &far_shadow, Modifiers::IDENTITY).unwrap();
    assert_eq!(f.rgb_at(100, 50), s.color);

    let mut f = frame();
    let before = f.clone();
    let m = Modifiers {
        opacity: 1.0,
        offset: (i32::MIN, i32::MAX),
    };
    draw_caption(&mut f, &a, &s, m).unwrap();
    assert_eq!(f, before);
}

#[test]
fn oversized_stroke_is_rejected_before_rasterizing() {
    let s = Style {
        stroke_width: u32::MAX,
        ..style()
    };
    let mut r = SolidRasterizer::default();
    let err = CaptionArt::prepare(&mut r, "ab", &s).unwrap_err();
    assert!(matches!(err, CaptionError::Validation(_)));
    assert_eq!(r.calls, 0);

    let a = CaptionArt::from_mask(GlyphMask::empty(2, 2), u32::MAX);
    assert_eq!(a.stroke_width, MAX_STROKE_WIDTH_PX);
    assert_eq!(a.outline.unwrap().width, 2 + 2 * MAX_STROKE_WIDTH_PX);
}
