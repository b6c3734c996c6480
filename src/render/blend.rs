//! Pixel blending on [`Frame`] buffers. All blends are linear interpolation in 8-bit sRGB.

use crate::color::Rgb8;
use crate::foundation::error::{CaptionError, CaptionResult};
use crate::foundation::math::{lerp_u8, weight_u8};
use crate::render::frame::{Frame, PixelRect};
use crate::render::glyphs::GlyphMask;

/// `px = lerp(px, color, weight)` for every pixel of `rect` (clipped to the frame).
pub(crate) fn fill_rect_blend(frame: &mut Frame, rect: PixelRect, color: Rgb8, weight: f32) {
    let rect = rect.intersect(frame.bounds());
    if rect.is_empty() {
        return;
    }
    let t = weight_u8(weight);
    if t == 0 {
        return;
    }
    let c = color.to_array();
    for y in rect.y0..rect.y1 {
        let start = frame.offset(rect.x0 as u32, y as u32);
        let end = start + (rect.width() as usize) * 4;
        for px in frame.data[start..end].chunks_exact_mut(4) {
            for i in 0..3 {
                px[i] = lerp_u8(px[i], c[i], t);
            }
        }
    }
}

/// Paint `color` through `mask` placed with its top-left corner at `(x, y)`.
///
/// Each pixel moves toward `color` by the mask coverage; parts of the mask outside the frame are
/// dropped.
pub(crate) fn stamp_mask(frame: &mut Frame, mask: &GlyphMask, x: i32, y: i32, color: Rgb8) {
    let placed = PixelRect::from_origin_size(x, y, mask.width, mask.height);
    let clip = placed.intersect(frame.bounds());
    if clip.is_empty() {
        return;
    }
    let c = color.to_array();
    for fy in clip.y0..clip.y1 {
        let my = (fy - y) as u32;
        for fx in clip.x0..clip.x1 {
            let cov = mask.at((fx - x) as u32, my);
            if cov == 0 {
                continue;
            }
            let o = frame.offset(fx as u32, fy as u32);
            let t = u16::from(cov);
            for i in 0..3 {
                frame.data[o + i] = lerp_u8(frame.data[o + i], c[i], t);
            }
        }
    }
}

/// Blend `draft` (covering `at` in frame space) onto `frame` with weight `opacity`:
/// `frame = lerp(frame, draft, opacity)`.
pub(crate) fn composite_region(
    frame: &mut Frame,
    draft: &Frame,
    at: PixelRect,
    opacity: f32,
) -> CaptionResult<()> {
    if draft.width != at.width() || draft.height != at.height() {
        return Err(CaptionError::render(
            "composite draft size does not match its target region",
        ));
    }
    if at.intersect(frame.bounds()) != at {
        return Err(CaptionError::render(
            "composite region extends outside the frame",
        ));
    }
    let t = weight_u8(opacity);
    if t == 0 {
        return Ok(());
    }
    let row_bytes = (at.width() as usize) * 4;
    for (row, y) in (at.y0..at.y1).enumerate() {
        let start = frame.offset(at.x0 as u32, y as u32);
        let dst = &mut frame.data[start..start + row_bytes];
        let src = &draft.data[row * row_bytes..(row + 1) * row_bytes];
        if t == 255 {
            for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
                d[..3].copy_from_slice(&s[..3]);
            }
            continue;
        }
        for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
            for i in 0..3 {
                d[i] = lerp_u8(d[i], s[i], t);
            }
        }
    }
    Ok(())
}
