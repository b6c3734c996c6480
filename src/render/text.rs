use std::collections::HashMap;

use crate::animation::anim::Modifiers;
use crate::foundation::error::CaptionResult;
use crate::render::blend::{composite_region, fill_rect_blend, stamp_mask};
use crate::render::frame::{Frame, PixelRect};
use crate::render::glyphs::{GlyphMask, GlyphRasterizer};
use crate::style::{MAX_STROKE_WIDTH_PX, Style};

/// Padding between the text bounding box and the background panel edge.
pub const PANEL_PADDING_PX: i32 = 20;

/// Pre-rasterized coverage for one caption string under one style.
///
/// Building it once per caption keeps the frame loop free of text shaping, and lets frames be
/// drawn concurrently from a shared reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptionArt {
    /// Fill coverage; its size is the text bounding box.
    pub fill: GlyphMask,
    /// Fill dilated by the stroke width, or `None` when the stroke width is 0.
    pub outline: Option<GlyphMask>,
    /// Dilation radius of `outline`.
    pub stroke_width: u32,
}

impl CaptionArt {
    /// Shape `text` at `style.size` and derive the outline.
    pub fn prepare(
        rasterizer: &mut dyn GlyphRasterizer,
        text: &str,
        style: &Style,
    ) -> CaptionResult<Self> {
        style.validate()?;
        let fill = rasterizer.rasterize(text, style.size)?;
        Ok(Self::from_mask(fill, style.stroke_width))
    }

    /// Wrap an existing fill mask. `stroke_width` is capped at [`MAX_STROKE_WIDTH_PX`].
    pub fn from_mask(fill: GlyphMask, stroke_width: u32) -> Self {
        let stroke_width = stroke_width.min(MAX_STROKE_WIDTH_PX);
        let outline = (stroke_width > 0).then(|| fill.dilate(stroke_width));
        Self {
            fill,
            outline,
            stroke_width,
        }
    }

    /// Top-left of the text box when centered in a `width x height` frame and then moved by
    /// `offset`.
    pub fn origin_in(&self, width: u32, height: u32, offset: (i32, i32)) -> (i32, i32) {
        let x = (i64::from(width) - i64::from(self.fill.width)).div_euclid(2);
        let y = (i64::from(height) - i64::from(self.fill.height)).div_euclid(2);
        (
            saturate_i32(x).saturating_add(offset.0),
            saturate_i32(y).saturating_add(offset.1),
        )
    }

    /// Padded panel rectangle for a text box at `(x, y)`, before clipping.
    pub(crate) fn panel_rect(&self, x: i32, y: i32) -> PixelRect {
        PixelRect::from_origin_size(x, y, self.fill.width, self.fill.height)
            .inflate(PANEL_PADDING_PX)
    }
}

/// Draw one caption onto `frame` in place.
///
/// Layers, bottom to top, on a draft copy of the affected region: background panel (blended by
/// `bg_opacity`), shadow, outline, fill. The draft is then blended back over the untouched frame
/// with `modifiers.opacity`, so opacity 0 leaves the frame as it was.
pub fn draw_caption(
    frame: &mut Frame,
    art: &CaptionArt,
    style: &Style,
    modifiers: Modifiers,
) -> CaptionResult<()> {
    if modifiers.opacity.is_nan() || modifiers.opacity <= 0.0 {
        return Ok(());
    }

    let (x, y) = art.origin_in(frame.width, frame.height, modifiers.offset);
    let text_box = PixelRect::from_origin_size(x, y, art.fill.width, art.fill.height);
    let (sdx, sdy) = style.shadow_offset;
    let stroke = match art.outline {
        Some(_) => i32::try_from(art.stroke_width).unwrap_or(i32::MAX),
        None => 0,
    };

    let mut touched = text_box.inflate(stroke);
    if style.bg_color.is_some() {
        touched = touched.union(art.panel_rect(x, y));
    }
    if style.shadow {
        touched = touched.union(text_box.translate(sdx, sdy));
    }
    let region = touched.intersect(frame.bounds());
    if region.is_empty() {
        return Ok(());
    }

    // Draft coordinates are relative to the region's top-left.
    let mut draft = frame.crop(region);
    let (ox, oy) = (x.saturating_sub(region.x0), y.saturating_sub(region.y0));

    if let Some(bg) = style.bg_color {
        let panel = art.panel_rect(x, y).translate(-region.x0, -region.y0);
        fill_rect_blend(&mut draft, panel, bg, style.bg_opacity);
    }
    if style.shadow {
        stamp_mask(
            &mut draft,
            &art.fill,
            ox.saturating_add(sdx),
            oy.saturating_add(sdy),
            style.shadow_color,
        );
    }
    if let Some(outline) = art.outline.as_ref() {
        stamp_mask(
            &mut draft,
            outline,
            ox.saturating_sub(stroke),
            oy.saturating_sub(stroke),
            style.stroke_color,
        );
    }
    stamp_mask(&mut draft, &art.fill, ox, oy, style.color);

    composite_region(frame, &draft, region, modifiers.opacity.min(1.0))
}

fn saturate_i32(v: i64) -> i32 {
    i32::try_from(v).unwrap_or(if v < 0 { i32::MIN } else { i32::MAX })
}

/// Caches [`CaptionArt`] per text/size/stroke and draws captions with it.
pub struct TextRenderer<R> {
    rasterizer: R,
    cache: HashMap<(String, u32, u32), CaptionArt>,
}

impl<R: GlyphRasterizer> TextRenderer<R> {
    pub fn new(rasterizer: R) -> Self {
        Self {
            rasterizer,
            cache: HashMap::new(),
        }
    }

    /// Caption art for `text` under `style`, rasterizing on first use.
    pub fn art(&mut self, text: &str, style: &Style) -> CaptionResult<&CaptionArt> {
        let key = (text.to_owned(), style.size.to_bits(), style.stroke_width);
        if !self.cache.contains_key(&key) {
            let art = CaptionArt::prepare(&mut self.rasterizer, text, style)?;
            self.cache.insert(key.clone(), art);
        }
        Ok(&self.cache[&key])
    }

    /// Draw `text` onto `frame` with `style` and animation `modifiers`.
    pub fn render(
        &mut self,
        frame: &mut Frame,
        text: &str,
        style: &Style,
        modifiers: Modifiers,
    ) -> CaptionResult<()> {
        if modifiers.opacity.is_nan() || modifiers.opacity <= 0.0 {
            return Ok(());
        }
        let art = self.art(text, style)?;
        draw_caption(frame, art, style, modifiers)
    }

    pub fn into_inner(self) -> R {
        self.rasterizer
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
