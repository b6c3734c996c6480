use std::path::Path;

use crate::foundation::error::{CaptionError, CaptionResult};
use crate::render::glyphs::{GlyphMask, GlyphRasterizer};

/// Transparent margin around shaped text so antialiased edges are not clipped.
const GLYPH_PAD_PX: u32 = 2;

/// Parley needs a brush type; masks are single-channel so it carries nothing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct MaskBrush;

/// [`GlyphRasterizer`] backed by a TrueType/OpenType font: Parley shapes, vello_cpu rasterizes.
pub struct FontRasterizer {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<MaskBrush>,
    family_name: String,
    font: vello_cpu::peniko::FontData,
}

impl std::fmt::Debug for FontRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontRasterizer")
            .field("family_name", &self.family_name)
            .finish_non_exhaustive()
    }
}

impl FontRasterizer {
    /// Register raw font bytes (first face of the file).
    pub fn from_bytes(font_bytes: Vec<u8>) -> CaptionResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| CaptionError::render("no font families registered from font bytes"))?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| CaptionError::render("registered font family has no name"))?
            .to_string();

        let font = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);
        tracing::debug!(family = %family_name, "registered caption font");

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font,
        })
    }

    /// Load a font file from disk.
    pub fn from_file(path: &Path) -> CaptionResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            CaptionError::validation(format!("failed to read font '{}': {e}", path.display()))
        })?;
        Self::from_bytes(bytes)
    }

    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    fn layout(&mut self, text: &str, size_px: f32) -> parley::Layout<MaskBrush> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));

        let mut layout: parley::Layout<MaskBrush> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }
}

impl GlyphRasterizer for FontRasterizer {
    fn rasterize(&mut self, text: &str, size_px: f32) -> CaptionResult<GlyphMask> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(CaptionError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let layout = self.layout(text, size_px);
        let width = layout.width().max(0.0).ceil() as u32 + 2 * GLYPH_PAD_PX;
        let height = layout.height().max(0.0).ceil() as u32 + 2 * GLYPH_PAD_PX;
        let (Ok(w16), Ok(h16)) = (u16::try_from(width), u16::try_from(height)) else {
            return Err(CaptionError::render(format!(
                "caption \"{text}\" is too large to rasterize ({width}x{height})"
            )));
        };

        let mut ctx = vello_cpu::RenderContext::new(w16, h16);
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((
            f64::from(GLYPH_PAD_PX),
            f64::from(GLYPH_PAD_PX),
        )));
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));

        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&self.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        ctx.flush();

        let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
        ctx.render_to_pixmap(&mut pixmap);
        let coverage = pixmap
            .data_as_u8_slice()
            .chunks_exact(4)
            .map(|px| px[3])
            .collect();

        GlyphMask::new(width, height, coverage)
    }
}
