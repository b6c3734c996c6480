use crate::foundation::error::{CaptionError, CaptionResult};

/// 8-bit coverage raster of one shaped caption string.
///
/// The mask's size is the text bounding box used for centering and panel placement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphMask {
    pub width: u32,
    pub height: u32,
    /// Row-major coverage, `0` = empty, `255` = fully inside a glyph.
    pub coverage: Vec<u8>,
}

impl GlyphMask {
    pub fn new(width: u32, height: u32, coverage: Vec<u8>) -> CaptionResult<Self> {
        if coverage.len() != (width as usize) * (height as usize) {
            return Err(CaptionError::render(format!(
                "glyph mask has {} samples, expected {width}x{height}",
                coverage.len()
            )));
        }
        Ok(Self {
            width,
            height,
            coverage,
        })
    }

    /// Mask with no coverage.
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            coverage: vec![0; (width as usize) * (height as usize)],
        }
    }

    #[inline]
    pub fn at(&self, x: u32, y: u32) -> u8 {
        self.coverage[(y as usize) * (self.width as usize) + (x as usize)]
    }

    /// Square max-dilation by `radius` pixels.
    ///
    /// The result is `2 * radius` larger in each dimension; its pixel `(x, y)` corresponds to
    /// `(x - radius, y - radius)` in `self`. Coverage equals the union of the mask stamped at every
    /// offset in `[-radius, radius]^2`.
    pub fn dilate(&self, radius: u32) -> GlyphMask {
        if radius == 0 {
            return self.clone();
        }
        let r = radius as usize;
        let (w, h) = (self.width as usize, self.height as usize);
        let (ow, oh) = (w + 2 * r, h + 2 * r);

        // Horizontal pass into a padded buffer, then vertical; a square window is separable.
        let mut horiz = vec![0u8; ow * h];
        for y in 0..h {
            let src = &self.coverage[y * w..(y + 1) * w];
            let dst = &mut horiz[y * ow..(y + 1) * ow];
            for (x, d) in dst.iter_mut().enumerate() {
                let lo = x.saturating_sub(2 * r);
                let hi = x.min(w.saturating_sub(1));
                if w == 0 || lo > hi {
                    continue;
                }
                *d = src[lo..=hi].iter().copied().max().unwrap_or(0);
            }
        }

        let mut out = vec![0u8; ow * oh];
        for x in 0..ow {
            for y in 0..oh {
                let lo = y.saturating_sub(2 * r);
                let hi = y.min(h.saturating_sub(1));
                if h == 0 || lo > hi {
                    continue;
                }
                let mut m = 0u8;
                for sy in lo..=hi {
                    m = m.max(horiz[sy * ow + x]);
                }
                out[y * ow + x] = m;
            }
        }

        GlyphMask {
            width: ow as u32,
            height: oh as u32,
            coverage: out,
        }
    }
}

/// Text metrics and glyph coverage for caption strings.
///
/// Implementations shape `text` at `size_px` and return its coverage mask; the mask dimensions
/// are the text's bounding box.
pub trait GlyphRasterizer {
    fn rasterize(&mut self, text: &str, size_px: f32) -> CaptionResult<GlyphMask>;
}

impl<R: GlyphRasterizer + ?Sized> GlyphRasterizer for &mut R {
    fn rasterize(&mut self, text: &str, size_px: f32) -> CaptionResult<GlyphMask> {
        (**self).rasterize(text, size_px)
    }
}

impl<R: GlyphRasterizer + ?Sized> GlyphRasterizer for Box<R> {
    fn rasterize(&mut self, text: &str, size_px: f32) -> CaptionResult<GlyphMask> {
        (**self).rasterize(text, size_px)
    }
}
