use crate::color::Rgb8;
use crate::foundation::error::{CaptionError, CaptionResult};

/// One video frame as row-major RGBA8.
///
/// Decoded video frames are opaque (alpha 255); caption drawing never changes alpha.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Frame {
    /// Wrap raw RGBA8 bytes, checking the buffer length.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> CaptionResult<Self> {
        let expected = (width as usize) * (height as usize) * 4;
        if width == 0 || height == 0 {
            return Err(CaptionError::validation("frame width/height must be non-zero"));
        }
        if data.len() != expected {
            return Err(CaptionError::validation(format!(
                "frame buffer has {} bytes, expected {expected} for {width}x{height} rgba8",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Frame filled with a single opaque color.
    pub fn solid(width: u32, height: u32, color: Rgb8) -> Self {
        let mut data = Vec::with_capacity((width as usize) * (height as usize) * 4);
        for _ in 0..(width as usize) * (height as usize) {
            data.extend_from_slice(&[color.r, color.g, color.b, 255]);
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn byte_len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub(crate) fn offset(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * 4
    }

    /// RGB of the pixel at `(x, y)`. Panics when out of bounds.
    pub fn rgb_at(&self, x: u32, y: u32) -> Rgb8 {
        let o = self.offset(x, y);
        Rgb8::new(self.data[o], self.data[o + 1], self.data[o + 2])
    }

    /// Copy of the pixels inside `rect` (already clipped to this frame).
    pub(crate) fn crop(&self, rect: PixelRect) -> Frame {
        let w = rect.width();
        let h = rect.height();
        let mut data = Vec::with_capacity((w as usize) * (h as usize) * 4);
        for y in rect.y0..rect.y1 {
            let start = self.offset(rect.x0 as u32, y as u32);
            data.extend_from_slice(&self.data[start..start + (w as usize) * 4]);
        }
        Frame {
            width: w,
            height: h,
            data,
        }
    }

    /// Bounds of the whole frame.
    pub(crate) fn bounds(&self) -> PixelRect {
        PixelRect::new(0, 0, self.width as i32, self.height as i32)
    }
}

/// Integer pixel rectangle `[x0, x1) x [y0, y1)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PixelRect {
    pub(crate) x0: i32,
    pub(crate) y0: i32,
    pub(crate) x1: i32,
    pub(crate) y1: i32,
}

impl PixelRect {
    pub(crate) fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub(crate) fn from_origin_size(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self::new(x, y, x.saturating_add(w as i32), y.saturating_add(h as i32))
    }

    pub(crate) fn is_empty(self) -> bool {
        self.x1 <= self.x0 || self.y1 <= self.y0
    }

    pub(crate) fn width(self) -> u32 {
        (self.x1 - self.x0).max(0) as u32
    }

    pub(crate) fn height(self) -> u32 {
        (self.y1 - self.y0).max(0) as u32
    }

    pub(crate) fn inflate(self, by: i32) -> Self {
        Self::new(
            self.x0.saturating_sub(by),
            self.y0.saturating_sub(by),
            self.x1.saturating_add(by),
            self.y1.saturating_add(by),
        )
    }

    pub(crate) fn intersect(self, other: Self) -> Self {
        Self::new(
            self.x0.max(other.x0),
            self.y0.max(other.y0),
            self.x1.min(other.x1),
            self.y1.min(other.y1),
        )
    }

    /// Smallest rect containing both; empty inputs are ignored.
    pub(crate) fn union(self, other: Self) -> Self {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }
        Self::new(
            self.x0.min(other.x0),
            self.y0.min(other.y0),
            self.x1.max(other.x1),
            self.y1.max(other.y1),
        )
    }

    pub(crate) fn translate(self, dx: i32, dy: i32) -> Self {
        Self::new(
            self.x0.saturating_add(dx),
            self.y0.saturating_add(dy),
            self.x1.saturating_add(dx),
            self.y1.saturating_add(dy),
        )
    }
}
