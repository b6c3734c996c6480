use crate::color::Rgb8;
use crate::foundation::error::{CaptionError, CaptionResult};

/// Largest accepted outline thickness, in pixels.
pub const MAX_STROKE_WIDTH_PX: u32 = 256;

/// Largest accepted drop shadow offset on either axis, in pixels.
pub const MAX_SHADOW_OFFSET_PX: i32 = 4096;

/// Fully resolved caption style.
///
/// Build one with [`Style::default`] or [`Style::with_overrides`]; it is read-only for the rest of
/// the run.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Style {
    /// Text fill color.
    pub color: Rgb8,
    /// Outline color.
    pub stroke_color: Rgb8,
    /// Outline thickness in pixels; `0` disables the outline.
    pub stroke_width: u32,
    /// Font size in pixels.
    pub size: f32,
    /// Background panel color; `None` draws no panel.
    pub bg_color: Option<Rgb8>,
    /// Panel blend weight in `[0, 1]`.
    pub bg_opacity: f32,
    /// Draw a drop shadow under the text.
    pub shadow: bool,
    /// Drop shadow color.
    pub shadow_color: Rgb8,
    /// Drop shadow offset `(dx, dy)` in pixels.
    pub shadow_offset: (i32, i32),
}

impl Default for Style {
    fn default() -> Self {
        Self {
            color: Rgb8::WHITE,
            stroke_color: Rgb8::BLACK,
            stroke_width: 2,
            size: 60.0,
            bg_color: None,
            bg_opacity: 0.4,
            shadow: true,
            shadow_color: Rgb8::BLACK,
            shadow_offset: (2, 2),
        }
    }
}

/// Caller-supplied style fields. Unset fields keep the defaults.
///
/// Colors go through [`crate::color::resolve`] while deserializing, so a bad color in a job file
/// fails the parse rather than a later render.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleOverrides {
    pub color: Option<Rgb8>,
    pub stroke_color: Option<Rgb8>,
    pub stroke_width: Option<u32>,
    pub size: Option<f32>,
    pub bg_color: Option<Rgb8>,
    pub bg_opacity: Option<f32>,
    pub shadow: Option<bool>,
    pub shadow_color: Option<Rgb8>,
    pub shadow_offset: Option<(i32, i32)>,
}

impl Style {
    /// Return a new style with `overrides` applied on top of `self`.
    ///
    /// `self` is left untouched.
    pub fn with_overrides(&self, overrides: &StyleOverrides) -> CaptionResult<Self> {
        let mut out = self.clone();
        let o = overrides;
        if let Some(v) = o.color {
            out.color = v;
        }
        if let Some(v) = o.stroke_color {
            out.stroke_color = v;
        }
        if let Some(v) = o.stroke_width {
            out.stroke_width = v;
        }
        if let Some(v) = o.size {
            out.size = v;
        }
        if let Some(v) = o.bg_color {
            out.bg_color = Some(v);
        }
        if let Some(v) = o.bg_opacity {
            out.bg_opacity = v;
        }
        if let Some(v) = o.shadow {
            out.shadow = v;
        }
        if let Some(v) = o.shadow_color {
            out.shadow_color = v;
        }
        if let Some(v) = o.shadow_offset {
            out.shadow_offset = v;
        }
        out.validate()?;
        Ok(out)
    }

    /// Check numeric ranges.
    pub fn validate(&self) -> CaptionResult<()> {
        if !self.size.is_finite() || self.size <= 0.0 {
            return Err(CaptionError::validation(
                "style size must be finite and > 0",
            ));
        }
        if !self.bg_opacity.is_finite() || !(0.0..=1.0).contains(&self.bg_opacity) {
            return Err(CaptionError::validation(
                "style bg_opacity must be within [0, 1]",
            ));
        }
        if self.stroke_width > MAX_STROKE_WIDTH_PX {
            return Err(CaptionError::validation(format!(
                "style stroke_width must be <= {MAX_STROKE_WIDTH_PX}, got {}",
                self.stroke_width
            )));
        }
        let (dx, dy) = self.shadow_offset;
        if dx.unsigned_abs() > MAX_SHADOW_OFFSET_PX.unsigned_abs()
            || dy.unsigned_abs() > MAX_SHADOW_OFFSET_PX.unsigned_abs()
        {
            return Err(CaptionError::validation(format!(
                "style shadow_offset must be within +/-{MAX_SHADOW_OFFSET_PX} px, got ({dx}, {dy})"
            )));
        }
        Ok(())
    }
}
