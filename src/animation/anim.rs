use std::f64::consts::TAU;
use std::str::FromStr;

use crate::animation::ease::Ease;

/// Seconds spent ramping opacity in `fade` mode.
pub const FADE_SECS: f64 = 0.5;
/// Starting vertical offset of `slide` mode, in pixels.
pub const SLIDE_DISTANCE_PX: f64 = 50.0;
/// Seconds the `slide` mode takes to settle.
pub const SLIDE_SECS: f64 = 1.0;

/// Per-caption animation style.
///
/// Unknown names parse to [`AnimationMode::None`] instead of failing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AnimationMode {
    Fade,
    Slide,
    Pulse,
    #[default]
    None,
}

impl AnimationMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fade => "fade",
            Self::Slide => "slide",
            Self::Pulse => "pulse",
            Self::None => "none",
        }
    }
}

impl FromStr for AnimationMode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mode = match s.trim().to_ascii_lowercase().as_str() {
            "fade" => Self::Fade,
            "slide" => Self::Slide,
            "pulse" => Self::Pulse,
            "none" | "" => Self::None,
            other => {
                tracing::debug!(mode = other, "unknown animation mode, rendering without animation");
                Self::None
            }
        };
        Ok(mode)
    }
}

impl std::fmt::Display for AnimationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl serde::Serialize for AnimationMode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for AnimationMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let Ok(mode) = s.parse::<AnimationMode>();
        Ok(mode)
    }
}

/// Opacity and position adjustments for one caption on one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Modifiers {
    /// Caption opacity in `[0, 1]`.
    pub opacity: f32,
    /// Pixel offset `(dx, dy)` added to the centered text position.
    pub offset: (i32, i32),
}

impl Modifiers {
    pub const IDENTITY: Self = Self {
        opacity: 1.0,
        offset: (0, 0),
    };
}

/// Modifiers for `mode` at `t_local` seconds into the active caption, with linear progress.
pub fn modifiers(mode: AnimationMode, t_local: f64) -> Modifiers {
    Animation::from(mode).modifiers(t_local)
}

/// Animation configuration: mode plus optional easing and fade-out.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct Animation {
    pub mode: AnimationMode,
    /// Curve applied to `fade` and `slide` progress.
    pub ease: Ease,
    /// Ramp `fade` back down over the last [`FADE_SECS`] of each caption.
    ///
    /// Only honored by [`Animation::modifiers_in_segment`], which knows the segment length.
    pub fade_out: bool,
}

impl From<AnimationMode> for Animation {
    fn from(mode: AnimationMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }
}

impl Animation {
    /// Modifiers at `t_local` seconds since the caption started.
    ///
    /// `fade` only ramps in here: without the segment length there is no way to know when to ramp
    /// out. Pulse keeps oscillating for as long as the caption is shown.
    pub fn modifiers(&self, t_local: f64) -> Modifiers {
        let t = if t_local.is_finite() {
            t_local.max(0.0)
        } else {
            0.0
        };
        match self.mode {
            AnimationMode::Fade => Modifiers {
                opacity: self.ease.apply(t / FADE_SECS) as f32,
                offset: (0, 0),
            },
            AnimationMode::Slide => {
                let progress = self.ease.apply(t.min(SLIDE_SECS) / SLIDE_SECS);
                Modifiers {
                    opacity: 1.0,
                    offset: (0, (SLIDE_DISTANCE_PX * (1.0 - progress)).round() as i32),
                }
            }
            AnimationMode::Pulse => Modifiers {
                opacity: (0.7 + 0.3 * (TAU * t).sin()).clamp(0.0, 1.0) as f32,
                offset: (0, 0),
            },
            AnimationMode::None => Modifiers::IDENTITY,
        }
    }

    /// Modifiers when the caller also knows the caption's total duration.
    ///
    /// Identical to [`Animation::modifiers`] unless `fade_out` is set and the mode is `fade`, in
    /// which case opacity also ramps to 0 over the final [`FADE_SECS`].
    pub fn modifiers_in_segment(&self, t_local: f64, segment_duration: f64) -> Modifiers {
        let mut m = self.modifiers(t_local);
        if self.fade_out && self.mode == AnimationMode::Fade && segment_duration.is_finite() {
            let remaining = (segment_duration - t_local).max(0.0);
            let out = self.ease.apply(remaining / FADE_SECS) as f32;
            m.opacity = m.opacity.min(out);
        }
        m
    }
}

impl<'de> serde::Deserialize<'de> for Animation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Mode(AnimationMode),
            Full {
                mode: AnimationMode,
                #[serde(default)]
                ease: Ease,
                #[serde(default)]
                fade_out: bool,
            },
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Mode(mode) => Self::from(mode),
            Repr::Full {
                mode,
                ease,
                fade_out,
            } => Self {
                mode,
                ease,
                fade_out,
            },
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/anim.rs"]
mod tests;
