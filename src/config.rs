use std::path::{Path, PathBuf};

use crate::animation::anim::Animation;
use crate::foundation::error::{CaptionError, CaptionResult};
use crate::style::{Style, StyleOverrides};
use crate::timeline::{CaptionSpec, Timeline};

/// JSON overlay job: what to write, how it looks, how it moves.
///
/// ```json
/// {
///   "captions": [{ "text": "Hello", "duration": 2.0 }],
///   "style": { "color": "yellow", "bg_color": "#000000" },
///   "animation": { "mode": "fade", "fade_out": true },
///   "font": "fonts/Inter.ttf"
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OverlayJob {
    pub captions: Vec<CaptionSpec>,
    #[serde(default)]
    pub style: StyleOverrides,
    #[serde(default)]
    pub animation: Animation,
    /// Font file; relative paths are taken relative to the job file.
    #[serde(default)]
    pub font: Option<PathBuf>,
}

impl OverlayJob {
    pub fn from_json_str(s: &str) -> CaptionResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| CaptionError::validation(format!("invalid overlay job json: {e}")))
    }

    /// Read a job file and resolve its font path against the file's directory.
    #[tracing::instrument]
    pub fn from_path(path: &Path) -> CaptionResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            CaptionError::validation(format!("failed to read job '{}': {e}", path.display()))
        })?;
        let mut job = Self::from_json_str(&text)?;
        if let Some(font) = job.font.take() {
            let base = path.parent().unwrap_or_else(|| Path::new(""));
            job.font = Some(resolve_relative(base, font));
        }
        Ok(job)
    }

    /// Scheduled captions.
    pub fn timeline(&self) -> CaptionResult<Timeline> {
        Timeline::build(self.captions.iter().cloned())
    }

    /// Default style with this job's overrides applied.
    pub fn style(&self) -> CaptionResult<Style> {
        Style::default().with_overrides(&self.style)
    }
}

fn resolve_relative(base: &Path, p: PathBuf) -> PathBuf {
    if p.is_absolute() { p } else { base.join(p) }
}
