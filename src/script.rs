//! Splitting generated prose into timed captions.

use crate::foundation::error::{CaptionError, CaptionResult};
use crate::timeline::CaptionSpec;

/// Reading speed used to size caption durations.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Pacing {
    pub words_per_second: f64,
    /// Floor applied to every caption's duration.
    pub min_seconds: f64,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            words_per_second: 2.5,
            min_seconds: 1.0,
        }
    }
}

impl Pacing {
    pub fn validate(&self) -> CaptionResult<()> {
        if !self.words_per_second.is_finite() || self.words_per_second <= 0.0 {
            return Err(CaptionError::validation(
                "words_per_second must be finite and > 0",
            ));
        }
        if !self.min_seconds.is_finite() || self.min_seconds <= 0.0 {
            return Err(CaptionError::invalid_duration(
                "min_seconds must be finite and > 0",
            ));
        }
        Ok(())
    }

    /// `max(min_seconds, words / words_per_second)`.
    pub fn duration_for(&self, sentence: &str) -> f64 {
        let words = sentence.split_whitespace().count() as f64;
        (words / self.words_per_second).max(self.min_seconds)
    }
}

/// Split `text` into sentences ending at `.`, `!` or `?`, each with a reading-time duration.
///
/// Sentences keep their terminator. A trailing fragment without one still becomes a caption.
pub fn segment_script(text: &str, pacing: Pacing) -> CaptionResult<Vec<CaptionSpec>> {
    pacing.validate()?;

    let mut out = Vec::new();
    let mut start = 0;
    for (i, ch) in text.char_indices() {
        if matches!(ch, '.' | '!' | '?') {
            push_sentence(&mut out, &text[start..i + ch.len_utf8()], &pacing);
            start = i + ch.len_utf8();
        }
    }
    push_sentence(&mut out, &text[start..], &pacing);
    Ok(out)
}

fn push_sentence(out: &mut Vec<CaptionSpec>, raw: &str, pacing: &Pacing) {
    let sentence = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    // Runs of terminators ("...", "?!") leave fragments with no words.
    if !sentence.chars().any(char::is_alphanumeric) {
        return;
    }
    let duration = pacing.duration_for(&sentence);
    out.push(CaptionSpec::new(sentence, duration));
}
