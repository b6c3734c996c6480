//! Caption scheduling: (text, duration) pairs into contiguous half-open time intervals.

use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{CaptionError, CaptionResult};

/// Slack for summed segment boundaries, in seconds.
const BOUNDARY_EPSILON_SECS: f64 = 1e-9;

/// One caption input: text shown for `duration` seconds.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CaptionSpec {
    /// Caption text.
    pub text: String,
    /// Display time in seconds, must be > 0.
    pub duration: f64,
}

impl CaptionSpec {
    pub fn new(text: impl Into<String>, duration: f64) -> Self {
        Self {
            text: text.into(),
            duration,
        }
    }
}

impl<S: Into<String>> From<(S, f64)> for CaptionSpec {
    fn from((text, duration): (S, f64)) -> Self {
        Self::new(text, duration)
    }
}

/// A caption placed on the output timeline over `[start, end)` seconds.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct CaptionSegment {
    pub text: String,
    /// Inclusive start, seconds from output start.
    pub start: f64,
    /// Exclusive end.
    pub end: f64,
}

impl CaptionSegment {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// `true` when `t` falls in `[start, end)`.
    pub fn contains(&self, t: f64) -> bool {
        self.start <= t && t < self.end
    }
}

/// Ordered, contiguous, non-overlapping caption segments.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Timeline {
    segments: Vec<CaptionSegment>,
}

impl Timeline {
    /// Lay captions end to end, starting at `0.0`.
    ///
    /// Every duration must be finite and strictly positive; the first offender fails the whole
    /// build with [`CaptionError::InvalidDuration`].
    pub fn build<I, C>(captions: I) -> CaptionResult<Self>
    where
        I: IntoIterator<Item = C>,
        C: Into<CaptionSpec>,
    {
        let mut segments = Vec::new();
        let mut cursor = 0.0f64;
        for (i, caption) in captions.into_iter().enumerate() {
            let CaptionSpec { text, duration } = caption.into();
            if !duration.is_finite() || duration <= 0.0 {
                return Err(CaptionError::invalid_duration(format!(
                    "caption {i} (\"{text}\") has duration {duration}, expected a positive number of seconds"
                )));
            }
            let end = cursor + duration;
            segments.push(CaptionSegment {
                text,
                start: cursor,
                end,
            });
            cursor = end;
        }

        if segments.is_empty() {
            return Err(CaptionError::validation(
                "timeline needs at least one caption",
            ));
        }

        tracing::debug!(
            segments = segments.len(),
            total_secs = cursor,
            "built caption timeline"
        );
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[CaptionSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Sum of all caption durations.
    pub fn total_duration(&self) -> f64 {
        self.segments.last().map(|s| s.end).unwrap_or(0.0)
    }

    /// Number of output frames: `floor(total_duration * fps)`.
    pub fn frame_count(&self, fps: Fps) -> u64 {
        fps.secs_to_frames_floor(self.total_duration())
    }

    /// Index of the segment active at `t`, if any.
    ///
    /// Boundaries within a nanosecond of `t` count as already reached, so float error
    /// in the summed durations cannot hold a caption past its end.
    pub fn active_index_at(&self, t: f64) -> Option<usize> {
        if !t.is_finite() || t < 0.0 {
            return None;
        }
        let t = t + BOUNDARY_EPSILON_SECS;
        // Ends are strictly increasing, so the first end past `t` is the only candidate.
        let idx = self.segments.partition_point(|s| s.end <= t);
        self.segments
            .get(idx)
            .filter(|s| s.start <= t)
            .map(|_| idx)
    }

    /// Index of the segment active at output frame `frame`.
    ///
    /// Each boundary is mapped to a frame with [`Fps::secs_to_frames_floor`], the same rounding
    /// [`Timeline::frame_count`] uses, so segment frame spans add up to the output length.
    pub fn active_index_at_frame(&self, frame: FrameIndex, fps: Fps) -> Option<usize> {
        let idx = self
            .segments
            .partition_point(|s| fps.secs_to_frames_floor(s.end) <= frame.0);
        (idx < self.segments.len()).then_some(idx)
    }

    /// Segment active at `t` under half-open `[start, end)` semantics.
    pub fn active_at(&self, t: f64) -> Option<&CaptionSegment> {
        self.active_index_at(t).map(|i| &self.segments[i])
    }

    /// Segment active at output frame `frame`.
    pub fn active_at_frame(&self, frame: FrameIndex, fps: Fps) -> Option<&CaptionSegment> {
        self.active_index_at_frame(frame, fps).map(|i| &self.segments[i])
    }
}

#[cfg(test)]
#[path = "../tests/unit/timeline.rs"]
mod tests;
