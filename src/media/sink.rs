use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::CaptionResult;
use crate::render::frame::Frame;

/// Configuration handed to a [`FrameSink`] before the first frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SinkConfig {
    pub width: u32,
    pub height: u32,
    pub fps: Fps,
}

/// Consumer of composited frames.
///
/// `push_frame` is called in strictly increasing `FrameIndex` order, between one `begin` and one
/// `end`.
pub trait FrameSink {
    fn begin(&mut self, cfg: SinkConfig) -> CaptionResult<()>;
    fn push_frame(&mut self, idx: FrameIndex, frame: &Frame) -> CaptionResult<()>;
    fn end(&mut self) -> CaptionResult<()>;
}

impl<S: FrameSink + ?Sized> FrameSink for &mut S {
    fn begin(&mut self, cfg: SinkConfig) -> CaptionResult<()> {
        (**self).begin(cfg)
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &Frame) -> CaptionResult<()> {
        (**self).push_frame(idx, frame)
    }

    fn end(&mut self) -> CaptionResult<()> {
        (**self).end()
    }
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, Frame)>,
    ended: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Captured frames in push order.
    pub fn frames(&self) -> &[(FrameIndex, Frame)] {
        &self.frames
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> CaptionResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &Frame) -> CaptionResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> CaptionResult<()> {
        self.ended = true;
        Ok(())
    }
}
