//! captionfx burns timed text captions into a video, frame by frame.
//!
//! Captions are `(text, seconds)` pairs laid end to end on a [`Timeline`]. For every output frame
//! the active caption is looked up, animated ([`AnimationMode`]), and drawn centered with an
//! optional background panel, shadow and outline. Source video is decoded and the result encoded
//! through the system `ffmpeg`; the source loops when the captions outlast it.
//!
//! - Build a [`Timeline`] and resolve a [`Style`]
//! - Pick a [`GlyphRasterizer`] ([`FontRasterizer`] for real fonts)
//! - Run [`compose_file`], or [`compose`] over any [`FrameSource`] / [`FrameSink`] pair
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod animation;
pub mod color;
pub mod compositor;
pub mod config;
pub mod media;
pub mod render;
pub mod script;
pub mod style;
pub mod timeline;
pub mod trends;

pub use crate::foundation::core::{Fps, FrameIndex};
pub use crate::foundation::error::{CaptionError, CaptionResult};

pub use crate::animation::anim::{Animation, AnimationMode, Modifiers, modifiers};
pub use crate::animation::ease::Ease;
pub use crate::color::{Rgb8, resolve};
pub use crate::compositor::{
    ComposeOpts, ComposeStats, ComposeThreading, PreparedCaptions, compose, compose_file,
    compose_prepared, prepare_captions, preview_frame, render_preview_frame,
};
pub use crate::config::OverlayJob;
pub use crate::media::ffmpeg::{FfmpegSink, FfmpegSinkOpts, ensure_parent_dir, is_ffmpeg_on_path};
pub use crate::media::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::media::source::{
    FfmpegSource, FrameSource, InMemorySource, SourceInfo, probe_video,
};
pub use crate::render::font::FontRasterizer;
pub use crate::render::frame::Frame;
pub use crate::render::glyphs::{GlyphMask, GlyphRasterizer};
pub use crate::render::text::{CaptionArt, PANEL_PADDING_PX, TextRenderer, draw_caption};
pub use crate::script::{Pacing, segment_script};
pub use crate::style::{MAX_SHADOW_OFFSET_PX, MAX_STROKE_WIDTH_PX, Style, StyleOverrides};
pub use crate::timeline::{CaptionSegment, CaptionSpec, Timeline};
pub use crate::trends::{DEFAULT_TREND_LIMIT, TrendRecord, rank_trends, trends_context};
