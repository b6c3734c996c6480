use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;

use crate::animation::anim::Animation;
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{CaptionError, CaptionResult};
use crate::media::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
use crate::media::sink::{FrameSink, SinkConfig};
use crate::media::source::{FfmpegSource, FrameSource};
use crate::render::frame::Frame;
use crate::render::glyphs::GlyphRasterizer;
use crate::render::text::{CaptionArt, draw_caption};
use crate::style::Style;
use crate::timeline::Timeline;

/// Chunked parallel drawing settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComposeThreading {
    /// Draw the frames of a chunk concurrently when `true`.
    pub parallel: bool,
    /// Frames decoded per chunk.
    pub chunk_size: usize,
    /// Worker thread count; rayon picks when `None`.
    pub threads: Option<usize>,
}

impl Default for ComposeThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 64,
            threads: None,
        }
    }
}

/// Everything besides the source, sink and timeline that shapes the output.
#[derive(Clone, Debug, Default)]
pub struct ComposeOpts {
    pub style: Style,
    pub animation: Animation,
    pub threading: ComposeThreading,
}

/// Counters reported by a finished [`compose`] run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ComposeStats {
    /// Frames written to the sink.
    pub frames_total: u64,
    /// Frames that had an active caption.
    pub frames_captioned: u64,
    /// Times the source was rewound to its first frame.
    pub source_loops: u64,
}

/// Rasterized art for every segment of a timeline, shared between segments with equal text.
#[derive(Clone, Debug)]
pub struct PreparedCaptions {
    per_segment: Vec<Arc<CaptionArt>>,
}

impl PreparedCaptions {
    /// Art for segment `idx`.
    pub fn get(&self, idx: usize) -> Option<&CaptionArt> {
        self.per_segment.get(idx).map(Arc::as_ref)
    }

    pub fn len(&self) -> usize {
        self.per_segment.len()
    }

    pub fn is_empty(&self) -> bool {
        self.per_segment.is_empty()
    }
}

/// Rasterize every caption of `timeline` once under `style`.
pub fn prepare_captions(
    timeline: &Timeline,
    rasterizer: &mut dyn GlyphRasterizer,
    style: &Style,
) -> CaptionResult<PreparedCaptions> {
    style.validate()?;
    let mut by_text = HashMap::<&str, Arc<CaptionArt>>::new();
    let mut per_segment = Vec::with_capacity(timeline.len());
    for seg in timeline.segments() {
        let art = match by_text.get(seg.text.as_str()) {
            Some(art) => Arc::clone(art),
            None => {
                let art = Arc::new(CaptionArt::prepare(rasterizer, &seg.text, style)?);
                by_text.insert(seg.text.as_str(), Arc::clone(&art));
                art
            }
        };
        per_segment.push(art);
    }
    tracing::debug!(
        segments = per_segment.len(),
        unique = by_text.len(),
        "prepared caption art"
    );
    Ok(PreparedCaptions { per_segment })
}

/// Read-only state shared by every frame of a run.
struct FramePainter<'a> {
    timeline: &'a Timeline,
    captions: &'a PreparedCaptions,
    style: &'a Style,
    animation: &'a Animation,
    fps: Fps,
}

impl FramePainter<'_> {
    /// Draw the caption active at output frame `idx`; returns whether one was active.
    fn paint(&self, idx: FrameIndex, frame: &mut Frame) -> CaptionResult<bool> {
        let Some(seg_idx) = self.timeline.active_index_at_frame(idx, self.fps) else {
            return Ok(false);
        };
        let seg = &self.timeline.segments()[seg_idx];
        let art = self.captions.get(seg_idx).ok_or_else(|| {
            CaptionError::render(format!("no prepared art for caption {seg_idx}"))
        })?;
        let t_local = (self.fps.frame_time_secs(idx) - seg.start).max(0.0);
        let modifiers = self
            .animation
            .modifiers_in_segment(t_local, seg.duration());
        draw_caption(frame, art, self.style, modifiers)?;
        Ok(true)
    }
}

/// Run the frame loop: pull from `source`, draw the active caption, push to `sink`.
///
/// The output has `timeline.frame_count(fps)` frames at the source's rate and size. When the
/// source runs out it is rewound and played again from its first frame. `sink.begin` is called
/// before the first frame is read.
#[tracing::instrument(skip_all, fields(segments = timeline.len()))]
pub fn compose<S, K>(
    source: &mut S,
    sink: &mut K,
    timeline: &Timeline,
    rasterizer: &mut dyn GlyphRasterizer,
    opts: &ComposeOpts,
) -> CaptionResult<ComposeStats>
where
    S: FrameSource + ?Sized,
    K: FrameSink + ?Sized,
{
    let captions = prepare_captions(timeline, rasterizer, &opts.style)?;
    compose_prepared(source, sink, timeline, &captions, opts)
}

/// [`compose`] with caption art that was already rasterized.
pub fn compose_prepared<S, K>(
    source: &mut S,
    sink: &mut K,
    timeline: &Timeline,
    captions: &PreparedCaptions,
    opts: &ComposeOpts,
) -> CaptionResult<ComposeStats>
where
    S: FrameSource + ?Sized,
    K: FrameSink + ?Sized,
{
    if captions.len() != timeline.len() {
        return Err(CaptionError::validation(format!(
            "prepared captions cover {} segments, timeline has {}",
            captions.len(),
            timeline.len()
        )));
    }
    let info = source.info().clone();
    let total = timeline.frame_count(info.fps);
    tracing::debug!(
        width = info.width,
        height = info.height,
        fps = %info.fps,
        frames = total,
        "composing"
    );

    sink.begin(SinkConfig {
        width: info.width,
        height: info.height,
        fps: info.fps,
    })?;

    let painter = FramePainter {
        timeline,
        captions,
        style: &opts.style,
        animation: &opts.animation,
        fps: info.fps,
    };
    let mut stats = ComposeStats::default();

    if !opts.threading.parallel {
        for f in 0..total {
            let idx = FrameIndex(f);
            let mut frame = next_source_frame(source, &mut stats)?;
            if painter.paint(idx, &mut frame)? {
                stats.frames_captioned += 1;
            }
            sink.push_frame(idx, &frame)?;
            stats.frames_total += 1;
        }
        sink.end()?;
        return Ok(stats);
    }

    let pool = build_thread_pool(opts.threading.threads)?;
    let chunk_size = normalized_chunk_size(opts.threading.chunk_size);
    let mut chunk_start = 0u64;
    while chunk_start < total {
        let chunk_end = (chunk_start + chunk_size).min(total);
        let mut chunk = Vec::with_capacity((chunk_end - chunk_start) as usize);
        for f in chunk_start..chunk_end {
            chunk.push((FrameIndex(f), next_source_frame(source, &mut stats)?));
        }

        let painted = pool.install(|| {
            chunk
                .par_iter_mut()
                .map(|(idx, frame)| painter.paint(*idx, frame))
                .collect::<Vec<_>>()
        });
        for captioned in painted {
            if captioned? {
                stats.frames_captioned += 1;
            }
        }

        for (idx, frame) in &chunk {
            sink.push_frame(*idx, frame)?;
            stats.frames_total += 1;
        }
        chunk_start = chunk_end;
    }
    sink.end()?;
    Ok(stats)
}

/// Compose `video` with `timeline` into an MP4 at `out`.
///
/// The source is probed first, then the output is created; both happen before any frame is
/// decoded.
pub fn compose_file(
    video: &Path,
    out: impl Into<PathBuf>,
    timeline: &Timeline,
    rasterizer: &mut dyn GlyphRasterizer,
    opts: &ComposeOpts,
) -> CaptionResult<ComposeStats> {
    let captions = prepare_captions(timeline, rasterizer, &opts.style)?;
    let mut source = FfmpegSource::open(video)?;
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(out));
    let stats = compose_prepared(&mut source, &mut sink, timeline, &captions, opts)?;
    tracing::info!(
        out = %sink.out_path().display(),
        frames = stats.frames_total,
        loops = stats.source_loops,
        "wrote captioned video"
    );
    Ok(stats)
}

/// Render output frame `idx` alone, reading the source from its start.
pub fn preview_frame<S>(
    source: &mut S,
    timeline: &Timeline,
    rasterizer: &mut dyn GlyphRasterizer,
    opts: &ComposeOpts,
    idx: FrameIndex,
) -> CaptionResult<Frame>
where
    S: FrameSource + ?Sized,
{
    let fps = source.info().fps;
    let total = timeline.frame_count(fps);
    if idx.0 >= total {
        return Err(CaptionError::validation(format!(
            "frame {} is out of range (output has {total} frames)",
            idx.0
        )));
    }

    let mut stats = ComposeStats::default();
    let mut frame = next_source_frame(source, &mut stats)?;
    for _ in 0..idx.0 {
        frame = next_source_frame(source, &mut stats)?;
    }

    if let Some(seg) = timeline.active_at_frame(idx, fps) {
        opts.style.validate()?;
        let art = CaptionArt::prepare(rasterizer, &seg.text, &opts.style)?;
        let t_local = (fps.frame_time_secs(idx) - seg.start).max(0.0);
        let modifiers = opts
            .animation
            .modifiers_in_segment(t_local, seg.duration());
        draw_caption(&mut frame, &art, &opts.style, modifiers)?;
    }
    Ok(frame)
}

/// [`preview_frame`] over a video file.
pub fn render_preview_frame(
    video: &Path,
    timeline: &Timeline,
    rasterizer: &mut dyn GlyphRasterizer,
    opts: &ComposeOpts,
    idx: FrameIndex,
) -> CaptionResult<Frame> {
    let mut source = FfmpegSource::open(video)?;
    preview_frame(&mut source, timeline, rasterizer, opts, idx)
}

fn next_source_frame<S>(source: &mut S, stats: &mut ComposeStats) -> CaptionResult<Frame>
where
    S: FrameSource + ?Sized,
{
    if let Some(frame) = source.read_frame()? {
        return Ok(frame);
    }
    source.rewind()?;
    stats.source_loops += 1;
    source.read_frame()?.ok_or_else(|| {
        CaptionError::source_open("source video yielded no frames after rewinding")
    })
}

fn build_thread_pool(threads: Option<usize>) -> CaptionResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(CaptionError::validation(
            "compose threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| CaptionError::render(format!("failed to build rayon thread pool: {e}")))
}

fn normalized_chunk_size(chunk_size: usize) -> u64 {
    chunk_size.max(1) as u64
}
