use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};

use crate::foundation::core::Fps;
use crate::foundation::error::{CaptionError, CaptionResult};
use crate::render::frame::Frame;

/// Stream properties of a source video.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceInfo {
    pub width: u32,
    pub height: u32,
    pub fps: Fps,
    /// Container duration in seconds, `0.0` when unknown.
    pub duration_sec: f64,
}

/// Sequential reader of source frames.
///
/// `read_frame` returns `Ok(None)` at end of stream. A frame that cannot be read completely is
/// also reported as end of stream; the compositor rewinds and loops in both cases.
pub trait FrameSource {
    fn info(&self) -> &SourceInfo;
    fn read_frame(&mut self) -> CaptionResult<Option<Frame>>;
    /// Seek back to the first frame.
    fn rewind(&mut self) -> CaptionResult<()>;
}

impl<S: FrameSource + ?Sized> FrameSource for &mut S {
    fn info(&self) -> &SourceInfo {
        (**self).info()
    }

    fn read_frame(&mut self) -> CaptionResult<Option<Frame>> {
        (**self).read_frame()
    }

    fn rewind(&mut self) -> CaptionResult<()> {
        (**self).rewind()
    }
}

/// In-memory source for tests and synthetic inputs.
#[derive(Clone, Debug)]
pub struct InMemorySource {
    info: SourceInfo,
    frames: Vec<Frame>,
    cursor: usize,
    rewinds: usize,
}

impl InMemorySource {
    /// All frames must match the first frame's size.
    pub fn new(frames: Vec<Frame>, fps: Fps) -> CaptionResult<Self> {
        let first = frames
            .first()
            .ok_or_else(|| CaptionError::source_open("in-memory source has no frames"))?;
        let (width, height) = (first.width, first.height);
        if frames.iter().any(|f| f.width != width || f.height != height) {
            return Err(CaptionError::source_open(
                "in-memory source frames differ in size",
            ));
        }
        let duration_sec = frames.len() as f64 / fps.as_f64();
        Ok(Self {
            info: SourceInfo {
                width,
                height,
                fps,
                duration_sec,
            },
            frames,
            cursor: 0,
            rewinds: 0,
        })
    }

    /// Number of times the source was rewound.
    pub fn rewinds(&self) -> usize {
        self.rewinds
    }
}

impl FrameSource for InMemorySource {
    fn info(&self) -> &SourceInfo {
        &self.info
    }

    fn read_frame(&mut self) -> CaptionResult<Option<Frame>> {
        let frame = self.frames.get(self.cursor).cloned();
        if frame.is_some() {
            self.cursor += 1;
        }
        Ok(frame)
    }

    fn rewind(&mut self) -> CaptionResult<()> {
        self.cursor = 0;
        self.rewinds += 1;
        Ok(())
    }
}

/// Probe a video file with `ffprobe`.
///
/// Fails with [`CaptionError::SourceOpen`] when the file is missing, has no video stream, or
/// reports a non-positive frame rate.
#[tracing::instrument]
pub fn probe_video(source_path: &Path) -> CaptionResult<SourceInfo> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
        r_frame_rate: Option<String>,
        avg_frame_rate: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        #[serde(default)]
        streams: Vec<ProbeStream>,
        format: Option<ProbeFormat>,
    }

    if !source_path.is_file() {
        return Err(CaptionError::source_open(format!(
            "source video '{}' does not exist",
            source_path.display()
        )));
    }

    let out = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(source_path)
        .output()
        .map_err(|e| CaptionError::source_open(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(CaptionError::source_open(format!(
            "ffprobe failed for '{}': {}",
            source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let parsed: ProbeOut = serde_json::from_slice(&out.stdout)
        .map_err(|e| CaptionError::source_open(format!("ffprobe json parse failed: {e}")))?;
    let video = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| CaptionError::source_open("no video stream found"))?;
    let width = video
        .width
        .filter(|&w| w > 0)
        .ok_or_else(|| CaptionError::source_open("missing video width from ffprobe"))?;
    let height = video
        .height
        .filter(|&h| h > 0)
        .ok_or_else(|| CaptionError::source_open("missing video height from ffprobe"))?;

    // Prefer the average rate; r_frame_rate can report field rates for interlaced material.
    let fps = [video.avg_frame_rate.as_deref(), video.r_frame_rate.as_deref()]
        .into_iter()
        .flatten()
        .find_map(Fps::parse_ratio)
        .ok_or_else(|| {
            CaptionError::source_open(format!(
                "source '{}' has no positive frame rate",
                source_path.display()
            ))
        })?;
    let duration_sec = parsed
        .format
        .as_ref()
        .and_then(|f| f.duration.as_deref())
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0);

    tracing::debug!(width, height, %fps, duration_sec, "probed source video");
    Ok(SourceInfo {
        width,
        height,
        fps,
        duration_sec,
    })
}

/// Frame source that streams decoded RGBA8 frames out of a system `ffmpeg` process.
///
/// Rewinding restarts the decoder at the beginning of the file.
pub struct FfmpegSource {
    path: PathBuf,
    info: SourceInfo,
    child: Option<Child>,
    stdout: Option<ChildStdout>,
    frame_len: usize,
}

impl FfmpegSource {
    /// Probe `path` and start decoding from its first frame.
    pub fn open(path: impl Into<PathBuf>) -> CaptionResult<Self> {
        let path = path.into();
        let info = probe_video(&path)?;
        let frame_len = (info.width as usize) * (info.height as usize) * 4;
        let mut source = Self {
            path,
            info,
            child: None,
            stdout: None,
            frame_len,
        };
        source.spawn_decoder()?;
        Ok(source)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn spawn_decoder(&mut self) -> CaptionResult<()> {
        self.stop_decoder();

        let mut child = Command::new("ffmpeg")
            .args(["-v", "error", "-nostdin", "-i"])
            .arg(&self.path)
            .args([
                "-map", "0:v:0", "-an", "-sn", "-f", "rawvideo", "-pix_fmt", "rgba", "pipe:1",
            ])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                CaptionError::source_open(format!(
                    "failed to spawn ffmpeg decoder for '{}': {e}",
                    self.path.display()
                ))
            })?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| CaptionError::source_open("failed to open ffmpeg stdout (unexpected)"))?;

        self.child = Some(child);
        self.stdout = Some(stdout);
        Ok(())
    }

    fn stop_decoder(&mut self) {
        drop(self.stdout.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl FrameSource for FfmpegSource {
    fn info(&self) -> &SourceInfo {
        &self.info
    }

    fn read_frame(&mut self) -> CaptionResult<Option<Frame>> {
        let Some(stdout) = self.stdout.as_mut() else {
            return Ok(None);
        };
        let mut buf = vec![0u8; self.frame_len];
        match stdout.read_exact(&mut buf) {
            Ok(()) => Frame::from_rgba8(self.info.width, self.info.height, buf).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => {
                tracing::warn!(error = %e, "source frame read failed, treating as end of stream");
                Ok(None)
            }
        }
    }

    fn rewind(&mut self) -> CaptionResult<()> {
        tracing::debug!(path = %self.path.display(), "rewinding source video");
        self.spawn_decoder()
    }
}

impl Drop for FfmpegSource {
    fn drop(&mut self) {
        self.stop_decoder();
    }
}

impl std::fmt::Debug for FfmpegSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FfmpegSource")
            .field("path", &self.path)
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}
