use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use crate::foundation::core::FrameIndex;
use crate::foundation::error::{CaptionError, CaptionResult};
use crate::media::sink::{FrameSink, SinkConfig};
use crate::render::frame::Frame;

/// Options for [`FfmpegSink`] MP4 output.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    pub out_path: PathBuf,
    /// Overwrite the output file if it already exists.
    pub overwrite: bool,
}

impl FfmpegSinkOpts {
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
        }
    }
}

/// Sink that spawns the system `ffmpeg` and streams raw RGBA frames to its stdin.
///
/// Output is H.264 at the configured rate, without audio. Even-sized frames are encoded as yuv420p;
/// odd sizes use yuv444p, which needs no chroma subsampling, so the output keeps the source
/// resolution. If the sink is dropped
/// before a successful [`FrameSink::end`], the encoder is killed and the partial file removed.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,

    scratch: Vec<u8>,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
    finished: bool,
}

impl FfmpegSink {
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            scratch: Vec::new(),
            cfg: None,
            last_idx: None,
            finished: false,
        }
    }

    pub fn out_path(&self) -> &Path {
        &self.opts.out_path
    }

    fn discard_partial_output(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        if let Some(handle) = self.stderr_drain.take() {
            let _ = handle.join();
        }
        if self.cfg.take().is_some() && self.opts.out_path.exists() {
            tracing::debug!(path = %self.opts.out_path.display(), "removing partial output");
            let _ = std::fs::remove_file(&self.opts.out_path);
        }
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> CaptionResult<()> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(CaptionError::output_write(
                "ffmpeg sink width/height must be non-zero",
            ));
        }
        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(CaptionError::output_write(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }
        // Fail on an unwritable destination before the encoder starts.
        std::fs::File::create(&self.opts.out_path).map_err(|e| {
            CaptionError::output_write(format!(
                "cannot create output '{}': {e}",
                self.opts.out_path.display()
            ))
        })?;
        self.cfg = Some(cfg);

        if !is_ffmpeg_on_path() {
            self.discard_partial_output();
            return Err(CaptionError::output_write(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }

        let pix_fmt = output_pix_fmt(cfg.width, cfg.height);
        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .arg("-y")
            .args([
                "-loglevel",
                "error",
                "-f",
                "rawvideo",
                "-pix_fmt",
                "rgba",
                "-s",
                &format!("{}x{}", cfg.width, cfg.height),
                // Rate goes before `-i` so it applies to the raw input.
                "-r",
                &cfg.fps.to_string(),
                "-i",
                "pipe:0",
                "-an",
                "-c:v",
                "libx264",
                "-pix_fmt",
                pix_fmt,
                "-movflags",
                "+faststart",
            ])
            .arg(&self.opts.out_path);

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                self.discard_partial_output();
                return Err(CaptionError::output_write(format!(
                    "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
                )));
            }
        };

        let (Some(stdin), Some(mut stderr)) = (child.stdin.take(), child.stderr.take()) else {
            self.child = Some(child);
            self.discard_partial_output();
            return Err(CaptionError::output_write(
                "failed to open ffmpeg pipes (unexpected)",
            ));
        };
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        tracing::debug!(
            out = %self.opts.out_path.display(),
            width = cfg.width,
            height = cfg.height,
            fps = %cfg.fps,
            pix_fmt,
            "started ffmpeg encoder"
        );
        self.scratch = vec![0u8; (cfg.width as usize) * (cfg.height as usize) * 4];
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.last_idx = None;
        self.finished = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &Frame) -> CaptionResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| CaptionError::output_write("ffmpeg sink not started"))?;
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(CaptionError::output_write(
                "ffmpeg sink received out-of-order frame index",
            ));
        }
        self.last_idx = Some(idx);

        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(CaptionError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        if frame.data.len() != self.scratch.len() {
            return Err(CaptionError::validation(
                "frame data size mismatch with width*height*4",
            ));
        }

        copy_opaque_rgba8(&mut self.scratch, &frame.data);

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(CaptionError::output_write("ffmpeg sink is already finalized"));
        };

        use std::io::Write as _;
        stdin.write_all(&self.scratch).map_err(|e| {
            CaptionError::output_write(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        Ok(())
    }

    fn end(&mut self) -> CaptionResult<()> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| CaptionError::output_write("ffmpeg sink not started"))?;

        let status = child.wait().map_err(|e| {
            CaptionError::output_write(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| CaptionError::output_write("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| {
                    CaptionError::output_write(format!("ffmpeg stderr read failed: {e}"))
                })?,
            None => Vec::new(),
        };

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(CaptionError::output_write(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }

        self.cfg = None;
        self.finished = true;
        Ok(())
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        if !self.finished {
            self.discard_partial_output();
        }
    }
}

/// Encoder pixel format for a `width x height` output.
fn output_pix_fmt(width: u32, height: u32) -> &'static str {
    if width.is_multiple_of(2) && height.is_multiple_of(2) {
        "yuv420p"
    } else {
        "yuv444p"
    }
}

/// Copy RGBA8 pixels forcing alpha to 255; the encoder input is declared opaque.
fn copy_opaque_rgba8(dst: &mut [u8], src: &[u8]) {
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        d[..3].copy_from_slice(&s[..3]);
        d[3] = 255;
    }
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> CaptionResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            CaptionError::output_write(format!(
                "failed to create output directory '{}': {e}",
                parent.display()
            ))
        })?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
