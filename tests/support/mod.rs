#![allow(dead_code)]

use captionfx::{CaptionResult, Fps, Frame, GlyphMask, GlyphRasterizer, InMemorySource, Rgb8};

/// Rasterizer without fonts: every char is a solid block `size_px` tall whose width depends on
/// the char, so different captions produce different pixels.
#[derive(Debug, Default)]
pub struct BlockRasterizer {
    pub calls: usize,
}

impl BlockRasterizer {
    pub fn char_width(c: char) -> u32 {
        4 + 2 * (c as u32 % 7)
    }
}

impl GlyphRasterizer for BlockRasterizer {
    fn rasterize(&mut self, text: &str, size_px: f32) -> CaptionResult<GlyphMask> {
        self.calls += 1;
        let width = text.chars().map(Self::char_width).sum::<u32>().max(1);
        let height = size_px.round().max(1.0) as u32;
        GlyphMask::new(width, height, vec![255; (width * height) as usize])
    }
}

/// `n` solid frames whose red channel encodes the frame index.
pub fn indexed_frames(n: usize, width: u32, height: u32) -> Vec<Frame> {
    (0..n)
        .map(|i| Frame::solid(width, height, Rgb8::new((i * 20) as u8, 60, 90)))
        .collect()
}

pub fn indexed_source(n: usize, fps: u32) -> InMemorySource {
    InMemorySource::new(indexed_frames(n, 64, 32), Fps::new(fps, 1).unwrap()).unwrap()
}

pub fn ffmpeg_tools_available() -> bool {
    let ok = |tool: &str| {
        std::process::Command::new(tool)
            .arg("-version")
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    };
    ok("ffmpeg") && ok("ffprobe")
}

pub fn scratch_dir(name: &str) -> std::path::PathBuf {
    let dir = std::path::PathBuf::from("target")
        .join("captionfx_tests")
        .join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
