use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "captionfx", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Burn a job's captions into a video (requires `ffmpeg` and `ffprobe` on PATH).
    Render(RenderArgs),
    /// Render a single captioned output frame as a PNG.
    Frame(FrameArgs),
    /// Rank posts of a Reddit-style listing JSON by upvotes.
    Trends(TrendsArgs),
    /// Split a text script into timed captions (prints job-file JSON).
    Script(ScriptArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Source video.
    #[arg(long)]
    video: PathBuf,

    /// Overlay job JSON.
    #[arg(long)]
    job: PathBuf,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Font file; overrides the job's `font`.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Animation mode (fade, slide, pulse, none); overrides the job's mode.
    #[arg(long)]
    animation: Option<String>,

    /// Draw frames in parallel chunks.
    #[arg(long)]
    parallel: bool,

    /// Worker threads for `--parallel`.
    #[arg(long)]
    threads: Option<usize>,

    /// Frames per parallel chunk.
    #[arg(long, default_value_t = 64)]
    chunk_size: usize,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[arg(long)]
    video: PathBuf,

    #[arg(long)]
    job: PathBuf,

    /// Output frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[arg(long)]
    font: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct TrendsArgs {
    /// Listing JSON file.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Drop posts whose title contains this keyword (repeatable).
    #[arg(long)]
    exclude: Vec<String>,

    #[arg(long, default_value_t = captionfx::DEFAULT_TREND_LIMIT)]
    limit: usize,

    /// Print the plain-text context block instead of JSON.
    #[arg(long)]
    context: bool,
}

#[derive(Parser, Debug)]
struct ScriptArgs {
    /// Script text file.
    #[arg(long = "in")]
    in_path: PathBuf,

    #[arg(long, default_value_t = 2.5)]
    words_per_second: f64,

    #[arg(long, default_value_t = 1.0)]
    min_seconds: f64,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Trends(args) => cmd_trends(args),
        Command::Script(args) => cmd_script(args),
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Job file plus the pieces every render needs.
struct LoadedJob {
    timeline: captionfx::Timeline,
    opts: captionfx::ComposeOpts,
    rasterizer: captionfx::FontRasterizer,
}

fn load_job(job_path: &Path, font_override: Option<&Path>) -> anyhow::Result<LoadedJob> {
    let job = captionfx::OverlayJob::from_path(job_path)
        .with_context(|| format!("load job '{}'", job_path.display()))?;
    let timeline = job.timeline()?;
    let style = job.style()?;

    let font_path = font_override
        .map(Path::to_path_buf)
        .or_else(|| job.font.clone())
        .context("a font is required: pass --font or set \"font\" in the job file")?;
    let rasterizer = captionfx::FontRasterizer::from_file(&font_path)
        .with_context(|| format!("load font '{}'", font_path.display()))?;

    Ok(LoadedJob {
        timeline,
        opts: captionfx::ComposeOpts {
            style,
            animation: job.animation,
            threading: captionfx::ComposeThreading::default(),
        },
        rasterizer,
    })
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut job = load_job(&args.job, args.font.as_deref())?;
    if let Some(mode) = args.animation.as_deref() {
        let Ok(mode) = mode.parse::<captionfx::AnimationMode>();
        job.opts.animation.mode = mode;
    }
    job.opts.threading = captionfx::ComposeThreading {
        parallel: args.parallel,
        chunk_size: args.chunk_size,
        threads: args.threads,
    };

    let stats = captionfx::compose_file(
        &args.video,
        &args.out,
        &job.timeline,
        &mut job.rasterizer,
        &job.opts,
    )?;

    eprintln!(
        "wrote {} ({} frames, {} captioned, {} source loops)",
        args.out.display(),
        stats.frames_total,
        stats.frames_captioned,
        stats.source_loops
    );
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut job = load_job(&args.job, args.font.as_deref())?;
    let frame = captionfx::render_preview_frame(
        &args.video,
        &job.timeline,
        &mut job.rasterizer,
        &job.opts,
        captionfx::FrameIndex(args.frame),
    )?;

    captionfx::ensure_parent_dir(&args.out)?;
    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_trends(args: TrendsArgs) -> anyhow::Result<()> {
    let listing = std::fs::read_to_string(&args.in_path)
        .with_context(|| format!("read listing '{}'", args.in_path.display()))?;
    let records = captionfx::rank_trends(&listing, &args.exclude, args.limit)?;

    if args.context {
        print!("{}", captionfx::trends_context(&records));
    } else {
        println!("{}", serde_json::to_string_pretty(&records)?);
    }
    Ok(())
}

fn cmd_script(args: ScriptArgs) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.in_path)
        .with_context(|| format!("read script '{}'", args.in_path.display()))?;
    let pacing = captionfx::Pacing {
        words_per_second: args.words_per_second,
        min_seconds: args.min_seconds,
    };
    let captions = captionfx::segment_script(&text, pacing)?;

    let out = serde_json::json!({ "captions": captions });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
