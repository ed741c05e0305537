use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "scrollreel", version)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Preload a sequence and render the frame shown at one scroll progress as a PNG.
    Frame(FrameArgs),
    /// Simulate scrolling through the intro container and print a JSON trace.
    Scrub(ScrubArgs),
    /// Print the scroll mapping for explicit container geometry as JSON.
    Map(MapArgs),
}

#[derive(Parser, Debug)]
struct SequenceArgs {
    /// Sequence config JSON (defaults apply when omitted).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory frame paths are resolved against.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Decode worker count (overrides the config).
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Parser, Debug)]
struct ViewportArgs {
    /// Viewport width in layout units.
    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    /// Viewport height in layout units.
    #[arg(long, default_value_t = 720.0)]
    height: f64,

    /// Device pixel ratio.
    #[arg(long, default_value_t = 1.0)]
    dpr: f64,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    seq: SequenceArgs,

    #[command(flatten)]
    viewport: ViewportArgs,

    /// Scroll progress in [0, 1].
    #[arg(long)]
    progress: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct ScrubArgs {
    #[command(flatten)]
    seq: SequenceArgs,

    #[command(flatten)]
    viewport: ViewportArgs,

    /// Document offset of the intro container's top edge.
    #[arg(long, default_value_t = 0.0)]
    container_offset: f64,

    /// Intro container height (defaults to 4 viewport heights).
    #[arg(long)]
    container_height: Option<f64>,

    /// Evenly spaced scroll positions from the top to the end of the intro.
    #[arg(long, default_value_t = 11)]
    steps: usize,

    /// Write the surface after each step as `step-NNN.png` into this directory.
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct MapArgs {
    /// Sequence config JSON (defaults apply when omitted).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Frame count (overrides the config).
    #[arg(long)]
    frames: Option<usize>,

    /// Container top relative to the viewport.
    #[arg(long, allow_hyphen_values = true)]
    top: f64,

    /// Container height.
    #[arg(long)]
    height: f64,

    /// Viewport height.
    #[arg(long)]
    viewport_height: f64,
}

#[derive(serde::Serialize)]
struct ScrubStep {
    scroll_y: f64,
    sample: Option<scrollreel::ScrollSample>,
    current_frame: Option<usize>,
}

#[derive(serde::Serialize)]
struct ScrubTrace {
    frames: usize,
    loaded: usize,
    failed: usize,
    steps: Vec<ScrubStep>,
    stats: scrollreel::ControllerStats,
    loader: scrollreel::LoaderState,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Scrub(args) => cmd_scrub(args),
        Command::Map(args) => cmd_map(args),
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<scrollreel::AnimatorConfig> {
    Ok(match path {
        Some(p) => scrollreel::AnimatorConfig::from_json_path(p)?,
        None => scrollreel::AnimatorConfig::default(),
    })
}

fn make_preloader(
    seq: &SequenceArgs,
    cfg: &scrollreel::AnimatorConfig,
) -> scrollreel::Preloader {
    let source = Arc::new(scrollreel::FsFrameSource::new(&seq.root));
    scrollreel::Preloader::new(source).with_threads(seq.threads.or(cfg.decode_threads))
}

fn make_viewport(args: &ViewportArgs) -> anyhow::Result<scrollreel::Viewport> {
    Ok(scrollreel::Viewport::new(args.width, args.height, args.dpr)?)
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.seq.config.as_deref())?;
    let viewport = make_viewport(&args.viewport)?;
    if !(0.0..=1.0).contains(&args.progress) {
        anyhow::bail!("--progress must be within [0, 1], got {}", args.progress);
    }

    let mut store = scrollreel::FrameStore::from_config(&cfg);
    let summary = make_preloader(&args.seq, &cfg).preload_all(&mut store, |tick| {
        tracing::debug!(percent = tick.percent, "preload");
    })?;
    if summary.failed > 0 {
        eprintln!("{} of {} frames failed to load", summary.failed, summary.total);
    }

    let index = scrollreel::ScrollMapper::from_config(&cfg).frame_index(args.progress);
    let surface = scrollreel::PixmapSurface::new(viewport.backing_size())?;
    let mut renderer = scrollreel::Renderer::new(surface);
    if let scrollreel::DrawOutcome::Skipped = renderer.resize(viewport, &store, Some(index)) {
        anyhow::bail!("frame {} ({}) is not available", index + 1, cfg.frame_path(index + 1));
    }

    write_png(&renderer.surface().snapshot(), &args.out)?;
    eprintln!("wrote {} (frame {})", args.out.display(), index + 1);
    Ok(())
}

fn cmd_scrub(args: ScrubArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.seq.config.as_deref())?;
    let viewport = make_viewport(&args.viewport)?;
    let container_height = args.container_height.unwrap_or(viewport.height * 4.0);
    let preloader = make_preloader(&args.seq, &cfg);
    let delay = cfg.loader_removal_delay();

    let host = scrollreel::HeadlessHost::new(viewport, args.container_offset, container_height);
    let surface = scrollreel::PixmapSurface::new(viewport.backing_size())?;
    let mut page = scrollreel::HeadlessPage::new(cfg, surface, host)?;
    page.start(&preloader)?;
    page.wait_until_ready();
    page.advance_frame();

    if let Some(dir) = &args.out_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create output dir '{}'", dir.display()))?;
    }

    let end = page.host().intro_scroll_end();
    let mut steps = Vec::with_capacity(args.steps);
    for k in 0..args.steps {
        let y = if args.steps > 1 {
            end * k as f64 / (args.steps - 1) as f64
        } else {
            0.0
        };
        page.scroll_to(y);
        let sample = page.advance_frame();
        steps.push(ScrubStep {
            scroll_y: page.host().scroll_y(),
            sample,
            current_frame: page.controller().state().current_frame,
        });
        if let Some(dir) = &args.out_dir {
            let path = dir.join(format!("step-{k:03}.png"));
            write_png(&page.controller().surface().snapshot(), &path)?;
        }
    }
    page.advance_time(delay);

    let store = page.controller().store();
    let trace = ScrubTrace {
        frames: store.count(),
        loaded: store.count_in_state(scrollreel::FrameState::Loaded),
        failed: store.count_in_state(scrollreel::FrameState::Failed),
        steps,
        stats: page.controller().stats(),
        loader: page.host().loader().clone(),
    };
    println!("{}", serde_json::to_string_pretty(&trace)?);
    Ok(())
}

fn cmd_map(args: MapArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(args.config.as_deref())?;
    if let Some(n) = args.frames {
        cfg.total_frames = n;
    }
    let mapper = scrollreel::ScrollMapper::from_config(&cfg);
    let geometry = scrollreel::ContainerGeometry::from_top_and_height(args.top, args.height);
    let sample = mapper.sample(geometry, args.viewport_height);
    println!("{}", serde_json::to_string_pretty(&sample)?);
    Ok(())
}

fn write_png(snapshot: &scrollreel::SurfaceSnapshot, out: &Path) -> anyhow::Result<()> {
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    let mut data = snapshot.data.clone();
    if snapshot.premultiplied {
        unpremultiply_rgba8_in_place(&mut data);
    }
    image::save_buffer_with_format(
        out,
        &data,
        snapshot.width,
        snapshot.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", out.display()))?;
    Ok(())
}

fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}
