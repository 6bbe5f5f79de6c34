use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use scrollreel::{
    Collaborators, CpuSurface, FrameIndex, FrameRGBA, FsFrameLoader, OrientationClass,
    PlaybackController, PlaybackState, ReelConfig, ScrollProgress, StaticViewport, TimestampMs,
    ViewportMetrics, assets::locator::normalize_rel_path, foundation::core::Size,
};
use tracing_subscriber::EnvFilter;

const LOAD_TIMEOUT: Duration = Duration::from_secs(30);

type Controller = PlaybackController<FsFrameLoader, ScrollProgress, CpuSurface, StaticViewport>;

#[derive(Parser, Debug)]
#[command(name = "scrollreel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the asset locator of one frame.
    Locate(LocateArgs),
    /// Verify that every frame of every frame set exists under a root directory.
    Check(CheckArgs),
    /// Paint the surface at one scroll position and write it as a PNG.
    Frame(FrameArgs),
    /// Sweep the scroll extent and write one PNG per step.
    Scrub(ScrubArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OrientationArg {
    Wide,
    Tall,
    Any,
}

impl From<OrientationArg> for OrientationClass {
    fn from(o: OrientationArg) -> Self {
        match o {
            OrientationArg::Wide => Self::Wide,
            OrientationArg::Tall => Self::Tall,
            OrientationArg::Any => Self::Any,
        }
    }
}

#[derive(Args, Debug)]
struct LocateArgs {
    /// Deployment config JSON.
    #[arg(long)]
    config: PathBuf,

    #[arg(long, value_enum, default_value_t = OrientationArg::Wide)]
    orientation: OrientationArg,

    /// Frame index (0-based).
    #[arg(long)]
    index: u32,
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Deployment config JSON.
    #[arg(long)]
    config: PathBuf,

    /// Directory locators are resolved against.
    #[arg(long)]
    root: PathBuf,
}

#[derive(Args, Debug)]
struct ViewArgs {
    /// Deployment config JSON.
    #[arg(long)]
    config: PathBuf,

    /// Directory locators are resolved against.
    #[arg(long)]
    root: PathBuf,

    /// Viewport width in CSS pixels.
    #[arg(long)]
    width: f64,

    /// Viewport height in CSS pixels.
    #[arg(long)]
    height: f64,

    /// Device pixel ratio.
    #[arg(long, default_value_t = 1.0)]
    dpr: f64,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    view: ViewArgs,

    /// Scroll position as a fraction of the pinned scroll extent (0..=1).
    #[arg(long)]
    progress: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct ScrubArgs {
    #[command(flatten)]
    view: ViewArgs,

    /// Number of evenly spaced scroll positions, both ends included.
    #[arg(long, default_value_t = 10)]
    steps: u32,

    /// Output directory for `step_NNNN.png` files.
    #[arg(long)]
    out_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Locate(args) => cmd_locate(args),
        Command::Check(args) => cmd_check(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Scrub(args) => cmd_scrub(args),
    }
}

fn cmd_locate(args: LocateArgs) -> anyhow::Result<()> {
    let cfg = ReelConfig::from_json_path(&args.config)?;
    let catalog = cfg.catalog()?;
    let set = catalog.select(args.orientation.into());
    let index = FrameIndex(args.index);
    if !set.frame_count().contains(index) {
        anyhow::bail!(
            "index {} out of range (frame set has {} frames)",
            args.index,
            set.frame_count().get()
        );
    }
    println!("{}", set.locate(index));
    Ok(())
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let cfg = ReelConfig::from_json_path(&args.config)?;
    let catalog = cfg.catalog()?;

    let mut missing = 0usize;
    let mut total = 0usize;
    for set in catalog.frame_sets() {
        for (_, locator) in set.locators() {
            total += 1;
            let rel = normalize_rel_path(locator.as_str())?;
            if !args.root.join(&rel).is_file() {
                missing += 1;
                eprintln!("missing {locator}");
            }
        }
    }
    if missing > 0 {
        anyhow::bail!("{missing} of {total} frames missing under '{}'", args.root.display());
    }
    eprintln!("all {total} frames present");
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let (mut c, distance) = open_bound(&args.view)?;
    scroll_to(&mut c, args.progress.clamp(0.0, 1.0) * distance, TimestampMs(0))?;
    write_png(&args.out, &c.surface().snapshot())?;
    eprintln!("wrote {} (frame {})", args.out.display(), c.last_frame().0);
    c.teardown();
    Ok(())
}

fn cmd_scrub(args: ScrubArgs) -> anyhow::Result<()> {
    if args.steps < 2 {
        anyhow::bail!("--steps must be >= 2");
    }
    let (mut c, distance) = open_bound(&args.view)?;
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let last = f64::from(args.steps - 1);
    for step in 0..args.steps {
        let offset = distance * f64::from(step) / last;
        scroll_to(&mut c, offset, TimestampMs(u64::from(step)))?;
        let out = args.out_dir.join(format!("step_{step:04}.png"));
        write_png(&out, &c.surface().snapshot())?;
        eprintln!("wrote {} (frame {})", out.display(), c.last_frame().0);
    }
    c.teardown();
    Ok(())
}

/// Load the frame set for the viewport and drive the controller until a session is bound.
fn open_bound(view: &ViewArgs) -> anyhow::Result<(Controller, f64)> {
    let cfg = ReelConfig::from_json_path(&view.config)?;
    let metrics = ViewportMetrics::new(Size::new(view.width, view.height), view.dpr)?;
    let mut c = PlaybackController::from_config(
        &cfg,
        Collaborators {
            loader: FsFrameLoader::new(view.root.clone()),
            progress: ScrollProgress::new(Duration::ZERO),
            surface: CpuSurface::new(),
            viewport: StaticViewport::new(Some(metrics)),
        },
    )?;
    c.start()?;
    while c.state() == PlaybackState::Loading {
        let done = c.loader().next_timeout(LOAD_TIMEOUT)?;
        c.on_slot_resolved(done.ticket, done.outcome)?;
    }
    if c.state() != PlaybackState::Bound {
        anyhow::bail!("playback did not bind (state {:?})", c.state());
    }
    if let Some(store) = c.store() {
        let failed = store.failed_indices();
        if !failed.is_empty() {
            eprintln!("{} frames failed to load and will render blank", failed.len());
        }
    }
    Ok((c, cfg.scroll_distance_px))
}

fn scroll_to(c: &mut Controller, offset_px: f64, now: TimestampMs) -> anyhow::Result<()> {
    if let Some(update) = c.progress_source_mut().scroll_to(offset_px, now) {
        c.on_progress(update.session, update.value)?;
    }
    Ok(())
}

fn write_png(path: &Path, frame: &FrameRGBA) -> anyhow::Result<()> {
    if frame.width == 0 || frame.height == 0 {
        anyhow::bail!("surface is empty; nothing to write");
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        path,
        &frame.to_straight_rgba8(),
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}
