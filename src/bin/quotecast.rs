use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use quotecast::{
    AnimationName, CaptureController, CardConfig, Clock, CpuSnapshotter, EncodedVideo,
    FfmpegEncoder, FfmpegEncoderOpts, Fps, OverlayControl, PreviewRegion, SystemClock, TextAlign,
    Timeline, VirtualClock,
};

#[derive(Parser, Debug)]
#[command(name = "quotecast", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the card as a PNG.
    Image(ImageArgs),
    /// Record the animated card as an MP4 (requires `ffmpeg` on PATH).
    Video(VideoArgs),
    /// List style presets and animation names.
    Presets,
}

/// Card inputs shared by `image` and `video`. Flags override values from `--config`.
#[derive(Parser, Debug)]
struct CardArgs {
    /// Card JSON file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Caption text.
    #[arg(long)]
    caption: Option<String>,

    /// Style preset (see `quotecast presets`).
    #[arg(long)]
    preset: Option<String>,

    /// Animation name, e.g. `fadeIn` or `animate__bounce`.
    #[arg(long)]
    animation: Option<AnimationName>,

    /// Caption color (`#rrggbb` or `rgba(...)`).
    #[arg(long)]
    color: Option<String>,

    /// Background color.
    #[arg(long)]
    background: Option<String>,

    /// Overlay as `<hex>:<opacity percent>`, e.g. `#000000:40`.
    #[arg(long, value_parser = parse_overlay)]
    overlay: Option<OverlayControl>,

    /// Caption alignment.
    #[arg(long, value_enum)]
    align: Option<TextAlign>,

    /// Caption font (TTF/OTF).
    #[arg(long)]
    font: Option<PathBuf>,

    #[arg(long)]
    font_size: Option<f32>,

    /// Background image.
    #[arg(long)]
    image: Option<PathBuf>,

    /// Link the background image instead of embedding it.
    #[arg(long)]
    link_image: bool,

    /// Fill uncovered pixels white instead of leaving them transparent.
    #[arg(long)]
    opaque: bool,

    /// Output pixel multiplier.
    #[arg(long)]
    scale: Option<f32>,

    /// Directory for timestamped output files.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

#[derive(Parser, Debug)]
struct ImageArgs {
    #[command(flatten)]
    card: CardArgs,
}

#[derive(Parser, Debug)]
struct VideoArgs {
    #[command(flatten)]
    card: CardArgs,

    /// Recording length in milliseconds.
    #[arg(long)]
    duration_ms: Option<u64>,

    /// Frames per second.
    #[arg(long)]
    fps: Option<u32>,

    /// Explicit output path (defaults to a timestamped name in `--out-dir`).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Record against the wall clock instead of rendering as fast as possible.
    #[arg(long)]
    realtime: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Image(args) => cmd_image(args),
        Command::Video(args) => cmd_video(args),
        Command::Presets => cmd_presets(),
    }
}

fn load_card(args: &CardArgs) -> anyhow::Result<CardConfig> {
    let mut cfg = match &args.config {
        Some(path) => CardConfig::load(path)?,
        None => CardConfig::default(),
    };

    let style = &mut cfg.style;
    if let Some(name) = &args.preset {
        style.apply_preset(name)?;
    }
    if let Some(caption) = &args.caption {
        style.caption.clone_from(caption);
    }
    if let Some(animation) = args.animation {
        style.animation = animation;
    }
    if let Some(c) = &args.color {
        style.text_color = Some(quotecast::parse_color(c).context("--color")?);
    }
    if let Some(c) = &args.background {
        style.background_color = Some(quotecast::parse_color(c).context("--background")?);
    }
    if let Some(o) = &args.overlay {
        style.overlay = Some(o.clone());
    }
    if let Some(align) = args.align {
        style.text_align = Some(align);
    }
    if let Some(font) = &args.font {
        style.font_path = Some(font.clone());
    }
    if let Some(size) = args.font_size {
        style.font_size_px = Some(size);
    }
    if let Some(image) = &args.image {
        style.background_image = Some(image.clone());
    }
    if args.link_image {
        style.embed_image = false;
    }

    if args.opaque {
        cfg.snapshot.transparent_background = false;
    }
    if let Some(scale) = args.scale {
        cfg.snapshot.scale = scale;
    }
    Ok(cfg)
}

fn parse_overlay(s: &str) -> Result<OverlayControl, String> {
    let (color, opacity) = s
        .rsplit_once(':')
        .ok_or_else(|| format!("expected <hex>:<opacity>, got \"{s}\""))?;
    let opacity: f64 = opacity
        .trim()
        .parse()
        .map_err(|_| format!("invalid overlay opacity \"{opacity}\""))?;
    quotecast::hex_to_rgba(color, opacity).map_err(|e| e.to_string())?;
    Ok(OverlayControl {
        color: color.trim().to_owned(),
        opacity,
    })
}

fn bind_region(cfg: &CardConfig) -> anyhow::Result<PreviewRegion> {
    let mut region = PreviewRegion::new(cfg.style.canvas);
    quotecast::bind(&cfg.style, &mut region)?;
    Ok(region)
}

fn cmd_image(args: ImageArgs) -> anyhow::Result<()> {
    let cfg = load_card(&args.card)?;
    let region = bind_region(&cfg)?;

    let path = quotecast::export_png(
        &region,
        &mut CpuSnapshotter::new(),
        &cfg.snapshot,
        &args.card.out_dir,
    )?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn cmd_video(args: VideoArgs) -> anyhow::Result<()> {
    let mut cfg = load_card(&args.card)?;
    if let Some(ms) = args.duration_ms {
        cfg.capture.total_duration_ms = ms;
    }
    if let Some(fps) = args.fps {
        cfg.capture.fps = Fps::new(fps, 1)?;
    }
    let mut region = bind_region(&cfg)?;

    if !quotecast::is_ffmpeg_on_path() {
        anyhow::bail!("ffmpeg not found on PATH");
    }

    let mut enc_opts = FfmpegEncoderOpts::new(args.card.out_dir.clone());
    enc_opts.out_path = args.out;
    if let Some(bg) = region.background_color {
        enc_opts.bg_rgba = bg.to_rgba8();
    }
    let mut ctl = CaptureController::with_snapshot_opts(
        CpuSnapshotter::new(),
        FfmpegEncoder::new(enc_opts),
        cfg.snapshot,
    );

    let video = if args.realtime {
        record(&mut ctl, &mut region, &cfg, Timeline::new(SystemClock::new()))?
    } else {
        record(&mut ctl, &mut region, &cfg, Timeline::new(VirtualClock::new()))?
    };

    let stats = ctl.stats();
    if stats.frames_dropped > 0 || video.frames_skipped > 0 {
        eprintln!(
            "warning: {} frame(s) dropped, {} skipped",
            stats.frames_dropped, video.frames_skipped
        );
    }
    let path = video
        .path
        .context("encoder did not report an output path")?;
    eprintln!("wrote {} ({} frames)", path.display(), video.frames_encoded);
    Ok(())
}

fn record<C: Clock>(
    ctl: &mut CaptureController<CpuSnapshotter, FfmpegEncoder>,
    region: &mut PreviewRegion,
    cfg: &CardConfig,
    mut timeline: Timeline<C>,
) -> anyhow::Result<EncodedVideo> {
    ctl.start(region, cfg.style.animation, cfg.capture, &mut timeline)?;
    let video = ctl
        .run(region, &mut timeline)?
        .context("recording ended without producing a video")?;
    Ok(video)
}

fn cmd_presets() -> anyhow::Result<()> {
    println!("presets:");
    for p in quotecast::PRESETS {
        let overlay = p
            .overlay
            .map(|(c, o)| format!("{c} @ {o}%"))
            .unwrap_or_else(|| "none".to_owned());
        println!(
            "  {:<10} size {:>3}px  text {}  background {}  overlay {}",
            p.name, p.font_size_px, p.text_color, p.background_color, overlay
        );
    }
    println!("animations:");
    for a in AnimationName::ALL {
        println!("  {a}");
    }
    Ok(())
}
