use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use glam::{DVec2, DVec3, DVec4};

use procfield::scene::{DissolveScene, SineColorScene, WavingPlaneScene};
use procfield::{
    Canvas, Domain, FractalNoiseMaterial, FrameIndex, FrameRange, GraphSpec, ParamSet,
    PngSequenceSink, RenderThreading, SceneConfig, SceneKind, SequenceOpts, Value,
};

#[derive(Parser, Debug)]
#[command(name = "procfield", version)]
struct Cli {
    /// Log debug events (graph pruning, binding, pool setup) to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame of a scene as a PNG.
    Frame(FrameArgs),
    /// Render a numbered PNG sequence of a scene.
    Sequence(SequenceArgs),
    /// Render one of the built-in scenes as a PNG.
    Demo(DemoArgs),
    /// Evaluate a graph at one coordinate and print the primary output as JSON.
    Eval(EvalArgs),
}

#[derive(Args, Debug)]
struct ThreadingArgs {
    /// Shade rows in parallel.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,
}

impl ThreadingArgs {
    /// Command-line flags win over the scene file when set.
    fn apply(&self, threading: &mut RenderThreading) {
        if self.parallel {
            threading.parallel = true;
        }
        if self.threads.is_some() {
            threading.threads = self.threads;
        }
    }
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input scene JSON.
    #[arg(long)]
    scene: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Override the scene time, in seconds.
    #[arg(long)]
    time: Option<f64>,

    #[command(flatten)]
    threading: ThreadingArgs,
}

#[derive(Parser, Debug)]
struct SequenceArgs {
    /// Input scene JSON.
    #[arg(long)]
    scene: PathBuf,

    /// Output directory for `frame_NNNNN.png` files.
    #[arg(long)]
    out_dir: PathBuf,

    /// Number of frames.
    #[arg(long)]
    frames: u64,

    /// First frame index.
    #[arg(long, default_value_t = 0)]
    start: u64,

    #[command(flatten)]
    threading: ThreadingArgs,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DemoChoice {
    FractalNoise,
    Dissolve,
    SineColor,
    WavingPlane,
}

impl DemoChoice {
    fn scene(self) -> SceneKind {
        match self {
            Self::FractalNoise => SceneKind::FractalNoise(FractalNoiseMaterial::default()),
            Self::Dissolve => SceneKind::Dissolve(DissolveScene::default()),
            Self::SineColor => SceneKind::SineColor(SineColorScene::default()),
            Self::WavingPlane => SceneKind::WavingPlane(WavingPlaneScene::default()),
        }
    }
}

#[derive(Parser, Debug)]
struct DemoArgs {
    /// Built-in scene.
    #[arg(value_enum)]
    which: DemoChoice,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Width in pixels.
    #[arg(long, default_value_t = 256)]
    width: u32,

    /// Height in pixels.
    #[arg(long, default_value_t = 256)]
    height: u32,

    /// Time in seconds.
    #[arg(long, default_value_t = 0.0)]
    time: f64,

    #[command(flatten)]
    threading: ThreadingArgs,
}

#[derive(Parser, Debug)]
struct EvalArgs {
    /// Input graph JSON.
    #[arg(long)]
    graph: PathBuf,

    /// Coordinate x.
    #[arg(long, allow_negative_numbers = true)]
    x: f64,

    /// Coordinate y.
    #[arg(long, allow_negative_numbers = true)]
    y: f64,

    /// Coordinate z; switches to a volume domain.
    #[arg(long, allow_negative_numbers = true)]
    z: Option<f64>,

    /// Time in seconds.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    time: f64,

    /// Parameter binding `name=v` or `name=v1,v2[,v3[,v4]]`; repeatable.
    #[arg(long = "param", value_parser = parse_param)]
    params: Vec<(String, Value)>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Sequence(args) => cmd_sequence(args),
        Command::Demo(args) => cmd_demo(args),
        Command::Eval(args) => cmd_eval(args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn read_scene(path: &Path) -> anyhow::Result<SceneConfig> {
    SceneConfig::from_path(path).with_context(|| format!("load scene '{}'", path.display()))
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut cfg = read_scene(&args.scene)?;
    if let Some(t) = args.time {
        cfg.time = t;
    }
    args.threading.apply(&mut cfg.threading);
    render_png(&cfg, &args.out)
}

fn cmd_demo(args: DemoArgs) -> anyhow::Result<()> {
    let mut cfg = SceneConfig {
        canvas: Canvas {
            width: args.width,
            height: args.height,
        },
        time: args.time,
        ..SceneConfig::new(args.which.scene())
    };
    args.threading.apply(&mut cfg.threading);
    render_png(&cfg, &args.out)
}

fn render_png(cfg: &SceneConfig, out: &Path) -> anyhow::Result<()> {
    let shader = cfg.build().context("build scene")?;
    let frame = procfield::render_frame(&shader, cfg.canvas, cfg.time, &cfg.threading, None)
        .context("render frame")?;

    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    frame
        .save_png(out)
        .with_context(|| format!("write png '{}'", out.display()))?;

    eprintln!("wrote {}", out.display());
    Ok(())
}

fn cmd_sequence(args: SequenceArgs) -> anyhow::Result<()> {
    let mut cfg = read_scene(&args.scene)?;
    args.threading.apply(&mut cfg.threading);
    let shader = cfg.build().context("build scene")?;

    let end = args
        .start
        .checked_add(args.frames)
        .context("frame range overflows")?;
    let opts = SequenceOpts {
        range: FrameRange::new(FrameIndex(args.start), FrameIndex(end))?,
        fps: cfg.fps,
        threading: cfg.threading.clone(),
    };
    let mut sink = PngSequenceSink::new(&args.out_dir);
    let stats = procfield::render_sequence(&shader, cfg.canvas, &opts, &mut sink, None)
        .context("render sequence")?;

    eprintln!(
        "wrote {} frames to {}",
        stats.frames_rendered,
        args.out_dir.display()
    );
    Ok(())
}

fn cmd_eval(args: EvalArgs) -> anyhow::Result<()> {
    let spec = GraphSpec::from_path(&args.graph)
        .with_context(|| format!("load graph '{}'", args.graph.display()))?;
    let graph = spec.build().context("build graph")?;

    let mut params = ParamSet::new();
    for (name, value) in args.params {
        params.insert(name, value);
    }
    let domain = if args.z.is_some() || graph.uses_position() {
        Domain::Volume
    } else {
        Domain::Planar
    };
    let coord = DVec3::new(args.x, args.y, args.z.unwrap_or(0.0));
    let bound = graph.bind(domain, &params).context("bind graph")?;
    let value = bound.eval(coord, args.time);

    println!("{}", serde_json::to_string(&value)?);
    Ok(())
}

fn parse_param(s: &str) -> Result<(String, Value), String> {
    let (name, rest) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{s}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing parameter name in '{s}'"));
    }
    let lanes = rest
        .split(',')
        .map(|v| {
            v.trim()
                .parse::<f64>()
                .map_err(|e| format!("invalid number '{v}' for '{name}': {e}"))
        })
        .collect::<Result<Vec<f64>, String>>()?;
    let value = match lanes.as_slice() {
        [x] => Value::Scalar(*x),
        [x, y] => Value::Vec2(DVec2::new(*x, *y)),
        [x, y, z] => Value::Vec3(DVec3::new(*x, *y, *z)),
        [x, y, z, w] => Value::Vec4(DVec4::new(*x, *y, *z, *w)),
        _ => return Err(format!("'{name}' must have 1 to 4 components")),
    };
    Ok((name.to_owned(), value))
}
