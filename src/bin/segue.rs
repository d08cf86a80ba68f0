use std::{
    cell::RefCell,
    path::{Path, PathBuf},
    rc::Rc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "segue", version)]
struct Cli {
    /// Optional config JSON (`pollIntervalMs`, `preview`, `discovery`).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List transition types and presets.
    Catalog(CatalogArgs),
    /// Attach a transition between two adjacent clips of a project file.
    Add(AddArgs),
    /// Remove the transition touching a clip.
    Remove(RemoveArgs),
    /// Render one preview frame of a transition type as a PNG.
    Preview(PreviewArgs),
    /// Print the ffmpeg `xfade` filter graph of every stored transition.
    Filter(FilterArgs),
}

#[derive(Parser, Debug)]
struct CatalogArgs {
    /// Only list this category (`fade`, `wipe`, `slide`, `zoom`, `effect`, `shape`).
    #[arg(long)]
    category: Option<String>,

    /// List presets instead of types.
    #[arg(long)]
    presets: bool,
}

#[derive(Parser, Debug)]
struct AddArgs {
    /// Project JSON, rewritten in place.
    #[arg(long)]
    project: PathBuf,

    /// Outgoing clip id.
    #[arg(long)]
    from: String,

    /// Incoming clip id; defaults to the clip following `--from` on its track.
    #[arg(long)]
    to: Option<String>,

    /// Transition type id.
    #[arg(long = "type")]
    type_id: String,

    /// Requested duration in seconds (clamped to the clips).
    #[arg(long)]
    duration: Option<f64>,
}

#[derive(Parser, Debug)]
struct RemoveArgs {
    /// Project JSON, rewritten in place.
    #[arg(long)]
    project: PathBuf,

    /// Clip whose transition is removed.
    #[arg(long)]
    clip: String,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Transition type id.
    #[arg(long = "type")]
    type_id: String,

    /// Progress in `[0, 1]`.
    #[arg(long, default_value_t = 0.5)]
    progress: f32,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Width override (defaults to config).
    #[arg(long)]
    width: Option<u32>,

    /// Height override (defaults to config).
    #[arg(long)]
    height: Option<u32>,
}

#[derive(Parser, Debug)]
struct FilterArgs {
    /// Project JSON.
    #[arg(long)]
    project: PathBuf,

    /// Append an `acrossfade` for the audio streams.
    #[arg(long)]
    audio: bool,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    match cli.cmd {
        Command::Catalog(args) => cmd_catalog(args),
        Command::Add(args) => cmd_add(args, config),
        Command::Remove(args) => cmd_remove(args, config),
        Command::Preview(args) => cmd_preview(args, &config),
        Command::Filter(args) => cmd_filter(args, config),
    }
}

fn init_tracing() {
    let filter = std::env::var("SEGUE_LOG")
        .ok()
        .and_then(|s| EnvFilter::try_new(s).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<segue::SegueConfig> {
    let config = match path {
        Some(p) => segue::SegueConfig::from_path(p)
            .with_context(|| format!("load config '{}'", p.display()))?,
        None => segue::SegueConfig::default(),
    };
    Ok(config.with_env_overrides())
}

/// Editor over `project` without a sync pass; the file is left untouched.
fn load_editor(
    project: &Path,
    config: segue::SegueConfig,
) -> anyhow::Result<segue::TransitionEditor> {
    let store = segue::JsonFileStore::open(project)
        .with_context(|| format!("open project '{}'", project.display()))?;
    let shared: segue::SharedStore = Rc::new(RefCell::new(store));
    Ok(segue::TransitionEditor::new(
        segue::StoreBridge::for_store(shared),
        config,
    ))
}

fn open_editor(
    project: &Path,
    config: segue::SegueConfig,
) -> anyhow::Result<segue::TransitionEditor> {
    let mut editor = load_editor(project, config)?;
    // First pass hydrates the mirror from the stored records.
    editor.tick();
    Ok(editor)
}

fn cmd_catalog(args: CatalogArgs) -> anyhow::Result<()> {
    let catalog = segue::TransitionCatalog::builtin();
    if args.presets {
        for (name, members) in catalog.presets() {
            println!("{name}: {}", members.join(", "));
        }
        return Ok(());
    }
    for ty in catalog.list(args.category.as_deref()) {
        println!(
            "{:<12} {:<8} {:>4.1}s  {} {}",
            ty.id,
            ty.category.as_str(),
            ty.default_duration_secs,
            ty.icon,
            ty.name
        );
    }
    Ok(())
}

fn cmd_add(args: AddArgs, config: segue::SegueConfig) -> anyhow::Result<()> {
    let mut editor = open_editor(&args.project, config)?;
    let options = args
        .duration
        .map(segue::TransitionOptions::with_duration)
        .unwrap_or_default();
    let from = segue::ClipId::new(args.from);
    let outcome = match args.to {
        Some(to) => editor.request_transition(
            segue::TransitionRequest::new(from, to, args.type_id).with_options(options),
        ),
        None => editor.request_transition_after(&from, &args.type_id, options),
    }
    .context("add transition")?;

    let t = outcome.instance();
    eprintln!(
        "{} {} -> {} ({:.3}s) in {}",
        t.type_id,
        t.from_clip_id,
        t.to_clip_id,
        t.duration_secs,
        args.project.display()
    );
    Ok(())
}

fn cmd_remove(args: RemoveArgs, config: segue::SegueConfig) -> anyhow::Result<()> {
    let mut editor = open_editor(&args.project, config)?;
    let clip = segue::ClipId::new(args.clip);
    let removed = editor
        .request_removal(&clip)
        .with_context(|| format!("remove transition of '{clip}'"))?;
    if removed {
        eprintln!("removed transition of {clip}");
    } else {
        eprintln!("no transition touches {clip}");
    }
    Ok(())
}

fn cmd_preview(args: PreviewArgs, config: &segue::SegueConfig) -> anyhow::Result<()> {
    let width = args.width.unwrap_or(config.preview.width);
    let height = args.height.unwrap_or(config.preview.height);
    anyhow::ensure!(width > 0 && height > 0, "preview size must be non-zero");

    let mut surface = segue::Surface::new(width, height);
    segue::render_preview(&args.type_id, args.progress, &mut surface);

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &args.out,
        &surface.to_straight_rgba(),
        width,
        height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_filter(args: FilterArgs, config: segue::SegueConfig) -> anyhow::Result<()> {
    let editor = load_editor(&args.project, config)?;
    for (t, graph) in editor
        .filter_graphs(args.audio)
        .context("build filter graphs")?
    {
        println!("# {} -> {} ({})", t.from_clip_id, t.to_clip_id, t.type_id);
        println!("{graph}");
    }
    Ok(())
}
