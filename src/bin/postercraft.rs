use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{ArgAction, Parser, Subcommand};
use postercraft::PosterRenderer as _;

#[derive(Parser, Debug)]
#[command(name = "postercraft", version, about = "Compose marketing posters from JSON documents")]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the available style presets.
    Styles(StylesArgs),
    /// Print freshly generated copy for a poster document as JSON.
    Copy(CopyArgs),
    /// Render a poster document to PNG.
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct StylesArgs {
    /// Style catalog JSON (defaults to the built-in presets).
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Print the full presets as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct CopyArgs {
    /// Input poster document JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Seed for the copy generator (overrides the document seed).
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input poster document JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path, or a directory to write `<product name>.png` into.
    #[arg(long)]
    out: PathBuf,

    /// Device pixel ratio (overrides the document).
    #[arg(long)]
    dpr: Option<f64>,

    /// Style preset id (overrides the document).
    #[arg(long)]
    style: Option<String>,

    /// Product image file (overrides the document).
    #[arg(long)]
    image: Option<PathBuf>,

    /// Font file used for all text (overrides the document).
    #[arg(long)]
    font: Option<PathBuf>,

    /// Regenerate tagline, description, CTA, accent and bullets before rendering.
    #[arg(long)]
    refresh_copy: bool,

    /// Seed for the copy generator (overrides the document seed).
    #[arg(long)]
    seed: Option<u64>,

    /// Print the resolved font family to stderr.
    #[arg(long)]
    dump_font: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Styles(args) => cmd_styles(args),
        Command::Copy(args) => cmd_copy(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn read_document(path: &Path) -> anyhow::Result<postercraft::PosterDocument> {
    postercraft::PosterDocument::from_path(path)
        .with_context(|| format!("load poster document '{}'", path.display()))
}

fn cmd_styles(args: StylesArgs) -> anyhow::Result<()> {
    let catalog = match &args.catalog {
        Some(path) => postercraft::StyleCatalog::from_path(path)
            .with_context(|| format!("load style catalog '{}'", path.display()))?,
        None => postercraft::StyleCatalog::builtin(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(catalog.list_styles())?);
        return Ok(());
    }
    for style in catalog.list_styles() {
        println!("{:<12} {:<18} {}", style.id, style.name, style.description);
    }
    Ok(())
}

fn cmd_copy(args: CopyArgs) -> anyhow::Result<()> {
    let doc = read_document(&args.in_path)?;
    let mut studio = doc.open_studio(args.seed)?;
    let ticket = studio.request_copy();
    println!("{}", serde_json::to_string_pretty(ticket.copy())?);
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut doc = read_document(&args.in_path)?;
    if let Some(style) = args.style {
        doc.style = Some(style);
    }
    if let Some(dpr) = args.dpr {
        doc.device_pixel_ratio = dpr;
    }
    let settings = doc.render_settings();
    settings.validate()?;

    let mut studio = doc.open_studio(args.seed)?;
    if let Some(path) = args.image {
        let source = postercraft::ImageSource::Path(path.clone());
        let ticket = studio.begin_image_load(&source);
        let image = postercraft::load_image_source(&source)
            .with_context(|| format!("load image '{}'", path.display()))?;
        studio.finish_image_load(ticket, Ok(image));
    }
    if args.refresh_copy {
        studio.refresh_copy();
    }

    let mut backend = match args.font.or_else(|| doc.font_path()) {
        Some(path) => postercraft::CpuBackend::with_font_path(&path)
            .with_context(|| format!("load font '{}'", path.display()))?,
        None => postercraft::CpuBackend::with_system_font(),
    };
    if args.dump_font {
        match backend.font_family() {
            Some(family) => eprintln!("font family: {family}"),
            None => eprintln!("font family: <none, approximate metrics>"),
        }
    }

    let frame = backend.render_scene(&studio.scene(), &settings)?;
    let download = postercraft::export_download(&frame, &studio.form().product_name)?;

    let out = if args.out.is_dir() {
        args.out.join(&download.filename)
    } else {
        args.out
    };
    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&out, &download.png).with_context(|| format!("write png '{}'", out.display()))?;

    eprintln!("wrote {}", out.display());
    Ok(())
}
