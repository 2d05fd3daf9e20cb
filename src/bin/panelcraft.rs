use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "panelcraft", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List layout templates for a panel count.
    Layouts(LayoutsArgs),
    /// Render a page document to a PNG at canvas resolution.
    Compose(ComposeArgs),
}

#[derive(Parser, Debug)]
struct LayoutsArgs {
    /// Number of panels on the page.
    #[arg(long)]
    panels: usize,

    /// Write an SVG selector thumbnail per template into this directory.
    #[arg(long)]
    svg_dir: Option<PathBuf>,

    /// Extra layout catalog JSON used instead of the built-in one.
    #[arg(long)]
    catalog: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Input page document JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Override the document's display width.
    #[arg(long)]
    display_width: Option<f64>,

    /// Engine configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Extra layout catalog JSON used instead of the built-in one.
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Backend to use.
    #[arg(long, value_enum, default_value_t = BackendChoice::Cpu)]
    backend: BackendChoice,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackendChoice {
    Cpu,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Layouts(args) => cmd_layouts(args),
        Command::Compose(args) => cmd_compose(args),
    }
}

fn read_catalog(path: Option<&Path>) -> anyhow::Result<panelcraft::LayoutCatalog> {
    let Some(path) = path else {
        return Ok(panelcraft::LayoutCatalog::builtin()?);
    };
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("read layout catalog '{}'", path.display()))?;
    Ok(panelcraft::LayoutCatalog::from_json_str(&s)?)
}

fn read_config(path: Option<&Path>) -> anyhow::Result<panelcraft::EngineConfig> {
    let Some(path) = path else {
        return Ok(panelcraft::EngineConfig::default());
    };
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("read engine config '{}'", path.display()))?;
    Ok(panelcraft::EngineConfig::from_json_str(&s)?)
}

fn cmd_layouts(args: LayoutsArgs) -> anyhow::Result<()> {
    let catalog = read_catalog(args.catalog.as_deref())?;
    let templates = catalog.templates_for_panel_count(args.panels);
    if templates.is_empty() {
        eprintln!("no layouts for {} panels", args.panels);
        return Ok(());
    }

    let style = panelcraft::ThumbnailStyle::default();
    if let Some(dir) = &args.svg_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create thumbnail dir '{}'", dir.display()))?;
    }
    for t in templates {
        println!("{}\t{}", t.id, t.name);
        if let Some(dir) = &args.svg_dir {
            let path = dir.join(format!("{}.svg", t.id));
            std::fs::write(&path, panelcraft::thumbnail_svg(t, &style))
                .with_context(|| format!("write thumbnail '{}'", path.display()))?;
        }
    }
    Ok(())
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let catalog = read_catalog(args.catalog.as_deref())?;
    let config = read_config(args.config.as_deref())?;
    let mut doc = panelcraft::PageDocument::from_path(&args.in_path)?;
    if let Some(w) = args.display_width {
        doc.display_width = w;
    }

    let base_dir = args.in_path.parent().unwrap_or_else(|| Path::new("."));
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("start async runtime")?;
    let mut session = runtime.block_on(doc.open(&catalog, config, base_dir))?;

    let kind = match args.backend {
        BackendChoice::Cpu => panelcraft::BackendKind::Cpu,
    };
    let mut backend = panelcraft::create_backend(kind, &panelcraft::RenderSettings::default())?;

    session.export(backend.as_mut())?;
    let page = session.accept()?;
    page.write_png(&args.out)?;

    eprintln!(
        "wrote {} ({}x{}, pixel ratio {:.3})",
        args.out.display(),
        page.width(),
        page.height(),
        page.pixel_ratio
    );
    Ok(())
}
