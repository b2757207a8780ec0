//! tablegraph CLI - render a JSON schema model as a Graphviz diagram
//!
//! Usage:
//!   tablegraph <model.json> --catalog <catalog.json> [-o <out.svg>] [options]
//!
//! Without `-o` the DOT program is printed to stdout.

use clap::{Parser, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tablegraph::dot::DotRenderer;
use tablegraph::parser::Parser as ModelParser;
use tablegraph::render::{OutputFormat, Renderer};
use tablegraph::resolver::Catalog;
use tablegraph::style::{RankDir, StyleConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tablegraph")]
#[command(about = "Render nested table relationship models as Graphviz diagrams")]
#[command(version)]
struct Cli {
    /// Path to the JSON model
    model: PathBuf,

    /// JSON catalog mapping table names to [column, type] pairs
    #[arg(short, long)]
    catalog: PathBuf,

    /// Diagram name (defaults to the model file stem)
    #[arg(short, long)]
    name: Option<String>,

    /// Output file (default: DOT program on stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (default: inferred from the output extension, else svg).
    /// Only valid together with --output
    #[arg(short, long, requires = "output")]
    format: Option<FormatArg>,

    /// TOML style file
    #[arg(long)]
    style: Option<PathBuf>,

    /// Layout direction
    #[arg(long)]
    rank_dir: Option<RankDirArg>,

    /// Graph label
    #[arg(long)]
    watermark: Option<String>,

    /// Layout engine executable
    #[arg(long, default_value = "dot")]
    engine: String,
}

#[derive(Clone, ValueEnum)]
enum FormatArg {
    Dot,
    Svg,
    Png,
    Pdf,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Dot => OutputFormat::Dot,
            FormatArg::Svg => OutputFormat::Svg,
            FormatArg::Png => OutputFormat::Png,
            FormatArg::Pdf => OutputFormat::Pdf,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum RankDirArg {
    Tb,
    Lr,
    Bt,
    Rl,
}

impl From<RankDirArg> for RankDir {
    fn from(arg: RankDirArg) -> Self {
        match arg {
            RankDirArg::Tb => RankDir::TB,
            RankDirArg::Lr => RankDir::LR,
            RankDirArg::Bt => RankDir::BT,
            RankDirArg::Rl => RankDir::RL,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn read(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path.display(), e))
}

fn run(cli: Cli) -> Result<(), String> {
    let model = ModelParser::new(&read(&cli.model)?)
        .parse()
        .map_err(|e| format!("{}: {}", cli.model.display(), e))?;
    let catalog = Catalog::from_json(&read(&cli.catalog)?)
        .map_err(|e| format!("{}: {}", cli.catalog.display(), e))?;

    let mut style = match &cli.style {
        Some(path) => StyleConfig::from_toml(&read(path)?)
            .map_err(|e| format!("{}: {}", path.display(), e))?,
        None => StyleConfig::default(),
    };
    if let Some(rank_dir) = cli.rank_dir {
        style.rank_direction = rank_dir.into();
    }
    if let Some(watermark) = cli.watermark {
        style.watermark_label = watermark;
    }

    let name = cli.name.unwrap_or_else(|| {
        cli.model
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "model".to_string())
    });
    info!(model = %cli.model.display(), tables = catalog.len(), "building diagram {name}");

    let program = DotRenderer::new(style)
        .render(&model, &name, &catalog)
        .map_err(|e| e.to_string())?;

    match cli.output {
        Some(path) => {
            let format = cli
                .format
                .map(OutputFormat::from)
                .or_else(|| OutputFormat::from_path(&path))
                .unwrap_or_default();
            Renderer::new(cli.engine)
                .render(&program, &path, format)
                .map_err(|e| e.to_string())?;
            info!(path = %path.display(), format = format.extension(), "diagram written");
        }
        None => print!("{}", program),
    }
    Ok(())
}
