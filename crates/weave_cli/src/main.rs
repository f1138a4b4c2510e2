//! weave CLI: the command-line interface for the weave interconnect toolchain.
//!
//! Provides `weave embed` to size raw tiles, `weave array` and `weave place`
//! to compose and route modules, and `weave report` to summarize a stored
//! module.

#![warn(missing_docs)]

mod array;
mod embed;
mod pipeline;
mod place;
mod report;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// weave: physical embedding and routing for on-chip interconnects.
#[derive(Parser, Debug)]
#[command(name = "weave", version, about = "weave interconnect place-and-route")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a custom `weave.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Embed raw tiles into the unit-cell grid.
    Embed(EmbedArgs),
    /// Route a regular array of identical tiles.
    Array(ArrayArgs),
    /// Route connections between freely placed tiles and modules.
    Place(PlaceArgs),
    /// Summarize a stored module.
    Report(ReportArgs),
}

/// Arguments for the `weave embed` subcommand.
#[derive(Parser, Debug)]
pub struct EmbedArgs {
    /// Raw tiles to embed. Embeds every stored raw tile if omitted.
    pub names: Vec<String>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `weave array` subcommand.
#[derive(Parser, Debug)]
pub struct ArrayArgs {
    /// Embedded tile to replicate.
    pub tile: String,

    /// Number of tile rows.
    #[arg(long)]
    pub rows: usize,

    /// Number of tile columns.
    #[arg(long)]
    pub cols: usize,

    /// JSON file with the list of links to route.
    #[arg(short, long)]
    pub links: PathBuf,

    /// Name of the resulting module (default: `<tile>_<rows>x<cols>`).
    #[arg(short, long)]
    pub name: Option<String>,

    /// Route without saving the module.
    #[arg(long)]
    pub dry_run: bool,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `weave place` subcommand.
#[derive(Parser, Debug)]
pub struct PlaceArgs {
    /// JSON placement job: module size, components, and links.
    pub job: PathBuf,

    /// Route without saving the module.
    #[arg(long)]
    pub dry_run: bool,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `weave report` subcommand.
#[derive(Parser, Debug)]
pub struct ReportArgs {
    /// Module to summarize.
    pub name: String,

    /// Include the logical graph (JSON output only).
    #[arg(long)]
    pub graph: bool,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Result and diagnostic output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose information.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => std::env::var_os("NO_COLOR").is_none() && std::env::var_os("TERM").is_some(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Embed(ref args) => embed::run(args, &global),
        Command::Array(ref args) => array::run(args, &global),
        Command::Place(ref args) => place::run(args, &global),
        Command::Report(ref args) => report::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            pipeline::render_fatal(e.as_ref(), &global);
            process::exit(1);
        }
    }
}
