use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use reporting::projections::p900_sales_lines::{load_snapshot, SalesSnapshot};
use reporting::shared::config::{load_config, resolve_path, Config, OutputFormat};
use reporting::shared::reports::{catalog, render, run_report};
use reporting::system;

/// KPI reports over a coffee-shop sales snapshot
#[derive(Parser, Debug)]
#[command(name = "coffee-kpi", version, about, long_about = None)]
struct Cli {
    /// Path to config.toml (defaults to the one next to the executable)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Sales CSV, overrides `dataset.path`
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,

    /// Output format, overrides `output.format`
    #[arg(short, long, value_enum, global = true)]
    format: Option<OutputFormat>,

    /// Directory for csv/json reports, overrides `output.dir`
    #[arg(short, long, global = true)]
    out: Option<PathBuf>,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List available reports
    List,
    /// Headline indicators for the whole snapshot
    Kpi,
    /// Run the named reports
    Report {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Run every report in the catalog
    All,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    system::tracing::initialize(cli.verbose)?;

    if let Command::List = cli.command {
        for def in catalog() {
            println!("{:<24} {}", def.name, def.title);
        }
        return Ok(());
    }

    let mut config = load_config(cli.config.as_deref())?;
    apply_overrides(&mut config, &cli)?;

    let snapshot = load_snapshot(&config).context("failed to load sales snapshot")?;
    if snapshot.is_empty() {
        tracing::warn!("Sales snapshot is empty; reports will have no rows");
    }

    let names: Vec<String> = match &cli.command {
        Command::Kpi => vec!["kpi_overview".to_string()],
        Command::Report { names } => names.clone(),
        Command::All => catalog().iter().map(|r| r.name.to_string()).collect(),
        Command::List => Vec::new(),
    };

    let out_dir = resolve_path(&config, &config.output.dir);
    for name in &names {
        emit_report(name, &snapshot, config.output.format, &out_dir)?;
    }

    Ok(())
}

/// Command-line values win over the config file. Paths given on the command
/// line are relative to the working directory, not to the config file.
fn apply_overrides(config: &mut Config, cli: &Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("cannot read working directory")?;
    if let Some(data) = &cli.data {
        config.dataset.path = cwd.join(data).to_string_lossy().into_owned();
    }
    if let Some(format) = cli.format {
        config.output.format = format;
    }
    if let Some(out) = &cli.out {
        config.output.dir = cwd.join(out).to_string_lossy().into_owned();
    }
    Ok(())
}

fn emit_report(
    name: &str,
    snapshot: &SalesSnapshot,
    format: OutputFormat,
    out_dir: &Path,
) -> anyhow::Result<()> {
    let table = run_report(name, snapshot)?;
    if let Some(path) = render::emit(&table, format, out_dir)? {
        println!("{}", path.display());
    }
    Ok(())
}
