//! CLI binary for querymix.
//!
//! Tracing goes to stderr so stdout carries only the batch.

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use querymix::{AppConfig, OutputFormat, QueryEngine, SourceKind, output};
use tracing_subscriber::EnvFilter;

/// querymix: diversified search-query batches from several sources.
#[derive(Parser)]
#[command(name = "querymix", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Option<Command>,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Fetch one batch of queries and print it.
    Fetch {
        /// Number of queries to return (clamped to 1..=200).
        #[arg(short = 'n', long, default_value_t = 10)]
        count: usize,

        /// Restrict to these sources, in this order (repeatable).
        #[arg(short, long = "source")]
        sources: Vec<SourceKind>,

        /// Print JSON regardless of the configured format.
        #[arg(long)]
        json: bool,

        /// Include the per-source report.
        #[arg(long)]
        report: bool,
    },

    /// List the available source names.
    Sources,

    /// Write a default configuration file.
    InitConfig {
        /// Destination; defaults to the standard config path.
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("querymix=info,querymix_engine=info")),
        )
        .init();

    let cli = Cli::parse();

    let command = cli.command.unwrap_or(Command::Fetch {
        count: 10,
        sources: Vec::new(),
        json: false,
        report: false,
    });

    match command {
        Command::Fetch {
            count,
            sources,
            json,
            report,
        } => {
            let config = AppConfig::load(cli.config.as_deref())?;
            run_fetch(config, count, sources, json, report).await
        }
        Command::Sources => {
            for kind in SourceKind::all() {
                println!("{kind}");
            }
            Ok(())
        }
        Command::InitConfig { path, force } => init_config(path, force),
    }
}

async fn run_fetch(
    mut config: AppConfig,
    count: usize,
    sources: Vec<SourceKind>,
    json: bool,
    with_report: bool,
) -> anyhow::Result<()> {
    if !sources.is_empty() {
        config.engine.sources = sources;
    }
    let format = if json {
        OutputFormat::Json
    } else {
        config.output.format
    };

    let mut engine = QueryEngine::new(config.engine)?;
    let (queries, report) = engine.fetch_queries_with_report(count).await;
    tracing::debug!(returned = report.returned, fallback = report.used_fallback, "batch ready");

    let rendered = output::render(&queries, with_report.then_some(&report), format)?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(rendered.as_bytes())?;
    if format == OutputFormat::Json {
        writeln!(stdout)?;
    }
    Ok(())
}

fn init_config(path: Option<PathBuf>, force: bool) -> anyhow::Result<()> {
    let path = path.unwrap_or_else(AppConfig::default_config_path);
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    AppConfig::default().save_to_file(&path)?;
    tracing::info!(path = %path.display(), "wrote default config");
    println!("{}", path.display());
    Ok(())
}
