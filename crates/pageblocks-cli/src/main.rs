//! pageblocks: inspect, query, and validate block snapshots.
//!
//! ```bash
//! pageblocks tree page.json
//! pageblocks --wire tree rows-with-numeric-types.json
//! pageblocks query ancestors 0195a1b2 page.json
//! pageblocks validate page.json
//! pageblocks codec to-symbol 0 13 26
//! cat page.json | pageblocks flatten
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use pageblocks_cli::CliConfig;
use pageblocks_cli::commands::{self, Direction, Relation};
use pageblocks_cli::snapshot::load_snapshot;

/// Inspect nested content-block snapshots.
#[derive(Parser, Debug)]
#[command(name = "pageblocks", version)]
#[command(about = "Inspect, query, and validate pageblocks snapshots")]
struct Args {
    /// Config file (RON). Defaults to the user config dir.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Snapshot `type` fields are numeric tags
    #[arg(long, global = true)]
    wire: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the nested tree as an outline
    Tree {
        /// Snapshot file (stdin if omitted or "-")
        input: Option<PathBuf>,
        /// Print nested JSON instead of an outline
        #[arg(long)]
        json: bool,
    },
    /// Print all rows in pre-order with depth recomputed
    Flatten { input: Option<PathBuf> },
    /// List blocks related to one block
    Query {
        #[arg(value_enum)]
        relation: Relation,
        /// Block id or unique hex prefix
        id: String,
        input: Option<PathBuf>,
    },
    /// Check a snapshot for integrity and consistency problems
    Validate { input: Option<PathBuf> },
    /// Convert block type tags
    Codec {
        #[arg(value_enum)]
        direction: Direction,
        #[arg(required = true)]
        values: Vec<String>,
    },
}

fn init_tracing(config: &CliConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Output text and whether the command succeeded.
fn run(args: Args, config: &CliConfig) -> Result<(String, bool)> {
    let wire = args.wire;
    let out = match args.command {
        Command::Tree { input, json } => {
            let rows = load_snapshot(input.as_deref(), wire)?;
            commands::tree(&rows, config, json)?
        }
        Command::Flatten { input } => {
            let rows = load_snapshot(input.as_deref(), wire)?;
            commands::flatten(&rows)?
        }
        Command::Query {
            relation,
            id,
            input,
        } => {
            let rows = load_snapshot(input.as_deref(), wire)?;
            commands::query(&rows, relation, &id)?
        }
        Command::Validate { input } => {
            let rows = load_snapshot(input.as_deref(), wire)?;
            return Ok(commands::validate(&rows));
        }
        Command::Codec { direction, values } => commands::convert_tags(direction, &values)?,
    };
    Ok((out, true))
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match CliConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("pageblocks: {e}");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config);
    tracing::debug!(?config, "loaded config");

    match run(args, &config) {
        Ok((out, ok)) => {
            if !out.is_empty() {
                println!("{out}");
            }
            if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
        }
        Err(e) => {
            eprintln!("pageblocks: {e:#}");
            ExitCode::FAILURE
        }
    }
}
