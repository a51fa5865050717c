//! Phiflow CLI entry point

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "phiflow")]
#[command(about = "Coherence-biased path search over weighted flow graphs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (shows every edge relaxation)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file with [search] and [score] tables
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

/// Search tunables that override the config file.
#[derive(Args, Debug, Default, Clone)]
pub struct SearchArgs {
    /// Multiplier on traditional edge cost
    #[arg(long)]
    pub cost_weight: Option<f64>,

    /// Multiplier on edge coherence (subtracted from cost)
    #[arg(long)]
    pub coherence_weight: Option<f64>,

    /// Lower bound on each edge's weighted contribution
    #[arg(long)]
    pub weight_floor: Option<f64>,

    /// Give up after this many relaxations
    #[arg(long)]
    pub max_relaxations: Option<usize>,

    /// Fail on nodes missing from the graph
    #[arg(long)]
    pub strict: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the best coherent route between two nodes
    Route {
        /// Graph file (.json or .toml)
        #[arg(short, long)]
        graph: PathBuf,

        /// Start node
        #[arg(long)]
        from: String,

        /// End node
        #[arg(long)]
        to: String,

        #[command(flatten)]
        search: SearchArgs,

        /// Print the route as JSON
        #[arg(long)]
        json: bool,
    },
    /// Route many node pairs over one graph
    Batch {
        /// Graph file (.json or .toml)
        #[arg(short, long)]
        graph: PathBuf,

        /// Query as FROM:TO, repeatable. Split at the first ':', so only TO may contain one
        #[arg(short, long = "pair", required = true)]
        pairs: Vec<String>,

        #[command(flatten)]
        search: SearchArgs,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Score the phi-coherence of an energy transfer
    Score {
        /// Magnitude before the transfer
        #[arg(long)]
        initial: f64,

        /// Magnitude after the transfer
        #[arg(long = "final")]
        final_magnitude: f64,

        /// Transfer efficiency, 0.0 to 1.0
        #[arg(long)]
        efficiency: f64,

        /// Change in system entropy
        #[arg(long, allow_negative_numbers = true)]
        entropy_change: f64,
    },
    /// Score how closely consecutive ratios of a sequence track PHI
    Sequence {
        /// Comma-separated values, e.g. 1,1,2,3,5
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true, required = true)]
        values: Vec<f64>,
    },
    /// Show version
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "phiflow={0},phiflow_core={0},phiflow_score={0}",
            log_level
        )))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Route { graph, from, to, search, json } => {
            commands::route(&graph, &from, &to, &config, &search, json)
        }
        Commands::Batch { graph, pairs, search, json } => {
            commands::batch(&graph, &pairs, &config, &search, json)
        }
        Commands::Score { initial, final_magnitude, efficiency, entropy_change } => {
            commands::score(&config, initial, final_magnitude, efficiency, entropy_change)
        }
        Commands::Sequence { values } => commands::sequence(&values),
        Commands::Version => {
            println!("Phiflow v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
