//! Trellis CLI - Command-line interface for Trellis
//!
//! This is the main entry point for users interacting with Trellis.
//! It provides commands for writing a config, ranking nodes and running
//! edge augmentation over an edge-list file.

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "trellis")]
#[command(author = "Trellis Contributors")]
#[command(version)]
#[command(about = "Densify sparse graphs with two-hop edge augmentation", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Configuration overrides shared by commands that run the engine.
///
/// Each flag can also come from the environment; flags win over
/// environment, which wins over the config file.
#[derive(Args, Debug, Default, Clone)]
pub struct ConfigArgs {
    /// JSON config file (see `trellis init`)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Maximum artificial edges incident to a node
    #[arg(long, env = "PER_NODE_EDGE_LIMIT")]
    pub per_node_limit: Option<usize>,

    /// Total edge count ceiling, existing edges included
    #[arg(long, env = "GLOBAL_EDGE_TARGET")]
    pub global_target: Option<usize>,

    /// Minimum common neighbors for a phase 1 edge
    #[arg(long, env = "TRIANGLE_SCORE_THRESHOLD")]
    pub triangle_threshold: Option<usize>,

    /// Radius of the phase 2 neighborhood
    #[arg(long, env = "LOCAL_BETWEENNESS_HOPS")]
    pub hops: Option<usize>,

    /// Stop the run after this many seconds
    #[arg(long, env = "TRELLIS_TIME_LIMIT")]
    pub time_limit: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default trellis.json
    Init {
        /// Directory to write into (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Add edges to a graph and write the result
    Augment {
        /// Input edge list
        input: PathBuf,

        /// Output edge list (original plus artificial edges)
        #[arg(short, long, default_value = "augmented_graph.edgelist")]
        output: PathBuf,

        /// Also write the artificial edges alone to this file
        #[arg(long)]
        artificial: Option<PathBuf>,

        /// Worker threads for scoring (defaults to all cores)
        #[arg(long)]
        threads: Option<usize>,

        /// Print statistics as JSON instead of formatted text
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Show the order nodes would be processed in
    Rank {
        /// Input edge list
        input: PathBuf,

        /// Maximum rows to print
        #[arg(short, long, default_value = "10")]
        limit: usize,

        /// Output as JSON instead of formatted text
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        config: ConfigArgs,
    },
}

fn main() {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let result = match cli.command {
        Commands::Init { path } => commands::init(&path),
        Commands::Augment {
            input,
            output,
            artificial,
            threads,
            json,
            config,
        } => commands::augment(
            &input,
            &output,
            artificial.as_deref(),
            threads,
            json,
            &config,
        ),
        Commands::Rank {
            input,
            limit,
            json,
            config,
        } => commands::rank(&input, limit, json, &config),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
