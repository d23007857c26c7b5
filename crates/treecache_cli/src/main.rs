//! treecache CLI
//!
//! Command-line tools for treecache patch logs.
//!
//! # Commands
//!
//! - `replay` - Apply a patch log and print the change records
//! - `verify` - Check that every patch in a log applies
//! - `split` - Show how a path resolves into segments

mod commands;

use clap::{Parser, Subcommand};
use commands::replay::{Format, ReplayOptions};
use commands::PathOptions;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// treecache command-line patch tools.
#[derive(Parser)]
#[command(name = "treecache")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Subscription base path stripped from patch paths
    #[arg(global = true, short, long)]
    base_path: Option<String>,

    /// Keep empty path segments instead of dropping them
    #[arg(global = true, long)]
    keep_empty_segments: bool,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a patch log and print the change records
    Replay {
        /// JSON-lines patch log
        log: PathBuf,

        /// Snapshot to load before replaying
        #[arg(short, long)]
        seed: Option<PathBuf>,

        /// Print the final cache contents
        #[arg(short, long)]
        dump: bool,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Continue past rejected patches
        #[arg(short, long)]
        keep_going: bool,
    },

    /// Check that every patch in a log applies
    Verify {
        /// JSON-lines patch log
        log: PathBuf,
    },

    /// Show how a path resolves into segments
    Split {
        /// Patch path
        path: String,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let paths = PathOptions {
        base_path: cli.base_path,
        keep_empty_segments: cli.keep_empty_segments,
    };

    match cli.command {
        Commands::Replay {
            log,
            seed,
            dump,
            format,
            keep_going,
        } => {
            let options = ReplayOptions {
                paths,
                seed,
                dump,
                format: Format::from_name(&format),
                keep_going,
            };
            commands::replay::run(&log, &options)?;
        }
        Commands::Verify { log } => {
            commands::verify::run(&log, &paths)?;
        }
        Commands::Split { path } => {
            commands::split::run(&path, &paths)?;
        }
        Commands::Version => {
            println!("treecache CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("treecache core v{}", treecache_core::VERSION);
        }
    }

    Ok(())
}
