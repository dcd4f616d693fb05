//! node-history CLI
//!
//! Renders node change sets and event timelines from exported event logs.

use clap::{Parser, Subcommand};
use node_history_core::logging_facility::{init, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "node-history")]
#[command(about = "node-history - Render node change history", long_about = None)]
struct Cli {
    /// Human-readable debug logs instead of JSON logs on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show the property changes recorded by one event
    Diff(commands::diff::DiffArgs),
    /// List events grouped by day
    Timeline(commands::timeline::TimelineArgs),
}

fn main() {
    let cli = Cli::parse();

    init(if cli.verbose {
        Profile::Development
    } else {
        Profile::Production
    });

    let result = match cli.command {
        Commands::Diff(args) => commands::diff::execute(args),
        Commands::Timeline(args) => commands::timeline::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
