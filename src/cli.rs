use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "irrigops",
    version,
    about = "Weekly irrigation demand planner for smallholder blocks"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to config.yaml
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Re-run interactive setup
    Init,
    /// Validate config and test the forecast connection
    Check,
    /// Print this week's demand, uncertainty band and event schedule
    Schedule,
    /// Write this week's event schedule as CSV
    Export {
        /// Output file or directory
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Score model predictions against observations from a CSV file
    Accuracy {
        /// CSV with `predicted_mm` and `actual_mm` columns
        #[arg(short, long)]
        file: PathBuf,
    },
}
