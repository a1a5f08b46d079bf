use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands;

#[derive(Parser)]
#[command(name = "stockpulse")]
#[command(about = "Daily stock move alerts over SMS", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the alert pipeline once (intended to be invoked from cron)
    Run {
        /// Write the raw stock provider response to this file for inspection
        #[arg(long)]
        dump_response: Option<PathBuf>,

        /// Evaluate and format the alert but do not send the SMS
        #[arg(long)]
        dry_run: bool,
    },
    /// Verify that the required environment variables are present
    Check,
}

pub fn run() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            dump_response,
            dry_run,
        } => {
            commands::run::run(dump_response, dry_run);
        }
        Commands::Check => {
            commands::check::run();
        }
    }
}
