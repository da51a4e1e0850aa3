// brokerbase CLI - headless graph operations

mod exit_codes;
mod graph_ops;
mod import;
mod store;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::EXIT_SUCCESS;

#[derive(Parser)]
#[command(name = "bbase")]
#[command(about = "Broker CRM entity graph: import, recompute, dedup")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a sheet into a graph file
    Import {
        #[command(subcommand)]
        command: import::ImportCommands,
    },

    /// Re-derive statuses and potential values in a graph file
    #[command(after_help = "\
Examples:
  bbase recompute graph.json
  bbase recompute graph.json --json")]
    Recompute {
        /// Graph JSON file
        graph: PathBuf,

        /// Output the reports as JSON to stdout
        #[arg(long)]
        json: bool,
    },

    /// List agent records that collapse to the same person
    #[command(after_help = "\
Examples:
  bbase dedup graph.json
  bbase dedup graph.json --json
  bbase dedup graph.json --all")]
    Dedup {
        /// Graph JSON file
        graph: PathBuf,

        /// Output identities as JSON to stdout
        #[arg(long)]
        json: bool,

        /// Include single-record identities
        #[arg(long)]
        all: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Import { command } => import::cmd_import(command),
        Commands::Recompute { graph, json } => graph_ops::cmd_recompute(graph, json),
        Commands::Dedup { graph, json, all } => graph_ops::cmd_dedup(graph, json, all),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}
