//! Quill - a sandboxed AI coding agent for your terminal

use clap::Parser;
use std::path::PathBuf;
use tracing::error;

mod commands;

use commands::{clear_command, run_command};
use quill_agent::AgentError;
use quill_history::HistoryError;

/// Quill - AI coding agent
#[derive(Parser)]
#[command(name = "quill")]
#[command(about = "A sandboxed AI coding agent for your terminal")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// User prompt for the agent
    prompt: Vec<String>,

    /// Clear conversation history and exit
    #[arg(short, long)]
    clear: bool,

    /// Show tool calls with their arguments and results
    #[arg(short, long)]
    verbose: bool,

    /// Suppress tool call progress output
    #[arg(short, long)]
    silent: bool,

    /// Override the sandbox root directory
    #[arg(long)]
    root: Option<PathBuf>,

    /// Override the model name
    #[arg(long)]
    model: Option<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    if cli.clear {
        if let Err(e) = clear_command().await {
            error!("clear failed: {}", e);
            std::process::exit(1);
        }
        return;
    }

    let prompt = cli.prompt.join(" ");
    if prompt.trim().is_empty() {
        eprintln!("Please provide a prompt as a command-line argument.");
        std::process::exit(1);
    }

    match run_command(prompt, cli.verbose, cli.silent, cli.root, cli.model).await {
        Ok(answer) => {
            if !cli.silent {
                println!("Final response:");
            }
            println!("{}", answer);
        }
        Err(e) => {
            match e.downcast_ref::<AgentError>() {
                Some(AgentError::IterationLimit(_)) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(2);
                }
                Some(AgentError::History(HistoryError::Corrupt(_))) => {
                    eprintln!("Error: {}", e);
                    eprintln!(
                        "Run `quill --clear` to discard the corrupt history and start fresh."
                    );
                    std::process::exit(1);
                }
                _ => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }
}
