//! CLI interface for event-form

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;

use crate::config::Config;
use crate::improver;
use crate::server;
use crate::store::SubmissionStore;

#[derive(Parser)]
#[command(name = "event-form")]
#[command(about = "Telegram Mini-App form service for event content update requests", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true, env = "EVENT_FORM_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server (default)
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
        /// Directory for submission files
        #[arg(long)]
        logs_dir: Option<PathBuf>,
    },
    /// Print the improved version of a text (reads stdin if omitted)
    Improve {
        text: Option<String>,
    },
    /// Print the aggregate submission log
    Logs {
        /// Directory for submission files
        #[arg(long)]
        logs_dir: Option<PathBuf>,
    },
    /// Print the effective configuration
    Config,
}

/// Parse arguments and dispatch
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;

    match cli.command.unwrap_or(Commands::Serve { port: None, host: None, logs_dir: None }) {
        Commands::Serve { port, host, logs_dir } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(logs_dir) = logs_dir {
                config.storage.logs_dir = logs_dir;
            }
            server::start(config).await
        }
        Commands::Improve { text } => {
            let text = match text {
                Some(text) => text,
                None => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("Failed to read stdin")?;
                    buf
                }
            };
            println!("{}", improver::improve(&text));
            Ok(())
        }
        Commands::Logs { logs_dir } => {
            let logs_dir = logs_dir.unwrap_or(config.storage.logs_dir);
            let store = SubmissionStore::open(logs_dir)?;
            let logs = store.read_all()?;
            println!("{}", serde_json::to_string_pretty(&logs)?);
            Ok(())
        }
        Commands::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}
