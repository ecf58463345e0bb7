//! pixel-brief CLI - creative brief builder.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "pixel-brief")]
#[command(about = "Creative brief builder with live preview, local history and Word export")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to brief.toml config file
    #[arg(short, long, default_value = "brief.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default brief.toml
    Init {
        /// Overwrite an existing config
        #[arg(short, long)]
        yes: bool,
    },

    /// Start the brief builder in the browser
    Serve {
        /// Port to listen on (defaults to config or 8501)
        #[arg(short, long)]
        port: Option<u16>,

        /// Do not open browser
        #[arg(long)]
        no_open: bool,
    },

    /// Export a brief file as a Word document
    Export {
        /// TOML file with the brief fields
        brief: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Also append the brief to the history log
        #[arg(long)]
        save: bool,
    },

    /// List saved briefs, newest first
    History {
        /// Maximum rows to show
        #[arg(short, long)]
        limit: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    fmt().with_env_filter(filter).with_target(false).init();

    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&cli.config, yes).await?;
        }
        Commands::Serve { port, no_open } => {
            commands::serve::run(&cli.config, port, !no_open).await?;
        }
        Commands::Export {
            brief,
            output,
            save,
        } => {
            commands::export::run(&cli.config, &brief, &output, save).await?;
        }
        Commands::History { limit } => {
            commands::history::run(&cli.config, limit).await?;
        }
    }

    Ok(())
}
