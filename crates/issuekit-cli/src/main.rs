//! issuekit CLI - compose issue tracker request bodies from manifests.

mod commands;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "issuekit")]
#[command(author, version, about = "Compose issue tracker request bodies")]
#[command(propagate_version = true)]
struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    format: output::OutputFormat,

    /// Project path (defaults to current directory)
    #[arg(long, short = 'C', global = true, env = "ISSUEKIT_PROJECT")]
    path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a project configuration
    Init,

    /// Compose the request body described by a manifest
    Compose {
        /// Manifest file (YAML or JSON)
        manifest: PathBuf,
    },

    /// Compose single-issue manifests into one bulk-create body
    Bulk {
        /// Manifest files or directories to search
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },

    /// List configured field aliases
    Aliases,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let project_path = match cli.path {
        Some(path) => path,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    match cli.command {
        Commands::Init => commands::init(&project_path, cli.format),
        Commands::Compose { manifest } => commands::compose(&project_path, &manifest, cli.format),
        Commands::Bulk { inputs } => commands::bulk(&project_path, &inputs, cli.format),
        Commands::Aliases => commands::aliases(&project_path, cli.format),
    }
}
