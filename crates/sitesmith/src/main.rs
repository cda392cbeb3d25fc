// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sitesmith - websites for small businesses from a short questionnaire.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod check;
mod serve;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sitesmith_config::SitesmithConfig;

/// Sitesmith - websites for small businesses from a short questionnaire.
#[derive(Parser, Debug)]
#[command(name = "sitesmith", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP API and the job pipeline.
    Serve,
    /// Validate configuration and print a summary with secrets redacted.
    CheckConfig,
}

fn load_config(path: Option<&PathBuf>) -> SitesmithConfig {
    let loaded = match path {
        Some(path) => sitesmith_config::load_and_validate_path(path),
        None => sitesmith_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => config,
        Err(errors) => {
            sitesmith_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve) => {
            let config = load_config(cli.config.as_ref());
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::CheckConfig) => {
            let config = load_config(cli.config.as_ref());
            println!("configuration is valid");
            for (key, value) in check::summary(&config) {
                println!("  {key:<28} {value}");
            }
        }
        None => {
            println!("sitesmith: use --help for available commands");
        }
    }
}
