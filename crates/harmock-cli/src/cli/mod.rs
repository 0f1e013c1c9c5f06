//! CLI for replaying HTTP archives.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use harmock_core::config;
use std::path::PathBuf;

use commands::{run_completions, run_cookies, run_man, run_routes, run_serve, ServeArgs};

/// Top-level CLI for harmock.
#[derive(Debug, Parser)]
#[command(name = "harmock")]
#[command(about = "harmock: serve recorded HTTP archives as mock endpoints", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// List the routes a HAR file would register.
    Routes {
        /// Path to the HAR file.
        path: PathBuf,
    },

    /// Parse Set-Cookie header values and print them as JSON.
    Cookies {
        /// Set-Cookie values; comma-joined values are split first.
        #[arg(required = true)]
        values: Vec<String>,

        /// Keep cookie values percent-encoded.
        #[arg(long)]
        raw: bool,

        /// Print an object keyed by cookie name instead of a list.
        #[arg(long)]
        map: bool,
    },

    /// Replay a HAR file over HTTP.
    Serve {
        /// Path to the HAR file.
        path: PathBuf,

        /// Listen address (default from config, 127.0.0.1:8080).
        #[arg(long, value_name = "ADDR")]
        addr: Option<String>,

        /// Only answer when the query string matches the recorded one.
        #[arg(long)]
        strict_query: bool,

        /// Answer each recorded request only once.
        #[arg(long)]
        unique: bool,

        /// Suppress replay diagnostics.
        #[arg(long)]
        quiet: bool,

        /// Replace recorded Access-Control-Allow-Origin values with ORIGIN.
        #[arg(long, value_name = "ORIGIN")]
        cors_origin: Option<String>,

        /// Match scheme, host and port as recorded instead of the path alone.
        #[arg(long)]
        match_origin: bool,

        /// Answer with {"status": true} instead of the recorded body.
        #[arg(long)]
        acknowledge: bool,
    },

    /// Generate shell completions.
    Completions {
        /// Target shell.
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Generate the man page.
    Man,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Routes { path } => run_routes(&path)?,
            CliCommand::Cookies { values, raw, map } => run_cookies(&values, raw, map)?,
            CliCommand::Serve {
                path,
                addr,
                strict_query,
                unique,
                quiet,
                cors_origin,
                match_origin,
                acknowledge,
            } => {
                let cfg = config::load_or_init()?;
                tracing::debug!("loaded config: {:?}", cfg);
                let args = ServeArgs {
                    addr,
                    strict_query,
                    unique,
                    quiet,
                    cors_origin,
                    match_origin,
                    acknowledge,
                };
                run_serve(&path, args.apply(cfg)).await?;
            }
            CliCommand::Completions { shell } => run_completions(shell),
            CliCommand::Man => run_man()?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
