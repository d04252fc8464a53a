//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod config_cmd;
mod helpers;
mod search;
mod serve;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::config::{load_settings_with_options, LoadOptions};
use crate::models::SearchParams;

#[derive(Parser)]
#[command(name = "licita")]
#[command(about = "Resilient search over Brazilian public procurement notices (PNCP)")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true, env = "LICITACOES_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Search procurement notices
    Search {
        /// Free-text query
        query: Option<String>,
        /// Page number
        #[arg(short, long, default_value = "1")]
        page: u32,
        /// Results per page (default from config)
        #[arg(long)]
        page_size: Option<u32>,
        /// Notice status (e.g. recebendo_proposta)
        #[arg(short, long)]
        status: Option<String>,
        /// Two-letter state code
        #[arg(long)]
        uf: Option<String>,
        /// Modality code (1-13)
        #[arg(short, long)]
        modalidade: Option<u32>,
        /// Earliest publication date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Latest publication date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Start the HTTP API server
    Serve {
        /// Address to bind to: PORT, HOST, or HOST:PORT (default from config: 127.0.0.1:3030)
        bind: Option<String>,
    },

    /// Show effective configuration
    Config,
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let options = LoadOptions {
        config_path: cli.config,
        ignore_env: false,
    };
    let (settings, config) = load_settings_with_options(options)?;

    match cli.command {
        Commands::Search {
            query,
            page,
            page_size,
            status,
            uf,
            modalidade,
            from,
            to,
            json,
        } => {
            let params = SearchParams {
                page,
                page_size,
                query,
                status,
                uf,
                modalidade,
                date_from: from,
                date_to: to,
            };
            search::cmd_search(&settings, params, json).await
        }
        Commands::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| settings.bind.clone());
            serve::cmd_serve(&settings, &bind).await
        }
        Commands::Config => config_cmd::cmd_config_show(&settings, &config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_arguments() {
        let cli = Cli::try_parse_from([
            "licita",
            "-v",
            "search",
            "merenda escolar",
            "--uf",
            "sp",
            "--from",
            "2024-03-01",
            "--page",
            "2",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Commands::Search {
                query,
                uf,
                from,
                page,
                json,
                ..
            } => {
                assert_eq!(query.as_deref(), Some("merenda escolar"));
                assert_eq!(uf.as_deref(), Some("sp"));
                assert_eq!(from, NaiveDate::from_ymd_opt(2024, 3, 1));
                assert_eq!(page, 2);
                assert!(!json);
            }
            _ => panic!("expected search command"),
        }
    }

    #[test]
    fn test_parse_serve_without_bind() {
        let cli = Cli::try_parse_from(["licita", "serve"]).unwrap();
        assert!(matches!(cli.command, Commands::Serve { bind: None }));
    }
}
