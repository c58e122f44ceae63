//! CLI command definitions and handlers

mod check_url;
mod checks;
mod init;
mod scan;

use crate::config::{load_config, load_config_file, SeoConfig};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Parse and validate workers count (1-64)
fn parse_workers(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("workers must be at least 1".to_string())
    } else if n > 64 {
        Err("workers cannot exceed 64".to_string())
    } else {
        Ok(n)
    }
}

/// seo - On-page SEO audits from the command line
#[derive(Parser, Debug)]
#[command(name = "seo")]
#[command(
    version,
    about = "Audit web pages for on-page SEO issues and score them",
    after_help = "\
Examples:
  seo check-url https://example.com          Score a single page
  seo check-url https://example.com --explain   Show every check
  seo check-url https://example.com -f json  JSON output for scripting
  seo scan                                   Audit every URL in seo.toml
  seo checks                                 List the active checks"
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Config file (default: seo.toml or .seorc.json in the current directory)
    #[arg(long, global = true, env = "SEO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Number of pages audited in parallel during a scan (1-64)
    #[arg(long, global = true, value_parser = parse_workers)]
    pub workers: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check the SEO of a single URL and print its score
    CheckUrl {
        /// Page to audit
        url: String,

        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,

        /// Print every executed check with its outcome
        #[arg(long)]
        explain: bool,
    },

    /// Audit every URL listed in the config
    Scan {
        /// Run the scan as a background job on the "seo" queue
        #[arg(long)]
        queued: bool,

        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// List the checks that would run, in run order
    Checks,

    /// Write an example seo.toml to the current directory
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::CheckUrl {
            ref url,
            ref format,
            explain,
        } => {
            let config = resolve_config(cli.config.as_deref(), cli.workers)?;
            check_url::run(config, url, format.parse()?, explain)
        }
        Commands::Scan { queued, ref format } => {
            let config = resolve_config(cli.config.as_deref(), cli.workers)?;
            scan::run(config, format.parse()?, queued)
        }
        Commands::Checks => {
            let config = resolve_config(cli.config.as_deref(), cli.workers)?;
            checks::run(&config)
        }
        Commands::Init { force } => {
            let dir = std::env::current_dir().context("Failed to read current directory")?;
            init::run(&dir, force)
        }
    }
}

/// Explicit config file, else discovery in the working directory
fn resolve_config(path: Option<&Path>, workers: Option<usize>) -> Result<SeoConfig> {
    let mut config = match path {
        Some(path) => load_config_file(path)?,
        None => {
            let dir = std::env::current_dir().context("Failed to read current directory")?;
            load_config(&dir)
        }
    };
    if let Some(workers) = workers {
        config.scan.workers = workers;
    }
    Ok(config)
}
