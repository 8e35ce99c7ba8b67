//! Warden CLI — security-smell scanners for pre-commit and CI.
//!
//! Each subcommand runs one scanner against the given paths; `warden scan`
//! runs the whole suite. The exit code is 1 when findings at or above the
//! severity threshold remain, so the binary slots directly into hooks.

mod commands;

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Warden: security smell scanners for source trees
#[derive(Parser, Debug)]
#[command(name = "warden", version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path (defaults to ./warden.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format: text, json, or markdown
    #[arg(short, long, global = true, default_value = "text")]
    pub format: String,

    /// Minimum severity to report: info, low, medium, high, critical
    #[arg(short, long, global = true)]
    pub severity: Option<String>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Scan for hardcoded credentials
    Credentials {
        /// Report raw credential values instead of masked ones
        #[arg(long)]
        show_values: bool,

        /// Files or directories to scan
        paths: Vec<PathBuf>,
    },
    /// Scan for hardcoded URLs
    Urls {
        /// Skip comment lines entirely
        #[arg(long)]
        exclude_comments: bool,

        /// Files or directories to scan
        paths: Vec<PathBuf>,
    },
    /// Scan for verbose and debug flags
    Verbose {
        /// Also report low-severity findings in test/dev paths
        #[arg(long)]
        include_safe_contexts: bool,

        /// Files or directories to scan
        paths: Vec<PathBuf>,
    },
    /// Scan Ansible playbooks, inventories, and configuration
    Ansible {
        /// Skip the vault-encryption check
        #[arg(long)]
        no_vault_check: bool,

        /// Files or directories to scan
        paths: Vec<PathBuf>,
    },
    /// Scan .NET sources and configuration
    Dotnet {
        /// Files or directories to scan
        paths: Vec<PathBuf>,
    },
    /// Check for license headers
    License {
        /// Fail on files with no license header
        #[arg(long)]
        require: bool,

        /// Required license kind (apache, mit, gpl, bsd, copyright)
        #[arg(long)]
        license_type: Option<String>,

        /// Files or directories to scan
        paths: Vec<PathBuf>,
    },
    /// Run the full scanner suite
    Scan {
        /// Files or directories to scan
        paths: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Human-readable stderr plus JSON file logging
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::new(filter));

    let log_dir = directories::ProjectDirs::from("dev", "warden", "warden")
        .map(|d| d.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("."));
    let _ = std::fs::create_dir_all(&log_dir);
    let file_appender = tracing_appender::rolling::daily(&log_dir, "warden.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(non_blocking)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let exit_code = commands::run(cli).await?;
    drop(_guard);
    std::process::exit(exit_code);
}
