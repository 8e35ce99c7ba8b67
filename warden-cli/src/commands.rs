//! Subcommand dispatch: configuration overlay, scan execution, rendering.

use crate::{Cli, Commands};
use anyhow::{bail, Context};
use std::path::PathBuf;
use warden_core::walk::collect_files;
use warden_core::{Finding, ReportFormat, ScanConfig, ScanContext, ScanRunner, Severity};

/// Run the CLI and return the process exit code.
pub async fn run(cli: Cli) -> anyhow::Result<i32> {
    let format: ReportFormat = cli.format.parse()?;
    let mut config = load_config(&cli)?;

    if let Some(ref severity) = cli.severity {
        config.severity_threshold = parse_severity(severity)?;
    }

    let (scanners, paths) = apply_command(&cli.command, &mut config);

    let paths = if paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        paths
    };
    let files = collect_files(&paths);
    tracing::debug!("scanning {} file(s) with {:?}", files.len(), scanners);

    let workspace = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let context = ScanContext::new(workspace).with_files(files);

    let registry = warden_core::default_registry().await;
    let runner = ScanRunner::new(registry, config.parallel_scanners);
    let result = runner.run(&scanners, &config, &context).await;

    for execution in &result.executions {
        if let Some(ref error) = execution.error {
            tracing::warn!("scanner {} failed: {}", execution.scanner_name, error);
        }
    }

    let findings = filter_by_threshold(result.findings, config.severity_threshold);

    let report = warden_core::report::render(&findings, format, "Warden Security Report")?;
    print!("{report}");

    Ok(exit_code(&findings))
}

/// Drop findings below the configured severity threshold.
fn filter_by_threshold(findings: Vec<Finding>, threshold: Severity) -> Vec<Finding> {
    findings
        .into_iter()
        .filter(|f| f.severity >= threshold)
        .collect()
}

/// Exit code 0 when nothing survived the threshold, 1 otherwise.
fn exit_code(findings: &[Finding]) -> i32 {
    if findings.is_empty() {
        0
    } else {
        1
    }
}

/// Load configuration from the explicit path, `./warden.toml`, or defaults.
fn load_config(cli: &Cli) -> anyhow::Result<ScanConfig> {
    if let Some(ref path) = cli.config {
        return ScanConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()));
    }

    let default_path = PathBuf::from("warden.toml");
    if default_path.is_file() {
        return ScanConfig::load(&default_path).context("failed to load ./warden.toml");
    }

    Ok(ScanConfig::default())
}

/// Fold subcommand flags into the config and pick the scanners to run.
fn apply_command(command: &Commands, config: &mut ScanConfig) -> (Vec<String>, Vec<PathBuf>) {
    match command {
        Commands::Credentials { show_values, paths } => {
            if *show_values {
                config.credentials.show_values = true;
            }
            (vec!["credentials".into()], paths.clone())
        }
        Commands::Urls {
            exclude_comments,
            paths,
        } => {
            if *exclude_comments {
                config.urls.flag_comment_urls = false;
            }
            (vec!["urls".into()], paths.clone())
        }
        Commands::Verbose {
            include_safe_contexts,
            paths,
        } => {
            if *include_safe_contexts {
                config.verbose.include_safe_contexts = true;
            }
            (vec!["verbose".into()], paths.clone())
        }
        Commands::Ansible {
            no_vault_check,
            paths,
        } => {
            if *no_vault_check {
                config.ansible.vault_check = false;
            }
            (vec!["ansible".into()], paths.clone())
        }
        Commands::Dotnet { paths } => (vec!["dotnet".into()], paths.clone()),
        Commands::License {
            require,
            license_type,
            paths,
        } => {
            if *require {
                config.license.require_header = true;
            }
            if let Some(kind) = license_type {
                config.license.required_license = Some(kind.clone());
            }
            (vec!["license".into()], paths.clone())
        }
        Commands::Scan { paths } => (
            vec![
                "credentials".into(),
                "urls".into(),
                "verbose".into(),
                "ansible".into(),
                "dotnet".into(),
                "license".into(),
            ],
            paths.clone(),
        ),
    }
}

fn parse_severity(s: &str) -> anyhow::Result<Severity> {
    match s.to_ascii_lowercase().as_str() {
        "info" => Ok(Severity::Info),
        "low" => Ok(Severity::Low),
        "medium" => Ok(Severity::Medium),
        "high" => Ok(Severity::High),
        "critical" => Ok(Severity::Critical),
        other => bail!("unknown severity '{other}' (expected info, low, medium, high, critical)"),
    }
}
