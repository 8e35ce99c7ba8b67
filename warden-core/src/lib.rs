//! warden-core — a suite of security-smell scanners for source trees.
//!
//! Each scanner walks lines of text against a curated regex rule table and
//! emits [`Finding`]s with severity, location, and remediation advice. The
//! suite covers hardcoded credentials, hardcoded URLs, verbose/debug flags,
//! Ansible misconfigurations, .NET anti-patterns, and license headers.

pub mod config;
pub mod error;
pub mod finding;
pub mod report;
pub mod rules;
pub mod scanner;
pub mod scanners;
pub mod walk;

pub use config::ScanConfig;
pub use error::{ScanError, WardenError};
pub use finding::{Category, CodeLocation, Finding, Provenance, Severity};
pub use report::ReportFormat;
pub use scanner::{ScanContext, ScanRunner, Scanner, ScannerRegistry, SuiteResult};
pub use scanners::{
    AnsibleScanner, CredentialsScanner, DotNetScanner, LicenseScanner, UrlsScanner, VerboseScanner,
};

use std::sync::Arc;

/// Build a registry containing the full scanner suite.
pub async fn default_registry() -> Arc<ScannerRegistry> {
    let registry = Arc::new(ScannerRegistry::new());
    registry.register(Arc::new(CredentialsScanner::new())).await;
    registry.register(Arc::new(UrlsScanner::new())).await;
    registry.register(Arc::new(VerboseScanner::new())).await;
    registry.register(Arc::new(AnsibleScanner::new())).await;
    registry.register(Arc::new(DotNetScanner::new())).await;
    registry.register(Arc::new(LicenseScanner::new())).await;
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_registry_contains_suite() {
        let registry = default_registry().await;
        assert_eq!(
            registry.list().await,
            vec!["ansible", "credentials", "dotnet", "license", "urls", "verbose"]
        );
    }
}
