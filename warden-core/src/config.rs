//! Configuration types for the scanner suite.

use crate::error::WardenError;
use crate::finding::Severity;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level scan configuration, loadable from a `warden.toml` file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Minimum severity to report. Findings below this are dropped.
    pub severity_threshold: Severity,
    /// Maximum number of scanners to run in parallel for `warden scan`.
    pub parallel_scanners: usize,
    /// Credential scanner settings.
    pub credentials: CredentialsConfig,
    /// URL scanner settings.
    pub urls: UrlsConfig,
    /// Verbose/debug flag scanner settings.
    pub verbose: VerboseConfig,
    /// Ansible scanner settings.
    pub ansible: AnsibleConfig,
    /// License header scanner settings.
    pub license: LicenseConfig,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            severity_threshold: Severity::Low,
            parallel_scanners: 4,
            credentials: CredentialsConfig::default(),
            urls: UrlsConfig::default(),
            verbose: VerboseConfig::default(),
            ansible: AnsibleConfig::default(),
            license: LicenseConfig::default(),
        }
    }
}

impl ScanConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, WardenError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| WardenError::Config(e.to_string()))
    }
}

/// Credential scanner settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    /// Report the raw credential value instead of a masked one.
    pub show_values: bool,
    /// Additional values to treat as safe placeholders.
    pub extra_safe_values: Vec<String>,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            show_values: false,
            extra_safe_values: Vec::new(),
        }
    }
}

/// URL scanner settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlsConfig {
    /// Report suspicious URLs found inside comments. When false, comment
    /// lines are skipped entirely.
    pub flag_comment_urls: bool,
    /// Additional safe-URL regex patterns.
    pub extra_safe_patterns: Vec<String>,
}

impl Default for UrlsConfig {
    fn default() -> Self {
        Self {
            flag_comment_urls: true,
            extra_safe_patterns: Vec::new(),
        }
    }
}

/// Verbose/debug flag scanner settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VerboseConfig {
    /// Also scan files in safe contexts (test, example, dev directories).
    /// When true, low-severity findings in those files are still reported.
    pub include_safe_contexts: bool,
}

impl Default for VerboseConfig {
    fn default() -> Self {
        Self {
            include_safe_contexts: false,
        }
    }
}

/// Ansible scanner settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnsibleConfig {
    /// Flag secret-looking files that are not vault-encrypted.
    pub vault_check: bool,
}

impl Default for AnsibleConfig {
    fn default() -> Self {
        Self { vault_check: true }
    }
}

/// License header scanner settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LicenseConfig {
    /// Treat a missing license header as a failure rather than a notice.
    pub require_header: bool,
    /// Require a specific license kind (e.g. "apache", "mit").
    pub required_license: Option<String>,
    /// How many lines of each file head to inspect.
    pub head_lines: usize,
}

impl Default for LicenseConfig {
    fn default() -> Self {
        Self {
            require_header: false,
            required_license: None,
            head_lines: 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = ScanConfig::default();
        assert_eq!(config.severity_threshold, Severity::Low);
        assert_eq!(config.parallel_scanners, 4);
        assert!(!config.credentials.show_values);
        assert_eq!(config.license.head_lines, 20);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let toml = r#"
            severity_threshold = "medium"

            [license]
            require_header = true
        "#;
        let config: ScanConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.severity_threshold, Severity::Medium);
        assert!(config.license.require_header);
        // Untouched sections keep their defaults
        assert!(config.ansible.vault_check);
        assert_eq!(config.parallel_scanners, 4);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = ScanConfig::load(Path::new("/nonexistent/warden.toml")).unwrap_err();
        assert!(matches!(err, WardenError::Io(_)));
    }
}
