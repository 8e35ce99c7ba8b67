//! License header scanner.
//!
//! Looks for a recognizable license notice in the first lines of source
//! files. Optionally requires a specific license type, in which case a file
//! carrying a different notice is also reported.

use crate::config::{LicenseConfig, ScanConfig};
use crate::error::ScanError;
use crate::finding::{Category, CodeLocation, Finding, Provenance, Severity};
use crate::scanner::{ScanContext, Scanner};
use async_trait::async_trait;
use regex::{Regex, RegexBuilder};
use std::path::Path;

/// Recognized license families and the header phrases that identify them.
const LICENSE_PATTERNS: &[(&str, &[&str])] = &[
    (
        "apache",
        &[
            r"Licensed under the Apache License",
            r"Apache License.*Version 2\.0",
        ],
    ),
    (
        "mit",
        &[r"MIT License", r"Permission is hereby granted, free of charge"],
    ),
    (
        "gpl",
        &[
            r"GNU General Public License",
            r"This program is free software",
        ],
    ),
    (
        "bsd",
        &[
            r"BSD License",
            r"Redistribution and use in source and binary forms",
        ],
    ),
    (
        "copyright",
        &[r"Copyright.*\d{4}", r"\(c\).*\d{4}", r"©.*\d{4}"],
    ),
];

/// Extensions of files expected to carry a header.
const HEADER_REQUIRED_EXTENSIONS: &[&str] = &[
    "py", "java", "js", "ts", "cpp", "c", "h", "hpp", "cs", "go", "rs", "php", "rb", "scala",
    "swift",
];

/// Extensions never checked for headers.
const SKIP_EXTENSIONS: &[&str] = &[
    "md", "txt", "json", "xml", "yaml", "yml", "toml", "png", "jpg", "jpeg", "gif", "ico", "svg",
    "pdf",
];

/// Directories whose contents are never checked.
const SKIP_DIRECTORIES: &[&str] = &[
    "node_modules",
    ".git",
    "vendor",
    "build",
    "dist",
    "target",
    ".pytest_cache",
    "__pycache__",
    ".venv",
    "venv",
];

struct LicenseFamily {
    name: &'static str,
    patterns: Vec<Regex>,
}

/// Scanner for license headers in source files.
pub struct LicenseScanner {
    families: Vec<LicenseFamily>,
}

impl LicenseScanner {
    pub fn new() -> Self {
        let families = LICENSE_PATTERNS
            .iter()
            .map(|(name, sources)| LicenseFamily {
                name,
                patterns: sources
                    .iter()
                    .filter_map(|src| {
                        match RegexBuilder::new(src).case_insensitive(true).build() {
                            Ok(re) => Some(re),
                            Err(e) => {
                                tracing::warn!(
                                    "failed to compile license pattern '{}': {}",
                                    src,
                                    e
                                );
                                None
                            }
                        }
                    })
                    .collect(),
            })
            .collect();

        Self { families }
    }

    /// Check whether a file is expected to carry a license header.
    pub fn should_check(file: &Path) -> bool {
        let in_skipped_dir = file.components().any(|c| {
            let part = c.as_os_str().to_string_lossy();
            SKIP_DIRECTORIES.iter().any(|d| *d == part)
        });
        if in_skipped_dir {
            return false;
        }

        let Some(ext) = file.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        let lower = ext.to_ascii_lowercase();
        if SKIP_EXTENSIONS.iter().any(|s| *s == lower) {
            return false;
        }
        HEADER_REQUIRED_EXTENSIONS.iter().any(|s| *s == lower)
    }

    /// License families detected in the head of the file.
    pub fn detect_licenses(&self, head: &str) -> Vec<&'static str> {
        self.families
            .iter()
            .filter(|family| family.patterns.iter().any(|p| p.is_match(head)))
            .map(|family| family.name)
            .collect()
    }

    /// Scan a single file's content.
    pub fn scan_source(&self, source: &str, file: &Path, config: &LicenseConfig) -> Vec<Finding> {
        if !Self::should_check(file) {
            return Vec::new();
        }

        let head: String = source
            .lines()
            .take(config.head_lines)
            .collect::<Vec<_>>()
            .join("\n");
        let found = self.detect_licenses(&head);

        if found.is_empty() {
            // Advisory unless headers are required; Info stays below the
            // default reporting threshold so the hook does not fail commits.
            let severity = if config.require_header {
                Severity::Medium
            } else {
                Severity::Info
            };
            return vec![self
                .build_finding(
                    "Missing license header detected",
                    format!("{} has no recognizable license header.", file.display()),
                    severity,
                    "missing_header".to_string(),
                    file,
                )
                .with_advice("Add a license header to the top of this file.")];
        }

        if let Some(required) = &config.required_license {
            if !found.iter().any(|f| *f == required.as_str()) {
                let severity = if config.require_header {
                    Severity::Medium
                } else {
                    Severity::Info
                };
                return vec![self
                    .build_finding(
                        "Wrong license header detected",
                        format!(
                            "{} carries a {} header but {} is required.",
                            file.display(),
                            found.join(", "),
                            required,
                        ),
                        severity,
                        "wrong_license".to_string(),
                        file,
                    )
                    .with_evidence(found.join(", "))
                    .with_advice("Replace the header with the required license text.")];
            }
        }

        Vec::new()
    }

    fn build_finding(
        &self,
        title: impl Into<String>,
        description: impl Into<String>,
        severity: Severity,
        rule_id: String,
        file: &Path,
    ) -> Finding {
        Finding::new(
            title,
            description,
            severity,
            Category::License,
            Provenance::new("license", 0.9).with_rule(rule_id.clone()),
        )
        .with_location(CodeLocation::new(file, 1))
        .with_tag("license")
        .with_tag(rule_id)
    }
}

impl Default for LicenseScanner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Scanner for LicenseScanner {
    fn name(&self) -> &str {
        "license"
    }

    fn category(&self) -> Category {
        Category::License
    }

    async fn scan(
        &self,
        config: &ScanConfig,
        context: &ScanContext,
    ) -> Result<Vec<Finding>, ScanError> {
        let mut findings = Vec::new();
        for file in &context.files {
            if !Self::should_check(file) {
                continue;
            }
            match std::fs::read_to_string(file) {
                Ok(source) => findings.extend(self.scan_source(&source, file, &config.license)),
                Err(e) => tracing::warn!("failed to read {}: {}", file.display(), e),
            }
        }
        Ok(findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(source: &str, file: &str) -> Vec<Finding> {
        LicenseScanner::new().scan_source(source, Path::new(file), &LicenseConfig::default())
    }

    #[test]
    fn test_missing_header_reported() {
        let findings = scan("def main():\n    pass\n", "app.py");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Info);
        assert_eq!(
            findings[0].provenance.rule_id.as_deref(),
            Some("missing_header")
        );
    }

    #[test]
    fn test_apache_header_recognized() {
        let source = "# Licensed under the Apache License, Version 2.0\ndef main():\n    pass\n";
        assert!(scan(source, "app.py").is_empty());
    }

    #[test]
    fn test_copyright_line_recognized() {
        let source = "// Copyright 2024 Example Corp\nfn main() {}\n";
        assert!(scan(source, "main.rs").is_empty());
    }

    #[test]
    fn test_header_outside_head_window_not_counted() {
        let mut source = String::new();
        for _ in 0..25 {
            source.push_str("// filler\n");
        }
        source.push_str("// Copyright 2024 Example Corp\n");
        let findings = scan(&source, "main.rs");
        assert_eq!(findings.len(), 1);
    }

    #[test]
    fn test_require_header_raises_severity() {
        let config = LicenseConfig {
            require_header: true,
            ..Default::default()
        };
        let findings =
            LicenseScanner::new().scan_source("def main():\n    pass\n", Path::new("app.py"), &config);
        assert_eq!(findings[0].severity, Severity::Medium);
    }

    #[test]
    fn test_required_license_mismatch() {
        let config = LicenseConfig {
            required_license: Some("apache".into()),
            ..Default::default()
        };
        let source = "// MIT License\n// Permission is hereby granted, free of charge\nfn main() {}\n";
        let findings =
            LicenseScanner::new().scan_source(source, Path::new("main.rs"), &config);
        assert_eq!(findings.len(), 1);
        assert_eq!(
            findings[0].provenance.rule_id.as_deref(),
            Some("wrong_license")
        );
    }

    #[test]
    fn test_required_license_match() {
        let config = LicenseConfig {
            required_license: Some("mit".into()),
            ..Default::default()
        };
        let source = "// MIT License\nfn main() {}\n";
        let findings = LicenseScanner::new().scan_source(source, Path::new("main.rs"), &config);
        assert!(findings.is_empty());
    }

    #[test]
    fn test_skip_rules() {
        assert!(!LicenseScanner::should_check(Path::new("README.md")));
        assert!(!LicenseScanner::should_check(Path::new(
            "node_modules/pkg/index.js"
        )));
        assert!(!LicenseScanner::should_check(Path::new("config.yaml")));
        assert!(LicenseScanner::should_check(Path::new("src/lib.rs")));
    }
}
