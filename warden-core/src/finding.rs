//! Unified finding schema — the canonical data model for all scanner outputs.
//!
//! Every finding records which scanner and rule produced it, and carries a
//! content hash so repeated detections of the same smell deduplicate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use uuid::Uuid;

/// A security-smell finding produced by a scanner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    /// Unique identifier.
    pub id: Uuid,
    /// Short title describing the finding.
    pub title: String,
    /// Detailed description.
    pub description: String,
    /// Severity classification.
    pub severity: Severity,
    /// Finding category.
    pub category: Category,
    /// Location where the finding was detected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<CodeLocation>,
    /// The matched line or value. Credential evidence is masked unless the
    /// caller explicitly asked for raw values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
    /// Suggested remediation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advice: Option<String>,
    /// SHA-256 hash of canonical content for deduplication.
    pub content_hash: String,
    /// Which scanner and rule produced this finding.
    pub provenance: Provenance,
    /// When this finding was detected.
    pub created_at: DateTime<Utc>,
    /// Tags for categorization.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Finding {
    /// Create a new finding with auto-generated id, timestamp, and content hash.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        severity: Severity,
        category: Category,
        provenance: Provenance,
    ) -> Self {
        let title = title.into();
        let description = description.into();
        let content_hash = compute_content_hash(&title, &provenance, None);

        Self {
            id: Uuid::new_v4(),
            title,
            description,
            severity,
            category,
            location: None,
            evidence: None,
            advice: None,
            content_hash,
            provenance,
            created_at: Utc::now(),
            tags: Vec::new(),
        }
    }

    /// Set the code location and fold it into the content hash.
    pub fn with_location(mut self, location: CodeLocation) -> Self {
        self.content_hash = compute_content_hash(&self.title, &self.provenance, Some(&location));
        self.location = Some(location);
        self
    }

    /// Attach the matched line or value.
    pub fn with_evidence(mut self, evidence: impl Into<String>) -> Self {
        self.evidence = Some(evidence.into());
        self
    }

    /// Attach a remediation suggestion.
    pub fn with_advice(mut self, advice: impl Into<String>) -> Self {
        self.advice = Some(advice.into());
        self
    }

    /// Add a tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Check whether this finding duplicates another.
    pub fn is_duplicate_of(&self, other: &Finding) -> bool {
        self.content_hash == other.content_hash
    }
}

/// Severity levels for findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Return the display name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Finding categories, one per scanner family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Credential,
    Url,
    #[serde(rename = "debug")]
    DebugConfig,
    Ansible,
    DotNet,
    License,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Category::Credential => "credential",
            Category::Url => "url",
            Category::DebugConfig => "debug",
            Category::Ansible => "ansible",
            Category::DotNet => "dotnet",
            Category::License => "license",
        };
        f.write_str(s)
    }
}

/// Location of a finding in a scanned file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeLocation {
    /// File path as given to the scanner.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
}

impl CodeLocation {
    pub fn new(file: impl Into<PathBuf>, line: usize) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl std::fmt::Display for CodeLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.file.display(), self.line)
    }
}

/// Provenance: which scanner and rule produced a finding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provenance {
    /// Scanner name.
    pub scanner: String,
    /// Rule identifier within the scanner's table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
    /// Confidence score (0.0-1.0).
    pub confidence: f32,
}

impl Provenance {
    pub fn new(scanner: impl Into<String>, confidence: f32) -> Self {
        Self {
            scanner: scanner.into(),
            rule_id: None,
            confidence,
        }
    }

    pub fn with_rule(mut self, rule_id: impl Into<String>) -> Self {
        self.rule_id = Some(rule_id.into());
        self
    }
}

/// Compute a deterministic content hash for deduplication.
///
/// The hash covers title, scanner, rule id, and location, so the same rule
/// firing on different lines yields distinct findings while re-scans of the
/// same line collapse.
fn compute_content_hash(
    title: &str,
    provenance: &Provenance,
    location: Option<&CodeLocation>,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(title.as_bytes());
    hasher.update(b"|");
    hasher.update(provenance.scanner.as_bytes());
    if let Some(ref rule) = provenance.rule_id {
        hasher.update(b"|");
        hasher.update(rule.as_bytes());
    }
    if let Some(loc) = location {
        hasher.update(b"|");
        hasher.update(loc.file.to_string_lossy().as_bytes());
        hasher.update(b"|");
        hasher.update(loc.line.to_string().as_bytes());
    }
    format!("{:x}", hasher.finalize())
}

/// Filters duplicate findings by content hash.
pub struct Dedup {
    seen_hashes: std::collections::HashSet<String>,
}

impl Dedup {
    pub fn new() -> Self {
        Self {
            seen_hashes: std::collections::HashSet::new(),
        }
    }

    /// Deduplicate a list of findings, keeping first occurrences.
    pub fn deduplicate(&mut self, findings: Vec<Finding>) -> Vec<Finding> {
        let mut unique = Vec::new();
        for finding in findings {
            if self.seen_hashes.insert(finding.content_hash.clone()) {
                unique.push(finding);
            }
        }
        unique
    }
}

impl Default for Dedup {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finding_creation() {
        let finding = Finding::new(
            "Hardcoded password",
            "A password literal was found",
            Severity::High,
            Category::Credential,
            Provenance::new("credentials", 0.85),
        );

        assert_eq!(finding.title, "Hardcoded password");
        assert_eq!(finding.severity, Severity::High);
        assert!(!finding.content_hash.is_empty());
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
        assert!(Severity::Low > Severity::Info);
    }

    #[test]
    fn test_location_distinguishes_hash() {
        let base = Finding::new(
            "Hardcoded password",
            "desc",
            Severity::High,
            Category::Credential,
            Provenance::new("credentials", 0.85).with_rule("password"),
        );
        let at_ten = base.clone().with_location(CodeLocation::new("app.py", 10));
        let at_twenty = base.clone().with_location(CodeLocation::new("app.py", 20));
        assert!(!at_ten.is_duplicate_of(&at_twenty));
    }

    #[test]
    fn test_deduplication() {
        let make = |line| {
            Finding::new(
                "Hardcoded URL",
                "desc",
                Severity::Medium,
                Category::Url,
                Provenance::new("urls", 0.8),
            )
            .with_location(CodeLocation::new("main.go", line))
        };

        let mut dedup = Dedup::new();
        let results = dedup.deduplicate(vec![make(3), make(3), make(7)]);
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_code_location_display() {
        let loc = CodeLocation::new("src/main.rs", 42);
        assert_eq!(loc.to_string(), "src/main.rs:42");
    }

    #[test]
    fn test_severity_serde_lowercase() {
        let json = serde_json::to_string(&Severity::Critical).unwrap();
        assert_eq!(json, "\"critical\"");
    }
}
