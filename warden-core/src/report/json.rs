//! JSON report generator for machine consumption.

use crate::error::WardenError;
use crate::finding::{Finding, Severity};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Serializable report document.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub tool: &'static str,
    pub version: &'static str,
    pub generated_at: DateTime<Utc>,
    pub total: usize,
    pub counts_by_severity: BTreeMap<String, usize>,
    pub counts_by_file: BTreeMap<String, usize>,
    pub findings: &'a [Finding],
}

impl<'a> JsonReport<'a> {
    pub fn new(findings: &'a [Finding]) -> Self {
        let mut counts_by_severity = BTreeMap::new();
        for severity in [
            Severity::Critical,
            Severity::High,
            Severity::Medium,
            Severity::Low,
            Severity::Info,
        ] {
            let count = findings.iter().filter(|f| f.severity == severity).count();
            if count > 0 {
                counts_by_severity.insert(severity.as_str().to_string(), count);
            }
        }

        let mut counts_by_file = BTreeMap::new();
        for finding in findings {
            if let Some(ref loc) = finding.location {
                *counts_by_file
                    .entry(loc.file.display().to_string())
                    .or_insert(0) += 1;
            }
        }

        Self {
            tool: "warden",
            version: env!("CARGO_PKG_VERSION"),
            generated_at: Utc::now(),
            total: findings.len(),
            counts_by_severity,
            counts_by_file,
            findings,
        }
    }
}

/// Render findings as a pretty-printed JSON document.
pub fn findings_to_json(findings: &[Finding]) -> Result<String, WardenError> {
    Ok(serde_json::to_string_pretty(&JsonReport::new(findings))?)
}
