//! Plain-text report generator for terminal output.

use crate::finding::{Finding, Severity};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Render findings grouped by file, with a trailing summary.
pub fn findings_to_text(findings: &[Finding]) -> String {
    if findings.is_empty() {
        return "No issues detected.\n".to_string();
    }

    let mut by_file: BTreeMap<String, Vec<&Finding>> = BTreeMap::new();
    let mut unlocated: Vec<&Finding> = Vec::new();
    for finding in findings {
        match &finding.location {
            Some(loc) => by_file
                .entry(loc.file.display().to_string())
                .or_default()
                .push(finding),
            None => unlocated.push(finding),
        }
    }

    let mut out = String::new();

    for (file, file_findings) in &by_file {
        let _ = writeln!(out, "{file}:");
        for finding in file_findings {
            let line = finding.location.as_ref().map(|l| l.line).unwrap_or(0);
            let rule = finding
                .provenance
                .rule_id
                .as_deref()
                .unwrap_or(&finding.provenance.scanner);
            let _ = writeln!(
                out,
                "  line {:>4}  [{:<8}] {}  ({})",
                line,
                finding.severity.as_str(),
                finding.title,
                rule,
            );
            if let Some(ref evidence) = finding.evidence {
                let _ = writeln!(out, "             {evidence}");
            }
        }
        out.push('\n');
    }

    for finding in &unlocated {
        let _ = writeln!(
            out,
            "[{:<8}] {} ({})",
            finding.severity.as_str(),
            finding.title,
            finding.provenance.scanner,
        );
    }
    if !unlocated.is_empty() {
        out.push('\n');
    }

    let _ = writeln!(
        out,
        "Found {} issue(s) in {} file(s): {}",
        findings.len(),
        by_file.len(),
        severity_breakdown(findings),
    );

    let mut hints: Vec<&str> = findings.iter().filter_map(|f| f.advice.as_deref()).collect();
    hints.sort_unstable();
    hints.dedup();
    if !hints.is_empty() {
        out.push('\n');
        for hint in hints.iter().take(5) {
            let _ = writeln!(out, "hint: {hint}");
        }
    }

    out
}

fn severity_breakdown(findings: &[Finding]) -> String {
    [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
        Severity::Info,
    ]
    .iter()
    .filter_map(|sev| {
        let count = findings.iter().filter(|f| f.severity == *sev).count();
        (count > 0).then(|| format!("{count} {}", sev.as_str()))
    })
    .collect::<Vec<_>>()
    .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finding::{Category, CodeLocation, Provenance};
    use pretty_assertions::assert_eq;

    fn finding(file: &str, line: usize, severity: Severity) -> Finding {
        Finding::new(
            "Hardcoded password detected",
            "desc",
            severity,
            Category::Credential,
            Provenance::new("credentials", 0.85).with_rule("password"),
        )
        .with_location(CodeLocation::new(file, line))
        .with_evidence("password = ********")
        .with_advice("Move the value to configuration.")
    }

    #[test]
    fn test_empty_report() {
        assert_eq!(findings_to_text(&[]), "No issues detected.\n");
    }

    #[test]
    fn test_grouped_by_file() {
        let findings = vec![
            finding("b.py", 3, Severity::High),
            finding("a.py", 7, Severity::Medium),
        ];
        let report = findings_to_text(&findings);

        // Files are sorted
        let a_pos = report.find("a.py:").unwrap();
        let b_pos = report.find("b.py:").unwrap();
        assert!(a_pos < b_pos);
        assert!(report.contains("Found 2 issue(s) in 2 file(s)"));
        assert!(report.contains("1 high, 1 medium"));
    }

    #[test]
    fn test_includes_rule_and_hint() {
        let report = findings_to_text(&[finding("a.py", 1, Severity::High)]);
        assert!(report.contains("(password)"));
        assert!(report.contains("hint: Move the value to configuration."));
    }
}
