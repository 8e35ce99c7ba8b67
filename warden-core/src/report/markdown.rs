//! Markdown report generator.

use crate::finding::{Finding, Severity};

/// Generate a Markdown report from findings.
pub fn findings_to_markdown(findings: &[Finding], title: &str) -> String {
    let mut md = String::new();

    md.push_str(&format!("# {title}\n\n"));

    md.push_str("## Summary\n\n");
    md.push_str("| Severity | Count |\n");
    md.push_str("|----------|-------|\n");
    for severity in SEVERITY_ORDER {
        let count = findings.iter().filter(|f| f.severity == severity).count();
        if count > 0 {
            md.push_str(&format!("| {} | {count} |\n", severity_label(severity)));
        }
    }
    md.push_str(&format!("| **Total** | **{}** |\n\n", findings.len()));

    if findings.is_empty() {
        md.push_str("No findings detected.\n");
        return md;
    }

    md.push_str("## Findings\n\n");

    for severity in SEVERITY_ORDER {
        let severity_findings: Vec<&Finding> =
            findings.iter().filter(|f| f.severity == severity).collect();
        if severity_findings.is_empty() {
            continue;
        }

        md.push_str(&format!(
            "### {} ({})\n\n",
            severity_label(severity),
            severity_findings.len()
        ));

        for finding in severity_findings {
            md.push_str(&format!("#### {}\n\n", finding.title));

            if let Some(ref loc) = finding.location {
                md.push_str(&format!("**Location:** `{loc}`\n\n"));
            }

            md.push_str(&format!(
                "**Scanner:** {} | **Confidence:** {:.0}%\n\n",
                finding.provenance.scanner,
                finding.provenance.confidence * 100.0,
            ));

            md.push_str(&format!("{}\n\n", finding.description));

            if let Some(ref evidence) = finding.evidence {
                md.push_str(&format!("**Evidence:** `{evidence}`\n\n"));
            }

            if let Some(ref advice) = finding.advice {
                md.push_str(&format!("**Fix:** {advice}\n\n"));
            }

            md.push_str("---\n\n");
        }
    }

    md
}

const SEVERITY_ORDER: [Severity; 5] = [
    Severity::Critical,
    Severity::High,
    Severity::Medium,
    Severity::Low,
    Severity::Info,
];

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "Critical",
        Severity::High => "High",
        Severity::Medium => "Medium",
        Severity::Low => "Low",
        Severity::Info => "Info",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finding::{Category, CodeLocation, Provenance};

    fn sample_finding(severity: Severity) -> Finding {
        Finding::new(
            "Test Finding",
            "A test finding description",
            severity,
            Category::Credential,
            Provenance::new("credentials", 0.9).with_rule("password"),
        )
        .with_location(CodeLocation::new("src/main.py", 10))
        .with_advice("Move the value to configuration.")
    }

    #[test]
    fn test_markdown_report() {
        let findings = vec![
            sample_finding(Severity::Critical),
            sample_finding(Severity::Medium),
        ];
        let report = findings_to_markdown(&findings, "Security Scan Report");

        assert!(report.contains("# Security Scan Report"));
        assert!(report.contains("| Critical | 1 |"));
        assert!(report.contains("| Medium | 1 |"));
        assert!(report.contains("| **Total** | **2** |"));
        assert!(report.contains("### Critical"));
        assert!(report.contains("src/main.py:10"));
        assert!(report.contains("**Fix:**"));
    }

    #[test]
    fn test_empty_findings_report() {
        let report = findings_to_markdown(&[], "Empty Report");
        assert!(report.contains("No findings detected."));
    }

    #[test]
    fn test_severity_ordering() {
        let findings = vec![
            sample_finding(Severity::Low),
            sample_finding(Severity::Critical),
        ];
        let report = findings_to_markdown(&findings, "Report");
        let critical_pos = report.find("### Critical").unwrap();
        let low_pos = report.find("### Low").unwrap();
        assert!(critical_pos < low_pos, "Critical should appear before Low");
    }
}
