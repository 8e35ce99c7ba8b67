//! Report rendering in the supported output formats.

pub mod json;
pub mod markdown;
pub mod text;

use crate::error::WardenError;
use crate::finding::Finding;

pub use json::findings_to_json;
pub use markdown::findings_to_markdown;
pub use text::findings_to_text;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Markdown,
}

impl std::str::FromStr for ReportFormat {
    type Err = WardenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            other => Err(WardenError::Config(format!(
                "unknown report format '{other}' (expected text, json, or markdown)"
            ))),
        }
    }
}

/// Render findings in the requested format.
pub fn render(findings: &[Finding], format: ReportFormat, title: &str) -> Result<String, WardenError> {
    match format {
        ReportFormat::Text => Ok(findings_to_text(findings)),
        ReportFormat::Json => findings_to_json(findings),
        ReportFormat::Markdown => Ok(findings_to_markdown(findings, title)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!("text".parse::<ReportFormat>().unwrap(), ReportFormat::Text);
        assert_eq!("JSON".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert_eq!("md".parse::<ReportFormat>().unwrap(), ReportFormat::Markdown);
        assert!("xml".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn test_render_dispatch() {
        let text = render(&[], ReportFormat::Text, "Report").unwrap();
        assert!(text.contains("No issues detected"));

        let md = render(&[], ReportFormat::Markdown, "Report").unwrap();
        assert!(md.starts_with("# Report"));

        let json = render(&[], ReportFormat::Json, "Report").unwrap();
        assert!(json.contains("\"total\": 0"));
    }
}
