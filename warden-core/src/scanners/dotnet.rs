//! .NET anti-pattern scanner.
//!
//! Targets ASP.NET and .NET Core sources plus their configuration files:
//! SQL injection through string concatenation, path traversal from request
//! data, insecure deserialization, weak crypto, disabled request validation,
//! missing CSRF tokens, and debug settings left on.

use crate::config::ScanConfig;
use crate::error::ScanError;
use crate::finding::{Category, CodeLocation, Finding, Provenance, Severity};
use crate::rules::{RuleDef, RuleSet};
use crate::scanner::{ScanContext, Scanner};
use async_trait::async_trait;
use std::path::Path;

const SQL_INJECTION_RULES: &[RuleDef] = &[
    RuleDef { id: "sqlcommand_concat", severity: Severity::High, description: "SqlCommand built by concatenation", pattern: r"new\s+SqlCommand\s*\([^)]*\+[^)]*\)" },
    RuleDef { id: "commandtext_concat", severity: Severity::High, description: "CommandText built by concatenation", pattern: r"CommandText\s*=\s*[^;]*\+[^;]*" },
    RuleDef { id: "executequery_concat", severity: Severity::High, description: "query executed with concatenated input", pattern: r"ExecuteQuery\s*\([^)]*\+[^)]*\)" },
    RuleDef { id: "executescalar_concat", severity: Severity::High, description: "scalar query with concatenated input", pattern: r"ExecuteScalar\s*\([^)]*\+[^)]*\)" },
    RuleDef { id: "format_select", severity: Severity::High, description: "SELECT assembled with string.Format", pattern: r"string\.Format\s*\([^)]*SELECT[^)]*\)" },
    RuleDef { id: "concat_select", severity: Severity::High, description: "SELECT assembled with string.Concat", pattern: r"string\.Concat\s*\([^)]*SELECT[^)]*\)" },
];

const PATH_TRAVERSAL_RULES: &[RuleDef] = &[
    RuleDef { id: "combine_request", severity: Severity::High, description: "Path.Combine with request data", pattern: r"Path\.Combine\s*\([^)]*Request\." },
    RuleDef { id: "read_request", severity: Severity::High, description: "file read from request data", pattern: r"File\.ReadAllText\s*\([^)]*Request\." },
    RuleDef { id: "write_request", severity: Severity::High, description: "file write from request data", pattern: r"File\.WriteAllText\s*\([^)]*Request\." },
    RuleDef { id: "stream_request", severity: Severity::High, description: "FileStream opened from request data", pattern: r"FileStream\s*\([^)]*Request\." },
    RuleDef { id: "dotdot_segment", severity: Severity::High, description: "parent directory path segment", pattern: r"\.\.[\\/]" },
];

const DESERIALIZATION_RULES: &[RuleDef] = &[
    RuleDef { id: "binaryformatter", severity: Severity::High, description: "BinaryFormatter deserialization", pattern: r"BinaryFormatter\.Deserialize" },
    RuleDef { id: "xmlserializer_untrusted", severity: Severity::High, description: "XmlSerializer on untrusted input", pattern: r"XmlSerializer\.Deserialize.*untrusted" },
    RuleDef { id: "json_from_request", severity: Severity::High, description: "JSON deserialized straight from request", pattern: r"JsonConvert\.DeserializeObject.*Request\." },
    RuleDef { id: "javascriptserializer", severity: Severity::High, description: "JavaScriptSerializer deserialization", pattern: r"JavaScriptSerializer\.Deserialize" },
    RuleDef { id: "datacontract_readobject", severity: Severity::High, description: "DataContractJsonSerializer.ReadObject", pattern: r"DataContractJsonSerializer\.ReadObject" },
];

const WEAK_CRYPTO_RULES: &[RuleDef] = &[
    RuleDef { id: "md5_create", severity: Severity::Medium, description: "MD5 hashing", pattern: r"MD5\.Create\(\)" },
    RuleDef { id: "sha1_create", severity: Severity::Medium, description: "SHA-1 hashing", pattern: r"SHA1\.Create\(\)" },
    RuleDef { id: "des_provider", severity: Severity::Medium, description: "DES encryption", pattern: r"DESCryptoServiceProvider" },
    RuleDef { id: "rc2_provider", severity: Severity::Medium, description: "RC2 encryption", pattern: r"RC2CryptoServiceProvider" },
    RuleDef { id: "md5_provider", severity: Severity::Medium, description: "MD5 hashing", pattern: r"new\s+MD5CryptoServiceProvider" },
    RuleDef { id: "sha1_provider", severity: Severity::Medium, description: "SHA-1 hashing", pattern: r"new\s+SHA1CryptoServiceProvider" },
];

const HARDCODED_SECRET_RULES: &[RuleDef] = &[
    RuleDef { id: "connstring_password", severity: Severity::High, description: "connection string with password", pattern: r#"connectionString\s*=\s*["'][^"']*password[^"']*["']"# },
    RuleDef { id: "password_literal", severity: Severity::High, description: "password literal", pattern: r#"Password\s*=\s*["'][^"']{3,}["']"# },
    RuleDef { id: "apikey_literal", severity: Severity::High, description: "API key literal", pattern: r#"ApiKey\s*=\s*["'][^"']{10,}["']"# },
    RuleDef { id: "secretkey_literal", severity: Severity::High, description: "secret key literal", pattern: r#"SecretKey\s*=\s*["'][^"']{10,}["']"# },
];

const REQUEST_VALIDATION_RULES: &[RuleDef] = &[
    RuleDef { id: "validaterequest_false", severity: Severity::Medium, description: "request validation turned off", pattern: r"ValidateRequest\s*=\s*false" },
    RuleDef { id: "validation_mode_disabled", severity: Severity::Medium, description: "request validation mode disabled", pattern: r"RequestValidationMode\.Disabled" },
    RuleDef { id: "validateinput_false", severity: Severity::Medium, description: "input validation attribute disabled", pattern: r"\[ValidateInput\s*\(\s*false\s*\)\]" },
];

const CSRF_RULES: &[RuleDef] = &[
    RuleDef { id: "httppost_no_token", severity: Severity::Medium, description: "POST action without anti-forgery token", pattern: r"\[HttpPost\]" },
    RuleDef { id: "minimal_mappost", severity: Severity::Medium, description: "minimal API POST endpoint", pattern: r"\.MapPost\(" },
    RuleDef { id: "app_post", severity: Severity::Medium, description: "POST endpoint registration", pattern: r"app\.Post\(" },
];

const DEBUG_INFO_RULES: &[RuleDef] = &[
    RuleDef { id: "customerrors_off", severity: Severity::Low, description: "custom errors disabled", pattern: r#"customErrors\s*mode\s*=\s*["']Off["']"# },
    RuleDef { id: "compilation_debug", severity: Severity::Low, description: "debug compilation enabled", pattern: r#"debug\s*=\s*["']true["']"# },
];

const OPEN_REDIRECT_RULES: &[RuleDef] = &[
    RuleDef { id: "redirect_request", severity: Severity::Medium, description: "redirect target from request data", pattern: r"Response\.Redirect\s*\([^)]*Request\." },
    RuleDef { id: "redirecttoaction_request", severity: Severity::Medium, description: "action redirect from request data", pattern: r"RedirectToAction\s*\([^)]*Request\." },
    RuleDef { id: "redirect_querystring", severity: Severity::Medium, description: "redirect target from query string", pattern: r"Redirect\s*\([^)]*Request\.QueryString" },
];

const XXE_RULES: &[RuleDef] = &[
    RuleDef { id: "xmldocument_request", severity: Severity::Medium, description: "XmlDocument loaded from request data", pattern: r"XmlDocument\.Load.*Request\." },
    RuleDef { id: "xmltextreader_request", severity: Severity::Medium, description: "XmlTextReader on request data", pattern: r"XmlTextReader.*Request\." },
    RuleDef { id: "xpathdocument_request", severity: Severity::Medium, description: "XPathDocument on request data", pattern: r"XPathDocument.*Request\." },
    RuleDef { id: "dtd_processing_parse", severity: Severity::Medium, description: "DTD processing enabled", pattern: r"XmlReaderSettings.*DtdProcessing.*Parse" },
];

const INFO_DISCLOSURE_RULES: &[RuleDef] = &[
    RuleDef { id: "exception_tostring", severity: Severity::Low, description: "raw exception rendered", pattern: r"Exception\.ToString\(\)" },
    RuleDef { id: "message_to_response", severity: Severity::Low, description: "exception message written to response", pattern: r"ex\.Message.*Response\.Write" },
    RuleDef { id: "inner_exception", severity: Severity::Low, description: "inner exception surfaced", pattern: r"Exception.*InnerException" },
    RuleDef { id: "stacktrace_response", severity: Severity::Low, description: "stack trace written to response", pattern: r"StackTrace.*Response" },
];

const DOTNET_EXTENSIONS: &[&str] = &["cs", "vb", "fs", "aspx", "ascx", "ashx", "asmx", "config"];

const CONFIG_FILENAMES: &[&str] = &["web.config", "app.config", "appsettings.json"];

/// Markers that make a config value acceptable: substitution syntax or an
/// obvious placeholder.
const CONFIG_SAFE_MARKERS: &[&str] = &["$(", "${", "%", "placeholder", "your_"];

const CONFIG_SECRET_KEYWORDS: &[&str] = &["password=", "pwd=", "secret=", "key="];

struct RuleGroup {
    label: &'static str,
    advice: &'static str,
    rules: RuleSet,
}

/// Scanner for .NET sources and configuration.
pub struct DotNetScanner {
    groups: Vec<RuleGroup>,
}

impl DotNetScanner {
    pub fn new() -> Self {
        Self {
            groups: vec![
                RuleGroup {
                    label: "SQL injection risk",
                    advice: "Use parameterized queries instead of string concatenation.",
                    rules: RuleSet::compile("dotnet/sql", SQL_INJECTION_RULES),
                },
                RuleGroup {
                    label: "path traversal risk",
                    advice: "Validate and canonicalize paths derived from request data.",
                    rules: RuleSet::compile("dotnet/paths", PATH_TRAVERSAL_RULES),
                },
                RuleGroup {
                    label: "insecure deserialization",
                    advice: "Validate input sources and avoid legacy serializers.",
                    rules: RuleSet::compile("dotnet/deserialization", DESERIALIZATION_RULES),
                },
                RuleGroup {
                    label: "weak cryptography",
                    advice: "Use SHA-256 or stronger and modern AEAD ciphers.",
                    rules: RuleSet::compile("dotnet/crypto", WEAK_CRYPTO_RULES),
                },
                RuleGroup {
                    label: "hardcoded credential",
                    advice: "Move secrets to configuration providers or a secret store.",
                    rules: RuleSet::compile("dotnet/secrets", HARDCODED_SECRET_RULES),
                },
                RuleGroup {
                    label: "disabled request validation",
                    advice: "Keep request validation on; sanitize the specific field instead.",
                    rules: RuleSet::compile("dotnet/validation", REQUEST_VALIDATION_RULES),
                },
                RuleGroup {
                    label: "missing CSRF protection",
                    advice: "Add [ValidateAntiForgeryToken] to state-changing actions.",
                    rules: RuleSet::compile("dotnet/csrf", CSRF_RULES),
                },
                RuleGroup {
                    label: "debug configuration",
                    advice: "Disable debug compilation and enable custom errors in production.",
                    rules: RuleSet::compile("dotnet/debug", DEBUG_INFO_RULES),
                },
                RuleGroup {
                    label: "open redirect risk",
                    advice: "Validate redirect targets against an allowlist.",
                    rules: RuleSet::compile("dotnet/redirects", OPEN_REDIRECT_RULES),
                },
                RuleGroup {
                    label: "XXE risk",
                    advice: "Disable DTD processing and external entity resolution.",
                    rules: RuleSet::compile("dotnet/xxe", XXE_RULES),
                },
                RuleGroup {
                    label: "information disclosure",
                    advice: "Log exception details server-side; show users a generic error.",
                    rules: RuleSet::compile("dotnet/disclosure", INFO_DISCLOSURE_RULES),
                },
            ],
        }
    }

    /// Check whether a file is in scope for this scanner.
    pub fn should_check(file: &Path) -> bool {
        if let Some(ext) = file.extension().and_then(|e| e.to_str()) {
            let lower = ext.to_ascii_lowercase();
            if DOTNET_EXTENSIONS.iter().any(|s| *s == lower) {
                return true;
            }
        }
        is_config_file(file)
    }

    /// Scan a single file's content.
    pub fn scan_source(&self, source: &str, file: &Path) -> Vec<Finding> {
        if !Self::should_check(file) {
            return Vec::new();
        }

        let mut findings = Vec::new();

        if is_config_file(file) {
            findings.extend(self.scan_config(source, file));
        }

        for (idx, line) in source.lines().enumerate() {
            let line_num = idx + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || line.contains("warden:ignore") {
                continue;
            }

            for group in &self.groups {
                for rule in group.rules.matches(line) {
                    // A POST handler annotated with the anti-forgery token
                    // on the same line is covered.
                    if rule.id == "httppost_no_token"
                        && line.contains("[ValidateAntiForgeryToken]")
                    {
                        continue;
                    }

                    findings.push(
                        self.build_finding(
                            format!("{} detected", capitalize(group.label)),
                            format!(
                                "{} found at {}:{}.",
                                capitalize(group.label),
                                file.display(),
                                line_num,
                            ),
                            rule.severity,
                            rule.id.clone(),
                            file,
                            line_num,
                        )
                        .with_evidence(trimmed.to_string())
                        .with_advice(group.advice),
                    );
                }
            }
        }

        findings
    }

    /// Config files get their own checks on top of the pattern pass.
    fn scan_config(&self, source: &str, file: &Path) -> Vec<Finding> {
        let mut findings = Vec::new();

        for (idx, line) in source.lines().enumerate() {
            let line_num = idx + 1;
            let lower = line.to_lowercase();
            if line.contains("warden:ignore") {
                continue;
            }

            if CONFIG_SECRET_KEYWORDS.iter().any(|k| lower.contains(k))
                && !CONFIG_SAFE_MARKERS.iter().any(|m| lower.contains(m))
            {
                findings.push(
                    self.build_finding(
                        "Hardcoded secret in configuration detected",
                        format!(
                            "A configuration value at {}:{} looks like a literal secret.",
                            file.display(),
                            line_num,
                        ),
                        Severity::High,
                        "config_secret".to_string(),
                        file,
                        line_num,
                    )
                    .with_evidence(line.trim().to_string())
                    .with_advice("Use a configuration substitution or secret store reference."),
                );
            }

            if lower.contains("customerrors") && lower.contains("mode=\"off\"") {
                findings.push(
                    self.build_finding(
                        "Custom errors disabled detected",
                        format!(
                            "Custom errors are turned off at {}:{}; raw errors may leak \
                             sensitive details.",
                            file.display(),
                            line_num,
                        ),
                        Severity::Low,
                        "config_customerrors_off".to_string(),
                        file,
                        line_num,
                    )
                    .with_evidence(line.trim().to_string())
                    .with_advice("Set customErrors mode to On or RemoteOnly."),
                );
            }

            if lower.contains("debug=\"true\"") {
                findings.push(
                    self.build_finding(
                        "Debug compilation enabled detected",
                        format!(
                            "Debug compilation is enabled at {}:{}.",
                            file.display(),
                            line_num,
                        ),
                        Severity::Low,
                        "config_debug_true".to_string(),
                        file,
                        line_num,
                    )
                    .with_evidence(line.trim().to_string())
                    .with_advice("Disable debug compilation for production builds."),
                );
            }
        }

        findings
    }

    fn build_finding(
        &self,
        title: impl Into<String>,
        description: impl Into<String>,
        severity: Severity,
        rule_id: String,
        file: &Path,
        line: usize,
    ) -> Finding {
        Finding::new(
            title,
            description,
            severity,
            Category::DotNet,
            Provenance::new("dotnet", 0.75).with_rule(rule_id.clone()),
        )
        .with_location(CodeLocation::new(file, line))
        .with_tag("dotnet")
        .with_tag(rule_id)
    }
}

impl Default for DotNetScanner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Scanner for DotNetScanner {
    fn name(&self) -> &str {
        "dotnet"
    }

    fn category(&self) -> Category {
        Category::DotNet
    }

    async fn scan(
        &self,
        _config: &ScanConfig,
        context: &ScanContext,
    ) -> Result<Vec<Finding>, ScanError> {
        let mut findings = Vec::new();
        for file in &context.files {
            if !Self::should_check(file) {
                continue;
            }
            match std::fs::read_to_string(file) {
                Ok(source) => findings.extend(self.scan_source(&source, file)),
                Err(e) => tracing::warn!("failed to read {}: {}", file.display(), e),
            }
        }
        Ok(findings)
    }
}

fn is_config_file(file: &Path) -> bool {
    let Some(name) = file.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let lower = name.to_ascii_lowercase();
    CONFIG_FILENAMES.iter().any(|f| *f == lower)
        || (lower.starts_with("appsettings.") && lower.ends_with(".json"))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(source: &str, file: &str) -> Vec<Finding> {
        DotNetScanner::new().scan_source(source, Path::new(file))
    }

    #[test]
    fn test_detect_sql_concatenation() {
        let findings = scan(
            r#"var cmd = new SqlCommand("SELECT * FROM users WHERE id = " + id);"#,
            "UserRepository.cs",
        );
        assert!(findings.iter().any(|f| f.severity == Severity::High));
        assert!(findings
            .iter()
            .any(|f| f.provenance.rule_id.as_deref() == Some("sqlcommand_concat")));
    }

    #[test]
    fn test_detect_binaryformatter() {
        let findings = scan(
            "var obj = BinaryFormatter.Deserialize(stream);",
            "Loader.cs",
        );
        assert!(findings
            .iter()
            .any(|f| f.provenance.rule_id.as_deref() == Some("binaryformatter")));
    }

    #[test]
    fn test_detect_weak_crypto() {
        let findings = scan("using var md5 = MD5.Create();", "Hashing.cs");
        assert!(findings.iter().any(|f| f.severity == Severity::Medium));
    }

    #[test]
    fn test_httppost_without_token() {
        let findings = scan("[HttpPost]", "AccountController.cs");
        assert!(findings
            .iter()
            .any(|f| f.provenance.rule_id.as_deref() == Some("httppost_no_token")));
    }

    #[test]
    fn test_httppost_with_token_same_line() {
        let findings = scan(
            "[HttpPost] [ValidateAntiForgeryToken]",
            "AccountController.cs",
        );
        assert!(findings
            .iter()
            .all(|f| f.provenance.rule_id.as_deref() != Some("httppost_no_token")));
    }

    #[test]
    fn test_non_dotnet_file_skipped() {
        let findings = scan("var cmd = new SqlCommand(q + id);", "script.py");
        assert!(findings.is_empty());
    }

    #[test]
    fn test_config_secret_flagged() {
        let findings = scan(
            r#"<add name="Db" connectionString="Server=db;Password=hunter2;" />"#,
            "web.config",
        );
        assert!(findings
            .iter()
            .any(|f| f.provenance.rule_id.as_deref() == Some("config_secret")));
    }

    #[test]
    fn test_config_substitution_is_safe() {
        let findings = scan(
            r#"<add name="Db" connectionString="Server=db;Password=$(DB_PASS);" />"#,
            "web.config",
        );
        assert!(findings
            .iter()
            .all(|f| f.provenance.rule_id.as_deref() != Some("config_secret")));
    }

    #[test]
    fn test_config_debug_true() {
        let findings = scan(
            r#"<compilation debug="true" targetFramework="4.8" />"#,
            "web.config",
        );
        assert!(findings
            .iter()
            .any(|f| f.provenance.rule_id.as_deref() == Some("config_debug_true")));
    }

    #[test]
    fn test_customerrors_off() {
        let findings = scan(r#"<customErrors mode="Off" />"#, "web.config");
        assert!(findings
            .iter()
            .any(|f| f.provenance.rule_id.as_deref() == Some("config_customerrors_off")));
    }

    #[test]
    fn test_appsettings_variants_checked() {
        assert!(DotNetScanner::should_check(Path::new("appsettings.json")));
        assert!(DotNetScanner::should_check(Path::new(
            "appsettings.Production.json"
        )));
        assert!(!DotNetScanner::should_check(Path::new("package.json")));
    }

    #[test]
    fn test_open_redirect() {
        let findings = scan(
            r#"return Response.Redirect(Request.QueryString["next"]);"#,
            "LoginController.cs",
        );
        assert!(findings
            .iter()
            .any(|f| f.provenance.rule_id.as_deref() == Some("redirect_request")));
    }

    #[test]
    fn test_clean_source() {
        let findings = scan(
            "public int Add(int a, int b) => a + b;\n",
            "Calculator.cs",
        );
        assert!(findings.is_empty());
    }
}
