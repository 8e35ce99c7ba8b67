//! Verbose/debug flag scanner.
//!
//! Catches debug logging, verbose CLI flags, debug configuration, and
//! leftover test-debugging code that should not ship to production. Rules
//! are grouped, each group carrying its own severity.

use crate::config::{ScanConfig, VerboseConfig};
use crate::error::ScanError;
use crate::finding::{Category, CodeLocation, Finding, Provenance, Severity};
use crate::rules::{RuleDef, RuleSet};
use crate::scanner::{ScanContext, Scanner};
use async_trait::async_trait;
use std::path::Path;

const DEBUG_FLAG_RULES: &[RuleDef] = &[
    // Python
    RuleDef { id: "py_logging_debug", severity: Severity::Medium, description: "logging configured at DEBUG level", pattern: r"logging\.basicConfig\([^)]*level\s*=\s*logging\.DEBUG" },
    RuleDef { id: "py_logger_setlevel", severity: Severity::Medium, description: "logger set to DEBUG level", pattern: r"logger\.setLevel\(logging\.DEBUG\)" },
    RuleDef { id: "debug_true", severity: Severity::Medium, description: "debug flag enabled", pattern: r"debug\s*=\s*True" },
    RuleDef { id: "verbose_true", severity: Severity::Medium, description: "verbose flag enabled", pattern: r"verbose\s*=\s*True" },
    RuleDef { id: "django_debug", severity: Severity::Medium, description: "Django DEBUG enabled", pattern: r"DJANGO_DEBUG\s*=\s*True" },
    RuleDef { id: "upper_debug_true", severity: Severity::Medium, description: "DEBUG flag enabled", pattern: r"DEBUG\s*=\s*True" },
    // JavaScript/TypeScript
    RuleDef { id: "console_debug", severity: Severity::Medium, description: "console.debug call", pattern: r"console\.debug\(" },
    RuleDef { id: "console_trace", severity: Severity::Medium, description: "console.trace call", pattern: r"console\.trace\(" },
    RuleDef { id: "js_logger_debug", severity: Severity::Medium, description: "logger.debug call", pattern: r"logger\.debug\(" },
    RuleDef { id: "js_debug_true", severity: Severity::Medium, description: "debug option enabled", pattern: r"debug:\s*true" },
    RuleDef { id: "js_verbose_true", severity: Severity::Medium, description: "verbose option enabled", pattern: r"verbose:\s*true" },
    RuleDef { id: "node_env_dev", severity: Severity::Medium, description: "NODE_ENV set to development", pattern: r"NODE_ENV.*development" },
    RuleDef { id: "process_env_debug", severity: Severity::Medium, description: "DEBUG environment variable use", pattern: r"process\.env\.DEBUG" },
    // Java
    RuleDef { id: "java_level_debug", severity: Severity::Medium, description: "java.util.logging at DEBUG", pattern: r"Logger\.getLogger\([^)]*\)\.setLevel\(Level\.DEBUG\)" },
    RuleDef { id: "java_level_all", severity: Severity::Medium, description: "java.util.logging at ALL", pattern: r"Logger\.getLogger\([^)]*\)\.setLevel\(Level\.ALL\)" },
    RuleDef { id: "java_logging_prop", severity: Severity::Medium, description: "JVM logging level forced to DEBUG", pattern: r#"System\.setProperty\(["']java\.util\.logging\.level["'],\s*["']DEBUG["']"# },
    RuleDef { id: "spring_debug_logs", severity: Severity::Medium, description: "@EnableDebugLogs annotation", pattern: r"@EnableDebugLogs" },
    RuleDef { id: "method_debug_call", severity: Severity::Medium, description: "debug-level log call", pattern: r"\.debug\(.*\)" },
    // .NET
    RuleDef { id: "dotnet_loglevel_debug", severity: Severity::Medium, description: "LogLevel.Debug in use", pattern: r"LogLevel\.Debug" },
    RuleDef { id: "dotnet_loglevel_trace", severity: Severity::Medium, description: "LogLevel.Trace in use", pattern: r"LogLevel\.Trace" },
    RuleDef { id: "dotnet_adddebug", severity: Severity::Medium, description: "debug logging provider added", pattern: r"\.AddDebug\(\)" },
    RuleDef { id: "dotnet_min_debug", severity: Severity::Medium, description: "minimum log level set to Debug", pattern: r"\.SetMinimumLevel\(LogLevel\.Debug\)" },
    RuleDef { id: "csharp_if_debug", severity: Severity::Medium, description: "#if DEBUG conditional compilation", pattern: r"#if\s+DEBUG" },
    RuleDef { id: "debugger_attached", severity: Severity::Medium, description: "Debugger.IsAttached check", pattern: r"Debugger\.IsAttached" },
    RuleDef { id: "aspnetcore_development", severity: Severity::Medium, description: "ASPNETCORE_ENVIRONMENT compared to Development", pattern: r#"Environment\.GetEnvironmentVariable\(["']ASPNETCORE_ENVIRONMENT["'].*["']Development["']"# },
    // Go
    RuleDef { id: "logrus_debug", severity: Severity::Medium, description: "logrus at DebugLevel", pattern: r"log\.SetLevel\(logrus\.DebugLevel\)" },
    RuleDef { id: "logrus_trace", severity: Severity::Medium, description: "logrus at TraceLevel", pattern: r"log\.SetLevel\(logrus\.TraceLevel\)" },
    RuleDef { id: "gin_debug", severity: Severity::Medium, description: "gin in debug mode", pattern: r"gin\.SetMode\(gin\.DebugMode\)" },
    // PHP
    RuleDef { id: "php_error_reporting", severity: Severity::Medium, description: "error_reporting(E_ALL)", pattern: r"error_reporting\(E_ALL\)" },
    RuleDef { id: "php_display_errors", severity: Severity::Medium, description: "display_errors enabled", pattern: r#"ini_set\(["']display_errors["'],\s*["']1["']"# },
    RuleDef { id: "php_display_startup_errors", severity: Severity::Medium, description: "display_startup_errors enabled", pattern: r#"ini_set\(["']display_startup_errors["'],\s*["']1["']"# },
    RuleDef { id: "wp_debug_true", severity: Severity::Medium, description: "WordPress debug enabled", pattern: r"WP_DEBUG.*true" },
    RuleDef { id: "wp_debug", severity: Severity::Medium, description: "WordPress debug enabled", pattern: r#"define\(["']WP_DEBUG["'],\s*true\)"# },
    // Ruby
    RuleDef { id: "rails_logger_debug", severity: Severity::Medium, description: "Rails logger at DEBUG", pattern: r"Rails\.logger\.level\s*=\s*Logger::DEBUG" },
    RuleDef { id: "rails_log_level", severity: Severity::Medium, description: "Rails log_level set to :debug", pattern: r"config\.log_level\s*=\s*:debug" },
    RuleDef { id: "ruby_logger_debug", severity: Severity::Medium, description: "logger level set to DEBUG", pattern: r"logger\.level\s*=\s*Logger::DEBUG" },
    // Shell
    RuleDef { id: "shell_set_x", severity: Severity::Medium, description: "shell trace mode (set -x)", pattern: r"set\s+-x" },
    RuleDef { id: "shell_set_v", severity: Severity::Medium, description: "shell verbose mode (set -v)", pattern: r"set\s+-v" },
    RuleDef { id: "bash_x", severity: Severity::Medium, description: "bash invoked with -x", pattern: r"bash\s+-x" },
    RuleDef { id: "sh_x", severity: Severity::Medium, description: "sh invoked with -x", pattern: r"sh\s+-x" },
    RuleDef { id: "ps4_prompt", severity: Severity::Medium, description: "PS4 trace prompt set", pattern: r"PS4=" },
];

const VERBOSE_CLI_RULES: &[RuleDef] = &[
    RuleDef { id: "flag_v", severity: Severity::Low, description: "verbose flag", pattern: r"\s-v\s" },
    RuleDef { id: "flag_verbose", severity: Severity::Low, description: "verbose flag", pattern: r"\s--verbose\s" },
    RuleDef { id: "flag_vv", severity: Severity::Low, description: "verbose flag", pattern: r"\s-vv\s" },
    RuleDef { id: "flag_vvv", severity: Severity::Low, description: "verbose flag", pattern: r"\s-vvv\s" },
    RuleDef { id: "flag_debug", severity: Severity::Low, description: "debug flag", pattern: r"\s--debug\s" },
    RuleDef { id: "flag_trace", severity: Severity::Low, description: "trace flag", pattern: r"\s--trace\s" },
    RuleDef { id: "flag_d", severity: Severity::Low, description: "debug flag", pattern: r"\s-d\s" },
    RuleDef { id: "env_verbose", severity: Severity::Low, description: "VERBOSE=1 environment setting", pattern: r"VERBOSE=1" },
    RuleDef { id: "env_debug", severity: Severity::Low, description: "DEBUG=1 environment setting", pattern: r"DEBUG=1" },
    RuleDef { id: "env_trace", severity: Severity::Low, description: "TRACE=1 environment setting", pattern: r"TRACE=1" },
    RuleDef { id: "docker_log_debug", severity: Severity::Low, description: "docker with debug log level", pattern: r"docker.*--log-level\s*debug" },
    RuleDef { id: "docker_debug", severity: Severity::Low, description: "docker --debug", pattern: r"docker.*--debug" },
    RuleDef { id: "docker_progress_plain", severity: Severity::Low, description: "docker build with plain progress output", pattern: r"dockerfile.*--progress=plain" },
    RuleDef { id: "kubectl_verbose", severity: Severity::Low, description: "kubectl high verbosity", pattern: r"kubectl.*--v=[5-9]" },
    RuleDef { id: "kubectl_trace", severity: Severity::Low, description: "kubectl trace verbosity", pattern: r"kubectl.*--v=1[0-9]" },
    RuleDef { id: "helm_debug", severity: Severity::Low, description: "helm --debug", pattern: r"helm.*--debug" },
    RuleDef { id: "tf_log_debug", severity: Severity::Low, description: "TF_LOG=DEBUG", pattern: r"TF_LOG=DEBUG" },
    RuleDef { id: "tf_log_trace", severity: Severity::Low, description: "TF_LOG=TRACE", pattern: r"TF_LOG=TRACE" },
    RuleDef { id: "tf_verbose", severity: Severity::Low, description: "terraform -verbose", pattern: r"terraform.*-verbose" },
    RuleDef { id: "ansible_vvv", severity: Severity::Low, description: "ansible extra verbosity", pattern: r"ansible.*-vv" },
    RuleDef { id: "ansible_verbose", severity: Severity::Low, description: "ansible --verbose", pattern: r"ansible.*--verbose" },
    RuleDef { id: "ansible_debug_env", severity: Severity::Low, description: "ANSIBLE_DEBUG=1", pattern: r"ANSIBLE_DEBUG=1" },
    RuleDef { id: "git_trace", severity: Severity::Low, description: "GIT_TRACE=1", pattern: r"GIT_TRACE=1" },
    RuleDef { id: "git_curl_verbose", severity: Severity::Low, description: "GIT_CURL_VERBOSE=1", pattern: r"GIT_CURL_VERBOSE=1" },
    RuleDef { id: "git_verbose", severity: Severity::Low, description: "git --verbose", pattern: r"git.*--verbose" },
];

const CONFIG_DEBUG_RULES: &[RuleDef] = &[
    RuleDef { id: "log_level_debug", severity: Severity::Medium, description: "log_level set to debug", pattern: r"log_level:\s*debug" },
    RuleDef { id: "log_level_trace", severity: Severity::Medium, description: "log_level set to trace", pattern: r"log_level:\s*trace" },
    RuleDef { id: "verbosity_high", severity: Severity::Medium, description: "verbosity 3 or higher", pattern: r"verbosity:\s*[3-9]" },
    RuleDef { id: "debug_mode_true", severity: Severity::Medium, description: "debug_mode enabled", pattern: r"debug_mode:\s*true" },
    RuleDef { id: "enable_debug_true", severity: Severity::Medium, description: "enable_debug set", pattern: r"enable_debug:\s*true" },
    RuleDef { id: "development_mode", severity: Severity::Medium, description: "development_mode enabled", pattern: r"development_mode:\s*true" },
    RuleDef { id: "env_debug_directive", severity: Severity::Medium, description: "ENV DEBUG=true directive", pattern: r"ENV\s+DEBUG\s*=\s*true" },
    RuleDef { id: "env_verbose_directive", severity: Severity::Medium, description: "ENV VERBOSE=true directive", pattern: r"ENV\s+VERBOSE\s*=\s*true" },
    RuleDef { id: "database_debug", severity: Severity::Medium, description: "DATABASE_DEBUG enabled", pattern: r"DATABASE_DEBUG\s*=\s*true" },
    RuleDef { id: "environment_development", severity: Severity::Medium, description: "environment set to development", pattern: r"environment:\s*development" },
    RuleDef { id: "show_sql", severity: Severity::Medium, description: "SQL echo enabled", pattern: r"SHOW_SQL\s*=\s*true" },
    RuleDef { id: "hibernate_show_sql", severity: Severity::Medium, description: "hibernate.show_sql enabled", pattern: r"hibernate\.show_sql\s*=\s*true" },
    RuleDef { id: "spring_show_sql", severity: Severity::Medium, description: "spring.jpa.show-sql enabled", pattern: r"spring\.jpa\.show-sql\s*=\s*true" },
    RuleDef { id: "php_display_errors_on", severity: Severity::Medium, description: "display_errors On", pattern: r"display_errors\s*=\s*On" },
    RuleDef { id: "php_display_startup_on", severity: Severity::Medium, description: "display_startup_errors On", pattern: r"display_startup_errors\s*=\s*On" },
    RuleDef { id: "errordocument_debug", severity: Severity::Medium, description: "Apache ErrorDocument pointing at a debug page", pattern: r"ErrorDocument\s+500.*debug" },
];

const TEST_REMNANT_RULES: &[RuleDef] = &[
    RuleDef { id: "console_log_debug", severity: Severity::Low, description: "console.log DEBUG output", pattern: r#"console\.log\([^)]*["']DEBUG["']"# },
    RuleDef { id: "print_debug", severity: Severity::Low, description: "print DEBUG output", pattern: r#"print\([^)]*["']DEBUG["']"# },
    RuleDef { id: "println_debug", severity: Severity::Low, description: "println DEBUG output", pattern: r#"System\.out\.println\([^)]*["']DEBUG["']"# },
    RuleDef { id: "go_println_debug", severity: Severity::Low, description: "fmt.Println DEBUG output", pattern: r#"fmt\.Println\([^)]*["']DEBUG["']"# },
    RuleDef { id: "echo_debug", severity: Severity::Low, description: "echo DEBUG output", pattern: r#"echo\s+["']DEBUG"# },
    RuleDef { id: "logger_debug_string", severity: Severity::Low, description: "logger call with DEBUG marker", pattern: r#"logger\.[^(]*\([^)]*["']DEBUG["']"# },
    RuleDef { id: "block_comment_debug", severity: Severity::Low, description: "DEBUG note in block comment", pattern: r"/\*.*DEBUG.*\*/" },
    RuleDef { id: "html_comment_debug", severity: Severity::Low, description: "DEBUG note in HTML comment", pattern: r"<!--.*DEBUG.*-->" },
    RuleDef { id: "todo_remove_debug", severity: Severity::Low, description: "TODO to remove debug code", pattern: r"//\s*TODO:?\s*remove.*debug" },
    RuleDef { id: "fixme_remove_debug", severity: Severity::Low, description: "FIXME to remove debug code", pattern: r"//\s*FIXME:?\s*remove.*debug" },
    RuleDef { id: "hash_todo_remove_debug", severity: Severity::Low, description: "TODO to remove debug code", pattern: r"#\s*TODO:?\s*remove.*debug" },
    RuleDef { id: "console_time", severity: Severity::Low, description: "console.time profiling call", pattern: r"console\.time\(" },
    RuleDef { id: "console_time_end", severity: Severity::Low, description: "console.timeEnd profiling call", pattern: r"console\.timeEnd\(" },
    RuleDef { id: "performance_now", severity: Severity::Low, description: "performance.now profiling call", pattern: r"performance\.now\(\)" },
    RuleDef { id: "currentmillis_print", severity: Severity::Low, description: "currentTimeMillis timing printout", pattern: r"System\.currentTimeMillis\(\).*print" },
    RuleDef { id: "time_time_print", severity: Severity::Low, description: "time.time timing printout", pattern: r"time\.time\(\).*print" },
];

/// Extensions of files worth scanning for debug flags.
const SUPPORTED_EXTENSIONS: &[&str] = &[
    "py", "js", "ts", "jsx", "tsx", "java", "cs", "vb", "fs", "go", "php", "rb", "sh", "bash",
    "zsh", "yml", "yaml", "json", "xml", "config", "properties", "env", "dockerfile", "tf",
    "tfvars",
];

/// Filenames that commonly carry debug configuration.
const DEBUG_CONFIG_FILES: &[&str] = &[
    "docker-compose.yml",
    "docker-compose.yaml",
    "dockerfile",
    "makefile",
    "package.json",
    "webpack.config.js",
    "gulpfile.js",
    "gruntfile.js",
    "ansible.cfg",
    "playbook.yml",
    "playbook.yaml",
    ".env",
    ".env.local",
    "appsettings.json",
    "appsettings.development.json",
    "web.config",
    "application.properties",
    "application.yml",
    "logback.xml",
    "log4j.xml",
];

/// Path fragments where verbose flags are expected and tolerated.
const SAFE_PATH_MARKERS: &[&str] = &[
    "test", "spec", "mock", "example", "sample", "demo", "debug", "dev", "development", "local",
];

struct RuleGroup {
    label: &'static str,
    advice: &'static str,
    rules: RuleSet,
}

/// Scanner for verbose flags and debug configuration.
pub struct VerboseScanner {
    groups: Vec<RuleGroup>,
}

impl VerboseScanner {
    pub fn new() -> Self {
        Self {
            groups: vec![
                RuleGroup {
                    label: "debug logging",
                    advice: "Debug/verbose logging should be disabled in production.",
                    rules: RuleSet::compile("verbose/debug_flags", DEBUG_FLAG_RULES),
                },
                RuleGroup {
                    label: "verbose CLI flag",
                    advice: "Verbose command line flags may expose sensitive information.",
                    rules: RuleSet::compile("verbose/cli_flags", VERBOSE_CLI_RULES),
                },
                RuleGroup {
                    label: "debug configuration",
                    advice: "Debug configuration should be disabled in production.",
                    rules: RuleSet::compile("verbose/config", CONFIG_DEBUG_RULES),
                },
                RuleGroup {
                    label: "debug remnant",
                    advice: "Leftover debug code should be removed before release.",
                    rules: RuleSet::compile("verbose/remnants", TEST_REMNANT_RULES),
                },
            ],
        }
    }

    /// Check whether a file is worth scanning at all.
    pub fn should_check(file: &Path) -> bool {
        if let Some(ext) = file.extension().and_then(|e| e.to_str()) {
            let lower = ext.to_ascii_lowercase();
            if SUPPORTED_EXTENSIONS.iter().any(|s| *s == lower) {
                return true;
            }
        }
        file.file_name()
            .and_then(|n| n.to_str())
            .map(|name| {
                let lower = name.to_ascii_lowercase();
                DEBUG_CONFIG_FILES.iter().any(|f| *f == lower)
            })
            .unwrap_or(false)
    }

    /// Scan a single file's content.
    pub fn scan_source(&self, source: &str, file: &Path, config: &VerboseConfig) -> Vec<Finding> {
        if !Self::should_check(file) {
            return Vec::new();
        }

        let safe_context = is_safe_path(file);
        let mut findings = Vec::new();

        for (idx, line) in source.lines().enumerate() {
            let line_num = idx + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') || line.contains("warden:ignore") {
                continue;
            }

            for group in &self.groups {
                for rule in group.rules.matches(line) {
                    // In test/dev contexts only medium+ findings matter.
                    if safe_context
                        && !config.include_safe_contexts
                        && rule.severity <= Severity::Low
                    {
                        continue;
                    }

                    let finding = Finding::new(
                        format!("{} detected: {}", capitalize(group.label), rule.description),
                        format!(
                            "{} found at {}:{}. {}",
                            capitalize(group.label),
                            file.display(),
                            line_num,
                            group.advice,
                        ),
                        rule.severity,
                        Category::DebugConfig,
                        Provenance::new("verbose", 0.75).with_rule(rule.id.clone()),
                    )
                    .with_location(CodeLocation::new(file, line_num))
                    .with_evidence(trimmed.to_string())
                    .with_advice(group.advice)
                    .with_tag("verbose")
                    .with_tag(rule.id.clone());

                    findings.push(finding);
                }
            }
        }

        findings
    }
}

impl Default for VerboseScanner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Scanner for VerboseScanner {
    fn name(&self) -> &str {
        "verbose"
    }

    fn category(&self) -> Category {
        Category::DebugConfig
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
                Ok(source) => findings.extend(self.scan_source(&source, file, &config.verbose)),
                Err(e) => tracing::warn!("failed to read {}: {}", file.display(), e),
            }
        }
        Ok(findings)
    }
}

fn is_safe_path(file: &Path) -> bool {
    let lower = file.to_string_lossy().to_lowercase();
    SAFE_PATH_MARKERS.iter().any(|m| lower.contains(m))
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
        VerboseScanner::new().scan_source(source, Path::new(file), &VerboseConfig::default())
    }

    #[test]
    fn test_detect_python_debug_flag() {
        let findings = scan("DEBUG = True\n", "settings.py");
        assert!(!findings.is_empty());
        assert_eq!(findings[0].severity, Severity::Medium);
        assert_eq!(findings[0].category, Category::DebugConfig);
    }

    #[test]
    fn test_detect_console_debug() {
        let findings = scan("console.debug('state', state);\n", "app.js");
        assert!(!findings.is_empty());
    }

    #[test]
    fn test_detect_config_log_level() {
        let findings = scan("log_level: debug\n", "config.yml");
        assert!(findings.iter().any(|f| f.provenance.rule_id.as_deref() == Some("log_level_debug")));
    }

    #[test]
    fn test_unsupported_extension_skipped() {
        let findings = scan("DEBUG = True\n", "notes.txt");
        assert!(findings.is_empty());
    }

    #[test]
    fn test_config_filename_gating() {
        assert!(VerboseScanner::should_check(Path::new("Dockerfile")));
        assert!(VerboseScanner::should_check(Path::new("docker-compose.yml")));
        assert!(!VerboseScanner::should_check(Path::new("README.md")));
    }

    #[test]
    fn test_safe_context_drops_low_severity() {
        // Low severity CLI flag inside a dev script
        let findings = scan("run --verbose --fast\n", "scripts/dev/run.sh");
        assert!(findings.is_empty());

        // The same content in a production path is reported
        let findings = scan("run --verbose --fast\n", "scripts/run.sh");
        assert!(!findings.is_empty());
        assert_eq!(findings[0].severity, Severity::Low);
    }

    #[test]
    fn test_safe_context_keeps_medium_severity() {
        let findings = scan("DEBUG = True\n", "tests/settings.py");
        assert!(!findings.is_empty(), "medium severity survives safe contexts");
    }

    #[test]
    fn test_include_safe_contexts_option() {
        let config = VerboseConfig {
            include_safe_contexts: true,
        };
        let findings = VerboseScanner::new().scan_source(
            "run --verbose --fast\n",
            Path::new("scripts/dev/run.sh"),
            &config,
        );
        assert!(!findings.is_empty());
    }

    #[test]
    fn test_detect_shell_trace_prompt() {
        let findings = scan("export PS4='+ ${BASH_SOURCE}:${LINENO}: '\n", "deploy.sh");
        assert!(findings.iter().any(|f| f.provenance.rule_id.as_deref() == Some("ps4_prompt")));
        assert_eq!(findings[0].severity, Severity::Medium);
    }

    #[test]
    fn test_detect_git_and_kubectl_verbose() {
        let findings = scan("git pull --verbose origin main\n", "deploy.sh");
        assert!(findings.iter().any(|f| f.provenance.rule_id.as_deref() == Some("git_verbose")));

        let findings = scan("kubectl apply -f app.yml --v=10\n", "deploy.sh");
        assert!(findings.iter().any(|f| f.provenance.rule_id.as_deref() == Some("kubectl_trace")));
    }

    #[test]
    fn test_detect_database_debug_config() {
        let findings = scan("DATABASE_DEBUG = true\n", "app.properties");
        assert!(findings.iter().any(|f| f.provenance.rule_id.as_deref() == Some("database_debug")));
    }

    #[test]
    fn test_detect_comment_debug_remnants() {
        let findings = scan("render(); /* DEBUG only */\n", "app.js");
        assert!(findings.iter().any(|f| f.provenance.rule_id.as_deref() == Some("block_comment_debug")));

        let findings = scan("<!-- DEBUG panel --><div>\n", "layout.config");
        assert!(findings.iter().any(|f| f.provenance.rule_id.as_deref() == Some("html_comment_debug")));
    }

    #[test]
    fn test_comment_lines_skipped() {
        let findings = scan("# DEBUG = True\n", "settings.py");
        assert!(findings.is_empty());
    }

    #[test]
    fn test_clean_file() {
        let findings = scan("import os\n\nLEVEL = 'info'\n", "settings.py");
        assert!(findings.is_empty());
    }
}
