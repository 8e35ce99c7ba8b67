//! Ansible misconfiguration scanner.
//!
//! Covers playbooks, inventories, and `ansible.cfg`: hardcoded secrets,
//! shell injection through templating, loose file modes, plain HTTP
//! downloads, privilege escalation issues, and vault hygiene. YAML files
//! are only scanned when their content actually looks like Ansible.

use crate::config::{AnsibleConfig, ScanConfig};
use crate::error::ScanError;
use crate::finding::{Category, CodeLocation, Finding, Provenance, Severity};
use crate::rules::{RuleDef, RuleSet};
use crate::scanner::{ScanContext, Scanner};
use async_trait::async_trait;
use std::path::Path;

const HARDCODED_SECRET_RULES: &[RuleDef] = &[
    RuleDef { id: "secret_password", severity: Severity::High, description: "hardcoded password value", pattern: r#"password:\s*["']?[^"'\s]{8,}["']?\s*$"# },
    RuleDef { id: "secret_secret", severity: Severity::High, description: "hardcoded secret value", pattern: r#"secret:\s*["']?[^"'\s]{8,}["']?\s*$"# },
    RuleDef { id: "secret_api_key", severity: Severity::High, description: "hardcoded API key", pattern: r#"api_key:\s*["']?[^"'\s]{10,}["']?\s*$"# },
    RuleDef { id: "secret_private_key", severity: Severity::High, description: "inline private key", pattern: r#"private_key:\s*["']?-----BEGIN"# },
    RuleDef { id: "secret_token", severity: Severity::High, description: "hardcoded token", pattern: r#"token:\s*["']?[^"'\s]{10,}["']?\s*$"# },
];

const UNENCRYPTED_VARS_RULES: &[RuleDef] = &[
    RuleDef { id: "vars_password", severity: Severity::Medium, description: "sensitive variable outside vault", pattern: r"group_vars.*password" },
    RuleDef { id: "hostvars_password", severity: Severity::Medium, description: "sensitive variable outside vault", pattern: r"host_vars.*password" },
];

const SHELL_INJECTION_RULES: &[RuleDef] = &[
    RuleDef { id: "shell_template", severity: Severity::High, description: "templated shell command", pattern: r"shell:\s*.*\{\{.*\}\}.*" },
    RuleDef { id: "command_template", severity: Severity::High, description: "templated command", pattern: r"command:\s*.*\{\{.*\}\}.*" },
    RuleDef { id: "raw_template", severity: Severity::High, description: "templated raw command", pattern: r"raw:\s*.*\{\{.*\}\}.*" },
    RuleDef { id: "shell_unsafe_filter", severity: Severity::High, description: "unsafe filter in shell command", pattern: r"shell:.*\|.*unsafe" },
];

const FILE_PERMISSION_RULES: &[RuleDef] = &[
    RuleDef { id: "mode_777", severity: Severity::Medium, description: "world-writable file mode", pattern: r#"mode:\s*["']?777["']?"# },
    RuleDef { id: "mode_666", severity: Severity::Medium, description: "world-writable file mode", pattern: r#"mode:\s*["']?666["']?"# },
    RuleDef { id: "mode_o_w", severity: Severity::Medium, description: "other-writable file mode", pattern: r#"mode:\s*["']?o\+w["']?"# },
    RuleDef { id: "mode_a_w", severity: Severity::Medium, description: "all-writable file mode", pattern: r#"mode:\s*["']?a\+w["']?"# },
];

const HTTP_USAGE_RULES: &[RuleDef] = &[
    RuleDef { id: "http_url", severity: Severity::Medium, description: "plain HTTP download", pattern: r"url:\s*http://[^\s]+" },
    RuleDef { id: "http_src", severity: Severity::Medium, description: "plain HTTP source", pattern: r"src:\s*http://[^\s]+" },
    RuleDef { id: "http_repo", severity: Severity::Medium, description: "plain HTTP repository", pattern: r"repo:\s*http://[^\s]+" },
];

const SUDO_RULES: &[RuleDef] = &[
    RuleDef { id: "become_yes", severity: Severity::Medium, description: "privilege escalation without validation", pattern: r"become:\s*yes" },
    RuleDef { id: "become_root", severity: Severity::Medium, description: "escalation to root without validation", pattern: r"become_user:\s*root" },
    RuleDef { id: "nopasswd_all", severity: Severity::Medium, description: "NOPASSWD:ALL sudo rule", pattern: r"sudo:.*NOPASSWD:ALL" },
];

const DEBUG_EXPOSURE_RULES: &[RuleDef] = &[
    RuleDef { id: "debug_yes", severity: Severity::Low, description: "debug mode enabled", pattern: r"debug:\s*yes" },
    RuleDef { id: "debug_true", severity: Severity::Low, description: "debug mode enabled", pattern: r"debug:\s*true" },
    RuleDef { id: "verbosity_high", severity: Severity::Low, description: "high verbosity configured", pattern: r"verbosity:\s*[3-9]" },
    RuleDef { id: "triple_v", severity: Severity::Low, description: "-vvv verbosity flag", pattern: r"-vvv" },
];

const WEAK_CRYPTO_RULES: &[RuleDef] = &[
    RuleDef { id: "algo_md5", severity: Severity::Medium, description: "MD5 algorithm in use", pattern: r"algorithm:\s*md5" },
    RuleDef { id: "algo_sha1", severity: Severity::Medium, description: "SHA-1 algorithm in use", pattern: r"algorithm:\s*sha1" },
    RuleDef { id: "checksum_md5", severity: Severity::Medium, description: "MD5 checksum in use", pattern: r"checksum_algorithm:\s*md5" },
    RuleDef { id: "checksum_sha1", severity: Severity::Medium, description: "SHA-1 checksum in use", pattern: r"checksum_algorithm:\s*sha1" },
];

const UNSAFE_PRIVILEGE_RULES: &[RuleDef] = &[
    RuleDef { id: "become_flags_n", severity: Severity::High, description: "non-interactive become flags", pattern: r"become_flags:.*-n" },
    RuleDef { id: "become_flags_noninteractive", severity: Severity::High, description: "non-interactive become flags", pattern: r"become_flags:.*--non-interactive" },
    RuleDef { id: "unsafe_escalation", severity: Severity::High, description: "unsafe privilege escalation", pattern: r"privilege_escalation:.*unsafe" },
];

const INVENTORY_EXPOSURE_RULES: &[RuleDef] = &[
    RuleDef { id: "ansible_ssh_pass", severity: Severity::High, description: "SSH password in inventory", pattern: r"ansible_ssh_pass:\s*[^{\s]" },
    RuleDef { id: "ansible_become_pass", severity: Severity::High, description: "become password in inventory", pattern: r"ansible_become_pass:\s*[^{\s]" },
    RuleDef { id: "ansible_password", severity: Severity::High, description: "password in inventory", pattern: r"ansible_password:\s*[^{\s]" },
];

const TEMPLATE_INJECTION_RULES: &[RuleDef] = &[
    RuleDef { id: "template_safe_filter", severity: Severity::High, description: "safe filter disables auto-escaping", pattern: r"template:.*\{\{.*\|.*safe.*\}\}" },
    RuleDef { id: "template_raw_filter", severity: Severity::High, description: "raw filter disables auto-escaping", pattern: r"template:.*\{\{.*\|.*raw.*\}\}" },
    RuleDef { id: "lineinfile_unsafe", severity: Severity::High, description: "unsafe filter in lineinfile", pattern: r"lineinfile:.*\{\{.*\|.*unsafe.*\}\}" },
];

/// YAML keys that mark a file as Ansible content.
const ANSIBLE_INDICATORS: &[&str] = &[
    "hosts", "tasks", "handlers", "vars", "roles", "plays", "become", "gather_facts",
    "connection", "ansible_",
];

/// Directory names that mark a path as part of an Ansible project.
const ANSIBLE_DIRS: &[&str] = &["group_vars", "host_vars", "roles", "playbooks", "inventories"];

const ANSIBLE_FILENAMES: &[&str] = &["ansible.cfg", "hosts", "inventory", "site.yml", "site.yaml"];

/// Filename fragments that suggest a file holds secrets.
const SENSITIVE_FILE_MARKERS: &[&str] = &["vault", "secret", "password", "credential", "key"];

/// Module names whose tasks should always set `no_log`.
const SENSITIVE_MODULES: &[&str] = &["user", "mysql_user", "postgresql_user", "uri", "get_url"];

/// HTTP hosts that are fine to fetch over plain HTTP.
const SAFE_HTTP_HOSTS: &[&str] = &["http://localhost", "http://127.0.0.1", "http://example."];

enum PostFilter {
    None,
    /// Skip when the URL in the line points at a local or example host.
    SafeHttpHost,
    /// Skip when the line carries a validate argument.
    HasValidate,
}

struct RuleGroup {
    label: &'static str,
    advice: &'static str,
    filter: PostFilter,
    rules: RuleSet,
}

/// Scanner for Ansible playbooks, inventories, and configuration.
pub struct AnsibleScanner {
    groups: Vec<RuleGroup>,
}

impl AnsibleScanner {
    pub fn new() -> Self {
        Self {
            groups: vec![
                RuleGroup {
                    label: "hardcoded secret",
                    advice: "Store secrets with ansible-vault or reference them through variables.",
                    filter: PostFilter::None,
                    rules: RuleSet::compile("ansible/secrets", HARDCODED_SECRET_RULES),
                },
                RuleGroup {
                    label: "unencrypted variable",
                    advice: "Encrypt sensitive group/host variables with ansible-vault.",
                    filter: PostFilter::None,
                    rules: RuleSet::compile("ansible/vars", UNENCRYPTED_VARS_RULES),
                },
                RuleGroup {
                    label: "shell injection risk",
                    advice: "Quote templated values or use dedicated modules instead of shell.",
                    filter: PostFilter::None,
                    rules: RuleSet::compile("ansible/shell", SHELL_INJECTION_RULES),
                },
                RuleGroup {
                    label: "permissive file mode",
                    advice: "Restrict file modes to the minimum needed.",
                    filter: PostFilter::None,
                    rules: RuleSet::compile("ansible/modes", FILE_PERMISSION_RULES),
                },
                RuleGroup {
                    label: "insecure transport",
                    advice: "Use HTTPS for external resources.",
                    filter: PostFilter::SafeHttpHost,
                    rules: RuleSet::compile("ansible/http", HTTP_USAGE_RULES),
                },
                RuleGroup {
                    label: "unvalidated escalation",
                    advice: "Validate privilege escalation and avoid NOPASSWD:ALL.",
                    filter: PostFilter::HasValidate,
                    rules: RuleSet::compile("ansible/sudo", SUDO_RULES),
                },
                RuleGroup {
                    label: "debug exposure",
                    advice: "Disable debug output before running against production hosts.",
                    filter: PostFilter::None,
                    rules: RuleSet::compile("ansible/debug", DEBUG_EXPOSURE_RULES),
                },
                RuleGroup {
                    label: "weak cryptography",
                    advice: "Use SHA-256 or stronger for hashing and checksums.",
                    filter: PostFilter::None,
                    rules: RuleSet::compile("ansible/crypto", WEAK_CRYPTO_RULES),
                },
                RuleGroup {
                    label: "unsafe privilege configuration",
                    advice: "Review become flags and privilege escalation settings.",
                    filter: PostFilter::None,
                    rules: RuleSet::compile("ansible/privileges", UNSAFE_PRIVILEGE_RULES),
                },
                RuleGroup {
                    label: "inventory credential",
                    advice: "Use SSH keys or vaulted variables instead of inventory passwords.",
                    filter: PostFilter::None,
                    rules: RuleSet::compile("ansible/inventory", INVENTORY_EXPOSURE_RULES),
                },
                RuleGroup {
                    label: "template injection risk",
                    advice: "Avoid filters that disable template auto-escaping.",
                    filter: PostFilter::None,
                    rules: RuleSet::compile("ansible/templates", TEMPLATE_INJECTION_RULES),
                },
            ],
        }
    }

    /// Path-level heuristic: does this look like an Ansible file at all?
    pub fn is_ansible_file(file: &Path) -> bool {
        is_yaml_file(file) || in_ansible_path(file)
    }

    /// Scan a single file's content.
    pub fn scan_source(&self, source: &str, file: &Path, config: &AnsibleConfig) -> Vec<Finding> {
        if !Self::is_ansible_file(file) {
            return Vec::new();
        }

        // Generic YAML that never mentions Ansible concepts is skipped,
        // unless the path itself marks it as part of an Ansible project.
        if is_yaml_file(file) && !in_ansible_path(file) && !looks_like_ansible(source) {
            return Vec::new();
        }

        let mut findings = Vec::new();

        if config.vault_check {
            findings.extend(self.check_vault_encryption(source, file));
        }

        for (idx, line) in source.lines().enumerate() {
            let line_num = idx + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') || line.contains("warden:ignore") {
                continue;
            }

            for group in &self.groups {
                for rule in group.rules.matches(line) {
                    match group.filter {
                        PostFilter::SafeHttpHost if has_safe_http_host(line) => continue,
                        PostFilter::HasValidate if line.to_lowercase().contains("validate") => {
                            continue
                        }
                        _ => {}
                    }

                    findings.push(
                        self.build_finding(
                            format!("Ansible {} detected", group.label),
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

        if is_yaml_file(file) {
            findings.extend(self.analyze_yaml_structure(source, file));
        }

        findings
    }

    /// Files whose names suggest secrets must be vault-encrypted.
    fn check_vault_encryption(&self, source: &str, file: &Path) -> Vec<Finding> {
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if !SENSITIVE_FILE_MARKERS.iter().any(|m| name.contains(m)) {
            return Vec::new();
        }
        if source.starts_with("$ANSIBLE_VAULT") {
            return Vec::new();
        }

        vec![self
            .build_finding(
                "Unencrypted secrets file detected",
                format!(
                    "{} appears to contain secrets but is not vault-encrypted.",
                    file.display(),
                ),
                Severity::High,
                "unencrypted_vault".to_string(),
                file,
                1,
            )
            .with_advice("Encrypt this file with ansible-vault.")]
    }

    /// Structural pass: tasks driving sensitive modules must set `no_log`.
    fn analyze_yaml_structure(&self, source: &str, file: &Path) -> Vec<Finding> {
        let data: serde_yaml::Value = match serde_yaml::from_str(source) {
            Ok(v) => v,
            Err(_) => return Vec::new(),
        };

        let mut findings = Vec::new();
        match &data {
            serde_yaml::Value::Mapping(_) => self.check_tasks(&data, file, &mut findings),
            serde_yaml::Value::Sequence(plays) => {
                for play in plays {
                    self.check_tasks(play, file, &mut findings);
                }
            }
            _ => {}
        }
        findings
    }

    fn check_tasks(&self, play: &serde_yaml::Value, file: &Path, findings: &mut Vec<Finding>) {
        let Some(tasks) = play.get("tasks").and_then(|t| t.as_sequence()) else {
            return;
        };

        for (i, task) in tasks.iter().enumerate() {
            if !task.is_mapping() {
                continue;
            }
            let modules: Vec<&str> = SENSITIVE_MODULES
                .iter()
                .copied()
                .filter(|m| task.get(*m).is_some())
                .collect();
            if modules.is_empty() {
                continue;
            }
            let no_log = task.get("no_log").and_then(|v| v.as_bool()).unwrap_or(false);
            if no_log {
                continue;
            }

            findings.push(
                self.build_finding(
                    "Sensitive task without no_log detected",
                    format!(
                        "Task {} in {} uses {} without no_log; credentials may leak into logs.",
                        i + 1,
                        file.display(),
                        modules.join(", "),
                    ),
                    Severity::Medium,
                    "missing_no_log".to_string(),
                    file,
                    i + 1,
                )
                .with_advice("Set no_log: true on tasks that handle credentials."),
            );
        }
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
            Category::Ansible,
            Provenance::new("ansible", 0.75).with_rule(rule_id.clone()),
        )
        .with_location(CodeLocation::new(file, line))
        .with_tag("ansible")
        .with_tag(rule_id)
    }
}

impl Default for AnsibleScanner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Scanner for AnsibleScanner {
    fn name(&self) -> &str {
        "ansible"
    }

    fn category(&self) -> Category {
        Category::Ansible
    }

    async fn scan(
        &self,
        config: &ScanConfig,
        context: &ScanContext,
    ) -> Result<Vec<Finding>, ScanError> {
        let mut findings = Vec::new();
        for file in &context.files {
            if !Self::is_ansible_file(file) {
                continue;
            }
            match std::fs::read_to_string(file) {
                Ok(source) => findings.extend(self.scan_source(&source, file, &config.ansible)),
                Err(e) => tracing::warn!("failed to read {}: {}", file.display(), e),
            }
        }
        Ok(findings)
    }
}

fn is_yaml_file(file: &Path) -> bool {
    matches!(
        file.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase()),
        Some(ref ext) if ext == "yml" || ext == "yaml"
    )
}

fn in_ansible_path(file: &Path) -> bool {
    if let Some(name) = file.file_name().and_then(|n| n.to_str()) {
        let lower = name.to_ascii_lowercase();
        if ANSIBLE_FILENAMES.iter().any(|f| *f == lower) {
            return true;
        }
    }
    file.components().any(|c| {
        let part = c.as_os_str().to_string_lossy().to_lowercase();
        ANSIBLE_DIRS.iter().any(|d| *d == part)
    })
}

fn looks_like_ansible(source: &str) -> bool {
    let lower = source.to_lowercase();
    ANSIBLE_INDICATORS.iter().any(|ind| lower.contains(ind))
}

fn has_safe_http_host(line: &str) -> bool {
    let lower = line.to_lowercase();
    SAFE_HTTP_HOSTS.iter().any(|h| lower.contains(h))
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
        AnsibleScanner::new().scan_source(source, Path::new(file), &AnsibleConfig::default())
    }

    #[test]
    fn test_detect_hardcoded_password() {
        let findings = scan(
            "- hosts: web\n  vars:\n    password: supersecret123\n",
            "playbook.yml",
        );
        assert!(findings.iter().any(|f| f.severity == Severity::High));
        assert!(findings.iter().all(|f| f.category == Category::Ansible));
    }

    #[test]
    fn test_detect_shell_injection() {
        let findings = scan(
            "- hosts: web\n  tasks:\n    - shell: rm -rf {{ user_input }}\n",
            "playbook.yml",
        );
        assert!(findings
            .iter()
            .any(|f| f.provenance.rule_id.as_deref() == Some("shell_template")));
    }

    #[test]
    fn test_detect_permissive_mode() {
        let findings = scan(
            "- hosts: all\n  tasks:\n    - file:\n        mode: '777'\n",
            "playbook.yml",
        );
        assert!(findings
            .iter()
            .any(|f| f.provenance.rule_id.as_deref() == Some("mode_777")));
    }

    #[test]
    fn test_http_localhost_is_safe() {
        let findings = scan(
            "- hosts: all\n  tasks:\n    - get_url:\n        url: http://localhost:9000/pkg\n        no_log: true\n",
            "playbook.yml",
        );
        assert!(findings
            .iter()
            .all(|f| f.provenance.rule_id.as_deref() != Some("http_url")));
    }

    #[test]
    fn test_http_external_is_flagged() {
        let findings = scan(
            "- hosts: all\n  tasks:\n    - get_url:\n        url: http://mirror.mycorp.io/pkg\n        no_log: true\n",
            "playbook.yml",
        );
        assert!(findings
            .iter()
            .any(|f| f.provenance.rule_id.as_deref() == Some("http_url")));
    }

    #[test]
    fn test_become_with_validate_is_safe() {
        let findings = scan(
            "- hosts: all\n  become: yes # validate sudoers first\n",
            "playbook.yml",
        );
        assert!(findings
            .iter()
            .all(|f| f.provenance.rule_id.as_deref() != Some("become_yes")));
    }

    #[test]
    fn test_vault_check() {
        let findings = scan("db_password: hunter22222\n", "group_vars/vault.yml");
        assert!(findings
            .iter()
            .any(|f| f.provenance.rule_id.as_deref() == Some("unencrypted_vault")));

        let findings = scan(
            "$ANSIBLE_VAULT;1.1;AES256\n6233643139\n",
            "group_vars/vault.yml",
        );
        assert!(findings
            .iter()
            .all(|f| f.provenance.rule_id.as_deref() != Some("unencrypted_vault")));
    }

    #[test]
    fn test_vault_check_can_be_disabled() {
        let config = AnsibleConfig { vault_check: false };
        let findings = AnsibleScanner::new().scan_source(
            "db_password: hunter22222\n",
            Path::new("group_vars/vault.yml"),
            &config,
        );
        assert!(findings
            .iter()
            .all(|f| f.provenance.rule_id.as_deref() != Some("unencrypted_vault")));
    }

    #[test]
    fn test_missing_no_log_on_sensitive_module() {
        let findings = scan(
            "- hosts: db\n  tasks:\n    - mysql_user:\n        name: app\n        password: \"{{ db_pass }}\"\n",
            "playbook.yml",
        );
        assert!(findings
            .iter()
            .any(|f| f.provenance.rule_id.as_deref() == Some("missing_no_log")));
    }

    #[test]
    fn test_no_log_present_is_clean() {
        let findings = scan(
            "- hosts: db\n  tasks:\n    - mysql_user:\n        name: app\n        password: \"{{ db_pass }}\"\n      no_log: true\n",
            "playbook.yml",
        );
        assert!(findings
            .iter()
            .all(|f| f.provenance.rule_id.as_deref() != Some("missing_no_log")));
    }

    #[test]
    fn test_non_ansible_yaml_skipped() {
        // A CI config with none of the Ansible indicator keys
        let findings = scan("stages:\n  - build\n  - deploy\n", "ci.yml");
        assert!(findings.is_empty());
    }

    #[test]
    fn test_inventory_password_flagged() {
        let findings = scan(
            "[web]\nweb1 ansible_host=10.0.0.5 ansible_ssh_pass: hunter2\n",
            "inventory",
        );
        assert!(findings
            .iter()
            .any(|f| f.provenance.rule_id.as_deref() == Some("ansible_ssh_pass")));
    }
}
