//! Compiled regex rule tables.
//!
//! Every scanner owns one or more `RuleSet`s built from static definitions.
//! Invalid patterns are skipped with a warning rather than aborting the
//! scanner, so a single bad rule never takes the whole table down.

use crate::finding::Severity;
use regex::{Regex, RegexBuilder};

/// A static rule definition, compiled into a [`Rule`] at scanner startup.
#[derive(Debug, Clone, Copy)]
pub struct RuleDef {
    /// Stable identifier within the scanner's table.
    pub id: &'static str,
    /// Severity assigned to matches.
    pub severity: Severity,
    /// Human-readable description of what the rule flags.
    pub description: &'static str,
    /// Regex source, compiled case-insensitively.
    pub pattern: &'static str,
}

/// A compiled rule.
#[derive(Debug)]
pub struct Rule {
    pub id: String,
    pub severity: Severity,
    pub description: String,
    pub regex: Regex,
}

/// A named collection of compiled rules.
#[derive(Debug)]
pub struct RuleSet {
    name: String,
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Compile a table of rule definitions. Definitions whose regex fails to
    /// compile are dropped with a warning.
    pub fn compile(name: impl Into<String>, defs: &[RuleDef]) -> Self {
        let name = name.into();
        let rules = defs
            .iter()
            .filter_map(|def| {
                match RegexBuilder::new(def.pattern).case_insensitive(true).build() {
                    Ok(regex) => Some(Rule {
                        id: def.id.to_string(),
                        severity: def.severity,
                        description: def.description.to_string(),
                        regex,
                    }),
                    Err(e) => {
                        tracing::warn!("failed to compile rule '{}' in {}: {}", def.id, name, e);
                        None
                    }
                }
            })
            .collect();
        Self { name, rules }
    }

    /// Name of this rule set.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of compiled rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// All compiled rules.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Iterate over the rules whose regex matches the given line.
    pub fn matches<'a>(&'a self, line: &'a str) -> impl Iterator<Item = &'a Rule> {
        self.rules.iter().filter(move |rule| rule.regex.is_match(line))
    }

    /// First rule matching the line, if any.
    pub fn first_match<'a>(&'a self, line: &'a str) -> Option<&'a Rule> {
        self.matches(line).next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFS: &[RuleDef] = &[
        RuleDef {
            id: "debug_true",
            severity: Severity::Medium,
            description: "debug flag enabled",
            pattern: r"debug\s*=\s*true",
        },
        RuleDef {
            id: "broken",
            severity: Severity::Low,
            description: "never compiles",
            pattern: r"([unclosed",
        },
    ];

    #[test]
    fn test_invalid_rule_is_skipped() {
        let set = RuleSet::compile("test", DEFS);
        assert_eq!(set.len(), 1, "broken rule should be dropped");
    }

    #[test]
    fn test_case_insensitive_match() {
        let set = RuleSet::compile("test", DEFS);
        assert!(set.first_match("DEBUG = True").is_some());
        assert!(set.first_match("release = true").is_none());
    }

    #[test]
    fn test_matches_yields_rule_metadata() {
        let set = RuleSet::compile("test", DEFS);
        let rule = set.first_match("debug = true").unwrap();
        assert_eq!(rule.id, "debug_true");
        assert_eq!(rule.severity, Severity::Medium);
    }
}
