//! Scanner plugin interface — trait, registry, and the scan runner.

use crate::config::ScanConfig;
use crate::error::ScanError;
use crate::finding::{Category, Dedup, Finding};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{RwLock, Semaphore};

/// Context provided to scanners during a scan.
#[derive(Debug, Clone)]
pub struct ScanContext {
    /// Workspace root path.
    pub workspace: PathBuf,
    /// Files to scan.
    pub files: Vec<PathBuf>,
}

impl ScanContext {
    pub fn new(workspace: impl Into<PathBuf>) -> Self {
        Self {
            workspace: workspace.into(),
            files: Vec::new(),
        }
    }

    pub fn with_files(mut self, files: Vec<PathBuf>) -> Self {
        self.files = files;
        self
    }
}

/// The core trait implemented by every scanner in the suite.
#[async_trait]
pub trait Scanner: Send + Sync {
    /// Unique name for this scanner, also its CLI subcommand.
    fn name(&self) -> &str;

    /// Category of findings this scanner produces.
    fn category(&self) -> Category;

    /// Run the scan and return findings.
    async fn scan(&self, config: &ScanConfig, context: &ScanContext)
        -> Result<Vec<Finding>, ScanError>;
}

/// Registry for scanner lookup by name.
pub struct ScannerRegistry {
    scanners: RwLock<HashMap<String, Arc<dyn Scanner>>>,
}

impl ScannerRegistry {
    pub fn new() -> Self {
        Self {
            scanners: RwLock::new(HashMap::new()),
        }
    }

    /// Register a scanner under its own name.
    pub async fn register(&self, scanner: Arc<dyn Scanner>) {
        let name = scanner.name().to_string();
        self.scanners.write().await.insert(name, scanner);
    }

    /// Get a scanner by name.
    pub async fn get(&self, name: &str) -> Option<Arc<dyn Scanner>> {
        self.scanners.read().await.get(name).cloned()
    }

    /// List registered scanner names, sorted.
    pub async fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.scanners.read().await.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for ScannerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Result from a single scanner execution.
#[derive(Debug)]
pub struct ScannerExecution {
    pub scanner_name: String,
    pub findings_count: usize,
    pub duration_ms: u64,
    pub error: Option<String>,
}

/// Result of running a set of scanners.
#[derive(Debug)]
pub struct SuiteResult {
    /// Deduplicated findings from all scanners, sorted by severity then path.
    pub findings: Vec<Finding>,
    /// Per-scanner execution records.
    pub executions: Vec<ScannerExecution>,
    /// Total wall time in milliseconds.
    pub duration_ms: u64,
}

/// Runs scanners with a bounded concurrency level.
pub struct ScanRunner {
    registry: Arc<ScannerRegistry>,
    max_concurrent: usize,
}

impl ScanRunner {
    pub fn new(registry: Arc<ScannerRegistry>, max_concurrent: usize) -> Self {
        Self {
            registry,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Run the named scanners against the given context.
    ///
    /// A scanner failure is recorded in its execution result; it does not
    /// abort the other scanners.
    pub async fn run(
        &self,
        scanner_names: &[String],
        config: &ScanConfig,
        context: &ScanContext,
    ) -> SuiteResult {
        let start = std::time::Instant::now();
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut handles = Vec::new();

        for name in scanner_names {
            let registry = self.registry.clone();
            let config = config.clone();
            let context = context.clone();
            let sem = semaphore.clone();
            let name = name.clone();

            handles.push(tokio::spawn(async move {
                let _permit = sem.acquire().await.expect("semaphore closed");
                let scanner_start = std::time::Instant::now();

                let Some(scanner) = registry.get(&name).await else {
                    return (
                        Vec::new(),
                        ScannerExecution {
                            scanner_name: name,
                            findings_count: 0,
                            duration_ms: 0,
                            error: Some("scanner not found".into()),
                        },
                    );
                };

                match scanner.scan(&config, &context).await {
                    Ok(findings) => {
                        let execution = ScannerExecution {
                            scanner_name: name,
                            findings_count: findings.len(),
                            duration_ms: scanner_start.elapsed().as_millis() as u64,
                            error: None,
                        };
                        (findings, execution)
                    }
                    Err(e) => (
                        Vec::new(),
                        ScannerExecution {
                            scanner_name: name,
                            findings_count: 0,
                            duration_ms: scanner_start.elapsed().as_millis() as u64,
                            error: Some(e.to_string()),
                        },
                    ),
                }
            }));
        }

        let mut all_findings = Vec::new();
        let mut executions = Vec::new();
        for handle in handles {
            if let Ok((findings, execution)) = handle.await {
                all_findings.extend(findings);
                executions.push(execution);
            }
        }

        let mut dedup = Dedup::new();
        let mut findings = dedup.deduplicate(all_findings);
        findings.sort_by(|a, b| {
            b.severity.cmp(&a.severity).then_with(|| {
                let pa = a.location.as_ref().map(|l| (l.file.clone(), l.line));
                let pb = b.location.as_ref().map(|l| (l.file.clone(), l.line));
                pa.cmp(&pb)
            })
        });

        SuiteResult {
            findings,
            executions,
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finding::{Provenance, Severity};

    struct StubScanner {
        name: String,
        fail: bool,
    }

    #[async_trait]
    impl Scanner for StubScanner {
        fn name(&self) -> &str {
            &self.name
        }
        fn category(&self) -> Category {
            Category::Credential
        }
        async fn scan(
            &self,
            _config: &ScanConfig,
            _context: &ScanContext,
        ) -> Result<Vec<Finding>, ScanError> {
            if self.fail {
                return Err(ScanError::ScannerFailed {
                    scanner: self.name.clone(),
                    message: "boom".into(),
                });
            }
            Ok(vec![Finding::new(
                "stub finding",
                "desc",
                Severity::Medium,
                Category::Credential,
                Provenance::new(&self.name, 0.9),
            )])
        }
    }

    #[tokio::test]
    async fn test_registry_register_and_get() {
        let registry = ScannerRegistry::new();
        registry
            .register(Arc::new(StubScanner {
                name: "stub".into(),
                fail: false,
            }))
            .await;

        assert!(registry.get("stub").await.is_some());
        assert!(registry.get("missing").await.is_none());
        assert_eq!(registry.list().await, vec!["stub".to_string()]);
    }

    #[tokio::test]
    async fn test_runner_collects_findings_and_failures() {
        let registry = Arc::new(ScannerRegistry::new());
        registry
            .register(Arc::new(StubScanner {
                name: "good".into(),
                fail: false,
            }))
            .await;
        registry
            .register(Arc::new(StubScanner {
                name: "bad".into(),
                fail: true,
            }))
            .await;

        let runner = ScanRunner::new(registry, 2);
        let config = ScanConfig::default();
        let context = ScanContext::new(".");
        let result = runner
            .run(&["good".into(), "bad".into()], &config, &context)
            .await;

        assert_eq!(result.findings.len(), 1);
        assert_eq!(result.executions.len(), 2);
        let bad = result
            .executions
            .iter()
            .find(|e| e.scanner_name == "bad")
            .unwrap();
        assert!(bad.error.is_some());
    }

    #[tokio::test]
    async fn test_runner_unknown_scanner_recorded() {
        let registry = Arc::new(ScannerRegistry::new());
        let runner = ScanRunner::new(registry, 1);
        let result = runner
            .run(
                &["ghost".into()],
                &ScanConfig::default(),
                &ScanContext::new("."),
            )
            .await;

        assert!(result.findings.is_empty());
        assert_eq!(result.executions[0].error.as_deref(), Some("scanner not found"));
    }
}
