//! Suite runner: fixtures, one browser session per test class, results

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::console::Console;
use crate::crud::CrudOperations;
use crate::error::{TestsuiteError, TestsuiteResult};
use crate::management::{self, Operations};
use crate::webdriver::BrowserSession;
use crate::config::SuiteConfig;

/// Everything a test case works with
#[derive(Clone)]
pub struct TestContext {
    pub console: Console,
    pub crud: CrudOperations,
    pub operations: Operations,
    pub config: Arc<SuiteConfig>,
}

pub type CaseFn = fn(TestContext) -> BoxFuture<'static, TestsuiteResult<()>>;
pub type FixtureFn = fn(Operations) -> BoxFuture<'static, TestsuiteResult<()>>;

/// A single test case
#[derive(Clone)]
pub struct TestCase {
    pub name: &'static str,
    pub tags: Vec<&'static str>,
    pub run: CaseFn,
}

impl TestCase {
    pub fn new(name: &'static str, run: CaseFn) -> Self {
        Self {
            name,
            tags: Vec::new(),
            run,
        }
    }

    pub fn tagged(mut self, tag: &'static str) -> Self {
        self.tags.push(tag);
        self
    }
}

/// Test cases sharing fixtures and a browser session.
///
/// `before_all` prepares the management model, `after_all` cleans up and runs
/// even when cases or `before_all` failed.
#[derive(Clone)]
pub struct TestClass {
    pub name: &'static str,
    pub tags: Vec<&'static str>,
    pub before_all: Option<FixtureFn>,
    pub after_all: Option<FixtureFn>,
    pub cases: Vec<TestCase>,
}

impl TestClass {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            tags: Vec::new(),
            before_all: None,
            after_all: None,
            cases: Vec::new(),
        }
    }

    pub fn tagged(mut self, tag: &'static str) -> Self {
        self.tags.push(tag);
        self
    }

    pub fn before_all(mut self, fixture: FixtureFn) -> Self {
        self.before_all = Some(fixture);
        self
    }

    pub fn after_all(mut self, fixture: FixtureFn) -> Self {
        self.after_all = Some(fixture);
        self
    }

    pub fn case(mut self, case: TestCase) -> Self {
        self.cases.push(case);
        self
    }
}

/// Which cases to run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Filter {
    #[default]
    All,
    /// Class or case carries the tag
    Tag(String),
    /// Class name, case name or `class::case`
    Name(String),
}

impl Filter {
    pub fn matches(&self, class: &TestClass, case: &TestCase) -> bool {
        match self {
            Filter::All => true,
            Filter::Tag(tag) => class
                .tags
                .iter()
                .chain(case.tags.iter())
                .any(|t| t == tag),
            Filter::Name(name) => {
                class.name == name
                    || case.name == name
                    || format!("{}::{}", class.name, case.name) == *name
            }
        }
    }
}

/// Result of running a single test case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub class: String,
    pub name: String,
    pub success: bool,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub error: Option<String>,
    pub screenshot: Option<PathBuf>,
}

impl TestResult {
    fn failed(class: &str, name: &str, error: String) -> Self {
        Self {
            class: class.to_string(),
            name: name.to_string(),
            success: false,
            started_at: Utc::now(),
            duration_ms: 0,
            error: Some(error),
            screenshot: None,
        }
    }
}

/// Result of running one test class
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassResult {
    pub name: String,
    pub passed: usize,
    pub failed: usize,
    pub duration_ms: u64,
    pub results: Vec<TestResult>,
}

impl ClassResult {
    pub fn new(name: &str, results: Vec<TestResult>, duration_ms: u64) -> Self {
        let passed = results.iter().filter(|r| r.success).count();
        Self {
            name: name.to_string(),
            passed,
            failed: results.len() - passed,
            duration_ms,
            results,
        }
    }
}

/// Result of running the suite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteResult {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub classes: Vec<ClassResult>,
}

impl SuiteResult {
    pub fn new(classes: Vec<ClassResult>, skipped: usize, started_at: DateTime<Utc>, duration_ms: u64) -> Self {
        let passed = classes.iter().map(|c| c.passed).sum();
        let failed = classes.iter().map(|c| c.failed).sum();
        Self {
            total: passed + failed + skipped,
            passed,
            failed,
            skipped,
            started_at,
            finished_at: Utc::now(),
            duration_ms,
            classes,
        }
    }

    pub fn success(&self) -> bool {
        self.failed == 0
    }
}

/// Runs test classes sequentially against one server
pub struct SuiteRunner {
    config: Arc<SuiteConfig>,
    operations: Operations,
}

impl SuiteRunner {
    /// Runner talking to the configured management endpoint
    pub fn new(config: SuiteConfig) -> TestsuiteResult<Self> {
        let operations = management::connect(&config.management)?;
        Ok(Self::with_operations(config, operations))
    }

    pub fn with_operations(config: SuiteConfig, operations: Operations) -> Self {
        Self {
            config: Arc::new(config),
            operations,
        }
    }

    pub async fn run_all(&self, classes: &[TestClass]) -> TestsuiteResult<SuiteResult> {
        self.run(classes, &Filter::All).await
    }

    pub async fn run_tagged(&self, classes: &[TestClass], tag: &str) -> TestsuiteResult<SuiteResult> {
        self.run(classes, &Filter::Tag(tag.to_string())).await
    }

    pub async fn run_named(&self, classes: &[TestClass], name: &str) -> TestsuiteResult<SuiteResult> {
        let filter = Filter::Name(name.to_string());
        if !classes.iter().any(|class| class.cases.iter().any(|case| filter.matches(class, case))) {
            return Err(TestsuiteError::Config(format!("Test not found: {}", name)));
        }
        self.run(classes, &filter).await
    }

    /// Run every case selected by `filter`
    pub async fn run(&self, classes: &[TestClass], filter: &Filter) -> TestsuiteResult<SuiteResult> {
        let started_at = Utc::now();
        let start = Instant::now();
        let mut class_results = Vec::new();
        let mut skipped = 0;

        let selected: usize = classes
            .iter()
            .map(|class| class.cases.iter().filter(|case| filter.matches(class, case)).count())
            .sum();
        info!("Running {} test(s)...", selected);

        for class in classes {
            let cases: Vec<&TestCase> = class
                .cases
                .iter()
                .filter(|case| filter.matches(class, case))
                .collect();
            skipped += class.cases.len() - cases.len();
            if cases.is_empty() {
                continue;
            }
            class_results.push(self.run_class(class, &cases).await);
        }

        let duration_ms = start.elapsed().as_millis() as u64;
        let result = SuiteResult::new(class_results, skipped, started_at, duration_ms);

        info!("");
        info!(
            "Test Results: {} passed, {} failed, {} skipped ({} ms)",
            result.passed, result.failed, result.skipped, result.duration_ms
        );
        Ok(result)
    }

    /// Run the given cases of one class
    pub async fn run_class(&self, class: &TestClass, cases: &[&TestCase]) -> ClassResult {
        let start = Instant::now();
        info!("{}", class.name);

        let results = match self.prepare(class).await {
            Ok(session) => {
                let results = self.run_cases(class, cases, &session).await;
                if let Err(e) = session.quit().await {
                    warn!("Failed to close browser session of {}: {}", class.name, e);
                }
                results
            }
            Err(e) => {
                error!("✗ {} - setup failed: {}", class.name, e);
                cases
                    .iter()
                    .map(|case| TestResult::failed(class.name, case.name, format!("setup failed: {}", e)))
                    .collect()
            }
        };

        if let Some(after_all) = class.after_all {
            if let Err(e) = after_all(self.operations.clone()).await {
                warn!("Cleanup of {} failed: {}", class.name, e);
            }
        }

        ClassResult::new(class.name, results, start.elapsed().as_millis() as u64)
    }

    async fn prepare(&self, class: &TestClass) -> TestsuiteResult<BrowserSession> {
        if let Some(before_all) = class.before_all {
            debug!("before_all of {}", class.name);
            before_all(self.operations.clone()).await?;
        }
        BrowserSession::connect(&self.config.webdriver).await
    }

    async fn run_cases(&self, class: &TestClass, cases: &[&TestCase], session: &BrowserSession) -> Vec<TestResult> {
        let mut results = Vec::new();
        let console = match Console::new(
            session.driver().clone(),
            &self.config.console_url,
            self.config.timeouts,
        ) {
            Ok(console) => console,
            Err(e) => {
                return cases
                    .iter()
                    .map(|case| TestResult::failed(class.name, case.name, e.to_string()))
                    .collect()
            }
        };
        let context = TestContext {
            crud: CrudOperations::new(console.clone(), self.operations.clone()),
            console,
            operations: self.operations.clone(),
            config: self.config.clone(),
        };

        for case in cases {
            let result = self.run_case(class, case, context.clone()).await;
            if result.success {
                info!("✓ {}::{} ({} ms)", class.name, case.name, result.duration_ms);
            } else {
                error!(
                    "✗ {}::{} - {}",
                    class.name,
                    case.name,
                    result.error.as_deref().unwrap_or("unknown error")
                );
            }
            results.push(result);
        }
        results
    }

    async fn run_case(&self, class: &TestClass, case: &TestCase, context: TestContext) -> TestResult {
        let started_at = Utc::now();
        let start = Instant::now();
        debug!("Running test: {}::{}", class.name, case.name);

        let console = context.console.clone();
        let outcome = (case.run)(context).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        let (error, screenshot) = match outcome {
            Ok(()) => (None, None),
            Err(e) => {
                let path = screenshot_path(&self.config.output_dir, class.name, case.name);
                let screenshot = match console.screenshot(&path).await {
                    Ok(()) => Some(path),
                    Err(screenshot_error) => {
                        warn!("Unable to take screenshot: {}", screenshot_error);
                        None
                    }
                };
                (Some(e.to_string()), screenshot)
            }
        };

        TestResult {
            class: class.name.to_string(),
            name: case.name.to_string(),
            success: error.is_none(),
            started_at,
            duration_ms,
            error,
            screenshot,
        }
    }

    /// Write results to `test-results.json` in the output directory
    pub fn write_results(&self, results: &SuiteResult) -> TestsuiteResult<PathBuf> {
        write_results(&self.config.output_dir, results)
    }
}

pub fn write_results(output_dir: &Path, results: &SuiteResult) -> TestsuiteResult<PathBuf> {
    std::fs::create_dir_all(output_dir)?;

    let path = output_dir.join("test-results.json");
    let json = serde_json::to_string_pretty(results)?;
    std::fs::write(&path, json)?;

    info!("Results written to: {}", path.display());
    Ok(path)
}

fn screenshot_path(output_dir: &Path, class: &str, case: &str) -> PathBuf {
    output_dir
        .join("screenshots")
        .join(format!("{}-{}.png", crate::ids::as_id(class), crate::ids::as_id(case)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;

    fn noop(_: TestContext) -> BoxFuture<'static, TestsuiteResult<()>> {
        async { Ok(()) }.boxed()
    }

    fn class() -> TestClass {
        TestClass::new("ThreadPoolTest")
            .tagged("batch")
            .case(TestCase::new("create", noop))
            .case(TestCase::new("delete", noop).tagged("destructive"))
    }

    fn result(name: &str, success: bool) -> TestResult {
        TestResult {
            class: "ThreadPoolTest".to_string(),
            name: name.to_string(),
            success,
            started_at: Utc::now(),
            duration_ms: 1,
            error: if success { None } else { Some("boom".to_string()) },
            screenshot: None,
        }
    }

    #[test]
    fn test_filter_by_tag() {
        let class = class();
        let filter = Filter::Tag("destructive".to_string());
        assert!(!filter.matches(&class, &class.cases[0]));
        assert!(filter.matches(&class, &class.cases[1]));

        let filter = Filter::Tag("batch".to_string());
        assert!(class.cases.iter().all(|case| filter.matches(&class, case)));
    }

    #[test]
    fn test_filter_by_name() {
        let class = class();
        assert!(Filter::Name("ThreadPoolTest".to_string()).matches(&class, &class.cases[1]));
        assert!(Filter::Name("create".to_string()).matches(&class, &class.cases[0]));
        assert!(!Filter::Name("create".to_string()).matches(&class, &class.cases[1]));
        assert!(Filter::Name("ThreadPoolTest::delete".to_string()).matches(&class, &class.cases[1]));
    }

    #[test]
    fn test_aggregate_results() {
        let class = ClassResult::new("ThreadPoolTest", vec![result("a", true), result("b", false)], 10);
        assert_eq!(class.passed, 1);
        assert_eq!(class.failed, 1);

        let suite = SuiteResult::new(vec![class], 3, Utc::now(), 10);
        assert_eq!(suite.total, 5);
        assert_eq!(suite.passed, 1);
        assert_eq!(suite.failed, 1);
        assert!(!suite.success());
    }

    #[test]
    fn test_write_results() {
        let dir = tempfile::tempdir().unwrap();
        let suite = SuiteResult::new(
            vec![ClassResult::new("ThreadPoolTest", vec![result("a", true)], 1)],
            0,
            Utc::now(),
            1,
        );
        let path = write_results(dir.path(), &suite).unwrap();
        assert_eq!(path, dir.path().join("test-results.json"));

        let written: SuiteResult = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(written.passed, 1);
        assert!(written.success());
    }

    #[test]
    fn test_screenshot_path() {
        assert_eq!(
            screenshot_path(Path::new("out"), "ThreadPoolTest", "create"),
            PathBuf::from("out/screenshots/threadpooltest-create.png")
        );
    }

    #[tokio::test]
    async fn test_run_named_unknown() {
        let client = crate::management::operations::tests::InMemoryClient::default();
        let runner = SuiteRunner::with_operations(SuiteConfig::default(), Operations::new(Arc::new(client)));
        let result = runner.run_named(&[class()], "missing").await;
        assert!(matches!(result, Err(TestsuiteError::Config(_))));
    }

    #[tokio::test]
    async fn test_run_tagged_skips_other_tags() {
        let client = crate::management::operations::tests::InMemoryClient::default();
        let runner = SuiteRunner::with_operations(SuiteConfig::default(), Operations::new(Arc::new(client)));
        let result = runner.run_tagged(&[class()], "infinispan").await.unwrap();
        assert!(result.classes.is_empty());
        assert_eq!(result.skipped, 2);
        assert_eq!(result.passed + result.failed, 0);
    }
}
