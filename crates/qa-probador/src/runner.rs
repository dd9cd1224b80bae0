//! Scenario runner
//!
//! Scenarios are `#[ignore]`d integration tests in the `qa-probar` package.
//! The runner lists them with `cargo test -- --list --ignored`, then runs each
//! one in its own `cargo test --exact` process so a crashed browser never takes
//! other scenarios down with it. A failing scenario is re-run up to the
//! configured number of retries.

use crate::commands::SuiteArg;
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::ProgressReporter;
use serde::{Deserialize, Serialize};
use std::process::Command;
use std::time::{Duration, Instant};

/// Package the scenarios live in
pub const SCENARIO_PACKAGE: &str = "qa-probar";

/// One scenario file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Suite {
    /// QA Playground
    Playground,
    /// Automation Demo Site
    DemoSite,
}

impl Suite {
    /// Every suite, in run order
    pub const ALL: [Self; 2] = [Self::Playground, Self::DemoSite];

    /// Integration test target name
    #[must_use]
    pub const fn test_target(self) -> &'static str {
        match self {
            Self::Playground => "qa_playground",
            Self::DemoSite => "automation_demo_site",
        }
    }

    /// Suites selected by `--suite`
    #[must_use]
    pub fn selected(arg: SuiteArg) -> Vec<Self> {
        match arg {
            SuiteArg::All => Self::ALL.to_vec(),
            SuiteArg::Playground => vec![Self::Playground],
            SuiteArg::DemoSite => vec![Self::DemoSite],
        }
    }
}

impl std::fmt::Display for Suite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.test_target())
    }
}

/// A runnable scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// File it lives in
    pub suite: Suite,
    /// Test function name
    pub name: String,
}

impl Scenario {
    /// Create a scenario
    #[must_use]
    pub fn new(suite: Suite, name: impl Into<String>) -> Self {
        Self {
            suite,
            name: name.into(),
        }
    }

    /// `suite::name`
    #[must_use]
    pub fn id(&self) -> String {
        format!("{}::{}", self.suite, self.name)
    }
}

/// Test names from `cargo test -- --list --format terse` output
#[must_use]
pub fn parse_test_list(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .filter_map(|line| line.trim().strip_suffix(": test"))
        .map(str::to_string)
        .collect()
}

/// Case-insensitive substring match; no filter matches everything
#[must_use]
pub fn matches_filter(name: &str, filter: Option<&str>) -> bool {
    filter.map_or(true, |f| name.to_lowercase().contains(&f.to_lowercase()))
}

/// The most useful line explaining why a scenario failed
///
/// Scenarios return `ProbeResult`, so the harness prints `Error: ...`.
/// Panics and build failures are recognized too.
#[must_use]
pub fn extract_failure(output: &str) -> String {
    let lines: Vec<&str> = output.lines().map(str::trim).collect();
    lines
        .iter()
        .find(|l| l.starts_with("Error: "))
        .or_else(|| lines.iter().find(|l| l.contains("panicked at")))
        .or_else(|| lines.iter().find(|l| l.starts_with("error[E") || l.starts_with("error:")))
        .map_or_else(|| "scenario failed".to_string(), |l| (*l).to_string())
}

/// `cargo test` invocation listing the scenarios of `suite`
#[must_use]
pub fn list_command(suite: Suite) -> Command {
    let mut cmd = Command::new("cargo");
    cmd.args(["test", "-p", SCENARIO_PACKAGE, "--test", suite.test_target()])
        .args(["--", "--list", "--format", "terse", "--ignored"]);
    cmd
}

/// `cargo test` invocation running exactly one scenario
#[must_use]
pub fn scenario_command(scenario: &Scenario, config: &CliConfig) -> Command {
    let mut cmd = Command::new("cargo");
    cmd.args([
        "test",
        "-p",
        SCENARIO_PACKAGE,
        "--test",
        scenario.suite.test_target(),
    ])
    .args(["--", "--exact", &scenario.name, "--ignored", "--nocapture"])
    .args(["--test-threads", "1"]);
    for (key, value) in config.scenario_env() {
        cmd.env(key, value);
    }
    cmd
}

/// Outcome of one process run of a scenario
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    /// Whether it passed
    pub passed: bool,
    /// Combined stdout and stderr
    pub output: String,
}

impl Attempt {
    /// A passing attempt
    #[must_use]
    pub fn pass(output: impl Into<String>) -> Self {
        Self {
            passed: true,
            output: output.into(),
        }
    }

    /// A failing attempt
    #[must_use]
    pub fn fail(output: impl Into<String>) -> Self {
        Self {
            passed: false,
            output: output.into(),
        }
    }
}

/// Scenario execution result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    /// The scenario
    pub scenario: Scenario,
    /// Whether the last attempt passed
    pub passed: bool,
    /// Attempts made, retries included
    pub attempts: u32,
    /// Failure line of the last attempt
    pub error: Option<String>,
    /// Time across all attempts
    pub duration: Duration,
    /// Output of the last attempt
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub output: String,
}

impl TestResult {
    /// Passed, but only after a retry
    #[must_use]
    pub const fn is_flaky(&self) -> bool {
        self.passed && self.attempts > 1
    }
}

/// Aggregated test results
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestResults {
    /// Individual test results
    pub results: Vec<TestResult>,
    /// Total duration
    pub duration: Duration,
}

impl TestResults {
    /// Create new empty results
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a test result
    pub fn add(&mut self, result: TestResult) {
        self.results.push(result);
    }

    /// Get number of passed tests
    #[must_use]
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    /// Get number of failed tests
    #[must_use]
    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| !r.passed).count()
    }

    /// Passed after at least one retry
    #[must_use]
    pub fn flaky(&self) -> usize {
        self.results.iter().filter(|r| r.is_flaky()).count()
    }

    /// Get total number of tests
    #[must_use]
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Check if all tests passed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.passed)
    }

    /// Get failed tests
    #[must_use]
    pub fn failures(&self) -> Vec<&TestResult> {
        self.results.iter().filter(|r| !r.passed).collect()
    }

    /// JSON summary, without captured output
    pub fn to_json(&self) -> CliResult<String> {
        let mut summary = self.clone();
        for result in &mut summary.results {
            result.output.clear();
        }
        Ok(serde_json::to_string_pretty(&summary)?)
    }
}

/// Runs scenarios with retries
#[derive(Debug)]
pub struct TestRunner {
    config: CliConfig,
    reporter: ProgressReporter,
}

impl TestRunner {
    /// Create a new test runner
    #[must_use]
    pub fn new(config: CliConfig) -> Self {
        let reporter =
            ProgressReporter::new(config.color.should_color(), config.verbosity.is_quiet());
        Self { config, reporter }
    }

    /// Scenarios of `suites` whose name matches `filter`
    pub fn discover(&self, suites: &[Suite], filter: Option<&str>) -> CliResult<Vec<Scenario>> {
        let mut scenarios = Vec::new();
        for &suite in suites {
            tracing::debug!(%suite, "listing scenarios");
            let output = list_command(suite).output()?;
            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr);
                return Err(CliError::test_execution(format!(
                    "could not list {suite}: {}",
                    extract_failure(&stderr)
                )));
            }
            scenarios.extend(
                parse_test_list(&String::from_utf8_lossy(&output.stdout))
                    .into_iter()
                    .filter(|name| matches_filter(name, filter))
                    .map(|name| Scenario::new(suite, name)),
            );
        }
        Ok(scenarios)
    }

    /// Run `scenarios` through `cargo test`
    pub fn run(&mut self, scenarios: &[Scenario]) -> CliResult<TestResults> {
        let config = self.config.clone();
        self.run_with(scenarios, |scenario| execute(scenario, &config))
    }

    /// Run `scenarios`, using `attempt` for each try
    pub fn run_with<F>(&mut self, scenarios: &[Scenario], mut attempt: F) -> CliResult<TestResults>
    where
        F: FnMut(&Scenario) -> CliResult<Attempt>,
    {
        let start = Instant::now();
        let mut results = TestResults::new();

        if scenarios.is_empty() {
            self.reporter.warning("No scenarios found");
            results.duration = start.elapsed();
            return Ok(results);
        }

        self.reporter.header("Running scenarios");
        self.reporter
            .start_progress(scenarios.len() as u64, "Starting...");

        for scenario in scenarios {
            self.reporter.set_message(&scenario.name);
            let result = self.run_one(scenario, &mut attempt)?;

            if result.passed {
                let note = if result.is_flaky() {
                    format!(" (flaky, {} attempts)", result.attempts)
                } else {
                    String::new()
                };
                self.reporter.success(&format!("{}{note}", scenario.id()));
            } else {
                self.reporter.failure(&format!(
                    "{}: {}",
                    scenario.id(),
                    result.error.as_deref().unwrap_or("unknown error")
                ));
            }

            let stop = !result.passed && self.config.fail_fast;
            results.add(result);
            self.reporter.increment(1);
            if stop {
                tracing::info!("stopping after first failure");
                break;
            }
        }

        self.reporter.finish();
        results.duration = start.elapsed();
        self.reporter.summary(
            results.passed(),
            results.failed(),
            results.flaky(),
            results.duration,
        );
        Ok(results)
    }

    fn run_one<F>(&self, scenario: &Scenario, attempt: &mut F) -> CliResult<TestResult>
    where
        F: FnMut(&Scenario) -> CliResult<Attempt>,
    {
        let start = Instant::now();
        let max_attempts = self.config.retries + 1;
        let mut attempts = 0;
        loop {
            attempts += 1;
            let outcome = attempt(scenario)?;
            tracing::debug!(
                scenario = %scenario.id(),
                attempt = attempts,
                passed = outcome.passed,
                "attempt finished"
            );
            if outcome.passed || attempts == max_attempts {
                return Ok(TestResult {
                    scenario: scenario.clone(),
                    passed: outcome.passed,
                    attempts,
                    error: (!outcome.passed).then(|| extract_failure(&outcome.output)),
                    duration: start.elapsed(),
                    output: outcome.output,
                });
            }
            self.reporter.warning(&format!(
                "{} failed, retrying ({attempts}/{})",
                scenario.id(),
                self.config.retries
            ));
        }
    }

    /// Get the reporter (for testing)
    #[must_use]
    pub const fn reporter(&self) -> &ProgressReporter {
        &self.reporter
    }
}

/// Run one attempt of `scenario` in a `cargo test` process
fn execute(scenario: &Scenario, config: &CliConfig) -> CliResult<Attempt> {
    let output = scenario_command(scenario, config).output()?;
    let combined = format!(
        "{}\n{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    Ok(if output.status.success() {
        Attempt::pass(combined)
    } else {
        Attempt::fail(combined)
    })
}
