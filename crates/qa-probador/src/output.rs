//! Output formatting and progress reporting

use crate::commands::FormatArg;
use console::{style, Style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Output format for test results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON summary on stdout
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => Self::Text,
            FormatArg::Json => Self::Json,
        }
    }
}

/// Progress reporter for scenario runs
///
/// Everything goes to stderr so stdout stays clean for `--format json`.
#[derive(Debug)]
pub struct ProgressReporter {
    term: Term,
    progress_bar: Option<ProgressBar>,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl ProgressReporter {
    /// Create a new progress reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            progress_bar: None,
            use_color,
            quiet,
        }
    }

    /// Start a progress bar for multiple scenarios
    pub fn start_progress(&mut self, total: u64, message: &str) {
        if self.quiet {
            return;
        }

        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb.set_message(message.to_string());
        self.progress_bar = Some(pb);
    }

    /// Increment progress
    pub fn increment(&self, delta: u64) {
        if let Some(ref pb) = self.progress_bar {
            pb.inc(delta);
        }
    }

    /// Update progress message
    pub fn set_message(&self, message: &str) {
        if let Some(ref pb) = self.progress_bar {
            pb.set_message(message.to_string());
        }
    }

    /// Finish progress bar
    pub fn finish(&self) {
        if let Some(ref pb) = self.progress_bar {
            pb.finish_and_clear();
        }
    }

    fn line(&self, message: &str) {
        match self.progress_bar {
            Some(ref pb) if !pb.is_finished() => pb.println(message),
            _ => {
                let _ = self.term.write_line(message);
            }
        }
    }

    fn prefixed(&self, symbol: &str, plain: &str, color: Style) -> String {
        if self.use_color {
            color.bold().apply_to(symbol).to_string()
        } else {
            plain.to_string()
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }
        let prefix = self.prefixed("✓", "PASS", Style::new().green());
        self.line(&format!("{prefix} {message}"));
    }

    /// Print a failure message
    pub fn failure(&self, message: &str) {
        // shown in quiet mode too
        let prefix = self.prefixed("✗", "FAIL", Style::new().red());
        self.line(&format!("{prefix} {message}"));
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.quiet {
            return;
        }
        let prefix = self.prefixed("⚠", "WARN", Style::new().yellow());
        self.line(&format!("{prefix} {message}"));
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.quiet {
            return;
        }
        let prefix = self.prefixed("ℹ", "INFO", Style::new().blue());
        self.line(&format!("{prefix} {message}"));
    }

    /// Print a section header
    pub fn header(&self, title: &str) {
        if self.quiet {
            return;
        }

        let styled = if self.use_color {
            style(title).bold().underlined().to_string()
        } else {
            format!("=== {title} ===")
        };

        self.line("");
        self.line(&styled);
    }

    /// Print the run summary
    pub fn summary(&self, passed: usize, failed: usize, flaky: usize, duration: Duration) {
        if self.quiet && failed == 0 {
            return;
        }
        self.line("");
        self.line(&self.summary_line(passed, failed, flaky, duration));
    }

    /// Summary text, e.g. `PASSED 43 scenarios in 212.40s (43 passed, 0 failed, 1 flaky)`
    #[must_use]
    pub fn summary_line(
        &self,
        passed: usize,
        failed: usize,
        flaky: usize,
        duration: Duration,
    ) -> String {
        let total = passed + failed;
        let duration_secs = duration.as_secs_f64();

        if self.use_color {
            let passed_style = Style::new().green().bold();
            let failed_style = Style::new().red().bold();
            let flaky_style = Style::new().yellow();

            let status = if failed > 0 {
                failed_style.apply_to("FAILED")
            } else {
                passed_style.apply_to("PASSED")
            };

            format!(
                "{} {} scenarios in {:.2}s ({} passed, {} failed, {} flaky)",
                status,
                total,
                duration_secs,
                passed_style.apply_to(passed),
                if failed > 0 {
                    failed_style.apply_to(failed).to_string()
                } else {
                    failed.to_string()
                },
                flaky_style.apply_to(flaky)
            )
        } else {
            let status = if failed > 0 { "FAILED" } else { "PASSED" };
            format!(
                "{status} {total} scenarios in {duration_secs:.2}s ({passed} passed, {failed} failed, {flaky} flaky)"
            )
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod output_format_tests {
        use super::*;

        #[test]
        fn test_default_format() {
            assert_eq!(OutputFormat::default(), OutputFormat::Text);
        }

        #[test]
        fn test_from_arg() {
            assert_eq!(OutputFormat::from(FormatArg::Json), OutputFormat::Json);
            assert_eq!(OutputFormat::from(FormatArg::Text), OutputFormat::Text);
        }
    }

    mod progress_reporter_tests {
        use super::*;

        #[test]
        fn test_new_reporter() {
            let reporter = ProgressReporter::new(true, false);
            assert!(reporter.use_color);
            assert!(!reporter.quiet);
        }

        #[test]
        fn test_quiet_skips_progress_bar() {
            let mut reporter = ProgressReporter::new(false, true);
            reporter.start_progress(34, "Starting...");
            assert!(reporter.progress_bar.is_none());
            reporter.increment(1);
            reporter.finish();
        }

        #[test]
        fn test_plain_summary_line() {
            let reporter = ProgressReporter::new(false, false);
            let line = reporter.summary_line(40, 3, 1, Duration::from_millis(12_500));
            assert_eq!(
                line,
                "FAILED 43 scenarios in 12.50s (40 passed, 3 failed, 1 flaky)"
            );
        }

        #[test]
        fn test_passing_summary_line() {
            let reporter = ProgressReporter::new(false, false);
            let line = reporter.summary_line(9, 0, 0, Duration::from_secs(2));
            assert!(line.starts_with("PASSED 9 scenarios"));
        }

        #[test]
        fn test_messages_do_not_panic() {
            let reporter = ProgressReporter::new(false, false);
            reporter.success("tc01_mini_web_apps_heading");
            reporter.failure("tc02_spider_man_real_name");
            reporter.warning("retrying");
            reporter.info("info");
            reporter.header("Running scenarios");
        }
    }
}
