//! qa-probador: command-line runner for the qa-probar scenarios
//!
//! ## Usage
//!
//! ```bash
//! qa-probador list                          # List every scenario
//! qa-probador test --suite playground tc14  # Run matching scenarios
//! qa-probador test --headed --retries 1     # Watch the browser, retry once
//! qa-probador fixtures                      # Print fixture names
//! ```

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

mod commands;
mod config;
mod error;
mod output;
mod runner;

pub use commands::{Cli, ColorArg, Commands, FormatArg, ListArgs, SuiteArg, TestArgs};
pub use config::{default_retries, CliConfig, ColorChoice, Verbosity, CI_RETRIES};
pub use error::{CliError, CliResult};
pub use output::{OutputFormat, ProgressReporter};
pub use runner::{
    extract_failure, list_command, matches_filter, parse_test_list, scenario_command, Attempt,
    Scenario, Suite, TestResult, TestResults, TestRunner, SCENARIO_PACKAGE,
};
