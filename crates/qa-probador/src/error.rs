//! Error types for the CLI

use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// `cargo test` could not be run or its output not understood
    #[error("Test execution failed: {message}")]
    TestExecution {
        /// Error message
        message: String,
    },

    /// One or more scenarios failed after all retries
    #[error("{failed} of {total} scenarios failed")]
    ScenariosFailed {
        /// Failed scenarios
        failed: usize,
        /// Scenarios run
        total: usize,
    },

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Suite library error
    #[error("Suite error: {0}")]
    Probe(#[from] qa_probar::ProbeError),

    /// JSON report error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid argument
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Error message
        message: String,
    },
}

impl CliError {
    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a test execution error
    #[must_use]
    pub fn test_execution(message: impl Into<String>) -> Self {
        Self::TestExecution {
            message: message.into(),
        }
    }

    /// Create an invalid argument error
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error() {
        let err = CliError::config("bad config");
        assert_eq!(err.to_string(), "Configuration error: bad config");
    }

    #[test]
    fn test_scenarios_failed() {
        let err = CliError::ScenariosFailed { failed: 2, total: 34 };
        assert_eq!(err.to_string(), "2 of 34 scenarios failed");
    }

    #[test]
    fn test_probe_error_from() {
        let probe = qa_probar::ProbeError::Fixture {
            message: "unknown fixture \"loginPage\"".into(),
        };
        let err: CliError = probe.into();
        assert!(err.to_string().starts_with("Suite error: Fixture error"));
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "cargo not found");
        let cli_err: CliError = io_err.into();
        assert!(cli_err.to_string().contains("I/O"));
    }
}
