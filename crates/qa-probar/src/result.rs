//! Result and error types for the suite.

use std::time::Duration;
use thiserror::Error;

/// Result type for suite operations
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Errors raised by the browser layer, page objects and scenarios
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Connection to browser failed or a CDP command was rejected
    #[error("Browser connection error: {message}")]
    Connection {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// A wait exceeded its budget
    #[error("Timed out after {ms}ms waiting for {what}")]
    Timeout {
        /// What was being waited on
        what: String,
        /// Timeout in milliseconds
        ms: u64,
    },

    /// Locator resolved to nothing
    #[error("No element matches {selector}")]
    ElementNotFound {
        /// Selector chain that was resolved
        selector: String,
    },

    /// Action targeted a locator that resolved to several elements
    #[error("Strict mode violation: {selector} resolved to {count} elements")]
    StrictModeViolation {
        /// Selector chain that was resolved
        selector: String,
        /// Number of matches
        count: usize,
    },

    /// JavaScript evaluation failed
    #[error("Script evaluation failed: {message}")]
    Script {
        /// Error message
        message: String,
    },

    /// Input simulation error
    #[error("Input simulation failed: {message}")]
    Input {
        /// Error message
        message: String,
    },

    /// Screenshot capture error
    #[error("Screenshot failed: {message}")]
    Screenshot {
        /// Error message
        message: String,
    },

    /// Assertion failed
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },

    /// Required environment variable is not set
    #[error("{message}")]
    MissingEnv {
        /// Variable name
        name: String,
        /// Error message
        message: String,
    },

    /// Invalid configuration value
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Fixture could not be provided
    #[error("Fixture error: {message}")]
    Fixture {
        /// Error message
        message: String,
    },

    /// JavaScript dialog could not be handled
    #[error("Dialog error: {message}")]
    Dialog {
        /// Error message
        message: String,
    },

    /// Download did not complete
    #[error("Download failed: {message}")]
    Download {
        /// Error message
        message: String,
    },

    /// Unknown navigation menu entry
    #[error("Menu item \"{item}\" not found in locators")]
    UnknownMenuItem {
        /// Requested item
        item: String,
    },

    /// Sorting by drag did not finish within the pass budget
    #[error("Sortable list still unsorted after {passes} passes")]
    SortDidNotConverge {
        /// Passes attempted
        passes: usize,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProbeError {
    /// Build a timeout error from a duration
    #[must_use]
    pub fn timeout(what: impl Into<String>, after: Duration) -> Self {
        Self::Timeout {
            what: what.into(),
            ms: after.as_millis() as u64,
        }
    }

    /// Whether the error is a wait that ran out of time
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
