//! CLI configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Extra attempts per scenario when `CI` is set
pub const CI_RETRIES: u32 = 2;

/// CLI verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Verbosity {
    /// Quiet - minimal output
    Quiet,
    /// Normal - default output
    #[default]
    Normal,
    /// Verbose - extra output
    Verbose,
    /// Debug - maximum output
    Debug,
}

impl Verbosity {
    /// Check if quiet mode
    #[must_use]
    pub const fn is_quiet(self) -> bool {
        matches!(self, Self::Quiet)
    }

    /// Check if verbose or higher
    #[must_use]
    pub const fn is_verbose(self) -> bool {
        matches!(self, Self::Verbose | Self::Debug)
    }

    /// `tracing` filter directive for this level
    #[must_use]
    pub const fn log_directive(self) -> &'static str {
        match self {
            Self::Quiet => "qa_probador=error",
            Self::Normal => "qa_probador=info",
            Self::Verbose => "qa_probador=debug",
            Self::Debug => "qa_probador=trace",
        }
    }
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorChoice {
    /// Always use colors
    Always,
    /// Use colors when output is a terminal
    #[default]
    Auto,
    /// Never use colors
    Never,
}

impl ColorChoice {
    /// Should use colors based on output detection
    #[must_use]
    pub fn should_color(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => console::Term::stderr().features().colors_supported(),
        }
    }
}

/// Retries when none are given on the command line
#[must_use]
pub const fn default_retries(ci: bool) -> u32 {
    if ci {
        CI_RETRIES
    } else {
        0
    }
}

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// Verbosity level
    pub verbosity: Verbosity,
    /// Color output choice
    pub color: ColorChoice,
    /// Extra attempts for a failing scenario
    pub retries: u32,
    /// Fail fast on first error
    pub fail_fast: bool,
    /// Show the browser window
    pub headed: bool,
    /// `BASE_URL` override
    pub base_url: Option<String>,
    /// `SECONDARY_BASE_URL` override
    pub secondary_base_url: Option<String>,
    /// `QA_ARTIFACTS_DIR` override
    pub artifacts_dir: Option<PathBuf>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            verbosity: Verbosity::Normal,
            color: ColorChoice::Auto,
            retries: 0,
            fail_fast: false,
            headed: false,
            base_url: None,
            secondary_base_url: None,
            artifacts_dir: None,
        }
    }
}

impl CliConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set verbosity
    #[must_use]
    pub const fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set color choice
    #[must_use]
    pub const fn with_color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }

    /// Set retries
    #[must_use]
    pub const fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Set fail fast
    #[must_use]
    pub const fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Set headed mode
    #[must_use]
    pub const fn with_headed(mut self, headed: bool) -> Self {
        self.headed = headed;
        self
    }

    /// Override `BASE_URL`
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Override `SECONDARY_BASE_URL`
    #[must_use]
    pub fn with_secondary_base_url(mut self, url: impl Into<String>) -> Self {
        self.secondary_base_url = Some(url.into());
        self
    }

    /// Override the artifacts directory
    #[must_use]
    pub fn with_artifacts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifacts_dir = Some(dir.into());
        self
    }

    /// Environment handed to each scenario process
    ///
    /// Only overrides are listed; anything else comes from the caller's
    /// environment and `.env`.
    #[must_use]
    pub fn scenario_env(&self) -> Vec<(&'static str, String)> {
        let mut env = Vec::new();
        if self.headed {
            env.push(("HEADLESS", "false".to_string()));
        }
        if let Some(url) = &self.base_url {
            env.push(("BASE_URL", url.clone()));
        }
        if let Some(url) = &self.secondary_base_url {
            env.push(("SECONDARY_BASE_URL", url.clone()));
        }
        if let Some(dir) = &self.artifacts_dir {
            env.push(("QA_ARTIFACTS_DIR", dir.display().to_string()));
        }
        env
    }
}
