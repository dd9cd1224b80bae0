//! Suite configuration from `.env` and the process environment.
//!
//! | Variable                   | Default                      |
//! |----------------------------|------------------------------|
//! | `BASE_URL`                 | `https://qaplayground.dev/`  |
//! | `SECONDARY_BASE_URL`       | none (demo-site flows fail)  |
//! | `HEADLESS`                 | `true`                       |
//! | `CHROME_PATH`              | auto-detect                  |
//! | `QA_NO_SANDBOX`            | `false`                      |
//! | `QA_ACTION_TIMEOUT_MS`     | `30000`                      |
//! | `QA_NAVIGATION_TIMEOUT_MS` | `60000`                      |
//! | `QA_EXPECT_TIMEOUT_MS`     | `5000`                       |
//! | `QA_ARTIFACTS_DIR`         | `target/qa-artifacts`        |
//! | `QA_ASSETS_DIR`            | the crate's `assets/`        |
//! | `CI`                       | unset                        |
//!
//! Empty values count as unset.

use crate::browser::BrowserConfig;
use crate::result::{ProbeError, ProbeResult};
use crate::wait::Timeouts;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default QA Playground address
pub const DEFAULT_BASE_URL: &str = "https://qaplayground.dev/";

/// Default directory for downloads and failure screenshots
pub const DEFAULT_ARTIFACTS_DIR: &str = "target/qa-artifacts";

/// Typed view of the suite's environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteConfig {
    /// QA Playground root
    pub base_url: String,
    /// Automation Demo Site root
    pub secondary_base_url: Option<String>,
    /// Run Chromium without a window
    pub headless: bool,
    /// Explicit Chromium binary
    pub chrome_path: Option<PathBuf>,
    /// Launch Chromium with `--no-sandbox`
    pub no_sandbox: bool,
    /// Wait budgets
    pub timeouts: Timeouts,
    /// Where downloads and screenshots go
    pub artifacts_dir: PathBuf,
    /// Where upload fixtures live
    pub assets_dir: PathBuf,
    /// Running under CI
    pub ci: bool,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            secondary_base_url: None,
            headless: true,
            chrome_path: None,
            no_sandbox: false,
            timeouts: Timeouts::default(),
            artifacts_dir: PathBuf::from(DEFAULT_ARTIFACTS_DIR),
            assets_dir: default_assets_dir(),
            ci: false,
        }
    }
}

fn default_assets_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("assets")
}

impl SuiteConfig {
    /// Load `.env` (when present) and read the process environment
    pub fn from_env() -> ProbeResult<Self> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(file = %path.display(), "loaded .env"),
            Err(e) if e.not_found() => {}
            Err(e) => {
                return Err(ProbeError::Config {
                    message: format!("failed to load .env file: {e}"),
                })
            }
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> ProbeResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let mut timeouts = defaults.timeouts;
        if let Some(ms) = get("QA_ACTION_TIMEOUT_MS") {
            timeouts = timeouts.with_action(parse_ms("QA_ACTION_TIMEOUT_MS", &ms)?);
        }
        if let Some(ms) = get("QA_NAVIGATION_TIMEOUT_MS") {
            timeouts = timeouts.with_navigation(parse_ms("QA_NAVIGATION_TIMEOUT_MS", &ms)?);
        }
        if let Some(ms) = get("QA_EXPECT_TIMEOUT_MS") {
            timeouts = timeouts.with_expect(parse_ms("QA_EXPECT_TIMEOUT_MS", &ms)?);
        }

        Ok(Self {
            base_url: get("BASE_URL").unwrap_or(defaults.base_url),
            secondary_base_url: get("SECONDARY_BASE_URL"),
            headless: get("HEADLESS")
                .map(|v| parse_bool("HEADLESS", &v))
                .transpose()?
                .unwrap_or(defaults.headless),
            chrome_path: get("CHROME_PATH").map(PathBuf::from),
            no_sandbox: get("QA_NO_SANDBOX")
                .map(|v| parse_bool("QA_NO_SANDBOX", &v))
                .transpose()?
                .unwrap_or(false),
            timeouts,
            artifacts_dir: get("QA_ARTIFACTS_DIR").map_or(defaults.artifacts_dir, PathBuf::from),
            assets_dir: get("QA_ASSETS_DIR").map_or(defaults.assets_dir, PathBuf::from),
            ci: get("CI").is_some(),
        })
    }

    /// Override the QA Playground root
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Override the Automation Demo Site root
    #[must_use]
    pub fn with_secondary_base_url(mut self, url: impl Into<String>) -> Self {
        self.secondary_base_url = Some(url.into());
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Replace the wait budgets
    #[must_use]
    pub const fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Set the artifacts directory
    #[must_use]
    pub fn with_artifacts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifacts_dir = dir.into();
        self
    }

    /// The Automation Demo Site root, or the error demo-site flows fail with
    pub fn secondary_url(&self) -> ProbeResult<&str> {
        self.secondary_base_url
            .as_deref()
            .ok_or_else(|| ProbeError::MissingEnv {
                name: "SECONDARY_BASE_URL".to_string(),
                message: "SECONDARY_BASE_URL is not defined in the .env file".to_string(),
            })
    }

    /// Resolve `url` against the base URL unless it is already absolute
    #[must_use]
    pub fn resolve_url(&self, url: &str) -> String {
        resolve_against(&self.base_url, url)
    }

    /// Browser launch settings for this suite
    #[must_use]
    pub fn browser_config(&self) -> BrowserConfig {
        let mut config = BrowserConfig::default()
            .with_headless(self.headless)
            .with_request_timeout_ms(self.timeouts.navigation.as_millis() as u64);
        if let Some(path) = &self.chrome_path {
            config = config.with_chromium_path(path);
        }
        if self.no_sandbox {
            config = config.with_no_sandbox();
        }
        config
    }
}

/// Join a relative URL onto `base`; absolute URLs pass through
#[must_use]
pub fn resolve_against(base: &str, url: &str) -> String {
    let absolute = ["http://", "https://", "about:", "data:", "file://"]
        .iter()
        .any(|scheme| url.starts_with(scheme));
    if absolute || base.is_empty() {
        return url.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        url.trim_start_matches('/')
    )
}

fn parse_ms(name: &str, value: &str) -> ProbeResult<Duration> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| ProbeError::Config {
            message: format!("{name} must be a number of milliseconds, got \"{value}\""),
        })
}

fn parse_bool(name: &str, value: &str) -> ProbeResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ProbeError::Config {
            message: format!("{name} must be true or false, got \"{value}\""),
        }),
    }
}
