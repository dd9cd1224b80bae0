//! Per-test lifecycle: logging, browser, page, fixtures, failure artifacts.
//!
//! A scenario builds a [`TestContext`] (which launches Chromium and performs
//! the suite's before-each navigation), runs its body, and hands the outcome
//! to [`TestContext::finish`]. A failed outcome leaves a screenshot under the
//! artifacts directory before the browser is closed.

use crate::config::SuiteConfig;
use crate::driver::PageDriver;
use crate::fixture::Fixtures;
use crate::page::Page;
use crate::result::{ProbeError, ProbeResult};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Once};
use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber once per process
///
/// Honors `RUST_LOG` (default `info`). Set `QA_LOG_FORMAT=json` for one JSON
/// object per event.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let json = std::env::var("QA_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
        let installed = if json {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .with_test_writer()
                .try_init()
        } else {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_test_writer()
                .try_init()
        };
        // Another subscriber (e.g. the CLI's) may already be installed
        let _ = installed;
    });
}

/// File-name-safe form of a test name
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}

/// Where the failure screenshot of `test_name` taken at `at` goes
#[must_use]
pub fn failure_screenshot_path(artifacts_dir: &Path, test_name: &str, at: DateTime<Local>) -> PathBuf {
    artifacts_dir.join("screenshots").join(format!(
        "{}-{}.png",
        slugify(test_name),
        at.format("%Y%m%d-%H%M%S")
    ))
}

/// Everything one scenario runs against
pub struct TestContext {
    name: String,
    fixtures: Fixtures,
    #[cfg(feature = "browser")]
    browser: Option<crate::browser::Browser>,
}

impl std::fmt::Debug for TestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestContext")
            .field("name", &self.name)
            .field("fixtures", &self.fixtures)
            .finish_non_exhaustive()
    }
}

impl TestContext {
    /// Context over an existing driver; nothing is launched or closed
    #[must_use]
    pub fn with_driver(name: impl Into<String>, driver: Arc<dyn PageDriver>, config: SuiteConfig) -> Self {
        let page = Page::new(driver, config.timeouts, config.base_url.clone());
        Self {
            name: name.into(),
            fixtures: Fixtures::new(page, config),
            #[cfg(feature = "browser")]
            browser: None,
        }
    }

    /// Launch Chromium for `config` and open a blank page
    #[cfg(feature = "browser")]
    pub async fn launch(name: impl Into<String>, config: SuiteConfig) -> ProbeResult<Self> {
        init_tracing();
        let name = name.into();
        tracing::info!(test = %name, headless = config.headless, "launching browser");
        let browser = crate::browser::Browser::launch(config.browser_config()).await?;
        let driver: Arc<dyn PageDriver> = match browser.new_page().await {
            Ok(driver) => driver,
            Err(e) => {
                let _ = browser.close().await;
                return Err(e);
            }
        };
        let mut context = Self::with_driver(name, driver, config);
        context.browser = Some(browser);
        Ok(context)
    }

    /// QA Playground scenario: launch, then open `BASE_URL`
    #[cfg(feature = "browser")]
    pub async fn playground(name: impl Into<String>) -> ProbeResult<Self> {
        let config = SuiteConfig::from_env()?;
        let context = Self::launch(name, config).await?;
        let base_url = context.config().base_url.clone();
        let navigated = context.fixtures.base_page().navigate(&base_url).await;
        context.after_setup(navigated).await
    }

    /// Automation Demo Site scenario: launch, then open `SECONDARY_BASE_URL`
    ///
    /// Fails before launching when the variable is unset.
    #[cfg(feature = "browser")]
    pub async fn demo_site(name: impl Into<String>) -> ProbeResult<Self> {
        let config = SuiteConfig::from_env()?;
        config.secondary_url()?;
        let context = Self::launch(name, config).await?;
        let navigated = context.fixtures.base_page().navigate_to_secondary_app().await;
        context.after_setup(navigated).await
    }

    #[cfg(feature = "browser")]
    async fn after_setup(self, step: ProbeResult<()>) -> ProbeResult<Self> {
        match step {
            Ok(()) => Ok(self),
            Err(e) => {
                self.fail_with(&e).await;
                Err(e)
            }
        }
    }

    /// Scenario name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The scenario's page
    #[must_use]
    pub const fn page(&self) -> &Page {
        self.fixtures.page()
    }

    /// Page objects bound to the scenario's page
    #[must_use]
    pub const fn fixtures(&self) -> &Fixtures {
        &self.fixtures
    }

    /// Suite configuration
    #[must_use]
    pub const fn config(&self) -> &SuiteConfig {
        self.fixtures.config()
    }

    /// Screenshot the page into the artifacts directory
    pub async fn capture_failure(&self) -> ProbeResult<PathBuf> {
        let path = failure_screenshot_path(&self.config().artifacts_dir, &self.name, Local::now());
        let png = self.page().screenshot().await?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, png).await?;
        Ok(path)
    }

    /// Close the browser (if this context launched one) and return `outcome`
    ///
    /// A failed outcome is screenshotted first. A passing outcome reports
    /// teardown errors.
    pub async fn finish(self, outcome: ProbeResult<()>) -> ProbeResult<()> {
        match outcome {
            Ok(()) => {
                tracing::info!(test = %self.name, "scenario passed");
                self.teardown().await
            }
            Err(e) => {
                self.fail_with(&e).await;
                Err(e)
            }
        }
    }

    async fn fail_with(self, error: &ProbeError) {
        tracing::error!(test = %self.name, %error, "scenario failed");
        match self.capture_failure().await {
            Ok(path) => tracing::info!(file = %path.display(), "failure screenshot saved"),
            Err(e) => tracing::warn!(error = %e, "failure screenshot not captured"),
        }
        if let Err(e) = self.teardown().await {
            tracing::warn!(error = %e, "teardown failed");
        }
    }

    #[cfg(feature = "browser")]
    async fn teardown(self) -> ProbeResult<()> {
        match self.browser {
            Some(browser) => browser.close().await,
            None => Ok(()),
        }
    }

    #[cfg(not(feature = "browser"))]
    #[allow(clippy::unused_async)]
    async fn teardown(self) -> ProbeResult<()> {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::driver::MockDriver;
    use chrono::TimeZone;

    mod artifact_name_tests {
        use super::*;

        #[test]
        fn test_slugify() {
            assert_eq!(
                slugify("TC05: Verify Spider-Man's real name"),
                "tc05-verify-spider-man-s-real-name"
            );
            assert_eq!(slugify("--already--"), "already");
        }

        #[test]
        fn test_screenshot_path() {
            let at = Local.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap();
            let path = failure_screenshot_path(Path::new("target/qa-artifacts"), "TC01 home", at);
            assert_eq!(
                path,
                Path::new("target/qa-artifacts/screenshots/tc01-home-20260314-092653.png")
            );
        }
    }

    mod context_tests {
        use super::*;

        fn context(dir: &Path) -> (TestContext, Arc<MockDriver>) {
            let driver = Arc::new(MockDriver::new());
            let config = SuiteConfig::default().with_artifacts_dir(dir);
            (
                TestContext::with_driver("TC02 dynamic table", driver.clone(), config),
                driver,
            )
        }

        #[tokio::test]
        async fn test_failure_leaves_screenshot() {
            let dir = tempfile::tempdir().unwrap();
            let (ctx, driver) = context(dir.path());
            let err = ctx
                .finish(Err(ProbeError::AssertionFailed {
                    message: "real name mismatch".into(),
                }))
                .await
                .unwrap_err();
            assert!(matches!(err, ProbeError::AssertionFailed { .. }));
            assert!(driver.was_called("screenshot"));
            let shots: Vec<_> = std::fs::read_dir(dir.path().join("screenshots"))
                .unwrap()
                .collect();
            assert_eq!(shots.len(), 1);
        }

        #[tokio::test]
        async fn test_pass_takes_no_screenshot() {
            let dir = tempfile::tempdir().unwrap();
            let (ctx, driver) = context(dir.path());
            let _home = ctx.fixtures().home_page();
            ctx.finish(Ok(())).await.unwrap();
            assert!(!driver.was_called("screenshot"));
            assert!(!dir.path().join("screenshots").exists());
        }
    }
}
