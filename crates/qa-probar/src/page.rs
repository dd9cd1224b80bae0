//! The active browser tab as seen by page objects.
//!
//! A [`Page`] pairs a [`PageDriver`] with the suite's timeouts and base URL.
//! It is cheap to clone; every clone drives the same tab.

use crate::dialog::{DialogAction, PendingDialog};
use crate::driver::PageDriver;
use crate::file_ops::Download;
use crate::locator::{FrameLocator, Locator};
use crate::config::resolve_against;
use crate::result::{ProbeError, ProbeResult};
use crate::wait::{poll_until, settle, LoadState, Timeouts};
use serde::de::DeserializeOwned;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Handle to one browser tab
#[derive(Clone)]
pub struct Page {
    driver: Arc<dyn PageDriver>,
    timeouts: Timeouts,
    base_url: String,
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("driver", &self.driver)
            .field("timeouts", &self.timeouts)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Page {
    /// Wrap a driver
    #[must_use]
    pub fn new(driver: Arc<dyn PageDriver>, timeouts: Timeouts, base_url: impl Into<String>) -> Self {
        Self {
            driver,
            timeouts,
            base_url: base_url.into(),
        }
    }

    /// Underlying driver
    #[must_use]
    pub fn driver(&self) -> &Arc<dyn PageDriver> {
        &self.driver
    }

    /// Wait budgets for this page
    #[must_use]
    pub const fn timeouts(&self) -> Timeouts {
        self.timeouts
    }

    /// Base URL relative navigations resolve against
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn with_driver(&self, driver: Arc<dyn PageDriver>) -> Self {
        Self {
            driver,
            timeouts: self.timeouts,
            base_url: self.base_url.clone(),
        }
    }

    // ------------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------------

    /// Navigate to `url` (relative URLs resolve against the base URL)
    pub async fn goto(&self, url: &str) -> ProbeResult<()> {
        let target = resolve_against(&self.base_url, url);
        tracing::info!(url = %target, "navigate");
        let budget = self.timeouts.navigation;
        tokio::time::timeout(budget, self.driver.goto(&target))
            .await
            .map_err(|_| ProbeError::timeout(format!("navigation to {target}"), budget))?
    }

    /// Reload the current document
    pub async fn reload(&self) -> ProbeResult<()> {
        tracing::info!("reload");
        let budget = self.timeouts.navigation;
        tokio::time::timeout(budget, self.driver.reload())
            .await
            .map_err(|_| ProbeError::timeout("reload", budget))?
    }

    /// Go back one history entry
    pub async fn go_back(&self) -> ProbeResult<()> {
        let budget = self.timeouts.navigation;
        tokio::time::timeout(budget, self.driver.go_back())
            .await
            .map_err(|_| ProbeError::timeout("history back", budget))?
    }

    /// Current URL
    pub async fn url(&self) -> ProbeResult<String> {
        self.driver.current_url().await
    }

    // ------------------------------------------------------------------------
    // Locators
    // ------------------------------------------------------------------------

    /// Lazy locator for `selector`
    #[must_use]
    pub fn locator(&self, selector: &str) -> Locator {
        Locator::new(self.driver.clone(), selector, self.timeouts)
    }

    /// Scope into the iframe(s) matching `selector`
    #[must_use]
    pub fn frame_locator(&self, selector: &str) -> FrameLocator {
        FrameLocator::new(self.driver.clone(), selector, self.timeouts)
    }

    // ------------------------------------------------------------------------
    // Script and waits
    // ------------------------------------------------------------------------

    /// Evaluate `expression` and deserialize the result
    pub async fn evaluate<T: DeserializeOwned>(&self, expression: &str) -> ProbeResult<T> {
        let value = self.driver.evaluate(expression).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Poll `expression` until it is truthy
    pub async fn wait_for_function(&self, expression: &str, timeout: Option<Duration>) -> ProbeResult<()> {
        let budget = timeout.unwrap_or(self.timeouts.action);
        let driver = &self.driver;
        poll_until(
            &format!("function `{expression}`"),
            budget,
            self.timeouts.poll_interval,
            move || async move {
                let value = driver.evaluate(expression).await?;
                Ok(is_truthy(&value).then_some(()))
            },
        )
        .await
    }

    /// Wait until the document reaches `state`
    pub async fn wait_for_load_state(&self, state: LoadState) -> ProbeResult<()> {
        let driver = &self.driver;
        poll_until(
            &format!("load state {state}"),
            self.timeouts.navigation,
            self.timeouts.poll_interval,
            move || async move {
                let ready = driver.evaluate(state.ready_expression()).await?;
                Ok(is_truthy(&ready).then_some(()))
            },
        )
        .await
    }

    /// Fixed sleep
    pub async fn wait_for_timeout(&self, duration: Duration) {
        settle(duration).await;
    }

    // ------------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------------

    /// Run `trigger` and return the page it opens
    ///
    /// The returned page has reached `DOMContentLoaded`.
    pub async fn wait_for_popup<Fut>(&self, trigger: Fut) -> ProbeResult<Self>
    where
        Fut: Future<Output = ProbeResult<()>>,
    {
        let pending = self.driver.expect_popup().await?;
        trigger.await?;
        let budget = self.timeouts.navigation;
        let driver = tokio::time::timeout(budget, pending)
            .await
            .map_err(|_| ProbeError::timeout("a new page", budget))??;
        let popup = self.with_driver(driver);
        popup.wait_for_load_state(LoadState::DomContentLoaded).await?;
        tracing::info!(url = %popup.url().await.unwrap_or_default(), "popup opened");
        Ok(popup)
    }

    /// Run `trigger` and wait for this page to close
    ///
    /// A trigger that closes its own page often cannot complete its last
    /// command, so trigger errors are ignored once the close is observed.
    pub async fn wait_for_close<Fut>(&self, trigger: Fut) -> ProbeResult<()>
    where
        Fut: Future<Output = ProbeResult<()>>,
    {
        let pending = self.driver.expect_close().await?;
        let budget = self.timeouts.navigation;
        let closed = tokio::time::timeout(budget, pending);
        tokio::pin!(closed);
        tokio::pin!(trigger);
        let outcome = tokio::select! {
            closed = &mut closed => closed,
            triggered = &mut trigger => {
                if let Err(e) = triggered {
                    tracing::debug!(error = %e, "close trigger failed, still waiting for close");
                }
                (&mut closed).await
            }
        };
        outcome.map_err(|_| ProbeError::timeout("page to close", budget))??;
        tracing::info!("page closed");
        Ok(())
    }

    /// Run `trigger` and return the download it starts
    pub async fn wait_for_download<Fut>(&self, trigger: Fut) -> ProbeResult<Download>
    where
        Fut: Future<Output = ProbeResult<()>>,
    {
        let pending = self.driver.expect_download().await?;
        trigger.await?;
        let budget = self.timeouts.navigation;
        let download = tokio::time::timeout(budget, pending)
            .await
            .map_err(|_| ProbeError::timeout("a download", budget))??;
        tracing::info!(file = download.suggested_filename(), "download finished");
        Ok(download)
    }

    /// Answer the next JavaScript dialog with `action`
    ///
    /// Call before the action that opens the dialog.
    pub async fn once_dialog(&self, action: DialogAction) -> ProbeResult<PendingDialog> {
        let handled = self.driver.handle_next_dialog(action).await?;
        Ok(PendingDialog::new(handled))
    }

    // ------------------------------------------------------------------------
    // Tab
    // ------------------------------------------------------------------------

    /// PNG of the viewport
    pub async fn screenshot(&self) -> ProbeResult<Vec<u8>> {
        self.driver.screenshot().await
    }

    /// Activate this tab
    pub async fn bring_to_front(&self) -> ProbeResult<()> {
        self.driver.bring_to_front().await
    }

    /// Close this tab
    pub async fn close(&self) -> ProbeResult<()> {
        self.driver.close().await
    }
}

/// JavaScript truthiness of a JSON value
pub(crate) fn is_truthy(value: &serde_json::Value) -> bool {
    use serde_json::Value;
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::driver::MockDriver;
    use serde_json::json;

    fn page_with(driver: MockDriver) -> (Page, Arc<MockDriver>) {
        let driver = Arc::new(driver);
        let page = Page::new(driver.clone(), Timeouts::default(), "https://qaplayground.dev/");
        (page, driver)
    }

    mod navigation_tests {
        use super::*;

        #[tokio::test]
        async fn test_relative_goto_uses_base_url() {
            let (page, driver) = page_with(MockDriver::new());
            page.goto("apps/shadow-dom/").await.unwrap();
            assert!(driver.was_called("goto:https://qaplayground.dev/apps/shadow-dom/"));
            assert_eq!(
                page.url().await.unwrap(),
                "https://qaplayground.dev/apps/shadow-dom/"
            );
        }

        #[tokio::test]
        async fn test_reload_and_back() {
            let (page, driver) = page_with(MockDriver::new());
            page.reload().await.unwrap();
            page.go_back().await.unwrap();
            assert_eq!(driver.calls(), vec!["reload", "go_back"]);
        }
    }

    mod wait_tests {
        use super::*;

        #[tokio::test]
        async fn test_wait_for_function_polls_until_truthy() {
            let (page, driver) = page_with(
                MockDriver::new()
                    .with_eval_result(json!(0))
                    .with_eval_result(json!(null))
                    .with_eval_result(json!(100)),
            );
            let page = Page::new(
                page.driver().clone(),
                Timeouts::default().with_poll_interval(Duration::from_millis(1)),
                "",
            );
            page.wait_for_function("document.querySelectorAll('div.icard').length === 100", None)
                .await
                .unwrap();
            assert_eq!(driver.count_calls("evaluate"), 3);
        }

        #[tokio::test]
        async fn test_evaluate_deserializes() {
            let (page, _) = page_with(MockDriver::new().with_eval_result(json!(95)));
            let percent: u32 = page.evaluate("1").await.unwrap();
            assert_eq!(percent, 95);
        }

        #[test]
        fn test_truthiness() {
            assert!(!is_truthy(&json!(null)));
            assert!(!is_truthy(&json!("")));
            assert!(!is_truthy(&json!(0)));
            assert!(is_truthy(&json!([])));
            assert!(is_truthy(&json!("complete")));
        }
    }

    mod event_tests {
        use super::*;
        use crate::driver::PageDriver;

        #[tokio::test]
        async fn test_popup_inherits_settings() {
            let popup = Arc::new(MockDriver::new().with_url("https://qaplayground.dev/apps/new-tab/new-page"));
            let (page, driver) = page_with(MockDriver::new().with_popup(popup));
            let opened = page
                .wait_for_popup(async { driver.insert_text("click").await })
                .await
                .unwrap();
            assert_eq!(opened.base_url(), "https://qaplayground.dev/");
            assert!(opened.url().await.unwrap().ends_with("new-page"));
            let calls = driver.calls();
            assert_eq!(calls[0], "expect_popup");
            assert_eq!(calls[1], "insert_text:click");
        }

        #[tokio::test]
        async fn test_close_tolerates_failed_trigger() {
            let (page, _) = page_with(MockDriver::new());
            page.wait_for_close(async {
                Err(ProbeError::Connection {
                    message: "target closed".into(),
                })
            })
            .await
            .unwrap();
        }

        #[tokio::test]
        async fn test_download_propagates_trigger_error() {
            let (page, _) = page_with(MockDriver::new().with_download(Download::new("u", "f", "/tmp/f")));
            let err = page
                .wait_for_download(async {
                    Err(ProbeError::Input {
                        message: "click failed".into(),
                    })
                })
                .await
                .unwrap_err();
            assert!(matches!(err, ProbeError::Input { .. }));
        }

        #[tokio::test]
        async fn test_dialog_is_armed_before_trigger() {
            let (page, driver) = page_with(MockDriver::new().with_dialog_message("Press a Button !"));
            let pending = page.once_dialog(DialogAction::Dismiss).await.unwrap();
            driver.insert_text("trigger").await.unwrap();
            let dialog = pending.handled(Duration::from_secs(1)).await.unwrap();
            assert_eq!(dialog.message(), "Press a Button !");
            assert_eq!(driver.calls()[0], "dialog:dismiss");
        }
    }
}
