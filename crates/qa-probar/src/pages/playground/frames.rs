//! Content in other documents: nested iframes, a self-navigating iframe, and
//! a shadow root.

use crate::assertion::expect;
use crate::config::SuiteConfig;
use crate::locator::{FrameLocator, Locator};
use crate::page::Page;
use crate::page_object::PageObject;
use crate::result::ProbeResult;
use crate::wait::{settle, LoadState};
use std::time::Duration;

/// Button inside an iframe inside an iframe
#[derive(Debug, Clone)]
pub struct NestedIframePage {
    page: Page,
    pub nested_iframe_heading: Locator,
    /// Innermost frame document
    pub inner_frame: FrameLocator,
}

impl PageObject for NestedIframePage {
    const FIXTURE: &'static str = "nestedIframePage";

    fn new(page: &Page, _config: &SuiteConfig) -> Self {
        Self {
            page: page.clone(),
            nested_iframe_heading: page.locator(r#"//h3[text()="Nested Iframe"]"#),
            inner_frame: page.frame_locator("iframe").first().frame_locator("iframe"),
        }
    }
}

impl NestedIframePage {
    pub async fn open_nested_iframe_section(&self) -> ProbeResult<()> {
        self.nested_iframe_heading.click().await?;
        self.page.wait_for_load_state(LoadState::DomContentLoaded).await
    }

    /// Click "Click Me" in the inner frame; returns the confirmation there
    pub async fn click_button_and_get_message(&self) -> ProbeResult<Locator> {
        self.inner_frame
            .locator(r#"//a[text()="Click Me"]"#)
            .click()
            .await?;
        Ok(self.inner_frame.locator(r#"//p[text()="Button Clicked"]"#))
    }
}

const END_MESSAGE_TIMEOUT: Duration = Duration::from_secs(15);

/// Iframe that walks through several documents on its own
#[derive(Debug, Clone)]
pub struct ChangeableIframePage {
    pub header: Locator,
    pub iframe: FrameLocator,
    pub first_iframe_legend: Locator,
    pub second_iframe_legend: Locator,
    pub end_message: Locator,
}

impl PageObject for ChangeableIframePage {
    const FIXTURE: &'static str = "changeableIframePage";

    fn new(page: &Page, _config: &SuiteConfig) -> Self {
        let iframe = page.frame_locator("#frame1");
        Self {
            header: page.locator(r#"//h3[text()="Changeable Iframe"]"#),
            first_iframe_legend: iframe.locator(r#"//legend[text()="First Iframe"]"#),
            second_iframe_legend: iframe.locator(r#"//legend[text()="Second Iframe"]"#),
            end_message: iframe.locator(r#"//div[text()="This is the end of the journey"]"#),
            iframe,
        }
    }
}

impl ChangeableIframePage {
    /// Open the section and follow the frame until its last document
    pub async fn verify_iframe_sequence(&self) -> ProbeResult<()> {
        expect(&self.header)
            .with_message("Changeable Iframe header is not visible")
            .to_be_visible()
            .await?;
        self.header.click().await?;

        expect(&self.first_iframe_legend)
            .with_message("First Iframe legend not visible after section click")
            .to_be_visible()
            .await?;

        expect(&self.end_message)
            .with_message("End message did not appear within the expected time")
            .with_timeout(END_MESSAGE_TIMEOUT)
            .to_be_visible()
            .await
    }
}

/// Boost animation length
pub const BOOST_SETTLE: Duration = Duration::from_millis(6500);

const READ_PERCENT: &str = "(bar) => { const a = bar.getAttribute('percent'); return a ? Number(a) : 0; }";

/// Progress bar web component with a button in its shadow root
#[derive(Debug, Clone)]
pub struct ShadowDomPage {
    page: Page,
    pub progress_bar: Locator,
    pub boost_button: Locator,
    settle_for: Duration,
}

impl PageObject for ShadowDomPage {
    const FIXTURE: &'static str = "shadowDomPage";

    fn new(page: &Page, _config: &SuiteConfig) -> Self {
        let progress_bar = page.locator("progress-bar");
        Self {
            page: page.clone(),
            boost_button: progress_bar.shadow_locator("button.btn-green-outline"),
            progress_bar,
            settle_for: BOOST_SETTLE,
        }
    }
}

impl ShadowDomPage {
    /// Shorten the post-boost pause
    #[must_use]
    pub fn with_settle(mut self, duration: Duration) -> Self {
        self.settle_for = duration;
        self
    }

    pub async fn open_shadow_dom_app(&self) -> ProbeResult<()> {
        self.page.goto("apps/shadow-dom/").await
    }

    /// Press Boost, let the animation finish, and read the `percent` attribute
    pub async fn click_boost_and_get_progress(&self) -> ProbeResult<f64> {
        self.boost_button.click().await?;
        settle(self.settle_for).await;
        let percent: f64 = self.progress_bar.evaluate(READ_PERCENT, ()).await?;
        tracing::info!(percent, "progress after boost");
        Ok(percent)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::driver::MockDriver;
    use crate::pages::test_support::mock_page_object;
    use crate::query::QueryOp;
    use serde_json::json;

    #[tokio::test]
    async fn test_nested_frame_chain() {
        let (nested, driver) = mock_page_object::<NestedIframePage>(MockDriver::new());
        nested.open_nested_iframe_section().await.unwrap();
        let message = nested.click_button_and_get_message().await.unwrap();
        assert_eq!(
            message.description(),
            "iframe >> nth=0 >> internal:control=enter-frame >> iframe >> \
             internal:control=enter-frame >> //p[text()=\"Button Clicked\"]"
        );
        assert!(driver.was_called(
            "query:describe:iframe >> nth=0 >> internal:control=enter-frame >> iframe >> \
             internal:control=enter-frame >> //a[text()=\"Click Me\"]"
        ));
    }

    #[tokio::test]
    async fn test_changeable_iframe_sequence() {
        let (frames, driver) = mock_page_object::<ChangeableIframePage>(MockDriver::new());
        frames.verify_iframe_sequence().await.unwrap();
        assert!(driver.was_called(
            "query:describe:#frame1 >> internal:control=enter-frame >> //div[text()=\"This is the end of the journey\"]"
        ));
    }

    #[tokio::test]
    async fn test_missing_header_fails_with_message() {
        let driver = MockDriver::new().with_responder(|_| Ok(json!({"count": 0})));
        let (frames, driver) = mock_page_object::<ChangeableIframePage>(driver);
        let err = frames.verify_iframe_sequence().await.unwrap_err();
        assert!(err.to_string().contains("Changeable Iframe header is not visible"));
        assert!(!driver.was_called("mouse:pressed"));
    }

    #[tokio::test]
    async fn test_boost_reads_percent() {
        let driver = MockDriver::new().with_responder(|q| match q.op {
            QueryOp::Evaluate { .. } => Ok(json!({"count": 1, "value": 95})),
            _ => Ok(MockDriver::default_reply(q)),
        });
        let (shadow, driver) = mock_page_object::<ShadowDomPage>(driver);
        let shadow = shadow.with_settle(Duration::ZERO);
        shadow.open_shadow_dom_app().await.unwrap();
        assert_eq!(shadow.click_boost_and_get_progress().await.unwrap(), 95.0);
        assert!(driver.was_called("goto:https://qaplayground.dev/apps/shadow-dom/"));
        assert!(driver.was_called(
            "query:describe:progress-bar >> internal:shadow-root >> button.btn-green-outline"
        ));
    }
}
