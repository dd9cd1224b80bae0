//! Page-object contract and the shared base page.

use crate::config::SuiteConfig;
use crate::page::Page;
use crate::result::ProbeResult;

/// A bundle of locators and flows for one UI section
///
/// Implementations build every locator up front from the page; locators are
/// lazy so construction never touches the browser.
pub trait PageObject: Send + Sync + Sized + 'static {
    /// Fixture name this page object is registered under
    const FIXTURE: &'static str;

    /// Bind the page object to `page`
    fn new(page: &Page, config: &SuiteConfig) -> Self;
}

/// Navigation helpers shared by every suite
#[derive(Debug, Clone)]
pub struct BasePage {
    page: Page,
    config: SuiteConfig,
}

impl PageObject for BasePage {
    const FIXTURE: &'static str = "basePage";

    fn new(page: &Page, config: &SuiteConfig) -> Self {
        Self {
            page: page.clone(),
            config: config.clone(),
        }
    }
}

impl BasePage {
    /// Go to `url`
    pub async fn navigate(&self, url: &str) -> ProbeResult<()> {
        self.page.goto(url).await
    }

    /// Go to the Automation Demo Site
    ///
    /// Fails before touching the browser when `SECONDARY_BASE_URL` is unset.
    pub async fn navigate_to_secondary_app(&self) -> ProbeResult<()> {
        let url = self.config.secondary_url()?;
        self.page.goto(url).await
    }

    /// Whether `selector` is visible right now
    pub async fn is_visible(&self, selector: &str) -> ProbeResult<bool> {
        self.page.locator(selector).is_visible().await
    }
}
