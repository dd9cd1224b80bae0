//! Content that arrives over time: a redirect chain and fetched cards.

use crate::config::SuiteConfig;
use crate::locator::Locator;
use crate::page::Page;
use crate::page_object::PageObject;
use crate::result::ProbeResult;
use crate::wait::{settle, ElementState};
use std::time::Duration;

/// Time the redirect chain needs to reach its last page
pub const REDIRECT_SETTLE: Duration = Duration::from_secs(5);

/// Messages shown on each hop, in order
pub const REDIRECT_MESSAGES: [&str; 6] = [
    "Welcome to Second Page",
    "Welcome to Third Page",
    "Welcome to Fourth Page",
    "Welcome to Fifth Page",
    "Welcome to Sixth Page",
    "Welcome to the Last Page",
];

/// Link that bounces through six pages
#[derive(Debug, Clone)]
pub struct RedirectChainPage {
    pub redirect_header: Locator,
    pub redirect_link: Locator,
    /// One per hop, see [`REDIRECT_MESSAGES`]
    pub message_locators: Vec<Locator>,
    pub go_back_button: Locator,
    settle_for: Duration,
}

impl PageObject for RedirectChainPage {
    const FIXTURE: &'static str = "redirectPage";

    fn new(page: &Page, _config: &SuiteConfig) -> Self {
        Self {
            redirect_header: page.locator(r#"//h3[text()="Redirect Chain"]"#),
            redirect_link: page.locator(r#"//a[@id="redirect"]"#),
            message_locators: REDIRECT_MESSAGES
                .iter()
                .map(|text| page.locator(&format!(r#"//p[text()="{text}"]"#)))
                .collect(),
            go_back_button: page.locator(r#"//a[text()="Go Back"]"#),
            settle_for: REDIRECT_SETTLE,
        }
    }
}

impl RedirectChainPage {
    /// Shorten the post-click pause
    #[must_use]
    pub fn with_settle(mut self, duration: Duration) -> Self {
        self.settle_for = duration;
        self
    }

    pub async fn click_header(&self) -> ProbeResult<()> {
        self.redirect_header.click().await
    }

    /// Start the chain and give it time to finish
    pub async fn click_redirect_link(&self) -> ProbeResult<()> {
        self.redirect_link.click().await?;
        settle(self.settle_for).await;
        Ok(())
    }
}

/// Cards filled from a remote API
#[derive(Debug, Clone)]
pub struct FetchingDataPage {
    page: Page,
    pub fetching_data_header: Locator,
}

/// Cards the API returns
pub const EXPECTED_CARD_COUNT: usize = 100;

const CARD: &str = "div.icard";
const CARD_HEADER: &str = "div.header";
const CARD_BODY: &str = "div[data-body]";

impl PageObject for FetchingDataPage {
    const FIXTURE: &'static str = "fetchingDataPage";

    fn new(page: &Page, _config: &SuiteConfig) -> Self {
        Self {
            page: page.clone(),
            fetching_data_header: page.locator(r#"h3:text("Fetching Data")"#),
        }
    }
}

impl FetchingDataPage {
    /// All cards
    #[must_use]
    pub fn cards(&self) -> Locator {
        self.page.locator(CARD)
    }

    /// Header of the card at `index`
    #[must_use]
    pub fn card_header(&self, index: usize) -> Locator {
        self.cards().nth(index as i64).locator(CARD_HEADER)
    }

    /// Body of the card at `index`
    #[must_use]
    pub fn card_body(&self, index: usize) -> Locator {
        self.cards().nth(index as i64).locator(CARD_BODY)
    }

    /// Open the app and wait for the first card to render
    pub async fn click_fetching_data_header(&self) -> ProbeResult<()> {
        self.fetching_data_header.click().await?;
        self.cards().first().wait_for(ElementState::Visible).await
    }

    /// Wait until exactly `count` cards are in the DOM
    pub async fn wait_for_card_count(&self, count: usize) -> ProbeResult<()> {
        let expression = format!("document.querySelectorAll({CARD:?}).length === {count}");
        self.page.wait_for_function(&expression, None).await
    }
}
