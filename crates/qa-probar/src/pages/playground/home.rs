//! Landing page and the dynamic superhero table.

use crate::assertion::expect;
use crate::config::SuiteConfig;
use crate::locator::Locator;
use crate::page::Page;
use crate::page_object::PageObject;
use crate::result::ProbeResult;

/// QA Playground landing page
#[derive(Debug, Clone)]
pub struct HomePage {
    page: Page,
    pub heading: Locator,
    pub mini_web_apps_link: Locator,
    pub mini_web_apps_heading: Locator,
}

impl PageObject for HomePage {
    const FIXTURE: &'static str = "homePage";

    fn new(page: &Page, _config: &SuiteConfig) -> Self {
        Self {
            page: page.clone(),
            heading: page.locator(r#"//span[text()="QA Playground"]"#),
            mini_web_apps_link: page.locator(r#"//a[text()="Mini Web Apps"]"#),
            mini_web_apps_heading: page.locator(r#"//h2[text()="Mini Web Apps"]"#),
        }
    }
}

impl HomePage {
    /// Go to `url`
    pub async fn navigate(&self, url: &str) -> ProbeResult<()> {
        self.page.goto(url).await
    }

    /// Follow the "Mini Web Apps" link
    pub async fn click_mini_web_apps(&self) -> ProbeResult<()> {
        tracing::info!("open mini web apps");
        self.mini_web_apps_link.click().await
    }

    /// The site logo is showing
    pub async fn verify_heading(&self) -> ProbeResult<()> {
        expect(&self.heading)
            .with_message("QA Playground heading should be visible")
            .to_be_visible()
            .await
    }

    /// The "Mini Web Apps" heading is showing
    pub async fn verify_mini_web_apps_heading(&self) -> ProbeResult<()> {
        expect(&self.mini_web_apps_heading)
            .with_message("Mini Web Apps heading should be visible after clicking the link")
            .to_be_visible()
            .await
    }
}

/// Dynamic Table mini app
#[derive(Debug, Clone)]
pub struct MiniWebAppsPage {
    page: Page,
    pub dynamic_table_heading: Locator,
    pub table_header: Locator,
    /// Rows mentioning Spider-Man
    pub spider_man_row: Locator,
    /// Real-name cell of the Spider-Man row
    pub spider_man_real_name: Locator,
    pub full_courses_link: Locator,
}

impl PageObject for MiniWebAppsPage {
    const FIXTURE: &'static str = "miniWebApps";

    fn new(page: &Page, _config: &SuiteConfig) -> Self {
        let spider_man_row = page.locator("tbody#tbody tr").filter_has_text("Spider-Man");
        Self {
            page: page.clone(),
            dynamic_table_heading: page.locator(r#"//h3[text()="Dynamic Table"]"#),
            table_header: page.locator("text=SUPERHERO"),
            spider_man_real_name: spider_man_row.locator("td").nth(2).locator("span"),
            spider_man_row,
            full_courses_link: page.locator(r#"//a[@aria-label="full courses"]"#),
        }
    }
}

impl MiniWebAppsPage {
    /// Open the Dynamic Table app
    pub async fn click_dynamic_table(&self) -> ProbeResult<()> {
        tracing::info!("open dynamic table");
        self.dynamic_table_heading.click().await
    }

    /// Return to the landing page through the courses link
    pub async fn go_back_to_home_page(&self) -> ProbeResult<()> {
        self.full_courses_link.click().await
    }

    /// Reload; the table reshuffles its rows
    pub async fn reload_table_page(&self) -> ProbeResult<()> {
        self.page.reload().await
    }
}
