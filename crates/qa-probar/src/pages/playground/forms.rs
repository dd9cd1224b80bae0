//! Input-driven mini apps: verification code, tags box, budget tracker.

use crate::config::SuiteConfig;
use crate::locator::Locator;
use crate::page::Page;
use crate::page_object::PageObject;
use crate::result::ProbeResult;
use crate::text::parse_currency;
use crate::wait::LoadState;
use std::fmt;

// ============================================================================
// Verify Your Account
// ============================================================================

/// Six-box confirmation code form
#[derive(Debug, Clone)]
pub struct VerifyAccountPage {
    page: Page,
    pub verify_account_link: Locator,
    pub code_inputs: Locator,
    pub success_message: Locator,
}

impl PageObject for VerifyAccountPage {
    const FIXTURE: &'static str = "verifyAccountPage";

    fn new(page: &Page, _config: &SuiteConfig) -> Self {
        Self {
            page: page.clone(),
            verify_account_link: page.locator(r#"//h3[text()="Verify Your Account"]"#),
            code_inputs: page.locator(".code"),
            success_message: page.locator(r#"//small[@class="info success"]"#),
        }
    }
}

impl VerifyAccountPage {
    /// Open the app from the landing page
    pub async fn open_verify_account_page(&self) -> ProbeResult<()> {
        self.verify_account_link.click().await?;
        self.page.wait_for_load_state(LoadState::DomContentLoaded).await
    }

    /// Type `value` into every code box
    pub async fn fill_code_inputs(&self, value: &str) -> ProbeResult<()> {
        let count = self.code_inputs.count().await?;
        for i in 0..count {
            self.code_inputs.nth(i as i64).fill(value).await?;
        }
        Ok(())
    }

    /// Submit from the last code box
    pub async fn press_enter_on_last_input(&self) -> ProbeResult<()> {
        if self.code_inputs.count().await? > 0 {
            self.code_inputs.last().press("Enter").await?;
        }
        Ok(())
    }

    /// Open the app, fill every box with `value` and submit
    pub async fn fill_and_submit_code(&self, value: &str) -> ProbeResult<()> {
        tracing::info!(code = value, "submit verification code");
        self.open_verify_account_page().await?;
        self.fill_code_inputs(value).await?;
        self.press_enter_on_last_input().await
    }
}

// ============================================================================
// Tags Input Box
// ============================================================================

/// Tag entry box with a ten-tag budget
#[derive(Debug, Clone)]
pub struct TagsInputBoxPage {
    page: Page,
    pub tags_link: Locator,
    pub input_field: Locator,
    pub tags: Locator,
    /// "N tags are remaining" counter
    pub remaining_count: Locator,
    pub remove_all_button: Locator,
}

impl PageObject for TagsInputBoxPage {
    const FIXTURE: &'static str = "tagsInputBoxPage";

    fn new(page: &Page, _config: &SuiteConfig) -> Self {
        Self {
            page: page.clone(),
            tags_link: page.locator(r#"//h3[text()="Tags Input Box"]"#),
            input_field: page.locator(".content >> input"),
            tags: page.locator(".content >> ul >> li"),
            remaining_count: page.locator(".details >> p >> span"),
            remove_all_button: page.locator(".details >> button"),
        }
    }
}

impl TagsInputBoxPage {
    pub async fn open_tags_input_box_page(&self) -> ProbeResult<()> {
        self.tags_link.click().await?;
        self.page.wait_for_load_state(LoadState::DomContentLoaded).await
    }

    /// Type a tag and commit it with Enter
    pub async fn add_tag(&self, tag: &str) -> ProbeResult<()> {
        tracing::debug!(tag, "add tag");
        self.input_field.fill(tag).await?;
        self.input_field.press("Enter").await
    }

    /// Click the close icon of the tag showing `tag_text`
    pub async fn remove_tag(&self, tag_text: &str) -> ProbeResult<()> {
        self.tags
            .locator(&format!("text={tag_text}"))
            .locator("i")
            .click()
            .await
    }

    pub async fn remove_all_tags(&self) -> ProbeResult<()> {
        self.remove_all_button.click().await
    }

    /// Open, clear, then add each of `tags`
    pub async fn add_tags_and_reset(&self, tags: &[&str]) -> ProbeResult<()> {
        self.open_tags_input_box_page().await?;
        self.remove_all_tags().await?;
        for tag in tags {
            self.add_tag(tag).await?;
        }
        Ok(())
    }

    /// Open, clear, add `initial_tags`, then remove `remove_tag_name`
    pub async fn remove_tag_after_adding(
        &self,
        initial_tags: &[&str],
        remove_tag_name: &str,
    ) -> ProbeResult<()> {
        self.add_tags_and_reset(initial_tags).await?;
        self.remove_tag(remove_tag_name).await
    }

    /// Open, clear, add one tag
    pub async fn reset_and_add_single_tag(&self, tag: &str) -> ProbeResult<()> {
        self.add_tags_and_reset(&[tag]).await
    }
}

// ============================================================================
// Budget Tracker
// ============================================================================

/// Kind of budget entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryKind {
    #[default]
    Income,
    Expense,
}

impl EntryKind {
    /// `<option>` value in the entry's type select
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Income/expense table with a running total
#[derive(Debug, Clone)]
pub struct BudgetTrackerPage {
    pub budget_header: Locator,
    pub new_entry_button: Locator,
    /// Amount field of the newest entry
    pub amount_input: Locator,
    /// Type select of the newest entry
    pub type_dropdown: Locator,
    pub total_amount: Locator,
}

impl PageObject for BudgetTrackerPage {
    const FIXTURE: &'static str = "budgetTrackerPage";

    fn new(page: &Page, _config: &SuiteConfig) -> Self {
        Self {
            budget_header: page.locator(r#"//h3[text()="Budget Tracker"]"#),
            new_entry_button: page.locator(r#"//button[text()="New Entry"]"#),
            amount_input: page.locator(r#"//input[@type="number"]"#).first(),
            type_dropdown: page.locator("select.input-type").first(),
            total_amount: page.locator("td.summary span.total"),
        }
    }
}

impl BudgetTrackerPage {
    pub async fn open_budget_tracker(&self) -> ProbeResult<()> {
        self.budget_header.click().await
    }

    /// Add an entry of `amount` and commit it
    pub async fn add_entry(&self, amount: f64, kind: EntryKind) -> ProbeResult<()> {
        tracing::info!(amount, %kind, "add budget entry");
        self.new_entry_button.click().await?;
        self.type_dropdown.select_option(&[kind.as_str()]).await?;
        self.amount_input.fill(&amount.to_string()).await?;
        self.amount_input.press("Enter").await
    }

    /// Total shown in the summary row; 0 when unreadable
    pub async fn get_total(&self) -> ProbeResult<f64> {
        let text = self.total_amount.text_content().await?;
        Ok(text.as_deref().map_or(0.0, parse_currency))
    }
}
