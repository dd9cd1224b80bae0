//! SwitchTo → Alerts: alert, confirm and prompt dialogs.

use crate::config::SuiteConfig;
use crate::dialog::{Dialog, DialogAction};
use crate::locator::Locator;
use crate::page::Page;
use crate::page_object::PageObject;
use crate::result::ProbeResult;
use crate::selector::xpath_literal;

/// Message the page shows when a prompt is accepted with `text`
#[must_use]
pub fn prompt_message_selector(text: &str) -> String {
    let message = format!("Hello {text} How are you today");
    format!("//p[text()={}]", xpath_literal(&message))
}

/// Alerts tab set of the Automation Demo Site
#[derive(Debug, Clone)]
pub struct DemoAlertPage {
    page: Page,
    pub switch_to_link: Locator,
    pub alerts_link: Locator,
    pub ok_tab_button: Locator,
    pub confirm_alert_link: Locator,
    pub confirm_alert_button: Locator,
    pub prompt_alert_link: Locator,
    pub prompt_alert_button: Locator,
    /// Shown when the prompt keeps its default value
    pub default_prompt_message: Locator,
}

impl PageObject for DemoAlertPage {
    const FIXTURE: &'static str = "demoAlertPage";

    fn new(page: &Page, _config: &SuiteConfig) -> Self {
        Self {
            page: page.clone(),
            switch_to_link: page.locator(r#"//a[text()="SwitchTo"]"#),
            alerts_link: page.locator(r#"//a[text()="Alerts"]"#),
            ok_tab_button: page.locator(r#"//div[@id="OKTab"]//button"#),
            confirm_alert_link: page.locator(r#"//a[text()="Alert with OK & Cancel "]"#),
            confirm_alert_button: page
                .locator(r#"//button[text()="click the button to display a confirm box "]"#),
            prompt_alert_link: page.locator(r#"//a[text()="Alert with Textbox "]"#),
            prompt_alert_button: page
                .locator(r#"//button[text()="click the button to demonstrate the prompt box "]"#),
            default_prompt_message: page.locator(&prompt_message_selector("prompt")),
        }
    }
}

impl DemoAlertPage {
    /// Message for a prompt accepted with `text`
    #[must_use]
    pub fn prompt_message(&self, text: &str) -> Locator {
        self.page.locator(&prompt_message_selector(text))
    }

    async fn open_alerts(&self) -> ProbeResult<()> {
        self.switch_to_link.click().await?;
        self.alerts_link.click().await
    }

    /// Arm `action` for the next dialog, click `trigger`, wait for the answer
    async fn answer_dialog(&self, trigger: &Locator, action: DialogAction) -> ProbeResult<Dialog> {
        let pending = self.page.once_dialog(action).await?;
        trigger.click().await?;
        let dialog = pending.handled(self.page.timeouts().action).await?;
        tracing::info!(
            kind = %dialog.dialog_type(),
            message = dialog.message(),
            accepted = dialog.action().accepts(),
            "dialog answered"
        );
        Ok(dialog)
    }

    /// Accept the simple alert
    pub async fn handle_alert_flow(&self) -> ProbeResult<bool> {
        self.open_alerts().await?;
        self.answer_dialog(&self.ok_tab_button, DialogAction::Accept)
            .await?;
        Ok(true)
    }

    /// Accept the confirm box
    pub async fn handle_confirm_alert_ok(&self) -> ProbeResult<bool> {
        self.open_alerts().await?;
        self.confirm_alert_link.click().await?;
        self.answer_dialog(&self.confirm_alert_button, DialogAction::Accept)
            .await?;
        Ok(true)
    }

    /// Dismiss the confirm box
    pub async fn handle_confirm_alert_cancel(&self) -> ProbeResult<bool> {
        self.open_alerts().await?;
        self.confirm_alert_link.click().await?;
        self.answer_dialog(&self.confirm_alert_button, DialogAction::Dismiss)
            .await?;
        Ok(true)
    }

    /// Answer the prompt with `prompt_text`; true when the greeting shows
    pub async fn handle_prompt_alert_ok(&self, prompt_text: &str) -> ProbeResult<bool> {
        self.open_alerts().await?;
        self.prompt_alert_link.click().await?;
        self.answer_dialog(
            &self.prompt_alert_button,
            DialogAction::AcceptWith(prompt_text.to_string()),
        )
        .await?;
        self.prompt_message(prompt_text).is_visible().await
    }

    /// Cancel the prompt; true when no default greeting shows
    pub async fn handle_prompt_alert_cancel(&self) -> ProbeResult<bool> {
        self.open_alerts().await?;
        self.prompt_alert_link.click().await?;
        self.answer_dialog(&self.prompt_alert_button, DialogAction::Dismiss)
            .await?;
        Ok(!self.default_prompt_message.is_visible().await?)
    }
}
