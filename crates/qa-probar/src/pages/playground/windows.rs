//! Windows and overlays: new tab, pop-up window, onboarding modal.

use crate::config::SuiteConfig;
use crate::locator::Locator;
use crate::page::Page;
use crate::page_object::PageObject;
use crate::result::ProbeResult;
use crate::wait::LoadState;

const NEW_PAGE_HEADING: &str = r#"//h1[text()="Welcome to the new page!"]"#;

/// Link that opens a second tab
#[derive(Debug, Clone)]
pub struct NewTabPage {
    page: Page,
    pub new_tab_heading: Locator,
    pub open_new_tab_button: Locator,
}

impl PageObject for NewTabPage {
    const FIXTURE: &'static str = "newTabPage";

    fn new(page: &Page, _config: &SuiteConfig) -> Self {
        Self {
            page: page.clone(),
            new_tab_heading: page.locator(r#"//h3[text()="New Tab"]"#),
            open_new_tab_button: page.locator(r#"//a[text()="Open New Tab"]"#),
        }
    }
}

impl NewTabPage {
    pub async fn open_new_tab_section(&self) -> ProbeResult<()> {
        self.new_tab_heading.click().await?;
        self.page.wait_for_load_state(LoadState::DomContentLoaded).await
    }

    /// Click "Open New Tab" and return the tab it opens
    pub async fn click_open_new_tab(&self) -> ProbeResult<Page> {
        self.page
            .wait_for_popup(self.open_new_tab_button.click())
            .await
    }

    /// Welcome heading on the opened tab
    #[must_use]
    pub fn new_page_heading(tab: &Page) -> Locator {
        tab.locator(NEW_PAGE_HEADING)
    }
}

/// Button that opens a closable pop-up window
#[derive(Debug, Clone)]
pub struct PopUpWindowPage {
    page: Page,
    pub pop_up_heading: Locator,
    pub open_button: Locator,
    /// Shown on the opener once the pop-up's button was clicked
    pub success_message: Locator,
}

const POPUP_CLOSE_BUTTON: &str = r#"//button[@onclick="window.close()"]"#;

impl PageObject for PopUpWindowPage {
    const FIXTURE: &'static str = "popUpWindowPage";

    fn new(page: &Page, _config: &SuiteConfig) -> Self {
        Self {
            page: page.clone(),
            pop_up_heading: page.locator(r#"//h3[text()="Pop-Up Window"]"#),
            open_button: page.locator(r#"//a[@onclick="openPopUp()"]"#),
            success_message: page.locator(r#"//p[text()="Button Clicked"]"#),
        }
    }
}

impl PopUpWindowPage {
    pub async fn open_pop_up_section(&self) -> ProbeResult<()> {
        self.pop_up_heading.click().await?;
        self.page.wait_for_load_state(LoadState::DomContentLoaded).await
    }

    /// Open the pop-up, close it with its own button, and return the opener's
    /// success message
    pub async fn open_pop_up_and_close(&self) -> ProbeResult<Locator> {
        let popup = self.page.wait_for_popup(self.open_button.click()).await?;
        let close_button = popup.locator(POPUP_CLOSE_BUTTON);
        popup.wait_for_close(close_button.click()).await?;
        Ok(self.success_message.clone())
    }
}

/// Onboarding modal shown on entry
#[derive(Debug, Clone)]
pub struct ModalPopUpPage {
    pub modal_heading: Locator,
    pub close_icon: Locator,
    pub welcome_message: Locator,
}

impl PageObject for ModalPopUpPage {
    const FIXTURE: &'static str = "modalPopUpPage";

    fn new(page: &Page, _config: &SuiteConfig) -> Self {
        Self {
            modal_heading: page.locator(r#"//h3[text()="Onboarding Modal Popup"]"#),
            close_icon: page.locator(r#"//i[@class="fas fa-bars"]"#),
            welcome_message: page.locator("div.title").filter_has_text("Welcome Peter Parker!"),
        }
    }
}

impl ModalPopUpPage {
    /// Open the section and dismiss the modal
    pub async fn open_modal_popup_section(&self) -> ProbeResult<()> {
        self.modal_heading.click().await?;
        self.close_icon.click().await
    }
}
