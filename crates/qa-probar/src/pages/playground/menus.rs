//! Menus: multi-level dropdown, navigation menu, right-click context menus.

use crate::assertion::expect;
use crate::config::SuiteConfig;
use crate::locator::{ClickOptions, Locator};
use crate::page::Page;
use crate::page_object::PageObject;
use crate::result::{ProbeError, ProbeResult};
use crate::testdata::testdata;
use crate::text::clean_menu_label;
use crate::wait::{ElementState, LoadState};
use std::time::Duration;

// ============================================================================
// Multi Level Dropdown
// ============================================================================

/// URL and submenu entries after opening a submenu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubMenuDetails {
    pub url: String,
    pub submenu_items: Vec<String>,
}

/// Dropdown with Settings and Animals submenus
#[derive(Debug, Clone)]
pub struct MultiLevelDropdownPage {
    page: Page,
    pub dropdown_link: Locator,
    pub icon_button: Locator,
    pub settings_link: Locator,
    pub animals_link: Locator,
    pub sub_menu_items: Locator,
}

impl PageObject for MultiLevelDropdownPage {
    const FIXTURE: &'static str = "dropdownPage";

    fn new(page: &Page, _config: &SuiteConfig) -> Self {
        Self {
            page: page.clone(),
            dropdown_link: page.locator(r#"//h3[text()="Multi Level Dropdown"]"#),
            icon_button: page.locator(r#"(//a[@class="icon-button"])[4]"#),
            settings_link: page.locator(r##"//a[@href="#settings"]"##),
            animals_link: page.locator(r##"//a[@href="#animals"]"##),
            sub_menu_items: page.locator("div.menu.menu-secondary-enter-done > a.menu-item"),
        }
    }
}

impl MultiLevelDropdownPage {
    /// Expected entries of the Settings submenu
    pub fn expected_settings_sub_menu() -> ProbeResult<&'static [String]> {
        Ok(&testdata()?.multi_level_dropdown.expected_settings_sub_menu)
    }

    /// Expected entries of the Animals submenu
    pub fn expected_animals_sub_menu() -> ProbeResult<&'static [String]> {
        Ok(&testdata()?.multi_level_dropdown.expected_animals_sub_menu)
    }

    pub async fn open_dropdown_section(&self) -> ProbeResult<()> {
        self.dropdown_link.click().await?;
        self.page.wait_for_load_state(LoadState::DomContentLoaded).await
    }

    pub async fn click_icon_button(&self) -> ProbeResult<()> {
        self.icon_button.click().await
    }

    pub async fn click_settings(&self) -> ProbeResult<()> {
        self.settings_link.click().await
    }

    pub async fn click_animals(&self) -> ProbeResult<()> {
        self.animals_link.click().await
    }

    /// Labels of the open submenu, without the back entry and icons
    pub async fn get_sub_menu_items_text(&self) -> ProbeResult<Vec<String>> {
        self.sub_menu_items
            .first()
            .wait_for(ElementState::Visible)
            .await?;
        let texts = self.sub_menu_items.all_inner_texts().await?;
        Ok(texts
            .iter()
            .map(|text| text.trim())
            .filter(|text| *text != "Settings" && *text != "Animals")
            .map(clean_menu_label)
            .collect())
    }

    async fn open_submenu_and_get_details(&self, submenu: &Locator) -> ProbeResult<SubMenuDetails> {
        self.open_dropdown_section().await?;
        self.click_icon_button().await?;
        submenu.click().await?;
        let url = self.page.url().await?;
        let submenu_items = self.get_sub_menu_items_text().await?;
        tracing::info!(%url, items = submenu_items.len(), "read submenu");
        Ok(SubMenuDetails { url, submenu_items })
    }

    pub async fn open_settings_and_get_details(&self) -> ProbeResult<SubMenuDetails> {
        self.open_submenu_and_get_details(&self.settings_link).await
    }

    pub async fn open_animals_and_get_details(&self) -> ProbeResult<SubMenuDetails> {
        self.open_submenu_and_get_details(&self.animals_link).await
    }

    /// Click the first submenu entry containing `item_text`
    pub async fn click_sub_menu_item(&self, item_text: &str) -> ProbeResult<()> {
        self.sub_menu_items
            .filter_has_text(item_text)
            .first()
            .click()
            .await
    }

    /// Settings → HTML
    pub async fn click_html_sub_menu(&self) -> ProbeResult<()> {
        self.open_dropdown_section().await?;
        self.click_icon_button().await?;
        self.click_settings().await?;
        self.click_sub_menu_item("HTML").await
    }

    /// Animals → `item_text`
    pub async fn click_animals_sub_menu(&self, item_text: &str) -> ProbeResult<()> {
        self.open_dropdown_section().await?;
        self.click_icon_button().await?;
        self.click_animals().await?;
        self.click_sub_menu_item(item_text).await
    }

    pub async fn current_url(&self) -> ProbeResult<String> {
        self.page.url().await
    }
}

// ============================================================================
// Navigation Menu
// ============================================================================

/// Top navigation bar whose entries open sub pages
#[derive(Debug, Clone)]
pub struct NavigationMenuPage {
    page: Page,
    pub nav_menu: Locator,
    /// Heading of the current sub page (the second `h1`)
    pub page_header: Locator,
    pub go_back_link: Locator,
}

impl PageObject for NavigationMenuPage {
    const FIXTURE: &'static str = "navigationMenuPage";

    fn new(page: &Page, _config: &SuiteConfig) -> Self {
        Self {
            page: page.clone(),
            nav_menu: page.locator(r#"//h3[text()="Navigation Menu"]"#),
            page_header: page.locator("//h1").nth(1),
            go_back_link: page.locator(r#"//a[text()="Go Back"]"#),
        }
    }
}

impl NavigationMenuPage {
    /// Menu entries, in visiting order
    pub fn pages() -> ProbeResult<&'static [String]> {
        Ok(&testdata()?.navigation_menu_pages)
    }

    /// Locator for a known menu entry
    pub fn menu_item(&self, item: &str) -> ProbeResult<Locator> {
        if !Self::pages()?.iter().any(|page| page == item) {
            return Err(ProbeError::UnknownMenuItem {
                item: item.to_string(),
            });
        }
        Ok(self.page.locator(&format!(r#"#nav a:text-is("{item}")"#)))
    }

    pub async fn click_nav_menu(&self) -> ProbeResult<()> {
        self.nav_menu.click().await
    }

    pub async fn click_menu_item(&self, item: &str) -> ProbeResult<()> {
        self.menu_item(item)?.click().await
    }

    /// Trimmed heading text, empty when absent
    pub async fn get_page_header(&self) -> ProbeResult<String> {
        let text = self.page_header.text_content().await?;
        Ok(text.unwrap_or_default().trim().to_string())
    }

    pub async fn go_back(&self) -> ProbeResult<()> {
        self.go_back_link.click().await
    }

    /// Visit every entry and collect its heading
    pub async fn get_all_pages_flow(&self) -> ProbeResult<Vec<String>> {
        let mut headers = Vec::new();
        for item in Self::pages()? {
            self.click_menu_item(item).await?;
            let header = self.get_page_header().await?;
            tracing::info!(item = item.as_str(), %header, "visited menu page");
            headers.push(header);
            self.go_back().await?;
        }
        Ok(headers)
    }
}

// ============================================================================
// Right-Click Context Menu
// ============================================================================

const SECTION_VISIBLE_TIMEOUT: Duration = Duration::from_secs(10);
const MENU_ITEM_VISIBLE_TIMEOUT: Duration = Duration::from_secs(5);

/// Custom context menu driven by right clicks
#[derive(Debug, Clone)]
pub struct ContextMenuPage {
    page: Page,
    pub context_menu_section: Locator,
    pub message: Locator,
}

impl PageObject for ContextMenuPage {
    const FIXTURE: &'static str = "contextMenuPage";

    fn new(page: &Page, _config: &SuiteConfig) -> Self {
        Self {
            page: page.clone(),
            context_menu_section: page.locator(r#"//h3[text()="Right-Click Context Menu"]"#),
            message: page.locator(r#"//div[@id="message"]"#),
        }
    }
}

impl ContextMenuPage {
    /// Menu entry labelled `menu`
    #[must_use]
    pub fn context_menu_item(&self, menu: &str) -> Locator {
        self.page
            .locator(&format!(r#"//div[@class="menu"]//li[text()="{menu}"]"#))
    }

    pub async fn open_context_menu_section(&self) -> ProbeResult<()> {
        expect(&self.context_menu_section)
            .with_message("Context menu section is not visible")
            .with_timeout(SECTION_VISIBLE_TIMEOUT)
            .to_be_visible()
            .await?;
        self.context_menu_section.click().await
    }

    /// Right-click the element matching `target_selector`
    pub async fn right_click_target(&self, target_selector: &str) -> ProbeResult<()> {
        let target = self.page.locator(target_selector);
        expect(&target)
            .with_message(format!("Target element \"{target_selector}\" is not visible"))
            .with_timeout(SECTION_VISIBLE_TIMEOUT)
            .to_be_visible()
            .await?;
        target.scroll_into_view_if_needed().await?;
        target.click_with(ClickOptions::right()).await
    }

    pub async fn menu_item_click(&self, menu: &str) -> ProbeResult<()> {
        let item = self.context_menu_item(menu);
        expect(&item)
            .with_message(format!("Context menu item \"{menu}\" is not visible"))
            .with_timeout(MENU_ITEM_VISIBLE_TIMEOUT)
            .to_be_visible()
            .await?;
        item.click().await
    }

    pub async fn menu_item_hover(&self, menu: &str) -> ProbeResult<()> {
        let item = self.context_menu_item(menu);
        expect(&item)
            .with_message(format!("Context menu item \"{menu}\" is not visible for hover"))
            .with_timeout(MENU_ITEM_VISIBLE_TIMEOUT)
            .to_be_visible()
            .await?;
        item.hover().await
    }

    pub async fn get_message_text(&self) -> ProbeResult<String> {
        self.message.inner_text().await
    }
}

/// Right-click menu with a Share submenu
#[derive(Debug, Clone)]
pub struct RightClickMenuPage {
    page: Page,
    pub context_menu_header: Locator,
    pub preview_option: Locator,
    pub share_option: Locator,
    pub get_link_option: Locator,
    pub rename_option: Locator,
    pub delete_option: Locator,
    pub settings_option: Locator,
    pub twitter_option: Locator,
    pub instagram_option: Locator,
    pub dribble_option: Locator,
    pub telegram_option: Locator,
}

fn item_clicked(page: &Page, name: &str) -> Locator {
    page.locator(&format!(r#"//li[@onclick="itemClicked('{name}')"]"#))
}

impl PageObject for RightClickMenuPage {
    const FIXTURE: &'static str = "rightClickPage";

    fn new(page: &Page, _config: &SuiteConfig) -> Self {
        Self {
            page: page.clone(),
            context_menu_header: page.locator(r#"//h3[text()="Right-Click Context Menu"]"#),
            preview_option: item_clicked(page, "Preview"),
            share_option: page.locator(r#"//li[@class="menu-item share"]"#),
            get_link_option: item_clicked(page, "Get Link"),
            rename_option: item_clicked(page, "Rename"),
            delete_option: item_clicked(page, "Delete"),
            settings_option: item_clicked(page, "Settings"),
            twitter_option: item_clicked(page, "Twitter"),
            instagram_option: item_clicked(page, "Instagram"),
            dribble_option: item_clicked(page, "Dribble"),
            telegram_option: item_clicked(page, "Telegram"),
        }
    }
}

impl RightClickMenuPage {
    /// Open the section, then right-click the page body
    pub async fn right_click_header(&self) -> ProbeResult<()> {
        self.context_menu_header.click().await?;
        self.page
            .locator("body")
            .click_with(ClickOptions::right())
            .await
    }

    /// Hover Share to reveal the social submenu
    pub async fn hover_share(&self) -> ProbeResult<()> {
        self.share_option.hover().await
    }

    /// Top-level entries
    #[must_use]
    pub fn main_options(&self) -> [&Locator; 6] {
        [
            &self.preview_option,
            &self.share_option,
            &self.get_link_option,
            &self.rename_option,
            &self.delete_option,
            &self.settings_option,
        ]
    }

    /// Share submenu entries
    #[must_use]
    pub fn share_options(&self) -> [&Locator; 4] {
        [
            &self.twitter_option,
            &self.instagram_option,
            &self.dribble_option,
            &self.telegram_option,
        ]
    }
}
