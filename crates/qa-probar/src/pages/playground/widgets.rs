//! Pointer-driven widgets: stars, covered button, hover card, range slider,
//! sortable list.

use crate::assertion::expect;
use crate::config::SuiteConfig;
use crate::locator::{DragOptions, Locator};
use crate::page::Page;
use crate::page_object::PageObject;
use crate::result::{ProbeError, ProbeResult};
use crate::sortable::{SortableItem, SortableList};
use crate::wait::LoadState;
use async_trait::async_trait;

// ============================================================================
// Stars Rating Widget
// ============================================================================

/// Number of stars in the widget
pub const STAR_COUNT: usize = 5;

/// Five-star rating that swaps an emoji per star
#[derive(Debug, Clone)]
pub struct StarsRatingPage {
    page: Page,
    pub stars_heading: Locator,
    pub stars: Vec<Locator>,
    pub emojis: Vec<Locator>,
}

impl PageObject for StarsRatingPage {
    const FIXTURE: &'static str = "starsRatingPage";

    fn new(page: &Page, _config: &SuiteConfig) -> Self {
        Self {
            page: page.clone(),
            stars_heading: page.locator(r#"//h3[text()="Stars Rating Widget"]"#),
            stars: (1..=STAR_COUNT)
                .map(|n| page.locator(&format!(r#"//label[@for="star-{n}"]"#)))
                .collect(),
            emojis: (1..=STAR_COUNT)
                .map(|n| page.locator(&format!(r#"//img[@src="emojis/emoji-{n}.png"]"#)))
                .collect(),
        }
    }
}

impl StarsRatingPage {
    pub async fn open_stars_rating_widget(&self) -> ProbeResult<()> {
        self.stars_heading.click().await?;
        self.page.wait_for_load_state(LoadState::DomContentLoaded).await
    }

    /// Click the star at zero-based `index`; returns its emoji
    pub async fn rate_star_and_get_emoji(&self, index: usize) -> ProbeResult<Locator> {
        let (Some(star), Some(emoji)) = (self.stars.get(index), self.emojis.get(index)) else {
            return Err(ProbeError::Input {
                message: format!("star index {index} out of range 0..{STAR_COUNT}"),
            });
        };
        star.click().await?;
        Ok(emoji.clone())
    }
}

// ============================================================================
// Covered Elements
// ============================================================================

/// Button hidden below the fold behind a wrapper
#[derive(Debug, Clone)]
pub struct CoveredElementsPage {
    page: Page,
    pub covered_elements_heading: Locator,
    pub wrapper: Locator,
    pub you_got_me_button: Locator,
    pub mission_accomplished: Locator,
}

impl PageObject for CoveredElementsPage {
    const FIXTURE: &'static str = "coveredElementsPage";

    fn new(page: &Page, _config: &SuiteConfig) -> Self {
        Self {
            page: page.clone(),
            covered_elements_heading: page.locator(r#"//h3[text()="Covered Elements"]"#),
            wrapper: page.locator(r#"//div[@class="wrapper"]"#),
            you_got_me_button: page.locator(r#"//a[@onclick="youGotMe()"]"#),
            mission_accomplished: page.locator(r#"//p[text()="Mission accomplished"]"#),
        }
    }
}

impl CoveredElementsPage {
    pub async fn open_covered_elements_section(&self) -> ProbeResult<()> {
        self.covered_elements_heading.click().await
    }

    /// Scroll to the wrapper, click the button, scroll back to the top
    pub async fn scroll_click_and_verify(&self) -> ProbeResult<()> {
        self.wrapper.scroll_into_view_if_needed().await?;
        self.you_got_me_button.click().await?;
        self.page
            .evaluate::<serde_json::Value>("window.scrollTo({ top: 0, behavior: 'smooth' })")
            .await?;
        Ok(())
    }
}

// ============================================================================
// Mouse Hover
// ============================================================================

/// Title on the hover card
pub const EXPECTED_MOVIE_TITLE: &str = "Spider-Man: No Way Home";
/// Discounted price on the hover card
pub const EXPECTED_CURRENT_PRICE: &str = "$24.96";
/// Struck-through price on the hover card
pub const EXPECTED_OLD_PRICE: &str = "$38.99";

/// What the hover card shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieDetails {
    pub title: Option<String>,
    pub current: Option<String>,
    pub old: Option<String>,
    pub buy_visible: bool,
}

/// Poster that reveals a details card on hover
#[derive(Debug, Clone)]
pub struct MouseHoverPage {
    pub section_header: Locator,
    pub poster: Locator,
    pub movie_title: Locator,
    pub current_price: Locator,
    pub old_price: Locator,
    pub buy_button: Locator,
}

impl PageObject for MouseHoverPage {
    const FIXTURE: &'static str = "mouseHoverPage";

    fn new(page: &Page, _config: &SuiteConfig) -> Self {
        Self {
            section_header: page.locator(r#"//h3[text()="Mouse Hover"]"#),
            poster: page.locator(r#"//img[@class="poster"]"#),
            movie_title: page.locator(".title-content h4.movie-title"),
            current_price: page.locator(".title-content .current-price"),
            old_price: page.locator(".title-content .old-price"),
            buy_button: page.locator(".title-content .buy-btn"),
        }
    }
}

impl MouseHoverPage {
    pub async fn open_mouse_hover_section(&self) -> ProbeResult<()> {
        self.section_header.click().await
    }

    pub async fn hover_over_movie(&self) -> ProbeResult<()> {
        self.poster.hover().await
    }

    pub async fn get_movie_details(&self) -> ProbeResult<MovieDetails> {
        Ok(MovieDetails {
            title: self.movie_title.text_content().await?,
            current: self.current_price.text_content().await?,
            old: self.old_price.text_content().await?,
            buy_visible: self.buy_button.is_visible().await?,
        })
    }
}

// ============================================================================
// Rating Range Slider
// ============================================================================

/// Highest slider value
pub const SLIDER_MAX: u32 = 100;

const SET_SLIDER_VALUE: &str = "(input, value) => { \
    input.value = String(value); \
    input.dispatchEvent(new Event('input', { bubbles: true })); \
    input.dispatchEvent(new Event('change', { bubbles: true })); \
}";

/// Emoji slider that offers a feedback button once moved
#[derive(Debug, Clone)]
pub struct RatingRangeSliderPage {
    page: Page,
    pub section_header: Locator,
    pub slider_input: Locator,
    pub progress_bar: Locator,
    pub send_feedback_button: Locator,
    pub feedback_message: Locator,
}

impl PageObject for RatingRangeSliderPage {
    const FIXTURE: &'static str = "ratingSliderPage";

    fn new(page: &Page, _config: &SuiteConfig) -> Self {
        Self {
            page: page.clone(),
            section_header: page.locator(r#"//h3[text()="Rating Range Slider"]"#),
            slider_input: page.locator(r#"//input[@type="range"]"#),
            progress_bar: page.locator(r#"//div[@class="progress-bar"]"#),
            send_feedback_button: page.locator(r#"//button[@id="feedback"]"#),
            feedback_message: page.locator(r#"//p[text()="Thank you for your feedback!"]"#),
        }
    }
}

impl RatingRangeSliderPage {
    pub async fn open_section(&self) -> ProbeResult<()> {
        self.section_header.click().await?;
        self.page.wait_for_load_state(LoadState::DomContentLoaded).await
    }

    /// Step the slider up from 0 until the feedback button shows
    ///
    /// Returns the value at which it appeared, or `None` if it never did.
    pub async fn move_slider_until_feedback_visible(&self) -> ProbeResult<Option<u32>> {
        let mut reached = None;
        for value in 0..=SLIDER_MAX {
            self.slider_input
                .evaluate::<serde_json::Value, _>(SET_SLIDER_VALUE, value)
                .await?;
            if self.send_feedback_button.is_visible().await? {
                tracing::debug!(value, "feedback button visible");
                reached = Some(value);
                break;
            }
        }
        expect(&self.progress_bar)
            .with_message("Progress bar is not visible after moving the slider")
            .to_be_visible()
            .await?;
        Ok(reached)
    }

    pub async fn click_feedback_button(&self) -> ProbeResult<()> {
        self.send_feedback_button.scroll_into_view_if_needed().await?;
        self.send_feedback_button.click().await
    }
}

// ============================================================================
// Sortable List
// ============================================================================

/// "10 Richest People" list sorted by dragging
#[derive(Debug, Clone)]
pub struct SortableListPage {
    pub header: Locator,
    pub people_list: Locator,
    pub check_button: Locator,
    pub title: Locator,
}

impl PageObject for SortableListPage {
    const FIXTURE: &'static str = "sortableListPage";

    fn new(page: &Page, _config: &SuiteConfig) -> Self {
        Self {
            header: page.locator(r#"//h3[text()="Sortable List"]"#),
            people_list: page.locator("#draggable-list li"),
            check_button: page.locator("#check"),
            title: page.locator(r#"//h1[text()="10 Richest People"]"#),
        }
    }
}

impl SortableListPage {
    pub async fn navigate(&self) -> ProbeResult<()> {
        self.header.click().await
    }
}

#[async_trait]
impl SortableList for SortableListPage {
    async fn count_items(&self) -> ProbeResult<usize> {
        self.people_list.count().await
    }

    async fn get_all_items_classes(&self) -> ProbeResult<Vec<SortableItem>> {
        let total = self.people_list.count().await?;
        let mut items = Vec::with_capacity(total);
        for i in 0..total {
            let item = self.people_list.nth(i as i64);
            let name = item.locator(".person-name").text_content().await?;
            let class_name = item.get_attribute("class").await?;
            items.push(SortableItem::new(
                name.unwrap_or_default().trim(),
                class_name.unwrap_or_default(),
            ));
        }
        Ok(items)
    }

    async fn drag_item(&self, source: usize, target: usize) -> ProbeResult<()> {
        if source == target {
            return Ok(());
        }
        let from = self.people_list.nth(source as i64);
        let to = self.people_list.nth(target as i64);
        from.drag_to_with(&to, DragOptions { force: true }).await
    }

    async fn click_check_order(&self) -> ProbeResult<()> {
        self.check_button.click().await
    }
}
