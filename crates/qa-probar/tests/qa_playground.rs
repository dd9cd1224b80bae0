//! QA Playground end-to-end scenarios.
//!
//! Each scenario launches Chromium, opens `BASE_URL` and drives one mini web
//! app. They need a browser and network access, so they are ignored by
//! default:
//!
//! ```text
//! cargo test -p qa-probar --test qa_playground -- --ignored
//! ```

#![cfg(feature = "browser")]

use qa_probar::prelude::*;
use qa_probar::resolve_against;
use qa_probar::sortable::{sort_by_drag, SortableList, DEFAULT_MAX_PASSES};
use std::time::Duration;

// ============================================================================
// Mini Web Apps - Dynamic Table
// ============================================================================

#[tokio::test]
#[ignore = "requires Chromium and network access"]
async fn tc01_mini_web_apps_heading() -> ProbeResult<()> {
    let ctx = TestContext::playground("TC01 mini web apps heading").await?;
    let outcome: ProbeResult<()> = async {
        let home = ctx.fixtures().home_page();
        home.click_mini_web_apps().await?;
        expect(&home.mini_web_apps_heading)
            .with_message("Mini Web Apps heading is not visible")
            .to_be_visible()
            .await
    }
    .await;
    ctx.finish(outcome).await
}

#[tokio::test]
#[ignore = "requires Chromium and network access"]
async fn tc02_spider_man_real_name() -> ProbeResult<()> {
    let ctx = TestContext::playground("TC02 spider-man real name").await?;
    let outcome: ProbeResult<()> = async {
        let table = ctx.fixtures().mini_web_apps();
        table.click_dynamic_table().await?;
        expect(&table.spider_man_real_name)
            .with_message("Spider-Man's real name text is incorrect")
            .to_have_text("Peter Parker")
            .await
    }
    .await;
    ctx.finish(outcome).await
}

#[tokio::test]
#[ignore = "requires Chromium and network access"]
async fn tc03_single_spider_man_row() -> ProbeResult<()> {
    let ctx = TestContext::playground("TC03 single spider-man row").await?;
    let outcome: ProbeResult<()> = async {
        let table = ctx.fixtures().mini_web_apps();
        table.click_dynamic_table().await?;
        expect(&table.spider_man_row)
            .with_message("Expected exactly one Spider-Man row")
            .to_have_count(1)
            .await
    }
    .await;
    ctx.finish(outcome).await
}

#[tokio::test]
#[ignore = "requires Chromium and network access"]
async fn tc04_spider_man_after_shuffle() -> ProbeResult<()> {
    let ctx = TestContext::playground("TC04 spider-man after shuffle").await?;
    let outcome: ProbeResult<()> = async {
        let table = ctx.fixtures().mini_web_apps();
        table.click_dynamic_table().await?;
        table.reload_table_page().await?;
        expect(&table.spider_man_real_name)
            .with_message("Spider-Man's real name mismatch after reload")
            .to_have_text("Peter Parker")
            .await
    }
    .await;
    ctx.finish(outcome).await
}

// ============================================================================
// Verify Account Code
// ============================================================================

async fn submit_code(name: &str, code: &str, expect_success: bool) -> ProbeResult<()> {
    let ctx = TestContext::playground(name).await?;
    let outcome: ProbeResult<()> = async {
        let verify = ctx.fixtures().verify_account_page();
        verify.fill_and_submit_code(code).await?;
        let success = expect(&verify.success_message);
        if expect_success {
            success
                .with_message("Success message not visible for valid code")
                .to_be_visible()
                .await
        } else {
            success
                .with_message(format!("Success message visible for code {code:?}"))
                .not_to_be_visible()
                .await
        }
    }
    .await;
    ctx.finish(outcome).await
}

#[tokio::test]
#[ignore = "requires Chromium and network access"]
async fn tc05_valid_code_succeeds() -> ProbeResult<()> {
    submit_code("TC05 valid code", "9", true).await
}

#[tokio::test]
#[ignore = "requires Chromium and network access"]
async fn tc06_wrong_code_fails() -> ProbeResult<()> {
    submit_code("TC06 wrong code", "1", false).await
}

#[tokio::test]
#[ignore = "requires Chromium and network access"]
async fn tc07_empty_code_fails() -> ProbeResult<()> {
    submit_code("TC07 empty code", "", false).await
}

// ============================================================================
// Tags Input Box
// ============================================================================

/// Reset, add `tags`, optionally remove one, then check count and counter
async fn tags_scenario(
    name: &str,
    tags: &[&str],
    remove: Option<&str>,
    expected_count: usize,
    expected_remaining: Option<&str>,
) -> ProbeResult<()> {
    let ctx = TestContext::playground(name).await?;
    let outcome: ProbeResult<()> = async {
        let box_page = ctx.fixtures().tags_input_box_page();
        match remove {
            Some(tag) => box_page.remove_tag_after_adding(tags, tag).await?,
            None => box_page.add_tags_and_reset(tags).await?,
        }
        expect(&box_page.tags)
            .with_message("Tag count mismatch")
            .to_have_count(expected_count)
            .await?;
        if let Some(remaining) = expected_remaining {
            expect(&box_page.remaining_count)
                .with_message("Remaining tag count mismatch")
                .to_have_text(remaining)
                .await?;
        }
        Ok(())
    }
    .await;
    ctx.finish(outcome).await
}

#[tokio::test]
#[ignore = "requires Chromium and network access"]
async fn tc08_add_multiple_tags() -> ProbeResult<()> {
    tags_scenario("TC08 add tags", &["tag1", "tag2"], None, 2, Some("8")).await
}

#[tokio::test]
#[ignore = "requires Chromium and network access"]
async fn tc09_remove_a_tag() -> ProbeResult<()> {
    tags_scenario("TC09 remove tag", &["tag1", "tag2"], Some("tag1"), 1, Some("9")).await
}

#[tokio::test]
#[ignore = "requires Chromium and network access"]
async fn tc10_empty_tag_rejected() -> ProbeResult<()> {
    tags_scenario("TC10 empty tag", &[""], None, 0, Some("10")).await
}

#[tokio::test]
#[ignore = "requires Chromium and network access"]
async fn tc11_duplicate_tag_rejected() -> ProbeResult<()> {
    tags_scenario("TC11 duplicate tag", &["tag1", "tag1"], None, 1, None).await
}

#[tokio::test]
#[ignore = "requires Chromium and network access"]
async fn tc12_tag_limit_is_ten() -> ProbeResult<()> {
    let tags: Vec<String> = (1..=12).map(|i| format!("tag{i}")).collect();
    let tags: Vec<&str> = tags.iter().map(String::as_str).collect();
    tags_scenario("TC12 tag limit", &tags, None, 10, None).await
}

#[tokio::test]
#[ignore = "requires Chromium and network access"]
async fn tc13_special_character_tags() -> ProbeResult<()> {
    tags_scenario("TC13 special tags", &["@!$", "#$%"], None, 2, None).await
}

// ============================================================================
// Multi-Level Dropdowns
// ============================================================================

#[tokio::test]
#[ignore = "requires Chromium and network access"]
async fn tc14_settings_submenu() -> ProbeResult<()> {
    let ctx = TestContext::playground("TC14 settings submenu").await?;
    let outcome: ProbeResult<()> = async {
        let base = ctx.config().base_url.clone();
        let dropdown = ctx.fixtures().dropdown_page();

        let settings = dropdown.open_settings_and_get_details().await?;
        Assertion::equals(
            settings.url.as_str(),
            resolve_against(&base, "apps/multi-level-dropdown/#settings").as_str(),
            "Settings URL mismatch",
        )?;
        Assertion::equals(
            settings.submenu_items.as_slice(),
            MultiLevelDropdownPage::expected_settings_sub_menu()?,
            "Settings submenu items mismatch",
        )?;

        dropdown.click_sub_menu_item("HTML").await?;
        Assertion::equals(
            dropdown.current_url().await?.as_str(),
            resolve_against(&base, "apps/multi-level-dropdown/#!HTML").as_str(),
            "HTML submenu URL mismatch",
        )
    }
    .await;
    ctx.finish(outcome).await
}

#[tokio::test]
#[ignore = "requires Chromium and network access"]
async fn tc15_animals_submenu() -> ProbeResult<()> {
    let ctx = TestContext::playground("TC15 animals submenu").await?;
    let outcome: ProbeResult<()> = async {
        let base = ctx.config().base_url.clone();
        let dropdown = ctx.fixtures().dropdown_page();

        let animals = dropdown.open_animals_and_get_details().await?;
        Assertion::equals(
            animals.url.as_str(),
            resolve_against(&base, "apps/multi-level-dropdown/#animals").as_str(),
            "Animals submenu URL mismatch",
        )?;
        Assertion::equals(
            animals.submenu_items.as_slice(),
            MultiLevelDropdownPage::expected_animals_sub_menu()?,
            "Animals submenu items mismatch",
        )?;

        dropdown.click_sub_menu_item("Kangaroo").await?;
        Assertion::equals(
            dropdown.current_url().await?.as_str(),
            resolve_against(&base, "apps/multi-level-dropdown/#!Kangaroo").as_str(),
            "Kangaroo submenu URL mismatch",
        )
    }
    .await;
    ctx.finish(outcome).await
}

// ============================================================================
// Navigation and Tabs
// ============================================================================

#[tokio::test]
#[ignore = "requires Chromium and network access"]
async fn tc16_new_tab_heading() -> ProbeResult<()> {
    let ctx = TestContext::playground("TC16 new tab heading").await?;
    let outcome: ProbeResult<()> = async {
        let new_tab = ctx.fixtures().new_tab_page();
        new_tab.open_new_tab_section().await?;
        let tab = new_tab.click_open_new_tab().await?;
        expect(&NewTabPage::new_page_heading(&tab))
            .with_message("New tab heading not visible")
            .to_be_visible()
            .await
    }
    .await;
    ctx.finish(outcome).await
}

#[tokio::test]
#[ignore = "requires Chromium and network access"]
async fn tc17_navigation_headers() -> ProbeResult<()> {
    let ctx = TestContext::playground("TC17 navigation headers").await?;
    let outcome: ProbeResult<()> = async {
        let nav = ctx.fixtures().navigation_menu_page();
        nav.click_nav_menu().await?;
        let headers = nav.get_all_pages_flow().await?;
        Assertion::equals(
            headers.as_slice(),
            [
                "Welcome to the About Page",
                "Welcome to the Blog Page",
                "Welcome to the Portfolio Page",
                "Welcome to the Contact Page",
            ]
            .as_slice(),
            "Navigation headers mismatch",
        )
    }
    .await;
    ctx.finish(outcome).await
}

// ============================================================================
// Popups and Modals
// ============================================================================

#[tokio::test]
#[ignore = "requires Chromium and network access"]
async fn tc18_popup_closes_with_message() -> ProbeResult<()> {
    let ctx = TestContext::playground("TC18 popup message").await?;
    let outcome: ProbeResult<()> = async {
        let popup = ctx.fixtures().pop_up_window_page();
        popup.open_pop_up_section().await?;
        let message = popup.open_pop_up_and_close().await?;
        expect(&message)
            .with_message("Popup success message not visible")
            .to_be_visible()
            .await?;
        expect(&message)
            .with_message("Popup success message text incorrect")
            .to_have_text("Button Clicked")
            .await
    }
    .await;
    ctx.finish(outcome).await
}

#[tokio::test]
#[ignore = "requires Chromium and network access"]
async fn tc19_modal_welcome_message() -> ProbeResult<()> {
    let ctx = TestContext::playground("TC19 modal welcome").await?;
    let outcome: ProbeResult<()> = async {
        let modal = ctx.fixtures().modal_pop_up_page();
        modal.open_modal_popup_section().await?;
        expect(&modal.welcome_message)
            .with_message("Modal welcome message not visible")
            .to_be_visible()
            .await
    }
    .await;
    ctx.finish(outcome).await
}

// ============================================================================
// Iframes
// ============================================================================

#[tokio::test]
#[ignore = "requires Chromium and network access"]
async fn tc20_nested_iframe_message() -> ProbeResult<()> {
    let ctx = TestContext::playground("TC20 nested iframe").await?;
    let outcome: ProbeResult<()> = async {
        let nested = ctx.fixtures().nested_iframe_page();
        nested.open_nested_iframe_section().await?;
        let message = nested.click_button_and_get_message().await?;
        expect(&message)
            .with_message("Message inside nested iframe not visible")
            .to_be_visible()
            .await
    }
    .await;
    ctx.finish(outcome).await
}

#[tokio::test]
#[ignore = "requires Chromium and network access"]
async fn tc21_changeable_iframe_sequence() -> ProbeResult<()> {
    let ctx = TestContext::playground("TC21 changeable iframe").await?;
    let outcome: ProbeResult<()> = async {
        let changeable = ctx.fixtures().changeable_iframe_page();
        changeable.verify_iframe_sequence().await?;
        expect(&changeable.second_iframe_legend)
            .with_message("Second iframe legend not visible")
            .to_be_visible()
            .await
    }
    .await;
    ctx.finish(outcome).await
}

// ============================================================================
// File Upload and Download
// ============================================================================

#[tokio::test]
#[ignore = "requires Chromium and network access"]
async fn tc22_upload_shows_file_name() -> ProbeResult<()> {
    let ctx = TestContext::playground("TC22 upload").await?;
    let outcome: ProbeResult<()> = async {
        let upload = ctx.fixtures().qa_upload_file_page();
        let uploaded = upload.upload_file_and_return_locator().await?;
        expect(&uploaded)
            .with_message("Uploaded file not visible")
            .to_be_visible()
            .await
    }
    .await;
    ctx.finish(outcome).await
}

#[tokio::test]
#[ignore = "requires Chromium and network access"]
async fn tc23_download_sample_pdf() -> ProbeResult<()> {
    let ctx = TestContext::playground("TC23 download").await?;
    let outcome: ProbeResult<()> = async {
        let download = ctx.fixtures().download_page();
        let path = download.download_file_and_return_path("sample.pdf").await?;
        Assertion::is_true(path.exists(), "Downloaded file does not exist")?;
        Assertion::equals(
            &path.file_name().and_then(|n| n.to_str()),
            &Some("sample.pdf"),
            "Downloaded file name mismatch",
        )?;
        let size = tokio::fs::metadata(&path).await?.len();
        Assertion::is_true(size > 0, "Downloaded file is empty")
    }
    .await;
    ctx.finish(outcome).await
}

// ============================================================================
// Budget Tracker
// ============================================================================

async fn budget_scenario(name: &str, amount: f64, kind: EntryKind, total: f64) -> ProbeResult<()> {
    let ctx = TestContext::playground(name).await?;
    let outcome: ProbeResult<()> = async {
        let budget = ctx.fixtures().budget_tracker_page();
        budget.open_budget_tracker().await?;
        budget.add_entry(amount, kind).await?;
        let actual = budget.get_total().await?;
        let message = format!("Budget total incorrect after adding {kind}");
        Assertion::approx_eq(actual, total, 0.005, &message)
    }
    .await;
    ctx.finish(outcome).await
}

#[tokio::test]
#[ignore = "requires Chromium and network access"]
async fn tc24_income_entry_total() -> ProbeResult<()> {
    budget_scenario("TC24 income", 100.0, EntryKind::Income, 100.0).await
}

#[tokio::test]
#[ignore = "requires Chromium and network access"]
async fn tc25_expense_entry_total() -> ProbeResult<()> {
    budget_scenario("TC25 expense", 50.0, EntryKind::Expense, -50.0).await
}

// ============================================================================
// Mouse Hover
// ============================================================================

#[tokio::test]
#[ignore = "requires Chromium and network access"]
async fn tc26_hover_movie_details() -> ProbeResult<()> {
    let ctx = TestContext::playground("TC26 hover movie").await?;
    let outcome: ProbeResult<()> = async {
        let hover = ctx.fixtures().mouse_hover_page();
        hover.open_mouse_hover_section().await?;
        hover.hover_over_movie().await?;
        let details = hover.get_movie_details().await?;
        Assertion::equals(
            &details.title.as_deref(),
            &Some(EXPECTED_MOVIE_TITLE),
            "Movie title mismatch",
        )?;
        Assertion::equals(
            &details.current.as_deref(),
            &Some(EXPECTED_CURRENT_PRICE),
            "Current price mismatch",
        )?;
        Assertion::equals(
            &details.old.as_deref(),
            &Some(EXPECTED_OLD_PRICE),
            "Old price mismatch",
        )?;
        Assertion::is_true(details.buy_visible, "Buy button should be visible")
    }
    .await;
    ctx.finish(outcome).await
}

// ============================================================================
// Shadow DOM & Rating Slider
// ============================================================================

#[tokio::test]
#[ignore = "requires Chromium and network access"]
async fn tc27_shadow_dom_boost() -> ProbeResult<()> {
    let ctx = TestContext::playground("TC27 shadow boost").await?;
    let outcome: ProbeResult<()> = async {
        let shadow = ctx.fixtures().shadow_dom_page();
        shadow.open_shadow_dom_app().await?;
        let progress = shadow.click_boost_and_get_progress().await?;
        Assertion::equals(&progress, &95.0, "Boost progress should be 95")
    }
    .await;
    ctx.finish(outcome).await
}

#[tokio::test]
#[ignore = "requires Chromium and network access"]
async fn tc28_slider_feedback() -> ProbeResult<()> {
    let ctx = TestContext::playground("TC28 slider feedback").await?;
    let outcome: ProbeResult<()> = async {
        let slider = ctx.fixtures().rating_slider_page();
        slider.open_section().await?;
        slider.move_slider_until_feedback_visible().await?;
        slider.click_feedback_button().await?;
        expect(&slider.feedback_message)
            .with_message("Feedback message not visible")
            .to_be_visible()
            .await
    }
    .await;
    ctx.finish(outcome).await
}

// ============================================================================
// Sortable List
// ============================================================================

#[tokio::test]
#[ignore = "requires Chromium and network access"]
async fn tc29_sortable_list_in_order() -> ProbeResult<()> {
    let ctx = TestContext::playground("TC29 sortable list").await?;
    let outcome: ProbeResult<()> = async {
        let sortable = ctx.fixtures().sortable_list_page();
        sortable.navigate().await?;
        sort_by_drag(sortable.as_ref(), DEFAULT_MAX_PASSES).await?;
        for item in sortable.get_all_items_classes().await? {
            Assertion::contains(
                &item.class_name,
                "right",
                &format!("Item {} not in correct position", item.name),
            )?;
        }
        Ok(())
    }
    .await;
    ctx.finish(outcome).await
}

// ============================================================================
// Redirect Chain, Context Menu & Fetching Data
// ============================================================================

#[tokio::test]
#[ignore = "requires Chromium and network access"]
async fn tc30_redirect_chain_go_back() -> ProbeResult<()> {
    let ctx = TestContext::playground("TC30 redirect chain").await?;
    let outcome: ProbeResult<()> = async {
        let redirect = ctx.fixtures().redirect_page();
        redirect.click_header().await?;
        redirect.click_redirect_link().await?;
        expect(&redirect.go_back_button)
            .with_timeout(Duration::from_secs(10))
            .with_message("Go Back button not visible after redirects")
            .to_be_visible()
            .await
    }
    .await;
    ctx.finish(outcome).await
}

#[tokio::test]
#[ignore = "requires Chromium and network access"]
async fn tc31_right_click_menu_items() -> ProbeResult<()> {
    let ctx = TestContext::playground("TC31 right-click menu").await?;
    let outcome: ProbeResult<()> = async {
        let menu = ctx.fixtures().right_click_page();
        menu.right_click_header().await?;
        for option in menu.main_options() {
            expect(option)
                .with_message("Context menu option missing")
                .to_be_visible()
                .await?;
        }
        menu.hover_share().await?;
        for option in menu.share_options() {
            expect(option)
                .with_message("Share submenu option missing")
                .to_be_visible()
                .await?;
        }
        Ok(())
    }
    .await;
    ctx.finish(outcome).await
}

#[tokio::test]
#[ignore = "requires Chromium and network access"]
async fn tc32_hundred_cards_loaded() -> ProbeResult<()> {
    let ctx = TestContext::playground("TC32 fetching data").await?;
    let outcome: ProbeResult<()> = async {
        let fetching = ctx.fixtures().fetching_data_page();
        fetching.click_fetching_data_header().await?;
        fetching.wait_for_card_count(EXPECTED_CARD_COUNT).await?;
        expect(&fetching.cards())
            .with_message("Expected 100 cards to be loaded")
            .to_have_count(EXPECTED_CARD_COUNT)
            .await?;
        for i in 0..EXPECTED_CARD_COUNT {
            expect(&fetching.card_header(i))
                .with_message(format!("Card {i} header not visible"))
                .to_be_visible()
                .await?;
            expect(&fetching.card_body(i))
                .with_message(format!("Card {i} body not visible"))
                .to_be_visible()
                .await?;
        }
        Ok(())
    }
    .await;
    ctx.finish(outcome).await
}

// ============================================================================
// Stars Rating Widget & Covered Elements
// ============================================================================

#[tokio::test]
#[ignore = "requires Chromium and network access"]
async fn tc33_each_star_shows_emoji() -> ProbeResult<()> {
    let ctx = TestContext::playground("TC33 stars rating").await?;
    let outcome: ProbeResult<()> = async {
        let stars = ctx.fixtures().stars_rating_page();
        stars.open_stars_rating_widget().await?;
        for i in 0..STAR_COUNT {
            let emoji = stars.rate_star_and_get_emoji(i).await?;
            expect(&emoji)
                .with_message(format!("Emoji for star {} not visible", i + 1))
                .to_be_visible()
                .await?;
        }
        Ok(())
    }
    .await;
    ctx.finish(outcome).await
}

#[tokio::test]
#[ignore = "requires Chromium and network access"]
async fn tc34_covered_button_clicked() -> ProbeResult<()> {
    let ctx = TestContext::playground("TC34 covered elements").await?;
    let outcome: ProbeResult<()> = async {
        let covered = ctx.fixtures().covered_elements_page();
        covered.open_covered_elements_section().await?;
        covered.scroll_click_and_verify().await?;
        expect(&covered.mission_accomplished)
            .with_message("Expected \"Mission accomplished\" after clicking \"You Got Me\"")
            .to_be_visible()
            .await
    }
    .await;
    ctx.finish(outcome).await
}
