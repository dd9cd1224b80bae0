//! qa-probar: page-object end-to-end suite for QA Playground and the
//! Automation Demo Site.
//!
//! The crate drives Chromium over the DevTools Protocol and exposes a
//! Playwright-shaped surface to its page objects:
//!
//! ```text
//! ┌────────────┐    ┌────────────┐    ┌────────────┐    ┌────────────┐
//! │ Scenario   │───►│ Fixtures / │───►│ Page /     │───►│ PageDriver │
//! │ (tests/)   │    │ PageObject │    │ Locator    │    │ (CDP|mock) │
//! └────────────┘    └────────────┘    └────────────┘    └────────────┘
//! ```
//!
//! Locators are lazy and strict, actions auto-wait for actionability, and
//! [`expect`] assertions retry until they hold or time out.
//!
//! ```no_run
//! use qa_probar::prelude::*;
//!
//! # async fn scenario() -> ProbeResult<()> {
//! let ctx = TestContext::playground("TC01 verify account").await?;
//! let outcome = async {
//!     let verify = ctx.fixtures().verify_account_page();
//!     verify.open_verify_account_page().await?;
//!     Ok(())
//! }
//! .await;
//! ctx.finish(outcome).await
//! # }
//! ```

#![cfg_attr(test, allow(clippy::large_stack_arrays, clippy::large_stack_frames))]

mod assertion;
pub mod browser;
mod config;
mod dialog;
pub mod driver;
mod file_ops;
mod fixture;
mod harness;
mod keyboard;
mod locator;
mod page;
mod page_object;
pub mod pages;
pub mod query;
mod result;
mod selector;
pub mod sortable;
pub mod testdata;
pub mod text;
pub mod wait;

pub use assertion::{expect, Assertion, Expect, ExpectAssertion, Expectation};
pub use browser::BrowserConfig;
#[cfg(feature = "browser")]
pub use browser::{Browser, CdpPageDriver};
pub use config::{resolve_against, SuiteConfig, DEFAULT_ARTIFACTS_DIR, DEFAULT_BASE_URL};
pub use dialog::{Dialog, DialogAction, DialogType, PendingDialog};
pub use driver::{MockDriver, PageDriver};
pub use file_ops::{asset_path, Download};
pub use fixture::{Fixtures, FIXTURE_NAMES};
pub use harness::{failure_screenshot_path, init_tracing, slugify, TestContext};
pub use keyboard::KeyDefinition;
pub use locator::{ClickOptions, DragOptions, FrameLocator, Locator};
pub use page::Page;
pub use page_object::{BasePage, PageObject};
pub use result::{ProbeError, ProbeResult};
pub use selector::{xpath_literal, Selector};
pub use wait::{ElementState, LoadState, Timeouts};

/// Everything a scenario usually needs
pub mod prelude {
    pub use super::pages::demo_site::*;
    pub use super::pages::playground::*;
    pub use super::{
        expect, Assertion, BasePage, ClickOptions, Dialog, DialogAction, Download, ElementState,
        Fixtures, FrameLocator, LoadState, Locator, Page, PageObject, ProbeError, ProbeResult,
        SuiteConfig, TestContext, Timeouts,
    };
}
