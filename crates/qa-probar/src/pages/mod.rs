//! Page objects for the two applications under test.
//!
//! [`playground`] covers the QA Playground mini web apps; [`demo_site`] covers
//! the Automation Demo Site reached through `SECONDARY_BASE_URL`.

pub mod demo_site;
pub mod playground;

pub use crate::page_object::{BasePage, PageObject};
