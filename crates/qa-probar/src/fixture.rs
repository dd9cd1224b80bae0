//! Per-test page-object registry.
//!
//! Each test gets one [`Fixtures`] bound to its page. A page object is built
//! on first access and the same instance is handed out afterwards; nothing is
//! shared between tests.

use crate::config::SuiteConfig;
use crate::page::Page;
use crate::page_object::{BasePage, PageObject};
use crate::pages::demo_site::{DemoAlertPage, DragDropPage, FileDownloadPage, FileUploadPage};
use crate::pages::playground::{
    BudgetTrackerPage, ChangeableIframePage, ContextMenuPage, CoveredElementsPage,
    FetchingDataPage, HomePage, MiniWebAppsPage, ModalPopUpPage, MouseHoverPage,
    MultiLevelDropdownPage, NavigationMenuPage, NestedIframePage, NewTabPage, PopUpWindowPage,
    QaDownloadFilePage, QaUploadFilePage, RatingRangeSliderPage, RedirectChainPage,
    RightClickMenuPage, ShadowDomPage, SortableListPage, StarsRatingPage, TagsInputBoxPage,
    VerifyAccountPage,
};
use crate::result::{ProbeError, ProbeResult};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type Slot = Arc<dyn Any + Send + Sync>;

#[derive(Default)]
struct Slots {
    by_type: HashMap<TypeId, Slot>,
    created: Vec<&'static str>,
}

/// Lazily built page objects for one test
pub struct Fixtures {
    page: Page,
    config: SuiteConfig,
    slots: Mutex<Slots>,
}

impl std::fmt::Debug for Fixtures {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fixtures")
            .field("page", &self.page)
            .field("created", &self.created())
            .finish_non_exhaustive()
    }
}

impl Fixtures {
    /// Registry for `page`
    #[must_use]
    pub fn new(page: Page, config: SuiteConfig) -> Self {
        Self {
            page,
            config,
            slots: Mutex::new(Slots::default()),
        }
    }

    /// The page every fixture is bound to
    #[must_use]
    pub const fn page(&self) -> &Page {
        &self.page
    }

    /// Suite configuration handed to page objects
    #[must_use]
    pub const fn config(&self) -> &SuiteConfig {
        &self.config
    }

    fn slots(&self) -> MutexGuard<'_, Slots> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The `P` fixture, built on first access
    pub fn get<P: PageObject>(&self) -> Arc<P> {
        let mut slots = self.slots();
        if let Some(existing) = slots.by_type.get(&TypeId::of::<P>()) {
            if let Ok(instance) = Arc::clone(existing).downcast::<P>() {
                return instance;
            }
        }
        let instance = Arc::new(P::new(&self.page, &self.config));
        slots
            .by_type
            .insert(TypeId::of::<P>(), Arc::clone(&instance) as Slot);
        slots.created.push(P::FIXTURE);
        tracing::debug!(fixture = P::FIXTURE, "fixture created");
        instance
    }

    /// Whether the `P` fixture has been built
    #[must_use]
    pub fn is_created<P: PageObject>(&self) -> bool {
        self.slots().by_type.contains_key(&TypeId::of::<P>())
    }

    /// Names of the fixtures built so far, in creation order
    #[must_use]
    pub fn created(&self) -> Vec<&'static str> {
        self.slots().created.clone()
    }
}

macro_rules! fixtures {
    ($($accessor:ident => $ty:ty),+ $(,)?) => {
        /// Every fixture name, in declaration order
        pub const FIXTURE_NAMES: &[&str] = &[$(<$ty as PageObject>::FIXTURE),+];

        impl Fixtures {
            $(
                #[doc = concat!("The `", stringify!($ty), "` fixture")]
                pub fn $accessor(&self) -> Arc<$ty> {
                    self.get::<$ty>()
                }
            )+

            /// Build the fixture registered under `name`
            pub fn ensure(&self, name: &str) -> ProbeResult<()> {
                $(
                    if name == <$ty as PageObject>::FIXTURE {
                        self.get::<$ty>();
                        return Ok(());
                    }
                )+
                Err(ProbeError::Fixture {
                    message: format!("unknown fixture \"{name}\""),
                })
            }
        }
    };
}

fixtures! {
    home_page => HomePage,
    mini_web_apps => MiniWebAppsPage,
    verify_account_page => VerifyAccountPage,
    tags_input_box_page => TagsInputBoxPage,
    dropdown_page => MultiLevelDropdownPage,
    new_tab_page => NewTabPage,
    pop_up_window_page => PopUpWindowPage,
    nested_iframe_page => NestedIframePage,
    stars_rating_page => StarsRatingPage,
    covered_elements_page => CoveredElementsPage,
    qa_upload_file_page => QaUploadFilePage,
    download_page => QaDownloadFilePage,
    modal_pop_up_page => ModalPopUpPage,
    budget_tracker_page => BudgetTrackerPage,
    mouse_hover_page => MouseHoverPage,
    navigation_menu_page => NavigationMenuPage,
    context_menu_page => ContextMenuPage,
    shadow_dom_page => ShadowDomPage,
    rating_slider_page => RatingRangeSliderPage,
    sortable_list_page => SortableListPage,
    redirect_page => RedirectChainPage,
    right_click_page => RightClickMenuPage,
    fetching_data_page => FetchingDataPage,
    changeable_iframe_page => ChangeableIframePage,
    base_page => BasePage,
    demo_alert_page => DemoAlertPage,
    drag_drop_page => DragDropPage,
    file_upload_page => FileUploadPage,
    file_download_page => FileDownloadPage,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::driver::MockDriver;
    use crate::wait::Timeouts;
    use std::collections::HashSet;

    fn fixtures() -> (Fixtures, Arc<MockDriver>) {
        let driver = Arc::new(MockDriver::new());
        let config = SuiteConfig::default();
        let page = Page::new(driver.clone(), Timeouts::default(), config.base_url.clone());
        (Fixtures::new(page, config), driver)
    }

    mod registry_tests {
        use super::*;

        #[test]
        fn test_lazy_until_first_access() {
            let (fixtures, driver) = fixtures();
            assert!(fixtures.created().is_empty());
            assert!(!fixtures.is_created::<HomePage>());
            let _home = fixtures.home_page();
            assert!(fixtures.is_created::<HomePage>());
            assert_eq!(fixtures.created(), vec!["homePage"]);
            // Building locators never talks to the browser
            assert!(driver.calls().is_empty());
        }

        #[test]
        fn test_same_instance_within_a_test() {
            let (fixtures, _) = fixtures();
            let first = fixtures.sortable_list_page();
            let second = fixtures.get::<SortableListPage>();
            assert!(Arc::ptr_eq(&first, &second));
            assert_eq!(fixtures.created().len(), 1);
        }

        #[test]
        fn test_separate_registries_do_not_share() {
            let (a, _) = fixtures();
            let (b, _) = fixtures();
            assert!(!Arc::ptr_eq(&a.base_page(), &b.base_page()));
        }

        #[test]
        fn test_ensure_by_name() {
            let (fixtures, _) = fixtures();
            fixtures.ensure("ratingSliderPage").unwrap();
            assert!(fixtures.is_created::<RatingRangeSliderPage>());
            let err = fixtures.ensure("loginPage").unwrap_err();
            assert_eq!(err.to_string(), "Fixture error: unknown fixture \"loginPage\"");
        }
    }

    mod name_tests {
        use super::*;

        #[test]
        fn test_names_are_unique() {
            let unique: HashSet<_> = FIXTURE_NAMES.iter().collect();
            assert_eq!(unique.len(), FIXTURE_NAMES.len());
            assert_eq!(FIXTURE_NAMES.len(), 29);
        }

        #[test]
        fn test_every_name_resolves() {
            let (fixtures, _) = fixtures();
            for name in FIXTURE_NAMES {
                fixtures.ensure(name).unwrap();
            }
            assert_eq!(fixtures.created(), FIXTURE_NAMES.to_vec());
        }

        #[test]
        fn test_window_pages_reachable_through_prelude() {
            use crate::prelude::{ModalPopUpPage, NewTabPage, PopUpWindowPage};

            let (fixtures, _) = fixtures();
            let _tab = fixtures.new_tab_page();
            let _popup = fixtures.pop_up_window_page();
            let _modal = fixtures.modal_pop_up_page();
            assert!(fixtures.is_created::<NewTabPage>());
            assert!(fixtures.is_created::<PopUpWindowPage>());
            assert!(fixtures.is_created::<ModalPopUpPage>());
            assert_eq!(
                fixtures.created(),
                vec!["newTabPage", "popUpWindowPage", "modalPopUpPage"]
            );
        }
    }
}
