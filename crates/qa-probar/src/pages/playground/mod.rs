//! QA Playground mini web apps.

mod async_content;
mod files;
mod forms;
mod frames;
mod home;
mod menus;
mod widgets;
mod windows;

pub use async_content::{
    FetchingDataPage, RedirectChainPage, EXPECTED_CARD_COUNT, REDIRECT_MESSAGES, REDIRECT_SETTLE,
};
pub use files::{QaDownloadFilePage, QaUploadFilePage, UPLOAD_FILE_NAME};
pub use forms::{BudgetTrackerPage, EntryKind, TagsInputBoxPage, VerifyAccountPage};
pub use frames::{ChangeableIframePage, NestedIframePage, ShadowDomPage, BOOST_SETTLE};
pub use home::{HomePage, MiniWebAppsPage};
pub use menus::{
    ContextMenuPage, MultiLevelDropdownPage, NavigationMenuPage, RightClickMenuPage,
    SubMenuDetails,
};
pub use widgets::{
    CoveredElementsPage, MouseHoverPage, MovieDetails, RatingRangeSliderPage, SortableListPage,
    StarsRatingPage, EXPECTED_CURRENT_PRICE, EXPECTED_MOVIE_TITLE, EXPECTED_OLD_PRICE,
    SLIDER_MAX, STAR_COUNT,
};
pub use windows::{ModalPopUpPage, NewTabPage, PopUpWindowPage};
