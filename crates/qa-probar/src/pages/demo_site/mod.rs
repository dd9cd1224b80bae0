//! Automation Demo Site pages, reached through `SECONDARY_BASE_URL`.

mod alerts;
mod drag_drop;
mod files;

pub use alerts::{prompt_message_selector, DemoAlertPage};
pub use drag_drop::{DragDropPage, DragDropVariant, DRAG_IMAGES};
pub use files::{FileDownloadPage, FileUploadPage};
