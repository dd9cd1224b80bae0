//! Sorting a drag-and-drop list through the UI.
//!
//! The list grades itself: after "check order" each item carries a `right`
//! or `wrong` class. [`sort_by_drag`] repeats selection-style passes, dragging
//! any later item with a smaller name onto the current slot and re-checking,
//! until every item is graded `right`.

use crate::result::{ProbeError, ProbeResult};
use async_trait::async_trait;

/// Pass budget before a sort is declared stuck
pub const DEFAULT_MAX_PASSES: usize = 20;

/// One list entry as read from the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortableItem {
    /// Person name shown in the entry
    pub name: String,
    /// The entry's `class` attribute
    pub class_name: String,
}

impl SortableItem {
    /// Create an item
    #[must_use]
    pub fn new(name: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            class_name: class_name.into(),
        }
    }

    /// Graded as being in its correct position
    #[must_use]
    pub fn is_right(&self) -> bool {
        self.class_name.contains("right")
    }
}

/// A list that can be read, reordered by dragging, and graded
#[async_trait]
pub trait SortableList: Send + Sync {
    /// Number of entries
    async fn count_items(&self) -> ProbeResult<usize>;

    /// Current entries in display order
    async fn get_all_items_classes(&self) -> ProbeResult<Vec<SortableItem>>;

    /// Drag the entry at `source` onto the entry at `target`
    async fn drag_item(&self, source: usize, target: usize) -> ProbeResult<()>;

    /// Ask the list to grade the current order
    async fn click_check_order(&self) -> ProbeResult<()>;
}

/// Sort `list` by dragging until every entry is graded `right`
///
/// Returns the number of passes taken. Fails with
/// [`ProbeError::SortDidNotConverge`] after `max_passes` passes.
pub async fn sort_by_drag<L>(list: &L, max_passes: usize) -> ProbeResult<usize>
where
    L: SortableList + ?Sized,
{
    let total = list.count_items().await?;
    let mut passes = 0;
    loop {
        let items = list.get_all_items_classes().await?;
        let Some(start) = items.iter().position(|item| !item.is_right()) else {
            tracing::info!(passes, "list sorted");
            return Ok(passes);
        };
        if passes == max_passes {
            return Err(ProbeError::SortDidNotConverge { passes });
        }
        passes += 1;
        tracing::debug!(pass = passes, start, "sorting pass");

        let mut dragged = false;
        for i in start..total {
            for j in i + 1..total {
                let current = list.get_all_items_classes().await?;
                let (Some(a), Some(b)) = (current.get(i), current.get(j)) else {
                    continue;
                };
                if a.name > b.name {
                    list.drag_item(j, i).await?;
                    list.click_check_order().await?;
                    dragged = true;
                }
            }
        }
        // An ungraded list that is already in name order still needs grading
        if !dragged {
            list.click_check_order().await?;
        }
    }
}
