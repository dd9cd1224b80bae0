//! Interactions → Drag and Drop, static and dynamic variants.

use crate::config::SuiteConfig;
use crate::locator::Locator;
use crate::page::Page;
use crate::page_object::PageObject;
use crate::result::ProbeResult;
use crate::wait::ElementState;

/// Images the suite drags
pub const DRAG_IMAGES: [&str; 3] = ["angular", "mongo", "node"];

const DROP_AREA: &str = r#"//div[@id="droparea"]"#;

/// Which drag-and-drop demo to open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragDropVariant {
    Static,
    Dynamic,
}

impl DragDropVariant {
    /// Submenu entry text, trailing space included as on the site
    #[must_use]
    pub const fn menu_label(&self) -> &'static str {
        match self {
            Self::Static => "Static ",
            Self::Dynamic => "Dynamic ",
        }
    }
}

/// Drag images into a drop area
#[derive(Debug, Clone)]
pub struct DragDropPage {
    page: Page,
    pub interactions_link: Locator,
    pub drag_and_drop_link: Locator,
    pub drop_area: Locator,
}

impl PageObject for DragDropPage {
    const FIXTURE: &'static str = "dragDropPage";

    fn new(page: &Page, _config: &SuiteConfig) -> Self {
        Self {
            page: page.clone(),
            interactions_link: page.locator(r#"//a[text()="Interactions "]"#),
            drag_and_drop_link: page.locator(r#"//a[text()="Drag and Drop "]"#),
            drop_area: page.locator(DROP_AREA),
        }
    }
}

impl DragDropPage {
    /// Draggable image with id `image_id`
    #[must_use]
    pub fn image(&self, image_id: &str) -> Locator {
        self.page.locator(&format!(r#"//img[@id="{image_id}"]"#))
    }

    /// `image_id` once it sits inside the drop area
    #[must_use]
    pub fn dropped_image(&self, image_id: &str) -> Locator {
        self.page
            .locator(&format!(r#"{DROP_AREA}//img[@id="{image_id}"]"#))
    }

    async fn drag_images_into_drop_area(
        &self,
        variant: DragDropVariant,
        images: &[&str],
    ) -> ProbeResult<()> {
        self.interactions_link.click().await?;
        self.drag_and_drop_link.click().await?;
        self.page
            .locator(&format!(r#"//a[text()="{}"]"#, variant.menu_label()))
            .click()
            .await?;

        self.drop_area.wait_for(ElementState::Visible).await?;
        for image_id in images {
            let image = self.image(image_id);
            image.wait_for(ElementState::Visible).await?;
            image.drag_to(&self.drop_area).await?;
            tracing::debug!(image = image_id, ?variant, "dropped");
        }
        Ok(())
    }

    pub async fn perform_static_drag_and_drop_for_images(&self, images: &[&str]) -> ProbeResult<()> {
        self.drag_images_into_drop_area(DragDropVariant::Static, images)
            .await
    }

    pub async fn perform_dynamic_drag_and_drop_for_images(&self, images: &[&str]) -> ProbeResult<()> {
        self.drag_images_into_drop_area(DragDropVariant::Dynamic, images)
            .await
    }
}
