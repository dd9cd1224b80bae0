//! Upload File and Download File apps.

use crate::config::SuiteConfig;
use crate::file_ops::asset_path;
use crate::locator::Locator;
use crate::page::Page;
use crate::page_object::PageObject;
use crate::result::ProbeResult;
use std::path::PathBuf;

/// Fixture uploaded by the suite
pub const UPLOAD_FILE_NAME: &str = "uploadFile.png";

/// Image upload with a captioned preview
#[derive(Debug, Clone)]
pub struct QaUploadFilePage {
    pub upload_heading: Locator,
    pub upload_icon: Locator,
    pub file_input: Locator,
    pub uploaded_file_name: Locator,
    assets_dir: PathBuf,
}

impl PageObject for QaUploadFilePage {
    const FIXTURE: &'static str = "qaUploadFilePage";

    fn new(page: &Page, config: &SuiteConfig) -> Self {
        Self {
            upload_heading: page.locator(r#"//h3[text()="Upload File"]"#),
            upload_icon: page.locator(r#"//i[@class="fas fa-upload"]"#),
            file_input: page.locator(r#"input[type="file"]"#),
            uploaded_file_name: page.locator(&format!(r#"//figcaption[text()="{UPLOAD_FILE_NAME}"]"#)),
            assets_dir: config.assets_dir.clone(),
        }
    }
}

impl QaUploadFilePage {
    /// Upload the bundled image; returns its caption
    ///
    /// Fails before clicking anything when the image is missing.
    pub async fn upload_file_and_return_locator(&self) -> ProbeResult<Locator> {
        let file = asset_path(&self.assets_dir, UPLOAD_FILE_NAME)?;
        self.upload_heading.click().await?;
        self.upload_icon.click().await?;
        self.file_input.set_input_files(&[file]).await?;
        Ok(self.uploaded_file_name.clone())
    }
}

/// Button that downloads a sample PDF
#[derive(Debug, Clone)]
pub struct QaDownloadFilePage {
    page: Page,
    pub download_heading: Locator,
    pub download_button: Locator,
    artifacts_dir: PathBuf,
}

impl PageObject for QaDownloadFilePage {
    const FIXTURE: &'static str = "downloadPage";

    fn new(page: &Page, config: &SuiteConfig) -> Self {
        Self {
            page: page.clone(),
            download_heading: page.locator(r#"//h3[text()="Download File"]"#),
            download_button: page.locator(r#"//a[@class="btn btn-lg btn-green-outline"]"#),
            artifacts_dir: config.artifacts_dir.clone(),
        }
    }
}

impl QaDownloadFilePage {
    /// Download the file and save it as `file_name` under the artifacts directory
    pub async fn download_file_and_return_path(&self, file_name: &str) -> ProbeResult<PathBuf> {
        self.download_heading.click().await?;
        let download = self
            .page
            .wait_for_download(self.download_button.click())
            .await?;
        download.save_as(self.artifacts_dir.join(file_name)).await
    }
}
