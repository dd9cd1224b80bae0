//! More → File Upload and More → File Download.

use crate::config::SuiteConfig;
use crate::file_ops::asset_path;
use crate::locator::Locator;
use crate::page::Page;
use crate::page_object::PageObject;
use crate::result::ProbeResult;
use crate::wait::ElementState;
use std::path::{Path, PathBuf};

const UPLOAD_FILE_NAME: &str = "uploadFile.png";

/// File upload form, plus the text-file generator on the download page
#[derive(Debug, Clone)]
pub struct FileUploadPage {
    page: Page,
    pub more_link: Locator,
    pub file_upload_link: Locator,
    pub file_input: Locator,
    pub upload_button: Locator,
    pub file_download_link: Locator,
    pub text_area: Locator,
    pub generate_file_button: Locator,
    pub download_link: Locator,
    assets_dir: PathBuf,
    artifacts_dir: PathBuf,
}

impl PageObject for FileUploadPage {
    const FIXTURE: &'static str = "fileUploadPage";

    fn new(page: &Page, config: &SuiteConfig) -> Self {
        Self {
            page: page.clone(),
            more_link: page.locator(r#"//a[text()="More"]"#),
            file_upload_link: page.locator(r#"//a[text()="File Upload"]"#),
            file_input: page.locator(r#"//input[@id="input-4"]"#),
            upload_button: page.locator(r#"//span[text()="Upload"]"#),
            file_download_link: page.locator(r#"//a[text()="File Download"]"#),
            text_area: page.locator(r#"//textarea[@id="textbox"]"#),
            generate_file_button: page.locator(r#"(//button[text()="Generate File"])[1]"#),
            download_link: page.locator(r#"//a[@id="link-to-download"]"#),
            assets_dir: config.assets_dir.clone(),
            artifacts_dir: config.artifacts_dir.clone(),
        }
    }
}

impl FileUploadPage {
    /// Upload the bundled image; returns the Upload button shown afterwards
    pub async fn upload_file(&self) -> ProbeResult<Locator> {
        let file = asset_path(&self.assets_dir, UPLOAD_FILE_NAME)?;
        self.more_link.click().await?;
        self.file_upload_link.click().await?;
        self.file_input.set_input_files(&[file]).await?;
        Ok(self.upload_button.clone())
    }

    /// Generate a TXT file containing `text` and download it
    ///
    /// The file is saved under its suggested name in the artifacts directory.
    pub async fn generate_download_file(&self, text: &str) -> ProbeResult<PathBuf> {
        self.more_link.click().await?;
        self.file_download_link.click().await?;

        self.text_area.fill("").await?;
        self.text_area.type_text(text).await?;
        self.generate_file_button.click().await?;

        let download = self
            .page
            .wait_for_download(self.download_link.click())
            .await?;
        let dest = self.artifacts_dir.join(download.suggested_filename());
        download.save_as(dest).await
    }
}

/// Text-file generator: type, create, download
#[derive(Debug, Clone)]
pub struct FileDownloadPage {
    page: Page,
    pub more_link: Locator,
    pub file_download_link: Locator,
    pub text_box: Locator,
    pub create_button: Locator,
    pub download_link: Locator,
}

impl PageObject for FileDownloadPage {
    const FIXTURE: &'static str = "fileDownloadPage";

    fn new(page: &Page, _config: &SuiteConfig) -> Self {
        Self {
            page: page.clone(),
            more_link: page.locator(r#"//a[text()="More"]"#),
            file_download_link: page.locator(r#"//a[text()="File Download"]"#),
            text_box: page.locator("#textbox"),
            create_button: page.locator("#createTxt"),
            download_link: page.locator("#link-to-download"),
        }
    }
}

impl FileDownloadPage {
    pub async fn navigate_to_file_download(&self) -> ProbeResult<()> {
        self.more_link.click().await?;
        self.file_download_link.click().await
    }

    /// Fill the text box and commit with Enter
    pub async fn enter_text(&self, data: &str) -> ProbeResult<()> {
        self.text_box.fill(data).await?;
        self.text_box.press("Enter").await
    }

    pub async fn click_create_button(&self) -> ProbeResult<()> {
        self.create_button.wait_for(ElementState::Visible).await?;
        self.create_button.click().await
    }

    /// Download the generated file into `dir` under its suggested name
    pub async fn download_file(&self, dir: impl AsRef<Path>) -> ProbeResult<PathBuf> {
        let download = self
            .page
            .wait_for_download(self.download_link.click())
            .await?;
        download
            .save_as(dir.as_ref().join(download.suggested_filename()))
            .await
    }

    /// Contents of a downloaded text file
    pub async fn read_file(&self, path: impl AsRef<Path>) -> ProbeResult<String> {
        Ok(tokio::fs::read_to_string(path).await?)
    }

    #[must_use]
    pub fn file_exists(&self, path: impl AsRef<Path>) -> bool {
        path.as_ref().exists()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::driver::MockDriver;
    use crate::file_ops::Download;
    use crate::pages::test_support::{actions, mock_page_object, mock_page_object_with};

    fn text_download(dir: &Path, content: &str) -> Download {
        let source = dir.join("d41d8cd9");
        std::fs::write(&source, content).unwrap();
        Download::new("blob:https://demo.automationtesting.in/1", "info.txt", source)
    }

    mod upload_tests {
        use super::*;

        #[tokio::test]
        async fn test_upload_sets_file_input() {
            let (upload, driver) = mock_page_object::<FileUploadPage>(MockDriver::new());
            let button = upload.upload_file().await.unwrap();
            assert_eq!(button.description(), r#"//span[text()="Upload"]"#);
            assert!(driver.was_called(r#"set_input_files://input[@id="input-4"]:uploadFile.png"#));
        }

        #[tokio::test]
        async fn test_generated_file_keeps_suggested_name() {
            let dir = tempfile::tempdir().unwrap();
            let config = SuiteConfig::default().with_artifacts_dir(dir.path().join("out"));
            let driver = MockDriver::new().with_download(text_download(dir.path(), "Hi"));
            let (upload, driver) = mock_page_object_with::<FileUploadPage>(driver, &config);

            let path = upload.generate_download_file("Hi").await.unwrap();
            assert_eq!(path, dir.path().join("out").join("info.txt"));
            assert_eq!(std::fs::read_to_string(&path).unwrap(), "Hi");

            // Cleared, then typed key by key
            let typed: Vec<String> = actions(&driver)
                .into_iter()
                .filter(|c| c.starts_with("key:"))
                .collect();
            assert_eq!(typed, vec!["key:Delete", "key:H", "key:i"]);
        }
    }

    mod download_tests {
        use super::*;

        #[tokio::test]
        async fn test_create_then_download() {
            let dir = tempfile::tempdir().unwrap();
            let driver = MockDriver::new().with_download(text_download(dir.path(), "Hello Playwright!"));
            let (files, driver) = mock_page_object::<FileDownloadPage>(driver);

            files.navigate_to_file_download().await.unwrap();
            files.enter_text("Hello Playwright!").await.unwrap();
            files.click_create_button().await.unwrap();
            let saved = files.download_file(dir.path().join("testdata")).await.unwrap();

            assert!(files.file_exists(&saved));
            assert_eq!(files.read_file(&saved).await.unwrap(), "Hello Playwright!");
            assert!(driver.was_called("insert_text:Hello Playwright!"));
            assert!(driver.was_called("query:describe:#createTxt"));
        }

        #[tokio::test]
        async fn test_missing_file() {
            let (files, _) = mock_page_object::<FileDownloadPage>(MockDriver::new());
            assert!(!files.file_exists("/nonexistent/info.txt"));
            assert!(files.read_file("/nonexistent/info.txt").await.is_err());
        }
    }
}
