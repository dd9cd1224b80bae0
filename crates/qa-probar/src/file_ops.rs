//! File upload and download artifacts.

use crate::result::{ProbeError, ProbeResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A finished browser download
///
/// The browser writes into a per-session directory under a generated name;
/// [`Download::save_as`] copies it to where the test wants it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Download {
    url: String,
    suggested_filename: String,
    path: PathBuf,
}

impl Download {
    /// Describe a completed download
    #[must_use]
    pub fn new(
        url: impl Into<String>,
        suggested_filename: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            url: url.into(),
            suggested_filename: suggested_filename.into(),
            path: path.into(),
        }
    }

    /// Filename the server or page suggested
    #[must_use]
    pub fn suggested_filename(&self) -> &str {
        &self.suggested_filename
    }

    /// Source URL
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Where the browser wrote the file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copy the download to `dest`, creating parent directories
    pub async fn save_as(&self, dest: impl AsRef<Path>) -> ProbeResult<PathBuf> {
        let dest = dest.as_ref();
        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = tokio::fs::copy(&self.path, dest).await.map_err(|e| {
            ProbeError::Download {
                message: format!("copying {} to {}: {e}", self.path.display(), dest.display()),
            }
        })?;
        tracing::info!(
            file = %dest.display(),
            bytes,
            "saved download"
        );
        Ok(dest.to_path_buf())
    }
}

/// Resolve a fixture file shipped with the suite
///
/// Fails before any browser action when the file is missing.
pub fn asset_path(assets_dir: &Path, name: &str) -> ProbeResult<PathBuf> {
    let path = assets_dir.join(name);
    if path.is_file() {
        Ok(path)
    } else {
        Err(ProbeError::Input {
            message: format!("upload file not found: {}", path.display()),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod download_tests {
        use super::*;

        #[tokio::test]
        async fn test_save_as_creates_parents() {
            let dir = tempfile::tempdir().unwrap();
            let source = dir.path().join("3f2a-guid");
            std::fs::write(&source, b"%PDF-1.4").unwrap();

            let download = Download::new("https://qaplayground.dev/sample.pdf", "sample.pdf", &source);
            let dest = dir.path().join("nested").join("sample.pdf");
            let saved = download.save_as(&dest).await.unwrap();

            assert_eq!(saved.file_name().unwrap(), "sample.pdf");
            assert_eq!(std::fs::read(&saved).unwrap(), b"%PDF-1.4");
        }

        #[tokio::test]
        async fn test_save_as_missing_source() {
            let dir = tempfile::tempdir().unwrap();
            let download = Download::new("u", "a.txt", dir.path().join("gone"));
            let err = download
                .save_as(dir.path().join("a.txt"))
                .await
                .unwrap_err();
            assert!(matches!(err, ProbeError::Download { .. }));
        }

        #[test]
        fn test_accessors() {
            let d = Download::new("https://x/y.txt", "y.txt", "/tmp/abc");
            assert_eq!(d.url(), "https://x/y.txt");
            assert_eq!(d.suggested_filename(), "y.txt");
            assert_eq!(d.path(), Path::new("/tmp/abc"));
        }
    }

    mod asset_tests {
        use super::*;

        #[test]
        fn test_bundled_upload_file_exists() {
            let assets = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets");
            assert!(asset_path(&assets, "uploadFile.png").is_ok());
        }

        #[test]
        fn test_missing_asset() {
            let dir = tempfile::tempdir().unwrap();
            let err = asset_path(dir.path(), "nope.png").unwrap_err();
            assert!(err.to_string().contains("nope.png"));
        }
    }
}
