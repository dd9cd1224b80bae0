//! Browser control over the Chrome DevTools Protocol.
//!
//! With the `browser` feature, [`Browser`] launches Chromium through
//! chromiumoxide and hands out [`CdpPageDriver`]s. Each launched browser gets
//! its own session directory (profile plus downloads) so parallel test
//! binaries never share a download folder.

use std::path::PathBuf;

/// Browser configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<PathBuf>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
    /// Per-command CDP timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1280,
            viewport_height: 720,
            chromium_path: None,
            sandbox: true,
            request_timeout_ms: crate::wait::DEFAULT_NAVIGATION_TIMEOUT_MS,
        }
    }
}

impl BrowserConfig {
    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }

    /// Set the per-command CDP timeout
    #[must_use]
    pub const fn with_request_timeout_ms(mut self, ms: u64) -> Self {
        self.request_timeout_ms = ms;
        self
    }
}

// ============================================================================
// Real CDP Implementation (when `browser` feature is enabled)
// ============================================================================

#[cfg(feature = "browser")]
#[allow(clippy::wildcard_imports, clippy::significant_drop_tightening)]
mod cdp {
    use super::*;
    use crate::dialog::{Dialog, DialogAction, DialogType};
    use crate::driver::{MouseButton, MouseEvent, MouseEventKind, PageDriver, PendingEvent};
    use crate::file_ops::Download;
    use crate::keyboard::KeyDefinition;
    use crate::query::ElementQuery;
    use crate::result::{ProbeError, ProbeResult};
    use async_trait::async_trait;
    use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
    use chromiumoxide::cdp::browser_protocol::browser::{
        DownloadProgressState, EventDownloadProgress, EventDownloadWillBegin,
        SetDownloadBehaviorBehavior, SetDownloadBehaviorParams,
    };
    use chromiumoxide::cdp::browser_protocol::dom::SetFileInputFilesParams;
    use chromiumoxide::cdp::browser_protocol::input::{
        DispatchKeyEventParams, DispatchKeyEventType, DispatchMouseEventParams,
        DispatchMouseEventType, InsertTextParams, MouseButton as CdpMouseButton,
    };
    use chromiumoxide::cdp::browser_protocol::page::{
        CaptureScreenshotFormat, CaptureScreenshotParams, EventJavascriptDialogOpening,
        GetNavigationHistoryParams, HandleJavaScriptDialogParams, NavigateToHistoryEntryParams,
    };
    use chromiumoxide::cdp::browser_protocol::target::{
        EventTargetCreated, EventTargetDestroyed, TargetId,
    };
    use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
    use chromiumoxide::handler::viewport::Viewport;
    use chromiumoxide::page::Page as CdpPage;
    use futures::StreamExt;
    use serde_json::Value;
    use std::path::Path;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Mutex;

    /// State shared by every page of one browser session
    #[derive(Debug)]
    struct Session {
        browser: Mutex<CdpBrowser>,
        download_dir: PathBuf,
    }

    /// Browser instance with real CDP connection
    #[derive(Debug)]
    pub struct Browser {
        config: BrowserConfig,
        session: Arc<Session>,
        session_dir: PathBuf,
        handle: tokio::task::JoinHandle<()>,
    }

    impl Browser {
        /// Launch a new browser instance with real CDP
        ///
        /// # Errors
        ///
        /// Returns error if browser cannot be launched
        pub async fn launch(config: BrowserConfig) -> ProbeResult<Self> {
            let session_dir =
                std::env::temp_dir().join(format!("qa-probar-{}", uuid::Uuid::new_v4()));
            let profile_dir = session_dir.join("profile");
            let download_dir = session_dir.join("downloads");
            tokio::fs::create_dir_all(&profile_dir).await?;
            tokio::fs::create_dir_all(&download_dir).await?;

            let mut builder = CdpConfig::builder()
                .window_size(config.viewport_width, config.viewport_height)
                .viewport(Viewport {
                    width: config.viewport_width,
                    height: config.viewport_height,
                    device_scale_factor: None,
                    emulating_mobile: false,
                    is_landscape: false,
                    has_touch: false,
                })
                .user_data_dir(&profile_dir)
                .request_timeout(Duration::from_millis(config.request_timeout_ms));

            if !config.headless {
                builder = builder.with_head();
            }

            if !config.sandbox {
                builder = builder.no_sandbox();
            }

            if let Some(ref path) = config.chromium_path {
                builder = builder.chrome_executable(path);
            }

            let cdp_config = builder
                .build()
                .map_err(|message| ProbeError::BrowserLaunch { message })?;

            let (browser, mut handler) = CdpBrowser::launch(cdp_config).await.map_err(|e| {
                ProbeError::BrowserLaunch {
                    message: e.to_string(),
                }
            })?;

            // Spawn handler task
            let handle = tokio::spawn(async move {
                while let Some(h) = handler.next().await {
                    if h.is_err() {
                        break;
                    }
                }
            });

            let behavior = SetDownloadBehaviorParams::builder()
                .behavior(SetDownloadBehaviorBehavior::AllowAndName)
                .download_path(download_dir.to_string_lossy())
                .events_enabled(true)
                .build()
                .map_err(|message| ProbeError::BrowserLaunch { message })?;
            browser
                .execute(behavior)
                .await
                .map_err(|e| ProbeError::BrowserLaunch {
                    message: e.to_string(),
                })?;

            tracing::info!(
                headless = config.headless,
                session = %session_dir.display(),
                "browser launched"
            );

            Ok(Self {
                config,
                session: Arc::new(Session {
                    browser: Mutex::new(browser),
                    download_dir,
                }),
                session_dir,
                handle,
            })
        }

        /// Create a new page
        ///
        /// # Errors
        ///
        /// Returns error if page cannot be created
        pub async fn new_page(&self) -> ProbeResult<Arc<CdpPageDriver>> {
            let browser = self.session.browser.lock().await;
            let page = browser
                .new_page("about:blank")
                .await
                .map_err(|e| ProbeError::Connection {
                    message: e.to_string(),
                })?;
            Ok(Arc::new(CdpPageDriver::new(page, self.session.clone())))
        }

        /// Get the browser configuration
        #[must_use]
        pub const fn config(&self) -> &BrowserConfig {
            &self.config
        }

        /// Directory the browser writes downloads into
        #[must_use]
        pub fn download_dir(&self) -> &Path {
            &self.session.download_dir
        }

        /// Close the browser and remove its session directory
        pub async fn close(self) -> ProbeResult<()> {
            {
                let mut browser = self.session.browser.lock().await;
                browser
                    .close()
                    .await
                    .map_err(|e| ProbeError::Connection {
                        message: e.to_string(),
                    })?;
                let _ = browser.wait().await;
            }
            self.handle.abort();
            if let Err(e) = tokio::fs::remove_dir_all(&self.session_dir).await {
                tracing::warn!(dir = %self.session_dir.display(), error = %e, "session cleanup failed");
            }
            Ok(())
        }
    }

    /// [`PageDriver`] backed by one CDP target
    #[derive(Debug, Clone)]
    pub struct CdpPageDriver {
        page: CdpPage,
        session: Arc<Session>,
    }

    fn connection(e: impl std::fmt::Display) -> ProbeError {
        ProbeError::Connection {
            message: e.to_string(),
        }
    }

    fn input(e: impl std::fmt::Display) -> ProbeError {
        ProbeError::Input {
            message: e.to_string(),
        }
    }

    impl CdpPageDriver {
        fn new(page: CdpPage, session: Arc<Session>) -> Self {
            Self { page, session }
        }

        /// Target id of this page
        #[must_use]
        pub fn target_id(&self) -> &TargetId {
            self.page.target_id()
        }

        async fn wait_until_loaded(&self) -> ProbeResult<()> {
            crate::wait::poll_until(
                "document load after history navigation",
                Duration::from_secs(30),
                Duration::from_millis(crate::wait::DEFAULT_POLL_INTERVAL_MS),
                || async {
                    let ready = self
                        .evaluate(crate::wait::LoadState::Load.ready_expression())
                        .await?;
                    Ok(ready.as_bool().filter(|r| *r))
                },
            )
            .await
            .map(|_| ())
        }
    }

    #[async_trait]
    impl PageDriver for CdpPageDriver {
        async fn goto(&self, url: &str) -> ProbeResult<()> {
            tracing::debug!(%url, "goto");
            self.page
                .goto(url)
                .await
                .map_err(|e| ProbeError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
            Ok(())
        }

        async fn reload(&self) -> ProbeResult<()> {
            self.page.reload().await.map_err(|e| ProbeError::Navigation {
                url: "(reload)".to_string(),
                message: e.to_string(),
            })?;
            Ok(())
        }

        async fn go_back(&self) -> ProbeResult<()> {
            let history = self
                .page
                .execute(GetNavigationHistoryParams::default())
                .await
                .map_err(connection)?
                .result;
            let index = usize::try_from(history.current_index - 1).map_err(|_| {
                ProbeError::Navigation {
                    url: "(back)".to_string(),
                    message: "no previous history entry".to_string(),
                }
            })?;
            let Some(entry) = history.entries.get(index) else {
                return Err(ProbeError::Navigation {
                    url: "(back)".to_string(),
                    message: "history entry disappeared".to_string(),
                });
            };
            self.page
                .execute(NavigateToHistoryEntryParams::new(entry.id))
                .await
                .map_err(|e| ProbeError::Navigation {
                    url: entry.url.clone(),
                    message: e.to_string(),
                })?;
            self.wait_until_loaded().await
        }

        async fn current_url(&self) -> ProbeResult<String> {
            let href = self.evaluate("window.location.href").await?;
            Ok(href.as_str().unwrap_or_default().to_string())
        }

        async fn evaluate(&self, expression: &str) -> ProbeResult<Value> {
            let params = EvaluateParams::builder()
                .expression(expression)
                .await_promise(true)
                .return_by_value(true)
                .build()
                .map_err(|message| ProbeError::Script { message })?;
            let result = self
                .page
                .evaluate_expression(params)
                .await
                .map_err(|e| ProbeError::Script {
                    message: e.to_string(),
                })?;
            Ok(result.value().cloned().unwrap_or(Value::Null))
        }

        async fn query(&self, query: &ElementQuery) -> ProbeResult<Value> {
            let script = query.to_script()?;
            self.evaluate(&script).await
        }

        async fn dispatch_mouse(&self, event: MouseEvent) -> ProbeResult<()> {
            let kind = match event.kind {
                MouseEventKind::Moved => DispatchMouseEventType::MouseMoved,
                MouseEventKind::Pressed => DispatchMouseEventType::MousePressed,
                MouseEventKind::Released => DispatchMouseEventType::MouseReleased,
            };
            let button = match event.button {
                MouseButton::None => CdpMouseButton::None,
                MouseButton::Left => CdpMouseButton::Left,
                MouseButton::Right => CdpMouseButton::Right,
                MouseButton::Middle => CdpMouseButton::Middle,
            };
            let params = DispatchMouseEventParams::builder()
                .r#type(kind)
                .x(event.x)
                .y(event.y)
                .button(button)
                .click_count(event.click_count)
                .build()
                .map_err(input)?;
            self.page.execute(params).await.map_err(input)?;
            Ok(())
        }

        async fn press_key(&self, key: &KeyDefinition) -> ProbeResult<()> {
            let down_type = if key.text.is_some() {
                DispatchKeyEventType::KeyDown
            } else {
                DispatchKeyEventType::RawKeyDown
            };
            let mut down = DispatchKeyEventParams::builder()
                .r#type(down_type)
                .key(key.key.clone())
                .code(key.code.clone())
                .windows_virtual_key_code(key.key_code);
            if let Some(text) = &key.text {
                down = down.text(text.clone());
            }
            self.page
                .execute(down.build().map_err(input)?)
                .await
                .map_err(input)?;

            let up = DispatchKeyEventParams::builder()
                .r#type(DispatchKeyEventType::KeyUp)
                .key(key.key.clone())
                .code(key.code.clone())
                .windows_virtual_key_code(key.key_code)
                .build()
                .map_err(input)?;
            self.page.execute(up).await.map_err(input)?;
            Ok(())
        }

        async fn insert_text(&self, text: &str) -> ProbeResult<()> {
            self.page
                .execute(InsertTextParams::new(text))
                .await
                .map_err(input)?;
            Ok(())
        }

        async fn set_input_files(
            &self,
            query: &ElementQuery,
            files: &[PathBuf],
        ) -> ProbeResult<()> {
            let params = EvaluateParams::builder()
                .expression(query.to_script()?)
                .await_promise(true)
                .return_by_value(false)
                .build()
                .map_err(|message| ProbeError::Script { message })?;
            let handle = self
                .page
                .evaluate_expression(params)
                .await
                .map_err(|e| ProbeError::Script {
                    message: e.to_string(),
                })?;
            let Some(object_id) = handle.object().object_id.clone() else {
                return Err(ProbeError::ElementNotFound {
                    selector: query.description(),
                });
            };
            let files: Vec<String> = files
                .iter()
                .map(|f| f.to_string_lossy().into_owned())
                .collect();
            let params = SetFileInputFilesParams::builder()
                .files(files)
                .object_id(object_id)
                .build()
                .map_err(input)?;
            self.page.execute(params).await.map_err(input)?;
            Ok(())
        }

        async fn screenshot(&self) -> ProbeResult<Vec<u8>> {
            let params = CaptureScreenshotParams::builder()
                .format(CaptureScreenshotFormat::Png)
                .build();

            let screenshot =
                self.page
                    .execute(params)
                    .await
                    .map_err(|e| ProbeError::Screenshot {
                        message: e.to_string(),
                    })?;

            use base64::Engine;
            base64::engine::general_purpose::STANDARD
                .decode(&screenshot.data)
                .map_err(|e| ProbeError::Screenshot {
                    message: e.to_string(),
                })
        }

        async fn expect_popup(&self) -> ProbeResult<PendingEvent<Arc<dyn PageDriver>>> {
            let mut created = {
                let browser = self.session.browser.lock().await;
                browser
                    .event_listener::<EventTargetCreated>()
                    .await
                    .map_err(connection)?
            };
            let opener = self.page.target_id().clone();
            let session = self.session.clone();
            Ok(Box::pin(async move {
                while let Some(event) = created.next().await {
                    let info = &event.target_info;
                    if info.r#type != "page" || info.opener_id.as_ref() != Some(&opener) {
                        continue;
                    }
                    let target_id = info.target_id.clone();
                    tracing::debug!(target = ?target_id, "popup opened");
                    let page = crate::wait::poll_until(
                        "popup page attach",
                        Duration::from_secs(10),
                        Duration::from_millis(crate::wait::DEFAULT_POLL_INTERVAL_MS),
                        || {
                            let session = session.clone();
                            let target_id = target_id.clone();
                            async move {
                                let browser = session.browser.lock().await;
                                Ok(browser.get_page(target_id).await.ok())
                            }
                        },
                    )
                    .await?;
                    let driver: Arc<dyn PageDriver> =
                        Arc::new(CdpPageDriver::new(page, session.clone()));
                    return Ok(driver);
                }
                Err(connection("target event stream ended before a popup opened"))
            }))
        }

        async fn expect_close(&self) -> ProbeResult<PendingEvent<()>> {
            let mut destroyed = {
                let browser = self.session.browser.lock().await;
                browser
                    .event_listener::<EventTargetDestroyed>()
                    .await
                    .map_err(connection)?
            };
            let target = self.page.target_id().clone();
            Ok(Box::pin(async move {
                while let Some(event) = destroyed.next().await {
                    if event.target_id == target {
                        return Ok(());
                    }
                }
                Err(connection("target event stream ended before the page closed"))
            }))
        }

        async fn expect_download(&self) -> ProbeResult<PendingEvent<Download>> {
            let (mut begins, mut progress) = {
                let browser = self.session.browser.lock().await;
                let begins = browser
                    .event_listener::<EventDownloadWillBegin>()
                    .await
                    .map_err(connection)?;
                let progress = browser
                    .event_listener::<EventDownloadProgress>()
                    .await
                    .map_err(connection)?;
                (begins, progress)
            };
            let download_dir = self.session.download_dir.clone();
            Ok(Box::pin(async move {
                let Some(begin) = begins.next().await else {
                    return Err(ProbeError::Download {
                        message: "event stream ended before a download began".to_string(),
                    });
                };
                tracing::debug!(url = %begin.url, file = %begin.suggested_filename, "download started");
                while let Some(event) = progress.next().await {
                    if event.guid != begin.guid {
                        continue;
                    }
                    match event.state {
                        DownloadProgressState::Completed => {
                            return Ok(Download::new(
                                begin.url.clone(),
                                begin.suggested_filename.clone(),
                                download_dir.join(&begin.guid),
                            ));
                        }
                        DownloadProgressState::Canceled => {
                            return Err(ProbeError::Download {
                                message: format!("{} was canceled", begin.suggested_filename),
                            });
                        }
                        DownloadProgressState::InProgress => {}
                    }
                }
                Err(ProbeError::Download {
                    message: "event stream ended before the download completed".to_string(),
                })
            }))
        }

        async fn handle_next_dialog(
            &self,
            action: DialogAction,
        ) -> ProbeResult<PendingEvent<Dialog>> {
            let mut opening = self
                .page
                .event_listener::<EventJavascriptDialogOpening>()
                .await
                .map_err(connection)?;
            let page = self.page.clone();
            // The opening action blocks until the dialog is answered, so the
            // answer must come from a separate task.
            let task = tokio::spawn(async move {
                let Some(event) = opening.next().await else {
                    return Err(ProbeError::Dialog {
                        message: "event stream ended before a dialog opened".to_string(),
                    });
                };
                let mut params = HandleJavaScriptDialogParams::builder().accept(action.accepts());
                if let Some(text) = action.prompt_text() {
                    params = params.prompt_text(text);
                }
                let params = params
                    .build()
                    .map_err(|message| ProbeError::Dialog { message })?;
                page.execute(params)
                    .await
                    .map_err(|e| ProbeError::Dialog {
                        message: e.to_string(),
                    })?;
                let dialog = Dialog::new(
                    DialogType::from_protocol(event.r#type.as_ref()),
                    event.message.clone(),
                    event.default_prompt.clone(),
                    action,
                );
                tracing::info!(
                    kind = %dialog.dialog_type(),
                    message = dialog.message(),
                    "dialog handled"
                );
                Ok(dialog)
            });
            Ok(crate::driver::spawned_event(task, "dialog"))
        }

        async fn bring_to_front(&self) -> ProbeResult<()> {
            self.page.bring_to_front().await.map_err(connection)?;
            Ok(())
        }

        async fn close(&self) -> ProbeResult<()> {
            self.page.clone().close().await.map_err(connection)
        }
    }
}

#[cfg(feature = "browser")]
pub use cdp::{Browser, CdpPageDriver};
