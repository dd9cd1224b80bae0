//! Driver seam between page objects and the browser.
//!
//! Everything above this module (pages, locators, page objects) talks to a
//! [`PageDriver`]. The CDP implementation lives in [`crate::browser`]; the
//! [`MockDriver`] here records calls so page-object flows can be unit tested
//! without a browser.
//!
//! Event waits (`expect_*`, `handle_next_dialog`) subscribe when called and
//! return a [`PendingEvent`] that resolves later, so callers arm them before
//! the action that fires the event.

use crate::dialog::{Dialog, DialogAction, DialogType};
use crate::file_ops::Download;
use crate::keyboard::KeyDefinition;
use crate::query::{ElementQuery, QueryOp};
use crate::result::{ProbeError, ProbeResult};
use async_trait::async_trait;
use futures::future::BoxFuture;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

/// An event subscription that resolves once the event fires
pub type PendingEvent<T> = BoxFuture<'static, ProbeResult<T>>;

/// Aborts the wrapped task when dropped
struct AbortOnDrop<T>(tokio::task::JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Resolve to the result of a spawned handler task
///
/// Dropping the returned event (a failed trigger, a timed-out wait) aborts
/// the task, so a handler never outlives the wait it was armed for.
pub(crate) fn spawned_event<T: Send + 'static>(
    task: tokio::task::JoinHandle<ProbeResult<T>>,
    what: &'static str,
) -> PendingEvent<T> {
    let mut guard = AbortOnDrop(task);
    Box::pin(async move {
        (&mut guard.0).await.map_err(|e| ProbeError::Connection {
            message: format!("{what} handler stopped: {e}"),
        })?
    })
}

/// Mouse event phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseEventKind {
    /// Pointer moved
    Moved,
    /// Button pressed
    Pressed,
    /// Button released
    Released,
}

/// Mouse button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MouseButton {
    /// No button (plain move)
    None,
    /// Primary button
    #[default]
    Left,
    /// Secondary button (context menu)
    Right,
    /// Middle button
    Middle,
}

impl fmt::Display for MouseButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::Left => "left",
            Self::Right => "right",
            Self::Middle => "middle",
        })
    }
}

/// A synthesized mouse event in viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseEvent {
    /// Phase
    pub kind: MouseEventKind,
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
    /// Button involved
    pub button: MouseButton,
    /// Click count for press/release
    pub click_count: i64,
}

impl MouseEvent {
    /// Pointer move to (x, y)
    #[must_use]
    pub const fn moved(x: f64, y: f64) -> Self {
        Self {
            kind: MouseEventKind::Moved,
            x,
            y,
            button: MouseButton::None,
            click_count: 0,
        }
    }

    /// Button press at (x, y)
    #[must_use]
    pub const fn pressed(x: f64, y: f64, button: MouseButton, click_count: i64) -> Self {
        Self {
            kind: MouseEventKind::Pressed,
            x,
            y,
            button,
            click_count,
        }
    }

    /// Button release at (x, y)
    #[must_use]
    pub const fn released(x: f64, y: f64, button: MouseButton, click_count: i64) -> Self {
        Self {
            kind: MouseEventKind::Released,
            x,
            y,
            button,
            click_count,
        }
    }
}

/// Browser commands needed by the suite, one implementation per backend
#[async_trait]
pub trait PageDriver: Send + Sync + fmt::Debug {
    /// Navigate and wait for the load event
    async fn goto(&self, url: &str) -> ProbeResult<()>;

    /// Reload the current document
    async fn reload(&self) -> ProbeResult<()>;

    /// Go back one history entry
    async fn go_back(&self) -> ProbeResult<()>;

    /// URL of the current document
    async fn current_url(&self) -> ProbeResult<String>;

    /// Evaluate an expression (promises are awaited) and return its JSON value
    async fn evaluate(&self, expression: &str) -> ProbeResult<Value>;

    /// Run an element query and return the raw reply
    async fn query(&self, query: &ElementQuery) -> ProbeResult<Value>;

    /// Dispatch one mouse event
    async fn dispatch_mouse(&self, event: MouseEvent) -> ProbeResult<()>;

    /// Press and release one key on the focused element
    async fn press_key(&self, key: &KeyDefinition) -> ProbeResult<()>;

    /// Insert text into the focused element as a single input
    async fn insert_text(&self, text: &str) -> ProbeResult<()>;

    /// Set the files of the `<input type=file>` the query resolves to
    async fn set_input_files(&self, query: &ElementQuery, files: &[PathBuf]) -> ProbeResult<()>;

    /// PNG of the viewport
    async fn screenshot(&self) -> ProbeResult<Vec<u8>>;

    /// Subscribe to the next page opened by this page
    async fn expect_popup(&self) -> ProbeResult<PendingEvent<Arc<dyn PageDriver>>>;

    /// Subscribe to this page closing
    async fn expect_close(&self) -> ProbeResult<PendingEvent<()>>;

    /// Subscribe to the next completed download started by this page
    async fn expect_download(&self) -> ProbeResult<PendingEvent<Download>>;

    /// Answer the next JavaScript dialog with `action`
    async fn handle_next_dialog(&self, action: DialogAction) -> ProbeResult<PendingEvent<Dialog>>;

    /// Activate this page's tab
    async fn bring_to_front(&self) -> ProbeResult<()>;

    /// Close this page
    async fn close(&self) -> ProbeResult<()>;
}

// ============================================================================
// Mock driver
// ============================================================================

/// Answers element queries for a [`MockDriver`]
pub type QueryResponder = Box<dyn Fn(&ElementQuery) -> ProbeResult<Value> + Send + Sync>;

/// Mock driver for unit testing
///
/// Every command is appended to a call log (`"goto:<url>"`,
/// `"query:<op>:<chain>"`, `"mouse:pressed:left"`, `"key:Enter"`, ...).
/// Queries default to a single visible element at (10, 20) sized 100x40.
#[derive(Default)]
pub struct MockDriver {
    calls: Mutex<Vec<String>>,
    url: Mutex<String>,
    eval_results: Mutex<VecDeque<Value>>,
    responder: Option<QueryResponder>,
    download: Option<Download>,
    popup: Option<Arc<MockDriver>>,
    dialog_message: String,
}

impl fmt::Debug for MockDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockDriver")
            .field("calls", &self.calls())
            .field("url", &*lock(&self.url))
            .field("has_responder", &self.responder.is_some())
            .finish_non_exhaustive()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockDriver {
    /// Create new mock driver
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start at `url`
    #[must_use]
    pub fn with_url(self, url: impl Into<String>) -> Self {
        *lock(&self.url) = url.into();
        self
    }

    /// Answer element queries with `responder`
    #[must_use]
    pub fn with_responder<F>(mut self, responder: F) -> Self
    where
        F: Fn(&ElementQuery) -> ProbeResult<Value> + Send + Sync + 'static,
    {
        self.responder = Some(Box::new(responder));
        self
    }

    /// Queue a result for the next `evaluate` call (default: `true`)
    #[must_use]
    pub fn with_eval_result(self, value: Value) -> Self {
        lock(&self.eval_results).push_back(value);
        self
    }

    /// Download produced by `expect_download`
    #[must_use]
    pub fn with_download(mut self, download: Download) -> Self {
        self.download = Some(download);
        self
    }

    /// Page returned by `expect_popup`
    #[must_use]
    pub fn with_popup(mut self, popup: Arc<Self>) -> Self {
        self.popup = Some(popup);
        self
    }

    /// Message of dialogs answered by `handle_next_dialog`
    #[must_use]
    pub fn with_dialog_message(mut self, message: impl Into<String>) -> Self {
        self.dialog_message = message.into();
        self
    }

    /// Get call history
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    /// Check if a call starting with `prefix` was made
    #[must_use]
    pub fn was_called(&self, prefix: &str) -> bool {
        lock(&self.calls).iter().any(|c| c.starts_with(prefix))
    }

    /// Number of calls starting with `prefix`
    #[must_use]
    pub fn count_calls(&self, prefix: &str) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    fn record(&self, call: impl Into<String>) {
        lock(&self.calls).push(call.into());
    }

    /// Reply for a query when no responder is installed
    #[must_use]
    pub fn default_reply(query: &ElementQuery) -> Value {
        match &query.op {
            QueryOp::Count => json!({"count": 1}),
            QueryOp::Describe { .. } => json!({
                "count": 1,
                "visible": true,
                "enabled": true,
                "box": {"x": 10.0, "y": 20.0, "width": 100.0, "height": 40.0}
            }),
            QueryOp::AllInnerTexts => json!({"count": 1, "value": []}),
            QueryOp::DragTo { .. } => json!({"count": 1, "targetCount": 1}),
            QueryOp::Element => json!({"count": 1}),
            _ => json!({"count": 1, "value": null}),
        }
    }
}

#[async_trait]
impl PageDriver for MockDriver {
    async fn goto(&self, url: &str) -> ProbeResult<()> {
        self.record(format!("goto:{url}"));
        *lock(&self.url) = url.to_string();
        Ok(())
    }

    async fn reload(&self) -> ProbeResult<()> {
        self.record("reload");
        Ok(())
    }

    async fn go_back(&self) -> ProbeResult<()> {
        self.record("go_back");
        Ok(())
    }

    async fn current_url(&self) -> ProbeResult<String> {
        Ok(lock(&self.url).clone())
    }

    async fn evaluate(&self, expression: &str) -> ProbeResult<Value> {
        self.record(format!("evaluate:{expression}"));
        Ok(lock(&self.eval_results)
            .pop_front()
            .unwrap_or(Value::Bool(true)))
    }

    async fn query(&self, query: &ElementQuery) -> ProbeResult<Value> {
        self.record(format!("query:{}:{}", query.op.name(), query.description()));
        match &self.responder {
            Some(responder) => responder(query),
            None => Ok(Self::default_reply(query)),
        }
    }

    async fn dispatch_mouse(&self, event: MouseEvent) -> ProbeResult<()> {
        let kind = match event.kind {
            MouseEventKind::Moved => "moved",
            MouseEventKind::Pressed => "pressed",
            MouseEventKind::Released => "released",
        };
        self.record(format!("mouse:{kind}:{}", event.button));
        Ok(())
    }

    async fn press_key(&self, key: &KeyDefinition) -> ProbeResult<()> {
        self.record(format!("key:{}", key.key));
        Ok(())
    }

    async fn insert_text(&self, text: &str) -> ProbeResult<()> {
        self.record(format!("insert_text:{text}"));
        Ok(())
    }

    async fn set_input_files(&self, query: &ElementQuery, files: &[PathBuf]) -> ProbeResult<()> {
        let names: Vec<String> = files
            .iter()
            .filter_map(|f| f.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect();
        self.record(format!(
            "set_input_files:{}:{}",
            query.description(),
            names.join(",")
        ));
        Ok(())
    }

    async fn screenshot(&self) -> ProbeResult<Vec<u8>> {
        self.record("screenshot");
        Ok(Vec::new())
    }

    async fn expect_popup(&self) -> ProbeResult<PendingEvent<Arc<dyn PageDriver>>> {
        self.record("expect_popup");
        let popup: Arc<dyn PageDriver> = match &self.popup {
            Some(popup) => Arc::clone(popup) as Arc<dyn PageDriver>,
            None => Arc::new(Self::new()) as Arc<dyn PageDriver>,
        };
        Ok(Box::pin(async move { Ok(popup) }))
    }

    async fn expect_close(&self) -> ProbeResult<PendingEvent<()>> {
        self.record("expect_close");
        Ok(Box::pin(async { Ok(()) }))
    }

    async fn expect_download(&self) -> ProbeResult<PendingEvent<Download>> {
        self.record("expect_download");
        let download = self.download.clone();
        Ok(Box::pin(async move {
            download.ok_or_else(|| ProbeError::Download {
                message: "no download configured on mock driver".to_string(),
            })
        }))
    }

    async fn handle_next_dialog(&self, action: DialogAction) -> ProbeResult<PendingEvent<Dialog>> {
        let label = match &action {
            DialogAction::Accept => "dialog:accept".to_string(),
            DialogAction::AcceptWith(text) => format!("dialog:accept:{text}"),
            DialogAction::Dismiss => "dialog:dismiss".to_string(),
        };
        self.record(label);
        let dialog = Dialog::new(DialogType::Alert, self.dialog_message.clone(), None, action);
        Ok(Box::pin(async move { Ok(dialog) }))
    }

    async fn bring_to_front(&self) -> ProbeResult<()> {
        self.record("bring_to_front");
        Ok(())
    }

    async fn close(&self) -> ProbeResult<()> {
        self.record("close");
        Ok(())
    }
}
