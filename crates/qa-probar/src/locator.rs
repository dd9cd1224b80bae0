//! Lazy element locators with auto-waiting.
//!
//! A [`Locator`] is a chain of steps that is resolved anew on every call, so
//! it stays valid across re-renders. Single-element operations are strict:
//! they wait for exactly one match and fail fast when the chain matches
//! several elements. Actions additionally wait for the element to be visible
//! and enabled unless forced.

use crate::driver::{MouseButton, MouseEvent, PageDriver};
use crate::keyboard::KeyDefinition;
use crate::query::{describe_steps, BoundingBox, ElementQuery, QueryOp, QueryReply, Step};
use crate::result::{ProbeError, ProbeResult};
use crate::selector::Selector;
use crate::wait::{poll_until, ElementState, Timeouts};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

fn select_steps(selector: &str) -> impl Iterator<Item = Step> {
    Selector::parse(selector)
        .into_iter()
        .map(|selector| Step::Select { selector })
}

// ============================================================================
// Options
// ============================================================================

/// Options for [`Locator::click_with`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickOptions {
    /// Button to press
    pub button: MouseButton,
    /// Number of press/release pairs
    pub click_count: i64,
    /// Skip the visible/enabled wait
    pub force: bool,
}

impl Default for ClickOptions {
    fn default() -> Self {
        Self {
            button: MouseButton::Left,
            click_count: 1,
            force: false,
        }
    }
}

impl ClickOptions {
    /// Use the secondary button
    #[must_use]
    pub const fn right() -> Self {
        Self {
            button: MouseButton::Right,
            click_count: 1,
            force: false,
        }
    }

    /// Skip actionability checks
    #[must_use]
    pub const fn with_force(mut self) -> Self {
        self.force = true;
        self
    }
}

/// Intermediate pointer moves between drag source and target
pub const DRAG_MOVE_STEPS: u32 = 5;

/// Options for [`Locator::drag_to_with`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DragOptions {
    /// Skip the visible/enabled wait on the source
    pub force: bool,
}

// ============================================================================
// Locator
// ============================================================================

/// Lazy reference to element(s) on a page
#[derive(Clone)]
pub struct Locator {
    driver: Arc<dyn PageDriver>,
    steps: Vec<Step>,
    timeouts: Timeouts,
}

impl fmt::Debug for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Locator")
            .field("chain", &self.description())
            .field("timeouts", &self.timeouts)
            .finish_non_exhaustive()
    }
}

impl Locator {
    pub(crate) fn new(driver: Arc<dyn PageDriver>, selector: &str, timeouts: Timeouts) -> Self {
        Self {
            driver,
            steps: select_steps(selector).collect(),
            timeouts,
        }
    }

    fn derive(&self, extra: impl IntoIterator<Item = Step>) -> Self {
        let mut steps = self.steps.clone();
        steps.extend(extra);
        Self {
            driver: self.driver.clone(),
            steps,
            timeouts: self.timeouts,
        }
    }

    /// Resolution chain
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Human-readable chain, used in logs and errors
    #[must_use]
    pub fn description(&self) -> String {
        describe_steps(&self.steps)
    }

    /// Wait budgets of this locator
    #[must_use]
    pub const fn timeouts(&self) -> Timeouts {
        self.timeouts
    }

    // ------------------------------------------------------------------------
    // Chaining
    // ------------------------------------------------------------------------

    /// Descendants matching `selector`
    #[must_use]
    pub fn locator(&self, selector: &str) -> Self {
        self.derive(select_steps(selector))
    }

    /// The match at `index`; negative indices count from the end
    #[must_use]
    pub fn nth(&self, index: i64) -> Self {
        self.derive([Step::Nth { index }])
    }

    /// The first match
    #[must_use]
    pub fn first(&self) -> Self {
        self.nth(0)
    }

    /// The last match
    #[must_use]
    pub fn last(&self) -> Self {
        self.nth(-1)
    }

    /// Matches whose text contains `text`
    #[must_use]
    pub fn filter_has_text(&self, text: &str) -> Self {
        self.derive([Step::HasText {
            text: text.to_string(),
        }])
    }

    /// Descendants of this element's shadow root matching `selector`
    #[must_use]
    pub fn shadow_locator(&self, selector: &str) -> Self {
        self.derive(std::iter::once(Step::Shadow).chain(select_steps(selector)))
    }

    /// Iframes under this element matching `selector`
    #[must_use]
    pub fn frame_locator(&self, selector: &str) -> FrameLocator {
        FrameLocator {
            inner: self.locator(selector),
        }
    }

    /// Same chain with a different action timeout
    #[must_use]
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        let mut copy = self.clone();
        copy.timeouts = self.timeouts.with_action(timeout);
        copy
    }

    // ------------------------------------------------------------------------
    // Resolution
    // ------------------------------------------------------------------------

    /// Run `op` once against the current DOM
    pub(crate) async fn probe(&self, op: QueryOp) -> ProbeResult<QueryReply> {
        let query = ElementQuery::new(self.steps.clone(), op);
        let raw = self.driver.query(&query).await?;
        if raw.is_null() {
            return Ok(QueryReply::default());
        }
        Ok(serde_json::from_value(raw)?)
    }

    pub(crate) fn strict_violation(&self, count: usize) -> ProbeError {
        ProbeError::StrictModeViolation {
            selector: self.description(),
            count,
        }
    }

    /// Run `op` once exactly one element matches
    async fn resolve_one(&self, op: QueryOp) -> ProbeResult<QueryReply> {
        let this = self;
        poll_until(
            &this.description(),
            self.timeouts.action,
            self.timeouts.poll_interval,
            move || {
                let op = op.clone();
                async move {
                    let reply = this.probe(op).await?;
                    match reply.count {
                        0 => Ok(None),
                        1 => Ok(Some(reply)),
                        n => Err(this.strict_violation(n)),
                    }
                }
            },
        )
        .await
    }

    /// Wait until the single match can receive input; returns its box
    async fn wait_actionable(&self, force: bool) -> ProbeResult<BoundingBox> {
        let this = self;
        let what = format!("{} to be visible and enabled", self.description());
        poll_until(
            &what,
            self.timeouts.action,
            self.timeouts.poll_interval,
            move || async move {
                let reply = this.probe(QueryOp::Describe { scroll: true }).await?;
                match reply.count {
                    0 => Ok(None),
                    1 if force || (reply.visible && reply.enabled) => Ok(reply.bounds),
                    1 => Ok(None),
                    n => Err(this.strict_violation(n)),
                }
            },
        )
        .await
    }

    // ------------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------------

    /// Number of matches right now
    pub async fn count(&self) -> ProbeResult<usize> {
        Ok(self.probe(QueryOp::Count).await?.count)
    }

    /// Whether the single match is rendered right now (false when absent)
    pub async fn is_visible(&self) -> ProbeResult<bool> {
        let reply = self.probe(QueryOp::Describe { scroll: false }).await?;
        match reply.count {
            0 => Ok(false),
            1 => Ok(reply.visible),
            n => Err(self.strict_violation(n)),
        }
    }

    /// `textContent` of the single match
    pub async fn text_content(&self) -> ProbeResult<Option<String>> {
        let reply = self.resolve_one(QueryOp::TextContent).await?;
        Ok(reply.value.as_str().map(str::to_string))
    }

    /// `innerText` of the single match
    pub async fn inner_text(&self) -> ProbeResult<String> {
        let reply = self.resolve_one(QueryOp::InnerText).await?;
        Ok(reply.value.as_str().unwrap_or_default().to_string())
    }

    /// `innerText` of every match, without waiting
    pub async fn all_inner_texts(&self) -> ProbeResult<Vec<String>> {
        let reply = self.probe(QueryOp::AllInnerTexts).await?;
        if reply.value.is_null() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_value(reply.value)?)
    }

    /// Attribute of the single match
    pub async fn get_attribute(&self, name: &str) -> ProbeResult<Option<String>> {
        let reply = self
            .resolve_one(QueryOp::Attribute {
                name: name.to_string(),
            })
            .await?;
        Ok(reply.value.as_str().map(str::to_string))
    }

    /// Current value of the single input-like match
    pub async fn input_value(&self) -> ProbeResult<String> {
        let reply = self.resolve_one(QueryOp::InputValue).await?;
        reply
            .value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ProbeError::Input {
                message: format!("{} is not an input, textarea or select", self.description()),
            })
    }

    /// Wait for the chain to reach `state` within the action timeout
    pub async fn wait_for(&self, state: ElementState) -> ProbeResult<()> {
        let this = self;
        let what = format!("{} to be {state}", self.description());
        poll_until(
            &what,
            self.timeouts.action,
            self.timeouts.poll_interval,
            move || async move {
                let reply = this.probe(QueryOp::Describe { scroll: false }).await?;
                let reached = match (reply.count, state) {
                    (0, ElementState::Detached | ElementState::Hidden) => true,
                    (0, _) => false,
                    (1, ElementState::Attached) => true,
                    (1, ElementState::Detached) => false,
                    (1, ElementState::Visible) => reply.visible,
                    (1, ElementState::Hidden) => !reply.visible,
                    (n, _) => return Err(this.strict_violation(n)),
                };
                Ok(reached.then_some(()))
            },
        )
        .await
    }

    // ------------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------------

    /// Left click the center of the single match
    pub async fn click(&self) -> ProbeResult<()> {
        self.click_with(ClickOptions::default()).await
    }

    /// Click with explicit button, count and force
    pub async fn click_with(&self, options: ClickOptions) -> ProbeResult<()> {
        let bounds = self.wait_actionable(options.force).await?;
        let center = bounds.center();
        tracing::debug!(locator = %self.description(), button = %options.button, "click");
        self.driver
            .dispatch_mouse(MouseEvent::moved(center.x, center.y))
            .await?;
        for n in 1..=options.click_count {
            self.driver
                .dispatch_mouse(MouseEvent::pressed(center.x, center.y, options.button, n))
                .await?;
            self.driver
                .dispatch_mouse(MouseEvent::released(center.x, center.y, options.button, n))
                .await?;
        }
        Ok(())
    }

    /// Move the pointer over the single match
    pub async fn hover(&self) -> ProbeResult<()> {
        let center = self.wait_actionable(false).await?.center();
        tracing::debug!(locator = %self.description(), "hover");
        self.driver
            .dispatch_mouse(MouseEvent::moved(center.x, center.y))
            .await
    }

    /// Replace the value of an editable element
    pub async fn fill(&self, value: &str) -> ProbeResult<()> {
        self.wait_actionable(false).await?;
        self.resolve_one(QueryOp::SelectText).await?;
        tracing::debug!(locator = %self.description(), value, "fill");
        if value.is_empty() {
            self.driver.press_key(&KeyDefinition::parse("Delete")?).await
        } else {
            self.driver.insert_text(value).await
        }
    }

    /// Focus the single match and press `key` ("Enter", "a", ...)
    pub async fn press(&self, key: &str) -> ProbeResult<()> {
        let key = KeyDefinition::parse(key)?;
        self.resolve_one(QueryOp::Focus).await?;
        self.driver.press_key(&key).await
    }

    /// Focus the single match and type `text` one key at a time
    pub async fn type_text(&self, text: &str) -> ProbeResult<()> {
        self.resolve_one(QueryOp::Focus).await?;
        for c in text.chars() {
            self.driver.press_key(&KeyDefinition::for_char(c)).await?;
        }
        Ok(())
    }

    /// Select options of a `<select>` by value or label; returns selected values
    pub async fn select_option(&self, values: &[&str]) -> ProbeResult<Vec<String>> {
        self.wait_actionable(false).await?;
        let reply = self
            .resolve_one(QueryOp::SelectOption {
                values: values.iter().map(|v| (*v).to_string()).collect(),
            })
            .await?;
        let selected: Vec<String> = if reply.value.is_null() {
            Vec::new()
        } else {
            serde_json::from_value(reply.value)?
        };
        if selected.is_empty() {
            return Err(ProbeError::Input {
                message: format!("no option of {} matches {values:?}", self.description()),
            });
        }
        Ok(selected)
    }

    /// Drag the single match onto `target`
    pub async fn drag_to(&self, target: &Self) -> ProbeResult<()> {
        self.drag_to_with(target, DragOptions::default()).await
    }

    /// Drag with options
    ///
    /// The pointer is pressed on the source center, moved in
    /// [`DRAG_MOVE_STEPS`] steps to the target center and released there, which
    /// is what mouse-driven drop targets listen for. Natively draggable
    /// sources then also get the HTML5 drag events, since CDP mouse input
    /// does not start a native drag session.
    pub async fn drag_to_with(&self, target: &Self, options: DragOptions) -> ProbeResult<()> {
        let from = self.wait_actionable(options.force).await?.center();
        let to = target.wait_actionable(true).await?.center();
        tracing::debug!(source = %self.description(), target = %target.description(), "drag");

        self.driver.dispatch_mouse(MouseEvent::moved(from.x, from.y)).await?;
        self.driver
            .dispatch_mouse(MouseEvent::pressed(from.x, from.y, MouseButton::Left, 1))
            .await?;
        for step in 1..=DRAG_MOVE_STEPS {
            let t = f64::from(step) / f64::from(DRAG_MOVE_STEPS);
            let x = (to.x - from.x).mul_add(t, from.x);
            let y = (to.y - from.y).mul_add(t, from.y);
            self.driver.dispatch_mouse(MouseEvent::moved(x, y)).await?;
        }
        self.driver
            .dispatch_mouse(MouseEvent::released(to.x, to.y, MouseButton::Left, 1))
            .await?;

        self.dispatch_html5_drag(target).await
    }

    async fn dispatch_html5_drag(&self, target: &Self) -> ProbeResult<()> {
        let this = self;
        let what = format!("{} to drop onto {}", self.description(), target.description());
        let op = QueryOp::DragTo {
            target: target.steps.clone(),
        };
        poll_until(
            &what,
            self.timeouts.action,
            self.timeouts.poll_interval,
            move || {
                let op = op.clone();
                async move {
                    let reply = this.probe(op).await?;
                    match (reply.count, reply.target_count) {
                        (0, _) | (1, None | Some(0)) => Ok(None),
                        (1, Some(1)) => Ok(Some(())),
                        (1, Some(n)) => Err(target.strict_violation(n)),
                        (n, _) => Err(this.strict_violation(n)),
                    }
                }
            },
        )
        .await
    }

    /// Scroll the single match into view
    pub async fn scroll_into_view_if_needed(&self) -> ProbeResult<()> {
        self.resolve_one(QueryOp::Describe { scroll: true }).await?;
        Ok(())
    }

    /// Set the files of the single `<input type=file>` match
    pub async fn set_input_files(&self, files: &[PathBuf]) -> ProbeResult<()> {
        self.resolve_one(QueryOp::Count).await?;
        for file in files {
            if !file.is_file() {
                return Err(ProbeError::Input {
                    message: format!("upload file {} does not exist", file.display()),
                });
            }
        }
        let query = ElementQuery::new(self.steps.clone(), QueryOp::Element);
        self.driver.set_input_files(&query, files).await
    }

    /// Call `function(element, arg)` in the page and deserialize the result
    pub async fn evaluate<T, A>(&self, function: &str, arg: A) -> ProbeResult<T>
    where
        T: DeserializeOwned,
        A: Serialize,
    {
        let reply = self
            .resolve_one(QueryOp::Evaluate {
                function: function.to_string(),
                arg: serde_json::to_value(arg)?,
            })
            .await?;
        Ok(serde_json::from_value(reply.value)?)
    }
}

// ============================================================================
// Frame locator
// ============================================================================

/// Scope into iframe documents
///
/// Wraps a locator for the iframe element(s); [`FrameLocator::locator`]
/// continues the chain inside their documents.
#[derive(Debug, Clone)]
pub struct FrameLocator {
    inner: Locator,
}

impl FrameLocator {
    pub(crate) fn new(driver: Arc<dyn PageDriver>, selector: &str, timeouts: Timeouts) -> Self {
        Self {
            inner: Locator::new(driver, selector, timeouts),
        }
    }

    /// Elements inside the frame document matching `selector`
    #[must_use]
    pub fn locator(&self, selector: &str) -> Locator {
        self.inner
            .derive(std::iter::once(Step::Frame).chain(select_steps(selector)))
    }

    /// Nested iframes inside the frame document
    #[must_use]
    pub fn frame_locator(&self, selector: &str) -> Self {
        Self {
            inner: self.locator(selector),
        }
    }

    /// Only the first matching iframe
    #[must_use]
    pub fn first(&self) -> Self {
        self.nth(0)
    }

    /// Only the iframe at `index`
    #[must_use]
    pub fn nth(&self, index: i64) -> Self {
        Self {
            inner: self.inner.nth(index),
        }
    }

    /// The iframe element itself
    #[must_use]
    pub fn owner(&self) -> Locator {
        self.inner.clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::driver::MockDriver;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fast() -> Timeouts {
        Timeouts::default()
            .with_action(Duration::from_millis(50))
            .with_poll_interval(Duration::from_millis(1))
    }

    fn locator_on(driver: MockDriver, selector: &str) -> (Locator, Arc<MockDriver>) {
        let driver = Arc::new(driver);
        (Locator::new(driver.clone(), selector, fast()), driver)
    }

    mod chain_tests {
        use super::*;

        #[test]
        fn test_filter_then_child() {
            let (tags, _) = locator_on(MockDriver::new(), ".content ul li");
            let remove = tags.filter_has_text("node").locator("i");
            assert_eq!(
                remove.description(),
                ".content ul li >> has-text=\"node\" >> i"
            );
        }

        #[test]
        fn test_nested_frames() {
            let driver: Arc<dyn PageDriver> = Arc::new(MockDriver::new());
            let button = FrameLocator::new(driver, "iframe", fast())
                .first()
                .frame_locator("iframe")
                .locator(r#"//a[text()="Click Me"]"#);
            assert_eq!(
                button.description(),
                "iframe >> nth=0 >> internal:control=enter-frame >> iframe >> \
                 internal:control=enter-frame >> //a[text()=\"Click Me\"]"
            );
        }

        #[test]
        fn test_shadow_and_last() {
            let (host, _) = locator_on(MockDriver::new(), "progress-bar");
            let button = host.shadow_locator("button.btn-green-outline").last();
            assert_eq!(
                button.description(),
                "progress-bar >> internal:shadow-root >> button.btn-green-outline >> nth=-1"
            );
        }

        #[test]
        fn test_with_timeout_only_changes_action() {
            let (loc, _) = locator_on(MockDriver::new(), "#x");
            let slow = loc.with_timeout(Duration::from_secs(15));
            assert_eq!(slow.timeouts().action, Duration::from_secs(15));
            assert_eq!(slow.timeouts().expect, loc.timeouts().expect);
        }
    }

    mod action_tests {
        use super::*;

        #[tokio::test]
        async fn test_click_hits_center() {
            let (button, driver) = locator_on(MockDriver::new(), "#btn");
            button.click().await.unwrap();
            assert_eq!(
                driver.calls(),
                vec![
                    "query:describe:#btn",
                    "mouse:moved:none",
                    "mouse:pressed:left",
                    "mouse:released:left",
                ]
            );
        }

        #[tokio::test]
        async fn test_right_click() {
            let (target, driver) = locator_on(MockDriver::new(), "#target");
            target.click_with(ClickOptions::right()).await.unwrap();
            assert!(driver.was_called("mouse:pressed:right"));
        }

        #[tokio::test]
        async fn test_click_waits_for_element() {
            let polls = Arc::new(AtomicUsize::new(0));
            let seen = polls.clone();
            let (button, driver) = locator_on(
                MockDriver::new().with_responder(move |q| {
                    if seen.fetch_add(1, Ordering::SeqCst) < 2 {
                        Ok(json!({"count": 0}))
                    } else {
                        Ok(MockDriver::default_reply(q))
                    }
                }),
                "#late",
            );
            button.click().await.unwrap();
            assert_eq!(driver.count_calls("query:describe"), 3);
        }

        #[tokio::test]
        async fn test_click_on_hidden_element_times_out() {
            let (button, driver) = locator_on(
                MockDriver::new().with_responder(|_| Ok(json!({"count": 1, "visible": false, "enabled": true}))),
                "#hidden",
            );
            let err = button.click().await.unwrap_err();
            assert!(err.is_timeout());
            assert!(!driver.was_called("mouse"));
        }

        #[tokio::test]
        async fn test_force_click_skips_visibility() {
            let (button, driver) = locator_on(
                MockDriver::new().with_responder(|_| {
                    Ok(json!({"count": 1, "visible": false, "enabled": true,
                              "box": {"x": 0.0, "y": 0.0, "width": 10.0, "height": 10.0}}))
                }),
                "#covered",
            );
            button
                .click_with(ClickOptions::default().with_force())
                .await
                .unwrap();
            assert!(driver.was_called("mouse:released:left"));
        }

        #[tokio::test]
        async fn test_strict_mode_fails_fast() {
            let (items, _) = locator_on(
                MockDriver::new().with_responder(|_| Ok(json!({"count": 3}))),
                "li",
            );
            let err = items.click().await.unwrap_err();
            assert!(matches!(err, ProbeError::StrictModeViolation { count: 3, .. }));
        }

        #[tokio::test]
        async fn test_fill_inserts_text() {
            let (input, driver) = locator_on(MockDriver::new(), "input.code");
            input.fill("9").await.unwrap();
            let calls = driver.calls();
            assert!(calls.contains(&"query:selectText:input.code".to_string()));
            assert_eq!(calls.last().unwrap(), "insert_text:9");
        }

        #[tokio::test]
        async fn test_fill_empty_deletes() {
            let (input, driver) = locator_on(MockDriver::new(), "#textbox");
            input.fill("").await.unwrap();
            assert_eq!(driver.calls().last().unwrap(), "key:Delete");
        }

        #[tokio::test]
        async fn test_type_text_presses_each_char() {
            let (input, driver) = locator_on(MockDriver::new(), "#textbox");
            input.type_text("Hi!").await.unwrap();
            assert_eq!(driver.count_calls("key:"), 3);
            assert!(driver.was_called("query:focus"));
        }

        #[tokio::test]
        async fn test_press_unknown_key() {
            let (input, _) = locator_on(MockDriver::new(), "#textbox");
            assert!(input.press("Hyper").await.is_err());
        }

        #[tokio::test]
        async fn test_select_option_reports_no_match() {
            let (select, _) = locator_on(
                MockDriver::new().with_responder(|q| match q.op {
                    QueryOp::SelectOption { .. } => Ok(json!({"count": 1, "value": []})),
                    _ => Ok(MockDriver::default_reply(q)),
                }),
                "select.input-type",
            );
            let err = select.select_option(&["nonsense"]).await.unwrap_err();
            assert!(matches!(err, ProbeError::Input { .. }));
        }

        #[tokio::test]
        async fn test_drag_waits_for_target() {
            let polls = Arc::new(AtomicUsize::new(0));
            let seen = polls.clone();
            let driver = Arc::new(MockDriver::new().with_responder(move |q| match q.op {
                QueryOp::DragTo { .. } if seen.fetch_add(1, Ordering::SeqCst) == 0 => {
                    Ok(json!({"count": 1, "targetCount": 0}))
                }
                _ => Ok(MockDriver::default_reply(q)),
            }));
            let source = Locator::new(driver.clone(), "#angular", fast());
            let target = Locator::new(driver.clone(), "#droparea", fast());
            source.drag_to(&target).await.unwrap();
            assert_eq!(driver.count_calls("query:dragTo"), 2);
        }

        #[tokio::test]
        async fn test_drag_presses_moves_and_releases() {
            let driver = Arc::new(MockDriver::new());
            let source = Locator::new(driver.clone(), "#angular", fast());
            let target = Locator::new(driver.clone(), "#droparea", fast());
            source.drag_to(&target).await.unwrap();

            let mouse: Vec<String> = driver
                .calls()
                .into_iter()
                .filter(|c| c.starts_with("mouse:"))
                .collect();
            let mut expected = vec!["mouse:moved:none", "mouse:pressed:left"];
            expected.extend(std::iter::repeat("mouse:moved:none").take(DRAG_MOVE_STEPS as usize));
            expected.push("mouse:released:left");
            assert_eq!(mouse, expected);

            let calls = driver.calls();
            let released = calls.iter().position(|c| c == "mouse:released:left").unwrap();
            let html5 = calls.iter().position(|c| c.starts_with("query:dragTo")).unwrap();
            assert!(html5 > released);
        }

        #[tokio::test]
        async fn test_drag_needs_a_target_box() {
            let driver = Arc::new(MockDriver::new().with_responder(|q| {
                if q.description().contains("missing") {
                    Ok(json!({"count": 0}))
                } else {
                    Ok(MockDriver::default_reply(q))
                }
            }));
            let source = Locator::new(driver.clone(), "#angular", fast());
            let target = Locator::new(driver.clone(), "#missing", fast());
            let err = source.drag_to(&target).await.unwrap_err();
            assert!(err.is_timeout());
            assert!(!driver.was_called("mouse:pressed"));
        }

        #[tokio::test]
        async fn test_drag_target_strictness() {
            let driver = Arc::new(MockDriver::new().with_responder(|q| match q.op {
                QueryOp::DragTo { .. } => Ok(json!({"count": 1, "targetCount": 2})),
                _ => Ok(MockDriver::default_reply(q)),
            }));
            let source = Locator::new(driver.clone(), "li", fast());
            let target = Locator::new(driver, ".drop", fast());
            let err = source
                .drag_to_with(&target, DragOptions { force: true })
                .await
                .unwrap_err();
            assert!(
                matches!(err, ProbeError::StrictModeViolation { ref selector, count: 2 } if selector == ".drop")
            );
        }

        #[tokio::test]
        async fn test_set_input_files_checks_existence() {
            let (input, driver) = locator_on(MockDriver::new(), "#file-input");
            let err = input
                .set_input_files(&[PathBuf::from("/definitely/missing.png")])
                .await
                .unwrap_err();
            assert!(matches!(err, ProbeError::Input { .. }));
            assert!(!driver.was_called("set_input_files"));

            let dir = tempfile::tempdir().unwrap();
            let file = dir.path().join("uploadFile.png");
            std::fs::write(&file, b"png").unwrap();
            input.set_input_files(&[file]).await.unwrap();
            assert!(driver.was_called("set_input_files:#file-input:uploadFile.png"));
        }
    }

    mod read_tests {
        use super::*;

        #[tokio::test]
        async fn test_text_content() {
            let (header, _) = locator_on(
                MockDriver::new().with_responder(|_| Ok(json!({"count": 1, "value": " About "}))),
                "//h1",
            );
            assert_eq!(header.text_content().await.unwrap().as_deref(), Some(" About "));
        }

        #[tokio::test]
        async fn test_is_visible_absent_is_false() {
            let (msg, _) = locator_on(
                MockDriver::new().with_responder(|_| Ok(json!({"count": 0}))),
                "#msg",
            );
            assert!(!msg.is_visible().await.unwrap());
            assert_eq!(msg.count().await.unwrap(), 0);
        }

        #[tokio::test]
        async fn test_all_inner_texts() {
            let (items, _) = locator_on(
                MockDriver::new().with_responder(|_| Ok(json!({"count": 2, "value": ["HTML", "CSS"]}))),
                "ul li",
            );
            assert_eq!(items.all_inner_texts().await.unwrap(), vec!["HTML", "CSS"]);
        }

        #[tokio::test]
        async fn test_evaluate_returns_value() {
            let (bar, _) = locator_on(
                MockDriver::new().with_responder(|_| Ok(json!({"count": 1, "value": "95"}))),
                "progress-bar",
            );
            let percent: String = bar
                .evaluate("(el) => el.getAttribute('percent')", ())
                .await
                .unwrap();
            assert_eq!(percent, "95");
        }

        #[tokio::test]
        async fn test_wait_for_hidden_when_absent() {
            let (spinner, _) = locator_on(
                MockDriver::new().with_responder(|_| Ok(json!({"count": 0}))),
                ".spinner",
            );
            spinner.wait_for(ElementState::Hidden).await.unwrap();
            assert!(spinner.wait_for(ElementState::Attached).await.unwrap_err().is_timeout());
        }
    }
}
