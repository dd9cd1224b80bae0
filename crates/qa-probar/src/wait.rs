//! Wait mechanisms shared by locators, assertions and page objects.
//!
//! Every wait in the suite is a bounded poll: a probe runs, and if it has not
//! produced a value the caller sleeps for the poll interval and tries again
//! until the timeout elapses.

use crate::result::{ProbeError, ProbeResult};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default timeout for element actions (30 seconds)
pub const DEFAULT_ACTION_TIMEOUT_MS: u64 = 30_000;

/// Default timeout for navigations (60 seconds)
pub const DEFAULT_NAVIGATION_TIMEOUT_MS: u64 = 60_000;

/// Default timeout for web-first assertions (5 seconds)
pub const DEFAULT_EXPECT_TIMEOUT_MS: u64 = 5_000;

/// Default polling interval (100ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

// =============================================================================
// LOAD STATE
// =============================================================================

/// Page load states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoadState {
    /// Wait for the `load` event to fire
    #[default]
    Load,
    /// Wait for `DOMContentLoaded`
    DomContentLoaded,
}

impl LoadState {
    /// Get the JavaScript event name for this load state
    #[must_use]
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::DomContentLoaded => "DOMContentLoaded",
        }
    }

    /// Expression that evaluates to `true` once the document reached this state
    #[must_use]
    pub const fn ready_expression(&self) -> &'static str {
        match self {
            Self::Load => "document.readyState === 'complete'",
            Self::DomContentLoaded => "document.readyState !== 'loading'",
        }
    }
}

impl std::fmt::Display for LoadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.event_name())
    }
}

// =============================================================================
// ELEMENT STATE
// =============================================================================

/// Element states a locator can be waited into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ElementState {
    /// At least one matching element is in the DOM
    Attached,
    /// No matching element is in the DOM
    Detached,
    /// The element is rendered with a non-empty box
    #[default]
    Visible,
    /// The element is missing or not rendered
    Hidden,
}

impl std::fmt::Display for ElementState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Attached => "attached",
            Self::Detached => "detached",
            Self::Visible => "visible",
            Self::Hidden => "hidden",
        };
        f.write_str(name)
    }
}

// =============================================================================
// TIMEOUTS
// =============================================================================

/// Timeout budgets carried by every page and locator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Budget for actionability waits (click, fill, hover)
    pub action: Duration,
    /// Budget for navigations and page/event waits
    pub navigation: Duration,
    /// Budget for web-first assertions
    pub expect: Duration,
    /// Delay between polls
    pub poll_interval: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            action: Duration::from_millis(DEFAULT_ACTION_TIMEOUT_MS),
            navigation: Duration::from_millis(DEFAULT_NAVIGATION_TIMEOUT_MS),
            expect: Duration::from_millis(DEFAULT_EXPECT_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

impl Timeouts {
    /// Set the action timeout
    #[must_use]
    pub const fn with_action(mut self, timeout: Duration) -> Self {
        self.action = timeout;
        self
    }

    /// Set the navigation timeout
    #[must_use]
    pub const fn with_navigation(mut self, timeout: Duration) -> Self {
        self.navigation = timeout;
        self
    }

    /// Set the assertion timeout
    #[must_use]
    pub const fn with_expect(mut self, timeout: Duration) -> Self {
        self.expect = timeout;
        self
    }

    /// Set the polling interval
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

// =============================================================================
// POLLING
// =============================================================================

/// Poll `probe` until it yields a value or `timeout` elapses.
///
/// Script errors are treated as transient: the page may be mid-navigation,
/// which destroys the execution context the probe ran in. Any other error
/// aborts the wait.
pub async fn poll_until<T, F, Fut>(
    what: &str,
    timeout: Duration,
    interval: Duration,
    mut probe: F,
) -> ProbeResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ProbeResult<Option<T>>>,
{
    let deadline = Instant::now() + timeout;
    loop {
        match probe().await {
            Ok(Some(value)) => return Ok(value),
            Ok(None) => {}
            Err(ProbeError::Script { message }) => {
                tracing::debug!(%what, %message, "probe failed, retrying");
            }
            Err(e) => return Err(e),
        }
        if Instant::now() >= deadline {
            return Err(ProbeError::timeout(what, timeout));
        }
        tokio::time::sleep(interval).await;
    }
}

/// Sleep for a fixed settle time.
///
/// Used where the application animates on a timer and exposes no condition
/// to poll for.
pub async fn settle(duration: Duration) {
    tracing::debug!(ms = duration.as_millis() as u64, "settling");
    tokio::time::sleep(duration).await;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    mod load_state_tests {
        use super::*;

        #[test]
        fn test_event_names() {
            assert_eq!(LoadState::Load.event_name(), "load");
            assert_eq!(LoadState::DomContentLoaded.event_name(), "DOMContentLoaded");
        }

        #[test]
        fn test_dom_content_loaded_accepts_interactive() {
            assert!(LoadState::DomContentLoaded
                .ready_expression()
                .contains("!== 'loading'"));
        }

        #[test]
        fn test_default_is_load() {
            assert_eq!(LoadState::default(), LoadState::Load);
        }
    }

    mod timeouts_tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let t = Timeouts::default();
            assert_eq!(t.action, Duration::from_secs(30));
            assert_eq!(t.navigation, Duration::from_secs(60));
            assert_eq!(t.expect, Duration::from_secs(5));
        }

        #[test]
        fn test_builders() {
            let t = Timeouts::default()
                .with_action(Duration::from_secs(1))
                .with_expect(Duration::from_secs(2))
                .with_poll_interval(Duration::from_millis(10));
            assert_eq!(t.action, Duration::from_secs(1));
            assert_eq!(t.expect, Duration::from_secs(2));
            assert_eq!(t.poll_interval, Duration::from_millis(10));
        }
    }

    mod poll_tests {
        use super::*;

        #[tokio::test]
        async fn test_returns_first_value() {
            let calls = Arc::new(AtomicUsize::new(0));
            let seen = calls.clone();
            let value = poll_until(
                "third call",
                Duration::from_secs(1),
                Duration::from_millis(1),
                || {
                    let seen = seen.clone();
                    async move {
                        let n = seen.fetch_add(1, Ordering::SeqCst) + 1;
                        Ok((n == 3).then_some(n))
                    }
                },
            )
            .await
            .unwrap();
            assert_eq!(value, 3);
            assert_eq!(calls.load(Ordering::SeqCst), 3);
        }

        #[tokio::test]
        async fn test_times_out() {
            let err = poll_until::<(), _, _>(
                "never",
                Duration::from_millis(20),
                Duration::from_millis(5),
                || async { Ok(None) },
            )
            .await
            .unwrap_err();
            assert!(err.is_timeout());
            assert!(err.to_string().contains("never"));
        }

        #[tokio::test]
        async fn test_script_errors_are_retried() {
            let calls = Arc::new(AtomicUsize::new(0));
            let seen = calls.clone();
            let value = poll_until(
                "recovers",
                Duration::from_secs(1),
                Duration::from_millis(1),
                || {
                    let seen = seen.clone();
                    async move {
                        if seen.fetch_add(1, Ordering::SeqCst) == 0 {
                            Err(ProbeError::Script {
                                message: "Execution context was destroyed".into(),
                            })
                        } else {
                            Ok(Some("ok"))
                        }
                    }
                },
            )
            .await
            .unwrap();
            assert_eq!(value, "ok");
        }

        #[tokio::test]
        async fn test_other_errors_abort() {
            let err = poll_until::<(), _, _>(
                "aborts",
                Duration::from_secs(1),
                Duration::from_millis(1),
                || async {
                    Err(ProbeError::Input {
                        message: "boom".into(),
                    })
                },
            )
            .await
            .unwrap_err();
            assert!(matches!(err, ProbeError::Input { .. }));
        }
    }
}
