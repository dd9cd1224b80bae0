//! Web-first assertions: `expect(&locator).to_be_visible().await?`.
//!
//! An assertion re-resolves its locator until the expectation holds or the
//! expect timeout runs out. The failure message carries the last observed
//! state.

use crate::locator::Locator;
use crate::query::QueryOp;
use crate::result::{ProbeError, ProbeResult};
use futures::future::BoxFuture;
use std::fmt::Debug;
use std::future::IntoFuture;
use std::time::Duration;
use tokio::time::Instant;

/// Start an assertion on `locator`
#[must_use]
pub fn expect(locator: &Locator) -> Expect {
    Expect::new(locator.clone())
}

/// Assertion builder for a locator
#[derive(Debug, Clone)]
pub struct Expect {
    locator: Locator,
    timeout: Duration,
    message: Option<String>,
}

impl Expect {
    /// Create a new expectation for a locator
    #[must_use]
    pub fn new(locator: Locator) -> Self {
        let timeout = locator.timeouts().expect;
        Self {
            locator,
            timeout,
            message: None,
        }
    }

    /// Override the expect timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Prefix failures with `message`
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    fn assertion(&self, expectation: Expectation) -> ExpectAssertion {
        ExpectAssertion {
            locator: self.locator.clone(),
            expectation,
            timeout: self.timeout,
            message: self.message.clone(),
        }
    }

    /// Assert the element has exactly this text (whitespace-normalized)
    pub fn to_have_text(&self, expected: impl Into<String>) -> ExpectAssertion {
        self.assertion(Expectation::HasText(expected.into()))
    }

    /// Assert the element's text contains `text`
    pub fn to_contain_text(&self, text: impl Into<String>) -> ExpectAssertion {
        self.assertion(Expectation::ContainsText(text.into()))
    }

    /// Assert the element is visible
    pub fn to_be_visible(&self) -> ExpectAssertion {
        self.assertion(Expectation::Visible)
    }

    /// Assert the element is hidden or absent
    pub fn to_be_hidden(&self) -> ExpectAssertion {
        self.assertion(Expectation::Hidden)
    }

    /// Alias of [`Expect::to_be_hidden`]
    pub fn not_to_be_visible(&self) -> ExpectAssertion {
        self.to_be_hidden()
    }

    /// Assert the element count
    pub fn to_have_count(&self, count: usize) -> ExpectAssertion {
        self.assertion(Expectation::Count(count))
    }

    /// Assert an attribute value
    pub fn to_have_attribute(&self, name: impl Into<String>, value: impl Into<String>) -> ExpectAssertion {
        self.assertion(Expectation::Attribute {
            name: name.into(),
            value: value.into(),
        })
    }
}

/// What an assertion waits for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expectation {
    /// Exact text
    HasText(String),
    /// Substring of the text
    ContainsText(String),
    /// Rendered
    Visible,
    /// Not rendered or absent
    Hidden,
    /// Number of matches
    Count(usize),
    /// Attribute equals value
    Attribute {
        /// Attribute name
        name: String,
        /// Expected value
        value: String,
    },
}

impl Expectation {
    fn describe(&self) -> String {
        match self {
            Self::HasText(text) => format!("to have text {text:?}"),
            Self::ContainsText(text) => format!("to contain text {text:?}"),
            Self::Visible => "to be visible".to_string(),
            Self::Hidden => "to be hidden".to_string(),
            Self::Count(n) => format!("to have count {n}"),
            Self::Attribute { name, value } => format!("to have attribute {name}={value:?}"),
        }
    }
}

/// Outcome of one poll
enum Observation {
    Pass,
    Fail(String),
}

fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A pending assertion; `.await` it (or call [`ExpectAssertion::verify`])
#[derive(Debug, Clone)]
pub struct ExpectAssertion {
    locator: Locator,
    expectation: Expectation,
    timeout: Duration,
    message: Option<String>,
}

impl ExpectAssertion {
    /// The expectation being checked
    #[must_use]
    pub const fn expectation(&self) -> &Expectation {
        &self.expectation
    }

    async fn observe(&self) -> ProbeResult<Observation> {
        let locator = &self.locator;
        let observation = match &self.expectation {
            Expectation::Visible | Expectation::Hidden => {
                let reply = locator.probe(QueryOp::Describe { scroll: false }).await?;
                let visible = match reply.count {
                    0 => false,
                    1 => reply.visible,
                    n => return Err(locator.strict_violation(n)),
                };
                let want_visible = self.expectation == Expectation::Visible;
                if visible == want_visible {
                    Observation::Pass
                } else if reply.count == 0 {
                    Observation::Fail("no matching element".to_string())
                } else {
                    Observation::Fail(if visible { "visible" } else { "hidden" }.to_string())
                }
            }
            Expectation::HasText(expected) | Expectation::ContainsText(expected) => {
                let reply = locator.probe(QueryOp::TextContent).await?;
                match reply.count {
                    0 => Observation::Fail("no matching element".to_string()),
                    1 => {
                        let actual = normalize(reply.value.as_str().unwrap_or_default());
                        let wanted = normalize(expected);
                        let holds = if matches!(self.expectation, Expectation::HasText(_)) {
                            actual == wanted
                        } else {
                            actual.contains(&wanted)
                        };
                        if holds {
                            Observation::Pass
                        } else {
                            Observation::Fail(format!("{actual:?}"))
                        }
                    }
                    n => return Err(locator.strict_violation(n)),
                }
            }
            Expectation::Count(expected) => {
                let count = locator.probe(QueryOp::Count).await?.count;
                if count == *expected {
                    Observation::Pass
                } else {
                    Observation::Fail(format!("{count} elements"))
                }
            }
            Expectation::Attribute { name, value } => {
                let reply = locator
                    .probe(QueryOp::Attribute { name: name.clone() })
                    .await?;
                match (reply.count, reply.value.as_str()) {
                    (0, _) => Observation::Fail("no matching element".to_string()),
                    (1, Some(actual)) if actual == value => Observation::Pass,
                    (1, actual) => Observation::Fail(format!("{actual:?}")),
                    (n, _) => return Err(locator.strict_violation(n)),
                }
            }
        };
        Ok(observation)
    }

    /// Poll until the expectation holds
    pub async fn verify(self) -> ProbeResult<()> {
        let interval = self.locator.timeouts().poll_interval;
        let deadline = Instant::now() + self.timeout;
        let mut last = "nothing observed".to_string();
        loop {
            match self.observe().await {
                Ok(Observation::Pass) => return Ok(()),
                Ok(Observation::Fail(actual)) => last = actual,
                Err(ProbeError::Script { message }) => last = format!("script error: {message}"),
                Err(e) => return Err(e),
            }
            if Instant::now() >= deadline {
                return Err(self.failure(&last));
            }
            tokio::time::sleep(interval).await;
        }
    }

    fn failure(&self, last: &str) -> ProbeError {
        let prefix = self
            .message
            .as_deref()
            .map(|m| format!("{m}: "))
            .unwrap_or_default();
        ProbeError::AssertionFailed {
            message: format!(
                "{prefix}expected {} {}, got {last} after {}ms",
                self.locator.description(),
                self.expectation.describe(),
                self.timeout.as_millis()
            ),
        }
    }
}

impl IntoFuture for ExpectAssertion {
    type Output = ProbeResult<()>;
    type IntoFuture = BoxFuture<'static, ProbeResult<()>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.verify())
    }
}

/// Checks on values already read off the page
///
/// Each check fails with [`ProbeError::AssertionFailed`] prefixed by `message`.
#[derive(Debug)]
pub struct Assertion;

impl Assertion {
    fn fail(message: &str, detail: String) -> ProbeError {
        ProbeError::AssertionFailed {
            message: format!("{message}: {detail}"),
        }
    }

    /// `actual` equals `expected`
    pub fn equals<T, U>(actual: &T, expected: &U, message: &str) -> ProbeResult<()>
    where
        T: PartialEq<U> + Debug + ?Sized,
        U: Debug + ?Sized,
    {
        if actual == expected {
            Ok(())
        } else {
            Err(Self::fail(message, format!("expected {expected:?}, got {actual:?}")))
        }
    }

    /// `haystack` contains `needle`
    pub fn contains(haystack: &str, needle: &str, message: &str) -> ProbeResult<()> {
        if haystack.contains(needle) {
            Ok(())
        } else {
            Err(Self::fail(message, format!("expected {haystack:?} to contain {needle:?}")))
        }
    }

    /// `actual` is within `epsilon` of `expected`
    pub fn approx_eq(actual: f64, expected: f64, epsilon: f64, message: &str) -> ProbeResult<()> {
        if (actual - expected).abs() < epsilon {
            Ok(())
        } else {
            Err(Self::fail(message, format!("expected {expected} ± {epsilon}, got {actual}")))
        }
    }

    /// `condition` holds
    pub fn is_true(condition: bool, message: &str) -> ProbeResult<()> {
        if condition {
            Ok(())
        } else {
            Err(Self::fail(message, "expected true".to_string()))
        }
    }
}
