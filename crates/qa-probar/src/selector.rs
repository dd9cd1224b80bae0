//! Selector parsing.
//!
//! Page objects write selectors as plain strings, in the same dialect the
//! sites' test authors use:
//!
//! ```text
//! //h3[text()="Dynamic Table"]          XPath (also `(//a)[4]`, `xpath=...`)
//! tbody#tbody tr                        CSS (also `css=...`)
//! text=tag1 / text="Exact"              text engine (substring / exact)
//! h3:text("Fetching Data")              CSS + substring text pseudo-class
//! #nav a:text-is("About")               CSS + exact text pseudo-class
//! .content >> ul >> li                  chain, each part scoped to the last
//! ```

use serde::Serialize;
use std::fmt;

/// A single selector, one link of a chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Selector {
    /// CSS selector (e.g., "button.primary")
    Css {
        /// Selector source
        value: String,
    },
    /// XPath expression
    #[serde(rename = "xpath")]
    XPath {
        /// Expression source
        value: String,
    },
    /// Text content selector, matching the smallest element with the text
    Text {
        /// Text to match
        text: String,
        /// Exact (whitespace-normalized) match instead of case-insensitive substring
        exact: bool,
    },
    /// CSS selector filtered by its own text content
    CssWithText {
        /// Base CSS selector
        css: String,
        /// Text content to match
        text: String,
        /// Exact match instead of substring
        exact: bool,
    },
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css {
            value: selector.into(),
        }
    }

    /// Create an XPath selector
    #[must_use]
    pub fn xpath(expression: impl Into<String>) -> Self {
        Self::XPath {
            value: expression.into(),
        }
    }

    /// Create a substring text selector
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            exact: false,
        }
    }

    /// Create an exact text selector
    #[must_use]
    pub fn text_exact(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            exact: true,
        }
    }

    /// Parse one selector string into its chain of selectors.
    ///
    /// Never fails: anything not recognised as another engine is CSS, and the
    /// browser reports malformed CSS when the locator is resolved.
    #[must_use]
    pub fn parse(source: &str) -> Vec<Self> {
        split_chain(source)
            .into_iter()
            .filter(|part| !part.is_empty())
            .map(Self::parse_part)
            .collect()
    }

    fn parse_part(part: &str) -> Self {
        if let Some(rest) = part.strip_prefix("xpath=") {
            return Self::xpath(rest);
        }
        if let Some(rest) = part.strip_prefix("css=") {
            return Self::parse_css(rest);
        }
        if let Some(rest) = part.strip_prefix("text=") {
            return match unquote(rest) {
                Some(inner) => Self::text_exact(inner),
                None => Self::text(rest),
            };
        }
        if is_xpath(part) {
            return Self::xpath(part);
        }
        if let Some(inner) = unquote(part) {
            return Self::text_exact(inner);
        }
        Self::parse_css(part)
    }

    fn parse_css(source: &str) -> Self {
        for (pseudo, exact) in [(":text-is(", true), (":text(", false)] {
            let Some(at) = source.rfind(pseudo) else {
                continue;
            };
            let Some(arg) = source[at + pseudo.len()..].strip_suffix(')') else {
                continue;
            };
            let text = unquote(arg.trim()).unwrap_or_else(|| arg.trim().to_string());
            let css = source[..at].trim();
            return Self::CssWithText {
                css: if css.is_empty() { "*" } else { css }.to_string(),
                text,
                exact,
            };
        }
        Self::css(source)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css { value } | Self::XPath { value } => f.write_str(value),
            Self::Text { text, exact: false } => write!(f, "text={text}"),
            Self::Text { text, exact: true } => write!(f, "text=\"{text}\""),
            Self::CssWithText {
                css,
                text,
                exact: false,
            } => write!(f, "{css}:text(\"{text}\")"),
            Self::CssWithText {
                css,
                text,
                exact: true,
            } => write!(f, "{css}:text-is(\"{text}\")"),
        }
    }
}

/// XPath when it starts with `//` or `..`, optionally behind opening parens
fn is_xpath(part: &str) -> bool {
    part.trim_start_matches('(').starts_with("//") || part.starts_with("..")
}

/// Strip one level of matching single or double quotes
fn unquote(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return Some(s[1..s.len() - 1].to_string());
        }
    }
    None
}

/// Quote `text` as an XPath string literal
///
/// XPath 1.0 has no escapes, so text holding both quote kinds is spelled as
/// a `concat()` of pieces.
#[must_use]
pub fn xpath_literal(text: &str) -> String {
    if !text.contains('"') {
        return format!("\"{text}\"");
    }
    if !text.contains('\'') {
        return format!("'{text}'");
    }
    let pieces: Vec<String> = text
        .split('"')
        .map(|piece| format!("\"{piece}\""))
        .collect();
    format!("concat({})", pieces.join(", '\"', "))
}

/// Split on `>>` outside of quotes and brackets
fn split_chain(source: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut quote: Option<char> = None;
    let mut depth = 0usize;
    let mut start = 0;
    let mut chars = source.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '[' | '(') => depth += 1,
            (None, ']' | ')') => depth = depth.saturating_sub(1),
            (None, '>') if depth == 0 && matches!(chars.peek(), Some((_, '>'))) => {
                parts.push(source[start..i].trim());
                chars.next();
                start = i + 2;
            }
            _ => {}
        }
    }
    parts.push(source[start..].trim());
    parts
}
