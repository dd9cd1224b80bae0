//! Key definitions for synthesized keyboard input.

use crate::result::{ProbeError, ProbeResult};

/// Everything the browser needs to synthesize one key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDefinition {
    /// DOM `key` value (e.g. "Enter", "a")
    pub key: String,
    /// DOM `code` value (e.g. "Enter", "KeyA")
    pub code: String,
    /// Windows virtual key code, 0 when there is none
    pub key_code: i64,
    /// Text produced by the key, if it types anything
    pub text: Option<String>,
}

/// Named keys: (key, code, virtual key code, text)
const NAMED_KEYS: &[(&str, &str, i64, Option<&str>)] = &[
    ("Enter", "Enter", 13, Some("\r")),
    ("Tab", "Tab", 9, None),
    ("Escape", "Escape", 27, None),
    ("Backspace", "Backspace", 8, None),
    ("Delete", "Delete", 46, None),
    ("ArrowUp", "ArrowUp", 38, None),
    ("ArrowDown", "ArrowDown", 40, None),
    ("ArrowLeft", "ArrowLeft", 37, None),
    ("ArrowRight", "ArrowRight", 39, None),
    ("Home", "Home", 36, None),
    ("End", "End", 35, None),
    ("PageUp", "PageUp", 33, None),
    ("PageDown", "PageDown", 34, None),
    ("Space", "Space", 32, Some(" ")),
];

impl KeyDefinition {
    /// Look up a key by its name (`"Enter"`) or a single character (`"a"`)
    pub fn parse(name: &str) -> ProbeResult<Self> {
        if let Some(&(key, code, key_code, text)) =
            NAMED_KEYS.iter().find(|(key, ..)| *key == name)
        {
            return Ok(Self {
                key: if key == "Space" { " " } else { key }.to_string(),
                code: code.to_string(),
                key_code,
                text: text.map(str::to_string),
            });
        }
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Self::for_char(c)),
            _ => Err(ProbeError::Input {
                message: format!("unknown key \"{name}\""),
            }),
        }
    }

    /// Key press that types one character
    #[must_use]
    pub fn for_char(c: char) -> Self {
        let (code, key_code) = if c.is_ascii_alphabetic() {
            let upper = c.to_ascii_uppercase();
            (format!("Key{upper}"), i64::from(upper as u8))
        } else if c.is_ascii_digit() {
            (format!("Digit{c}"), i64::from(c as u8))
        } else if c == ' ' {
            ("Space".to_string(), 32)
        } else {
            (String::new(), 0)
        };
        Self {
            key: c.to_string(),
            code,
            key_code,
            text: Some(c.to_string()),
        }
    }
}
