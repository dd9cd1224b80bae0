//! JavaScript dialog handling (alert, confirm, prompt, beforeunload).
//!
//! A dialog blocks the page's script until it is answered, so the answer has
//! to be registered before the action that opens it. [`crate::Page::once_dialog`]
//! arms a one-shot handler and returns a [`PendingDialog`] resolving to the
//! dialog that was answered.

use crate::result::{ProbeError, ProbeResult};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Type of browser dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogType {
    /// Alert dialog (OK button only)
    Alert,
    /// Confirm dialog (OK/Cancel buttons)
    Confirm,
    /// Prompt dialog (text input + OK/Cancel)
    Prompt,
    /// Before unload dialog (Leave/Stay buttons)
    BeforeUnload,
}

impl DialogType {
    /// Map the protocol's dialog type name
    #[must_use]
    pub fn from_protocol(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "confirm" => Self::Confirm,
            "prompt" => Self::Prompt,
            "beforeunload" => Self::BeforeUnload,
            _ => Self::Alert,
        }
    }
}

impl std::fmt::Display for DialogType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Alert => write!(f, "alert"),
            Self::Confirm => write!(f, "confirm"),
            Self::Prompt => write!(f, "prompt"),
            Self::BeforeUnload => write!(f, "beforeunload"),
        }
    }
}

/// Answer given to a dialog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogAction {
    /// Accept (OK/Yes/Leave)
    Accept,
    /// Accept a prompt with input text
    AcceptWith(String),
    /// Dismiss (Cancel/No/Stay)
    Dismiss,
}

impl DialogAction {
    /// Whether the dialog is accepted
    #[must_use]
    pub const fn accepts(&self) -> bool {
        !matches!(self, Self::Dismiss)
    }

    /// Text typed into a prompt, if any
    #[must_use]
    pub fn prompt_text(&self) -> Option<&str> {
        match self {
            Self::AcceptWith(text) => Some(text),
            Self::Accept | Self::Dismiss => None,
        }
    }
}

/// A dialog that was opened and answered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dialog {
    dialog_type: DialogType,
    message: String,
    default_value: Option<String>,
    action: DialogAction,
}

impl Dialog {
    /// Record a handled dialog
    #[must_use]
    pub fn new(
        dialog_type: DialogType,
        message: impl Into<String>,
        default_value: Option<String>,
        action: DialogAction,
    ) -> Self {
        Self {
            dialog_type,
            message: message.into(),
            default_value: default_value.filter(|v| !v.is_empty()),
            action,
        }
    }

    /// Dialog type
    #[must_use]
    pub const fn dialog_type(&self) -> DialogType {
        self.dialog_type
    }

    /// Message shown by the page
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Default prompt value offered by the page
    #[must_use]
    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    /// How the dialog was answered
    #[must_use]
    pub const fn action(&self) -> &DialogAction {
        &self.action
    }
}

/// A one-shot dialog handler armed before the triggering action
pub struct PendingDialog {
    handled: BoxFuture<'static, ProbeResult<Dialog>>,
}

impl std::fmt::Debug for PendingDialog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingDialog").finish_non_exhaustive()
    }
}

impl PendingDialog {
    pub(crate) fn new(handled: BoxFuture<'static, ProbeResult<Dialog>>) -> Self {
        Self { handled }
    }

    /// Wait until the dialog has opened and been answered
    pub async fn handled(self, timeout: Duration) -> ProbeResult<Dialog> {
        tokio::time::timeout(timeout, self.handled)
            .await
            .map_err(|_| ProbeError::timeout("a JavaScript dialog", timeout))?
    }
}
