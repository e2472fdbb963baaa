//! Blocking prompts and short-lived notices.

#![warn(missing_docs)]

use std::fmt;

use futures::future::BoxFuture;

mod error;
pub mod pending;
/// Platform-specific implementations.
pub mod sys;

pub use error::DialogError;
pub use pending::PendingPrompts;

/// A modal two-button prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    /// Message content of the dialog.
    pub message: String,
    /// Label of the button that confirms.
    pub confirm_label: String,
    /// Label of the button that dismisses.
    pub cancel_label: String,
}

impl Dialog {
    /// Create a prompt with the given message and button labels.
    pub fn new(
        message: impl Into<String>,
        confirm_label: impl Into<String>,
        cancel_label: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            confirm_label: confirm_label.into(),
            cancel_label: cancel_label.into(),
        }
    }
}

/// How long a notice stays on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoticeDuration {
    /// About two seconds.
    #[default]
    Short,
    /// About three and a half seconds.
    Long,
}

impl NoticeDuration {
    /// Display time in milliseconds.
    #[must_use]
    pub const fn millis(self) -> u32 {
        match self {
            Self::Short => 2000,
            Self::Long => 3500,
        }
    }
}

/// A transient, non-blocking message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Text of the notice.
    pub message: String,
    /// Display duration.
    pub duration: NoticeDuration,
}

impl Notice {
    /// A short notice.
    pub fn short(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            duration: NoticeDuration::Short,
        }
    }
}

/// A platform dialog service.
pub trait DialogBackend: Send + Sync + fmt::Debug {
    /// Show a prompt and resolve to `true` if the user confirmed.
    fn confirm(&self, dialog: Dialog) -> BoxFuture<'_, Result<bool, DialogError>>;

    /// Show a notice without waiting for it to disappear.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform refused to show the notice.
    fn notify(&self, notice: Notice) -> Result<(), DialogError>;

    /// Resolve every open prompt as [`DialogError::Dismissed`] and refuse new
    /// ones. Called when the host goes away.
    fn close(&self) {}
}
