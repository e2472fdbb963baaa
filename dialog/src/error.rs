use thiserror::Error;

/// Errors that can occur when using dialogs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DialogError {
    /// The dialog was torn down before the user answered.
    #[error("dialog dismissed before an answer was given")]
    Dismissed,

    /// An error occurred in the underlying platform implementation.
    #[error("platform error: {0}")]
    PlatformError(String),

    /// The requested feature is not supported on this platform.
    #[error("not supported: {0}")]
    NotSupported(String),
}
