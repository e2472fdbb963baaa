use thiserror::Error;

use crate::dialog::DialogError;
use crate::intent::IntentError;
use crate::location::LocationError;
use crate::permission::PermissionError;

/// Errors surfaced by the controller and its runtime.
#[derive(Error, Debug)]
pub enum Error {
    /// A location service failure.
    #[error(transparent)]
    Location(#[from] LocationError),

    /// A permission request failure.
    #[error(transparent)]
    Permission(#[from] PermissionError),

    /// A prompt or notice failure.
    #[error(transparent)]
    Dialog(#[from] DialogError),

    /// An intent could not be launched.
    #[error(transparent)]
    Intent(#[from] IntentError),

    /// The configuration document is invalid.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// The controller thread is gone.
    #[error("controller runtime has shut down")]
    RuntimeClosed,

    /// The controller thread could not be started.
    #[error("failed to start controller thread: {0}")]
    Spawn(#[source] std::io::Error),
}
