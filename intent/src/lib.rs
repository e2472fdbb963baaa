//! Outbound intents.
//!
//! An [`Intent`] asks the OS to hand something to another application: a
//! `geo:` URI for a map app, or the system location settings screen.

#![warn(missing_docs)]

use std::fmt;

use pinpoint_location::Coordinate;
use thiserror::Error;

/// Platform-specific implementations.
pub mod sys;

/// `Intent.ACTION_VIEW`.
pub const ACTION_VIEW: &str = "android.intent.action.VIEW";

/// `Settings.ACTION_LOCATION_SOURCE_SETTINGS`.
pub const ACTION_LOCATION_SOURCE_SETTINGS: &str = "android.settings.LOCATION_SOURCE_SETTINGS";

/// Package of the Google Maps application.
pub const GOOGLE_MAPS_PACKAGE: &str = "com.google.android.apps.maps";

/// A `geo:<lat>,<long>` URI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoUri(pub Coordinate);

impl fmt::Display for GeoUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "geo:{}", self.0)
    }
}

/// Something to hand off to the OS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// View a URI, optionally in one specific application package.
    View {
        /// The URI to open.
        uri: String,
        /// Package that should handle it; `None` lets the OS choose.
        package: Option<String>,
    },
    /// The system screen where location services are switched on.
    LocationSettings,
}

impl Intent {
    /// View `coordinate` in a map application.
    pub fn geo(coordinate: Coordinate, package: Option<impl Into<String>>) -> Self {
        Self::View {
            uri: GeoUri(coordinate).to_string(),
            package: package.map(Into::into),
        }
    }

    /// The action string the intent carries on Android.
    #[must_use]
    pub const fn action(&self) -> &'static str {
        match self {
            Self::View { .. } => ACTION_VIEW,
            Self::LocationSettings => ACTION_LOCATION_SOURCE_SETTINGS,
        }
    }
}

/// Errors that can occur when launching an intent.
#[derive(Error, Debug)]
pub enum IntentError {
    /// No application can handle the intent.
    #[error("no application can handle {0}")]
    NoHandler(String),
    /// The intent has no equivalent on this platform.
    #[error("not supported on this platform: {0}")]
    NotSupported(String),
    /// Spawning the handler failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// An error reported by the platform.
    #[error("platform error: {0}")]
    Platform(String),
}

/// Dispatches intents to the OS.
pub trait Launcher: Send + Sync + fmt::Debug {
    /// Launch `intent`.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS could not start a handler.
    fn launch(&self, intent: &Intent) -> Result<(), IntentError>;
}
