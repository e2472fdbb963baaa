//! Last-known location access.
//!
//! This crate exposes the device's cached position fix and the enabled
//! state of its location providers behind the [`LocationBackend`] seam,
//! with native backends for Android and Linux.

#![warn(missing_docs)]

use std::fmt;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Platform-specific implementations.
pub mod sys;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90).
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180).
    pub longitude: f64,
}

impl Coordinate {
    /// Create a coordinate from latitude and longitude in degrees.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{}",
            format_degrees(self.latitude),
            format_degrees(self.longitude)
        )
    }
}

/// Format a degree value the way the platform prints doubles.
///
/// Integral values keep a single fractional digit (`0.0`, `100.0`); everything
/// else uses the shortest representation that round-trips.
#[must_use]
pub fn format_degrees(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// A single position fix reported by the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Name of the provider that produced the fix (`fused`, `gps`, ...).
    pub provider: String,
}

impl Position {
    /// The coordinate part of this fix.
    #[must_use]
    pub const fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// A source of position data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    /// Satellite-based positioning.
    Gps,
    /// Cell and Wi-Fi based positioning.
    Network,
}

impl Provider {
    /// Platform name of the provider.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gps => "gps",
            Self::Network => "network",
        }
    }
}

/// Enabled state of both location providers at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProviderAvailability {
    /// Whether the satellite provider is enabled.
    pub gps: bool,
    /// Whether the network provider is enabled.
    pub network: bool,
}

impl ProviderAvailability {
    /// Query both providers.
    ///
    /// A provider whose query fails counts as disabled, so the caller ends up
    /// prompting the user instead of surfacing an error.
    pub fn query(backend: &dyn LocationBackend) -> Self {
        let query = |provider: Provider| {
            backend.is_provider_enabled(provider).unwrap_or_else(|err| {
                log::debug!("{} provider query failed, treating as disabled: {err}", provider.name());
                false
            })
        };

        Self {
            gps: query(Provider::Gps),
            network: query(Provider::Network),
        }
    }

    /// Whether at least one provider is enabled.
    #[must_use]
    pub const fn any(self) -> bool {
        self.gps || self.network
    }
}

/// Errors that can occur when accessing location.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    /// Location permission was not granted.
    #[error("location permission denied")]
    PermissionDenied,
    /// The location service could not be reached.
    #[error("location service unavailable: {0}")]
    ServiceUnavailable(String),
    /// The operation is not supported on this platform.
    #[error("not supported on this platform")]
    NotSupported,
    /// An error reported by the platform.
    #[error("platform error: {0}")]
    Platform(String),
}

/// Result alias for location operations.
pub type LocationResult<T> = Result<T, LocationError>;

/// A platform location service.
pub trait LocationBackend: Send + Sync + fmt::Debug {
    /// Whether the given provider is currently enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform cannot answer the query.
    fn is_provider_enabled(&self, provider: Provider) -> LocationResult<bool>;

    /// Fetch the last cached position fix.
    ///
    /// Resolves to `Ok(None)` when the platform has never cached a fix.
    fn last_known_position(&self) -> BoxFuture<'_, LocationResult<Option<Position>>>;
}
