//! Runtime permission handling.
//!
//! Permission requests on mobile platforms are fire-and-forget: the request
//! is tagged with a request code and the verdict arrives later through the
//! host's result callback as a [`PermissionResponse`].

#![warn(missing_docs)]

use std::fmt;

use thiserror::Error;

/// Platform-specific implementations.
pub mod sys;

/// Grant result value the platform reports for a granted permission.
pub const PERMISSION_GRANTED: i32 = 0;

/// Grant result value the platform reports for a denied permission.
pub const PERMISSION_DENIED: i32 = -1;

/// Types of permissions that can be requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Permission {
    /// Precise location access.
    FineLocation,
}

impl Permission {
    /// Manifest name of the permission on Android.
    #[must_use]
    pub const fn android_name(self) -> &'static str {
        match self {
            Self::FineLocation => "android.permission.ACCESS_FINE_LOCATION",
        }
    }
}

/// The current status of a permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PermissionStatus {
    /// Permission has been granted by the user.
    Granted,
    /// Permission has been denied by the user.
    Denied,
    /// Permission has not been requested yet.
    NotDetermined,
}

impl PermissionStatus {
    /// Whether the permission is usable right now.
    #[must_use]
    pub const fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// A request for one or more permissions, tagged with a request code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionRequest {
    /// Code echoed back in the matching [`PermissionResponse`].
    pub code: i32,
    /// Permissions asked for.
    pub permissions: Vec<Permission>,
}

impl PermissionRequest {
    /// Request a single permission.
    #[must_use]
    pub fn single(code: i32, permission: Permission) -> Self {
        Self {
            code,
            permissions: vec![permission],
        }
    }
}

/// The verdict delivered to the host's permission-result callback.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PermissionResponse {
    /// Code of the request this answers.
    pub request_code: i32,
    /// Permission names, in request order.
    pub permissions: Vec<String>,
    /// Grant results, parallel to `permissions`.
    pub grant_results: Vec<i32>,
}

impl PermissionResponse {
    /// Whether the first grant result is a grant.
    ///
    /// An empty result set means the request was interrupted and counts as
    /// not granted.
    #[must_use]
    pub fn first_granted(&self) -> bool {
        self.grant_results.first() == Some(&PERMISSION_GRANTED)
    }
}

/// Errors that can occur when requesting permissions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PermissionError {
    /// The permission type is not supported on this platform.
    #[error("permission not supported on this platform")]
    NotSupported,
    /// An error reported by the platform.
    #[error("platform error: {0}")]
    Platform(String),
}

/// A platform permission service.
pub trait PermissionBackend: Send + Sync + fmt::Debug {
    /// Current status of a permission, without prompting.
    fn check(&self, permission: Permission) -> PermissionStatus;

    /// Ask the OS to prompt for the permissions in `request`.
    ///
    /// Returns once the request is issued; the verdict arrives later through
    /// the host's result callback.
    ///
    /// # Errors
    ///
    /// Returns an error if the request could not be issued.
    fn request(&self, request: &PermissionRequest) -> Result<(), PermissionError>;
}
