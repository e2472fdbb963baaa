//! Platform-specific permission implementations.

/// Android platform implementation.
#[cfg(target_os = "android")]
pub mod android;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "linux")]
pub use linux::LinuxPermissions as NativePermissions;

#[cfg(not(any(target_os = "android", target_os = "linux")))]
pub use unsupported::UnsupportedPermissions as NativePermissions;

// Fallback for platforms without a runtime permission binding.
#[cfg(not(any(target_os = "android", target_os = "linux")))]
mod unsupported {
    use crate::{
        Permission, PermissionBackend, PermissionError, PermissionRequest, PermissionStatus,
    };

    /// Permission backend that can neither check nor prompt.
    #[derive(Debug, Default)]
    pub struct UnsupportedPermissions;

    impl UnsupportedPermissions {
        /// Create the backend.
        #[must_use]
        pub const fn new() -> Self {
            Self
        }
    }

    impl PermissionBackend for UnsupportedPermissions {
        fn check(&self, _permission: Permission) -> PermissionStatus {
            PermissionStatus::NotDetermined
        }

        fn request(&self, _request: &PermissionRequest) -> Result<(), PermissionError> {
            Err(PermissionError::NotSupported)
        }
    }
}
