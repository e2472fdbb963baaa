//! Linux permission implementation.
//!
//! Traditional Linux desktops have no runtime permission prompts; GeoClue
//! applies its own agent-based authorisation when a client starts. Sandboxed
//! apps go through portals, which GeoClue also fronts.

use crate::{Permission, PermissionBackend, PermissionError, PermissionRequest, PermissionStatus};

/// Permission backend for Linux desktops.
#[derive(Debug, Default)]
pub struct LinuxPermissions;

impl LinuxPermissions {
    /// Create the backend.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl PermissionBackend for LinuxPermissions {
    fn check(&self, _permission: Permission) -> PermissionStatus {
        PermissionStatus::Granted
    }

    fn request(&self, request: &PermissionRequest) -> Result<(), PermissionError> {
        log::debug!("no runtime prompt on Linux for request {}", request.code);
        Ok(())
    }
}
