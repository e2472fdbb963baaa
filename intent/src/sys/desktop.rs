//! Desktop intents through the OS URI handler.
//!
//! Package scoping has no desktop equivalent; whatever handles `geo:` on
//! the system gets the URI.

use crate::{Intent, IntentError, Launcher};

#[cfg(target_os = "windows")]
const LOCATION_SETTINGS_URI: Option<&str> = Some("ms-settings:privacy-location");

#[cfg(target_os = "macos")]
const LOCATION_SETTINGS_URI: Option<&str> =
    Some("x-apple.systempreferences:com.apple.preference.security?Privacy_LocationServices");

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const LOCATION_SETTINGS_URI: Option<&str> = None;

/// Launcher backed by the system's default URI handlers.
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopLauncher;

impl DesktopLauncher {
    /// Create the launcher.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Launcher for DesktopLauncher {
    fn launch(&self, intent: &Intent) -> Result<(), IntentError> {
        let uri = match intent {
            Intent::View { uri, package } => {
                if let Some(package) = package {
                    log::debug!("ignoring package {package} on desktop");
                }
                uri.as_str()
            }
            Intent::LocationSettings => LOCATION_SETTINGS_URI.ok_or_else(|| {
                IntentError::NotSupported("no location settings screen".into())
            })?,
        };

        log::info!("opening {uri}");
        open::that(uri)?;
        Ok(())
    }
}
