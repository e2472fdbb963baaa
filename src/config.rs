//! Controller configuration.

use serde::{Deserialize, Serialize};

use crate::Error;
use crate::intent::GOOGLE_MAPS_PACKAGE;
use crate::location::Coordinate;

/// Request code attached to the location permission request.
pub const LOCATION_PERMISSION_REQUEST_CODE: i32 = 1000;

/// Where the map opens when no fix has ever been cached (Padang, Indonesia).
pub const FALLBACK_COORDINATE: Coordinate = Coordinate::new(-0.942942, 100.371857);

/// Settings for [`LocationController`](crate::LocationController).
///
/// Every field has a default, so a partial JSON document is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Code tagging the permission request and its result callback.
    pub permission_request_code: i32,
    /// Coordinate offered when the platform has no cached fix.
    pub fallback: Coordinate,
    /// Map application the hand-off targets; `None` lets the OS choose.
    pub map_package: Option<String>,
    /// User-visible texts.
    pub messages: Messages,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            permission_request_code: LOCATION_PERMISSION_REQUEST_CODE,
            fallback: FALLBACK_COORDINATE,
            map_package: Some(GOOGLE_MAPS_PACKAGE.to_owned()),
            messages: Messages::default(),
        }
    }
}

impl Config {
    /// Parse a configuration from JSON, filling missing fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the document is not valid JSON or a field
    /// has the wrong type.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Texts shown in prompts and notices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    /// Prompt shown when every location provider is off.
    pub location_disabled: String,
    /// Button that opens the location settings screen.
    pub open_location_settings: String,
    /// Notice shown when the location settings screen cannot be opened.
    pub open_settings_failed: String,
    /// Button that dismisses a prompt.
    pub cancel: String,
    /// Prompt shown when the platform has no cached fix.
    pub recalibrate: String,
    /// Button that opens the map at the fallback coordinate.
    pub open_maps: String,
    /// Notice shown when the position request fails.
    pub fetch_failed: String,
    /// Notice shown when the permission is denied.
    pub grant_permission: String,
    /// Notice shown when no application can open the map.
    pub open_map_failed: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            location_disabled: "Location services are off. Turn on GPS or network location to continue.".into(),
            open_location_settings: "Open location settings".into(),
            open_settings_failed: "Unable to open location settings".into(),
            cancel: "Cancel".into(),
            recalibrate: "No location has been recorded on this device yet. Open Google Maps once to calibrate it.".into(),
            open_maps: "Open Google Maps".into(),
            fetch_failed: "Failed to get location".into(),
            grant_permission: "Please grant the location permission".into(),
            open_map_failed: "No application can open the map".into(),
        }
    }
}
