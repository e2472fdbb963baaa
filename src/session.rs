//! Per-session state threaded through the acquisition flow.

use std::fmt;

use crate::location::{Coordinate, Position, format_degrees};

/// Where the last acquisition attempt ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    /// No attempt has run yet.
    #[default]
    Idle,
    /// Querying provider availability.
    CheckingAvailability,
    /// Every provider was off; the settings prompt was shown.
    SettingsPrompt,
    /// Checking the location permission.
    CheckingPermission,
    /// A permission request is out; the attempt ended there.
    PermissionPending,
    /// Waiting for the last-known position.
    Fetching,
    /// A fix was stored and displayed.
    Displayed,
    /// No fix was cached; the fallback prompt was shown.
    Fallback,
    /// The position request failed.
    Failed,
}

/// The controller's mutable state: the one stored coordinate and the stage.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Session {
    /// Most recent successful fix, (0.0, 0.0) until one arrives.
    pub coordinate: Coordinate,
    /// Stage of the current or last attempt.
    pub stage: Stage,
}

impl Session {
    pub(crate) fn enter(&mut self, stage: Stage) {
        log::debug!("{:?} -> {stage:?}", self.stage);
        self.stage = stage;
    }
}

/// What the host UI shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Screen {
    /// Latitude line.
    pub latitude: String,
    /// Longitude line.
    pub longitude: String,
    /// Provider line.
    pub provider: String,
    /// Whether the open-map control is visible.
    pub open_map_visible: bool,
}

impl Screen {
    /// Fill the three display lines from a fix and reveal the open-map control.
    pub fn show_position(&mut self, position: &Position) {
        self.latitude = format!("Latitude: {}", format_degrees(position.latitude));
        self.longitude = format!("Longitude: {}", format_degrees(position.longitude));
        self.provider = format!("Provider: {}", position.provider);
        self.open_map_visible = true;
    }
}

/// Host UI that displays the [`Screen`].
pub trait View: Send + Sync + fmt::Debug {
    /// Show the current screen state.
    fn render(&self, screen: &Screen);
}

/// A view that displays nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullView;

impl View for NullView {
    fn render(&self, _screen: &Screen) {}
}
