//! Location acquisition and map hand-off.
//!
//! One [`LocationController`] backs one screen. A get-location trigger runs
//! [`LocationController::request_location`], which walks
//! `CheckingAvailability -> CheckingPermission -> Fetching` and stops at the
//! first terminal [`Stage`]. Every failure ends the attempt with a notice;
//! nothing is retried.

use std::sync::Arc;

use crate::Error;
use crate::config::Config;
use crate::dialog::{Dialog, DialogBackend, Notice};
use crate::intent::{Intent, Launcher};
use crate::location::{
    Coordinate, LocationBackend, LocationError, LocationResult, Position, ProviderAvailability,
};
use crate::permission::{Permission, PermissionBackend, PermissionRequest, PermissionResponse};
use crate::session::{Screen, Session, Stage, View};

/// The platform services a controller drives.
#[derive(Debug, Clone)]
pub struct Platform {
    /// Location service.
    pub location: Arc<dyn LocationBackend>,
    /// Runtime permission service.
    pub permissions: Arc<dyn PermissionBackend>,
    /// Prompts and notices.
    pub dialogs: Arc<dyn DialogBackend>,
    /// Outbound intents.
    pub launcher: Arc<dyn Launcher>,
    /// Host UI.
    pub view: Arc<dyn View>,
}

/// Result of one last-known-position request.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The platform returned a cached fix.
    Fix(Position),
    /// The request succeeded but no fix was ever cached.
    NoFix,
    /// The location service failed.
    Failed(LocationError),
}

impl From<LocationResult<Option<Position>>> for FetchOutcome {
    fn from(result: LocationResult<Option<Position>>) -> Self {
        match result {
            Ok(Some(position)) => Self::Fix(position),
            Ok(None) => Self::NoFix,
            Err(err) => Self::Failed(err),
        }
    }
}

/// How a permission result callback was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionOutcome {
    /// The permission was granted; the next trigger can fetch.
    Granted,
    /// The permission was denied and the user was told.
    Denied,
    /// The callback carried another request code.
    Ignored,
}

/// Drives one screen's location acquisition and map hand-off.
#[derive(Debug)]
pub struct LocationController {
    platform: Platform,
    config: Config,
    session: Session,
    screen: Screen,
}

impl LocationController {
    /// Create a controller over `platform`.
    #[must_use]
    pub fn new(platform: Platform, config: Config) -> Self {
        Self {
            platform,
            config,
            session: Session::default(),
            screen: Screen::default(),
        }
    }

    /// Current session state.
    #[must_use]
    pub const fn session(&self) -> Session {
        self.session
    }

    /// Current screen state.
    #[must_use]
    pub const fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Platform services in use.
    #[must_use]
    pub const fn platform(&self) -> &Platform {
        &self.platform
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Handle the get-location trigger.
    ///
    /// Returns the stage the attempt ended in.
    pub async fn request_location(&mut self) -> Stage {
        self.session.enter(Stage::CheckingAvailability);
        let availability = ProviderAvailability::query(self.platform.location.as_ref());

        if !availability.any() {
            self.session.enter(Stage::SettingsPrompt);
            self.prompt_location_settings().await;
            return self.session.stage;
        }

        if !self.ensure_permission() {
            return self.session.stage;
        }

        let outcome = self.fetch_last_known_position().await;
        self.apply_fetch(outcome).await
    }

    /// Check the fine-location permission and request it if missing.
    ///
    /// Returns `true` when the fetch may proceed. Otherwise a request tagged
    /// with the configured code is out and the attempt ends; the result
    /// arrives through [`Self::on_permission_result`].
    pub fn ensure_permission(&mut self) -> bool {
        self.session.enter(Stage::CheckingPermission);
        let permissions = &self.platform.permissions;

        if permissions.check(Permission::FineLocation).is_granted() {
            return true;
        }

        let request = PermissionRequest::single(
            self.config.permission_request_code,
            Permission::FineLocation,
        );
        self.session.enter(Stage::PermissionPending);
        if let Err(err) = permissions.request(&request) {
            log::warn!("could not request location permission: {err}");
            self.notify(&self.config.messages.grant_permission);
        }
        false
    }

    /// Handle the host's permission-result callback.
    ///
    /// A grant does not resume the fetch; the user triggers it again.
    pub fn on_permission_result(&mut self, response: &PermissionResponse) -> PermissionOutcome {
        if response.request_code != self.config.permission_request_code {
            log::debug!("ignoring permission result for code {}", response.request_code);
            return PermissionOutcome::Ignored;
        }

        if response.first_granted() {
            log::info!("location permission granted");
            PermissionOutcome::Granted
        } else {
            log::info!("location permission denied");
            self.notify(&self.config.messages.grant_permission);
            PermissionOutcome::Denied
        }
    }

    /// Request the platform's last cached fix.
    pub async fn fetch_last_known_position(&mut self) -> FetchOutcome {
        self.session.enter(Stage::Fetching);
        self.platform.location.last_known_position().await.into()
    }

    /// Apply a fetch result to the session and the screen.
    pub async fn apply_fetch(&mut self, outcome: FetchOutcome) -> Stage {
        match outcome {
            FetchOutcome::Fix(position) => {
                log::info!("fix from {}: {}", position.provider, position.coordinate());
                self.session.coordinate = position.coordinate();
                self.screen.show_position(&position);
                self.platform.view.render(&self.screen);
                self.session.enter(Stage::Displayed);
            }
            FetchOutcome::NoFix => {
                self.session.enter(Stage::Fallback);
                let messages = &self.config.messages;
                let dialog =
                    Dialog::new(&messages.recalibrate, &messages.open_maps, &messages.cancel);
                if self.confirm(dialog).await {
                    // Failures are already reported to the user.
                    let _ = self.hand_off(self.config.fallback);
                }
            }
            FetchOutcome::Failed(err) => {
                log::warn!("last-known position request failed: {err}");
                self.notify(&self.config.messages.fetch_failed);
                self.session.enter(Stage::Failed);
            }
        }
        self.session.stage
    }

    /// Handle the open-map trigger with the stored coordinate.
    ///
    /// # Errors
    ///
    /// Returns an error if no application could open the map.
    pub fn open_map(&self) -> Result<(), Error> {
        self.hand_off(self.session.coordinate)
    }

    /// Open `coordinate` in the configured map application.
    ///
    /// # Errors
    ///
    /// Returns an error if no application could open the map. The user has
    /// already been notified when this happens.
    pub fn hand_off(&self, coordinate: Coordinate) -> Result<(), Error> {
        let intent = Intent::geo(coordinate, self.config.map_package.as_deref());
        log::info!("handing off {coordinate} to {:?}", self.config.map_package);

        self.platform.launcher.launch(&intent).map_err(|err| {
            log::warn!("map hand-off failed: {err}");
            self.notify(&self.config.messages.open_map_failed);
            err.into()
        })
    }

    async fn prompt_location_settings(&self) {
        let messages = &self.config.messages;
        let dialog = Dialog::new(
            &messages.location_disabled,
            &messages.open_location_settings,
            &messages.cancel,
        );

        if self.confirm(dialog).await {
            if let Err(err) = self.platform.launcher.launch(&Intent::LocationSettings) {
                log::warn!("could not open location settings: {err}");
                self.notify(&self.config.messages.open_settings_failed);
            }
        }
    }

    async fn confirm(&self, dialog: Dialog) -> bool {
        match self.platform.dialogs.confirm(dialog).await {
            Ok(confirmed) => confirmed,
            Err(err) => {
                log::warn!("prompt failed, treating as cancel: {err}");
                false
            }
        }
    }

    fn notify(&self, message: &str) {
        if let Err(err) = self.platform.dialogs.notify(Notice::short(message)) {
            log::warn!("could not show notice {message:?}: {err}");
        }
    }
}
