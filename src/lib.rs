//! # pinpoint
//!
//! Find the device's last-known position and open it in a map application.
//!
//! The [`LocationController`] behind a single screen reacts to two triggers:
//!
//! - **get location**: check that a location provider is on (otherwise offer
//!   the system settings), make sure the fine-location permission is granted
//!   (otherwise request it and stop), then fetch the platform's cached fix and
//!   display it. With no cached fix the user is offered a map at a fallback
//!   coordinate.
//! - **open map**: hand the stored coordinate to a map application as a
//!   `geo:<lat>,<long>` intent.
//!
//! Platform services sit behind one trait per capability, re-exported from
//! the capability crates:
//!
//! - [`location`]: provider availability and the last-known fix.
//! - [`permission`]: runtime permission checks and request-code keyed requests.
//! - [`dialog`]: blocking prompts and short notices.
//! - [`intent`]: outbound `geo:` and settings intents.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use pinpoint::{Config, LocationController, NullView, Platform, Stage};
//!
//! async fn locate() {
//!     let platform = Platform::native(Arc::new(NullView));
//!     let mut controller = LocationController::new(platform, Config::default());
//!
//!     if controller.request_location().await == Stage::Displayed {
//!         let _ = controller.open_map();
//!     }
//! }
//! ```

#![warn(missing_docs)]

pub use pinpoint_dialog as dialog;
pub use pinpoint_intent as intent;
pub use pinpoint_location as location;
pub use pinpoint_permission as permission;

mod config;
mod controller;
mod error;
mod native;
pub mod runtime;
mod session;

#[cfg(test)]
mod testing;

pub use config::{Config, FALLBACK_COORDINATE, LOCATION_PERMISSION_REQUEST_CODE, Messages};
pub use controller::{FetchOutcome, LocationController, PermissionOutcome, Platform};
pub use error::Error;
pub use runtime::{ControllerHandle, Event};
pub use session::{NullView, Screen, Session, Stage, View};
