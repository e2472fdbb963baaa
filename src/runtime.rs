//! A dedicated thread that owns the controller.
//!
//! Hosts whose UI callbacks cannot block (Android) post [`Event`]s to a
//! [`ControllerHandle`]. The controller thread handles them one at a time,
//! so every controller mutation happens on that thread.
//!
//! Stopping the handle closes the dialog backend first, so an event parked
//! on an unanswered prompt resolves it as cancelled and the thread can exit.

use std::sync::Arc;
use std::thread::JoinHandle;

use async_channel::{Receiver, Sender, unbounded};

use crate::Error;
use crate::controller::LocationController;
use crate::dialog::DialogBackend;
use crate::permission::PermissionResponse;

/// Something the host UI asks the controller to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The get-location button was pressed.
    GetLocation,
    /// The open-map button was pressed.
    OpenMap,
    /// The OS delivered a permission verdict.
    PermissionResult(PermissionResponse),
    /// Stop the controller thread after the events queued before this one.
    Shutdown,
}

/// Handle to a controller running on its own thread.
#[derive(Debug)]
pub struct ControllerHandle {
    sender: Sender<Event>,
    dialogs: Arc<dyn DialogBackend>,
    thread: Option<JoinHandle<LocationController>>,
}

impl ControllerHandle {
    /// Move `controller` onto a new thread and start handling events.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Spawn`] if the thread cannot be created.
    pub fn spawn(controller: LocationController) -> Result<Self, Error> {
        let (sender, receiver) = unbounded();
        let dialogs = Arc::clone(&controller.platform().dialogs);
        let thread = std::thread::Builder::new()
            .name("pinpoint-controller".into())
            .spawn(move || futures::executor::block_on(run(controller, receiver)))
            .map_err(Error::Spawn)?;

        Ok(Self {
            sender,
            dialogs,
            thread: Some(thread),
        })
    }

    /// Queue an event without blocking.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RuntimeClosed`] if the controller thread has stopped.
    pub fn send(&self, event: Event) -> Result<(), Error> {
        self.sender.try_send(event).map_err(|_| Error::RuntimeClosed)
    }

    /// Finish the queued events, stop the thread and hand back the controller.
    ///
    /// Open prompts, and any the queued events would show, resolve as
    /// cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RuntimeClosed`] if the controller thread panicked.
    pub fn shutdown(mut self) -> Result<LocationController, Error> {
        let _ = self.sender.try_send(Event::Shutdown);
        self.dialogs.close();
        self.thread
            .take()
            .ok_or(Error::RuntimeClosed)?
            .join()
            .map_err(|_| Error::RuntimeClosed)
    }
}

impl Drop for ControllerHandle {
    fn drop(&mut self) {
        self.sender.close();
        self.dialogs.close();
    }
}

async fn run(mut controller: LocationController, receiver: Receiver<Event>) -> LocationController {
    while let Ok(event) = receiver.recv().await {
        match event {
            Event::GetLocation => {
                let stage = controller.request_location().await;
                log::debug!("location attempt ended at {stage:?}");
            }
            Event::OpenMap => {
                if let Err(err) = controller.open_map() {
                    log::warn!("open map failed: {err}");
                }
            }
            Event::PermissionResult(response) => {
                let outcome = controller.on_permission_result(&response);
                log::debug!("permission result handled: {outcome:?}");
            }
            Event::Shutdown => break,
        }
    }
    controller
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::intent::Intent;
    use crate::location::{Coordinate, Position};
    use crate::permission::{PERMISSION_DENIED, PermissionStatus};
    use crate::session::Stage;
    use crate::testing::Harness;

    #[test]
    fn events_run_in_order_on_the_controller_thread() {
        let harness = Harness::new().fix(Ok(Some(Position {
            latitude: 1.23,
            longitude: 4.56,
            provider: "fused".into(),
        })));
        let handle = ControllerHandle::spawn(harness.controller()).unwrap();

        handle.send(Event::GetLocation).unwrap();
        handle.send(Event::OpenMap).unwrap();
        let controller = handle.shutdown().unwrap();

        assert_eq!(controller.session().stage, Stage::Displayed);
        assert_eq!(controller.session().coordinate, Coordinate::new(1.23, 4.56));
        assert_eq!(
            harness.launcher.launched(),
            vec![Intent::View {
                uri: "geo:1.23,4.56".into(),
                package: Some("com.google.android.apps.maps".into()),
            }]
        );
    }

    #[test]
    fn permission_round_trip_through_events() {
        let harness = Harness::new().permission(PermissionStatus::NotDetermined);
        let handle =
            ControllerHandle::spawn(LocationController::new(harness.platform(), Config::default()))
                .unwrap();

        handle.send(Event::GetLocation).unwrap();
        handle
            .send(Event::PermissionResult(PermissionResponse {
                request_code: 1000,
                permissions: Vec::new(),
                grant_results: vec![PERMISSION_DENIED],
            }))
            .unwrap();
        let controller = handle.shutdown().unwrap();

        assert_eq!(controller.session().stage, Stage::PermissionPending);
        assert_eq!(harness.permissions.requests().len(), 1);
        assert_eq!(harness.dialogs.notices().len(), 1);
        assert_eq!(harness.location.fetches(), 0);
    }

    #[test]
    fn shutdown_dismisses_an_unanswered_prompt() {
        let harness = Harness::new()
            .providers(Ok(false), Ok(false))
            .unanswered_prompts();
        let handle = ControllerHandle::spawn(harness.controller()).unwrap();
        handle.send(Event::GetLocation).unwrap();

        let (done, finished) = std::sync::mpsc::channel();
        std::thread::spawn(move || {
            let _ = done.send(handle.shutdown().map(|controller| controller.session().stage));
        });
        let stage = finished
            .recv_timeout(std::time::Duration::from_secs(5))
            .expect("shutdown did not return")
            .unwrap();

        assert_eq!(stage, Stage::SettingsPrompt);
        assert!(harness.dialogs.is_closed());
        assert!(harness.launcher.launched().is_empty());
    }

    #[test]
    fn dropping_the_handle_closes_the_dialogs() {
        let harness = Harness::new().unanswered_prompts();
        let handle = ControllerHandle::spawn(harness.controller()).unwrap();
        handle.send(Event::GetLocation).unwrap();

        drop(handle);

        assert!(harness.dialogs.is_closed());
    }

    #[test]
    fn repeated_triggers_are_not_deduplicated() {
        let harness = Harness::new();
        let handle = ControllerHandle::spawn(harness.controller()).unwrap();

        handle.send(Event::GetLocation).unwrap();
        handle.send(Event::GetLocation).unwrap();
        handle.shutdown().unwrap();

        assert_eq!(harness.location.fetches(), 2);
        assert_eq!(harness.dialogs.prompts().len(), 2);
    }
}
