//! Recording fakes for every platform seam.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use futures::FutureExt;
use futures::future::BoxFuture;

use crate::config::Config;
use crate::controller::{LocationController, Platform};
use crate::dialog::{Dialog, DialogBackend, DialogError, Notice, PendingPrompts, pending};
use crate::intent::{Intent, IntentError, Launcher};
use crate::location::{LocationBackend, LocationResult, Position, Provider};
use crate::permission::{
    Permission, PermissionBackend, PermissionError, PermissionRequest, PermissionStatus,
};
use crate::session::{Screen, View};

#[derive(Debug)]
pub struct FakeLocation {
    gps: Mutex<LocationResult<bool>>,
    network: Mutex<LocationResult<bool>>,
    fix: Mutex<LocationResult<Option<Position>>>,
    queried: Mutex<Vec<Provider>>,
    fetches: AtomicUsize,
}

impl FakeLocation {
    pub fn set_fix(&self, fix: LocationResult<Option<Position>>) {
        *self.fix.lock().unwrap() = fix;
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn queried(&self) -> Vec<Provider> {
        self.queried.lock().unwrap().clone()
    }
}

impl LocationBackend for FakeLocation {
    fn is_provider_enabled(&self, provider: Provider) -> LocationResult<bool> {
        self.queried.lock().unwrap().push(provider);
        match provider {
            Provider::Gps => self.gps.lock().unwrap().clone(),
            Provider::Network => self.network.lock().unwrap().clone(),
        }
    }

    fn last_known_position(&self) -> BoxFuture<'_, LocationResult<Option<Position>>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let fix = self.fix.lock().unwrap().clone();
        async move { fix }.boxed()
    }
}

#[derive(Debug)]
pub struct FakePermissions {
    status: Mutex<PermissionStatus>,
    fail_requests: Mutex<bool>,
    requests: Mutex<Vec<PermissionRequest>>,
    checks: AtomicUsize,
}

impl FakePermissions {
    pub fn requests(&self) -> Vec<PermissionRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn checks(&self) -> usize {
        self.checks.load(Ordering::SeqCst)
    }
}

impl PermissionBackend for FakePermissions {
    fn check(&self, _permission: Permission) -> PermissionStatus {
        self.checks.fetch_add(1, Ordering::SeqCst);
        *self.status.lock().unwrap()
    }

    fn request(&self, request: &PermissionRequest) -> Result<(), PermissionError> {
        self.requests.lock().unwrap().push(request.clone());
        if *self.fail_requests.lock().unwrap() {
            Err(PermissionError::Platform("activity gone".into()))
        } else {
            Ok(())
        }
    }
}

#[derive(Debug)]
pub struct FakeDialogs {
    answer: Mutex<Result<bool, DialogError>>,
    // When set, prompts wait in `open` until answered or closed.
    unanswered: Mutex<bool>,
    open: PendingPrompts,
    prompts: Mutex<Vec<Dialog>>,
    notices: Mutex<Vec<Notice>>,
}

impl FakeDialogs {
    pub fn prompts(&self) -> Vec<Dialog> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn is_closed(&self) -> bool {
        self.open.is_closed()
    }
}

impl DialogBackend for FakeDialogs {
    fn confirm(&self, dialog: Dialog) -> BoxFuture<'_, Result<bool, DialogError>> {
        self.prompts.lock().unwrap().push(dialog);
        if *self.unanswered.lock().unwrap() {
            return match self.open.open() {
                Ok((_, rx)) => pending::answer(rx).boxed(),
                Err(err) => async move { Err(err) }.boxed(),
            };
        }
        let answer = self.answer.lock().unwrap().clone();
        async move { answer }.boxed()
    }

    fn notify(&self, notice: Notice) -> Result<(), DialogError> {
        self.notices.lock().unwrap().push(notice);
        Ok(())
    }

    fn close(&self) {
        self.open.close();
    }
}

#[derive(Debug)]
pub struct FakeLauncher {
    fail: Mutex<bool>,
    launched: Mutex<Vec<Intent>>,
}

impl FakeLauncher {
    pub fn launched(&self) -> Vec<Intent> {
        self.launched.lock().unwrap().clone()
    }
}

impl Launcher for FakeLauncher {
    fn launch(&self, intent: &Intent) -> Result<(), IntentError> {
        if *self.fail.lock().unwrap() {
            return Err(IntentError::NoHandler(format!("{intent:?}")));
        }
        self.launched.lock().unwrap().push(intent.clone());
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct RecordingView {
    frames: Mutex<Vec<Screen>>,
}

impl RecordingView {
    pub fn frames(&self) -> Vec<Screen> {
        self.frames.lock().unwrap().clone()
    }
}

impl View for RecordingView {
    fn render(&self, screen: &Screen) {
        self.frames.lock().unwrap().push(screen.clone());
    }
}

/// Fakes wired together, defaulting to: both providers on, permission
/// granted, no cached fix, prompts declined.
#[derive(Debug, Clone)]
pub struct Harness {
    pub location: Arc<FakeLocation>,
    pub permissions: Arc<FakePermissions>,
    pub dialogs: Arc<FakeDialogs>,
    pub launcher: Arc<FakeLauncher>,
    pub view: Arc<RecordingView>,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            location: Arc::new(FakeLocation {
                gps: Mutex::new(Ok(true)),
                network: Mutex::new(Ok(true)),
                fix: Mutex::new(Ok(None)),
                queried: Mutex::new(Vec::new()),
                fetches: AtomicUsize::new(0),
            }),
            permissions: Arc::new(FakePermissions {
                status: Mutex::new(PermissionStatus::Granted),
                fail_requests: Mutex::new(false),
                requests: Mutex::new(Vec::new()),
                checks: AtomicUsize::new(0),
            }),
            dialogs: Arc::new(FakeDialogs {
                answer: Mutex::new(Ok(false)),
                unanswered: Mutex::new(false),
                open: PendingPrompts::new(),
                prompts: Mutex::new(Vec::new()),
                notices: Mutex::new(Vec::new()),
            }),
            launcher: Arc::new(FakeLauncher {
                fail: Mutex::new(false),
                launched: Mutex::new(Vec::new()),
            }),
            view: Arc::new(RecordingView::default()),
        }
    }

    pub fn providers(self, gps: LocationResult<bool>, network: LocationResult<bool>) -> Self {
        *self.location.gps.lock().unwrap() = gps;
        *self.location.network.lock().unwrap() = network;
        self
    }

    pub fn fix(self, fix: LocationResult<Option<Position>>) -> Self {
        self.location.set_fix(fix);
        self
    }

    pub fn permission(self, status: PermissionStatus) -> Self {
        *self.permissions.status.lock().unwrap() = status;
        self
    }

    pub fn failing_permission_requests(self) -> Self {
        *self.permissions.fail_requests.lock().unwrap() = true;
        self
    }

    pub fn answer(self, confirmed: bool) -> Self {
        *self.dialogs.answer.lock().unwrap() = Ok(confirmed);
        self
    }

    pub fn broken_prompts(self) -> Self {
        *self.dialogs.answer.lock().unwrap() = Err(DialogError::Dismissed);
        self
    }

    pub fn unanswered_prompts(self) -> Self {
        *self.dialogs.unanswered.lock().unwrap() = true;
        self
    }

    pub fn failing_launches(self) -> Self {
        *self.launcher.fail.lock().unwrap() = true;
        self
    }

    pub fn platform(&self) -> Platform {
        Platform {
            location: self.location.clone(),
            permissions: self.permissions.clone(),
            dialogs: self.dialogs.clone(),
            launcher: self.launcher.clone(),
            view: self.view.clone(),
        }
    }

    pub fn controller(&self) -> LocationController {
        LocationController::new(self.platform(), Config::default())
    }
}
