//! JNI glue for the Android activity.
//!
//! This crate is only compiled for Android targets.
//! To build: cargo ndk -t arm64-v8a build -p pinpoint-android
//!
//! The activity `com.pinpoint.app.MainActivity` declares the `native*`
//! methods below and implements the host side:
//!
//! - `void render(String latitude, String longitude, String provider, boolean openMapVisible)`
//! - `void showConfirm(long token, String message, String confirm, String cancel)`
//! - `void showNotice(String message, int duration)`
//!
//! The UI methods are called from the controller thread and must post to the
//! main looper themselves.

#![cfg(target_os = "android")]
#![allow(non_snake_case)]

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use jni::objects::{GlobalRef, JIntArray, JObject, JObjectArray, JString, JValue};
use jni::sys::{jboolean, jint, jlong};
use jni::{JNIEnv, JavaVM};
use log::LevelFilter;
use pinpoint::permission::sys::android::response_from_java;
use pinpoint::{Config, ControllerHandle, Event, LocationController, Platform, Screen, View};

static CONTROLLER: Mutex<Option<ControllerHandle>> = Mutex::new(None);

fn controller() -> MutexGuard<'static, Option<ControllerHandle>> {
    CONTROLLER
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

fn post(event: Event) {
    match controller().as_ref() {
        Some(handle) => {
            if let Err(err) = handle.send(event) {
                log::error!("dropping event: {err}");
            }
        }
        None => log::error!("event {event:?} before nativeInit"),
    }
}

/// Pushes the screen model to the activity.
struct ActivityView {
    vm: JavaVM,
    activity: GlobalRef,
}

impl fmt::Debug for ActivityView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActivityView").finish_non_exhaustive()
    }
}

impl View for ActivityView {
    fn render(&self, screen: &Screen) {
        let result = self.vm.attach_current_thread().and_then(|mut env| {
            let latitude = env.new_string(&screen.latitude)?;
            let longitude = env.new_string(&screen.longitude)?;
            let provider = env.new_string(&screen.provider)?;
            env.call_method(
                self.activity.as_obj(),
                "render",
                "(Ljava/lang/String;Ljava/lang/String;Ljava/lang/String;Z)V",
                &[
                    JValue::Object(&latitude),
                    JValue::Object(&longitude),
                    JValue::Object(&provider),
                    JValue::Bool(screen.open_map_visible.into()),
                ],
            )
            .map(|_| ())
        });

        if let Err(err) = result {
            log::error!("render failed: {err}");
        }
    }
}

fn read_config(env: &mut JNIEnv<'_>, config: &JString<'_>) -> Config {
    if config.is_null() {
        return Config::default();
    }

    let json: String = match env.get_string(config) {
        Ok(json) => json.into(),
        Err(err) => {
            log::error!("unreadable config string: {err}");
            return Config::default();
        }
    };

    Config::from_json(&json).unwrap_or_else(|err| {
        log::error!("{err}, using defaults");
        Config::default()
    })
}

fn start(env: &mut JNIEnv<'_>, activity: &JObject<'_>, config: Config) -> Result<(), pinpoint::Error> {
    let view = ActivityView {
        vm: env
            .get_java_vm()
            .map_err(|e| pinpoint::location::LocationError::Platform(e.to_string()))?,
        activity: env
            .new_global_ref(activity)
            .map_err(|e| pinpoint::location::LocationError::Platform(e.to_string()))?,
    };
    let platform = Platform::android(env, activity, Arc::new(view))?;
    let handle = ControllerHandle::spawn(LocationController::new(platform, config))?;

    // Dropping a previous handle closes its queue and dismisses its open
    // prompts, so its thread exits on its own.
    let previous = controller().replace(handle);
    drop(previous);
    Ok(())
}

// ============================================================================
// Lifecycle
// ============================================================================

/// Create the controller for a (re)created activity.
///
/// `config` may be null or a JSON document overriding the defaults.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_pinpoint_app_MainActivity_nativeInit(
    mut env: JNIEnv,
    activity: JObject,
    config: JString,
) {
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(LevelFilter::Debug)
            .with_tag("pinpoint"),
    );

    let config = read_config(&mut env, &config);
    if let Err(err) = start(&mut env, &activity, config) {
        log::error!("failed to start controller: {err}");
    }
}

/// Stop the controller thread.
///
/// Any prompt still on screen is dismissed, so this returns once the event
/// in progress has finished.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_pinpoint_app_MainActivity_nativeShutdown(
    _env: JNIEnv,
    _activity: JObject,
) {
    let handle = controller().take();
    if let Some(Err(err)) = handle.map(ControllerHandle::shutdown) {
        log::error!("controller shutdown: {err}");
    }
}

// ============================================================================
// Triggers
// ============================================================================

/// The get-location button was pressed.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_pinpoint_app_MainActivity_nativeOnGetLocation(
    _env: JNIEnv,
    _activity: JObject,
) {
    post(Event::GetLocation);
}

/// The open-map button was pressed.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_pinpoint_app_MainActivity_nativeOnOpenMap(
    _env: JNIEnv,
    _activity: JObject,
) {
    post(Event::OpenMap);
}

// ============================================================================
// Callbacks
// ============================================================================

/// Forwarded from `onRequestPermissionsResult`.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_pinpoint_app_MainActivity_nativeOnRequestPermissionsResult(
    mut env: JNIEnv,
    _activity: JObject,
    request_code: jint,
    permissions: JObjectArray,
    grant_results: JIntArray,
) {
    match response_from_java(&mut env, request_code, &permissions, &grant_results) {
        Ok(response) => post(Event::PermissionResult(response)),
        Err(err) => log::error!("unreadable permission result: {err}"),
    }
}

/// The user answered the prompt shown for `token`.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_pinpoint_app_MainActivity_nativeOnConfirmResult(
    _env: JNIEnv,
    _activity: JObject,
    token: jlong,
    confirmed: jboolean,
) {
    pinpoint::dialog::sys::android::complete_confirm(token as u64, confirmed != 0);
}
