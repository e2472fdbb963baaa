//! Android location implementation using JNI.
//!
//! Talks to `android.location.LocationManager` directly. The last-known fix
//! comes from the `fused` provider; devices that predate it answer from the
//! `gps` or `network` provider instead.

use std::fmt;

use futures::FutureExt;
use futures::future::BoxFuture;
use jni::objects::{GlobalRef, JObject, JString, JValue};
use jni::{JNIEnv, JavaVM};

use super::last_known::{Lookup, resolve_last_known};
use crate::{LocationBackend, LocationError, LocationResult, Position, Provider};

const LOCATION_SERVICE: &str = "location";
const FUSED_PROVIDER: &str = "fused";
const LAST_KNOWN_PROVIDERS: [&str; 3] = [FUSED_PROVIDER, "gps", "network"];
const ILLEGAL_ARGUMENT: &str = "java/lang/IllegalArgumentException";

/// Backend bound to an Android `Context`.
pub struct AndroidLocationBackend {
    vm: JavaVM,
    context: GlobalRef,
}

impl fmt::Debug for AndroidLocationBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AndroidLocationBackend").finish_non_exhaustive()
    }
}

impl AndroidLocationBackend {
    /// Create a backend from a valid Android `Context`.
    ///
    /// # Errors
    ///
    /// Returns an error if the JVM or a global reference cannot be obtained.
    pub fn new(env: &JNIEnv<'_>, context: &JObject<'_>) -> LocationResult<Self> {
        let vm = env.get_java_vm().map_err(map_jni_error)?;
        let context = env.new_global_ref(context).map_err(map_jni_error)?;
        Ok(Self { vm, context })
    }

    fn with_attached_env<T, F>(&self, action: F) -> LocationResult<T>
    where
        F: FnOnce(&mut JNIEnv<'_>, &JObject<'_>) -> jni::errors::Result<T>,
    {
        let mut env = self.vm.attach_current_thread().map_err(map_jni_error)?;
        let result = action(&mut env, self.context.as_obj());
        if env.exception_check().unwrap_or(false) {
            let _ = env.exception_describe();
            let _ = env.exception_clear();
        }
        result.map_err(map_jni_error)
    }
}

fn location_manager<'local>(
    env: &mut JNIEnv<'local>,
    context: &JObject<'_>,
) -> jni::errors::Result<JObject<'local>> {
    let name = env.new_string(LOCATION_SERVICE)?;
    env.call_method(
        context,
        "getSystemService",
        "(Ljava/lang/String;)Ljava/lang/Object;",
        &[JValue::Object(&name)],
    )?
    .l()
}

fn read_position(env: &mut JNIEnv<'_>, location: &JObject<'_>) -> jni::errors::Result<Position> {
    let latitude = env.call_method(location, "getLatitude", "()D", &[])?.d()?;
    let longitude = env.call_method(location, "getLongitude", "()D", &[])?.d()?;
    let provider = env
        .call_method(location, "getProvider", "()Ljava/lang/String;", &[])?
        .l()?;

    let provider = if provider.is_null() {
        FUSED_PROVIDER.to_owned()
    } else {
        env.get_string(&JString::from(provider))?.into()
    };

    Ok(Position {
        latitude,
        longitude,
        provider,
    })
}

impl LocationBackend for AndroidLocationBackend {
    fn is_provider_enabled(&self, provider: Provider) -> LocationResult<bool> {
        self.with_attached_env(|env, context| {
            let manager = location_manager(env, context)?;
            let name = env.new_string(provider.name())?;
            env.call_method(
                &manager,
                "isProviderEnabled",
                "(Ljava/lang/String;)Z",
                &[JValue::Object(&name)],
            )?
            .z()
        })
    }

    fn last_known_position(&self) -> BoxFuture<'_, LocationResult<Option<Position>>> {
        async move {
            self.with_attached_env(|env, context| {
                let manager = location_manager(env, context)?;
                resolve_last_known(&LAST_KNOWN_PROVIDERS, |provider| {
                    last_known_from(env, &manager, provider)
                })
            })
        }
        .boxed()
    }
}

fn last_known_from(
    env: &mut JNIEnv<'_>,
    manager: &JObject<'_>,
    provider: &str,
) -> jni::errors::Result<Lookup<Position>> {
    let name = env.new_string(provider)?;
    let location = env
        .call_method(
            manager,
            "getLastKnownLocation",
            "(Ljava/lang/String;)Landroid/location/Location;",
            &[JValue::Object(&name)],
        )
        .and_then(|value| value.l());

    match location {
        Ok(location) if location.is_null() => Ok(Lookup::Empty),
        Ok(location) => read_position(env, &location).map(Lookup::Found),
        Err(jni::errors::Error::JavaException) if take_unknown_provider(env) => {
            Ok(Lookup::Unknown)
        }
        Err(err) => Err(err),
    }
}

// LocationManager throws IllegalArgumentException for providers it does not
// know. That one is cleared; any other pending exception is rethrown.
fn take_unknown_provider(env: &mut JNIEnv<'_>) -> bool {
    let Ok(throwable) = env.exception_occurred() else {
        return false;
    };
    if throwable.is_null() {
        return false;
    }

    let _ = env.exception_clear();
    if env.is_instance_of(&throwable, ILLEGAL_ARGUMENT).unwrap_or(false) {
        true
    } else {
        let _ = env.throw(throwable);
        false
    }
}

fn map_jni_error(err: jni::errors::Error) -> LocationError {
    match err {
        jni::errors::Error::JavaException => {
            LocationError::Platform("Java exception raised by LocationManager".into())
        }
        other => LocationError::Platform(other.to_string()),
    }
}
