//! Android intents using JNI.

use std::fmt;

use jni::objects::{GlobalRef, JObject, JValue};
use jni::{JNIEnv, JavaVM};

use crate::{Intent, IntentError, Launcher};

const ACTIVITY_NOT_FOUND: &str = "android/content/ActivityNotFoundException";

/// Launcher bound to an Android `Activity`.
pub struct AndroidLauncher {
    vm: JavaVM,
    activity: GlobalRef,
}

impl fmt::Debug for AndroidLauncher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AndroidLauncher").finish_non_exhaustive()
    }
}

impl AndroidLauncher {
    /// Create a launcher from a valid Android `Activity`.
    ///
    /// # Errors
    ///
    /// Returns an error if the JVM or a global reference cannot be obtained.
    pub fn new(env: &JNIEnv<'_>, activity: &JObject<'_>) -> Result<Self, IntentError> {
        let vm = env
            .get_java_vm()
            .map_err(|e| IntentError::Platform(format!("JNI error: {e}")))?;
        let activity = env
            .new_global_ref(activity)
            .map_err(|e| IntentError::Platform(format!("JNI error: {e}")))?;
        Ok(Self { vm, activity })
    }
}

fn build_intent<'local>(
    env: &mut JNIEnv<'local>,
    intent: &Intent,
) -> jni::errors::Result<JObject<'local>> {
    let action = env.new_string(intent.action())?;

    match intent {
        Intent::View { uri, package } => {
            let uri = env.new_string(uri)?;
            let uri = env
                .call_static_method(
                    "android/net/Uri",
                    "parse",
                    "(Ljava/lang/String;)Landroid/net/Uri;",
                    &[JValue::Object(&uri)],
                )?
                .l()?;
            let view = env.new_object(
                "android/content/Intent",
                "(Ljava/lang/String;Landroid/net/Uri;)V",
                &[JValue::Object(&action), JValue::Object(&uri)],
            )?;
            if let Some(package) = package {
                let package = env.new_string(package)?;
                env.call_method(
                    &view,
                    "setPackage",
                    "(Ljava/lang/String;)Landroid/content/Intent;",
                    &[JValue::Object(&package)],
                )?;
            }
            Ok(view)
        }
        Intent::LocationSettings => env.new_object(
            "android/content/Intent",
            "(Ljava/lang/String;)V",
            &[JValue::Object(&action)],
        ),
    }
}

impl Launcher for AndroidLauncher {
    fn launch(&self, intent: &Intent) -> Result<(), IntentError> {
        let mut env = self
            .vm
            .attach_current_thread()
            .map_err(|e| IntentError::Platform(format!("attach failed: {e}")))?;

        let result = build_intent(&mut env, intent).and_then(|java_intent| {
            env.call_method(
                self.activity.as_obj(),
                "startActivity",
                "(Landroid/content/Intent;)V",
                &[JValue::Object(&java_intent)],
            )
            .map(|_| ())
        });

        match result {
            Ok(()) => {
                log::info!("started {}", intent.action());
                Ok(())
            }
            Err(jni::errors::Error::JavaException) => {
                let not_found = env
                    .exception_occurred()
                    .ok()
                    .filter(|throwable| !throwable.is_null())
                    .is_some_and(|throwable| {
                        let _ = env.exception_clear();
                        env.is_instance_of(&throwable, ACTIVITY_NOT_FOUND)
                            .unwrap_or(false)
                    });
                let _ = env.exception_clear();

                if not_found {
                    Err(IntentError::NoHandler(format!("{intent:?}")))
                } else {
                    Err(IntentError::Platform(format!(
                        "startActivity threw for {}",
                        intent.action()
                    )))
                }
            }
            Err(err) => Err(IntentError::Platform(format!("JNI error: {err}"))),
        }
    }
}
