//! Platform services backed by the native implementations.

use std::sync::Arc;

use crate::controller::Platform;
use crate::session::View;

#[cfg(not(any(target_os = "android", target_os = "ios")))]
impl Platform {
    /// Desktop services: GeoClue on Linux, message boxes, notifications and
    /// the system URI handler.
    #[must_use]
    pub fn native(view: Arc<dyn View>) -> Self {
        use crate::{dialog, intent, location, permission};

        Self {
            location: Arc::new(location::sys::NativeLocation::new()),
            permissions: Arc::new(permission::sys::NativePermissions::new()),
            dialogs: Arc::new(dialog::sys::NativeDialogs::new()),
            launcher: Arc::new(intent::sys::NativeLauncher::new()),
            view,
        }
    }
}

#[cfg(target_os = "android")]
impl Platform {
    /// Android services bound to the host `activity`.
    ///
    /// The activity must implement the dialog host methods described in
    /// [`crate::dialog::sys::android`].
    ///
    /// # Errors
    ///
    /// Returns an error if a JNI global reference cannot be created.
    pub fn android(
        env: &jni::JNIEnv<'_>,
        activity: &jni::objects::JObject<'_>,
        view: Arc<dyn View>,
    ) -> Result<Self, crate::Error> {
        use crate::dialog::sys::android::AndroidDialogs;
        use crate::intent::sys::android::AndroidLauncher;
        use crate::location::sys::android::AndroidLocationBackend;
        use crate::permission::sys::android::AndroidPermissions;

        Ok(Self {
            location: Arc::new(AndroidLocationBackend::new(env, activity)?),
            permissions: Arc::new(AndroidPermissions::new(env, activity)?),
            dialogs: Arc::new(AndroidDialogs::new(env, activity)?),
            launcher: Arc::new(AndroidLauncher::new(env, activity)?),
            view,
        })
    }
}
