//! Android permission implementation using JNI.
//!
//! Checks go through `Context.checkSelfPermission`; requests go through
//! `Activity.requestPermissions`, whose verdict the host activity forwards
//! from `onRequestPermissionsResult`. Use [`response_from_java`] to turn
//! those callback arguments into a [`PermissionResponse`].

use std::fmt;

use jni::objects::{GlobalRef, JIntArray, JObject, JObjectArray, JString, JValue};
use jni::sys::jint;
use jni::{JNIEnv, JavaVM};

use crate::{
    PERMISSION_GRANTED, Permission, PermissionBackend, PermissionError, PermissionRequest,
    PermissionResponse, PermissionStatus,
};

/// Backend bound to an Android `Activity`.
pub struct AndroidPermissions {
    vm: JavaVM,
    activity: GlobalRef,
}

impl fmt::Debug for AndroidPermissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AndroidPermissions").finish_non_exhaustive()
    }
}

impl AndroidPermissions {
    /// Create a backend from a valid Android `Activity`.
    ///
    /// # Errors
    ///
    /// Returns an error if the JVM or a global reference cannot be obtained.
    pub fn new(env: &JNIEnv<'_>, activity: &JObject<'_>) -> Result<Self, PermissionError> {
        let vm = env.get_java_vm().map_err(map_jni_error)?;
        let activity = env.new_global_ref(activity).map_err(map_jni_error)?;
        Ok(Self { vm, activity })
    }

    fn with_attached_env<T, F>(&self, action: F) -> Result<T, PermissionError>
    where
        F: FnOnce(&mut JNIEnv<'_>, &JObject<'_>) -> jni::errors::Result<T>,
    {
        let mut env = self.vm.attach_current_thread().map_err(map_jni_error)?;
        let result = action(&mut env, self.activity.as_obj());
        if env.exception_check().unwrap_or(false) {
            let _ = env.exception_describe();
            let _ = env.exception_clear();
        }
        result.map_err(map_jni_error)
    }
}

impl PermissionBackend for AndroidPermissions {
    fn check(&self, permission: Permission) -> PermissionStatus {
        let result = self.with_attached_env(|env, activity| {
            let name = env.new_string(permission.android_name())?;
            env.call_method(
                activity,
                "checkSelfPermission",
                "(Ljava/lang/String;)I",
                &[JValue::Object(&name)],
            )?
            .i()
        });

        match result {
            Ok(PERMISSION_GRANTED) => PermissionStatus::Granted,
            Ok(_) => PermissionStatus::Denied,
            Err(err) => {
                log::error!("checkSelfPermission failed: {err}");
                PermissionStatus::NotDetermined
            }
        }
    }

    fn request(&self, request: &PermissionRequest) -> Result<(), PermissionError> {
        self.with_attached_env(|env, activity| {
            let len = jint::try_from(request.permissions.len()).unwrap_or(jint::MAX);
            let names = env.new_object_array(len, "java/lang/String", JObject::null())?;
            for (index, permission) in (0..len).zip(&request.permissions) {
                let name = env.new_string(permission.android_name())?;
                env.set_object_array_element(&names, index, name)?;
            }

            env.call_method(
                activity,
                "requestPermissions",
                "([Ljava/lang/String;I)V",
                &[JValue::Object(&names), JValue::Int(request.code)],
            )?;
            Ok(())
        })
    }
}

/// Convert the arguments of `onRequestPermissionsResult` into a response.
///
/// # Errors
///
/// Returns an error if the Java arrays cannot be read.
pub fn response_from_java(
    env: &mut JNIEnv<'_>,
    request_code: jint,
    permissions: &JObjectArray<'_>,
    grant_results: &JIntArray<'_>,
) -> Result<PermissionResponse, PermissionError> {
    let mut names = Vec::new();
    if !permissions.is_null() {
        let len = env.get_array_length(permissions).map_err(map_jni_error)?;
        for index in 0..len {
            let element = env
                .get_object_array_element(permissions, index)
                .map_err(map_jni_error)?;
            let name: String = env
                .get_string(&JString::from(element))
                .map_err(map_jni_error)?
                .into();
            names.push(name);
        }
    }

    let mut results = Vec::new();
    if !grant_results.is_null() {
        let len = env.get_array_length(grant_results).map_err(map_jni_error)?;
        results = vec![0; usize::try_from(len).unwrap_or_default()];
        env.get_int_array_region(grant_results, 0, &mut results)
            .map_err(map_jni_error)?;
    }

    Ok(PermissionResponse {
        request_code,
        permissions: names,
        grant_results: results,
    })
}

fn map_jni_error(err: jni::errors::Error) -> PermissionError {
    PermissionError::Platform(format!("JNI error: {err}"))
}
