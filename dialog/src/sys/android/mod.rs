//! Android dialogs through the host activity.
//!
//! Dialog listeners need Java classes, so the host activity owns the
//! widgets. It implements:
//!
//! - `void showConfirm(long token, String message, String confirm, String cancel)`
//! - `void showNotice(String message, int duration)`
//!
//! and reports each confirm answer back through [`complete_confirm`] with the
//! token it was given.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use futures::FutureExt;
use futures::future::BoxFuture;
use jni::objects::{GlobalRef, JObject, JValue};
use jni::sys::{jint, jlong};
use jni::{JNIEnv, JavaVM};

use crate::pending::{PendingPrompts, answer};
use crate::{Dialog, DialogBackend, DialogError, Notice, NoticeDuration};

// Toast.LENGTH_SHORT / Toast.LENGTH_LONG
const LENGTH_SHORT: jint = 0;
const LENGTH_LONG: jint = 1;

// Registries of every live backend, searched by `complete_confirm`.
static HOSTS: Mutex<Vec<Weak<PendingPrompts>>> = Mutex::new(Vec::new());

fn register(prompts: &Arc<PendingPrompts>) {
    let mut hosts = HOSTS.lock().unwrap_or_else(PoisonError::into_inner);
    hosts.retain(|host| host.strong_count() > 0);
    hosts.push(Arc::downgrade(prompts));
}

/// Deliver the user's answer for the prompt identified by `token`.
///
/// Unknown tokens, including those of closed backends, are ignored.
pub fn complete_confirm(token: u64, confirmed: bool) {
    let hosts: Vec<_> = HOSTS
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .iter()
        .filter_map(Weak::upgrade)
        .collect();

    if !hosts.iter().any(|prompts| prompts.complete(token, confirmed)) {
        log::warn!("confirm result for unknown token {token}");
    }
}

/// Dialog backend that delegates to the host activity.
pub struct AndroidDialogs {
    vm: JavaVM,
    host: GlobalRef,
    prompts: Arc<PendingPrompts>,
}

impl fmt::Debug for AndroidDialogs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AndroidDialogs").finish_non_exhaustive()
    }
}

impl AndroidDialogs {
    /// Create a backend from the host activity.
    ///
    /// # Errors
    ///
    /// Returns an error if the JVM or a global reference cannot be obtained.
    pub fn new(env: &JNIEnv<'_>, host: &JObject<'_>) -> Result<Self, DialogError> {
        let vm = env.get_java_vm().map_err(map_jni_error)?;
        let host = env.new_global_ref(host).map_err(map_jni_error)?;
        let prompts = Arc::new(PendingPrompts::new());
        register(&prompts);
        Ok(Self { vm, host, prompts })
    }

    fn with_attached_env<F>(&self, action: F) -> Result<(), DialogError>
    where
        F: FnOnce(&mut JNIEnv<'_>, &JObject<'_>) -> jni::errors::Result<()>,
    {
        let mut env = self.vm.attach_current_thread().map_err(map_jni_error)?;
        let result = action(&mut env, self.host.as_obj());
        if env.exception_check().unwrap_or(false) {
            let _ = env.exception_describe();
            let _ = env.exception_clear();
        }
        result.map_err(map_jni_error)
    }
}

impl DialogBackend for AndroidDialogs {
    fn confirm(&self, dialog: Dialog) -> BoxFuture<'_, Result<bool, DialogError>> {
        let (token, rx) = match self.prompts.open() {
            Ok(opened) => opened,
            Err(err) => return futures::future::ready(Err(err)).boxed(),
        };

        let shown = self.with_attached_env(|env, host| {
            let message = env.new_string(&dialog.message)?;
            let confirm = env.new_string(&dialog.confirm_label)?;
            let cancel = env.new_string(&dialog.cancel_label)?;
            env.call_method(
                host,
                "showConfirm",
                "(JLjava/lang/String;Ljava/lang/String;Ljava/lang/String;)V",
                &[
                    JValue::Long(token as jlong),
                    JValue::Object(&message),
                    JValue::Object(&confirm),
                    JValue::Object(&cancel),
                ],
            )?;
            Ok(())
        });

        if let Err(err) = shown {
            self.prompts.forget(token);
            return futures::future::ready(Err(err)).boxed();
        }
        answer(rx).boxed()
    }

    fn notify(&self, notice: Notice) -> Result<(), DialogError> {
        let duration = match notice.duration {
            NoticeDuration::Short => LENGTH_SHORT,
            NoticeDuration::Long => LENGTH_LONG,
        };

        self.with_attached_env(|env, host| {
            let message = env.new_string(&notice.message)?;
            env.call_method(
                host,
                "showNotice",
                "(Ljava/lang/String;I)V",
                &[JValue::Object(&message), JValue::Int(duration)],
            )?;
            Ok(())
        })
    }

    fn close(&self) {
        self.prompts.close();
    }
}

fn map_jni_error(err: jni::errors::Error) -> DialogError {
    DialogError::PlatformError(format!("JNI error: {err}"))
}
