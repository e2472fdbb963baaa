use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use notify_rust::{Notification, Timeout};
use rfd::{MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};

use crate::pending::{PendingPrompts, answer};
use crate::{Dialog, DialogBackend, DialogError, Notice};

/// Native message boxes for prompts and desktop notifications for notices.
#[derive(Debug, Clone)]
pub struct DesktopDialogs {
    app_name: String,
    prompts: Arc<PendingPrompts>,
}

impl DesktopDialogs {
    /// Create dialogs whose notices are attributed to the default app name.
    #[must_use]
    pub fn new() -> Self {
        Self::with_app_name("pinpoint")
    }

    /// Create dialogs whose notices are attributed to `app_name`.
    #[must_use]
    pub fn with_app_name(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            prompts: Arc::new(PendingPrompts::new()),
        }
    }
}

impl Default for DesktopDialogs {
    fn default() -> Self {
        Self::new()
    }
}

impl DialogBackend for DesktopDialogs {
    fn confirm(&self, dialog: Dialog) -> BoxFuture<'_, Result<bool, DialogError>> {
        let (token, rx) = match self.prompts.open() {
            Ok(opened) => opened,
            Err(err) => return futures::future::ready(Err(err)).boxed(),
        };

        // Message boxes block, keep them off the caller's thread. A box left
        // open after `close` is answered into an empty registry.
        let prompts = Arc::clone(&self.prompts);
        std::thread::spawn(move || {
            let confirm_label = dialog.confirm_label.clone();
            let message = MessageDialog::new()
                .set_level(MessageLevel::Info)
                .set_description(&dialog.message)
                .set_buttons(MessageButtons::OkCancelCustom(
                    dialog.confirm_label,
                    dialog.cancel_label,
                ));

            let confirmed = match message.show() {
                MessageDialogResult::Ok | MessageDialogResult::Yes => true,
                MessageDialogResult::Custom(label) => label == confirm_label,
                _ => false,
            };

            prompts.complete(token, confirmed);
        });

        answer(rx).boxed()
    }

    fn notify(&self, notice: Notice) -> Result<(), DialogError> {
        Notification::new()
            .appname(&self.app_name)
            .summary(&self.app_name)
            .body(&notice.message)
            .timeout(Timeout::Milliseconds(notice.duration.millis()))
            .show()
            .map(|_| ())
            .map_err(|e| DialogError::PlatformError(format!("notification failed: {e}")))
    }

    fn close(&self) {
        self.prompts.close();
    }
}
