//! Prompts waiting for an answer from outside the controller thread.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use futures::channel::oneshot;

use crate::DialogError;

// Tokens are unique across every registry in the process.
static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Default)]
struct State {
    closed: bool,
    open: HashMap<u64, oneshot::Sender<bool>>,
}

/// Open prompts keyed by token, answered later by whoever shows them.
///
/// Closing the registry drops every waiting sender, so the matching
/// receivers resolve as cancelled, and refuses further prompts.
#[derive(Debug, Default)]
pub struct PendingPrompts {
    state: Mutex<State>,
}

impl PendingPrompts {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a prompt and return its token with the receiver for the answer.
    ///
    /// # Errors
    ///
    /// Returns [`DialogError::Dismissed`] once the registry is closed.
    pub fn open(&self) -> Result<(u64, oneshot::Receiver<bool>), DialogError> {
        let mut state = self.state();
        if state.closed {
            return Err(DialogError::Dismissed);
        }

        let token = NEXT_TOKEN.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        state.open.insert(token, tx);
        Ok((token, rx))
    }

    /// Deliver the answer for `token`. Returns `false` if it is not open here.
    pub fn complete(&self, token: u64, confirmed: bool) -> bool {
        match self.state().open.remove(&token) {
            Some(sender) => {
                let _ = sender.send(confirmed);
                true
            }
            None => false,
        }
    }

    /// Drop `token` without answering it.
    pub fn forget(&self, token: u64) {
        self.state().open.remove(&token);
    }

    /// Cancel every open prompt and refuse new ones.
    pub fn close(&self) {
        let mut state = self.state();
        state.closed = true;
        if !state.open.is_empty() {
            log::debug!("dismissing {} open prompt(s)", state.open.len());
        }
        state.open.clear();
    }

    /// Whether [`Self::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.state().closed
    }
}

/// Await the answer for a prompt opened in a [`PendingPrompts`].
///
/// # Errors
///
/// Returns [`DialogError::Dismissed`] if the prompt was cancelled.
pub async fn answer(receiver: oneshot::Receiver<bool>) -> Result<bool, DialogError> {
    receiver.await.map_err(|_| DialogError::Dismissed)
}
