use std::future::Future;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::domain::state::ReplyState;
use crate::error::{AppError, AppResult};

/// Owns the output slot and allows one outstanding request at a time.
#[derive(Debug, Default)]
pub struct ReplySession {
    state: Mutex<ReplyState>,
    busy: AtomicBool,
}

impl ReplySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn display_text(&self) -> Option<String> {
        self.with_state(|state| state.display_text())
    }

    /// Marks a request as outstanding. Fails while another one is running.
    pub fn begin(&self) -> AppResult<InFlight<'_>> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(AppError::Validation(
                "a request is already in progress".to_string(),
            ));
        }
        self.set_state(ReplyState::Loading);
        Ok(InFlight { session: self })
    }

    /// Runs `operation` inside a request slot and records its outcome.
    pub async fn run<F>(&self, operation: F) -> AppResult<()>
    where
        F: Future<Output = AppResult<String>>,
    {
        let flight = self.begin()?;
        let outcome = operation.await;
        flight.finish(outcome);
        Ok(())
    }

    /// Final text of a settled session, or the error it failed with.
    pub fn into_result(self) -> AppResult<String> {
        match self.into_state() {
            ReplyState::Success(text) => Ok(text),
            ReplyState::Failure(error) => Err(error),
            ReplyState::Idle | ReplyState::Loading => Err(AppError::Validation(
                "request finished without a result".to_string(),
            )),
        }
    }

    pub fn into_state(self) -> ReplyState {
        self.state
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn set_state(&self, next: ReplyState) {
        self.with_state(|state| *state = next);
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut ReplyState) -> R) -> R {
        let mut guard = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }
}

/// Guard for an outstanding request.
pub struct InFlight<'a> {
    session: &'a ReplySession,
}

impl InFlight<'_> {
    pub fn finish(self, outcome: AppResult<String>) {
        let next = match outcome {
            Ok(text) => ReplyState::Success(text),
            Err(error) => {
                tracing::warn!(%error, "request failed");
                ReplyState::Failure(error)
            }
        };
        self.session.set_state(next);
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.session.with_state(|state| {
            if state.is_loading() {
                *state = ReplyState::Idle;
            }
        });
        self.session.busy.store(false, Ordering::SeqCst);
    }
}
