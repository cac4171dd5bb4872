//! Background task handle that is cancelled when dropped.

use std::future::Future;
use tokio::task::JoinHandle;
use tracing::trace;

/// Owns a spawned task and aborts it on drop.
#[derive(Debug)]
pub struct ScopedTask {
    name: &'static str,
    handle: JoinHandle<()>,
}

impl ScopedTask {
    /// Spawns `future` on the current runtime.
    ///
    /// # Panics
    /// Panics if called outside a Tokio runtime.
    pub fn spawn<F>(name: &'static str, future: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        trace!(task = name, "Spawning scoped task");
        Self {
            name,
            handle: tokio::spawn(future),
        }
    }

    /// Label used in logs
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns true once the task has run to completion or been aborted.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Aborts the task without waiting for it.
    pub fn cancel(&self) {
        self.handle.abort();
    }
}

impl Drop for ScopedTask {
    fn drop(&mut self) {
        if !self.handle.is_finished() {
            trace!(task = self.name, "Cancelling scoped task");
            self.handle.abort();
        }
    }
}
