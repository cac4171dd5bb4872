//! Verification session - Runs the identity check in the background.

use super::task::ScopedTask;
use crate::{
    core::VerificationFlow,
    entities::{Rider, VerificationAttempt, VerificationOutcome, VerificationState},
    errors::Result,
    services::{RetryPolicy, VerificationService, with_retry},
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

/// Drives a [`VerificationFlow`] against a [`VerificationService`].
pub struct VerificationSession {
    flow: Arc<Mutex<VerificationFlow>>,
    service: Arc<dyn VerificationService>,
    retry: RetryPolicy,
    profile: Option<Arc<Mutex<Rider>>>,
    pending: Option<ScopedTask>,
}

impl VerificationSession {
    /// A session with no photo taken.
    pub fn new(service: Arc<dyn VerificationService>, retry: RetryPolicy) -> Self {
        Self {
            flow: Arc::new(Mutex::new(VerificationFlow::new())),
            service,
            retry,
            profile: None,
            pending: None,
        }
    }

    /// Marks `profile` verified when a check passes.
    #[must_use]
    pub fn with_profile(mut self, profile: Arc<Mutex<Rider>>) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Takes a photo and starts checking it in the background.
    ///
    /// Returns the attempt id the result will be applied to.
    ///
    /// # Errors
    /// `AlreadyVerifying` while a previous photo is still being checked.
    pub async fn capture(&mut self, image_ref: &str) -> Result<Uuid> {
        let attempt_id = {
            let mut flow = self.flow.lock().await;
            flow.capture(image_ref)?;
            flow.begin_verification()?
        };

        let flow = Arc::clone(&self.flow);
        let service = Arc::clone(&self.service);
        let profile = self.profile.clone();
        let retry = self.retry;
        let image_ref = image_ref.to_string();
        self.pending = Some(ScopedTask::spawn("verification", async move {
            let outcome = with_retry(&retry, "verify", || service.verify(&image_ref))
                .await
                .unwrap_or_else(|error| {
                    warn!(%attempt_id, %error, "Verification service unavailable, rejecting photo");
                    VerificationOutcome::rejected()
                });
            let state = flow.lock().await.complete(attempt_id, outcome);
            if state != Some(VerificationState::Verified) {
                return;
            }
            if let Some(profile) = profile {
                let mut rider = profile.lock().await;
                rider.mark_verified();
                info!(rider = %rider.id, "Rider verified");
            }
        }));
        Ok(attempt_id)
    }

    /// Current state of the flow
    pub async fn state(&self) -> VerificationState {
        self.flow.lock().await.state()
    }

    /// Snapshot of the current attempt
    pub async fn attempt(&self) -> Option<VerificationAttempt> {
        self.flow.lock().await.attempt().cloned()
    }

    /// Whether the "Continue" action is offered
    pub async fn can_continue(&self) -> bool {
        self.flow.lock().await.can_continue()
    }

    /// Whether the "Retake Photo" action is offered
    pub async fn can_retake(&self) -> bool {
        self.flow.lock().await.can_retake()
    }

    /// Proceeds past verification.
    ///
    /// # Errors
    /// `VerificationFailed` or `VerificationIncomplete` unless the photo was verified.
    pub async fn continue_onboarding(&self) -> Result<()> {
        self.flow.lock().await.continue_onboarding()
    }

    /// Returns true while a check is running.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|task| !task.is_finished())
    }
}
