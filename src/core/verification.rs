//! Verification flow - The identity-photo state machine.
//!
//! ```text
//! idle --capture--> captured --begin_verification--> verifying --complete--> verified | failed
//! captured | verified | failed --capture/retake--> captured
//! ```
//!
//! Every result is tagged with the attempt id it answers. A result for an
//! attempt that is no longer current (retaken, or already completed) is
//! ignored, so a late answer can never overwrite a newer attempt.

use crate::{
    entities::{VerificationAttempt, VerificationOutcome, VerificationState},
    errors::{Error, Result},
};
use tracing::{debug, info};
use uuid::Uuid;

/// Tracks the current verification attempt for one rider.
#[derive(Debug, Clone, Default)]
pub struct VerificationFlow {
    attempt: Option<VerificationAttempt>,
}

impl VerificationFlow {
    /// A flow with no photo taken.
    #[must_use]
    pub const fn new() -> Self {
        Self { attempt: None }
    }

    /// Current state (`Idle` until the first capture)
    #[must_use]
    pub fn state(&self) -> VerificationState {
        self.attempt
            .as_ref()
            .map_or(VerificationState::Idle, |attempt| attempt.state)
    }

    /// The current attempt, if a photo has been taken
    #[must_use]
    pub const fn attempt(&self) -> Option<&VerificationAttempt> {
        self.attempt.as_ref()
    }

    /// Records a new photo, replacing any previous attempt.
    ///
    /// # Errors
    /// `AlreadyVerifying` while a check is outstanding.
    pub fn capture(&mut self, image_ref: impl Into<String>) -> Result<&VerificationAttempt> {
        if self.state() == VerificationState::Verifying {
            return Err(Error::AlreadyVerifying);
        }
        let attempt = VerificationAttempt::captured(image_ref);
        debug!(attempt_id = %attempt.id, "Photo captured");
        Ok(self.attempt.insert(attempt))
    }

    /// Replaces a previous photo. Only valid once a photo exists.
    ///
    /// # Errors
    /// * `InvalidTransition` from `Idle`
    /// * `AlreadyVerifying` while a check is outstanding
    pub fn retake(&mut self, image_ref: impl Into<String>) -> Result<&VerificationAttempt> {
        if self.state() == VerificationState::Idle {
            return Err(Error::InvalidTransition {
                action: "retake",
                state: self.state().to_string(),
            });
        }
        self.capture(image_ref)
    }

    /// Starts checking the captured photo and returns the attempt id the result must carry.
    ///
    /// # Errors
    /// `InvalidTransition` unless the state is `Captured`.
    pub fn begin_verification(&mut self) -> Result<Uuid> {
        let state = self.state();
        match self.attempt.as_mut() {
            Some(attempt) if attempt.state == VerificationState::Captured => {
                attempt.state = VerificationState::Verifying;
                debug!(attempt_id = %attempt.id, "Verification started");
                Ok(attempt.id)
            }
            _ => Err(Error::InvalidTransition {
                action: "verify",
                state: state.to_string(),
            }),
        }
    }

    /// Applies a verification result.
    ///
    /// Returns the new state, or `None` if the result was stale and ignored.
    pub fn complete(
        &mut self,
        attempt_id: Uuid,
        outcome: VerificationOutcome,
    ) -> Option<VerificationState> {
        let Some(attempt) = self
            .attempt
            .as_mut()
            .filter(|attempt| attempt.id == attempt_id)
        else {
            debug!(%attempt_id, "Ignoring result for an attempt that was replaced");
            return None;
        };
        if attempt.state.is_terminal() {
            debug!(%attempt_id, state = %attempt.state, "Ignoring duplicate result");
            return None;
        }
        if attempt.state != VerificationState::Verifying {
            debug!(%attempt_id, state = %attempt.state, "Ignoring result for an unchecked photo");
            return None;
        }
        attempt.state = outcome.final_state();
        attempt.confidence = Some(outcome.confidence);
        info!(
            %attempt_id,
            state = %attempt.state,
            confidence = outcome.confidence,
            "Verification completed"
        );
        Some(attempt.state)
    }

    /// Whether the "Continue" action is offered
    #[must_use]
    pub fn can_continue(&self) -> bool {
        self.state() == VerificationState::Verified
    }

    /// Whether the "Retake Photo" action is offered
    #[must_use]
    pub fn can_retake(&self) -> bool {
        self.state() == VerificationState::Failed
    }

    /// Proceeds past verification.
    ///
    /// # Errors
    /// * `VerificationFailed` if the photo was rejected
    /// * `VerificationIncomplete` in every other state except `Verified`
    pub fn continue_onboarding(&self) -> Result<()> {
        match self.state() {
            VerificationState::Verified => Ok(()),
            VerificationState::Failed => Err(Error::VerificationFailed),
            state => Err(Error::VerificationIncomplete {
                state: state.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use rstest::rstest;

    fn verifying_flow() -> (VerificationFlow, Uuid) {
        let mut flow = VerificationFlow::new();
        flow.capture("photo-1").unwrap();
        let id = flow.begin_verification().unwrap();
        (flow, id)
    }

    #[test]
    fn test_happy_path() {
        let (mut flow, id) = verifying_flow();
        assert_eq!(flow.state(), VerificationState::Verifying);

        let state = flow.complete(id, VerificationOutcome::verified(0.98));
        assert_eq!(state, Some(VerificationState::Verified));
        assert_eq!(flow.attempt().unwrap().confidence, Some(0.98));
        assert!(flow.can_continue());
        assert!(!flow.can_retake());
        flow.continue_onboarding().unwrap();
    }

    #[test]
    fn test_failure_offers_retake() {
        let (mut flow, id) = verifying_flow();
        flow.complete(id, VerificationOutcome::rejected());

        assert_eq!(flow.state(), VerificationState::Failed);
        assert!(flow.can_retake());
        assert!(!flow.can_continue());
        assert!(matches!(
            flow.continue_onboarding(),
            Err(Error::VerificationFailed)
        ));

        flow.retake("photo-2").unwrap();
        assert_eq!(flow.state(), VerificationState::Captured);
        assert_eq!(flow.attempt().unwrap().image_ref, "photo-2");
    }

    #[test]
    fn test_capture_rejected_while_verifying() {
        let (mut flow, _) = verifying_flow();
        assert!(matches!(
            flow.capture("photo-2"),
            Err(Error::AlreadyVerifying)
        ));
        assert_eq!(flow.state(), VerificationState::Verifying);
    }

    #[test]
    fn test_stale_result_is_ignored() {
        let (mut flow, first) = verifying_flow();
        // The first check finishes, the rider retakes, and a duplicate answer arrives
        flow.complete(first, VerificationOutcome::rejected());
        flow.retake("photo-2").unwrap();
        let second = flow.begin_verification().unwrap();

        assert_eq!(flow.complete(first, VerificationOutcome::verified(0.9)), None);
        assert_eq!(flow.state(), VerificationState::Verifying);

        assert_eq!(
            flow.complete(second, VerificationOutcome::rejected()),
            Some(VerificationState::Failed)
        );
    }

    #[test]
    fn test_result_before_check_started_is_ignored() {
        let mut flow = VerificationFlow::new();
        let id = flow.capture("photo-1").unwrap().id;
        assert_eq!(flow.complete(id, VerificationOutcome::verified(0.98)), None);
        assert_eq!(flow.state(), VerificationState::Captured);
    }

    #[test]
    fn test_result_applies_only_once() {
        let (mut flow, id) = verifying_flow();
        flow.complete(id, VerificationOutcome::verified(0.98));
        assert!(flow.state().is_terminal());
        assert_eq!(flow.complete(id, VerificationOutcome::rejected()), None);
        assert_eq!(flow.state(), VerificationState::Verified);
    }

    #[rstest]
    #[case::idle(VerificationFlow::new())]
    #[case::verifying(verifying_flow().0)]
    fn test_begin_requires_captured_photo(#[case] mut flow: VerificationFlow) {
        let before = flow.state();
        assert!(matches!(
            flow.begin_verification(),
            Err(Error::InvalidTransition { action: "verify", .. })
        ));
        assert_eq!(flow.state(), before);
    }

    #[test]
    fn test_continue_before_result() {
        let mut flow = VerificationFlow::new();
        assert!(matches!(
            flow.continue_onboarding(),
            Err(Error::VerificationIncomplete { .. })
        ));
        flow.capture("photo-1").unwrap();
        assert!(matches!(
            flow.continue_onboarding(),
            Err(Error::VerificationIncomplete { .. })
        ));
        assert!(!flow.can_continue());
        assert!(!flow.can_retake());
    }

    #[test]
    fn test_retake_needs_a_previous_photo() {
        let mut flow = VerificationFlow::new();
        assert!(matches!(
            flow.retake("photo-1"),
            Err(Error::InvalidTransition { action: "retake", .. })
        ));
    }

    #[test]
    fn test_recapture_after_success_starts_over() {
        let (mut flow, id) = verifying_flow();
        flow.complete(id, VerificationOutcome::verified(0.98));
        let new_id = flow.capture("photo-2").unwrap().id;

        assert_ne!(new_id, id);
        assert_eq!(flow.state(), VerificationState::Captured);
        assert!(!flow.can_continue());
    }
}
