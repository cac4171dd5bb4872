//! Identity verification port.

use crate::{entities::VerificationOutcome, errors::Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Checks a captured identity photo.
#[async_trait]
pub trait VerificationService: Send + Sync {
    /// Verify the photo at `image_ref`.
    async fn verify(&self, image_ref: &str) -> Result<VerificationOutcome>;
}

/// Stand-in verifier: waits a fixed delay, then returns a fixed outcome.
///
/// # Defaults
/// * `delay`: 3 seconds
/// * `outcome`: verified with confidence 0.98
#[derive(Debug, Clone, Copy)]
pub struct SimulatedVerificationService {
    delay: Duration,
    outcome: VerificationOutcome,
}

impl Default for SimulatedVerificationService {
    fn default() -> Self {
        Self::new(Duration::from_secs(3), VerificationOutcome::verified(0.98))
    }
}

impl SimulatedVerificationService {
    /// A verifier that answers `outcome` after `delay`.
    #[must_use]
    pub const fn new(delay: Duration, outcome: VerificationOutcome) -> Self {
        Self { delay, outcome }
    }
}

#[async_trait]
impl VerificationService for SimulatedVerificationService {
    async fn verify(&self, image_ref: &str) -> Result<VerificationOutcome> {
        debug!(image_ref, delay_ms = ?self.delay, "Simulating identity check");
        tokio::time::sleep(self.delay).await;
        Ok(self.outcome)
    }
}
