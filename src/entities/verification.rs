//! Verification attempt entity - One cycle of capturing and checking an identity photo.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Where an attempt is in the identity check
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationState {
    /// No photo taken yet
    #[default]
    Idle,
    /// Photo taken, check not started
    Captured,
    /// Check outstanding
    Verifying,
    /// Check passed
    Verified,
    /// Check rejected the photo
    Failed,
}

impl VerificationState {
    /// Returns true once a result has been recorded.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Verified | Self::Failed)
    }
}

impl fmt::Display for VerificationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "idle",
            Self::Captured => "captured",
            Self::Verifying => "verifying",
            Self::Verified => "verified",
            Self::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Verification attempt model
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VerificationAttempt {
    /// Unique identifier for the attempt
    pub id: Uuid,
    /// Reference to the captured photo
    pub image_ref: String,
    /// Current state
    pub state: VerificationState,
    /// Confidence reported by the verification service, once known
    pub confidence: Option<f64>,
}

impl VerificationAttempt {
    /// A fresh attempt for a just-captured photo.
    pub fn captured(image_ref: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            image_ref: image_ref.into(),
            state: VerificationState::Captured,
            confidence: None,
        }
    }
}

/// Result reported by a verification service
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VerificationOutcome {
    /// Whether the photo matched
    pub verified: bool,
    /// Service confidence in `[0, 1]`
    pub confidence: f64,
}

impl VerificationOutcome {
    /// A passing outcome with `confidence`.
    #[must_use]
    pub const fn verified(confidence: f64) -> Self {
        Self {
            verified: true,
            confidence,
        }
    }

    /// A rejection with zero confidence.
    #[must_use]
    pub const fn rejected() -> Self {
        Self {
            verified: false,
            confidence: 0.0,
        }
    }

    /// State an attempt ends in when this outcome arrives.
    #[must_use]
    pub const fn final_state(self) -> VerificationState {
        if self.verified {
            VerificationState::Verified
        } else {
            VerificationState::Failed
        }
    }
}
