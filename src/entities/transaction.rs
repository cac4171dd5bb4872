//! Transaction entity - One immutable entry in a wallet's history.
//!
//! The sign of `amount` always matches the `kind`: top-ups are positive and
//! ride charges are negative. The constructors enforce this.

use crate::errors::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What moved the money
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    /// Money added to the wallet
    #[serde(rename = "topup")]
    TopUp,
    /// Money paid for a ride
    #[serde(rename = "ride-charge")]
    RideCharge,
}

/// Settlement state of a transaction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Settled and counted in the balance
    #[default]
    Completed,
    /// Submitted but not yet settled
    Pending,
    /// Rejected by the payment provider
    Failed,
}

/// Transaction model
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier for the transaction
    pub id: String,
    /// Top-up or ride charge
    pub kind: TransactionKind,
    /// Signed amount (positive for top-ups, negative for ride charges)
    pub amount: f64,
    /// Human-readable description (e.g., "Ride to KLCC")
    pub description: String,
    /// When the transaction was created
    pub date: DateTime<Utc>,
    /// Settlement state
    #[serde(default)]
    pub status: TransactionStatus,
}

impl Transaction {
    /// Creates a completed top-up of `amount`, which must be positive and finite.
    pub fn top_up(amount: f64, description: impl Into<String>) -> Result<Self> {
        let amount = positive_amount(amount)?;
        Ok(Self::new(TransactionKind::TopUp, amount, description.into()))
    }

    /// Creates a completed ride charge. `amount` is the positive fare; the stored
    /// amount is its negation.
    pub fn ride_charge(amount: f64, description: impl Into<String>) -> Result<Self> {
        let amount = positive_amount(amount)?;
        Ok(Self::new(
            TransactionKind::RideCharge,
            -amount,
            description.into(),
        ))
    }

    fn new(kind: TransactionKind, amount: f64, description: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            amount,
            description,
            date: Utc::now(),
            status: TransactionStatus::Completed,
        }
    }

    /// Returns the same transaction with a different status.
    #[must_use]
    pub const fn with_status(mut self, status: TransactionStatus) -> Self {
        self.status = status;
        self
    }

    /// Returns true if the amount's sign agrees with the kind.
    #[must_use]
    pub fn sign_matches_kind(&self) -> bool {
        match self.kind {
            TransactionKind::TopUp => self.amount > 0.0,
            TransactionKind::RideCharge => self.amount < 0.0,
        }
    }

    /// Signed amount as displayed in the history list, e.g. "+RM 50.00".
    #[must_use]
    pub fn amount_label(&self, currency: &str) -> String {
        let sign = if self.amount < 0.0 { '-' } else { '+' };
        format!("{sign}{currency} {:.2}", self.amount.abs())
    }
}

fn positive_amount(amount: f64) -> Result<f64> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(Error::InvalidAmount { amount })
    }
}
