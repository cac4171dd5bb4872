//! Rider entity - The passenger's profile.

use super::driver::validate_rating;
use crate::errors::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Rider profile model
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rider {
    /// Unique identifier for the rider
    pub id: String,
    /// Display name
    pub name: String,
    /// Contact email
    pub email: String,
    /// Average star rating given by drivers (0.0 - 5.0)
    pub rating: f64,
    /// Number of completed rides
    #[serde(default)]
    pub total_rides: u32,
    /// Whether the identity check has passed
    #[serde(default)]
    pub verified: bool,
    /// Date the account was created
    pub member_since: NaiveDate,
    /// Whether ride notifications are switched on
    #[serde(default = "default_notifications")]
    pub notifications_enabled: bool,
}

const fn default_notifications() -> bool {
    true
}

impl Rider {
    /// Checks the rating of a model that was built field by field.
    pub fn validate(&self) -> Result<()> {
        validate_rating(self.rating).map(|_| ())
    }

    /// Records a passed identity check.
    pub const fn mark_verified(&mut self) {
        self.verified = true;
    }

    /// Switches ride notifications on or off.
    pub const fn set_notifications(&mut self, enabled: bool) {
        self.notifications_enabled = enabled;
    }

    /// "Member since Jan 2023"
    #[must_use]
    pub fn member_since_label(&self) -> String {
        format!("Member since {}", self.member_since.format("%b %Y"))
    }
}
