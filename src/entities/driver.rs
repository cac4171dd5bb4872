//! Driver entity - The person offering a ride.
//!
//! Drivers are registered outside this crate and only referenced here, so the
//! model has no mutators. The rating is validated on construction.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};

/// Lowest possible star rating
pub const MIN_RATING: f64 = 0.0;
/// Highest possible star rating
pub const MAX_RATING: f64 = 5.0;

/// Driver model
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    /// Unique identifier for the driver
    pub id: String,
    /// Display name
    pub name: String,
    /// Average star rating (0.0 - 5.0)
    pub rating: f64,
    /// Reference to the driver's profile photo
    #[serde(default)]
    pub photo_ref: Option<String>,
    /// Vehicle make and model (e.g., "Toyota Camry")
    pub vehicle: String,
    /// Registration plate
    pub plate: String,
}

impl Driver {
    /// Creates a driver, rejecting ratings outside 0.0 - 5.0.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        rating: f64,
        vehicle: impl Into<String>,
        plate: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            id: id.into(),
            name: name.into(),
            rating: validate_rating(rating)?,
            photo_ref: None,
            vehicle: vehicle.into(),
            plate: plate.into(),
        })
    }

    /// Attaches a profile photo reference.
    #[must_use]
    pub fn with_photo(mut self, photo_ref: impl Into<String>) -> Self {
        self.photo_ref = Some(photo_ref.into());
        self
    }

    /// Checks the rating of a model that was built field by field (e.g. deserialized).
    pub fn validate(&self) -> Result<()> {
        validate_rating(self.rating).map(|_| ())
    }

    /// Vehicle and plate as shown in the ride header, e.g. "Toyota Camry - ABC 1234".
    #[must_use]
    pub fn vehicle_label(&self) -> String {
        format!("{} - {}", self.vehicle, self.plate)
    }
}

/// Returns the rating unchanged if it is a finite value within 0.0 - 5.0.
pub fn validate_rating(rating: f64) -> Result<f64> {
    if rating.is_finite() && (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(rating)
    } else {
        Err(Error::InvalidRating { rating })
    }
}
