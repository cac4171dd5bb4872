//! Ride entity - A single offered trip.
//!
//! Each ride has a driver, a route, a per-seat price, a seat count and a departure.
//! Rides are read-only once they are listed in a catalog.

use super::driver::Driver;
use crate::errors::{Error, Result};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Fewest seats a ride may offer
pub const MIN_SEATS: u8 = 1;
/// Most seats a ride may offer
pub const MAX_SEATS: u8 = 8;

/// Origin, destination and trip estimates
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Pickup place (e.g., "KLCC")
    pub origin: String,
    /// Drop-off place (e.g., "Sunway Pyramid")
    pub destination: String,
    /// Estimated distance in kilometres
    #[serde(default)]
    pub distance_km: f64,
    /// Estimated duration in minutes
    #[serde(default)]
    pub duration_minutes: u32,
}

impl Route {
    /// Duration in the short form used on ride cards: "45 mins" or "1h 20m".
    #[must_use]
    pub fn duration_label(&self) -> String {
        let hours = self.duration_minutes / 60;
        let minutes = self.duration_minutes % 60;
        if hours == 0 {
            format!("{minutes} mins")
        } else {
            format!("{hours}h {minutes}m")
        }
    }
}

/// Ride model
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ride {
    /// Unique identifier for the ride
    pub id: String,
    /// Driver offering the ride
    pub driver: Driver,
    /// Where the ride goes
    pub route: Route,
    /// Price charged per seat
    pub price_per_seat: f64,
    /// Seats still available (1 - 8)
    pub seats_available: u8,
    /// Departure day; `None` for same-day rides listed by time only
    #[serde(default)]
    pub departure_date: Option<NaiveDate>,
    /// Departure time of day
    pub departure_time: NaiveTime,
    /// Amenities offered (e.g., "AC", "WiFi")
    #[serde(default)]
    pub amenities: BTreeSet<String>,
    /// Free-form notes from the driver
    #[serde(default)]
    pub notes: Option<String>,
}

impl Ride {
    /// Checks the seat and price invariants.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_SEATS..=MAX_SEATS).contains(&self.seats_available) {
            return Err(Error::InvalidSeats {
                seats: self.seats_available,
            });
        }
        if !self.price_per_seat.is_finite() || self.price_per_seat < 0.0 {
            return Err(Error::InvalidAmount {
                amount: self.price_per_seat,
            });
        }
        self.driver.validate()
    }

    /// Key used to order rides by departure. Undated rides sort ahead of dated ones.
    #[must_use]
    pub fn departure_key(&self) -> (Option<NaiveDate>, NaiveTime) {
        (self.departure_date, self.departure_time)
    }

    /// Returns true if the query appears in the origin or destination, ignoring case.
    #[must_use]
    pub fn matches_place(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        needle.is_empty()
            || self.route.origin.to_lowercase().contains(&needle)
            || self.route.destination.to_lowercase().contains(&needle)
    }
}
