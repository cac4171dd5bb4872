//! Ride composer - Turns a driver's draft into a listed ride.
//!
//! Validation is pure: `create_ride` either returns a complete, valid `Ride` or the
//! first problem with the draft. The `RideComposer` form wraps a draft with the
//! seat stepper and the price suggestion.

use crate::{
    entities::{Driver, MAX_SEATS, MIN_SEATS, Ride, Route},
    errors::{Error, Result},
};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info};
use uuid::Uuid;

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];
const TIME_FORMATS: [&str; 2] = ["%H:%M", "%I:%M %p"];

/// Inputs of the placeholder fare model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingPolicy {
    /// Base fare per seat
    pub base: f64,
    /// Multiplier for trip distance
    pub distance_factor: f64,
    /// Multiplier for current demand
    pub demand_factor: f64,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            base: 10.0,
            distance_factor: 1.2,
            demand_factor: 1.1,
        }
    }
}

impl PricingPolicy {
    /// The suggested per-seat price under this policy.
    #[must_use]
    pub fn suggest(&self) -> f64 {
        suggest_price(self.base, self.distance_factor, self.demand_factor)
    }
}

/// round(base × distance factor × demand factor)
#[must_use]
pub fn suggest_price(base: f64, distance_factor: f64, demand_factor: f64) -> f64 {
    (base * distance_factor * demand_factor).round()
}

/// Moves the seat count by `delta`, clamped to 1 - 8.
#[must_use]
pub fn adjust_seats(current: u8, delta: i32) -> u8 {
    let next = i32::from(current)
        .saturating_add(delta)
        .clamp(i32::from(MIN_SEATS), i32::from(MAX_SEATS));
    u8::try_from(next).unwrap_or(MIN_SEATS)
}

/// Unvalidated driver input for a new ride.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RideDraft {
    /// Pickup place
    pub origin: String,
    /// Drop-off place
    pub destination: String,
    /// Departure date as typed
    pub date: String,
    /// Departure time as typed
    pub time: String,
    /// Seats offered
    pub seats: u8,
    /// Price per seat
    pub price: f64,
    /// Vehicle used for this ride; the driver's registered vehicle when blank
    pub vehicle: String,
    /// Notes for passengers
    pub description: String,
    /// Estimated distance in kilometres
    pub distance_km: f64,
    /// Estimated duration in minutes
    pub duration_minutes: u32,
    /// Amenities offered
    pub amenities: BTreeSet<String>,
}

impl Default for RideDraft {
    fn default() -> Self {
        Self {
            origin: String::new(),
            destination: String::new(),
            date: String::new(),
            time: String::new(),
            seats: MIN_SEATS,
            price: 0.0,
            vehicle: String::new(),
            description: String::new(),
            distance_km: 0.0,
            duration_minutes: 0,
            amenities: BTreeSet::new(),
        }
    }
}

/// Checks the required fields in order: origin, destination, date, time.
pub fn validate_draft(draft: &RideDraft) -> Result<()> {
    let required = [
        ("origin", &draft.origin),
        ("destination", &draft.destination),
        ("date", &draft.date),
        ("time", &draft.time),
    ];
    match required.iter().find(|(_, value)| value.trim().is_empty()) {
        Some((field, _)) => Err(Error::MissingField { field: *field }),
        None => Ok(()),
    }
}

/// Parses a departure date in `YYYY-MM-DD` or `DD/MM/YYYY` form.
pub fn parse_departure_date(input: &str) -> Result<NaiveDate> {
    let input = input.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(input, format).ok())
        .ok_or_else(|| Error::InvalidField {
            field: "date",
            value: input.to_string(),
        })
}

/// Parses a departure time in `HH:MM` or `h:MM AM/PM` form.
pub fn parse_departure_time(input: &str) -> Result<NaiveTime> {
    let input = input.trim();
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(input, format).ok())
        .ok_or_else(|| Error::InvalidField {
            field: "time",
            value: input.to_string(),
        })
}

/// Validates a draft and builds the ride it describes.
///
/// # Errors
/// * `MissingField` naming the first blank required field
/// * `InvalidField` if the date or time cannot be parsed
/// * `InvalidSeats` if the seat count is outside 1 - 8
/// * `InvalidAmount` if the price is negative or not finite
pub fn create_ride(draft: &RideDraft, mut driver: Driver) -> Result<Ride> {
    validate_draft(draft)?;
    let departure_date = parse_departure_date(&draft.date)?;
    let departure_time = parse_departure_time(&draft.time)?;

    if !draft.vehicle.trim().is_empty() {
        driver.vehicle = draft.vehicle.trim().to_string();
    }
    let notes = Some(draft.description.trim())
        .filter(|notes| !notes.is_empty())
        .map(str::to_string);

    let ride = Ride {
        id: Uuid::new_v4().to_string(),
        driver,
        route: Route {
            origin: draft.origin.trim().to_string(),
            destination: draft.destination.trim().to_string(),
            distance_km: draft.distance_km,
            duration_minutes: draft.duration_minutes,
        },
        price_per_seat: draft.price,
        seats_available: draft.seats,
        departure_date: Some(departure_date),
        departure_time,
        amenities: draft.amenities.clone(),
        notes,
    };
    ride.validate()?;
    Ok(ride)
}

/// The driver's "create ride" form.
#[derive(Debug, Clone, Default)]
pub struct RideComposer {
    draft: RideDraft,
    policy: PricingPolicy,
    suggested_price: Option<f64>,
}

impl RideComposer {
    /// An empty form using `policy` for price suggestions.
    #[must_use]
    pub fn new(policy: PricingPolicy) -> Self {
        Self {
            draft: RideDraft::default(),
            policy,
            suggested_price: None,
        }
    }

    /// The draft as currently entered
    #[must_use]
    pub const fn draft(&self) -> &RideDraft {
        &self.draft
    }

    /// Mutable access for text inputs.
    pub const fn draft_mut(&mut self) -> &mut RideDraft {
        &mut self.draft
    }

    /// The last suggestion, if one was requested
    #[must_use]
    pub const fn suggested_price(&self) -> Option<f64> {
        self.suggested_price
    }

    /// Seat stepper "+"
    pub fn add_seat(&mut self) -> u8 {
        self.draft.seats = adjust_seats(self.draft.seats, 1);
        self.draft.seats
    }

    /// Seat stepper "-"
    pub fn remove_seat(&mut self) -> u8 {
        self.draft.seats = adjust_seats(self.draft.seats, -1);
        self.draft.seats
    }

    /// Computes a suggestion and pre-fills the price input with it.
    ///
    /// This is the only place the composer writes the price; later edits made
    /// through [`RideComposer::set_price`] stand.
    pub fn suggest_price(&mut self) -> f64 {
        let suggested = self.policy.suggest();
        debug!(suggested, "Suggested ride price");
        self.suggested_price = Some(suggested);
        self.draft.price = suggested;
        suggested
    }

    /// Records a price typed by the driver.
    pub const fn set_price(&mut self, price: f64) {
        self.draft.price = price;
    }

    /// Builds the ride and clears the form. On error the form is left as entered.
    pub fn submit(&mut self, driver: &Driver) -> Result<Ride> {
        let ride = create_ride(&self.draft, driver.clone())?;
        info!(
            ride_id = %ride.id,
            origin = %ride.route.origin,
            destination = %ride.route.destination,
            "Ride created"
        );
        self.reset();
        Ok(ride)
    }

    /// Clears the form back to an empty draft.
    pub fn reset(&mut self) {
        self.draft = RideDraft::default();
        self.suggested_price = None;
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::sample_driver;
    use rstest::rstest;

    fn complete_draft() -> RideDraft {
        RideDraft {
            origin: "KLCC".to_string(),
            destination: "Sunway Pyramid".to_string(),
            date: "2024-01-20".to_string(),
            time: "2:30 PM".to_string(),
            seats: 3,
            price: 15.0,
            ..RideDraft::default()
        }
    }

    #[test]
    fn test_suggest_price_rounds() {
        assert_eq!(suggest_price(10.0, 1.2, 1.1), 13.0);
        assert_eq!(PricingPolicy::default().suggest(), 13.0);
        assert_eq!(suggest_price(10.0, 1.25, 1.0), 13.0);
        assert_eq!(suggest_price(0.0, 1.2, 1.1), 0.0);
    }

    #[rstest]
    #[case("origin")]
    #[case("destination")]
    #[case("date")]
    #[case("time")]
    fn test_missing_field_is_named(#[case] field: &str) {
        let mut draft = complete_draft();
        match field {
            "origin" => draft.origin = "  ".to_string(),
            "destination" => draft.destination.clear(),
            "date" => draft.date.clear(),
            _ => draft.time.clear(),
        }
        let err = create_ride(&draft, sample_driver("1", 4.8)).unwrap_err();
        assert!(matches!(err, Error::MissingField { field: f } if f == field));
    }

    #[test]
    fn test_first_missing_field_wins() {
        let draft = RideDraft {
            destination: String::new(),
            time: String::new(),
            ..complete_draft()
        };
        assert!(matches!(
            validate_draft(&draft),
            Err(Error::MissingField {
                field: "destination"
            })
        ));

        assert!(matches!(
            validate_draft(&RideDraft::default()),
            Err(Error::MissingField { field: "origin" })
        ));
    }

    #[test]
    fn test_create_ride_from_complete_draft() {
        let mut draft = complete_draft();
        draft.vehicle = "Honda Civic".to_string();
        draft.description = "  No smoking please ".to_string();
        let ride = create_ride(&draft, sample_driver("1", 4.8)).unwrap();

        assert_eq!(ride.route.origin, "KLCC");
        assert_eq!(ride.seats_available, 3);
        assert_eq!(ride.price_per_seat, 15.0);
        assert_eq!(ride.departure_date, NaiveDate::from_ymd_opt(2024, 1, 20));
        assert_eq!(ride.departure_time, NaiveTime::from_hms_opt(14, 30, 0).unwrap());
        assert_eq!(ride.driver.vehicle, "Honda Civic");
        assert_eq!(ride.notes.as_deref(), Some("No smoking please"));
        assert!(!ride.id.is_empty());
    }

    #[test]
    fn test_create_ride_rejects_bad_values() {
        let draft = RideDraft {
            date: "next tuesday".to_string(),
            ..complete_draft()
        };
        assert!(matches!(
            create_ride(&draft, sample_driver("1", 4.8)),
            Err(Error::InvalidField { field: "date", .. })
        ));

        let draft = RideDraft {
            price: -2.0,
            ..complete_draft()
        };
        assert!(matches!(
            create_ride(&draft, sample_driver("1", 4.8)),
            Err(Error::InvalidAmount { .. })
        ));

        let draft = RideDraft {
            seats: 12,
            ..complete_draft()
        };
        assert!(matches!(
            create_ride(&draft, sample_driver("1", 4.8)),
            Err(Error::InvalidSeats { seats: 12 })
        ));
    }

    #[rstest]
    #[case("2024-01-20")]
    #[case("20/01/2024")]
    fn test_date_formats(#[case] input: &str) {
        assert_eq!(
            parse_departure_date(input).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 20).unwrap()
        );
    }

    #[rstest]
    #[case("14:30")]
    #[case("2:30 PM")]
    #[case("02:30 pm")]
    fn test_time_formats(#[case] input: &str) {
        assert_eq!(
            parse_departure_time(input).unwrap(),
            NaiveTime::from_hms_opt(14, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_adjust_seats_clamps() {
        assert_eq!(adjust_seats(1, -1), 1);
        assert_eq!(adjust_seats(8, 1), 8);
        assert_eq!(adjust_seats(3, 2), 5);
        assert_eq!(adjust_seats(3, 100), 8);
        assert_eq!(adjust_seats(3, i32::MIN), 1);
        assert_eq!(adjust_seats(3, i32::MAX), 8);
    }

    #[test]
    fn test_adjust_seats_stays_in_range_for_any_sequence() {
        let deltas = [1, 1, -3, 5, 7, -2, -9, 4, 1, 1, 1, -1, 8, -8];
        let mut seats = MIN_SEATS;
        for delta in deltas.iter().cycle().take(200) {
            seats = adjust_seats(seats, *delta);
            assert!((MIN_SEATS..=MAX_SEATS).contains(&seats));
        }
    }

    #[test]
    fn test_suggestion_prefills_once_and_keeps_later_edits() {
        let mut composer = RideComposer::new(PricingPolicy::default());
        assert_eq!(composer.suggested_price(), None);

        composer.set_price(9.0);
        assert_eq!(composer.suggest_price(), 13.0);
        assert_eq!(composer.draft().price, 13.0);

        composer.set_price(20.0);
        composer.add_seat();
        composer.draft_mut().origin = "KLCC".to_string();
        assert_eq!(composer.draft().price, 20.0);
        assert_eq!(composer.suggested_price(), Some(13.0));
    }

    #[test]
    fn test_seat_stepper() {
        let mut composer = RideComposer::default();
        assert_eq!(composer.remove_seat(), 1);
        for _ in 0..10 {
            composer.add_seat();
        }
        assert_eq!(composer.draft().seats, 8);
    }

    #[test]
    fn test_submit_resets_form_only_on_success() {
        let mut composer = RideComposer::new(PricingPolicy::default());
        composer.draft_mut().origin = "KLCC".to_string();
        let err = composer.submit(&sample_driver("1", 4.8)).unwrap_err();
        assert!(matches!(err, Error::MissingField { field: "destination" }));
        assert_eq!(composer.draft().origin, "KLCC");

        *composer.draft_mut() = complete_draft();
        composer.suggest_price();
        let ride = composer.submit(&sample_driver("1", 4.8)).unwrap();
        assert_eq!(ride.price_per_seat, 13.0);
        assert_eq!(composer.draft(), &RideDraft::default());
        assert_eq!(composer.suggested_price(), None);
    }
}
