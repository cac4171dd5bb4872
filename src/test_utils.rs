//! Shared test utilities for `SamaRide`.
//!
//! This module provides tracing setup for tests and fixture builders for
//! rides, drivers and riders with sensible defaults.

#![allow(clippy::unwrap_used)]

use crate::entities::{Driver, Ride, Rider, Route};
use chrono::{NaiveDate, NaiveTime};
use std::collections::BTreeSet;
use tracing_subscriber::EnvFilter;

/// Routes tracing output through the test harness. Safe to call from every test.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates a test driver with the given rating.
///
/// # Defaults
/// * `name`: "Test Driver"
/// * `vehicle`: "Toyota Camry"
/// * `plate`: "ABC 1234"
pub fn sample_driver(id: &str, rating: f64) -> Driver {
    Driver::new(
        format!("driver-{id}"),
        "Test Driver",
        rating,
        "Toyota Camry",
        "ABC 1234",
    )
    .unwrap()
}

/// Creates a test ride from KLCC to Sunway Pyramid.
///
/// # Arguments
/// * `id` - Ride id
/// * `price` - Price per seat
/// * `rating` - Driver rating
/// * `time` - Departure time as "HH:MM"
///
/// # Defaults
/// * `seats_available`: 3
/// * `departure_date`: None
/// * `amenities`: AC
pub fn sample_ride(id: &str, price: f64, rating: f64, time: &str) -> Ride {
    Ride {
        id: id.to_string(),
        driver: sample_driver(id, rating),
        route: Route {
            origin: "KLCC".to_string(),
            destination: "Sunway Pyramid".to_string(),
            distance_km: 25.0,
            duration_minutes: 45,
        },
        price_per_seat: price,
        seats_available: 3,
        departure_date: None,
        departure_time: NaiveTime::parse_from_str(time, "%H:%M").unwrap(),
        amenities: BTreeSet::from(["AC".to_string()]),
        notes: None,
    }
}

/// The three rides listed on the passenger screen.
///
/// Prices [15, 25, 18], ratings [4.8, 4.9, 4.7], departures 2:30 PM, 3:00 PM, 4:15 PM.
pub fn sample_rides() -> Vec<Ride> {
    let mut klcc = sample_ride("1", 15.0, 4.8, "14:30");
    klcc.driver.name = "Ahmad Rahman".to_string();

    let mut genting = sample_ride("2", 25.0, 4.9, "15:00");
    genting.driver.name = "Siti Nurhaliza".to_string();
    genting.route = Route {
        origin: "Mid Valley".to_string(),
        destination: "Genting Highlands".to_string(),
        distance_km: 45.0,
        duration_minutes: 80,
    };
    genting.seats_available = 2;

    let mut shah_alam = sample_ride("3", 18.0, 4.7, "16:15");
    shah_alam.driver.name = "Lim Wei Ming".to_string();
    shah_alam.route = Route {
        origin: "Bukit Bintang".to_string(),
        destination: "Shah Alam".to_string(),
        distance_km: 35.0,
        duration_minutes: 55,
    };
    shah_alam.seats_available = 4;

    vec![klcc, genting, shah_alam]
}

/// Creates the test rider profile (unverified, member since January 2023).
pub fn sample_rider() -> Rider {
    Rider {
        id: "rider-1".to_string(),
        name: "Sarah Johnson".to_string(),
        email: "sarah.johnson@email.com".to_string(),
        rating: 4.9,
        total_rides: 127,
        verified: false,
        member_since: NaiveDate::from_ymd_opt(2023, 1, 10).unwrap(),
        notifications_enabled: true,
    }
}
