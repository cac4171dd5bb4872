//! Seed data loaded from the `[seed]` section of config.toml
//!
//! Rides reference drivers by id so a driver offering several rides is written
//! once. Everything is validated when it is turned into domain types.

use crate::{
    core::{
        ConversationStore, PaymentMethodSelection, RideCatalog, WalletLedger,
        composer::{parse_departure_date, parse_departure_time},
    },
    entities::{Driver, IncomingMessage, PaymentMethod, Ride, Rider, Route},
    errors::{Error, Result},
};
use chrono::Utc;
use serde::Deserialize;
use std::collections::BTreeSet;

/// The `[seed]` section
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Drivers referenced by `rides`
    pub drivers: Vec<Driver>,
    /// Rides listed at start-up
    pub rides: Vec<RideSeed>,
    /// Rider profile; a fresh guest profile when absent
    pub rider: Option<Rider>,
    /// Opening wallet balance, recorded as a top-up
    pub opening_balance: f64,
    /// Payment methods offered on the wallet screen
    pub payment_methods: Vec<PaymentMethod>,
    /// Messages every new conversation starts with
    pub welcome_messages: Vec<IncomingMessage>,
}

/// A seeded ride
#[derive(Debug, Clone, Deserialize)]
pub struct RideSeed {
    /// Ride id
    pub id: String,
    /// Id of an entry in `drivers`
    pub driver_id: String,
    /// Pickup place
    pub origin: String,
    /// Drop-off place
    pub destination: String,
    /// Estimated distance in kilometres
    #[serde(default)]
    pub distance_km: f64,
    /// Estimated duration in minutes
    #[serde(default)]
    pub duration_minutes: u32,
    /// Price per seat
    pub price_per_seat: f64,
    /// Seats offered
    pub seats_available: u8,
    /// Departure day, "2024-01-20" or "20/01/2024"
    #[serde(default)]
    pub departure_date: Option<String>,
    /// Departure time, "14:30" or "2:30 PM"
    pub departure_time: String,
    /// Amenities offered
    #[serde(default)]
    pub amenities: BTreeSet<String>,
    /// Notes for passengers
    #[serde(default)]
    pub notes: Option<String>,
}

impl SeedConfig {
    /// Looks a seeded driver up by id.
    pub fn driver(&self, id: &str) -> Result<&Driver> {
        self.drivers
            .iter()
            .find(|driver| driver.id == id)
            .ok_or_else(|| Error::InvalidField {
                field: "driver_id",
                value: id.to_string(),
            })
    }

    /// Builds the catalog, resolving each ride's driver.
    ///
    /// # Errors
    /// The first invalid driver, unknown driver id, unparseable departure or
    /// ride that breaks the seat or price rules.
    pub fn build_catalog(&self) -> Result<RideCatalog> {
        let rides = self
            .rides
            .iter()
            .map(|seed| self.build_ride(seed))
            .collect::<Result<Vec<_>>>()?;
        RideCatalog::new(rides)
    }

    fn build_ride(&self, seed: &RideSeed) -> Result<Ride> {
        let driver = self.driver(&seed.driver_id)?;
        driver.validate()?;
        let departure_date = seed
            .departure_date
            .as_deref()
            .map(parse_departure_date)
            .transpose()?;
        Ok(Ride {
            id: seed.id.clone(),
            driver: driver.clone(),
            route: Route {
                origin: seed.origin.clone(),
                destination: seed.destination.clone(),
                distance_km: seed.distance_km,
                duration_minutes: seed.duration_minutes,
            },
            price_per_seat: seed.price_per_seat,
            seats_available: seed.seats_available,
            departure_date,
            departure_time: parse_departure_time(&seed.departure_time)?,
            amenities: seed.amenities.clone(),
            notes: seed.notes.clone(),
        })
    }

    /// The seeded rider, or a new unverified guest.
    pub fn rider(&self) -> Result<Rider> {
        let rider = self.rider.clone().unwrap_or_else(|| Rider {
            id: "guest".to_string(),
            name: "Guest".to_string(),
            email: String::new(),
            rating: 0.0,
            total_rides: 0,
            verified: false,
            member_since: Utc::now().date_naive(),
            notifications_enabled: true,
        });
        rider.validate()?;
        Ok(rider)
    }

    /// The rider's wallet with the opening balance applied.
    pub fn build_ledger(&self, owner_id: &str, currency: &str) -> Result<WalletLedger> {
        WalletLedger::with_opening_balance(owner_id, currency, self.opening_balance)
    }

    /// The payment methods, with the primary one selected.
    #[must_use]
    pub fn payment_selection(&self) -> PaymentMethodSelection {
        PaymentMethodSelection::new(self.payment_methods.clone())
    }

    /// A conversation for `ride_id` holding the welcome messages.
    pub fn build_conversation(&self, ride_id: &str) -> Result<ConversationStore> {
        let mut store = ConversationStore::new(ride_id);
        for message in &self.welcome_messages {
            store.receive(message.clone())?;
        }
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::{
        core::RideFilter,
        entities::{PaymentMethodKind, SenderRole},
    };

    const SEED: &str = r#"
        opening_balance = 45.5

        [rider]
        id = "rider-1"
        name = "Sarah Johnson"
        email = "sarah.johnson@email.com"
        rating = 4.9
        member_since = "2023-01-10"

        [[drivers]]
        id = "d1"
        name = "Ahmad Rahman"
        rating = 4.8
        vehicle = "Toyota Camry"
        plate = "ABC 1234"

        [[rides]]
        id = "1"
        driver_id = "d1"
        origin = "KLCC"
        destination = "Sunway Pyramid"
        price_per_seat = 15.0
        seats_available = 3
        departure_date = "2024-01-20"
        departure_time = "2:30 PM"
        amenities = ["AC", "WiFi"]

        [[payment_methods]]
        id = "bank"
        name = "Online Banking"
        kind = "online-banking"
        detail = "Multiple banks"

        [[welcome_messages]]
        sender = "driver"
        body = "Welcome to your ride chat!"
    "#;

    fn seed() -> SeedConfig {
        toml::from_str(SEED).unwrap()
    }

    #[test]
    fn test_build_catalog_resolves_drivers() {
        let catalog = seed().build_catalog().unwrap();
        let ride = &catalog.list(RideFilter::All)[0];
        assert_eq!(ride.driver.name, "Ahmad Rahman");
        assert_eq!(ride.departure_time.format("%H:%M").to_string(), "14:30");
        assert!(ride.departure_date.is_some());
        assert!(ride.amenities.contains("WiFi"));
    }

    #[test]
    fn test_unknown_driver_rejected() {
        let mut seed = seed();
        seed.rides[0].driver_id = "nobody".to_string();
        assert!(matches!(
            seed.build_catalog(),
            Err(Error::InvalidField { field: "driver_id", .. })
        ));
    }

    #[test]
    fn test_invalid_seeded_ride_rejected() {
        let mut seed = seed();
        seed.rides[0].seats_available = 9;
        assert!(matches!(
            seed.build_catalog(),
            Err(Error::InvalidSeats { seats: 9 })
        ));
    }

    #[test]
    fn test_rider_defaults() {
        let rider = seed().rider().unwrap();
        assert_eq!(rider.name, "Sarah Johnson");
        assert!(rider.notifications_enabled);
        assert!(!rider.verified);

        let guest = SeedConfig::default().rider().unwrap();
        assert_eq!(guest.id, "guest");
    }

    #[test]
    fn test_wallet_and_payment_seed() {
        let seed = seed();
        let ledger = seed.build_ledger("rider-1", "RM").unwrap();
        assert_eq!(ledger.balance(), 45.5);

        let selection = seed.payment_selection();
        let selected = selection.selected().unwrap();
        assert_eq!(selected.kind, PaymentMethodKind::OnlineBanking);
        assert!(!selected.primary);
    }

    #[test]
    fn test_conversation_starts_with_welcome() {
        let store = seed().build_conversation("1").unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.messages()[0].sender, SenderRole::Driver);
        assert_eq!(store.ride_id(), "1");
    }
}
