//! Ride catalog - Holds the rides on offer and orders them for display.
//!
//! Sorting never mutates the stored rides. Each filter change publishes a new
//! shared snapshot, so a reader holding the previous snapshot keeps a complete,
//! consistently ordered list.

use crate::{
    entities::Ride,
    errors::{Error, Result},
};
use std::{str::FromStr, sync::Arc};
use tracing::debug;

/// Ordering applied to the ride list
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RideFilter {
    /// Insertion order
    #[default]
    All,
    /// Cheapest seat first
    LowestPrice,
    /// Highest driver rating first
    BestRating,
    /// Earliest departure first
    Earliest,
}

impl RideFilter {
    /// Every filter, in the order the filter chips are shown.
    pub const ALL: [Self; 4] = [Self::All, Self::LowestPrice, Self::BestRating, Self::Earliest];

    /// Identifier used by the UI ("all", "price", "rating", "time").
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::LowestPrice => "price",
            Self::BestRating => "rating",
            Self::Earliest => "time",
        }
    }

    /// Chip label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All Rides",
            Self::LowestPrice => "Lowest Price",
            Self::BestRating => "Best Rating",
            Self::Earliest => "Earliest",
        }
    }
}

impl FromStr for RideFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|filter| filter.id() == s)
            .ok_or_else(|| Error::InvalidField {
                field: "filter",
                value: s.to_string(),
            })
    }
}

/// Sorts rides in place. The sort is stable, so ties keep their relative order.
pub fn sort_rides(rides: &mut [Ride], filter: RideFilter) {
    match filter {
        RideFilter::All => {}
        RideFilter::LowestPrice => {
            rides.sort_by(|a, b| a.price_per_seat.total_cmp(&b.price_per_seat));
        }
        RideFilter::BestRating => {
            rides.sort_by(|a, b| b.driver.rating.total_cmp(&a.driver.rating));
        }
        RideFilter::Earliest => rides.sort_by_key(Ride::departure_key),
    }
}

/// The set of rides offered during a session.
#[derive(Debug, Clone)]
pub struct RideCatalog {
    rides: Vec<Ride>,
    filter: RideFilter,
    view: Arc<[Ride]>,
}

impl RideCatalog {
    /// Builds a catalog, rejecting rides that break the seat or price invariants.
    pub fn new(rides: Vec<Ride>) -> Result<Self> {
        for ride in &rides {
            ride.validate()?;
        }
        let view = Arc::from(rides.clone());
        Ok(Self {
            rides,
            filter: RideFilter::All,
            view,
        })
    }

    /// Returns the rides ordered by `filter`, without changing the published view.
    #[must_use]
    pub fn list(&self, filter: RideFilter) -> Vec<Ride> {
        let mut rides = self.rides.clone();
        sort_rides(&mut rides, filter);
        rides
    }

    /// Returns the rides whose origin or destination contains `query`, ordered by `filter`.
    #[must_use]
    pub fn search(&self, query: &str, filter: RideFilter) -> Vec<Ride> {
        let mut rides: Vec<Ride> = self
            .rides
            .iter()
            .filter(|ride| ride.matches_place(query))
            .cloned()
            .collect();
        sort_rides(&mut rides, filter);
        rides
    }

    /// Switches the active filter and publishes a freshly sorted snapshot.
    pub fn apply_filter(&mut self, filter: RideFilter) -> Arc<[Ride]> {
        debug!(filter = filter.id(), "Applying ride filter");
        self.filter = filter;
        self.view = Arc::from(self.list(filter));
        Arc::clone(&self.view)
    }

    /// The currently published snapshot
    #[must_use]
    pub fn view(&self) -> Arc<[Ride]> {
        Arc::clone(&self.view)
    }

    /// The filter the published snapshot was sorted with
    #[must_use]
    pub const fn active_filter(&self) -> RideFilter {
        self.filter
    }

    /// Adds a ride after the existing ones and republishes the view.
    pub fn insert(&mut self, ride: Ride) -> Result<()> {
        ride.validate()?;
        if self.get(&ride.id).is_some() {
            return Err(Error::InvalidField {
                field: "id",
                value: ride.id,
            });
        }
        self.rides.push(ride);
        self.apply_filter(self.filter);
        Ok(())
    }

    /// Looks a ride up by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Ride> {
        self.rides.iter().find(|ride| ride.id == id)
    }

    /// Number of rides in the catalog
    #[must_use]
    pub fn len(&self) -> usize {
        self.rides.len()
    }

    /// Returns true if the catalog holds no rides.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rides.is_empty()
    }
}
