//! Ride listing port.

use crate::{
    core::{RideCatalog, RideDraft, RideFilter, composer::create_ride},
    entities::{Driver, Ride},
    errors::{Error, Result},
};
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

/// Lists and creates rides.
#[async_trait]
pub trait RideService: Send + Sync {
    /// All rides, ordered by `filter`.
    async fn rides(&self, filter: RideFilter) -> Result<Vec<Ride>>;

    /// Rides whose origin or destination contains `query`, ordered by `filter`.
    async fn search(&self, query: &str, filter: RideFilter) -> Result<Vec<Ride>>;

    /// A single ride by id.
    async fn ride(&self, id: &str) -> Result<Ride>;

    /// Publishes a ride built from `draft` for `driver`.
    async fn create_ride(&self, draft: &RideDraft, driver: &Driver) -> Result<Ride>;
}

/// Ride service backed by an in-process catalog.
#[derive(Debug)]
pub struct InMemoryRideService {
    catalog: RwLock<RideCatalog>,
}

impl InMemoryRideService {
    /// Serves the rides in `catalog`.
    #[must_use]
    pub fn new(catalog: RideCatalog) -> Self {
        Self {
            catalog: RwLock::new(catalog),
        }
    }
}

#[async_trait]
impl RideService for InMemoryRideService {
    async fn rides(&self, filter: RideFilter) -> Result<Vec<Ride>> {
        Ok(self.catalog.read().await.list(filter))
    }

    async fn search(&self, query: &str, filter: RideFilter) -> Result<Vec<Ride>> {
        Ok(self.catalog.read().await.search(query, filter))
    }

    async fn ride(&self, id: &str) -> Result<Ride> {
        self.catalog
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| Error::RideNotFound { id: id.to_string() })
    }

    async fn create_ride(&self, draft: &RideDraft, driver: &Driver) -> Result<Ride> {
        let ride = create_ride(draft, driver.clone())?;
        self.catalog.write().await.insert(ride.clone())?;
        info!(ride_id = %ride.id, driver = %driver.id, "Ride published");
        Ok(ride)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{sample_driver, sample_rides};

    fn service() -> InMemoryRideService {
        InMemoryRideService::new(RideCatalog::new(sample_rides()).unwrap())
    }

    #[tokio::test]
    async fn test_list_and_lookup() -> Result<()> {
        let service = service();
        let rides = service.rides(RideFilter::LowestPrice).await?;
        assert_eq!(rides.len(), 3);
        assert_eq!(rides[0].id, "1");

        assert_eq!(service.ride("2").await?.route.destination, "Genting Highlands");
        assert!(matches!(
            service.ride("42").await,
            Err(Error::RideNotFound { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_created_ride_is_listed() -> Result<()> {
        let service = service();
        let draft = RideDraft {
            origin: "Petaling Jaya".to_string(),
            destination: "Putrajaya".to_string(),
            date: "2024-01-20".to_string(),
            time: "08:15".to_string(),
            seats: 2,
            price: 14.0,
            ..RideDraft::default()
        };

        let ride = service.create_ride(&draft, &sample_driver("9", 4.6)).await?;

        let found = service.search("putrajaya", RideFilter::All).await?;
        assert_eq!(found, vec![ride]);
        assert_eq!(service.rides(RideFilter::All).await?.len(), 4);
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_draft_is_not_listed() {
        let service = service();
        let result = service
            .create_ride(&RideDraft::default(), &sample_driver("9", 4.6))
            .await;
        assert!(matches!(
            result,
            Err(Error::MissingField { field: "origin" })
        ));
        assert_eq!(service.rides(RideFilter::All).await.unwrap().len(), 3);
    }
}
