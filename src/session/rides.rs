//! Ride session - The passenger ride list and the driver's create-ride form.

use crate::{
    core::{RideComposer, RideFilter, composer::validate_draft},
    entities::{Driver, Ride},
    errors::Result,
    services::{RetryPolicy, RideService, with_retry},
};
use std::sync::Arc;
use tracing::debug;

/// Keeps the displayed ride list in step with the chosen filter and search text.
pub struct RideSession {
    service: Arc<dyn RideService>,
    retry: RetryPolicy,
    filter: RideFilter,
    query: String,
    results: Arc<[Ride]>,
    composer: RideComposer,
}

impl RideSession {
    /// Loads the unfiltered ride list.
    pub async fn open(
        service: Arc<dyn RideService>,
        composer: RideComposer,
        retry: RetryPolicy,
    ) -> Result<Self> {
        let mut session = Self {
            service,
            retry,
            filter: RideFilter::All,
            query: String::new(),
            results: Arc::from(Vec::new()),
            composer,
        };
        session.refresh().await?;
        Ok(session)
    }

    /// The list currently shown
    #[must_use]
    pub fn results(&self) -> Arc<[Ride]> {
        Arc::clone(&self.results)
    }

    /// Active filter chip
    #[must_use]
    pub const fn filter(&self) -> RideFilter {
        self.filter
    }

    /// Search text
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Switches the filter chip and reloads the list.
    pub async fn set_filter(&mut self, filter: RideFilter) -> Result<Arc<[Ride]>> {
        self.filter = filter;
        self.refresh().await
    }

    /// Changes the search text and reloads the list.
    pub async fn search(&mut self, query: &str) -> Result<Arc<[Ride]>> {
        self.query = query.trim().to_string();
        self.refresh().await
    }

    /// Fetches the list for the current filter and search text.
    ///
    /// On error the previous list stays in place.
    pub async fn refresh(&mut self) -> Result<Arc<[Ride]>> {
        let service = Arc::clone(&self.service);
        let filter = self.filter;
        let query = self.query.as_str();
        let rides = if query.is_empty() {
            with_retry(&self.retry, "rides", || service.rides(filter)).await?
        } else {
            with_retry(&self.retry, "search", || service.search(query, filter)).await?
        };
        debug!(filter = filter.id(), query, count = rides.len(), "Ride list refreshed");
        self.results = Arc::from(rides);
        Ok(self.results())
    }

    /// The create-ride form
    #[must_use]
    pub const fn composer(&self) -> &RideComposer {
        &self.composer
    }

    /// Mutable access to the create-ride form
    pub const fn composer_mut(&mut self) -> &mut RideComposer {
        &mut self.composer
    }

    /// Publishes the drafted ride, clears the form and reloads the list.
    ///
    /// The draft is checked locally first so missing fields never reach the service.
    /// On error the form keeps what was entered.
    pub async fn create_ride(&mut self, driver: &Driver) -> Result<Ride> {
        let draft = self.composer.draft().clone();
        validate_draft(&draft)?;
        let service = Arc::clone(&self.service);
        let ride = with_retry(&self.retry, "create_ride", || {
            service.create_ride(&draft, driver)
        })
        .await?;
        self.composer.reset();
        self.refresh().await?;
        Ok(ride)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        core::RideCatalog,
        errors::Error,
        services::InMemoryRideService,
        test_utils::{sample_driver, sample_rides},
    };

    async fn open_session() -> Result<RideSession> {
        let service = Arc::new(InMemoryRideService::new(RideCatalog::new(sample_rides())?));
        RideSession::open(service, RideComposer::default(), RetryPolicy::default()).await
    }

    fn ids(rides: &[Ride]) -> Vec<&str> {
        rides.iter().map(|ride| ride.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_filter_switch_publishes_new_list() -> Result<()> {
        let mut session = open_session().await?;
        let before = session.results();
        assert_eq!(ids(&before), vec!["1", "2", "3"]);

        let after = session.set_filter(RideFilter::BestRating).await?;
        assert_eq!(ids(&after), vec!["2", "1", "3"]);
        assert_eq!(ids(&before), vec!["1", "2", "3"]);
        assert_eq!(session.filter(), RideFilter::BestRating);
        Ok(())
    }

    #[tokio::test]
    async fn test_search_combines_with_filter() -> Result<()> {
        let mut session = open_session().await?;
        session.set_filter(RideFilter::LowestPrice).await?;

        let found = session.search(" shah ").await?;
        assert_eq!(ids(&found), vec!["3"]);
        assert_eq!(session.query(), "shah");

        let all = session.search("").await?;
        assert_eq!(ids(&all), vec!["1", "3", "2"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_ride_resets_form_and_lists_ride() -> Result<()> {
        let mut session = open_session().await?;
        let composer = session.composer_mut();
        composer.draft_mut().origin = "Cyberjaya".to_string();
        composer.draft_mut().destination = "KL Sentral".to_string();
        composer.draft_mut().date = "2024-01-20".to_string();
        composer.draft_mut().time = "07:30".to_string();
        composer.add_seat();
        composer.suggest_price();

        let ride = session.create_ride(&sample_driver("7", 4.5)).await?;
        assert_eq!(ride.seats_available, 2);
        assert_eq!(session.composer().draft().origin, "");
        assert!(session.results().iter().any(|listed| listed.id == ride.id));
        Ok(())
    }

    #[tokio::test]
    async fn test_incomplete_draft_keeps_form() -> Result<()> {
        let mut session = open_session().await?;
        session.composer_mut().draft_mut().origin = "Cyberjaya".to_string();

        let result = session.create_ride(&sample_driver("7", 4.5)).await;
        assert!(matches!(
            result,
            Err(Error::MissingField {
                field: "destination"
            })
        ));
        assert_eq!(session.composer().draft().origin, "Cyberjaya");
        assert_eq!(session.results().len(), 3);
        Ok(())
    }
}
