//! # Country Directory
//!
//! The single source of truth for which countries are currently visible.
//!
//! ```text
//! CountryDirectory
//! ├── source: Arc<dyn CountrySource>   // remote data client
//! ├── fetch: FetchState                // Idle → Loading → Ready | Failed
//! ├── countries: Vec<Country>          // full fetched collection
//! ├── criteria: FilterCriteria         // active narrowing
//! └── visible: Vec<Country>            // countries ∩ criteria
//! ```
//!
//! One network fetch per [`load`](CountryDirectory::load) cycle. Filter
//! updates are synchronous and in-memory: they recompute the visible subset
//! and never refetch.

use std::sync::Arc;

use log::{debug, error};

use crate::api::{ApiError, Country, CountrySource};
use crate::core::filter::{self, FilterCriteria, FilterUpdate};

/// Lifecycle of one fetch cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchState {
    Idle,
    Loading,
    Ready,
    /// Holds the user-facing error message; the collection stays empty.
    Failed(String),
}

pub struct CountryDirectory {
    source: Arc<dyn CountrySource>,
    fetch: FetchState,
    countries: Vec<Country>,
    criteria: FilterCriteria,
    visible: Vec<Country>,
}

impl CountryDirectory {
    pub fn new(source: Arc<dyn CountrySource>) -> Self {
        Self {
            source,
            fetch: FetchState::Idle,
            countries: Vec::new(),
            criteria: FilterCriteria::default(),
            visible: Vec::new(),
        }
    }

    /// Fetches the full collection: `Idle → Loading`, then `Ready` with the
    /// collection stored, or `Failed` with the error message. Dropping the
    /// returned future mid-flight cancels the request and leaves no state
    /// written.
    pub async fn load(&mut self) {
        self.fetch = FetchState::Loading;
        match self.source.list_all().await {
            Ok(countries) => {
                debug!("fetched {} countries", countries.len());
                self.countries = countries;
                self.recompute();
                self.fetch = FetchState::Ready;
            }
            Err(e) => {
                error!("country fetch failed: {}", e);
                self.countries.clear();
                self.visible.clear();
                self.fetch = FetchState::Failed(e.to_string());
            }
        }
    }

    pub fn fetch_state(&self) -> &FetchState {
        &self.fetch
    }

    pub fn is_loading(&self) -> bool {
        self.fetch == FetchState::Loading
    }

    /// The full fetched collection, unfiltered.
    pub fn all(&self) -> &[Country] {
        &self.countries
    }

    /// The collection narrowed by the active criteria.
    pub fn visible(&self) -> &[Country] {
        &self.visible
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Merges a partial criteria change and recomputes the visible subset.
    /// Applying the same update repeatedly yields the same visible set.
    pub fn update_filters(&mut self, update: FilterUpdate) {
        self.criteria.merge(update);
        self.recompute();
    }

    /// Clears all criteria, restoring full visibility.
    pub fn reset_filters(&mut self) {
        self.criteria = FilterCriteria::default();
        self.recompute();
    }

    fn recompute(&mut self) {
        self.visible = filter::apply(&self.countries, &self.criteria);
    }

    /// Lookup within the fetched collection only: cca3, cca2, or the common
    /// name case-insensitively.
    pub fn find_by_code(&self, code: &str) -> Option<&Country> {
        if code.is_empty() {
            return None;
        }
        self.countries.iter().find(|country| country.matches_code(code))
    }

    /// Lookup preferring the fetched collection, falling back to a direct
    /// provider call. Absent from both surfaces [`ApiError::NotFound`].
    pub async fn lookup(&self, code: &str) -> Result<Country, ApiError> {
        if let Some(found) = self.find_by_code(code) {
            return Ok(found.clone());
        }
        debug!("{} not in fetched set, asking provider", code);
        self.source.get_by_code(code).await
    }

    /// Resolves a country's border codes through the fetched collection,
    /// skipping codes that are not part of it.
    pub fn border_countries(&self, country: &Country) -> Vec<&Country> {
        country
            .borders
            .iter()
            .filter_map(|code| self.countries.iter().find(|c| &c.cca3 == code))
            .collect()
    }
}
