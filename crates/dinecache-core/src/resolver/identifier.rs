//! School and location identifier resolution.
//!
//! Each identifier lives in its own `OnceCell`, which gives the
//! `Unresolved -> Resolving -> Resolved | Failed` lifecycle: the first caller
//! runs the lookup, concurrent callers for the same key wait on it, and a
//! failed lookup leaves the cell empty so the next call goes back to the
//! network. Resolved ids are never invalidated.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info, warn};

use crate::api::client::decode;
use crate::api::{ApiError, Endpoints, Fetch};
use crate::models::{Location, LocationsResponse, SitesResponse};

type MemoMap<K, V> = Mutex<HashMap<K, Arc<OnceCell<V>>>>;

pub struct IdentifierResolver<F> {
    fetcher: F,
    endpoints: Endpoints,
    /// School id by slug
    schools: MemoMap<String, String>,
    /// Location by (school id, location name)
    locations: MemoMap<(String, String), Location>,
}

impl<F: Fetch> IdentifierResolver<F> {
    pub fn new(fetcher: F, api_root: &str) -> Self {
        Self {
            fetcher,
            endpoints: Endpoints::new(api_root),
            schools: Mutex::new(HashMap::new()),
            locations: Mutex::new(HashMap::new()),
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Resolve a school slug to its id, hitting the network only when the
    /// slug has not been resolved before.
    pub async fn resolve_school(&self, slug: &str) -> Option<String> {
        match self.try_resolve_school(slug).await {
            Ok(id) => Some(id),
            Err(e) => {
                warn!(slug = slug, transport = e.is_transport(), error = %e, "Could not resolve school");
                None
            }
        }
    }

    /// Resolve a location name within a school to the location id.
    pub async fn resolve_location(&self, slug: &str, location_name: &str) -> Option<String> {
        self.resolve_location_entry(slug, location_name)
            .await
            .map(|location| location.id)
    }

    /// Like `resolve_location`, but keeps the display name alongside the id.
    pub async fn resolve_location_entry(&self, slug: &str, location_name: &str) -> Option<Location> {
        match self.try_resolve_location(slug, location_name).await {
            Ok(location) => Some(location),
            Err(e) => {
                warn!(
                    slug = slug,
                    location = location_name,
                    transport = e.is_transport(),
                    error = %e,
                    "Could not resolve location"
                );
                None
            }
        }
    }

    /// Cached school id, without touching the network
    pub async fn cached_school(&self, slug: &str) -> Option<String> {
        let schools = self.schools.lock().await;
        schools.get(slug).and_then(|cell| cell.get().cloned())
    }

    /// Cached location id, without touching the network
    pub async fn cached_location(&self, slug: &str, location_name: &str) -> Option<String> {
        let school_id = self.cached_school(slug).await?;
        let locations = self.locations.lock().await;
        locations
            .get(&(school_id, location_name.to_string()))
            .and_then(|cell| cell.get())
            .map(|location| location.id.clone())
    }

    async fn try_resolve_school(&self, slug: &str) -> Result<String, ApiError> {
        let cell = memo_cell(&self.schools, slug.to_string()).await;
        if let Some(id) = cell.get() {
            debug!(slug = slug, "School id cache hit");
            return Ok(id.clone());
        }

        let id = cell.get_or_try_init(|| self.fetch_school_id(slug)).await?;
        Ok(id.clone())
    }

    async fn try_resolve_location(&self, slug: &str, location_name: &str) -> Result<Location, ApiError> {
        let school_id = self.try_resolve_school(slug).await?;

        let cell = memo_cell(&self.locations, (school_id.clone(), location_name.to_string())).await;
        if let Some(location) = cell.get() {
            debug!(location = location_name, "Location id cache hit");
            return Ok(location.clone());
        }

        let location = cell
            .get_or_try_init(|| self.fetch_location(&school_id, location_name))
            .await?;
        Ok(location.clone())
    }

    async fn fetch_school_id(&self, slug: &str) -> Result<String, ApiError> {
        let bytes = self.fetcher.get(&self.endpoints.sites()).await?;
        let sites: SitesResponse = decode(&bytes, "sites listing")?;
        debug!(count = sites.sites.len(), "Scanning sites");

        let site = sites.find_by_slug(slug).ok_or_else(|| ApiError::NotFound {
            kind: "school",
            key: slug.to_string(),
        })?;

        info!(slug = slug, school_id = %site.id, "Resolved school");
        Ok(site.id.clone())
    }

    async fn fetch_location(&self, school_id: &str, location_name: &str) -> Result<Location, ApiError> {
        let bytes = self.fetcher.get(&self.endpoints.locations(school_id)).await?;
        let listing: LocationsResponse = decode(&bytes, "locations listing")?;
        debug!(count = listing.standalone_locations.len(), "Scanning standalone locations");

        let location = listing
            .find_by_name(location_name)
            .ok_or_else(|| ApiError::NotFound {
                kind: "location",
                key: location_name.to_string(),
            })?;

        info!(location = location_name, location_id = %location.id, "Resolved location");
        Ok(location.clone())
    }
}

/// Get or create the memo cell for `key`. The map lock is released before
/// the cell is initialised, so unrelated keys never wait on each other.
async fn memo_cell<K, V>(map: &MemoMap<K, V>, key: K) -> Arc<OnceCell<V>>
where
    K: Eq + Hash,
{
    let mut map = map.lock().await;
    map.entry(key).or_default().clone()
}
