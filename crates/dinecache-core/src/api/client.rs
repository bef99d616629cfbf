//! HTTP fetch primitive and endpoint URLs for the DineOnCampus API.
//!
//! The `Fetch` trait is the only network boundary in the crate: one GET,
//! raw bytes back, no retries. `HttpFetcher` implements it over reqwest;
//! tests substitute their own implementations.

use std::future::Future;
use std::time::Duration;

use chrono::NaiveDate;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Public API root for Canadian DineOnCampus sites
pub const DEFAULT_API_ROOT: &str = "https://api.dineoncampus.ca";

/// HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Platform query parameter the menu endpoint expects (0 = web)
const MENU_PLATFORM: u8 = 0;

/// A single HTTP GET returning the raw response body.
pub trait Fetch: Send + Sync {
    fn get(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, ApiError>> + Send;
}

/// reqwest-backed fetcher.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, ApiError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    async fn get(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        debug!(url = url, "GET");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &body));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

/// Decode a JSON body, tagging failures with what was being decoded.
pub(crate) fn decode<T: DeserializeOwned>(bytes: &[u8], context: &'static str) -> Result<T, ApiError> {
    serde_json::from_slice(bytes).map_err(|e| ApiError::decode(context, e))
}

/// URL builders for the three endpoints the resolver uses.
#[derive(Debug, Clone)]
pub struct Endpoints {
    api_root: String,
}

impl Endpoints {
    pub fn new(api_root: &str) -> Self {
        Self {
            api_root: api_root.trim_end_matches('/').to_string(),
        }
    }

    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    /// Public listing of every site (school) on the regional API
    pub fn sites(&self) -> String {
        format!("{}/v1/sites/public_ca", self.api_root)
    }

    /// Buildings and standalone locations for one site
    pub fn locations(&self, school_id: &str) -> String {
        format!(
            "{}/v1/locations/buildings_locations?site_id={}",
            self.api_root, school_id
        )
    }

    /// Menu for one period of one location on a given day
    pub fn menu(&self, location_id: &str, period_id: &str, date: NaiveDate) -> String {
        format!(
            "{}/v1/location/{}/periods/{}?platform={}&date={}",
            self.api_root,
            location_id,
            period_id,
            MENU_PLATFORM,
            date.format("%Y%m%d")
        )
    }
}
