//! Remote tourism catalog
//!
//! Two searches are supported: accommodation by region and everything within a
//! radius of a point. Each call is a single attempt without retry; failures are
//! returned as an empty payload plus the classified [`FetchFailure`], never as an
//! error, so the caller can degrade to an empty map or table.

pub mod cached;
pub mod envelope;

pub use cached::{CacheKey, CachedCatalog};
pub use envelope::RawPayload;

use crate::config::CatalogConfig;
use crate::error::FetchFailure;
use crate::models::{ProximityQuery, RegionQuery};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

const REGION_STAY_ENDPOINT: &str = "searchStay1";
const RADIUS_ENDPOINT: &str = "locationBasedList1";
const MOBILE_OS: &str = "ETC";
const SORT_ORDER: &str = "A";
const FIRST_PAGE: &str = "1";

/// Outcome of one catalog call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fetched {
    pub payload: RawPayload,
    pub failure: Option<FetchFailure>,
}

impl Fetched {
    #[must_use]
    pub fn ok(payload: RawPayload) -> Self {
        Self {
            payload,
            failure: None,
        }
    }

    /// Empty payload carrying the failure
    #[must_use]
    pub fn failed(failure: FetchFailure) -> Self {
        Self {
            payload: RawPayload::empty(),
            failure: Some(failure),
        }
    }

    #[must_use]
    pub fn from_result(result: Result<RawPayload, FetchFailure>) -> Self {
        match result {
            Ok(payload) => Self::ok(payload),
            Err(failure) => Self::failed(failure),
        }
    }

    pub fn into_result(self) -> Result<RawPayload, FetchFailure> {
        match self.failure {
            Some(failure) => Err(failure),
            None => Ok(self.payload),
        }
    }

    /// Message for the UI when the call degraded to empty
    #[must_use]
    pub fn diagnostic(&self) -> Option<String> {
        self.failure
            .as_ref()
            .map(|failure| format!("Catalog unavailable ({failure}); showing no results."))
    }
}

/// Anything that can answer the two catalog searches
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_by_region(&self, query: &RegionQuery) -> Fetched;
    async fn fetch_by_radius(&self, query: &ProximityQuery) -> Fetched;
}

/// HTTP client for the catalog service
pub struct CatalogClient {
    client: Client,
    api_key: String,
    base_url: String,
    rows_per_page: u32,
    app_name: String,
    timeout: Duration,
}

impl CatalogClient {
    /// Create a new client.
    ///
    /// Fails with a configuration error when the credential is absent or
    /// malformed; no request is ever attempted in that case.
    pub fn new(config: &CatalogConfig) -> crate::Result<Self> {
        let api_key = config.validate_api_key()?.to_string();
        let timeout = Duration::from_secs(config.timeout_seconds);

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("TourMap/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| crate::TourMapError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            rows_per_page: config.rows_per_page,
            app_name: config.app_name.clone(),
            timeout,
        })
    }

    fn common_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("serviceKey", self.api_key.clone()),
            ("numOfRows", self.rows_per_page.to_string()),
            ("pageNo", FIRST_PAGE.to_string()),
            ("MobileOS", MOBILE_OS.to_string()),
            ("MobileApp", self.app_name.clone()),
            ("arrange", SORT_ORDER.to_string()),
            ("_type", "json".to_string()),
        ]
    }

    #[instrument(skip(self, extra))]
    async fn request(
        &self,
        endpoint: &str,
        extra: Vec<(&'static str, String)>,
    ) -> Result<RawPayload, FetchFailure> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let mut params = self.common_params();
        params.extend(extra);

        debug!("Catalog request to {}", url);
        let start_time = Instant::now();

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchFailure::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(|e| self.classify(e))?;
        let payload = RawPayload::from_json_str(&body)?;

        info!(
            "Catalog {} returned {} items in {:.3}s",
            endpoint,
            payload.len(),
            start_time.elapsed().as_secs_f64()
        );
        Ok(payload)
    }

    fn classify(&self, error: reqwest::Error) -> FetchFailure {
        if error.is_timeout() {
            FetchFailure::Timeout {
                seconds: self.timeout.as_secs(),
            }
        } else {
            // the URL carries the service key
            FetchFailure::Network(error.without_url().to_string())
        }
    }

    fn settle(endpoint: &str, result: Result<RawPayload, FetchFailure>) -> Fetched {
        if let Err(failure) = &result {
            warn!("Catalog {} failed: {}", endpoint, failure);
        }
        Fetched::from_result(result)
    }
}

#[async_trait]
impl CatalogSource for CatalogClient {
    #[instrument(skip(self), fields(region = query.region.code()))]
    async fn fetch_by_region(&self, query: &RegionQuery) -> Fetched {
        let extra = vec![("areaCode", query.region.code().to_string())];
        let result = self.request(REGION_STAY_ENDPOINT, extra).await;
        Self::settle(REGION_STAY_ENDPOINT, result)
    }

    #[instrument(skip(self), fields(radius = query.radius_meters()))]
    async fn fetch_by_radius(&self, query: &ProximityQuery) -> Fetched {
        let center = query.center();
        let extra = vec![
            ("mapX", center.longitude.to_string()),
            ("mapY", center.latitude.to_string()),
            ("radius", query.radius_meters().to_string()),
        ];
        let result = self.request(RADIUS_ENDPOINT, extra).await;
        Self::settle(RADIUS_ENDPOINT, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TourMapError;

    fn config_with_key(key: Option<&str>) -> CatalogConfig {
        CatalogConfig {
            api_key: key.map(str::to_string),
            ..CatalogConfig::default()
        }
    }

    #[test]
    fn test_client_requires_credential() {
        let result = CatalogClient::new(&config_with_key(None));
        assert!(matches!(result, Err(TourMapError::Config { .. })));

        let result = CatalogClient::new(&config_with_key(Some("bad key")));
        assert!(matches!(result, Err(TourMapError::Config { .. })));
    }

    #[test]
    fn test_client_creation() {
        let mut config = config_with_key(Some("valid_api_key_123"));
        config.base_url = "http://localhost:9999/catalog/".to_string();
        let client = CatalogClient::new(&config).unwrap();
        assert_eq!(client.base_url, "http://localhost:9999/catalog");
        assert_eq!(client.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_common_params() {
        let client = CatalogClient::new(&config_with_key(Some("valid_api_key_123"))).unwrap();
        let params = client.common_params();
        let get = |name: &str| {
            params
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.as_str())
        };
        assert_eq!(get("serviceKey"), Some("valid_api_key_123"));
        assert_eq!(get("numOfRows"), Some("100"));
        assert_eq!(get("pageNo"), Some("1"));
        assert_eq!(get("MobileOS"), Some("ETC"));
        assert_eq!(get("MobileApp"), Some("TourMap"));
        assert_eq!(get("arrange"), Some("A"));
        assert_eq!(get("_type"), Some("json"));
    }

    #[test]
    fn test_fetched_conversions() {
        let failed = Fetched::failed(FetchFailure::Status(500));
        assert!(failed.payload.is_empty());
        assert!(failed.diagnostic().unwrap().contains("500"));
        assert_eq!(failed.into_result(), Err(FetchFailure::Status(500)));

        let ok = Fetched::ok(RawPayload::empty());
        assert!(ok.diagnostic().is_none());
        assert!(ok.into_result().is_ok());
    }
}
