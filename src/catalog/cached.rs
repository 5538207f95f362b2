use super::{CatalogSource, Fetched, RawPayload};
use crate::cache::TtlCache;
use crate::models::{ProximityQuery, RegionQuery};
use async_trait::async_trait;
use std::time::Duration;

/// Cache key for catalog searches
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Region {
        code: u32,
    },
    Radius {
        center_lat: i64, // Lat * 1000000 for precision
        center_lng: i64, // Lng * 1000000 for precision
        radius_meters: u32,
    },
}

impl CacheKey {
    #[must_use]
    pub fn region(query: &RegionQuery) -> Self {
        Self::Region {
            code: query.region.code(),
        }
    }

    #[must_use]
    pub fn radius(query: &ProximityQuery) -> Self {
        let (center_lat, center_lng) = query.center().to_micro();
        Self::Radius {
            center_lat,
            center_lng,
            radius_meters: query.radius_meters(),
        }
    }
}

/// Serves repeated searches from memory until the TTL runs out.
///
/// Only successful payloads are stored; a failed call is handed back as-is so
/// the next reload goes to the network again.
pub struct CachedCatalog<S> {
    inner: S,
    cache: TtlCache<CacheKey, RawPayload>,
}

impl<S: CatalogSource> CachedCatalog<S> {
    #[must_use]
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            cache: TtlCache::new(ttl),
        }
    }

    #[must_use]
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: CatalogSource> CatalogSource for CachedCatalog<S> {
    async fn fetch_by_region(&self, query: &RegionQuery) -> Fetched {
        let key = CacheKey::region(query);
        let result = self
            .cache
            .get_or_try_insert_with(&key, || async {
                self.inner.fetch_by_region(query).await.into_result()
            })
            .await;
        Fetched::from_result(result)
    }

    async fn fetch_by_radius(&self, query: &ProximityQuery) -> Fetched {
        let key = CacheKey::radius(query);
        let result = self
            .cache
            .get_or_try_insert_with(&key, || async {
                self.inner.fetch_by_radius(query).await.into_result()
            })
            .await;
        Fetched::from_result(result)
    }
}
