//! Fetch → normalize → enrich → rank cycle
//!
//! Every UI interaction runs one independent cycle. Catalog failures degrade to
//! empty views carrying a diagnostic; only invalid input is returned as an error.

use crate::attributes::{AttributeSource, RandomAttributes};
use crate::catalog::{CachedCatalog, CatalogClient, CatalogSource, RawPayload};
use crate::category::enrich_all;
use crate::config::{DefaultsConfig, TourMapConfig};
use crate::models::{Coordinates, EnrichedEntity, ProximityQuery, Region, RegionQuery, Selection};
use crate::normalize::{Normalized, normalize};
use crate::ranking::{RankedEntity, mark_highlighted, nearest, rank_by_distance};
use crate::summary::{HotelSummary, category_counts, group_by_category};
use crate::{Result, TourMapError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Hotels of one region, in catalog order
#[derive(Debug, Clone, Serialize)]
pub struct HotelListing {
    pub region: Region,
    pub hotels: Vec<EnrichedEntity>,
    pub dropped: usize,
    pub diagnostic: Option<String>,
    pub generated_at: DateTime<Utc>,
}

/// Points of interest around a reference point
#[derive(Debug, Clone, Serialize)]
pub struct NearbyView {
    pub reference: Coordinates,
    pub radius_meters: u32,
    /// All results, closest first
    pub entities: Vec<RankedEntity>,
    pub nearest: Vec<RankedEntity>,
    pub category_counts: BTreeMap<String, usize>,
    /// Per-category listings, each closest first
    pub groups: BTreeMap<String, Vec<RankedEntity>>,
    pub highlighted: Option<RankedEntity>,
    pub dropped: usize,
    pub diagnostic: Option<String>,
    pub generated_at: DateTime<Utc>,
}

/// Region hotels, the chosen hotel and its neighbourhood
#[derive(Debug, Clone, Serialize)]
pub struct ExploreView {
    pub region: Region,
    pub hotels: Vec<EnrichedEntity>,
    pub hotel: Option<EnrichedEntity>,
    pub summary: Option<HotelSummary>,
    pub nearby: Option<NearbyView>,
    pub diagnostic: Option<String>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NearbyRequest {
    pub proximity: ProximityQuery,
    pub selection: Selection,
    /// Size of the nearest list; configured default when absent
    pub limit: Option<usize>,
    /// Leave this catalog id out of the results (the hotel itself)
    pub exclude_id: Option<String>,
}

impl NearbyRequest {
    #[must_use]
    pub fn new(proximity: ProximityQuery) -> Self {
        Self {
            proximity,
            selection: Selection::none(),
            limit: None,
            exclude_id: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExploreRequest {
    pub region: RegionQuery,
    /// Hotel id or name; first hotel when absent
    pub hotel: Option<String>,
    pub selection: Selection,
    pub limit: Option<usize>,
}

pub struct TourService {
    catalog: Arc<dyn CatalogSource>,
    attributes: Mutex<Box<dyn AttributeSource>>,
    defaults: DefaultsConfig,
}

impl TourService {
    #[must_use]
    pub fn new(
        catalog: Arc<dyn CatalogSource>,
        attributes: Box<dyn AttributeSource>,
        defaults: DefaultsConfig,
    ) -> Self {
        Self {
            catalog,
            attributes: Mutex::new(attributes),
            defaults,
        }
    }

    /// Wire the HTTP client, cache and attribute source from configuration.
    ///
    /// Fails with a configuration error when the catalog credential is unusable.
    pub fn from_config(config: &TourMapConfig) -> Result<Self> {
        let client = CatalogClient::new(&config.catalog)?;
        let catalog = CachedCatalog::new(client, Duration::from_secs(config.cache.ttl_seconds));
        let attributes = RandomAttributes::from_seed_option(config.defaults.attribute_seed);

        Ok(Self::new(
            Arc::new(catalog),
            Box::new(attributes),
            config.defaults.clone(),
        ))
    }

    #[must_use]
    pub fn defaults(&self) -> &DefaultsConfig {
        &self.defaults
    }

    fn normalize_payload(&self, payload: &RawPayload) -> Normalized {
        let mut attributes = self.attributes.lock().unwrap_or_else(PoisonError::into_inner);
        normalize(payload, &mut **attributes)
    }

    /// Accommodation in a region
    #[instrument(skip(self))]
    pub async fn hotels(&self, query: &RegionQuery) -> HotelListing {
        let fetched = self.catalog.fetch_by_region(query).await;
        let diagnostic = fetched.diagnostic();
        let normalized = self.normalize_payload(&fetched.payload);

        info!(
            "Region {}: {} hotels ({} dropped)",
            query.region,
            normalized.entities.len(),
            normalized.dropped
        );

        HotelListing {
            region: query.region,
            hotels: enrich_all(normalized.entities),
            dropped: normalized.dropped,
            diagnostic,
            generated_at: Utc::now(),
        }
    }

    /// Everything within the radius, ranked by distance to the center
    #[instrument(skip(self))]
    pub async fn nearby(&self, request: &NearbyRequest) -> NearbyView {
        let proximity = &request.proximity;
        let fetched = self.catalog.fetch_by_radius(proximity).await;
        let diagnostic = fetched.diagnostic();
        let normalized = self.normalize_payload(&fetched.payload);

        let entities: Vec<EnrichedEntity> = enrich_all(normalized.entities)
            .into_iter()
            .filter(|e| {
                request.exclude_id.is_none() || e.entity.external_id != request.exclude_id
            })
            .collect();

        let mut ranked = rank_by_distance(proximity.center(), entities);
        let highlighted =
            mark_highlighted(&mut ranked, &request.selection).map(|index| ranked[index].clone());
        let limit = request.limit.unwrap_or(self.defaults.nearest_count);
        let nearest = nearest(&ranked, limit);
        let counts = category_counts(ranked.iter().map(|r| &r.entity));
        let groups = group_by_category(&ranked);

        info!(
            "{} places within {}m ({} dropped)",
            ranked.len(),
            proximity.radius_meters(),
            normalized.dropped
        );

        NearbyView {
            reference: proximity.center(),
            radius_meters: proximity.radius_meters(),
            entities: ranked,
            nearest,
            category_counts: counts,
            groups,
            highlighted,
            dropped: normalized.dropped,
            diagnostic,
            generated_at: Utc::now(),
        }
    }

    /// Region hotels, then the neighbourhood of the chosen one
    #[instrument(skip(self))]
    pub async fn explore(&self, request: &ExploreRequest) -> Result<ExploreView> {
        let listing = self.hotels(&request.region).await;

        let hotel = match &request.hotel {
            Some(identifier) => Some(
                listing
                    .hotels
                    .iter()
                    .find(|h| h.entity.matches_identifier(identifier))
                    .cloned()
                    .ok_or_else(|| {
                        TourMapError::validation(format!(
                            "Hotel '{identifier}' not found in {}",
                            request.region.region
                        ))
                    })?,
            ),
            None => listing.hotels.first().cloned(),
        };

        let Some(hotel) = hotel else {
            warn!("No hotels available in {}", request.region.region);
            return Ok(ExploreView {
                region: listing.region,
                hotels: listing.hotels,
                hotel: None,
                summary: None,
                nearby: None,
                diagnostic: listing.diagnostic,
                generated_at: Utc::now(),
            });
        };

        let radius = request
            .region
            .radius_meters
            .unwrap_or(self.defaults.radius_meters);
        let proximity = ProximityQuery::new(hotel.coordinates(), radius)?;
        let nearby = self
            .nearby(&NearbyRequest {
                proximity,
                selection: request.selection.clone(),
                limit: request.limit,
                exclude_id: hotel.entity.external_id.clone(),
            })
            .await;

        let summary = HotelSummary::new(&hotel.entity, &nearby.entities);
        let diagnostic = listing.diagnostic.or_else(|| nearby.diagnostic.clone());

        Ok(ExploreView {
            region: listing.region,
            hotels: listing.hotels,
            hotel: Some(hotel),
            summary: Some(summary),
            nearby: Some(nearby),
            diagnostic,
            generated_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::FixedAttributes;
    use crate::catalog::Fetched;
    use crate::error::FetchFailure;
    use async_trait::async_trait;
    use serde_json::{Value, json};

    struct StubCatalog {
        hotels: Fetched,
        places: Fetched,
    }

    #[async_trait]
    impl CatalogSource for StubCatalog {
        async fn fetch_by_region(&self, _query: &RegionQuery) -> Fetched {
            self.hotels.clone()
        }

        async fn fetch_by_radius(&self, _query: &ProximityQuery) -> Fetched {
            self.places.clone()
        }
    }

    fn raw(id: &str, title: &str, lat: f64, lng: f64, code: u32) -> Value {
        json!({
            "contentid": id,
            "title": title,
            "mapy": lat.to_string(),
            "mapx": lng.to_string(),
            "contenttypeid": code.to_string()
        })
    }

    fn payload(items: Vec<Value>) -> Fetched {
        Fetched::ok(RawPayload {
            items,
            ..RawPayload::default()
        })
    }

    fn service(hotels: Fetched, places: Fetched) -> TourService {
        TourService::new(
            Arc::new(StubCatalog { hotels, places }),
            Box::new(FixedAttributes {
                price: 200_000,
                rating: 4.5,
            }),
            DefaultsConfig::default(),
        )
    }

    fn seoul_hotels() -> Fetched {
        payload(vec![
            raw("h1", "Grand Hotel", 37.5, 127.0, 80),
            raw("h2", "River Stay", 37.52, 126.98, 80),
        ])
    }

    fn places_around_grand() -> Fetched {
        payload(vec![
            raw("p1", "Museum", 37.5045, 127.0, 78),
            raw("h1", "Grand Hotel", 37.5, 127.0, 80),
            raw("p2", "Noodle Bar", 37.5009, 127.0, 82),
            raw("p3", "Palace", 37.5004, 127.0, 76),
            raw("p4", "Night Market", 37.502, 127.0, 79),
        ])
    }

    #[tokio::test]
    async fn test_hotels_listing() {
        let service = service(seoul_hotels(), Fetched::default());
        let listing = service.hotels(&RegionQuery::new(Region::Seoul)).await;

        assert_eq!(listing.hotels.len(), 2);
        assert_eq!(listing.hotels[0].display_name, "Accommodation");
        assert_eq!(listing.hotels[0].entity.price, 200_000);
        assert!(listing.diagnostic.is_none());
    }

    #[tokio::test]
    async fn test_nearby_ranks_and_highlights() {
        let service = service(Fetched::default(), places_around_grand());
        let proximity = ProximityQuery::new(Coordinates::new(37.5, 127.0), 1000).unwrap();
        let request = NearbyRequest {
            proximity,
            selection: Selection::from_ui(Some("Dining"), Some("Noodle Bar")),
            limit: Some(2),
            exclude_id: Some("h1".to_string()),
        };

        let view = service.nearby(&request).await;
        let order: Vec<&str> = view
            .entities
            .iter()
            .map(|r| r.entity.entity.name.as_str())
            .collect();
        assert_eq!(order, vec!["Palace", "Noodle Bar", "Night Market", "Museum"]);

        let nearest: Vec<&str> = view
            .nearest
            .iter()
            .map(|r| r.entity.entity.name.as_str())
            .collect();
        assert_eq!(nearest, vec!["Palace", "Noodle Bar"]);

        let highlighted = view.highlighted.unwrap();
        assert_eq!(highlighted.entity.entity.name, "Noodle Bar");
        assert!(highlighted.highlighted);
        let flagged: Vec<&str> = view
            .entities
            .iter()
            .filter(|r| r.highlighted)
            .map(|r| r.entity.entity.name.as_str())
            .collect();
        assert_eq!(flagged, vec!["Noodle Bar"]);
        assert!(view.nearest[1].highlighted);

        assert_eq!(view.category_counts.get("Dining"), Some(&1));
        assert_eq!(view.groups.len(), 4);
        assert_eq!(view.groups["Shopping"][0].entity.entity.name, "Night Market");
        assert_eq!(view.category_counts.values().sum::<usize>(), 4);
    }

    #[tokio::test]
    async fn test_nearby_failure_degrades_to_empty() {
        let service = service(
            Fetched::default(),
            Fetched::failed(FetchFailure::Timeout { seconds: 10 }),
        );
        let proximity = ProximityQuery::new(Coordinates::new(37.5, 127.0), 1000).unwrap();

        let view = service.nearby(&NearbyRequest::new(proximity)).await;
        assert!(view.entities.is_empty());
        assert!(view.nearest.is_empty());
        assert!(view.highlighted.is_none());
        assert!(view.diagnostic.unwrap().contains("timed out"));
    }

    #[tokio::test]
    async fn test_explore_defaults_to_first_hotel() {
        let service = service(seoul_hotels(), places_around_grand());
        let request = ExploreRequest {
            region: RegionQuery::new(Region::Seoul),
            hotel: None,
            selection: Selection::none(),
            limit: None,
        };

        let view = service.explore(&request).await.unwrap();
        assert_eq!(view.hotel.unwrap().entity.name, "Grand Hotel");

        let summary = view.summary.unwrap();
        assert_eq!(summary.nearby_total, 4);
        assert_eq!(summary.price, 200_000);
        assert_eq!(summary.rating, 4.5);
        assert_eq!(view.nearby.unwrap().radius_meters, 1000);
    }

    #[tokio::test]
    async fn test_explore_by_hotel_name_and_radius() {
        let service = service(seoul_hotels(), places_around_grand());
        let request = ExploreRequest {
            region: RegionQuery::new(Region::Seoul).with_radius(3000).unwrap(),
            hotel: Some("River Stay".to_string()),
            selection: Selection::none(),
            limit: Some(1),
        };

        let view = service.explore(&request).await.unwrap();
        assert_eq!(view.hotel.unwrap().entity.external_id.as_deref(), Some("h2"));
        let nearby = view.nearby.unwrap();
        assert_eq!(nearby.radius_meters, 3000);
        assert_eq!(nearby.nearest.len(), 1);
        // Grand Hotel is not the selected hotel, so it stays in the results
        assert_eq!(nearby.entities.len(), 5);
    }

    #[tokio::test]
    async fn test_explore_unknown_hotel_is_validation_error() {
        let service = service(seoul_hotels(), places_around_grand());
        let request = ExploreRequest {
            region: RegionQuery::new(Region::Seoul),
            hotel: Some("Nowhere Inn".to_string()),
            selection: Selection::none(),
            limit: None,
        };

        let err = service.explore(&request).await.unwrap_err();
        assert!(matches!(err, TourMapError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_explore_without_hotels() {
        let service = service(
            Fetched::failed(FetchFailure::Status(503)),
            places_around_grand(),
        );
        let request = ExploreRequest {
            region: RegionQuery::new(Region::Jeju),
            hotel: None,
            selection: Selection::none(),
            limit: None,
        };

        let view = service.explore(&request).await.unwrap();
        assert!(view.hotel.is_none());
        assert!(view.nearby.is_none());
        assert!(view.diagnostic.unwrap().contains("503"));
    }

    #[test]
    fn test_from_config_requires_credential() {
        let config = TourMapConfig::default();
        assert!(matches!(
            TourService::from_config(&config),
            Err(TourMapError::Config { .. })
        ));
    }
}
