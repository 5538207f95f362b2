//! Hotel and point-of-interest records after normalization

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Finite and inside -90..90 / -180..180
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Rounded micro-degrees, used for cache keys
    #[must_use]
    pub fn to_micro(&self) -> (i64, i64) {
        // Valid coordinates are far inside the i64 range.
        let lat = (self.latitude * 1_000_000.0).round() as i64;
        let lng = (self.longitude * 1_000_000.0).round() as i64;
        (lat, lng)
    }
}

/// Hotel or point-of-interest.
///
/// `latitude` and `longitude` are always finite and in range; rows that cannot
/// satisfy this are dropped by the normalizer instead of being constructed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entity {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Catalog content type, e.g. 76 for tourist attractions
    pub category_code: Option<u32>,
    /// Catalog content id, used for detail and image lookups
    pub external_id: Option<String>,
    pub address: Option<String>,
    pub image_url: Option<String>,
    /// Placeholder, not provided by the catalog
    pub price: u32,
    /// Placeholder, not provided by the catalog
    pub rating: f64,
}

impl Entity {
    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// Matches a UI selection by catalog id first, then by display name
    #[must_use]
    pub fn matches_identifier(&self, identifier: &str) -> bool {
        self.external_id.as_deref() == Some(identifier) || self.name == identifier
    }
}

/// Entity with display attributes attached by the category table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnrichedEntity {
    #[serde(flatten)]
    pub entity: Entity,
    pub display_name: String,
    pub color: String,
    pub icon: String,
}

impl EnrichedEntity {
    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        self.entity.coordinates()
    }
}
