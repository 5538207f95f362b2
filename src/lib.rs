//! `TourMap` - Hotel and nearby point-of-interest exploration
//!
//! This library fetches accommodation and attractions from the Korean tourism
//! catalog, normalizes the loosely typed records, attaches category display
//! attributes and ranks places by distance to a selected hotel.

pub mod api;
pub mod attributes;
pub mod cache;
pub mod catalog;
pub mod category;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod normalize;
pub mod ranking;
pub mod service;
pub mod summary;
pub mod web;

// Re-export core types for public API
pub use attributes::{AttributeSource, FixedAttributes, RandomAttributes};
pub use cache::TtlCache;
pub use catalog::{CachedCatalog, CatalogClient, CatalogSource, Fetched, RawPayload};
pub use config::TourMapConfig;
pub use error::{FetchFailure, SchemaMismatch, TourMapError};
pub use models::{Coordinates, EnrichedEntity, Entity, ProximityQuery, Region, RegionQuery, Selection};
pub use normalize::{Normalized, normalize};
pub use ranking::{RankedEntity, nearest, rank_by_distance};
pub use service::{ExploreRequest, ExploreView, HotelListing, NearbyRequest, NearbyView, TourService};
pub use summary::HotelSummary;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, TourMapError>;
