//! Data models for `TourMap`
//!
//! - Entity: normalized hotel / point-of-interest records
//! - Query: region and proximity request parameters, UI selection

pub mod entity;
pub mod query;

pub use entity::{Coordinates, EnrichedEntity, Entity};
pub use query::{ProximityQuery, Region, RegionQuery, Selection};
