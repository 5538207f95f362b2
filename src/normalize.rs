//! Record normalizer
//!
//! Turns raw catalog items into [`Entity`] values. Rows that cannot be coerced
//! are dropped one by one; a bad row never aborts the rest of the batch.

use crate::attributes::AttributeSource;
use crate::catalog::RawPayload;
use crate::error::SchemaMismatch;
use crate::models::{Coordinates, Entity};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Result of normalizing one payload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    pub entities: Vec<Entity>,
    /// Rows rejected with a schema mismatch
    pub dropped: usize,
}

/// Catalog item as it arrives; every field is optional and loosely typed
#[derive(Debug, Deserialize)]
struct RawItem {
    #[serde(default)]
    title: Option<Value>,
    /// longitude
    #[serde(default)]
    mapx: Option<Value>,
    /// latitude
    #[serde(default)]
    mapy: Option<Value>,
    #[serde(default)]
    contenttypeid: Option<Value>,
    #[serde(default)]
    contentid: Option<Value>,
    #[serde(default)]
    addr1: Option<Value>,
    #[serde(default)]
    firstimage: Option<Value>,
}

/// Normalize every item of `payload`, assigning placeholder price and rating
pub fn normalize(payload: &RawPayload, attributes: &mut dyn AttributeSource) -> Normalized {
    let mut normalized = Normalized::default();

    for (index, item) in payload.items.iter().enumerate() {
        match to_entity(item, attributes) {
            Ok(entity) => normalized.entities.push(entity),
            Err(reason) => {
                debug!("Dropping catalog item {}: {}", index, reason);
                normalized.dropped += 1;
            }
        }
    }

    if normalized.dropped > 0 {
        debug!(
            "Normalized {} items ({} dropped)",
            normalized.entities.len(),
            normalized.dropped
        );
    }
    normalized
}

fn to_entity(item: &Value, attributes: &mut dyn AttributeSource) -> Result<Entity, SchemaMismatch> {
    if !item.is_object() {
        return Err(SchemaMismatch::NotAnObject);
    }
    let raw = RawItem::deserialize(item).map_err(|_| SchemaMismatch::NotAnObject)?;

    let name = raw
        .title
        .as_ref()
        .and_then(text)
        .ok_or(SchemaMismatch::MissingField("title"))?;

    let latitude = coordinate(raw.mapy.as_ref(), "mapy", 90.0)?;
    let longitude = coordinate(raw.mapx.as_ref(), "mapx", 180.0)?;
    debug_assert!(Coordinates::new(latitude, longitude).is_valid());

    Ok(Entity {
        name,
        latitude,
        longitude,
        category_code: raw.contenttypeid.as_ref().and_then(category_code),
        external_id: raw.contentid.as_ref().and_then(text),
        address: raw.addr1.as_ref().and_then(text),
        image_url: raw.firstimage.as_ref().and_then(text),
        price: attributes.price(),
        rating: attributes.rating(),
    })
}

/// Non-blank string, or a number rendered as one
fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn coordinate(value: Option<&Value>, field: &'static str, limit: f64) -> Result<f64, SchemaMismatch> {
    let value = value.ok_or(SchemaMismatch::MissingField(field))?;
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| SchemaMismatch::NotNumeric {
        field,
        value: value.to_string(),
    })?;

    if !parsed.is_finite() || parsed.abs() > limit {
        return Err(SchemaMismatch::OutOfRange {
            field,
            value: parsed,
        });
    }
    Ok(parsed)
}

fn category_code(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|code| u32::try_from(code).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
