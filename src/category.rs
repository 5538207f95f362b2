//! Category enrichment
//!
//! One compiled-in table maps a catalog content type to its display name,
//! marker color and icon. Keeping the three attributes in a single entry means
//! a code is either fully mapped or falls back as a whole.

use crate::models::{EnrichedEntity, Entity};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;

pub const DEFAULT_ICON: &str = "info";
pub const DEFAULT_COLOR: &str = "lightgray";
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Display attributes for one content type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryStyle {
    pub display_name: &'static str,
    pub color: &'static str,
    pub icon: &'static str,
}

static CATEGORY_TABLE: LazyLock<BTreeMap<u32, CategoryStyle>> = LazyLock::new(|| {
    [
        (75, "Leisure & Sports", "green", "futbol"),
        (76, "Tourist Attraction", "blue", "camera"),
        (77, "Transportation", "gray", "bus"),
        (78, "Cultural Facility", "purple", "landmark"),
        (79, "Shopping", "orange", "shopping-bag"),
        (80, "Accommodation", "darkred", "bed"),
        (82, "Dining", "pink", "utensils"),
        (85, "Festival & Event", "cadetblue", "calendar"),
    ]
    .into_iter()
    .map(|(code, display_name, color, icon)| {
        (
            code,
            CategoryStyle {
                display_name,
                color,
                icon,
            },
        )
    })
    .collect()
});

/// Mapped style for `code`, if any
#[must_use]
pub fn lookup(code: u32) -> Option<&'static CategoryStyle> {
    CATEGORY_TABLE.get(&code)
}

/// All mapped categories in code order, e.g. for a legend
pub fn categories() -> impl Iterator<Item = (u32, &'static CategoryStyle)> {
    CATEGORY_TABLE.iter().map(|(code, style)| (*code, style))
}

/// Display name for an optional code, falling back to the raw code
#[must_use]
pub fn display_name(code: Option<u32>) -> String {
    match code {
        Some(code) => lookup(code).map_or_else(|| code.to_string(), |s| s.display_name.to_string()),
        None => UNCATEGORIZED.to_string(),
    }
}

/// Attach display name, color and icon
#[must_use]
pub fn enrich(entity: Entity) -> EnrichedEntity {
    let style = entity.category_code.and_then(lookup);
    let (color, icon) = style.map_or((DEFAULT_COLOR, DEFAULT_ICON), |s| (s.color, s.icon));

    EnrichedEntity {
        display_name: display_name(entity.category_code),
        color: color.to_string(),
        icon: icon.to_string(),
        entity,
    }
}

pub fn enrich_all(entities: Vec<Entity>) -> Vec<EnrichedEntity> {
    entities.into_iter().map(enrich).collect()
}

impl EnrichedEntity {
    /// Re-derive the display attributes; same result as the first pass
    #[must_use]
    pub fn enrich(self) -> Self {
        enrich(self.entity)
    }
}
