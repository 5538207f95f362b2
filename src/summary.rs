//! Per-category summaries for the tables and the selected-hotel panel

use crate::models::{EnrichedEntity, Entity};
use crate::ranking::RankedEntity;
use serde::Serialize;
use std::collections::BTreeMap;

/// Number of entities per display name
#[must_use]
pub fn category_counts<'a, I>(entities: I) -> BTreeMap<String, usize>
where
    I: IntoIterator<Item = &'a EnrichedEntity>,
{
    let mut counts = BTreeMap::new();
    for entity in entities {
        *counts.entry(entity.display_name.clone()).or_insert(0) += 1;
    }
    counts
}

/// Ranked entities grouped by display name, order inside a group preserved
#[must_use]
pub fn group_by_category(ranked: &[RankedEntity]) -> BTreeMap<String, Vec<RankedEntity>> {
    let mut groups: BTreeMap<String, Vec<RankedEntity>> = BTreeMap::new();
    for entry in ranked {
        groups
            .entry(entry.entity.display_name.clone())
            .or_default()
            .push(entry.clone());
    }
    groups
}

/// Selected hotel plus what is around it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HotelSummary {
    pub name: String,
    pub price: u32,
    pub rating: f64,
    pub nearby_total: usize,
    pub nearby_counts: BTreeMap<String, usize>,
}

impl HotelSummary {
    #[must_use]
    pub fn new(hotel: &Entity, nearby: &[RankedEntity]) -> Self {
        let nearby_counts = category_counts(nearby.iter().map(|entry| &entry.entity));
        Self {
            name: hotel.name.clone(),
            price: hotel.price,
            rating: hotel.rating,
            nearby_total: nearby.len(),
            nearby_counts,
        }
    }

    /// Price with thousands separators, e.g. `215,000`
    #[must_use]
    pub fn format_price(&self) -> String {
        let digits = self.price.to_string();
        let mut formatted = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                formatted.push(',');
            }
            formatted.push(ch);
        }
        formatted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::enrich;
    use crate::models::Coordinates;
    use crate::models::entity::fixtures::entity;
    use crate::ranking::rank_by_distance;

    fn ranked_fixture() -> Vec<RankedEntity> {
        rank_by_distance(
            Coordinates::new(37.5, 127.0),
            vec![
                enrich(entity("Palace", 37.503, 127.0, Some(76))),
                enrich(entity("Noodles", 37.501, 127.0, Some(82))),
                enrich(entity("Tower", 37.502, 127.0, Some(76))),
                enrich(entity("Odd", 37.504, 127.0, Some(999))),
            ],
        )
    }

    #[test]
    fn test_category_counts() {
        let ranked = ranked_fixture();
        let counts = category_counts(ranked.iter().map(|r| &r.entity));
        assert_eq!(counts.get("Tourist Attraction"), Some(&2));
        assert_eq!(counts.get("Dining"), Some(&1));
        assert_eq!(counts.get("999"), Some(&1));
        assert_eq!(counts.values().sum::<usize>(), 4);
    }

    #[test]
    fn test_group_preserves_ranked_order() {
        let groups = group_by_category(&ranked_fixture());
        let attractions: Vec<&str> = groups["Tourist Attraction"]
            .iter()
            .map(|r| r.entity.entity.name.as_str())
            .collect();
        assert_eq!(attractions, vec!["Tower", "Palace"]);
        assert_eq!(groups.len(), 3);
    }

    #[test]
    fn test_hotel_summary() {
        let mut hotel = entity("Grand Hotel", 37.5, 127.0, Some(80));
        hotel.price = 215_000;
        hotel.rating = 4.3;

        let summary = HotelSummary::new(&hotel, &ranked_fixture());
        assert_eq!(summary.name, "Grand Hotel");
        assert_eq!(summary.nearby_total, 4);
        assert_eq!(summary.nearby_counts.get("Dining"), Some(&1));
        assert_eq!(summary.format_price(), "215,000");
    }

    #[test]
    fn test_hotel_summary_without_neighbours() {
        let hotel = entity("Lonely Inn", 37.5, 127.0, Some(80));
        let summary = HotelSummary::new(&hotel, &[]);
        assert_eq!(summary.nearby_total, 0);
        assert!(summary.nearby_counts.is_empty());
    }
}
