//! Proximity ranking
//!
//! Distances are planar Euclidean distances on raw latitude/longitude degrees.
//! This is not a geodesic distance; it only has to order points that are a few
//! kilometers apart, and every consumer of the ranking expects this metric.

use crate::models::{Coordinates, EnrichedEntity, Selection};
use serde::Serialize;

/// Entity with its distance to the reference point, in degrees
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntity {
    #[serde(flatten)]
    pub entity: EnrichedEntity,
    pub distance: f64,
    /// The one entity picked in the UI dropdowns
    pub highlighted: bool,
}

#[must_use]
pub fn planar_distance(a: Coordinates, b: Coordinates) -> f64 {
    (a.latitude - b.latitude).hypot(a.longitude - b.longitude)
}

/// Sort by distance from `reference`; equal distances keep input order
#[must_use]
pub fn rank_by_distance(reference: Coordinates, entities: Vec<EnrichedEntity>) -> Vec<RankedEntity> {
    let mut ranked: Vec<RankedEntity> = entities
        .into_iter()
        .map(|entity| RankedEntity {
            distance: planar_distance(reference, entity.coordinates()),
            entity,
            highlighted: false,
        })
        .collect();

    // stable
    ranked.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    ranked
}

/// The first `n` entries of an already ranked list
#[must_use]
pub fn nearest(ranked: &[RankedEntity], n: usize) -> Vec<RankedEntity> {
    ranked.iter().take(n).cloned().collect()
}

/// Whether `candidate` belongs to the selected category and is the selected entity
#[must_use]
pub fn matches_selection(candidate: &EnrichedEntity, selection: &Selection) -> bool {
    match (&selection.category, &selection.entity) {
        (Some(category), Some(identifier)) => {
            candidate.display_name == *category && candidate.entity.matches_identifier(identifier)
        }
        _ => false,
    }
}

/// Index of the single highlighted entity, the first match in order
#[must_use]
pub fn highlighted_index(ranked: &[RankedEntity], selection: &Selection) -> Option<usize> {
    ranked
        .iter()
        .position(|r| matches_selection(&r.entity, selection))
}

/// Flag exactly the highlighted entry, clearing any other; returns its index
pub fn mark_highlighted(ranked: &mut [RankedEntity], selection: &Selection) -> Option<usize> {
    let index = highlighted_index(ranked, selection);
    for (i, entry) in ranked.iter_mut().enumerate() {
        entry.highlighted = index == Some(i);
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::enrich;
    use crate::models::entity::fixtures::entity;

    fn enriched(name: &str, lat: f64, lng: f64, code: Option<u32>) -> EnrichedEntity {
        enrich(entity(name, lat, lng, code))
    }

    fn names(ranked: &[RankedEntity]) -> Vec<&str> {
        ranked.iter().map(|r| r.entity.entity.name.as_str()).collect()
    }

    #[test]
    fn test_planar_distance() {
        let a = Coordinates::new(0.0, 0.0);
        let b = Coordinates::new(3.0, 4.0);
        assert_eq!(planar_distance(a, b), 5.0);
        assert_eq!(planar_distance(b, a), 5.0);
        assert_eq!(planar_distance(a, a), 0.0);
    }

    #[test]
    fn test_stable_on_ties() {
        let reference = Coordinates::new(0.0, 0.0);
        let entities = vec![
            enriched("A", 1.0, 0.0, None),
            enriched("B", 2.0, 0.0, None),
            enriched("C", 0.0, 1.0, None),
        ];

        let ranked = rank_by_distance(reference, entities);
        assert_eq!(names(&ranked), vec!["A", "C", "B"]);
        assert_eq!(ranked[0].distance, 1.0);
        assert_eq!(ranked[1].distance, 1.0);
        assert_eq!(ranked[2].distance, 2.0);
    }

    #[test]
    fn test_nearest_bounds() {
        let reference = Coordinates::new(37.5, 127.0);
        let entities = vec![
            enriched("Far", 37.6, 127.0, None),
            enriched("Close", 37.501, 127.0, None),
            enriched("Middle", 37.55, 127.0, None),
        ];

        let ranked = rank_by_distance(reference, entities);

        assert_eq!(names(&nearest(&ranked, 2)), vec!["Close", "Middle"]);
        assert_eq!(nearest(&ranked, 10).len(), 3);
        assert!(nearest(&ranked, 0).is_empty());
        assert!(nearest(&[], 3).is_empty());
    }

    #[test]
    fn test_highlight_needs_category_and_entity() {
        let reference = Coordinates::new(37.5, 127.0);
        let ranked = rank_by_distance(
            reference,
            vec![
                enriched("Market", 37.51, 127.0, Some(79)),
                enriched("Palace", 37.52, 127.0, Some(76)),
            ],
        );

        let selection = Selection::from_ui(Some("Tourist Attraction"), Some("Palace"));
        assert_eq!(highlighted_index(&ranked, &selection), Some(1));

        let by_id = Selection::from_ui(Some("Tourist Attraction"), Some("id-palace"));
        assert_eq!(highlighted_index(&ranked, &by_id), Some(1));

        let no_category = Selection::from_ui(None, Some("Palace"));
        assert_eq!(highlighted_index(&ranked, &no_category), None);

        let wrong_category = Selection::from_ui(Some("Shopping"), Some("Palace"));
        assert_eq!(highlighted_index(&ranked, &wrong_category), None);

        assert_eq!(highlighted_index(&ranked, &Selection::none()), None);
    }

    #[test]
    fn test_only_first_duplicate_is_highlighted() {
        let reference = Coordinates::new(37.5, 127.0);
        let ranked = rank_by_distance(
            reference,
            vec![
                enriched("Twin", 37.51, 127.0, Some(82)),
                enriched("Twin", 37.52, 127.0, Some(82)),
            ],
        );
        let selection = Selection::from_ui(Some("Dining"), Some("Twin"));
        assert_eq!(highlighted_index(&ranked, &selection), Some(0));
    }

    #[test]
    fn test_mark_highlighted_flags_one_entry() {
        let reference = Coordinates::new(37.5, 127.0);
        let mut ranked = rank_by_distance(
            reference,
            vec![
                enriched("Twin", 37.51, 127.0, Some(82)),
                enriched("Twin", 37.52, 127.0, Some(82)),
                enriched("Museum", 37.53, 127.0, Some(78)),
            ],
        );
        assert!(ranked.iter().all(|r| !r.highlighted));

        let twin = Selection::from_ui(Some("Dining"), Some("Twin"));
        assert_eq!(mark_highlighted(&mut ranked, &twin), Some(0));
        let flags: Vec<bool> = ranked.iter().map(|r| r.highlighted).collect();
        assert_eq!(flags, vec![true, false, false]);

        let museum = Selection::from_ui(Some("Cultural Facility"), Some("Museum"));
        assert_eq!(mark_highlighted(&mut ranked, &museum), Some(2));
        let flags: Vec<bool> = ranked.iter().map(|r| r.highlighted).collect();
        assert_eq!(flags, vec![false, false, true]);

        assert_eq!(mark_highlighted(&mut ranked, &Selection::none()), None);
        assert!(ranked.iter().all(|r| !r.highlighted));
    }
}
