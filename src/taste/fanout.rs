//! The fan-out/merge engine: pure pieces of the multi-query pattern every
//! discovery feature runs. Query plans come from fixed phrasing tables;
//! merging concatenates per-query batches in order, deduplicates by
//! normalized name (first-seen wins), and truncates to the caller's limit.

use crate::models::Entity;
use std::collections::HashSet;

/// Dedup key policy, applied uniformly: trimmed, lowercased name.
pub fn normalized_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Merge per-query result batches into one list: concatenation order is
/// preserved, duplicate normalized names collapse to the first occurrence,
/// and the output is truncated to `limit`.
pub fn merge_dedup_truncate<I>(batches: I, limit: usize) -> Vec<Entity>
where
    I: IntoIterator<Item = Vec<Entity>>,
{
    let mut seen = HashSet::new();
    let mut merged = Vec::new();

    for batch in batches {
        for entity in batch {
            if merged.len() == limit {
                return merged;
            }
            if seen.insert(normalized_name(&entity.name)) {
                merged.push(entity);
            }
        }
    }

    merged
}

/// Per-query sub-limit when a limit is split across `queries` variants.
pub fn per_query_limit(limit: usize, queries: usize) -> usize {
    (limit / queries.max(1)).max(1)
}

/// Canned synonym queries per category. Unknown categories fall back to
/// the raw category string as the single query.
pub fn category_queries(category: &str) -> Vec<String> {
    let canned: &[&str] = match category.to_lowercase().as_str() {
        "music" => &[
            "popular music",
            "trending songs",
            "new artists",
            "indie music",
            "rock bands",
        ],
        "movies" => &[
            "popular movies",
            "new films",
            "blockbuster",
            "indie films",
            "classic movies",
        ],
        "books" => &[
            "bestselling books",
            "popular novels",
            "new releases",
            "fiction books",
        ],
        "restaurants" => &[
            "popular restaurants",
            "fine dining",
            "casual dining",
            "food trends",
        ],
        "fashion" => &[
            "fashion brands",
            "clothing brands",
            "streetwear",
            "luxury fashion",
        ],
        _ => return vec![category.to_string()],
    };
    canned.iter().map(|q| q.to_string()).collect()
}

/// Phrasings used to simulate similarity search: three templates plus the
/// first word of multi-word names.
pub fn similar_patterns(name: &str) -> Vec<String> {
    let first_word = match name.split_whitespace().next() {
        Some(w) if w != name => w.to_string(),
        _ => name.to_string(),
    };
    vec![
        format!("similar to {name}"),
        format!("like {name}"),
        format!("{name} related"),
        first_word,
    ]
}

/// Trend queries in priority order; the caller takes the first non-empty
/// result set verbatim.
pub fn trending_queries(category: Option<&str>) -> Vec<String> {
    match category {
        Some(c) => vec![
            format!("trending {c}"),
            format!("popular {c}"),
            format!("hot {c}"),
        ],
        None => ["trending", "popular", "hot", "viral"]
            .iter()
            .map(|q| q.to_string())
            .collect(),
    }
}

/// Route-level trending query triples per time period.
pub fn time_period_queries(period: &str) -> [&'static str; 3] {
    match period {
        "week" => ["weekly trending music", "this week popular", "weekly hits"],
        "month" => [
            "monthly trending music",
            "this month popular",
            "monthly hits",
        ],
        _ => ["trending music", "popular songs", "hot tracks"],
    }
}

/// Cross-domain phrasings connecting a seed entity to a target domain.
pub fn cross_domain_queries(seed: &str, domain: &str) -> [String; 3] {
    [
        format!("{seed} {domain}"),
        format!("{domain} like {seed}"),
        format!("{domain} inspired by {seed}"),
    ]
}

/// Activity-specific playlist queries; activities outside the table
/// contribute no queries.
pub fn activity_queries(activity: &str) -> Option<[&'static str; 3]> {
    match activity {
        "workout" => Some(["energetic music", "pump up songs", "high energy"]),
        "study" => Some(["focus music", "ambient study", "concentration music"]),
        "party" => Some(["party music", "dance hits", "upbeat songs"]),
        "relax" => Some(["relaxing music", "chill songs", "calm music"]),
        "commute" => Some(["commute music", "travel songs", "road trip music"]),
        "work" => Some(["background music", "productive music", "work playlist"]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entity(name: &str) -> Entity {
        Entity::from_raw(&json!({ "name": name }))
    }

    #[test]
    fn test_merge_dedup_is_case_insensitive() {
        let batches = vec![
            vec![entity("Daft Punk"), entity("Justice")],
            vec![entity("daft punk"), entity("  JUSTICE  "), entity("Air")],
        ];
        let merged = merge_dedup_truncate(batches, 10);
        let names: Vec<&str> = merged.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Daft Punk", "Justice", "Air"]);
    }

    #[test]
    fn test_merge_preserves_first_seen_order() {
        let batches = vec![
            vec![entity("C"), entity("A")],
            vec![entity("B"), entity("A"), entity("C")],
        ];
        let merged = merge_dedup_truncate(batches, 10);
        let names: Vec<&str> = merged.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_merge_respects_limit() {
        let batches = vec![(0..20).map(|i| entity(&format!("e{i}"))).collect()];
        assert_eq!(merge_dedup_truncate(batches, 5).len(), 5);
    }

    #[test]
    fn test_merge_no_duplicate_normalized_names() {
        let batches = vec![
            vec![entity("Björk"), entity("björk"), entity("BJÖRK ")],
            vec![entity("Björk")],
        ];
        let merged = merge_dedup_truncate(batches, 10);
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn test_merge_empty_input() {
        assert!(merge_dedup_truncate(Vec::<Vec<Entity>>::new(), 5).is_empty());
        assert!(merge_dedup_truncate(vec![vec![], vec![]], 5).is_empty());
    }

    #[test]
    fn test_per_query_limit_floors_at_one() {
        assert_eq!(per_query_limit(10, 2), 5);
        assert_eq!(per_query_limit(10, 3), 3);
        assert_eq!(per_query_limit(1, 4), 1);
        assert_eq!(per_query_limit(10, 0), 10);
    }

    #[test]
    fn test_category_queries_known_and_fallback() {
        let music = category_queries("Music");
        assert_eq!(music[0], "popular music");
        assert!(music.len() >= 4);

        let odd = category_queries("vaporwave");
        assert_eq!(odd, vec!["vaporwave"]);
    }

    #[test]
    fn test_similar_patterns_multi_word() {
        let patterns = similar_patterns("Taylor Swift");
        assert_eq!(
            patterns,
            vec![
                "similar to Taylor Swift",
                "like Taylor Swift",
                "Taylor Swift related",
                "Taylor",
            ]
        );
    }

    #[test]
    fn test_similar_patterns_single_word() {
        let patterns = similar_patterns("Radiohead");
        assert_eq!(patterns[3], "Radiohead");
    }

    #[test]
    fn test_trending_queries_priority_order() {
        assert_eq!(
            trending_queries(Some("music")),
            vec!["trending music", "popular music", "hot music"]
        );
        assert_eq!(trending_queries(None).len(), 4);
    }

    #[test]
    fn test_cross_domain_queries_templates() {
        let qs = cross_domain_queries("Taylor Swift", "books");
        assert_eq!(qs[0], "Taylor Swift books");
        assert_eq!(qs[1], "books like Taylor Swift");
        assert_eq!(qs[2], "books inspired by Taylor Swift");
    }

    #[test]
    fn test_activity_queries_table() {
        assert!(activity_queries("workout").is_some());
        assert!(activity_queries("skydiving").is_none());
    }
}
