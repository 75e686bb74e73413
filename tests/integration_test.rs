//! Integration tests for the discovery pipeline.
//!
//! These exercise the composed flow — raw response parsing, fan-out
//! merge/dedup, caching, rate limiting, scoring, and the mood fallback —
//! without requiring either external service.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::{json, Value};

use harmonia::genai::mood::{fallback_analysis, strip_code_fences, validate_analysis};
use harmonia::genai::story::{
    build_story_prompt, featured_music, reading_time_minutes, word_count, StoryLength, StoryTheme,
    StoryType,
};
use harmonia::models::{Category, Entity, MusicPreference};
use harmonia::scoring;
use harmonia::taste::cache::RequestCache;
use harmonia::taste::client::parse_search_results;
use harmonia::taste::fanout::{merge_dedup_truncate, per_query_limit, similar_patterns};
use harmonia::taste::rate_limit::RateLimiter;

/// A raw search body with seven results, one of them a duplicate name.
fn pop_music_body() -> Value {
    json!({
        "results": [
            {"name": "Dua Lipa", "types": ["artist"], "popularity": 0.95},
            {"name": "The Weeknd", "types": ["artist"], "popularity": 0.93},
            {"name": "Dua Lipa", "types": ["artist"], "popularity": 0.95},
            {"name": "Carly Rae Jepsen", "types": ["artist"], "popularity": 0.71},
            {"name": "Charli XCX", "types": ["artist"], "popularity": 0.82},
            {"name": "MUNA", "types": ["band"], "popularity": 0.54},
            {"name": "Chappell Roan", "types": ["artist"], "popularity": 0.88},
        ]
    })
}

#[test]
fn test_search_parse_merge_collapses_duplicates() {
    let entities = parse_search_results(&pop_music_body());
    assert_eq!(entities.len(), 7);

    let merged = merge_dedup_truncate(vec![entities], 5);
    assert!(merged.len() <= 5);

    // Duplicate collapsed, first occurrence order preserved.
    let names: Vec<&str> = merged.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Dua Lipa",
            "The Weeknd",
            "Carly Rae Jepsen",
            "Charli XCX",
            "MUNA",
        ]
    );
}

#[test]
fn test_fanout_merge_across_query_variants() {
    // Simulate a find_similar fan-out: four phrasings with overlapping hits.
    let seed = "Taylor Swift";
    let patterns = similar_patterns(seed);
    assert_eq!(patterns.len(), 4);

    let per_query = per_query_limit(10, 2);
    assert_eq!(per_query, 5);

    let batches: Vec<Vec<Entity>> = vec![
        parse_search_results(&json!({"results": [
            {"name": "Gracie Abrams"}, {"name": "Phoebe Bridgers"},
        ]})),
        parse_search_results(&json!({"results": [
            {"name": "phoebe bridgers"}, {"name": "Maisie Peters"},
        ]})),
        parse_search_results(&json!({"results": [
            {"name": "Gracie Abrams"}, {"name": "Lorde"},
        ]})),
    ];

    let merged = merge_dedup_truncate(batches, 10);
    let names: Vec<&str> = merged.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Gracie Abrams", "Phoebe Bridgers", "Maisie Peters", "Lorde"]
    );
}

#[test]
fn test_category_inference_through_parse() {
    let entities = parse_search_results(&json!({"results": [
        {"name": "Interstellar", "types": ["urn:entity:movie"]},
        {"name": "Boygenius", "types": ["band"]},
        {"name": "Something", "types": ["widget"]},
    ]}));

    assert_eq!(entities[0].category(), Category::Movie);
    assert_eq!(entities[1].category(), Category::Music);
    assert_eq!(entities[2].category(), Category::General);
}

#[tokio::test]
async fn test_cache_deduplicates_identical_requests() {
    let cache = RequestCache::new(64);
    let fetches = AtomicUsize::new(0);

    let mut params = BTreeMap::new();
    params.insert("query".to_string(), "pop music".to_string());
    params.insert("limit".to_string(), "5".to_string());
    params.insert("offset".to_string(), "0".to_string());

    for _ in 0..4 {
        let body = cache
            .get_or_fetch("/search", &params, false, || async {
                fetches.fetch_add(1, Ordering::SeqCst);
                Ok(pop_music_body())
            })
            .await
            .unwrap();
        assert_eq!(parse_search_results(&body).len(), 7);
    }

    assert_eq!(fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_cache_distinguishes_parameter_values() {
    let cache = RequestCache::new(64);
    let fetches = AtomicUsize::new(0);

    for query in ["pop music", "jazz", "pop music"] {
        let mut params = BTreeMap::new();
        params.insert("query".to_string(), query.to_string());
        cache
            .get_or_fetch("/search", &params, false, || async {
                fetches.fetch_add(1, Ordering::SeqCst);
                Ok(json!({"results": []}))
            })
            .await
            .unwrap();
    }

    // Two distinct parameter sets, third call served from cache.
    assert_eq!(fetches.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_rate_limiter_paces_a_burst() {
    let limiter = RateLimiter::new(tokio::time::Duration::from_millis(100));

    let start = tokio::time::Instant::now();
    for _ in 0..5 {
        limiter.wait_if_needed().await;
    }

    // Four enforced gaps after the free first dispatch.
    assert!(start.elapsed() >= tokio::time::Duration::from_millis(400));
}

#[test]
fn test_scoring_bounds_over_parsed_entities() {
    let mut rng = StdRng::seed_from_u64(7);
    let entities = parse_search_results(&pop_music_body());

    for e in &entities {
        let relevance = scoring::relevance_score(e, "pop", &mut rng);
        let trend = scoring::trend_score(e, &mut rng);
        let similarity = scoring::similarity_score("Dua Lipa", e, &mut rng);
        let playlist = scoring::playlist_score(e, "pop", "party", &mut rng);
        for score in [relevance, trend, similarity, playlist] {
            assert!((0.0..=1.0).contains(&score), "score out of range: {score}");
        }
    }
}

#[test]
fn test_ranking_is_stable_for_tied_scores() {
    // With no popularity and no tags, relevance is base + jitter only;
    // zero across-the-board jitter is impossible here, so pin the scores
    // and verify the sort itself keeps first-seen order on ties.
    let mut scored: Vec<(String, f64)> = vec![
        ("first".to_string(), 0.5),
        ("second".to_string(), 0.5),
        ("third".to_string(), 0.9),
        ("fourth".to_string(), 0.5),
    ];
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let names: Vec<&str> = scored.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["third", "first", "second", "fourth"]);
}

#[test]
fn test_mood_fallback_for_unavailable_generative_service() {
    // The fallback is what analyze_mood produces when the generative call
    // fails; drive it directly with the canonical excited input.
    let analysis = fallback_analysis("I am SO excited and thrilled!!!");

    assert!(!analysis.primary_mood.is_empty());
    assert!(analysis.mood_intensity > 5);
    assert!(analysis.mood_intensity <= 10);
    assert!(!analysis.music_suggestions.is_empty());
}

#[test]
fn test_mood_pipeline_fenced_output_then_validation() {
    // Well-formed generative output arrives fenced; the pipeline strips
    // the fence, parses, and validates.
    let output = "```json\n{\"primary_mood\": \"energetic\", \"mood_intensity\": 23, \
                  \"secondary_moods\": [\"happy\"], \"music_suggestions\": [\"electronic\"], \
                  \"explanation\": \"high tempo\"}\n```";

    let value: Value = serde_json::from_str(strip_code_fences(output)).unwrap();
    let analysis = validate_analysis(value);

    assert_eq!(analysis.primary_mood, "energetic");
    assert_eq!(analysis.mood_intensity, 10); // clamped
    assert_eq!(analysis.secondary_moods, vec!["happy"]);
}

#[test]
fn test_story_prompt_and_metrics_pipeline() {
    let preferences = vec![
        MusicPreference {
            name: "Bohemian Rhapsody".to_string(),
        },
        MusicPreference {
            name: "Clair de Lune".to_string(),
        },
    ];
    let music_list = featured_music(&preferences);

    let prompt = build_story_prompt(
        StoryType::parse("journey"),
        StoryTheme::parse("nostalgic"),
        StoryLength::parse("short"),
        "Sam",
        &music_list,
    );
    assert!(prompt.contains("Bohemian Rhapsody, Clair de Lune"));
    assert!(prompt.contains("200-300"));

    let story = "word ".repeat(450);
    let words = word_count(&story);
    assert_eq!(words, 450);
    assert_eq!(reading_time_minutes(words), 2);
}
