use std::cmp::Ordering;
use std::collections::BTreeMap;

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use rand::Rng;

use crate::error::ApiError;
use crate::models::{
    Category, Connection, CrossDomainMetadata, CrossDomainRequest, CrossDomainResponse, Playlist,
    PlaylistCriteria, PlaylistRequest, PlaylistResponse, PlaylistTrack, ProfileAnalytics,
    ProfileEntity, ProfileRequest, ProfileResponse,
};
use crate::scoring;
use crate::state::AppState;
use crate::taste::fanout::{activity_queries, merge_dedup_truncate};

/// POST /api/playlist-generator - Curated playlist from theme, mood, and
/// activity criteria. Queries are capped at three; tracks are scored,
/// ranked, and cut to a length derived from the requested duration.
pub async fn generate_playlist(
    State(state): State<AppState>,
    Json(req): Json<PlaylistRequest>,
) -> Result<Json<PlaylistResponse>, ApiError> {
    let theme = req.theme.trim().to_string();

    let mut queries: Vec<String> = Vec::new();
    if !theme.is_empty() {
        queries.push(format!("{theme} music"));
    }
    if let Some(activity) = activity_queries(&req.activity) {
        queries.extend(activity.iter().map(|q| q.to_string()));
    }
    if req.mood != "mixed" {
        queries.push(format!("{} music", req.mood));
    }

    let mut batches = Vec::new();
    for query in queries.iter().take(3) {
        let music: Vec<_> = state
            .taste
            .search_or_empty(query, 8)
            .await
            .into_iter()
            .filter(|e| e.category() == Category::Music)
            .collect();
        batches.push(music);
    }
    let candidates = merge_dedup_truncate(batches, usize::MAX);

    let target_tracks = ((req.duration_minutes / 4) as usize).max(10);

    let mut rng = state.rng.lock();
    let mut tracks: Vec<PlaylistTrack> = candidates
        .iter()
        .map(|e| PlaylistTrack {
            name: e.name.clone(),
            category: e.category(),
            types: e.types.clone(),
            popularity: e.popularity,
            playlist_score: scoring::playlist_score(e, &theme, &req.activity, &mut *rng),
            genre_tags: scoring::extract_genre_tags(e),
            estimated_duration: rng.gen_range(180..=300),
        })
        .collect();

    tracks.sort_by(|a, b| {
        b.playlist_score
            .partial_cmp(&a.playlist_score)
            .unwrap_or(Ordering::Equal)
    });
    tracks.truncate(target_tracks);

    let total_duration_seconds: u64 = tracks.iter().map(|t| t.estimated_duration).sum();
    let total_duration_minutes = (total_duration_seconds as f64 / 60.0 * 10.0).round() / 10.0;

    let display_name = if theme.is_empty() {
        scoring::title_case(&req.activity)
    } else {
        scoring::title_case(&theme)
    };

    let total_tracks = tracks.len();
    Ok(Json(PlaylistResponse {
        success: true,
        playlist: Playlist {
            name: format!("{display_name} Playlist"),
            description: format!("Curated {} playlist for {} mood", req.activity, req.mood),
            tracks,
            total_tracks,
            total_duration_seconds,
            total_duration_minutes,
            created_at: Utc::now(),
        },
        criteria: PlaylistCriteria {
            theme,
            mood: req.mood,
            activity: req.activity,
            target_duration_minutes: req.duration_minutes,
        },
    }))
}

/// POST /api/profile - Taste profile across the user's interests, with
/// per-category breakdowns, distribution analytics, and insights.
pub async fn build_profile(
    State(state): State<AppState>,
    Json(req): Json<ProfileRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    if req.interests.is_empty() {
        return Err(ApiError::bad_request("interests is required"));
    }

    let raw_profile = state.taste.build_taste_profile(&req.interests).await;

    let mut rng = state.rng.lock();
    let mut profile = BTreeMap::new();
    let mut total_entities = 0;
    let mut category_distribution: BTreeMap<String, usize> = BTreeMap::new();

    for (interest, categories) in &raw_profile {
        let mut by_category = BTreeMap::new();
        for (category, entities) in categories {
            let formatted: Vec<ProfileEntity> = entities
                .iter()
                .take(5)
                .map(|e| ProfileEntity {
                    name: e.name.clone(),
                    category: e.category(),
                    types: e.types.clone(),
                    popularity: e.popularity,
                    profile_relevance: scoring::relevance_score(e, interest, &mut *rng),
                })
                .collect();

            total_entities += formatted.len();
            *category_distribution
                .entry(category.as_str().to_string())
                .or_default() += formatted.len();
            by_category.insert(*category, formatted);
        }
        profile.insert(interest.clone(), by_category);
    }

    let insights = profile_insights(&category_distribution);
    let profile_diversity_score = scoring::diversity_score(&category_distribution);

    Ok(Json(ProfileResponse {
        success: true,
        profile,
        analytics: ProfileAnalytics {
            total_entities,
            category_distribution,
            interests_analyzed: req.interests.len(),
            profile_diversity_score,
        },
        insights,
        generated_at: Utc::now(),
    }))
}

/// Rule-based observations about the profile's category distribution.
fn profile_insights(distribution: &BTreeMap<String, usize>) -> Vec<String> {
    let mut insights = Vec::new();

    if distribution.len() > 3 {
        insights.push("You have diverse tastes across multiple categories".to_string());
    } else if distribution.len() <= 2 {
        insights.push("You have focused preferences in specific areas".to_string());
    }

    if let Some((dominant, _)) = distribution.iter().max_by_key(|(_, count)| **count) {
        insights.push(format!("Your strongest interest area is {dominant}"));
    }

    if distribution.contains_key("music") {
        insights.push("Music plays a significant role in your taste profile".to_string());
    }

    insights
}

/// POST /api/cross-domain - Entities in other domains connected to a seed,
/// with connection strength and an explanation per hit.
pub async fn cross_domain(
    State(state): State<AppState>,
    Json(req): Json<CrossDomainRequest>,
) -> Result<Json<CrossDomainResponse>, ApiError> {
    let seed = req.seed_entity.trim().to_string();
    if seed.is_empty() {
        return Err(ApiError::bad_request("seed_entity is required"));
    }

    let discovered = state
        .taste
        .cross_domain_discovery(&seed, &req.domains, req.limit)
        .await;

    let mut rng = state.rng.lock();
    let mut cross_domain_results = BTreeMap::new();
    let mut total_connections = 0;

    for (domain, entities) in &discovered {
        let connections: Vec<Connection> = entities
            .iter()
            .map(|e| Connection {
                name: e.name.clone(),
                category: e.category(),
                types: e.types.clone(),
                popularity: e.popularity,
                connection_strength: scoring::connection_strength(&seed, e, &mut *rng),
                connection_explanation: scoring::connection_explanation(&seed, domain, &mut *rng),
            })
            .collect();
        total_connections += connections.len();
        cross_domain_results.insert(domain.clone(), connections);
    }

    Ok(Json(CrossDomainResponse {
        success: true,
        cross_domain_results,
        seed,
        metadata: CrossDomainMetadata {
            domains_explored: req.domains.len(),
            total_connections,
            generated_at: Utc::now(),
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dist(pairs: &[(&str, usize)]) -> BTreeMap<String, usize> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_insights_diverse_profile() {
        let insights = profile_insights(&dist(&[
            ("music", 5),
            ("movie", 3),
            ("book", 2),
            ("fashion", 1),
        ]));
        assert!(insights
            .iter()
            .any(|i| i.contains("diverse tastes")));
        assert!(insights
            .iter()
            .any(|i| i.contains("strongest interest area is music")));
        assert!(insights
            .iter()
            .any(|i| i.contains("significant role")));
    }

    #[test]
    fn test_insights_focused_profile() {
        let insights = profile_insights(&dist(&[("book", 4)]));
        assert!(insights.iter().any(|i| i.contains("focused preferences")));
        assert!(!insights.iter().any(|i| i.contains("significant role")));
    }

    #[test]
    fn test_insights_empty_distribution() {
        let insights = profile_insights(&BTreeMap::new());
        // "focused" fires on <= 2 categories; no dominant entry exists.
        assert_eq!(insights.len(), 1);
    }
}
