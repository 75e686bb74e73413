use std::cmp::Ordering;
use std::collections::HashSet;

use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use rand::Rng;

use crate::error::ApiError;
use crate::models::{
    Category, DiscoverRequest, DiscoverResponse, DiscoveredTrack, Entity, RecommendMetadata,
    RecommendRequest, RecommendResponse, Recommendation, SearchMetadata, TrendingItem,
    TrendingMetadata, TrendingParams, TrendingResponse,
};
use crate::scoring;
use crate::state::AppState;
use crate::taste::fanout::{merge_dedup_truncate, normalized_name, time_period_queries};

/// An entity counts as music if its inferred category says so or any raw
/// type tag mentions music.
fn is_music(entity: &Entity) -> bool {
    entity.category() == Category::Music
        || entity.types.iter().any(|t| t.to_lowercase().contains("music"))
}

/// POST /api/discover - Music discovery with mood/genre-aware scoring.
/// Searches wide (2x the limit), keeps music entities, ranks by relevance,
/// and backfills from category discovery when results run thin.
pub async fn discover(
    State(state): State<AppState>,
    Json(req): Json<DiscoverRequest>,
) -> Result<Json<DiscoverResponse>, ApiError> {
    let search_query = [req.input.trim(), req.genre.trim(), "music"]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ");

    let music: Vec<Entity> = state
        .taste
        .search_or_empty(&search_query, req.limit * 2)
        .await
        .into_iter()
        .filter(is_music)
        .collect();

    // Backfill is fetched before scoring so the RNG lock is never held
    // across an await.
    let needs_backfill = music.len().min(req.limit) < 5;
    let backfill = if needs_backfill {
        state.taste.discover_by_category("music", 10).await
    } else {
        Vec::new()
    };

    let mut rng = state.rng.lock();

    let mut results: Vec<DiscoveredTrack> = music
        .iter()
        .map(|e| DiscoveredTrack {
            name: e.name.clone(),
            category: e.category(),
            types: e.types.clone(),
            popularity: e.popularity,
            relevance_score: scoring::relevance_score(e, &req.genre, &mut *rng),
            mood_match: scoring::mood_match(e, &req.mood),
            genre_tags: scoring::extract_genre_tags(e),
        })
        .collect();

    // Stable sort: ties keep first-seen order.
    results.sort_by(|a, b| {
        b.relevance_score
            .partial_cmp(&a.relevance_score)
            .unwrap_or(Ordering::Equal)
    });
    results.truncate(req.limit);

    if results.len() < 5 {
        let existing: HashSet<String> =
            results.iter().map(|r| normalized_name(&r.name)).collect();
        for e in &backfill {
            if existing.contains(&normalized_name(&e.name)) {
                continue;
            }
            results.push(DiscoveredTrack {
                name: e.name.clone(),
                category: e.category(),
                types: e.types.clone(),
                popularity: e.popularity,
                relevance_score: rng.gen_range(0.3..0.7),
                mood_match: scoring::mood_match(e, &req.mood),
                genre_tags: scoring::extract_genre_tags(e),
            });
        }
        results.truncate(req.limit);
    }

    let total_found = results.len();
    Ok(Json(DiscoverResponse {
        success: true,
        results,
        query: search_query,
        total_found,
        search_metadata: SearchMetadata {
            mood: req.mood,
            genre: req.genre,
            timestamp: Utc::now(),
        },
    }))
}

/// POST /api/recommendations - Similarity recommendations around a seed
/// entity, with optional per-item metadata.
pub async fn recommendations(
    State(state): State<AppState>,
    Json(req): Json<RecommendRequest>,
) -> Result<Json<RecommendResponse>, ApiError> {
    let seed = req.seed_entity.trim().to_string();
    if seed.is_empty() {
        return Err(ApiError::bad_request("seed_entity is required"));
    }

    let similar = state.taste.find_similar(&seed, req.limit * 2).await;

    let mut rng = state.rng.lock();
    let mut recommendations: Vec<Recommendation> = similar
        .iter()
        .map(|e| {
            let similarity_score = scoring::similarity_score(&seed, e, &mut *rng);
            let (genre_tags, recommendation_reason) = if req.include_metadata {
                (
                    Some(scoring::extract_genre_tags(e)),
                    Some(scoring::recommendation_reason(&seed, &mut *rng)),
                )
            } else {
                (None, None)
            };
            Recommendation {
                name: e.name.clone(),
                category: e.category(),
                types: e.types.clone(),
                popularity: e.popularity,
                similarity_score,
                genre_tags,
                recommendation_reason,
            }
        })
        .collect();

    recommendations.sort_by(|a, b| {
        b.similarity_score
            .partial_cmp(&a.similarity_score)
            .unwrap_or(Ordering::Equal)
    });
    recommendations.truncate(req.limit);

    let total_found = recommendations.len();
    Ok(Json(RecommendResponse {
        success: true,
        recommendations,
        seed,
        metadata: RecommendMetadata {
            total_found,
            algorithm: "taste_similarity_enhanced".to_string(),
            generated_at: Utc::now(),
        },
    }))
}

/// GET /api/trending - Trending music for a time period, merged across
/// the period's query triple and ranked by trend score.
pub async fn trending(
    State(state): State<AppState>,
    Query(params): Query<TrendingParams>,
) -> Result<Json<TrendingResponse>, ApiError> {
    let queries = time_period_queries(&params.time_period);
    let sub_limit = params.limit / queries.len() + 2;

    let mut batches = Vec::new();
    for query in queries {
        batches.push(state.taste.search_or_empty(query, sub_limit).await);
    }
    let merged = merge_dedup_truncate(batches, params.limit);

    let mut rng = state.rng.lock();
    let mut trending: Vec<TrendingItem> = merged
        .iter()
        .map(|e| TrendingItem {
            name: e.name.clone(),
            category: e.category(),
            types: e.types.clone(),
            popularity: e.popularity,
            trend_score: scoring::trend_score(e, &mut *rng),
            genre_tags: scoring::extract_genre_tags(e),
            trend_reason: scoring::trend_reason(&mut *rng),
        })
        .collect();

    trending.sort_by(|a, b| {
        b.trend_score
            .partial_cmp(&a.trend_score)
            .unwrap_or(Ordering::Equal)
    });

    let total_results = trending.len();
    Ok(Json(TrendingResponse {
        success: true,
        trending,
        metadata: TrendingMetadata {
            category: params.category,
            time_period: params.time_period,
            total_results,
            generated_at: Utc::now(),
        },
    }))
}
