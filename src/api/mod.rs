//! Axum HTTP handlers. Each feature endpoint validates its input, drives
//! the taste fan-out and/or the generative client, applies scoring, and
//! renders the `success` envelope.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

use crate::state::AppState;

pub mod discovery;
pub mod narrative;
pub mod playlist;

/// GET /api/health - Feature status and which API keys are configured.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "harmonia is running",
        "version": env!("CARGO_PKG_VERSION"),
        "features": {
            "music_discovery": true,
            "story_generation": true,
            "recommendations": true,
            "trending": true,
            "mood_analysis": true,
            "playlist_generation": true,
            "taste_profile": true,
            "cross_domain": true,
        },
        "apis": {
            "taste_configured": !state.config.taste.api_key.is_empty(),
            "genai_configured": !state.config.genai.api_key.is_empty(),
        },
        "timestamp": Utc::now(),
    }))
}
