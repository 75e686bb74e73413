use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::ApiError;
use crate::genai::client::generate;
use crate::genai::mood::{analyze_mood, MoodAnalysis};
use crate::genai::story::{
    build_story_prompt, featured_music, reading_time_minutes, word_count, StoryLength, StoryTheme,
    StoryType,
};
use crate::models::{
    Category, MoodRequest, MoodTrack, StoryMetadata, StoryRequest, StoryResponse,
};
use crate::state::AppState;
use crate::taste::TasteError;

/// POST /api/story - Personalized story around the user's music, generated
/// from the type/theme prompt table and post-processed for reading metrics.
pub async fn story(
    State(state): State<AppState>,
    Json(req): Json<StoryRequest>,
) -> Result<Json<StoryResponse>, ApiError> {
    let story_type = StoryType::parse(&req.story_type);
    let theme = StoryTheme::parse(&req.theme);
    let length = StoryLength::parse(&req.story_length);
    let music_list = featured_music(&req.music_preferences);

    let prompt = build_story_prompt(story_type, theme, length, &req.user_name, &music_list);

    let story_text = generate(&state.http_client, &state.config.genai, &prompt)
        .await
        .map_err(|e| {
            tracing::error!("story generation failed: {e:#}");
            ApiError::internal("Failed to generate story")
        })?;

    let words = word_count(&story_text);
    Ok(Json(StoryResponse {
        success: true,
        story: story_text,
        story_type: req.story_type,
        theme: req.theme,
        music_featured: music_list,
        metadata: StoryMetadata {
            word_count: words,
            reading_time_minutes: reading_time_minutes(words),
            generated_at: Utc::now(),
            story_length: req.story_length,
        },
    }))
}

#[derive(Debug, Clone, Serialize)]
pub struct MoodResponse {
    pub success: bool,
    pub mood_analysis: MoodAnalysis,
    pub recommended_music: Vec<MoodTrack>,
    pub metadata: MoodMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct MoodMetadata {
    pub analyzed_text_length: usize,
    pub generated_at: DateTime<Utc>,
}

/// POST /api/mood-analysis - Analyze mood from free text and suggest
/// matching music. The generative path falls back to the local keyword
/// classifier; a failed music search falls back to a fixed default list.
pub async fn mood_analysis(
    State(state): State<AppState>,
    Json(req): Json<MoodRequest>,
) -> Result<Json<MoodResponse>, ApiError> {
    let text = req.text.trim();
    if text.is_empty() {
        return Err(ApiError::bad_request("Text input is required"));
    }

    let analysis = analyze_mood(&state.http_client, &state.config.genai, text).await;

    let mut recommended_music = match collect_mood_music(&state, &analysis).await {
        Ok(tracks) => tracks,
        Err(e) => {
            tracing::warn!("mood music search failed: {e}");
            default_mood_music(&analysis.primary_mood)
        }
    };
    recommended_music.truncate(6);

    Ok(Json(MoodResponse {
        success: true,
        mood_analysis: analysis,
        recommended_music,
        metadata: MoodMetadata {
            analyzed_text_length: req.text.len(),
            generated_at: Utc::now(),
        },
    }))
}

/// Search for music matching the analyzed mood: up to two suggestion
/// queries, keeping music-category hits, capped at six tracks.
async fn collect_mood_music(
    state: &AppState,
    analysis: &MoodAnalysis,
) -> Result<Vec<MoodTrack>, TasteError> {
    let mut tracks = Vec::new();

    'suggestions: for suggestion in analysis.music_suggestions.iter().take(2) {
        let query = format!("{suggestion} {} music", analysis.primary_mood);
        let entities = state.taste.search(&query, 3, 0).await?;

        for entity in entities {
            let is_music = entity.category() == Category::Music
                || entity.types.iter().any(|t| t.to_lowercase().contains("music"));
            if !is_music {
                continue;
            }
            tracks.push(MoodTrack {
                name: entity.name.clone(),
                category: entity.category(),
                types: entity.types.clone(),
                popularity: entity.popularity,
                mood_match_reason: format!(
                    "Matches {} mood with {suggestion} style",
                    analysis.primary_mood
                ),
            });
            if tracks.len() >= 6 {
                break 'suggestions;
            }
        }
    }

    Ok(tracks)
}

/// Canned recommendations used when the mood music search fails outright.
fn default_mood_music(mood: &str) -> Vec<MoodTrack> {
    let table: &[(&str, &str, f64, &str)] = match mood {
        "sad" => &[
            ("Sad Ballads", "ballad", 0.6, "Emotional ballads"),
            ("Melancholy Music", "indie", 0.5, "Reflective indie music"),
        ],
        "energetic" => &[
            ("High Energy Rock", "rock", 0.8, "Pumping rock music"),
            ("Electronic Dance", "electronic", 0.7, "High-energy electronic"),
        ],
        "calm" => &[
            ("Peaceful Ambient", "ambient", 0.6, "Calming ambient sounds"),
            ("Soft Jazz", "jazz", 0.5, "Relaxing jazz music"),
        ],
        _ => &[
            ("Happy Songs", "pop", 0.8, "Uplifting pop music"),
            ("Feel Good Hits", "rock", 0.7, "Energetic feel-good music"),
        ],
    };

    table
        .iter()
        .map(|(name, tag, popularity, reason)| MoodTrack {
            name: name.to_string(),
            category: Category::Music,
            types: vec![tag.to_string()],
            popularity: Some(*popularity),
            mood_match_reason: reason.to_string(),
        })
        .collect()
}
