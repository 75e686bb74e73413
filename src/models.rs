use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A normalized result record from the external taste-search service.
///
/// Built only from the raw response fragment; every derived field stays
/// consistent with `raw` because nothing is mutated after construction.
#[derive(Debug, Clone, Serialize)]
pub struct Entity {
    pub name: String,
    pub entity_id: Option<String>,
    pub types: Vec<String>,
    pub properties: Option<serde_json::Map<String, Value>>,
    pub popularity: Option<f64>,
    #[serde(skip)]
    pub raw: Option<Value>,
}

impl Entity {
    /// Wrap one raw result object. A missing `name` maps to `"Unknown"`.
    pub fn from_raw(raw: &Value) -> Self {
        let name = raw
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("Unknown")
            .to_string();
        let entity_id = raw
            .get("entity_id")
            .and_then(Value::as_str)
            .map(str::to_string);
        let types = raw
            .get("types")
            .and_then(Value::as_array)
            .map(|ts| {
                ts.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        let properties = raw.get("properties").and_then(Value::as_object).cloned();
        let popularity = raw.get("popularity").and_then(Value::as_f64);

        Self {
            name,
            entity_id,
            types,
            properties,
            popularity,
            raw: Some(raw.clone()),
        }
    }

    /// Coarse category inferred on demand from the type tags.
    pub fn category(&self) -> Category {
        Category::infer(&self.types)
    }
}

/// Coarse classification inferred from an entity's free-text type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Music,
    Movie,
    Book,
    Restaurant,
    Fashion,
    General,
}

/// Keyword table consulted in order; first category with a matching
/// keyword wins, no match falls through to `General`.
const TYPE_KEYWORDS: &[(Category, &[&str])] = &[
    (Category::Music, &["artist", "song", "album", "band"]),
    (Category::Movie, &["film", "movie", "cinema"]),
    (Category::Book, &["book", "novel", "literature"]),
    (Category::Restaurant, &["restaurant", "cuisine", "food"]),
    (Category::Fashion, &["brand", "clothing", "fashion"]),
];

impl Category {
    pub fn infer(types: &[String]) -> Self {
        for (category, keywords) in TYPE_KEYWORDS {
            for tag in types {
                let tag = tag.to_lowercase();
                if keywords.iter().any(|k| tag.contains(k)) {
                    return *category;
                }
            }
        }
        Category::General
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Music => "music",
            Category::Movie => "movie",
            Category::Book => "book",
            Category::Restaurant => "restaurant",
            Category::Fashion => "fashion",
            Category::General => "general",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Requests ────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct DiscoverRequest {
    #[serde(default)]
    pub input: String,
    #[serde(default = "default_mood")]
    pub mood: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default = "default_discover_limit")]
    pub limit: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendRequest {
    #[serde(default)]
    pub seed_entity: String,
    #[serde(default = "default_recommend_limit")]
    pub limit: usize,
    #[serde(default = "default_true")]
    pub include_metadata: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrendingParams {
    #[serde(default = "default_trending_category")]
    pub category: String,
    #[serde(default = "default_time_period")]
    pub time_period: String,
    #[serde(default = "default_trending_limit")]
    pub limit: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MoodRequest {
    #[serde(default)]
    pub text: String,
}

/// One entry of the `music_preferences` list fed to the story generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MusicPreference {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoryRequest {
    #[serde(default)]
    pub music_preferences: Vec<MusicPreference>,
    #[serde(default = "default_user_name")]
    pub user_name: String,
    #[serde(default = "default_story_type")]
    pub story_type: String,
    #[serde(default = "default_story_length")]
    pub story_length: String,
    #[serde(default = "default_story_theme")]
    pub theme: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistRequest {
    #[serde(default)]
    pub theme: String,
    #[serde(default = "default_duration_minutes")]
    pub duration_minutes: u64,
    #[serde(default = "default_playlist_mood")]
    pub mood: String,
    #[serde(default = "default_activity")]
    pub activity: String,
    #[serde(default = "default_true")]
    pub include_popular: bool,
    #[serde(default = "default_true")]
    pub include_discovery: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileRequest {
    #[serde(default)]
    pub interests: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CrossDomainRequest {
    #[serde(default)]
    pub seed_entity: String,
    #[serde(default = "default_domains")]
    pub domains: Vec<String>,
    #[serde(default = "default_cross_limit")]
    pub limit: usize,
}

fn default_mood() -> String {
    "happy".to_string()
}

fn default_discover_limit() -> usize {
    10
}

fn default_recommend_limit() -> usize {
    8
}

fn default_trending_category() -> String {
    "music".to_string()
}

fn default_time_period() -> String {
    "current".to_string()
}

fn default_trending_limit() -> usize {
    12
}

fn default_user_name() -> String {
    "User".to_string()
}

fn default_story_type() -> String {
    "journey".to_string()
}

fn default_story_length() -> String {
    "medium".to_string()
}

fn default_story_theme() -> String {
    "inspirational".to_string()
}

fn default_duration_minutes() -> u64 {
    60
}

fn default_playlist_mood() -> String {
    "mixed".to_string()
}

fn default_activity() -> String {
    "general".to_string()
}

fn default_domains() -> Vec<String> {
    vec![
        "movies".to_string(),
        "books".to_string(),
        "restaurants".to_string(),
    ]
}

fn default_cross_limit() -> usize {
    5
}

fn default_true() -> bool {
    true
}

// ─── Responses ───────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct DiscoverResponse {
    pub success: bool,
    pub results: Vec<DiscoveredTrack>,
    pub query: String,
    pub total_found: usize,
    pub search_metadata: SearchMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiscoveredTrack {
    pub name: String,
    pub category: Category,
    pub types: Vec<String>,
    pub popularity: Option<f64>,
    pub relevance_score: f64,
    pub mood_match: f64,
    pub genre_tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchMetadata {
    pub mood: String,
    pub genre: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendResponse {
    pub success: bool,
    pub recommendations: Vec<Recommendation>,
    pub seed: String,
    pub metadata: RecommendMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub name: String,
    pub category: Category,
    pub types: Vec<String>,
    pub popularity: Option<f64>,
    pub similarity_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre_tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendMetadata {
    pub total_found: usize,
    pub algorithm: String,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendingResponse {
    pub success: bool,
    pub trending: Vec<TrendingItem>,
    pub metadata: TrendingMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendingItem {
    pub name: String,
    pub category: Category,
    pub types: Vec<String>,
    pub popularity: Option<f64>,
    pub trend_score: f64,
    pub genre_tags: Vec<String>,
    pub trend_reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendingMetadata {
    pub category: String,
    pub time_period: String,
    pub total_results: usize,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MoodTrack {
    pub name: String,
    pub category: Category,
    pub types: Vec<String>,
    pub popularity: Option<f64>,
    pub mood_match_reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoryResponse {
    pub success: bool,
    pub story: String,
    pub story_type: String,
    pub theme: String,
    pub music_featured: String,
    pub metadata: StoryMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoryMetadata {
    pub word_count: usize,
    pub reading_time_minutes: usize,
    pub generated_at: DateTime<Utc>,
    pub story_length: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlaylistResponse {
    pub success: bool,
    pub playlist: Playlist,
    pub criteria: PlaylistCriteria,
}

#[derive(Debug, Clone, Serialize)]
pub struct Playlist {
    pub name: String,
    pub description: String,
    pub tracks: Vec<PlaylistTrack>,
    pub total_tracks: usize,
    pub total_duration_seconds: u64,
    pub total_duration_minutes: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlaylistTrack {
    pub name: String,
    pub category: Category,
    pub types: Vec<String>,
    pub popularity: Option<f64>,
    pub playlist_score: f64,
    pub genre_tags: Vec<String>,
    pub estimated_duration: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlaylistCriteria {
    pub theme: String,
    pub mood: String,
    pub activity: String,
    pub target_duration_minutes: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub profile: BTreeMap<String, BTreeMap<Category, Vec<ProfileEntity>>>,
    pub analytics: ProfileAnalytics,
    pub insights: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileEntity {
    pub name: String,
    pub category: Category,
    pub types: Vec<String>,
    pub popularity: Option<f64>,
    pub profile_relevance: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileAnalytics {
    pub total_entities: usize,
    pub category_distribution: BTreeMap<String, usize>,
    pub interests_analyzed: usize,
    pub profile_diversity_score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CrossDomainResponse {
    pub success: bool,
    pub cross_domain_results: BTreeMap<String, Vec<Connection>>,
    pub seed: String,
    pub metadata: CrossDomainMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct Connection {
    pub name: String,
    pub category: Category,
    pub types: Vec<String>,
    pub popularity: Option<f64>,
    pub connection_strength: f64,
    pub connection_explanation: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CrossDomainMetadata {
    pub domains_explored: usize,
    pub total_connections: usize,
    pub generated_at: DateTime<Utc>,
}
