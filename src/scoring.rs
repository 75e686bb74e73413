//! Heuristic score helpers. Every function is pure apart from the caller-
//! supplied randomness source, and every score lands in `[0, 1]`. The
//! weight constants are tuning knobs, not contracts.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::Entity;

/// Genre keywords recognized when extracting tags from type strings.
const GENRES: [&str; 10] = [
    "rock",
    "pop",
    "jazz",
    "classical",
    "electronic",
    "hip hop",
    "country",
    "folk",
    "blues",
    "reggae",
];

const MOOD_TYPE_KEYWORDS: &[(&str, &[&str])] = &[
    ("happy", &["upbeat", "cheerful", "positive", "joyful"]),
    ("sad", &["melancholic", "emotional", "slow", "ballad"]),
    ("energetic", &["high energy", "fast", "pump", "intense"]),
    ("calm", &["peaceful", "relaxing", "ambient", "soft"]),
    ("romantic", &["love", "romantic", "intimate", "tender"]),
];

fn clamp(score: f64) -> f64 {
    score.clamp(0.0, 1.0)
}

fn types_contain(entity: &Entity, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    entity
        .types
        .iter()
        .any(|t| t.to_lowercase().contains(&needle))
}

/// Relevance of an entity to a genre preference: base 0.5, popularity
/// contributes up to 0.3, a genre-tag match adds 0.2, plus a small
/// diversity jitter.
pub fn relevance_score(entity: &Entity, genre: &str, rng: &mut impl Rng) -> f64 {
    let mut score = 0.5;
    if let Some(popularity) = entity.popularity {
        score += popularity * 0.3;
    }
    if !genre.trim().is_empty() && types_contain(entity, genre) {
        score += 0.2;
    }
    score += rng.gen_range(0.0..0.1);
    clamp(score)
}

/// Deterministic mood affinity: 0.8 when any keyword for the mood appears
/// in the entity's type tags, 0.3 otherwise.
pub fn mood_match(entity: &Entity, mood: &str) -> f64 {
    let keywords = MOOD_TYPE_KEYWORDS
        .iter()
        .find(|(m, _)| *m == mood)
        .map(|(_, ks)| *ks)
        .unwrap_or(&[]);

    for keyword in keywords {
        if types_contain(entity, keyword) {
            return 0.8;
        }
    }
    0.3
}

/// Similarity between a seed name and a candidate: substring overlap in
/// either direction counts, plus jitter.
pub fn similarity_score(seed: &str, entity: &Entity, rng: &mut impl Rng) -> f64 {
    let mut score = 0.5;
    let seed_lower = seed.to_lowercase();
    let name_lower = entity.name.to_lowercase();
    if !seed_lower.is_empty()
        && (name_lower.contains(&seed_lower) || seed_lower.contains(&name_lower))
    {
        score += 0.3;
    }
    score += rng.gen_range(0.0..0.2);
    clamp(score)
}

/// Trending strength: popularity carries most of the signal.
pub fn trend_score(entity: &Entity, rng: &mut impl Rng) -> f64 {
    let mut score = 0.5;
    if let Some(popularity) = entity.popularity {
        score += popularity * 0.4;
    }
    score += rng.gen_range(0.0..0.1);
    clamp(score)
}

/// Fit of a track for a playlist built around a theme and activity.
pub fn playlist_score(entity: &Entity, theme: &str, activity: &str, rng: &mut impl Rng) -> f64 {
    let mut score = 0.5;
    if let Some(popularity) = entity.popularity {
        score += popularity * 0.3;
    }
    if !theme.trim().is_empty() && types_contain(entity, theme) {
        score += 0.2;
    }

    let activity_keywords: &[&str] = match activity {
        "workout" => &["energetic", "fast", "pump"],
        "study" => &["ambient", "calm", "focus"],
        "party" => &["dance", "upbeat", "party"],
        _ => &[],
    };
    if activity_keywords.iter().any(|k| types_contain(entity, k)) {
        score += 0.2;
    }

    score += rng.gen_range(0.0..0.1);
    clamp(score)
}

/// Strength of a cross-domain connection to the seed entity.
pub fn connection_strength(seed: &str, entity: &Entity, rng: &mut impl Rng) -> f64 {
    let mut score = 0.5;
    let seed_lower = seed.to_lowercase();
    if !seed_lower.is_empty() && entity.name.to_lowercase().contains(&seed_lower) {
        score += 0.3;
    }
    score += rng.gen_range(0.0..0.2);
    clamp(score)
}

/// Entropy-style diversity of a category distribution, normalized to
/// `[0, 1]`. Empty or single-category distributions score low.
pub fn diversity_score(distribution: &BTreeMap<String, usize>) -> f64 {
    let total: usize = distribution.values().sum();
    if total == 0 {
        return 0.0;
    }

    let mut entropy = 0.0;
    for &count in distribution.values() {
        if count > 0 {
            let p = count as f64 / total as f64;
            entropy -= p * p.log2();
        }
    }

    clamp(entropy / 3.0)
}

/// Up to three recognizable genre tags from the entity's types, title-cased.
pub fn extract_genre_tags(entity: &Entity) -> Vec<String> {
    let mut tags = Vec::new();
    for genre in GENRES {
        if types_contain(entity, genre) {
            tags.push(title_case(genre));
            if tags.len() == 3 {
                break;
            }
        }
    }
    tags
}

pub(crate) fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// One phrasing for why an entity was recommended.
pub fn recommendation_reason(seed: &str, rng: &mut impl Rng) -> String {
    let reasons = [
        format!("Similar style to {seed}"),
        format!("Fans of {seed} also enjoy this"),
        format!("Shares musical DNA with {seed}"),
        format!("Recommended based on {seed}"),
        format!("Perfect companion to {seed}"),
    ];
    reasons
        .choose(rng)
        .cloned()
        .unwrap_or_else(|| format!("Recommended based on {seed}"))
}

/// One phrasing for why an entity is trending.
pub fn trend_reason(rng: &mut impl Rng) -> String {
    let reasons = [
        "Rising in popularity",
        "Viral on social media",
        "Featured in popular playlists",
        "Gaining mainstream attention",
        "Trending across platforms",
    ];
    reasons
        .choose(rng)
        .map(|r| r.to_string())
        .unwrap_or_else(|| "Rising in popularity".to_string())
}

/// One phrasing for a cross-domain connection, specialized per domain.
pub fn connection_explanation(seed: &str, domain: &str, rng: &mut impl Rng) -> String {
    let explanations: Vec<String> = match domain {
        "movies" => vec![
            format!("Shares thematic elements with {seed}"),
            format!("Appeals to similar audiences as {seed}"),
            format!("Has cultural connections to {seed}"),
        ],
        "books" => vec![
            format!("Explores similar themes as {seed}"),
            format!("Appeals to fans of {seed}"),
            format!("Shares artistic sensibilities with {seed}"),
        ],
        "restaurants" => vec![
            format!("Matches the vibe of {seed}"),
            format!("Popular among {seed} fans"),
            format!("Complements the {seed} experience"),
        ],
        _ => vec![format!("Connected to {seed} through cultural relevance")],
    };
    explanations
        .choose(rng)
        .cloned()
        .unwrap_or_else(|| format!("Connected to {seed} through cultural relevance"))
}
