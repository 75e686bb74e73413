//! Mood analysis: ask the generative-text service for strict JSON, and
//! fall back to a local keyword-frequency classifier when the output does
//! not parse. Both paths run through the same validation step.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::GenAiConfig;
use crate::genai::client::generate;

/// Allow-list for primary and secondary moods.
pub const VALID_MOODS: [&str; 10] = [
    "happy",
    "sad",
    "energetic",
    "calm",
    "romantic",
    "nostalgic",
    "anxious",
    "excited",
    "angry",
    "peaceful",
];

pub const DEFAULT_MOOD: &str = "happy";
pub const DEFAULT_INTENSITY: i64 = 5;

/// Keyword table for the local fallback classifier. Consulted in order;
/// ties keep the earlier mood.
const MOOD_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "happy",
        &[
            "happy", "joy", "excited", "great", "awesome", "love", "amazing", "wonderful",
        ],
    ),
    (
        "sad",
        &[
            "sad",
            "depressed",
            "down",
            "upset",
            "crying",
            "hurt",
            "disappointed",
        ],
    ),
    (
        "energetic",
        &["energy", "pumped", "motivated", "active", "intense", "powerful"],
    ),
    (
        "calm",
        &["calm", "peaceful", "relaxed", "quiet", "serene", "tranquil"],
    ),
    (
        "romantic",
        &["love", "romance", "heart", "romantic", "dating", "relationship"],
    ),
    (
        "nostalgic",
        &["remember", "past", "memories", "nostalgic", "old", "childhood"],
    ),
    (
        "anxious",
        &["worried", "nervous", "anxious", "stress", "fear", "scared"],
    ),
    (
        "angry",
        &["angry", "mad", "frustrated", "annoyed", "rage", "furious"],
    ),
];

/// Music genre suggestions per mood for the fallback path.
const MOOD_SUGGESTIONS: &[(&str, &[&str])] = &[
    ("happy", &["pop", "upbeat rock", "dance"]),
    ("sad", &["ballads", "indie folk", "acoustic"]),
    ("energetic", &["rock", "electronic", "hip hop"]),
    ("calm", &["ambient", "classical", "jazz"]),
    ("romantic", &["R&B", "soft rock", "romantic pop"]),
    ("nostalgic", &["classic rock", "oldies", "folk"]),
    (
        "anxious",
        &["calming ambient", "soft instrumental", "meditation music"],
    ),
    ("angry", &["hard rock", "metal", "aggressive hip hop"]),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodAnalysis {
    pub primary_mood: String,
    pub mood_intensity: i64,
    pub secondary_moods: Vec<String>,
    pub music_suggestions: Vec<String>,
    pub explanation: String,
}

/// Analyze the mood of free text. The generative path is attempted first;
/// transport failures and unparseable output route to the local keyword
/// classifier. The result is always validated.
pub async fn analyze_mood(
    client: &reqwest::Client,
    config: &GenAiConfig,
    text: &str,
) -> MoodAnalysis {
    let prompt = mood_prompt(text);

    let parsed = match generate(client, config, &prompt).await {
        Ok(output) => {
            let cleaned = strip_code_fences(&output);
            match serde_json::from_str::<Value>(cleaned) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!("mood JSON parse failed ({e}); raw: {cleaned}");
                    None
                }
            }
        }
        Err(e) => {
            tracing::warn!("generative mood analysis failed: {e}");
            None
        }
    };

    match parsed {
        Some(value) => validate_analysis(value),
        None => fallback_analysis(text),
    }
}

fn mood_prompt(text: &str) -> String {
    format!(
        r#"Analyze the emotional tone and mood of this text: "{text}"

Return your response as valid JSON with the following structure:
{{
    "primary_mood": "happy",
    "mood_intensity": 7,
    "secondary_moods": ["energetic", "optimistic"],
    "music_suggestions": ["pop", "upbeat rock", "dance"],
    "explanation": "The text expresses joy and excitement with energetic language"
}}

Primary mood options: happy, sad, energetic, calm, romantic, nostalgic, anxious, excited, angry, peaceful
Mood intensity: 1-10 scale
Include 2-3 music suggestions that match the mood.

Respond ONLY with valid JSON, no other text."#
    )
}

/// Remove Markdown code-fence wrapping (```json ... ``` or ``` ... ```).
pub fn strip_code_fences(text: &str) -> &str {
    let t = text.trim();
    let t = t
        .strip_prefix("```json")
        .or_else(|| t.strip_prefix("```"))
        .unwrap_or(t);
    let t = t.strip_suffix("```").unwrap_or(t);
    t.trim()
}

/// Clamp and repair a parsed analysis: primary mood restricted to the
/// allow-list, intensity to `[1, 10]`, at most two valid secondary moods,
/// and a guaranteed non-empty suggestion list.
pub fn validate_analysis(value: Value) -> MoodAnalysis {
    let primary = value
        .get("primary_mood")
        .and_then(Value::as_str)
        .filter(|m| VALID_MOODS.contains(m))
        .unwrap_or(DEFAULT_MOOD)
        .to_string();

    let intensity = value
        .get("mood_intensity")
        .and_then(Value::as_i64)
        .or_else(|| {
            value
                .get("mood_intensity")
                .and_then(Value::as_f64)
                .map(|f| f as i64)
        })
        .unwrap_or(DEFAULT_INTENSITY)
        .clamp(1, 10);

    let secondary: Vec<String> = value
        .get("secondary_moods")
        .and_then(Value::as_array)
        .map(|moods| {
            moods
                .iter()
                .filter_map(Value::as_str)
                .filter(|m| VALID_MOODS.contains(m))
                .take(2)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let mut suggestions: Vec<String> = value
        .get("music_suggestions")
        .and_then(Value::as_array)
        .map(|ss| {
            ss.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    if suggestions.is_empty() {
        suggestions = vec!["pop".to_string(), "rock".to_string()];
    }

    let explanation = value
        .get("explanation")
        .and_then(Value::as_str)
        .filter(|e| !e.trim().is_empty())
        .unwrap_or("Mood analysis completed")
        .to_string();

    MoodAnalysis {
        primary_mood: primary,
        mood_intensity: intensity,
        secondary_moods: secondary,
        music_suggestions: suggestions,
        explanation,
    }
}

/// Local keyword-frequency classifier. The mood with the most keyword
/// hits wins; zero hits yields the default mood. Intensity starts at the
/// baseline and is boosted by exclamation marks, all-caps input, and
/// length, clamped to `[1, 10]`.
pub fn fallback_analysis(text: &str) -> MoodAnalysis {
    let lower = text.to_lowercase();

    let mut detected = DEFAULT_MOOD;
    let mut max_matches = 0;
    for (mood, keywords) in MOOD_KEYWORDS {
        let matches = keywords.iter().filter(|k| lower.contains(*k)).count();
        if matches > max_matches {
            max_matches = matches;
            detected = mood;
        }
    }

    let mut intensity = DEFAULT_INTENSITY;
    if text.contains('!') {
        intensity += 2;
    }
    if !text.is_empty() && text == text.to_uppercase() {
        intensity += 1;
    }
    if text.len() > 100 {
        intensity += 1;
    }
    let intensity = intensity.clamp(1, 10);

    let suggestions = MOOD_SUGGESTIONS
        .iter()
        .find(|(mood, _)| *mood == detected)
        .map(|(_, ss)| ss.iter().map(|s| s.to_string()).collect())
        .unwrap_or_else(|| {
            vec![
                "pop".to_string(),
                "rock".to_string(),
                "alternative".to_string(),
            ]
        });

    MoodAnalysis {
        primary_mood: detected.to_string(),
        mood_intensity: intensity,
        secondary_moods: Vec::new(),
        music_suggestions: suggestions,
        explanation: format!("Text analysis suggests a {detected} mood based on keyword patterns"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strip_json_fence() {
        let wrapped = "```json\n{\"primary_mood\": \"sad\"}\n```";
        assert_eq!(strip_code_fences(wrapped), "{\"primary_mood\": \"sad\"}");
    }

    #[test]
    fn test_strip_plain_fence() {
        let wrapped = "```\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fences(wrapped), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_leaves_unfenced_text_alone() {
        assert_eq!(strip_code_fences("  {\"a\": 1}  "), "{\"a\": 1}");
    }

    #[test]
    fn test_validate_passes_well_formed_analysis() {
        let analysis = validate_analysis(json!({
            "primary_mood": "nostalgic",
            "mood_intensity": 8,
            "secondary_moods": ["calm", "sad"],
            "music_suggestions": ["oldies"],
            "explanation": "wistful tone",
        }));
        assert_eq!(analysis.primary_mood, "nostalgic");
        assert_eq!(analysis.mood_intensity, 8);
        assert_eq!(analysis.secondary_moods, vec!["calm", "sad"]);
        assert_eq!(analysis.music_suggestions, vec!["oldies"]);
    }

    #[test]
    fn test_validate_substitutes_invalid_primary() {
        let analysis = validate_analysis(json!({"primary_mood": "transcendent"}));
        assert_eq!(analysis.primary_mood, DEFAULT_MOOD);
    }

    #[test]
    fn test_validate_clamps_intensity() {
        assert_eq!(
            validate_analysis(json!({"mood_intensity": 40})).mood_intensity,
            10
        );
        assert_eq!(
            validate_analysis(json!({"mood_intensity": -3})).mood_intensity,
            1
        );
        assert_eq!(
            validate_analysis(json!({"mood_intensity": "loud"})).mood_intensity,
            DEFAULT_INTENSITY
        );
    }

    #[test]
    fn test_validate_filters_secondary_moods() {
        let analysis = validate_analysis(json!({
            "secondary_moods": ["calm", "zesty", "sad", "angry"],
        }));
        // Invalid entries dropped, then capped at two.
        assert_eq!(analysis.secondary_moods, vec!["calm", "sad"]);
    }

    #[test]
    fn test_validate_guarantees_suggestions() {
        let analysis = validate_analysis(json!({"music_suggestions": []}));
        assert_eq!(analysis.music_suggestions, vec!["pop", "rock"]);
        let analysis = validate_analysis(json!({}));
        assert!(!analysis.music_suggestions.is_empty());
    }

    #[test]
    fn test_fallback_zero_matches_is_default_mood() {
        let analysis = fallback_analysis("the quarterly report is attached");
        assert_eq!(analysis.primary_mood, DEFAULT_MOOD);
        assert_eq!(analysis.mood_intensity, DEFAULT_INTENSITY);
        assert!(!analysis.music_suggestions.is_empty());
    }

    #[test]
    fn test_fallback_excited_text_boosts_intensity() {
        let analysis = fallback_analysis("I am SO excited and thrilled!!!");
        assert!(VALID_MOODS.contains(&analysis.primary_mood.as_str()));
        // Exclamation marks push intensity above the baseline.
        assert!(analysis.mood_intensity > DEFAULT_INTENSITY);
    }

    #[test]
    fn test_fallback_keyword_frequency_wins() {
        let analysis = fallback_analysis("worried and nervous, so much stress and fear");
        assert_eq!(analysis.primary_mood, "anxious");
        assert_eq!(
            analysis.music_suggestions,
            vec!["calming ambient", "soft instrumental", "meditation music"]
        );
    }

    #[test]
    fn test_fallback_tie_keeps_table_order() {
        // "sad" and "calm" each get one hit; "sad" comes first in the table.
        let analysis = fallback_analysis("sad but calm");
        assert_eq!(analysis.primary_mood, "sad");
    }

    #[test]
    fn test_fallback_all_caps_boost() {
        let shouty = fallback_analysis("I AM PUMPED");
        let quiet = fallback_analysis("i am pumped");
        assert!(shouty.mood_intensity > quiet.mood_intensity);
    }

    #[test]
    fn test_fallback_explanation_names_mood() {
        let analysis = fallback_analysis("remember the old childhood memories");
        assert_eq!(analysis.primary_mood, "nostalgic");
        assert!(analysis.explanation.contains("nostalgic"));
    }
}
