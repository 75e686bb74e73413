//! Story prompt assembly and post-processing. The prompt table is keyed by
//! story type and theme; every cell writes in second person, interpolates
//! the target word count, and fixes the opening line.

use crate::models::MusicPreference;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoryType {
    Journey,
    Concert,
    Playlist,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoryTheme {
    Inspirational,
    Nostalgic,
    Adventurous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoryLength {
    Short,
    Medium,
    Long,
}

impl StoryType {
    /// Lenient parse; anything unrecognized falls back to `Journey`.
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "concert" => StoryType::Concert,
            "playlist" => StoryType::Playlist,
            _ => StoryType::Journey,
        }
    }
}

impl StoryTheme {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "nostalgic" => StoryTheme::Nostalgic,
            "adventurous" => StoryTheme::Adventurous,
            _ => StoryTheme::Inspirational,
        }
    }
}

impl StoryLength {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "short" => StoryLength::Short,
            "long" => StoryLength::Long,
            _ => StoryLength::Medium,
        }
    }

    /// Target word-count range interpolated into the prompt.
    pub fn word_target(&self) -> &'static str {
        match self {
            StoryLength::Short => "200-300",
            StoryLength::Medium => "400-500",
            StoryLength::Long => "600-800",
        }
    }
}

/// First eight preference names joined for prompt interpolation.
pub fn featured_music(preferences: &[MusicPreference]) -> String {
    preferences
        .iter()
        .take(8)
        .map(|p| p.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn build_story_prompt(
    story_type: StoryType,
    theme: StoryTheme,
    length: StoryLength,
    user_name: &str,
    music_list: &str,
) -> String {
    let words = length.word_target();
    match (story_type, theme) {
        (StoryType::Journey, StoryTheme::Inspirational) => format!(
            r#"Write an inspiring and uplifting story about {user_name}'s transformative musical journey.

Featured music: {music_list}

The story should:
- Be written in second person ("You")
- Be approximately {words} words
- Show how music became a source of strength and growth
- Include specific moments where each song played a pivotal role
- Incorporate sensory details and emotional depth
- End with a powerful message about the future

Start with "Your musical awakening began..." and weave each song into key life moments."#
        ),
        (StoryType::Journey, StoryTheme::Nostalgic) => format!(
            r#"Write a deeply nostalgic story about {user_name}'s musical memories and connections.

Featured music: {music_list}

The story should:
- Be written in second person ("You")
- Be approximately {words} words
- Evoke strong memories and emotional connections
- Show how music connects to specific people, places, and times
- Include bittersweet moments and cherished memories
- End with reflection on how music preserves our past

Start with "The first notes took you back..." and explore the emotional landscape of memory."#
        ),
        (StoryType::Journey, StoryTheme::Adventurous) => format!(
            r#"Write an adventurous story about {user_name}'s musical exploration and discovery.

Featured music: {music_list}

The story should:
- Be written in second person ("You")
- Be approximately {words} words
- Frame music discovery as an exciting quest
- Include unexpected discoveries and bold choices
- Show courage in exploring new musical territories
- End with anticipation for future musical adventures

Start with "Your musical expedition began..." and treat each discovery as a new frontier."#
        ),
        (StoryType::Concert, StoryTheme::Inspirational) => format!(
            r#"Write an electrifying story about {user_name} experiencing a life-changing concert.

The concert features: {music_list}

The story should:
- Be written in second person ("You")
- Be approximately {words} words
- Capture the transformative power of live music
- Include detailed descriptions of lights, sound, and crowd energy
- Show personal breakthrough moments during the performance
- End with lasting impact and renewed purpose

Start with "The venue doors opened..." and build to an emotional crescendo."#
        ),
        (StoryType::Concert, StoryTheme::Nostalgic) => format!(
            r#"Write a touching story about {user_name} at a concert that brings back precious memories.

The concert features: {music_list}

The story should:
- Be written in second person ("You")
- Be approximately {words} words
- Connect live music to cherished memories
- Include moments of recognition and emotional connection
- Show how music bridges past and present
- End with gratitude for musical memories

Start with "As the first song began..." and weave memories throughout the performance."#
        ),
        (StoryType::Concert, StoryTheme::Adventurous) => format!(
            r#"Write a thrilling story about {user_name} at an unexpected and amazing concert experience.

The concert features: {music_list}

The story should:
- Be written in second person ("You")
- Be approximately {words} words
- Include surprising elements and unexpected moments
- Show spontaneous decisions and bold experiences
- Capture the thrill of musical discovery
- End with excitement for future musical adventures

Start with "You never expected..." and build an exciting narrative."#
        ),
        (StoryType::Playlist, StoryTheme::Inspirational) => format!(
            r#"Write an empowering story about {user_name} creating a playlist that changes their life.

Including: {music_list}

The story should:
- Be written in second person ("You")
- Be approximately {words} words
- Show how curating music becomes an act of self-discovery
- Explain the deeper meaning behind each song choice
- Include moments of clarity and personal growth
- End with confidence and self-understanding

Start with "You opened your music app with purpose..." and show intentional curation."#
        ),
        (StoryType::Playlist, StoryTheme::Nostalgic) => format!(
            r#"Write a heartwarming story about {user_name} creating a playlist filled with meaningful memories.

Including: {music_list}

The story should:
- Be written in second person ("You")
- Be approximately {words} words
- Connect each song to a specific memory or person
- Show how music preserves relationships and moments
- Include emotional discoveries while organizing music
- End with appreciation for music's role in life

Start with "Each song held a story..." and explore the memories within."#
        ),
        (StoryType::Playlist, StoryTheme::Adventurous) => format!(
            r#"Write an exciting story about {user_name} creating a playlist for their next big adventure.

Including: {music_list}

The story should:
- Be written in second person ("You")
- Be approximately {words} words
- Frame playlist creation as preparation for adventure
- Show bold musical choices and risk-taking
- Include anticipation and excitement for what's ahead
- End with readiness to embrace new experiences

Start with "The adventure playlist needed..." and build anticipation."#
        ),
    }
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Approximate reading time at 200 words per minute, floored at one minute.
pub fn reading_time_minutes(words: usize) -> usize {
    (words / 200).max(1)
}
