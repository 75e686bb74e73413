//! Integration with the external generative-text service: a raw
//! prompt-in/text-out client, story prompt assembly and metrics, and mood
//! analysis with a local keyword fallback.

pub mod client;
pub mod mood;
pub mod story;
