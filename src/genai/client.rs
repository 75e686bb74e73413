use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::GenAiConfig;

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// Send one prompt to the generative-text service and return the first
/// candidate's text.
pub async fn generate(
    client: &reqwest::Client,
    config: &GenAiConfig,
    prompt: &str,
) -> Result<String> {
    let url = format!(
        "{}/v1beta/models/{}:generateContent",
        config.base_url, config.model
    );

    let req = GenerateRequest {
        contents: vec![Content {
            parts: vec![Part {
                text: prompt.to_string(),
            }],
        }],
    };

    let resp = client
        .post(&url)
        .header("x-goog-api-key", &config.api_key)
        .timeout(config.timeout())
        .json(&req)
        .send()
        .await
        .context("Failed to call generative-text API")?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        let snippet = body.chars().take(200).collect::<String>();
        anyhow::bail!("Generative-text API returned {status}: {snippet}");
    }

    let body: GenerateResponse = resp.json().await?;
    let text: String = body
        .candidates
        .first()
        .map(|c| {
            c.content
                .parts
                .iter()
                .map(|p| p.text.as_str())
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        anyhow::bail!("Generative-text API returned no candidates");
    }
    Ok(text)
}
