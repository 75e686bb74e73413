use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

use crate::config::TasteConfig;
use crate::models::Entity;
use crate::taste::cache::RequestCache;
use crate::taste::rate_limit::RateLimiter;

/// Failure modes of the taste-search boundary. An `Ok` with an empty
/// entity list means the service answered and found nothing; these
/// variants mean the request itself failed.
#[derive(Debug, Error)]
pub enum TasteError {
    #[error("taste request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("taste service denied access to {endpoint} (403)")]
    Forbidden { endpoint: String },
    #[error("taste service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("taste response was not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Client for the external taste-search service. Owns the process-wide
/// rate limiter and response cache; constructed once and shared.
pub struct TasteClient {
    http: reqwest::Client,
    config: TasteConfig,
    limiter: RateLimiter,
    cache: RequestCache,
}

impl TasteClient {
    pub fn new(http: reqwest::Client, config: TasteConfig) -> Self {
        let limiter = RateLimiter::new(config.min_interval());
        let cache = RequestCache::new(config.cache_capacity);
        Self {
            http,
            config,
            limiter,
            cache,
        }
    }

    /// Search for entities across all categories. The one real endpoint;
    /// every derived operation is built on top of this.
    pub async fn search(
        &self,
        query: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Entity>, TasteError> {
        let mut params = BTreeMap::new();
        params.insert("query".to_string(), query.to_string());
        params.insert("limit".to_string(), limit.to_string());
        params.insert("offset".to_string(), offset.to_string());

        let body = self.request_json("/search", &params, false).await?;
        Ok(parse_search_results(&body))
    }

    /// Rate-limited, cached GET returning the parsed response body.
    async fn request_json(
        &self,
        endpoint: &str,
        params: &BTreeMap<String, String>,
        bypass_cache: bool,
    ) -> Result<Value, TasteError> {
        self.cache
            .get_or_fetch(endpoint, params, bypass_cache, || {
                self.fetch(endpoint, params)
            })
            .await
    }

    async fn fetch(
        &self,
        endpoint: &str,
        params: &BTreeMap<String, String>,
    ) -> Result<Value, TasteError> {
        self.limiter.wait_if_needed().await;

        let url = format!("{}{}", self.config.base_url, endpoint);
        let resp = self
            .http
            .get(&url)
            .query(params)
            .header("X-Api-Key", &self.config.api_key)
            .timeout(self.config.timeout())
            .send()
            .await?;

        let status = resp.status();
        if status == reqwest::StatusCode::FORBIDDEN {
            tracing::warn!("access forbidden for {endpoint} with params {params:?}");
            return Err(TasteError::Forbidden {
                endpoint: endpoint.to_string(),
            });
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let snippet = body.chars().take(100).collect::<String>();
            tracing::warn!("taste request failed: {status} - {snippet}");
            return Err(TasteError::Status {
                status: status.as_u16(),
                body: snippet,
            });
        }

        let text = resp.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Wrap each raw result object into an [`Entity`]. A success body missing
/// the expected `results` array yields an empty list; no filtering happens
/// at this layer.
pub fn parse_search_results(body: &Value) -> Vec<Entity> {
    body.get("results")
        .and_then(Value::as_array)
        .map(|results| results.iter().map(Entity::from_raw).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_results_wraps_each_object() {
        let body = json!({
            "results": [
                {"name": "Portishead", "types": ["artist"]},
                {"name": "Massive Attack", "popularity": 0.8},
            ]
        });
        let entities = parse_search_results(&body);
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].name, "Portishead");
        assert_eq!(entities[1].popularity, Some(0.8));
    }

    #[test]
    fn test_parse_missing_results_is_empty() {
        assert!(parse_search_results(&json!({"status": "ok"})).is_empty());
        assert!(parse_search_results(&json!({})).is_empty());
    }

    #[test]
    fn test_parse_results_wrong_shape_is_empty() {
        assert!(parse_search_results(&json!({"results": "nope"})).is_empty());
        assert!(parse_search_results(&json!({"results": 7})).is_empty());
    }

    #[test]
    fn test_parse_keeps_duplicate_names() {
        // Dedup belongs to the fan-out layer, not here.
        let body = json!({"results": [{"name": "Blur"}, {"name": "Blur"}]});
        assert_eq!(parse_search_results(&body).len(), 2);
    }

    #[test]
    fn test_error_display_distinguishes_forbidden() {
        let err = TasteError::Forbidden {
            endpoint: "/search".to_string(),
        };
        assert!(err.to_string().contains("403"));
    }
}
