use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address
    pub bind_addr: String,
    /// Taste-search integration configuration
    pub taste: TasteConfig,
    /// Generative-text integration configuration
    pub genai: GenAiConfig,
    /// Optional fixed seed for the scoring RNG (deterministic runs)
    pub scoring_seed: Option<u64>,
}

/// Configuration for the external taste/recommendation search service.
#[derive(Debug, Clone)]
pub struct TasteConfig {
    /// API key sent in the `X-Api-Key` header
    pub api_key: String,
    /// Base URL for the search service
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Minimum wall-clock gap between outbound calls, in milliseconds
    pub min_interval_ms: u64,
    /// Maximum number of cached responses before eviction kicks in
    pub cache_capacity: usize,
}

/// Configuration for the external generative-text service.
#[derive(Debug, Clone)]
pub struct GenAiConfig {
    /// API key sent in the `x-goog-api-key` header
    pub api_key: String,
    /// Base URL for the generative API
    pub base_url: String,
    /// Model name interpolated into the request path
    pub model: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            taste: TasteConfig::default(),
            genai: GenAiConfig::default(),
            scoring_seed: None,
        }
    }
}

impl Default for TasteConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://hackathon.api.qloo.com".to_string(),
            timeout_secs: 10,
            min_interval_ms: 100,
            cache_capacity: 1024,
        }
    }
}

impl Default for GenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-2.5-flash".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("HARMONIA_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Ok(key) = std::env::var("TASTE_API_KEY") {
            config.taste.api_key = key;
        }
        if let Ok(url) = std::env::var("TASTE_BASE_URL") {
            config.taste.base_url = url;
        }
        if let Ok(val) = std::env::var("TASTE_TIMEOUT_SECS") {
            if let Ok(v) = val.parse() {
                config.taste.timeout_secs = v;
            }
        }
        if let Ok(val) = std::env::var("TASTE_MIN_INTERVAL_MS") {
            if let Ok(v) = val.parse() {
                config.taste.min_interval_ms = v;
            }
        }
        if let Ok(val) = std::env::var("TASTE_CACHE_CAPACITY") {
            if let Ok(v) = val.parse() {
                config.taste.cache_capacity = v;
            }
        }
        if let Ok(key) = std::env::var("GENAI_API_KEY") {
            config.genai.api_key = key;
        }
        if let Ok(url) = std::env::var("GENAI_BASE_URL") {
            config.genai.base_url = url;
        }
        if let Ok(model) = std::env::var("GENAI_MODEL") {
            config.genai.model = model;
        }
        if let Ok(val) = std::env::var("GENAI_TIMEOUT_SECS") {
            if let Ok(v) = val.parse() {
                config.genai.timeout_secs = v;
            }
        }
        if let Ok(val) = std::env::var("HARMONIA_SCORING_SEED") {
            if let Ok(v) = val.parse() {
                config.scoring_seed = Some(v);
            }
        }

        config
    }
}

impl TasteConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }
}

impl GenAiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
