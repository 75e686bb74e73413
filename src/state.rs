use std::sync::Arc;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::Config;
use crate::taste::TasteClient;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub http_client: reqwest::Client,
    pub taste: Arc<TasteClient>,
    /// Seedable randomness source for the scoring helpers. Lock it only
    /// after all awaits in a handler have completed.
    pub rng: Arc<Mutex<StdRng>>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .timeout(std::time::Duration::from_secs(120))
            .build()?;

        let taste = TasteClient::new(http_client.clone(), config.taste.clone());

        let rng = match config.scoring_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            config,
            http_client,
            taste: Arc::new(taste),
            rng: Arc::new(Mutex::new(rng)),
        })
    }
}
