use axum::routing::{get, post};
use axum::Router;
use tracing_subscriber::EnvFilter;

use harmonia::api;
use harmonia::config::Config;
use harmonia::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    tracing::info!("Taste service: {}", config.taste.base_url);
    tracing::info!(
        "Generative service: {} ({})",
        config.genai.base_url,
        config.genai.model
    );

    let state = AppState::new(config.clone())?;

    let app = Router::new()
        .route("/api/discover", post(api::discovery::discover))
        .route("/api/recommendations", post(api::discovery::recommendations))
        .route("/api/trending", get(api::discovery::trending))
        .route("/api/story", post(api::narrative::story))
        .route("/api/mood-analysis", post(api::narrative::mood_analysis))
        .route("/api/playlist-generator", post(api::playlist::generate_playlist))
        .route("/api/profile", post(api::playlist::build_profile))
        .route("/api/cross-domain", post(api::playlist::cross_domain))
        .route("/api/health", get(api::health))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
