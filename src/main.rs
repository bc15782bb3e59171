use tracing_subscriber::EnvFilter;

use repo_typeahead::api;
use repo_typeahead::config::Config;
use repo_typeahead::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    tracing::info!("Run mode: {:?}", config.run_mode);
    tracing::info!("GitHub API: {}", config.github.api_url);
    tracing::info!("GitLab API: {}", config.gitlab.api_url);

    let state = AppState::new(config.clone())?;
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
