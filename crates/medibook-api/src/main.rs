use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use medibook_api::{app, AppConfig, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    let port = config.port;
    let state = AppState::new(config);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!(port, "medibook api listening");
    axum::serve(listener, app(state)).await?;
    Ok(())
}
