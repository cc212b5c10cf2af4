use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::info;
use training_hub::{
    config::{get_config, init_config},
    routes, AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    training_hub::telemetry::init_tracing();

    init_config()?;
    let config = get_config();

    tokio::fs::create_dir_all(&config.data_dir).await?;
    tokio::fs::create_dir_all(&config.media_dir).await?;

    let app_state = AppState::new(config.clone())?;
    if app_state.planner.is_mock() {
        info!("GROQ_API_KEY not set; AI routes return placeholder content");
    }

    let app = routes::router(app_state);

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    info!("WebDriver endpoint: {}", config.webdriver_url);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutting down");
}
