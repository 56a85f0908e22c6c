//! Advertisement API server: connect, ensure schema, serve.

use adboard::{
    advertisement_routes, common_routes, connect_with_retry, AdvertisementStore, AppState, DbConfig,
};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("adboard=info")),
        )
        .init();

    let config = DbConfig::from_env();
    tracing::info!("connecting to {}", config.display_url());
    let pool = connect_with_retry(&config.url()).await?;

    let store = AdvertisementStore::new(pool);
    // Fail fast: refuse to serve against a missing schema.
    store.ensure_schema().await?;
    tracing::info!("advertisements table ready");

    let state = AppState { store };
    let app = common_routes(state.clone()).merge(advertisement_routes(state));

    let addr = std::env::var("HTTP_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".into());
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Advertisement API listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
