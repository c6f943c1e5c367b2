//! gigboard - file-backed project board server

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gigboard_api::{build_router, AppState};
use gigboard_store::JsonFileStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "gigboard_api=debug,gigboard_store=debug,tower_http=info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Get configuration from environment
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "8787".to_string())
        .parse()
        .unwrap_or(8787);
    let data_file = std::env::var("DATA_FILE").unwrap_or_else(|_| "projects.json".to_string());
    let legacy_file = std::env::var("LEGACY_DATA_FILE").unwrap_or_else(|_| "db.json".to_string());
    let static_dir = std::env::var("STATIC_DIR").unwrap_or_else(|_| "public".to_string());

    let store = JsonFileStore::new(&data_file, &legacy_file);
    store.initialize().await?;
    info!(data_file = %data_file, "Store initialized");

    let state = AppState {
        store: Arc::new(store),
        static_dir: static_dir.clone().into(),
    };
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!(static_dir = %static_dir, "Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
