use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use join_board::api::router;
use join_board::state::AppState;
use join_board::store::{DocumentStore, FirebaseHttpClient, MemoryStore, StoreConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "join_board=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let store: Arc<dyn DocumentStore> = match StoreConfig::new_from_env() {
        Ok(config) => {
            info!("using document store at {}", config.base_url);
            Arc::new(FirebaseHttpClient::new(config)?)
        }
        Err(e) => {
            warn!("{}; falling back to in-memory store", e);
            Arc::new(MemoryStore::new())
        }
    };

    let state = AppState::new(store);
    let app = router(state);

    let addr: SocketAddr = std::env::var("JOIN_LISTEN_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
        .parse()?;
    info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
