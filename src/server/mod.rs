use anyhow::{Context, Result};
use axum::{routing::get, Router};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, cors::CorsLayer};
use tracing::info;

pub mod handlers;
pub mod state;

pub use self::state::AppState;
use handlers::{get_legend, get_map, get_markers, index_html};

// Create the main application router
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_html))
        .route("/api/map", get(get_map))
        .route("/api/markers", get(get_markers))
        .route("/api/legend", get(get_legend))
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(CompressionLayer::new()),
        )
        .with_state(state)
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}

/// Binds `127.0.0.1:{port}`; `on_ready` runs once the listener is accepting.
pub async fn start_server<F>(state: AppState, port: u16, on_ready: F) -> Result<()>
where
    F: FnOnce(&str),
{
    let app = create_app(state);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    let url = format!("http://{}", addr);
    println!("   ✅ HTTP server started successfully at {}", url);
    info!(%addr, "serving earthquake map");
    on_ready(&url);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
