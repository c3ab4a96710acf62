pub mod dashboards;
pub mod handlers;
pub mod routes;
pub mod shared;
pub mod system;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{header, Method};
use axum::middleware;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};

use dashboards::d405_sales_report::HttpReportUpstream;
use handlers::d405_sales_report::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    system::tracing::initialize()?;

    let config = shared::config::load_config()?;
    tracing::info!(
        "Report API: {} (timeout {}s)",
        config.upstream.base_url,
        config.upstream.timeout_secs
    );

    let upstream = HttpReportUpstream::new(&config.upstream)
        .map_err(|e| anyhow::anyhow!("upstream client init failed: {e}"))?;
    let state = AppState {
        upstream: Arc::new(upstream),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    // SPA: неизвестные пути отдают index.html
    let static_dir = shared::config::get_static_dir(&config);
    tracing::info!("Serving frontend from {}", static_dir.display());
    let frontend =
        ServeDir::new(&static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    let app = routes::configure_routes(state)
        .fallback_service(frontend)
        .layer(middleware::from_fn(system::middleware::request_logger))
        .layer(cors);

    let port = config.server.port;
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: Port {} is already in use. Please ensure no other process is using this port.",
                    port
                );
            } else {
                tracing::error!("Failed to bind to port {}. Error: {}", port, e);
            }
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}
