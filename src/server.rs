use anyhow::Result;
use arc_swap::ArcSwap;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::{
    analysis::HeuristicEstimator,
    config::Config,
    handlers::{self, analyze::AppState},
    metrics,
    quotes::QuoteStore,
    signals::setup_signal_handlers,
};

/// Start the pricing server
///
/// This function:
/// 1. Initializes metrics
/// 2. Sets up signal handlers for graceful shutdown and config reload
/// 3. Creates the Axum application
/// 4. Binds to the configured address
/// 5. Serves requests with graceful shutdown support
pub async fn start_server(config: Config, config_path: PathBuf) -> Result<()> {
    info!("Initializing Prometheus metrics...");
    let metrics_handle = Arc::new(metrics::init_metrics());

    // Wrap config in ArcSwap for atomic reload support
    let config_swap = Arc::new(ArcSwap::from_pointee(config.clone()));

    // Setup signal handlers (SIGTERM, SIGINT for shutdown; SIGHUP for reload)
    let (shutdown_tx, signal_handle) = setup_signal_handlers(config_swap.clone(), config_path);
    let mut shutdown_rx = shutdown_tx.subscribe();

    let app_state = AppState {
        config: config_swap.clone(),
        estimator: Arc::new(HeuristicEstimator),
        quotes: Arc::new(QuoteStore::new()),
    };

    let app = create_router(&config, app_state, metrics_handle);

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    info!("Starting print pricer on {}", addr);
    info!(
        "Configuration: {} materials, {} allowed extensions, minimum order {:.2} EUR",
        config.materials.len(),
        config.upload.allowed_extensions.len(),
        config.pricing.minimum_price
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
            info!("Shutdown signal received, draining connections...");
        })
        .await?;

    signal_handle.await?;
    info!("Server stopped gracefully");

    Ok(())
}

/// Create the Axum router with all routes and middleware
fn create_router(
    config: &Config,
    app_state: AppState,
    metrics_handle: Arc<metrics_exporter_prometheus::PrometheusHandle>,
) -> Router {
    let api_routes = Router::new()
        .route("/api/analyze", post(handlers::analyze::handle_analyze))
        .route("/api/materials", get(handlers::materials::list_materials))
        .route("/api/quote", post(handlers::quotes::create_quote))
        .route("/api/quote/:id", get(handlers::quotes::get_quote))
        .with_state(app_state);

    Router::new()
        // Public endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .route("/metrics", get(handlers::metrics_handler::metrics))
        .with_state(metrics_handle)
        .merge(api_routes)
        // Uploads are size-capped to keep memory bounded
        .layer(DefaultBodyLimit::max(config.upload.max_upload_bytes))
        // The browser frontend is served from anywhere
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
