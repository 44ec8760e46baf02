use anyhow::Context;
use axum::{http::HeaderValue, middleware, Router};
use procurement_api::{
    api_v1_routes, config,
    db::{self, DbPool},
    events::{self, EventSender},
    metrics, openapi, request_logging_middleware,
    tracing::request_id_middleware,
    AppState,
};
use std::sync::Arc;
use tokio::{net::TcpListener, sync::mpsc};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
};
use tracing::{info, warn};

const EVENT_CHANNEL_CAPACITY: usize = 100;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = config::load_config().context("failed to load configuration")?;
    config::init_tracing(cfg.log_level(), cfg.log_json);

    info!(
        environment = %cfg.environment,
        addr = %cfg.server_addr(),
        "Starting procurement-api"
    );

    let db: Arc<DbPool> = Arc::new(
        db::establish_connection_from_app_config(&cfg)
            .await
            .context("failed to connect to database")?,
    );
    if cfg.auto_migrate {
        db::run_migrations(&db)
            .await
            .context("failed to run migrations")?;
    }

    let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let event_sender = Arc::new(EventSender::new(event_tx));
    tokio::spawn(events::process_events(event_rx));

    let state = AppState::new(db, cfg.clone(), event_sender);

    let app = Router::new()
        .merge(openapi::swagger_ui())
        .route("/metrics", axum::routing::get(metrics::metrics_handler))
        .nest("/api/v1", api_v1_routes())
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CompressionLayer::new())
        .layer(cors_layer(&cfg))
        .with_state(state);

    let listener = TcpListener::bind(cfg.server_addr())
        .await
        .with_context(|| format!("failed to bind {}", cfg.server_addr()))?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Shutdown complete");
    Ok(())
}

fn cors_layer(cfg: &config::AppConfig) -> CorsLayer {
    if let Some(origins) = &cfg.cors_allowed_origins {
        let origins: Vec<HeaderValue> = origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    } else if cfg.cors_allow_any_origin {
        warn!("CORS is configured to allow any origin");
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
