use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::http::{HeaderValue, Method};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tracing::info;

use catalog_api::config::{init_tracing, load_config};
use catalog_api::db::{establish_connection_from_app_config, run_migrations};
use catalog_api::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config().context("failed to load configuration")?;
    init_tracing(config.log_level(), config.log_json);

    info!(environment = %config.environment, "starting catalog-api");

    let db = Arc::new(
        establish_connection_from_app_config(&config)
            .await
            .context("failed to connect to the database")?,
    );
    if config.auto_migrate {
        run_migrations(&db).await.context("migrations failed")?;
        info!("migrations applied");
    }

    let cors = build_cors(&config)?;
    let state = AppState::new(db, config.clone());
    let app = build_router(state)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(cors);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    info!("server stopped");
    Ok(())
}

fn build_cors(config: &catalog_api::config::AppConfig) -> anyhow::Result<CorsLayer> {
    if let Some(allowed) = config.cors_allowed_origins.as_deref() {
        let origins = allowed
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(|origin| {
                origin
                    .parse::<HeaderValue>()
                    .with_context(|| format!("invalid CORS origin {origin:?}"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        // Wildcard methods and headers cannot be combined with credentials.
        let mut layer = CorsLayer::new().allow_origin(AllowOrigin::list(origins));
        if config.cors_allow_credentials {
            layer = layer
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([axum::http::header::CONTENT_TYPE])
                .allow_credentials(true);
        } else {
            layer = layer.allow_methods(Any).allow_headers(Any);
        }
        return Ok(layer);
    }
    if config.should_allow_permissive_cors() {
        return Ok(CorsLayer::permissive());
    }
    anyhow::bail!("CORS origins must be configured outside development")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install ctrl-c handler");
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
