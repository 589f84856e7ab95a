use std::{net::SocketAddr, path::Path};

use axum::{extract::DefaultBodyLimit, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::config::AppConfig;
use crate::state::AppState;
use crate::users;

const BODY_LIMIT: usize = 1024 * 1024;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

/// Liveness only; the store is not probed.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "Server is running".into(),
        timestamp: OffsetDateTime::now_utc(),
    })
}

pub fn build_app(state: AppState, static_dir: Option<&Path>) -> Router {
    let mut router = Router::new().nest(
        "/api",
        Router::new()
            .merge(users::router())
            .route("/health", get(health)),
    );
    if let Some(dir) = static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        .with_state(state)
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

/// Entry point for hosts that own the listener: reads the environment,
/// runs the store startup hook and returns the ready router.
pub async fn router_from_env() -> anyhow::Result<Router> {
    let config = AppConfig::from_env()?;
    let state = AppState::from_config(&config);
    state.store.init().await?;
    Ok(build_app(state, config.static_dir.as_deref()))
}

/// Bind and serve until SIGINT/SIGTERM, then close the store session.
pub async fn serve(app: Router, config: &AppConfig, state: &AppState) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.store.shutdown().await;
    tracing::info!(store = %state.store.state(), "server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received, starting graceful shutdown");
}
