use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;
use tower_http::trace::{DefaultOnFailure, DefaultOnResponse};
use tower_http::LatencyUnit;

mod config;
mod handlers;
mod health;
mod html;

pub use config::Config;

use crate::ServiceState;

const STATUS_PREFIX: &str = "/_status";

/// All routes: documents, sign-in, health, and the 404 fallback.
pub fn router(state: ServiceState) -> Router {
    Router::new()
        .nest(STATUS_PREFIX, health::router(state.clone()))
        .merge(html::router(state.clone()))
        .fallback(handlers::not_found_handler)
        .with_state(state)
}

/// Bind the listening socket up front so a taken port fails startup.
pub async fn bind(config: &Config) -> Result<TcpListener, HttpServerError> {
    TcpListener::bind(config.listen_addr)
        .await
        .map_err(|e| HttpServerError::Bind(config.listen_addr, e))
}

/// Run the document server on `listener` until the shutdown signal fires.
pub async fn run(
    config: Config,
    listener: TcpListener,
    state: ServiceState,
    mut shutdown_rx: watch::Receiver<()>,
) -> Result<(), HttpServerError> {
    let log_level = config.log_level;
    let trace_layer = TraceLayer::new_for_http()
        .on_response(
            DefaultOnResponse::new()
                .include_headers(false)
                .level(log_level)
                .latency_unit(LatencyUnit::Micros),
        )
        .on_failure(DefaultOnFailure::new().latency_unit(LatencyUnit::Micros));

    let router = router(state).layer(trace_layer);

    tracing::info!(addr = ?config.listen_addr, "document server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.changed().await;
        })
        .await?;

    Ok(())
}

/// A plain `302 Found` redirect.
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

#[derive(Debug, thiserror::Error)]
pub enum HttpServerError {
    #[error("failed to bind {0}: {1}")]
    Bind(std::net::SocketAddr, #[source] std::io::Error),

    #[error("an error occurred running the HTTP server: {0}")]
    ServingFailed(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bind_fails_when_port_is_taken() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let config = Config::new(taken.local_addr().unwrap());

        let err = bind(&config).await.unwrap_err();
        assert!(matches!(err, HttpServerError::Bind(addr, _) if addr == config.listen_addr));
    }
}
