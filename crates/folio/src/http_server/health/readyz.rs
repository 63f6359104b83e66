use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::ServiceState;

/// Ready once the documents directory is reachable.
#[tracing::instrument(skip(state))]
pub async fn handler(State(state): State<ServiceState>) -> Response {
    match tokio::fs::metadata(state.files().root()).await {
        Ok(meta) if meta.is_dir() => {
            let msg = serde_json::json!({"status": "ok"});
            (StatusCode::OK, Json(msg)).into_response()
        }
        Ok(_) => failure("documents path is not a directory"),
        Err(e) => {
            tracing::error!("documents directory unavailable: {}", e);
            failure("documents directory is unavailable")
        }
    }
}

fn failure(message: &str) -> Response {
    let msg = serde_json::json!({"status": "failure", "message": message});
    (StatusCode::SERVICE_UNAVAILABLE, Json(msg)).into_response()
}
