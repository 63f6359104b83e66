use askama::Template;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::render::TEXT_HTML;

#[derive(Template)]
#[template(path = "pages/not_found.html")]
struct NotFoundTemplate {}

pub async fn not_found_handler(headers: HeaderMap) -> Response {
    let accept = headers.get(header::ACCEPT).and_then(|v| v.to_str().ok());

    match accept {
        Some(accept_str) if accept_str.contains("application/json") => {
            let err_msg = serde_json::json!({"msg": "not found"});
            (StatusCode::NOT_FOUND, Json(err_msg)).into_response()
        }
        Some(accept_str) if accept_str.contains("text/html") => {
            let template = NotFoundTemplate {};
            match template.render() {
                Ok(body) => (
                    StatusCode::NOT_FOUND,
                    [(header::CONTENT_TYPE, TEXT_HTML)],
                    body,
                )
                    .into_response(),
                Err(e) => {
                    tracing::error!("failed to render not found page: {}", e);
                    StatusCode::NOT_FOUND.into_response()
                }
            }
        }
        _ => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "text/plain")],
            "not found",
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_negotiates_on_accept() {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, "application/json".parse().unwrap());
        let response = not_found_handler(headers).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");

        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, "text/html".parse().unwrap());
        let response = not_found_handler(headers).await;
        assert_eq!(response.headers()[header::CONTENT_TYPE], TEXT_HTML);

        let response = not_found_handler(HeaderMap::new()).await;
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/plain");
    }
}
