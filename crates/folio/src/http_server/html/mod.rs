use askama::Template;
use axum::http::{header, StatusCode};
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;

mod delete;
mod document;
mod editor;
mod index;
mod new_document;
mod users;

use super::found;
use crate::auth::SignInRequired;
use crate::credentials::CredentialError;
use crate::file_store::FileStoreError;
use crate::render::TEXT_HTML;
use crate::session::{session_layer, Session};
use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/", get(index::handler))
        .route("/:file", get(document::handler))
        .route("/edit/:file", get(editor::form).post(editor::update))
        .route("/file/new", get(new_document::form).post(new_document::create))
        .route("/delete/:file", post(delete::handler))
        .route("/users/signin", get(users::form).post(users::sign_in))
        .route("/users/signout", post(users::sign_out))
        .layer(middleware::from_fn_with_state(state.clone(), session_layer))
        .with_state(state)
}

/// Render a page template with the given status.
fn render_page<T: Template>(status: StatusCode, template: &T) -> Result<Response, PageError> {
    let body = template.render()?;
    Ok((status, [(header::CONTENT_TYPE, TEXT_HTML)], body).into_response())
}

/// Flash the not-found message for `name` and send the client to the index.
fn missing_document(session: &Session, name: &str) -> Response {
    tracing::warn!(document = name, "document does not exist");
    session.flash_error(format!("{} does not exist.", name));
    found("/")
}

#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("sign in required")]
    SignInRequired(#[from] SignInRequired),
    #[error("template error: {0}")]
    Template(#[from] askama::Error),
    #[error("file store error: {0}")]
    Files(#[from] FileStoreError),
    #[error("credentials error: {0}")]
    Credentials(#[from] CredentialError),
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            PageError::SignInRequired(redirect) => redirect.into_response(),
            e => {
                tracing::error!("PAGE ERROR: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    [(header::CONTENT_TYPE, "text/plain")],
                    "Internal Server Error",
                )
                    .into_response()
            }
        }
    }
}
