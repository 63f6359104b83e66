use askama::Template;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use tracing::instrument;

use super::{render_page, PageError};
use crate::auth::is_signed_in;
use crate::session::{Flash, Session};
use crate::ServiceState;

#[derive(Template)]
#[template(path = "pages/index.html")]
pub struct IndexTemplate {
    pub flash: Flash,
    pub user: Option<String>,
    pub files: Vec<String>,
}

#[instrument(skip_all)]
pub async fn handler(
    State(state): State<ServiceState>,
    session: Session,
) -> Result<Response, PageError> {
    let mut files = state.files().list().await?;
    files.sort();

    let user = if is_signed_in(&session) {
        session.user()
    } else {
        None
    };

    let template = IndexTemplate {
        flash: session.take_flash(),
        user,
        files,
    };

    render_page(StatusCode::OK, &template)
}
