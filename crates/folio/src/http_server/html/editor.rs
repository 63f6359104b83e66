use askama::Template;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Form;
use serde::Deserialize;
use tracing::instrument;

use super::{found, missing_document, render_page, PageError};
use crate::auth::require_signed_in;
use crate::file_store::FileStoreError;
use crate::session::{Flash, Session};
use crate::ServiceState;

#[derive(Template)]
#[template(path = "pages/edit.html")]
pub struct EditTemplate {
    pub flash: Flash,
    pub file_name: String,
    pub lines: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct EditForm {
    #[serde(default)]
    pub new_content: String,
}

#[instrument(skip(state, session))]
pub async fn form(
    State(state): State<ServiceState>,
    session: Session,
    Path(file): Path<String>,
) -> Result<Response, PageError> {
    require_signed_in(&session)?;

    let lines = match state.files().read_lines(&file).await {
        Ok(lines) => lines,
        Err(FileStoreError::NotFound(_) | FileStoreError::InvalidName(_)) => {
            return Ok(missing_document(&session, &file))
        }
        Err(e) => return Err(e.into()),
    };

    let template = EditTemplate {
        flash: session.take_flash(),
        file_name: file,
        lines,
    };

    render_page(StatusCode::OK, &template)
}

/// Replace the whole document with the submitted text, creating it if needed.
#[instrument(skip(state, session, form))]
pub async fn update(
    State(state): State<ServiceState>,
    session: Session,
    Path(file): Path<String>,
    Form(form): Form<EditForm>,
) -> Result<Response, PageError> {
    require_signed_in(&session)?;

    match state.files().write(&file, form.new_content.as_bytes()).await {
        Ok(()) => {}
        Err(FileStoreError::InvalidName(_)) => return Ok(missing_document(&session, &file)),
        Err(e) => return Err(e.into()),
    }

    tracing::info!(document = %file, "document updated");
    session.flash_success(format!("{} was updated.", file));
    Ok(found("/"))
}
