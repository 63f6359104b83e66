use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use tracing::instrument;

use super::{missing_document, PageError};
use crate::file_store::FileStoreError;
use crate::render::render;
use crate::session::Session;
use crate::ServiceState;

#[instrument(skip(state, session))]
pub async fn handler(
    State(state): State<ServiceState>,
    session: Session,
    Path(file): Path<String>,
) -> Result<Response, PageError> {
    let content = match state.files().read(&file).await {
        Ok(content) => content,
        Err(FileStoreError::NotFound(_) | FileStoreError::InvalidName(_)) => {
            return Ok(missing_document(&session, &file))
        }
        Err(e) => return Err(e.into()),
    };

    let rendered = render(&file, content);
    Ok(([(header::CONTENT_TYPE, rendered.mime_type)], rendered.body).into_response())
}
