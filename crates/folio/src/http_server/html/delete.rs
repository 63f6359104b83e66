use axum::extract::{Path, State};
use axum::response::Response;
use tracing::instrument;

use super::{found, missing_document, PageError};
use crate::auth::require_signed_in;
use crate::file_store::FileStoreError;
use crate::session::Session;
use crate::ServiceState;

#[instrument(skip(state, session))]
pub async fn handler(
    State(state): State<ServiceState>,
    session: Session,
    Path(file): Path<String>,
) -> Result<Response, PageError> {
    require_signed_in(&session)?;

    match state.files().delete(&file).await {
        Ok(()) => {}
        Err(FileStoreError::NotFound(_) | FileStoreError::InvalidName(_)) => {
            return Ok(missing_document(&session, &file))
        }
        Err(e) => return Err(e.into()),
    }

    tracing::info!(document = %file, "document deleted");
    session.flash_success(format!("{} was deleted!", file));
    Ok(found("/"))
}
