use askama::Template;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::Form;
use serde::Deserialize;
use tracing::instrument;

use super::{found, render_page, PageError};
use crate::auth::require_signed_in;
use crate::file_store::validate_name;
use crate::render::has_extension;
use crate::session::{Flash, Session};
use crate::ServiceState;

pub const MISSING_NAME: &str = "New Document must have a name!";
pub const MISSING_EXTENSION: &str = "File must have an extension!";
pub const INVALID_NAME: &str = "Invalid document name!";

#[derive(Template)]
#[template(path = "pages/new_document.html")]
pub struct NewDocumentTemplate {
    pub flash: Flash,
    pub error: Option<String>,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct NewDocumentForm {
    #[serde(default)]
    pub new_document: String,
}

#[instrument(skip_all)]
pub async fn form(session: Session) -> Result<Response, PageError> {
    require_signed_in(&session)?;

    let template = NewDocumentTemplate {
        flash: session.take_flash(),
        error: None,
        name: String::new(),
    };

    render_page(StatusCode::OK, &template)
}

#[instrument(skip(state, session))]
pub async fn create(
    State(state): State<ServiceState>,
    session: Session,
    Form(form): Form<NewDocumentForm>,
) -> Result<Response, PageError> {
    require_signed_in(&session)?;

    let name = form.new_document;

    // A missing extension re-renders the form without a 422.
    let rejection = if name.is_empty() {
        Some((StatusCode::UNPROCESSABLE_ENTITY, MISSING_NAME))
    } else if !has_extension(&name) {
        Some((StatusCode::OK, MISSING_EXTENSION))
    } else if validate_name(&name).is_err() {
        Some((StatusCode::UNPROCESSABLE_ENTITY, INVALID_NAME))
    } else {
        None
    };

    if let Some((status, message)) = rejection {
        tracing::warn!(document = %name, "rejected new document: {}", message);
        let template = NewDocumentTemplate {
            flash: session.take_flash(),
            error: Some(message.to_string()),
            name,
        };
        return render_page(status, &template);
    }

    state.files().create(&name).await?;

    tracing::info!(document = %name, "document created");
    session.flash_success(format!("{} was created", name));
    Ok(found("/"))
}
