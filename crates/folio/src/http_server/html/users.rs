use askama::Template;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::Form;
use serde::Deserialize;
use tracing::instrument;

use super::{found, render_page, PageError};
use crate::auth;
use crate::session::{Flash, Session};
use crate::ServiceState;

pub const INVALID_SIGNIN: &str = "Invalid Signin";

#[derive(Template)]
#[template(path = "pages/signin.html")]
pub struct SigninTemplate {
    pub flash: Flash,
    pub error: Option<String>,
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct SigninForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[instrument(skip_all)]
pub async fn form(session: Session) -> Result<Response, PageError> {
    let template = SigninTemplate {
        flash: session.take_flash(),
        error: None,
        username: String::new(),
    };

    render_page(StatusCode::OK, &template)
}

#[instrument(skip_all, fields(username = %form.username))]
pub async fn sign_in(
    State(state): State<ServiceState>,
    session: Session,
    Form(form): Form<SigninForm>,
) -> Result<Response, PageError> {
    if state
        .credentials()
        .verify(&form.username, &form.password)
        .await?
    {
        auth::sign_in(&session, &form.username);
        return Ok(found("/"));
    }

    tracing::warn!("invalid sign in attempt");
    let template = SigninTemplate {
        flash: session.take_flash(),
        error: Some(INVALID_SIGNIN.to_string()),
        username: form.username,
    };

    render_page(StatusCode::UNPROCESSABLE_ENTITY, &template)
}

#[instrument(skip_all)]
pub async fn sign_out(session: Session) -> Result<Response, PageError> {
    auth::require_signed_in(&session)?;
    auth::sign_out(&session);
    Ok(found("/"))
}
