//! Signed-in gate for the mutating routes.

use axum::response::{IntoResponse, Response};

use crate::http_server::found;
use crate::session::Session;

pub const SIGNIN_REQUIRED: &str = "You must be signed in to do that!";

/// The request has no signed-in user. Responds with a redirect to the index;
/// the error message has already been flashed.
#[derive(Debug, thiserror::Error)]
#[error("sign in required")]
pub struct SignInRequired;

impl IntoResponse for SignInRequired {
    fn into_response(self) -> Response {
        found("/")
    }
}

/// Returns the signed-in user, or flashes an error and fails with
/// [`SignInRequired`].
pub fn require_signed_in(session: &Session) -> Result<String, SignInRequired> {
    match session.user().filter(|user| !user.is_empty()) {
        Some(user) => Ok(user),
        None => {
            tracing::warn!(session = ?session.id(), "rejected request without a signed-in user");
            session.flash_error(SIGNIN_REQUIRED);
            Err(SignInRequired)
        }
    }
}

pub fn is_signed_in(session: &Session) -> bool {
    session.user().is_some_and(|user| !user.is_empty())
}

/// Signs `username` in under a freshly rotated session id.
pub fn sign_in(session: &Session, username: &str) {
    session.rotate();
    session.set_user(username);
    session.flash_success(format!("Welcome {}!", username));
    tracing::info!(user = username, "signed in");
}

pub fn sign_out(session: &Session) {
    let previous = session.clear_user().unwrap_or_default();
    session.flash_success(format!("{} has signed out.", previous));
    tracing::info!(user = previous, "signed out");
}
