use clap::{Args, Subcommand};

use folio::state::{AppState, StateError};

#[derive(Args, Debug, Clone)]
pub struct User {
    #[command(subcommand)]
    pub command: UserCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum UserCommand {
    /// Add a user, or reset an existing user's password
    Add { username: String, password: String },
}

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("state error: {0}")]
    State(#[from] StateError),

    #[error("username must not be empty")]
    EmptyUsername,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for User {
    type Error = UserError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        match &self.command {
            UserCommand::Add { username, password } => {
                if username.is_empty() {
                    return Err(UserError::EmptyUsername);
                }
                let state = AppState::load(ctx.site_dir.clone())?;
                state.upsert_user(username, password)?;
                Ok(format!(
                    "Saved user {} to {}",
                    username,
                    state.credentials_path.display()
                ))
            }
        }
    }
}
