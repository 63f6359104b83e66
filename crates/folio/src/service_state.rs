use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

use crate::service_config::Config;
use crate::credentials::{CredentialError, CredentialStore};
use crate::file_store::FileStore;
use crate::session::{key_from_hex, SessionKeyError, SessionStore};

/// Shared handles for the request handlers.
#[derive(Clone)]
pub struct State {
    inner: Arc<StateInner>,
}

struct StateInner {
    files: FileStore,
    credentials: CredentialStore,
    sessions: SessionStore,
    key: Key,
}

impl State {
    pub async fn from_config(config: &Config) -> Result<Self, StateSetupError> {
        // 1. Documents directory
        tokio::fs::create_dir_all(&config.data_dir)
            .await
            .map_err(StateSetupError::DataDir)?;
        tracing::info!(path = %config.data_dir.display(), "serving documents");
        let files = FileStore::new(&config.data_dir);

        // 2. Credentials, checked once so a broken file fails at startup
        let credentials = CredentialStore::new(&config.credentials_path);
        let users = credentials.load().await?;
        if users.is_empty() {
            tracing::warn!(
                path = %config.credentials_path.display(),
                "no users configured, nobody will be able to sign in"
            );
        } else {
            tracing::info!(users = users.len(), "loaded credentials");
        }

        // 3. Cookie signing key
        let key = match &config.session_secret {
            Some(secret) => key_from_hex(secret)?,
            None => {
                tracing::warn!("no session secret configured, sessions will not survive a restart");
                Key::generate()
            }
        };

        Ok(Self::new(files, credentials, key))
    }

    pub fn new(files: FileStore, credentials: CredentialStore, key: Key) -> Self {
        Self {
            inner: Arc::new(StateInner {
                files,
                credentials,
                sessions: SessionStore::new(),
                key,
            }),
        }
    }

    pub fn files(&self) -> &FileStore {
        &self.inner.files
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.inner.credentials
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.inner.sessions
    }
}

impl FromRef<State> for Key {
    fn from_ref(state: &State) -> Self {
        state.inner.key.clone()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("failed to prepare documents directory: {0}")]
    DataDir(#[source] std::io::Error),

    #[error("credentials error: {0}")]
    Credentials(#[from] CredentialError),

    #[error("session key error: {0}")]
    SessionKey(#[from] SessionKeyError),
}
