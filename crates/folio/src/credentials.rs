//! Read-only username to password-hash mapping.
//!
//! The file is a flat TOML table of `username = "<argon2 PHC string>"` and is
//! re-read on every lookup, so edits take effect without a restart.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

pub type Credentials = BTreeMap<String, String>;

#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Result<Credentials, CredentialError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| CredentialError::Read(self.path.clone(), e))?;
        parse(&raw)
    }

    /// Check `password` against the stored hash for `username`.
    ///
    /// Unknown users are simply not valid; an unparseable stored hash is an
    /// error.
    pub async fn verify(&self, username: &str, password: &str) -> Result<bool, CredentialError> {
        let credentials = self.load().await?;
        let Some(hash) = credentials.get(username).cloned() else {
            return Ok(false);
        };

        let password = password.to_owned();
        tokio::task::spawn_blocking(move || verify_password(&hash, &password)).await?
    }
}

pub fn parse(raw: &str) -> Result<Credentials, CredentialError> {
    Ok(toml::from_str(raw)?)
}

pub fn hash_password(password: &str) -> Result<String, CredentialError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| CredentialError::Hash(e.to_string()))?;
    Ok(hash.to_string())
}

pub fn verify_password(hash: &str, password: &str) -> Result<bool, CredentialError> {
    let parsed = PasswordHash::new(hash).map_err(|e| CredentialError::Hash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("failed to read credentials file {0:?}: {1}")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("malformed credentials file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid password hash: {0}")]
    Hash(String),

    #[error("password verification task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
