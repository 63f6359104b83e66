use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::{fs, io};

use axum_extra::extract::cookie::Key;
use serde::{Deserialize, Serialize};

use crate::session::key_to_hex;

pub const APP_NAME: &str = "folio";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DATA_DIR_NAME: &str = "data";
pub const CREDENTIALS_FILE_NAME: &str = "users.toml";
pub const SESSION_KEY_FILE_NAME: &str = "session.key";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Port for the document server
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,
    /// Documents directory, relative to the site directory unless absolute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Credentials file, relative to the site directory unless absolute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials_path: Option<PathBuf>,
}

fn default_listen_port() -> u16 {
    4567
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_port: default_listen_port(),
            data_dir: None,
            credentials_path: None,
        }
    }
}

/// Resolved locations of everything in a site directory.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the site directory (~/.folio)
    pub site_dir: PathBuf,
    /// Path to the documents directory
    pub data_dir: PathBuf,
    /// Path to the credentials file
    pub credentials_path: PathBuf,
    /// Path to the session signing key
    pub session_key_path: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the site directory path (custom or default ~/.folio)
    pub fn site_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Initialize a new site directory
    pub fn init(custom_path: Option<PathBuf>, config: Option<AppConfig>) -> Result<Self, StateError> {
        let site_dir = Self::site_dir(custom_path)?;

        if site_dir.exists() {
            return Err(StateError::AlreadyInitialized);
        }
        fs::create_dir_all(&site_dir)?;

        let config = config.unwrap_or_default();
        let config_path = site_dir.join(CONFIG_FILE_NAME);
        fs::write(&config_path, toml::to_string_pretty(&config)?)?;

        let state = Self::resolve(site_dir, config_path, config);

        fs::create_dir_all(&state.data_dir)?;
        if !state.credentials_path.exists() {
            fs::write(&state.credentials_path, "")?;
        }
        fs::write(&state.session_key_path, key_to_hex(&Key::generate()))?;

        Ok(state)
    }

    /// Load existing state from the site directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let site_dir = Self::site_dir(custom_path)?;

        if !site_dir.exists() {
            return Err(StateError::NotInitialized);
        }

        let config_path = site_dir.join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            return Err(StateError::MissingFile(CONFIG_FILE_NAME.to_string()));
        }

        let config: AppConfig = toml::from_str(&fs::read_to_string(&config_path)?)?;
        let state = Self::resolve(site_dir, config_path, config);

        if !state.credentials_path.exists() {
            return Err(StateError::MissingFile(
                state.credentials_path.display().to_string(),
            ));
        }

        Ok(state)
    }

    /// Read the session signing secret, if one has been generated
    pub fn load_session_secret(&self) -> Result<Option<String>, StateError> {
        match fs::read_to_string(&self.session_key_path) {
            Ok(secret) => Ok(Some(secret.trim().to_string())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Hash `password` and store it for `username`, replacing any existing entry.
    pub fn upsert_user(&self, username: &str, password: &str) -> Result<(), StateError> {
        let raw = fs::read_to_string(&self.credentials_path)?;
        let mut users: BTreeMap<String, String> = toml::from_str(&raw)?;

        let hash = crate::credentials::hash_password(password)
            .map_err(|e| StateError::Credentials(e.to_string()))?;
        users.insert(username.to_string(), hash);

        fs::write(&self.credentials_path, toml::to_string(&users)?)?;
        Ok(())
    }

    fn resolve(site_dir: PathBuf, config_path: PathBuf, config: AppConfig) -> Self {
        let data_dir = relative_to(&site_dir, config.data_dir.as_deref(), DATA_DIR_NAME);
        let credentials_path = relative_to(
            &site_dir,
            config.credentials_path.as_deref(),
            CREDENTIALS_FILE_NAME,
        );
        let session_key_path = site_dir.join(SESSION_KEY_FILE_NAME);

        Self {
            site_dir,
            data_dir,
            credentials_path,
            session_key_path,
            config_path,
            config,
        }
    }
}

fn relative_to(base: &Path, custom: Option<&Path>, default: &str) -> PathBuf {
    match custom {
        Some(path) if path.is_absolute() => path.to_path_buf(),
        Some(path) => base.join(path),
        None => base.join(default),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("site directory not initialized. Run 'folio init' first")]
    NotInitialized,

    #[error("site directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("missing required file: {0}")]
    MissingFile(String),

    #[error("credentials error: {0}")]
    Credentials(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_then_load() {
        let dir = TempDir::new().unwrap();
        let site = dir.path().join("site");

        let created = AppState::init(Some(site.clone()), None).unwrap();
        assert!(created.data_dir.is_dir());
        assert!(created.credentials_path.is_file());

        let loaded = AppState::load(Some(site)).unwrap();
        assert_eq!(loaded.config, AppConfig::default());
        assert_eq!(loaded.data_dir, created.data_dir);

        let secret = loaded.load_session_secret().unwrap().unwrap();
        assert!(crate::session::key_from_hex(&secret).is_ok());
    }

    #[test]
    fn test_init_twice_fails() {
        let dir = TempDir::new().unwrap();
        let site = dir.path().join("site");

        AppState::init(Some(site.clone()), None).unwrap();
        assert!(matches!(
            AppState::init(Some(site), None),
            Err(StateError::AlreadyInitialized)
        ));
    }

    #[test]
    fn test_load_uninitialized_fails() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            AppState::load(Some(dir.path().join("missing"))),
            Err(StateError::NotInitialized)
        ));
    }

    #[test]
    fn test_custom_paths_resolve_against_site_dir() {
        let dir = TempDir::new().unwrap();
        let site = dir.path().join("site");
        let config = AppConfig {
            listen_port: 8000,
            data_dir: Some(PathBuf::from("docs")),
            credentials_path: Some(dir.path().join("shared-users.toml")),
        };

        let state = AppState::init(Some(site.clone()), Some(config)).unwrap();
        assert_eq!(state.data_dir, site.join("docs"));
        assert_eq!(state.credentials_path, dir.path().join("shared-users.toml"));
        assert_eq!(AppState::load(Some(site)).unwrap().config.listen_port, 8000);
    }

    #[test]
    fn test_upsert_user() {
        let dir = TempDir::new().unwrap();
        let state = AppState::init(Some(dir.path().join("site")), None).unwrap();

        state.upsert_user("admin", "secret").unwrap();
        let raw = fs::read_to_string(&state.credentials_path).unwrap();
        let users = crate::credentials::parse(&raw).unwrap();
        assert!(crate::credentials::verify_password(&users["admin"], "secret").unwrap());
    }
}
