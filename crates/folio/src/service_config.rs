use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    // http server configuration
    /// Address the document server listens on.
    pub listen_addr: SocketAddr,

    // storage configuration
    /// Directory holding the documents.
    pub data_dir: PathBuf,
    /// TOML file mapping usernames to password hashes.
    pub credentials_path: PathBuf,

    // session configuration
    /// Hex-encoded cookie signing secret,
    ///  if not set then an ephemeral key is generated at startup
    pub session_secret: Option<String>,

    // logging
    pub log_level: tracing::Level,
    /// Directory for log files (optional, logs to stdout only if not set)
    pub log_dir: Option<PathBuf>,
}
