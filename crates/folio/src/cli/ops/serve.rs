use std::net::SocketAddr;

use clap::Args;

use folio::state::{AppState, StateError};
use folio::{spawn_service, ServiceConfig};

#[derive(Args, Debug, Clone)]
pub struct Serve {
    /// Override the listen port (default from config)
    #[arg(long)]
    pub port: Option<u16>,

    /// Hex-encoded cookie signing secret (defaults to the site's session.key)
    #[arg(long, env = "FOLIO_SESSION_SECRET", hide_env_values = true)]
    pub session_secret: Option<String>,

    /// Directory for log files (logs to stdout only if not set)
    #[arg(long)]
    pub log_dir: Option<std::path::PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("state error: {0}")]
    State(#[from] StateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Serve {
    type Error = ServeError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let state = AppState::load(ctx.site_dir.clone())?;

        let session_secret = match &self.session_secret {
            Some(secret) => Some(secret.clone()),
            None => state.load_session_secret()?,
        };

        let port = self.port.unwrap_or(state.config.listen_port);

        let config = ServiceConfig {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], port)),
            data_dir: state.data_dir,
            credentials_path: state.credentials_path,
            session_secret,
            log_level: tracing::Level::INFO,
            log_dir: self.log_dir.clone(),
        };

        spawn_service(&config).await;
        Ok("server stopped".to_string())
    }
}
