use clap::Args;

use folio::state::{AppConfig, AppState, StateError};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// Port for the document server
    #[arg(long)]
    pub listen_port: Option<u16>,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    State(#[from] StateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut config = AppConfig::default();
        if let Some(port) = self.listen_port {
            config.listen_port = port;
        }

        let state = AppState::init(ctx.site_dir.clone(), Some(config))?;

        Ok(format!(
            "Initialized site at {}\n  documents:   {}\n  credentials: {}\nAdd a user with `folio user add <USERNAME> <PASSWORD>`",
            state.site_dir.display(),
            state.data_dir.display(),
            state.credentials_path.display(),
        ))
    }
}
