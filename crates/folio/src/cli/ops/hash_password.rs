use clap::Args;

use folio::credentials::{hash_password, CredentialError};

/// Print an argon2 hash suitable for the credentials file.
#[derive(Args, Debug, Clone)]
pub struct HashPassword {
    pub password: String,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for HashPassword {
    type Error = CredentialError;
    type Output = String;

    async fn execute(&self, _ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        hash_password(&self.password)
    }
}
