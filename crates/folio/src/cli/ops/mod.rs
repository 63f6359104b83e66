pub mod hash_password;
pub mod init;
pub mod serve;
pub mod user;
pub mod version;

pub use hash_password::HashPassword;
pub use init::Init;
pub use serve::Serve;
pub use user::User;
pub use version::Version;
