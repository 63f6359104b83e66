pub mod args;
pub mod op;
pub mod ops;

pub use ops::{HashPassword, Init, Serve, User, Version};
