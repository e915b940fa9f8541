pub mod config;
pub mod nginx;
pub mod logging;
pub mod cli;

pub use config::Settings;
pub use nginx::{ConfigError, Layout};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
