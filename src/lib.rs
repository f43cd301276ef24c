pub mod config;
pub mod directory;
pub mod logger;
pub mod server;

pub use config::*;
pub use directory::*;
pub use logger::*;
pub use server::RelayApplicationServer;
