pub mod aggregate;
pub mod cli;
pub mod config;
pub mod editor;
pub mod error;
pub mod logging;
pub mod session;
pub mod temp;

pub use config::Config;
pub use error::SessionError;
pub use session::run;

// Error handling
pub use fehler::throws;
pub type Error = anyhow::Error;
