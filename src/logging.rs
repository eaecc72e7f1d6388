use crate::{throws, Config, Error};
use anyhow::anyhow;
use std::io;
use tracing::Level;

/// Level shown on stderr: everything under `--verbose`, errors otherwise.
pub fn max_level(config: &Config) -> Level {
    if config.verbose {
        Level::DEBUG
    } else {
        Level::ERROR
    }
}

/// Installs the global subscriber. Fails if one is already installed.
#[throws]
pub fn init(config: &Config) {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(max_level(config))
        .with_ansi(termion::is_tty(&io::stderr()))
        .with_target(false)
        .without_time()
        .try_init()
        .map_err(|err| anyhow!(err))?;
}
