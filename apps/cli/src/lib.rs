//! Command implementations behind the `sos` binary.

pub mod args;
pub mod contacts;
pub mod dispatch;

use anyhow::Result;
use sos::domain::config::SosConfig;
use sos_logger::{Logger, parse_level};
use tracing::debug;

/// Console logging always; a rolling file too when `logging.directory` is set.
///
/// # Errors
/// Bad level strings and subscriber installation failures.
pub fn init_logger(config: &SosConfig) -> Result<Logger> {
    let builder = Logger::builder()
        .name(env!("CARGO_PKG_NAME"))
        .level(parse_level(&config.logging.level)?)
        .console(true);

    let logger = match &config.logging.directory {
        Some(dir) => builder.path(dir).json(config.logging.json).init()?,
        None => builder.init()?,
    };
    debug!(level = %config.logging.level, file = logger.writes_to_file(), "Logger initialised");
    Ok(logger)
}
