//! Unified infrastructure error type.

use crate::config::ConfigError;

/// The error type returned by ticketd's startup and serving operations.
///
/// Request-level failures (400, 404, 500 for a single request) are expressed
/// as HTTP responses, not as `Error`s. This type surfaces failures that stop
/// the process: bad configuration, or binding the listen socket.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("config: {0}")]
    Config(#[from] ConfigError),
}
