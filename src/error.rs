//! Error types
//!
//! Only startup and transport failures are errors. A missing asset is an
//! ordinary 404 response, not an `Error`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid listen address: {0}")]
    Address(String),

    /// The embedded asset bundle is unusable; serving is impossible.
    #[error("asset bundle integrity failure: {0}")]
    Bundle(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
