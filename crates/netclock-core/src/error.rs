//! Error types for netclock

use thiserror::Error;

/// Why an authoritative time source could not produce a reading
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Unavailable {
    /// Connection, DNS or transfer failure
    #[error("network failure: {0}")]
    Network(String),

    /// The source answered with a non-success HTTP status
    #[error("unexpected HTTP status {0}")]
    Status(u16),

    /// The body could not be decoded into a timestamp
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Core netclock errors
#[derive(Error, Debug)]
pub enum NetclockError {
    // Time errors
    #[error("Time source unavailable: {0}")]
    TimeSourceUnavailable(#[from] Unavailable),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Host errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for netclock operations
pub type NetclockResult<T> = Result<T, NetclockError>;
