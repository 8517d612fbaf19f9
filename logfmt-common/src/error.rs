use thiserror::Error;

/// Common error type for the telemetry record model.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid identifier: expected {expected} hex characters, got {actual}")]
    InvalidIdentifier { expected: usize, actual: usize },

    #[error("Hex decoding error: {0}")]
    Hex(#[from] hex::FromHexError),
}

/// Result type alias using the common Error.
pub type Result<T> = std::result::Result<T, Error>;
