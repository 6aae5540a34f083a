use thiserror::Error;

/// Result type used across the timespan crate.
pub type Result<T> = std::result::Result<T, TimeSpanError>;

/// Canonical error representation for every fallible operation.
#[derive(Debug, Error)]
pub enum TimeSpanError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("TimeSpanTooLong: millisecond total out of range")]
    TimeSpanTooLong,

    #[error("malformed time span: {0}")]
    MalformedInput(String),

    #[error("serialization error: {0}")]
    SerializationError(String),

    #[error("deserialization error: {0}")]
    DeserializationError(String),

    #[error("logging setup failed: {0}")]
    LoggingSetup(String),
}
