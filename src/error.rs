//! Unified error type for adapters and the façade.

/// Things that can go wrong when reading or writing through an adapter.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A façade was built without an adapter.
    MissingAdapter,
    /// Storage medium problem (read, write, fsync, rename, blocking pool).
    Io(String),
    /// Backing content exists but could not be decoded.
    Corrupt(String),
    /// Failed to encode the value.
    Serialize(String),
    /// Bad configuration (e.g. a file path without a file name).
    Config(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::MissingAdapter => write!(f, "missing adapter"),
            Error::Io(msg) => write!(f, "i/o error: {msg}"),
            Error::Corrupt(msg) => write!(f, "corrupt data: {msg}"),
            Error::Serialize(msg) => write!(f, "serialization error: {msg}"),
            Error::Config(msg) => write!(f, "config error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Error::Io(err.to_string())
        } else if err.is_syntax() || err.is_eof() || err.is_data() {
            Error::Corrupt(err.to_string())
        } else {
            Error::Serialize(err.to_string())
        }
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::Io(format!("blocking write task failed: {err}"))
    }
}

/// Result alias using our [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;
