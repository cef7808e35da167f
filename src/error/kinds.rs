use std::{fmt, io};

/// Crate-wide `Result` type using [`MongocsvError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is intended
/// to be used throughout the crate for fallible operations.
pub type Result<T> = std::result::Result<T, MongocsvError>;

/// Top-level error type for mongocsv operations.
///
/// This type wraps more specific error kinds and provides a single
/// error type that can be used throughout the crate.
#[derive(Debug)]
pub enum MongocsvError {
    /// Configuration and parameter validation errors.
    Config(ConfigError),

    /// Connection-related errors.
    Connection(ConnectionError),

    /// Errors raised during the paginated export loop.
    Export(ExportError),

    /// I/O errors.
    Io(io::Error),

    /// MongoDB driver errors.
    MongoDb(mongodb::error::Error),
}

/// Configuration-specific errors.
///
/// Raised while loading or validating configuration, before any
/// database or file I/O has happened.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file not found.
    FileNotFound(String),

    /// Invalid config format.
    InvalidFormat(String),

    /// Missing required field.
    MissingField(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },
}

/// Connection-specific errors.
#[derive(Debug)]
pub enum ConnectionError {
    /// Invalid connection URI.
    InvalidUri(String),

    /// Failed to establish a connection.
    ConnectionFailed(String),

    /// Ping command failed.
    PingFailed(String),
}

/// Errors from the paginated read/write loop.
///
/// These abort the export; rows already flushed to disk are left intact.
#[derive(Debug)]
pub enum ExportError {
    /// Export parameters failed validation.
    InvalidParameters(String),

    /// A document came back from the server without an `_id`.
    MissingDocumentId,

    /// Output path is unusable (missing parent directory, bad filename).
    OutputPath(String),

    /// Failed to write to the output file.
    WriteFailed(String),
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for MongocsvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MongocsvError::Config(e) => write!(f, "Configuration error: {e}"),
            MongocsvError::Connection(e) => write!(f, "Connection error: {e}"),
            MongocsvError::Export(e) => write!(f, "Export error: {e}"),
            MongocsvError::Io(e) => write!(f, "I/O error: {e}"),
            MongocsvError::MongoDb(e) => write!(f, "MongoDB error: {e}"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {path}"),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::MissingField(field) => write!(f, "Missing required field: {field}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
        }
    }
}

impl fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionError::InvalidUri(uri) => write!(f, "Invalid connection URI: {uri}"),
            ConnectionError::ConnectionFailed(msg) => write!(f, "Failed to connect: {msg}"),
            ConnectionError::PingFailed(msg) => write!(f, "Ping failed: {msg}"),
        }
    }
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::InvalidParameters(msg) => write!(f, "Invalid parameters: {msg}"),
            ExportError::MissingDocumentId => {
                write!(f, "Document returned without an _id field")
            }
            ExportError::OutputPath(msg) => write!(f, "Unusable output path: {msg}"),
            ExportError::WriteFailed(msg) => write!(f, "Failed to write output: {msg}"),
        }
    }
}

impl std::error::Error for MongocsvError {}
impl std::error::Error for ConfigError {}
impl std::error::Error for ConnectionError {}
impl std::error::Error for ExportError {}

/* ========================= Conversions to MongocsvError ========================= */

impl From<io::Error> for MongocsvError {
    fn from(err: io::Error) -> Self {
        MongocsvError::Io(err)
    }
}

impl From<mongodb::error::Error> for MongocsvError {
    fn from(err: mongodb::error::Error) -> Self {
        MongocsvError::MongoDb(err)
    }
}

impl From<ConfigError> for MongocsvError {
    fn from(err: ConfigError) -> Self {
        MongocsvError::Config(err)
    }
}

impl From<ConnectionError> for MongocsvError {
    fn from(err: ConnectionError) -> Self {
        MongocsvError::Connection(err)
    }
}

impl From<ExportError> for MongocsvError {
    fn from(err: ExportError) -> Self {
        MongocsvError::Export(err)
    }
}
