//! Error types shared by the library and the command handlers.
//!
//! Internally everything propagates `anyhow::Error` through `Res<T>`. At the command boundary the
//! error is wrapped in the public `Error` type, which adds an `ErrorType` so a caller can tell a
//! bad import file apart from a broken configuration without parsing messages.

use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};

/// The internal result type.
pub(crate) type Res<T> = std::result::Result<T, anyhow::Error>;

/// The public result type returned by command handlers.
pub type Result<T> = std::result::Result<T, Error>;

/// The broad category of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// The home directory or `config.json` is missing or invalid.
    Config,
    /// An imported table does not have the required columns.
    Schema,
    /// The user supplied something we cannot work with, e.g. an unsupported file type.
    Request,
    /// Reading or writing the snapshot files failed.
    Storage,
}

serde_plain::derive_display_from_serialize!(ErrorType);
serde_plain::derive_fromstr_from_deserialize!(ErrorType);

/// The public error type.
pub struct Error {
    error_type: ErrorType,
    source: anyhow::Error,
}

impl Error {
    pub fn new(error_type: ErrorType, source: impl Into<anyhow::Error>) -> Self {
        Self {
            error_type,
            source: source.into(),
        }
    }

    pub fn error_type(&self) -> ErrorType {
        self.error_type
    }

    /// Access the underlying error, e.g. to `downcast_ref` a `SchemaError`.
    pub fn source_error(&self) -> &anyhow::Error {
        &self.source
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} error: {:?}", self.error_type, self.source)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#}", self.source)
    }
}

impl std::error::Error for Error {}

/// Converts an internal result into the public `Result`, tagging the error with `error_type`.
pub(crate) trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T, E> IntoResult<T> for std::result::Result<T, E>
where
    E: Into<anyhow::Error>,
{
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| Error::new(error_type, e))
    }
}

/// Raised when an imported table lacks one or more of the required columns, or has one of them
/// more than once so that it is unclear which to read.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SchemaError {
    missing: Vec<String>,
    duplicated: Vec<String>,
}

impl SchemaError {
    pub(crate) fn new(missing: Vec<String>) -> Self {
        Self {
            missing,
            duplicated: Vec::new(),
        }
    }

    pub(crate) fn with_duplicated(missing: Vec<String>, duplicated: Vec<String>) -> Self {
        Self {
            missing,
            duplicated,
        }
    }

    /// The names of the required columns that were not found, in schema order.
    pub fn missing(&self) -> &[String] {
        &self.missing
    }

    /// The names of the required columns that appear more than once, in schema order.
    pub fn duplicated(&self) -> &[String] {
        &self.duplicated
    }
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.missing.len() {
            0 => {}
            1 => write!(f, "Missing required column: {}", self.missing[0])?,
            _ => write!(f, "Missing required columns: {}", self.missing.join(", "))?,
        }
        if self.duplicated.is_empty() {
            return Ok(());
        }
        if !self.missing.is_empty() {
            write!(f, "; ")?;
        }
        write!(
            f,
            "Required column appears more than once: {}",
            self.duplicated.join(", ")
        )
    }
}

impl std::error::Error for SchemaError {}
