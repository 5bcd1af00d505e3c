//! Crate-scoped error handling for redb-cells.
//!
//! This module provides a unified error type for public APIs while keeping
//! precise, layer-specific error enums for the cell model, the flat-key
//! encoding and the redb table adapter.

use thiserror::Error as ThisError;

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type exposed to users of the crate.
#[derive(Debug, ThisError)]
pub enum Error {
    /// Errors from the cell model (capabilities, field widths)
    #[error("Cell error: {0}")]
    Cell(#[from] CellError),

    /// Errors from flat-key encoding and decoding
    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),

    /// Errors from the redb table adapter
    #[error("Table error: {0}")]
    Table(#[from] TableError),

    /// Errors raised by redb itself
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid input parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Errors specific to the cell model.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum CellError {
    /// The cell does not implement the capability an operation needs.
    #[error("Cell does not support {0}")]
    UnsupportedCapability(&'static str),

    /// A field is longer than its declared width allows.
    #[error("{field} length {len} exceeds maximum {max}")]
    FieldTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    /// A field is too short to be read as the requested primitive.
    #[error("{field} length {len} is shorter than the {needed} bytes required")]
    FieldTooShort {
        field: &'static str,
        len: usize,
        needed: usize,
    },
}

/// Errors specific to the flat-key and record encodings.
#[derive(Debug, ThisError)]
pub enum EncodingError {
    /// The byte layout does not describe a valid flat key.
    #[error("Invalid flat key: {0}")]
    InvalidFlatKey(String),

    /// The byte layout does not describe a valid record.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// The output sink rejected a write.
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors specific to the redb table adapter.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum TableError {
    /// Invalid table name configuration
    #[error("Invalid table name {0:?}: must not be empty")]
    InvalidTableName(String),

    /// Scanning a cell range failed
    #[error("Cell scan failed: {0}")]
    ScanFailed(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Encoding(EncodingError::Io(err))
    }
}

impl From<redb::StorageError> for Error {
    fn from(err: redb::StorageError) -> Self {
        Error::Storage(err.to_string())
    }
}

impl From<redb::TableError> for Error {
    fn from(err: redb::TableError) -> Self {
        Error::Storage(format!("table: {}", err))
    }
}

impl From<redb::TransactionError> for Error {
    fn from(err: redb::TransactionError) -> Self {
        Error::Storage(format!("transaction: {}", err))
    }
}

impl From<redb::CommitError> for Error {
    fn from(err: redb::CommitError) -> Self {
        Error::Storage(format!("commit: {}", err))
    }
}

impl From<redb::DatabaseError> for Error {
    fn from(err: redb::DatabaseError) -> Self {
        Error::Storage(format!("database: {}", err))
    }
}
