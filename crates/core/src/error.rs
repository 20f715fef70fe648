//! Error types for Tabula.

use crate::value::Value;
use thiserror::Error;

/// Result type alias for Tabula operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors produced by the engine, the schema layer, and the text codec.
///
/// Expected outcomes (a lookup with no match, deleting an already detached
/// row) are signaled with `Option`/`bool` sentinels, never with an error.
#[derive(Debug, Error)]
pub enum Error {
    /// A table or column name violates the naming rules.
    #[error("invalid name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    /// Malformed table declaration, fatal to the create call.
    #[error("invalid schema for table {table}: {message}")]
    InvalidSchema { table: String, message: String },

    /// Table not found in the registry.
    #[error("table not found: {name}")]
    TableNotFound { name: String },

    /// A table with this name is already registered.
    #[error("table already exists: {name}")]
    TableExists { name: String },

    /// Column not found in the table.
    #[error("column {column} not found in table {table}")]
    ColumnNotFound { table: String, column: String },

    /// A primary-key value collided with a live row.
    #[error("duplicate primary key value in table {table}: {value:?}")]
    DuplicateKey { table: String, value: Value },

    /// A deferred reference matched no live row, fatal to that insert.
    #[error("unresolved reference into {table}.{column} = {value:?}")]
    UnresolvedReference {
        table: String,
        column: String,
        value: Value,
    },

    /// A row literal does not match the table width.
    #[error("row width mismatch for table {table}: expected {expected}, got {got}")]
    LengthMismatch {
        table: String,
        expected: usize,
        got: usize,
    },

    /// An operation needed a primary key the table does not declare.
    #[error("table {table} has no primary key")]
    MissingPrimaryKey { table: String },

    /// An interceptor aborted the operation.
    #[error("{operation} rejected by interceptor")]
    HookRejected { operation: String },

    /// Text codec syntax error.
    #[error("syntax error at byte {position}: {message}")]
    Syntax { message: String, position: usize },
}

impl Error {
    /// Creates an invalid name error.
    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid schema error.
    pub fn invalid_schema(table: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidSchema {
            table: table.into(),
            message: message.into(),
        }
    }

    /// Creates a table not found error.
    pub fn table_not_found(name: impl Into<String>) -> Self {
        Error::TableNotFound { name: name.into() }
    }

    /// Creates a table already exists error.
    pub fn table_exists(name: impl Into<String>) -> Self {
        Error::TableExists { name: name.into() }
    }

    /// Creates a column not found error.
    pub fn column_not_found(table: impl Into<String>, column: impl Into<String>) -> Self {
        Error::ColumnNotFound {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Creates a duplicate key error.
    pub fn duplicate_key(table: impl Into<String>, value: Value) -> Self {
        Error::DuplicateKey {
            table: table.into(),
            value,
        }
    }

    /// Creates an unresolved reference error.
    pub fn unresolved_reference(
        table: impl Into<String>,
        column: impl Into<String>,
        value: Value,
    ) -> Self {
        Error::UnresolvedReference {
            table: table.into(),
            column: column.into(),
            value,
        }
    }

    /// Creates a length mismatch error.
    pub fn length_mismatch(table: impl Into<String>, expected: usize, got: usize) -> Self {
        Error::LengthMismatch {
            table: table.into(),
            expected,
            got,
        }
    }

    /// Creates a missing primary key error.
    pub fn missing_primary_key(table: impl Into<String>) -> Self {
        Error::MissingPrimaryKey {
            table: table.into(),
        }
    }

    /// Creates a hook rejection error.
    pub fn hook_rejected(operation: impl Into<String>) -> Self {
        Error::HookRejected {
            operation: operation.into(),
        }
    }

    /// Creates a syntax error.
    pub fn syntax(message: impl Into<String>, position: usize) -> Self {
        Error::Syntax {
            message: message.into(),
            position,
        }
    }
}
