//! Tabula Core - Core types and schema definitions for the Tabula
//! in-memory database.
//!
//! This crate provides the foundational types:
//!
//! - `DataType`: the fixed column type enumeration (auto, string, number,
//!   boolean, date, array, object, regexp, function)
//! - `Value`: runtime values that can be stored in a table cell
//! - `schema`: resolved columns plus the declaration types
//!   (`TableSpec`, `ColumnSpec`, `RowSpec`, `Field`, `Ref`)
//! - `Error`/`Result`: the shared error taxonomy
//!
//! # Example
//!
//! ```rust
//! use tabula_core::{DataType, Value};
//! use tabula_core::schema::{Column, ColumnSpec, TableSpec};
//!
//! let spec = TableSpec::new([
//!     ColumnSpec::typed("id", DataType::Auto).primary_key(),
//!     ColumnSpec::typed("name", DataType::String),
//! ]);
//! assert_eq!(spec.columns.len(), 2);
//!
//! let col = Column::new("name", DataType::String).unwrap();
//! assert_eq!(col.default_value(), Value::String(String::new()));
//! ```

mod error;
pub mod schema;
mod types;
mod value;

pub use error::{Error, Result};
pub use types::DataType;
pub use value::{RegexpValue, Value};
