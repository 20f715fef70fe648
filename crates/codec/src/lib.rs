//! Canonical text format for tabula.
//!
//! The format is the engine's only wire shape: single-quoted strings,
//! bare numbers and booleans, `Date('…')` constructor calls, `/…/`
//! regexps, `[…]` arrays and `{'k':v}` mappings. Table blocks carry a
//! `'columns'` schema list followed by a `'rows'` list; database blocks
//! map table names to table blocks in registration order.
//!
//! [`writer`] emits the format, [`parser`] reads it back. Import accepts
//! exactly what export produced, plus declaration conveniences: named row
//! objects and `Ref('table','column',value)` deferred references.

mod parser;
mod writer;

pub use parser::{parse_database_spec, parse_table_spec, parse_value};
pub use writer::{format_number, write_column, write_database, write_table, write_value, ColumnExport};
