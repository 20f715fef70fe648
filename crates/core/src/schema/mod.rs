//! Schema definitions for Tabula.

mod column;
mod spec;

pub use column::Column;
pub use spec::{ColumnKind, ColumnSpec, Field, Ref, RowSpec, TableSpec};

use crate::error::{Error, Result};

/// Names starting with this sigil are reserved by the engine.
pub const RESERVED_SIGIL: char = '$';

/// Validates a table or column name.
pub fn check_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::invalid_name(name, "name cannot be empty"));
    }
    if name.starts_with(RESERVED_SIGIL) {
        return Err(Error::invalid_name(
            name,
            format!("names may not start with '{}'", RESERVED_SIGIL),
        ));
    }
    Ok(())
}
