//! Event and hook surfaces attached to tables and databases.

use crate::row::Row;
use tabula_core::schema::RowSpec;
use tabula_reactive::{Interceptor, Observer};

/// Observers fired after table mutations complete.
#[derive(Default)]
pub struct TableEvents {
    /// Fired with the bound row after every insert (including a save that
    /// fell through to insert).
    pub create: Observer<Row>,
    /// Fired with a detached row carrying the removed values.
    pub delete: Observer<Row>,
    /// Fired with the bound row after every save.
    pub save: Observer<Row>,
}

impl TableEvents {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Interceptors consulted around table operations.
///
/// Pre-hooks may rewrite or veto the declaration before the engine sees
/// it; post-hooks may rewrite or veto the bound result. The engine's own
/// invariants hold with or without any hooks installed.
#[derive(Default)]
pub struct TableHooks {
    pub insert: Interceptor<RowSpec, Row>,
}

impl TableHooks {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Observers fired after database registry mutations, carrying the table
/// name.
#[derive(Default)]
pub struct DatabaseEvents {
    pub create: Observer<String>,
    pub delete: Observer<String>,
}

impl DatabaseEvents {
    pub fn new() -> Self {
        Self::default()
    }
}
