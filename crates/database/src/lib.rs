//! Tabula - a miniature in-memory relational database.
//!
//! Tables carry an ordered column schema with per-type default generators,
//! an optional auto-increment primary key and foreign-key columns whose
//! types are inherited from the referenced table. Row storage is
//! append-only with permanent tombstones, so a row's position is stable
//! for the lifetime of its table. Everything round-trips through one
//! canonical text format.
//!
//! ```
//! use tabula_core::schema::{ColumnSpec, Ref, TableSpec};
//! use tabula_core::{DataType, Value};
//! use tabula_database::Database;
//!
//! let db = Database::new("fruit_stand");
//! db.create(
//!     "fruits",
//!     TableSpec::new([
//!         ColumnSpec::typed("id", DataType::Auto).primary_key(),
//!         ColumnSpec::typed("name", DataType::String),
//!     ])
//!     .row(vec![Value::Null, Value::from("apple")])
//!     .row(vec![Value::Null, Value::from("pear")]),
//! )
//! .unwrap();
//!
//! let fruits = db.table("fruits").unwrap();
//! let pear = fruits.find_one("name", "pear").unwrap();
//! assert_eq!(pear.get("id"), Some(&Value::Number(2.0)));
//!
//! let restored = Database::import("copy", &db.export(false)).unwrap();
//! assert_eq!(restored.table("fruits").unwrap().len(), 2);
//! ```

mod database;
mod events;
mod row;
mod table;

pub use database::Database;
pub use events::{DatabaseEvents, TableEvents, TableHooks};
pub use row::Row;
pub use table::Table;

pub use tabula_core::schema;
pub use tabula_core::{DataType, Error, RegexpValue, Result, Value};
