//! Storage layer for the tabula in-memory database.
//!
//! This crate provides the `TableStore` struct which manages rows for a
//! single table, including primary-key index and auto-increment counter
//! maintenance. Deleted positions are tombstoned permanently, so row
//! positions are stable for the lifetime of the store.

mod table_store;

pub use table_store::{SaveOutcome, TableStore};
