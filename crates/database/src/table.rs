//! Table handle: schema access, mutation, lookup and export.

use std::cell::RefCell;
use std::rc::Rc;

use tabula_codec::ColumnExport;
use tabula_core::schema::{Column, Field, RowSpec};
use tabula_core::{DataType, Error, Result, Value};
use tabula_storage::TableStore;
use tracing::trace;

use crate::database::{Registry, TableShared};
use crate::events::{TableEvents, TableHooks};
use crate::row::Row;

/// A cheap cloneable handle onto one registered table.
///
/// All handles onto the same table share storage, events and hooks. The
/// handle stays usable after the table is dropped from its database; it
/// simply keeps the last owner alive.
#[derive(Clone)]
pub struct Table {
    shared: Rc<TableShared>,
    registry: Rc<RefCell<Registry>>,
}

impl Table {
    pub(crate) fn new(shared: Rc<TableShared>, registry: Rc<RefCell<Registry>>) -> Self {
        Self { shared, registry }
    }

    /// Returns the table name.
    pub fn name(&self) -> String {
        self.shared.store.borrow().name().to_string()
    }

    /// Returns the ordered column definitions.
    pub fn columns(&self) -> Vec<Column> {
        self.shared.store.borrow().columns().to_vec()
    }

    /// Returns one column definition by name.
    pub fn column(&self, name: &str) -> Option<Column> {
        let store = self.shared.store.borrow();
        let index = store.column_index(name)?;
        Some(store.columns()[index].clone())
    }

    /// Returns the primary-key column name, if one is declared.
    pub fn primary_key(&self) -> Option<String> {
        let store = self.shared.store.borrow();
        let pk = store.primary_key()?;
        Some(store.columns()[pk].name().to_string())
    }

    /// Returns the referenced table for a foreign-key column.
    pub fn foreign_key(&self, column: &str) -> Option<String> {
        self.shared
            .store
            .borrow()
            .foreign_key(column)
            .map(str::to_string)
    }

    /// Returns true if `column` is the primary key.
    pub fn is_primary_key(&self, column: &str) -> bool {
        self.primary_key().as_deref() == Some(column)
    }

    /// Returns true if `column` is a foreign key.
    pub fn is_foreign_key(&self, column: &str) -> bool {
        self.shared.store.borrow().foreign_key(column).is_some()
    }

    /// Returns the number of live rows.
    pub fn len(&self) -> usize {
        self.shared.store.borrow().len()
    }

    /// Returns true if the table holds no live rows.
    pub fn is_empty(&self) -> bool {
        self.shared.store.borrow().is_empty()
    }

    /// Inserts a row declaration and returns the bound result.
    ///
    /// Named declarations are normalized to column order (unknown names
    /// rejected); missing columns become null and take their generated
    /// values in the engine. Deferred references are resolved against
    /// sibling tables before storage. The insert interceptor's pre-chain
    /// may rewrite or veto the declaration, the post-chain the bound row.
    pub fn insert(&self, row: impl Into<RowSpec>) -> Result<Row> {
        let spec = self
            .shared
            .hooks
            .insert
            .pre
            .run(row.into())
            .ok_or_else(|| Error::hook_rejected("insert"))?;

        let values = {
            let registry = self.registry.borrow();
            let store = self.shared.store.borrow();
            let fields = normalize_row(&store, spec)?;
            resolve_fields(&registry, fields)?
        };

        let (position, values) = self.shared.store.borrow_mut().add_row(values)?;
        trace!(table = %self.name(), position, "insert");

        let row = Row::bound(self.clone(), position, values);
        self.shared.events.create.emit(&row);
        self.shared
            .hooks
            .insert
            .post
            .run(row)
            .ok_or_else(|| Error::hook_rejected("insert"))
    }

    /// Deletes the row at a position.
    ///
    /// Returns false when the position is already dead. On success the
    /// deletion observer receives a detached row carrying the removed
    /// values.
    pub fn delete(&self, position: usize) -> bool {
        let removed = self.shared.store.borrow_mut().delete_row(position);
        match removed {
            Some(values) => {
                trace!(table = %self.name(), position, "delete");
                let row = Row::detached(self.clone(), values);
                self.shared.events.delete.emit(&row);
                true
            }
            None => false,
        }
    }

    /// Saves values at a position; a dead or absent position inserts.
    ///
    /// Fires the creation observer when the save fell through to insert,
    /// then the save observer on either path. Returns the bound row with
    /// canonical stored values.
    pub fn save(&self, position: Option<usize>, values: Vec<Value>) -> Result<Row> {
        let outcome = self
            .shared
            .store
            .borrow_mut()
            .save_row(position.unwrap_or(usize::MAX), values)?;
        trace!(table = %self.name(), position = outcome.position, inserted = outcome.inserted, "save");

        let row = Row::bound(self.clone(), outcome.position, outcome.values);
        if outcome.inserted {
            self.shared.events.create.emit(&row);
        }
        self.shared.events.save.emit(&row);
        Ok(row)
    }

    /// O(1) primary-key lookup.
    pub fn find(&self, key: impl Into<Value>) -> Option<Row> {
        let key = key.into();
        let store = self.shared.store.borrow();
        let position = store.find_pk(&key)?;
        let values = store.row(position)?.clone();
        drop(store);
        Some(Row::bound(self.clone(), position, values))
    }

    /// Scans live rows where `column` equals `value`, ascending positions.
    ///
    /// A `limit` of zero collects every match. Unknown column names yield
    /// no matches.
    pub fn find_by(&self, column: &str, value: impl Into<Value>, limit: usize) -> Vec<Row> {
        let value = value.into();
        let store = self.shared.store.borrow();
        let Some(index) = store.column_index(column) else {
            return Vec::new();
        };
        let matches: Vec<(usize, Vec<Value>)> = store
            .find_by(index, &value, limit)
            .into_iter()
            .filter_map(|p| store.row(p).map(|v| (p, v.clone())))
            .collect();
        drop(store);
        matches
            .into_iter()
            .map(|(p, v)| Row::bound(self.clone(), p, v))
            .collect()
    }

    /// Returns the first live row where `column` equals `value`.
    pub fn find_one(&self, column: &str, value: impl Into<Value>) -> Option<Row> {
        self.find_by(column, value, 1).into_iter().next()
    }

    /// Returns every live row in ascending position order.
    pub fn rows(&self) -> Vec<Row> {
        let store = self.shared.store.borrow();
        let all: Vec<(usize, Vec<Value>)> = store
            .live_rows()
            .map(|(p, v)| (p, v.clone()))
            .collect();
        drop(store);
        all.into_iter()
            .map(|(p, v)| Row::bound(self.clone(), p, v))
            .collect()
    }

    /// Returns a detached row template: generated defaults for plain
    /// columns, null for auto columns so the engine assigns them on save.
    pub fn new_row(&self) -> Row {
        let store = self.shared.store.borrow();
        let values = store
            .columns()
            .iter()
            .map(|c| match c.data_type() {
                DataType::Auto => Value::Null,
                _ => c.default_value(),
            })
            .collect();
        drop(store);
        Row::detached(self.clone(), values)
    }

    /// Renders the table as one canonical text block.
    pub fn export(&self, force: bool) -> String {
        export_store(&self.shared.store.borrow(), force)
    }

    /// Returns the table's mutation observers.
    pub fn events(&self) -> &TableEvents {
        &self.shared.events
    }

    /// Returns the table's operation interceptors.
    pub fn hooks(&self) -> &TableHooks {
        &self.shared.hooks
    }
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let store = self.shared.store.borrow();
        f.debug_struct("Table")
            .field("name", &store.name())
            .field("rows", &store.len())
            .finish()
    }
}

/// Normalizes a row declaration to full column order.
///
/// Tuple rows may be short (missing trailing columns become null) but
/// never long; named rows reject unknown column names.
pub(crate) fn normalize_row(store: &TableStore, spec: RowSpec) -> Result<Vec<Field>> {
    let width = store.columns().len();
    match spec {
        RowSpec::Tuple(mut fields) => {
            if fields.len() > width {
                return Err(Error::length_mismatch(store.name(), width, fields.len()));
            }
            fields.resize_with(width, Field::null);
            Ok(fields)
        }
        RowSpec::Named(named) => {
            let mut fields: Vec<Field> = (0..width).map(|_| Field::null()).collect();
            for (name, field) in named {
                let index = store
                    .column_index(&name)
                    .ok_or_else(|| Error::column_not_found(store.name(), &name))?;
                fields[index] = field;
            }
            Ok(fields)
        }
    }
}

/// Resolves deferred references to concrete primary-key values.
///
/// A reference matches the first live row of the target table whose
/// column equals the probe value, and resolves to that row's primary-key
/// value.
pub(crate) fn resolve_fields(registry: &Registry, fields: Vec<Field>) -> Result<Vec<Value>> {
    fields
        .into_iter()
        .map(|field| match field {
            Field::Value(value) => Ok(value),
            Field::Ref(r) => {
                let unresolved = || Error::unresolved_reference(&r.table, &r.column, r.value.clone());
                let shared = registry
                    .get(&r.table)
                    .ok_or_else(|| Error::table_not_found(&r.table))?;
                let store = shared.store.borrow();
                let column = store.column_index(&r.column).ok_or_else(unresolved)?;
                let pk = store.primary_key().ok_or_else(unresolved)?;
                let position = store
                    .find_by(column, &r.value, 1)
                    .into_iter()
                    .next()
                    .ok_or_else(unresolved)?;
                let row = store.row(position).ok_or_else(unresolved)?;
                Ok(row[pk].clone())
            }
        })
        .collect()
}

/// Renders a store as a canonical table block.
pub(crate) fn export_store(store: &TableStore, force: bool) -> String {
    let columns: Vec<ColumnExport<'_>> = store
        .columns()
        .iter()
        .enumerate()
        .map(|(i, column)| ColumnExport {
            name: column.name(),
            primary_key: store.primary_key() == Some(i),
            foreign_key: store.foreign_key(column.name()),
            data_type: column.data_type(),
            generator: column.custom_generator(),
        })
        .collect();
    tabula_codec::write_table(&columns, store.live_rows().map(|(_, v)| v), force)
}
