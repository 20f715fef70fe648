//! Database - the named table registry and main entry point.

use std::cell::RefCell;
use std::rc::Rc;

use hashbrown::HashMap;
use tabula_core::schema::{check_name, Column, ColumnKind, TableSpec};
use tabula_core::{DataType, Error, Result};
use tabula_storage::TableStore;
use tracing::debug;

use crate::events::{DatabaseEvents, TableEvents, TableHooks};
use crate::table::Table;

/// Per-table state shared by every handle onto the same table.
pub(crate) struct TableShared {
    pub(crate) store: RefCell<TableStore>,
    pub(crate) events: TableEvents,
    pub(crate) hooks: TableHooks,
}

/// The registry proper: tables by name, plus registration order (order is
/// significant for export).
#[derive(Default)]
pub(crate) struct Registry {
    order: Vec<String>,
    tables: HashMap<String, Rc<TableShared>>,
}

impl Registry {
    pub(crate) fn get(&self, name: &str) -> Option<&Rc<TableShared>> {
        self.tables.get(name)
    }

    fn insert(&mut self, name: String, shared: Rc<TableShared>) {
        self.order.push(name.clone());
        self.tables.insert(name, shared);
    }

    fn remove(&mut self, name: &str) -> bool {
        if self.tables.remove(name).is_some() {
            self.order.retain(|n| n != name);
            true
        } else {
            false
        }
    }
}

/// An in-memory relational database: a named, ordered registry of tables.
///
/// `Database` is a cheap handle; clones share the same registry.
#[derive(Clone)]
pub struct Database {
    name: String,
    registry: Rc<RefCell<Registry>>,
    events: Rc<DatabaseEvents>,
}

impl Database {
    /// Creates an empty database.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            registry: Rc::new(RefCell::new(Registry::default())),
            events: Rc::new(DatabaseEvents::new()),
        }
    }

    /// Returns the database name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Creates and registers a table from a declaration.
    ///
    /// The declaration is validated in full before anything is stored:
    /// reserved or duplicate table names, duplicate columns, multiple
    /// primary keys, dangling foreign keys and mismatched generators all
    /// reject the whole declaration. Declared rows are bulk-inserted (with
    /// deferred references resolved against already-registered tables)
    /// before the table becomes visible, so a failed load registers
    /// nothing.
    pub fn create(&self, name: &str, spec: TableSpec) -> Result<()> {
        check_name(name)?;
        if self.has_table(name) {
            return Err(Error::table_exists(name));
        }

        let store = self.build_store(name, &spec)?;
        let shared = Rc::new(TableShared {
            store: RefCell::new(store),
            events: TableEvents::new(),
            hooks: TableHooks::new(),
        });

        // Bulk load while the table is still unregistered; references can
        // only target sibling tables that already exist.
        {
            let registry = self.registry.borrow();
            let mut store = shared.store.borrow_mut();
            for row in spec.rows {
                let fields = crate::table::normalize_row(&store, row)?;
                let values = crate::table::resolve_fields(&registry, fields)?;
                store.add_row(values)?;
            }
        }

        self.registry
            .borrow_mut()
            .insert(name.to_string(), shared);
        debug!(database = %self.name, table = %name, "table created");
        self.events.create.emit(&name.to_string());
        Ok(())
    }

    /// Removes a table. Removing an absent name is a no-op; the deletion
    /// observer fires either way.
    pub fn delete(&self, name: &str) {
        let removed = self.registry.borrow_mut().remove(name);
        if removed {
            debug!(database = %self.name, table = %name, "table deleted");
        }
        self.events.delete.emit(&name.to_string());
    }

    /// Returns a handle to a registered table.
    pub fn table(&self, name: &str) -> Option<Table> {
        let shared = self.registry.borrow().get(name).cloned()?;
        Some(Table::new(shared, self.registry.clone()))
    }

    /// Returns registered table names in registration order.
    pub fn tables(&self) -> Vec<String> {
        self.registry.borrow().order.clone()
    }

    /// Returns true if a table with this name is registered.
    pub fn has_table(&self, name: &str) -> bool {
        self.registry.borrow().tables.contains_key(name)
    }

    /// Returns the number of registered tables.
    pub fn table_count(&self) -> usize {
        self.registry.borrow().order.len()
    }

    /// Renders every table in registration order as one canonical block.
    pub fn export(&self, force: bool) -> String {
        let registry = self.registry.borrow();
        let blocks: Vec<(String, String)> = registry
            .order
            .iter()
            .filter_map(|name| {
                let shared = registry.get(name)?;
                Some((name.clone(), crate::table::export_store(&shared.store.borrow(), force)))
            })
            .collect();
        tabula_codec::write_database(blocks.iter().map(|(n, b)| (n.as_str(), b.clone())))
    }

    /// Reconstructs a database from a canonical export block.
    ///
    /// The result is schema- and data-equal to the exported database; row
    /// positions may be renumbered since tombstones do not survive the
    /// text form.
    pub fn import(name: impl Into<String>, text: &str) -> Result<Database> {
        let db = Database::new(name);
        for (table_name, spec) in tabula_codec::parse_database_spec(text)? {
            db.create(&table_name, spec)?;
        }
        Ok(db)
    }

    /// Returns the registry-level observers.
    pub fn events(&self) -> &DatabaseEvents {
        &self.events
    }

    /// Resolves a declaration into an engine store, inheriting foreign-key
    /// column types from the target tables' primary keys.
    fn build_store(&self, name: &str, spec: &TableSpec) -> Result<TableStore> {
        if spec.columns.is_empty() {
            return Err(Error::invalid_schema(name, "a table needs at least one column"));
        }

        let mut columns = Vec::with_capacity(spec.columns.len());
        let mut primary_key = None;
        let mut foreign_keys = HashMap::new();
        let registry = self.registry.borrow();

        for (i, column_spec) in spec.columns.iter().enumerate() {
            if spec.columns[..i]
                .iter()
                .any(|c| c.name == column_spec.name)
            {
                return Err(Error::invalid_schema(
                    name,
                    format!("duplicate column '{}'", column_spec.name),
                ));
            }
            if column_spec.primary_key {
                if primary_key.is_some() {
                    return Err(Error::invalid_schema(
                        name,
                        "more than one primary key declared",
                    ));
                }
                primary_key = Some(i);
            }

            let data_type = match &column_spec.kind {
                ColumnKind::Typed(data_type) => *data_type,
                ColumnKind::ForeignKey(target) => {
                    let target_shared = registry.get(target).ok_or_else(|| {
                        Error::invalid_schema(
                            name,
                            format!(
                                "column '{}' references unknown table '{}'",
                                column_spec.name, target
                            ),
                        )
                    })?;
                    let target_store = target_shared.store.borrow();
                    let pk = target_store
                        .primary_key()
                        .ok_or_else(|| Error::missing_primary_key(target))?;
                    foreign_keys.insert(column_spec.name.clone(), target.clone());
                    // A referencing column stores concrete key values, so
                    // the target's auto type is inherited as plain number.
                    match target_store.columns()[pk].data_type() {
                        DataType::Auto => DataType::Number,
                        other => other,
                    }
                }
            };

            let mut column = Column::new(&column_spec.name, data_type)?;
            if let Some(generator) = &column_spec.generator {
                column = column.with_default(generator.clone())?;
            }
            columns.push(column);
        }

        TableStore::new(name.to_string(), columns, primary_key, foreign_keys)
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("name", &self.name)
            .field("tables", &self.tables())
            .finish()
    }
}
