//! Row handle: a detached, mutable projection of one table row.

use tabula_core::{Result, Value};

use crate::table::Table;

/// A row handle bound to a table.
///
/// A row is either bound to a live storage position or detached
/// (`position() == None`). Field edits stay local until `save` pushes
/// them through the table; `save` from either state ends bound, with the
/// canonical stored values (generated defaults and assigned auto keys
/// become visible after the refresh).
#[derive(Clone)]
pub struct Row {
    table: Table,
    position: Option<usize>,
    values: Vec<Value>,
}

impl Row {
    pub(crate) fn bound(table: Table, position: usize, values: Vec<Value>) -> Self {
        Self {
            table,
            position: Some(position),
            values,
        }
    }

    pub(crate) fn detached(table: Table, values: Vec<Value>) -> Self {
        Self {
            table,
            position: None,
            values,
        }
    }

    /// Returns the storage position, or `None` when detached.
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// Returns true when the row is not bound to a live slot.
    pub fn is_detached(&self) -> bool {
        self.position.is_none()
    }

    /// Returns the owning table handle.
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Returns a field value by column name.
    pub fn get(&self, column: &str) -> Option<&Value> {
        let index = self.table.columns().iter().position(|c| c.name() == column)?;
        self.values.get(index)
    }

    /// Sets a field value by column name. Returns false for unknown
    /// columns; the change is local until `save`.
    pub fn set(&mut self, column: &str, value: impl Into<Value>) -> bool {
        let Some(index) = self
            .table
            .columns()
            .iter()
            .position(|c| c.name() == column)
        else {
            return false;
        };
        self.values[index] = value.into();
        true
    }

    /// Returns the field values in column declaration order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Clones the field values in column declaration order.
    pub fn to_array(&self) -> Vec<Value> {
        self.values.clone()
    }

    /// Projects the fields as (column name, value) pairs.
    pub fn to_object(&self) -> Vec<(String, Value)> {
        self.table
            .columns()
            .iter()
            .zip(self.values.iter())
            .map(|(c, v)| (c.name().to_string(), v.clone()))
            .collect()
    }

    /// Submits the current values to the table and refreshes from the
    /// canonical result, binding the row if it was detached.
    pub fn save(&mut self) -> Result<()> {
        let saved = self.table.save(self.position, self.values.clone())?;
        self.position = saved.position;
        self.values = saved.values;
        Ok(())
    }

    /// Deletes the underlying slot and detaches.
    ///
    /// Returns false when already detached, or when the slot was deleted
    /// through another handle; the row detaches either way since the slot
    /// is dead.
    pub fn delete(&mut self) -> bool {
        let Some(position) = self.position else {
            return false;
        };
        let deleted = self.table.delete(position);
        self.position = None;
        deleted
    }
}

impl std::fmt::Debug for Row {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Row")
            .field("position", &self.position)
            .field("values", &self.values)
            .finish()
    }
}
