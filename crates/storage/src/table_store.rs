//! Row storage for a single tabula table.
//!
//! `TableStore` owns the append-only row vector, the primary-key index and
//! the per-column auto-increment counters. Deleted positions become
//! permanent tombstones: a position handed out once is never reassigned.

use hashbrown::HashMap;
use tabula_core::schema::Column;
use tabula_core::{DataType, Error, Result, Value};
use tracing::trace;

/// Result of a `save_row` call.
#[derive(Debug, Clone)]
pub struct SaveOutcome {
    /// Position of the saved row (new when the save fell back to insert).
    pub position: usize,
    /// Canonical stored values after generators and auto-increment applied.
    pub values: Vec<Value>,
    /// True when the save created a new row instead of updating in place.
    pub inserted: bool,
}

/// Append-only row storage with primary-key indexing for one table.
pub struct TableStore {
    name: String,
    columns: Vec<Column>,
    primary_key: Option<usize>,
    foreign_keys: HashMap<String, String>,
    rows: Vec<Option<Vec<Value>>>,
    primary_index: HashMap<Value, usize>,
    auto_counters: HashMap<usize, i64>,
}

impl TableStore {
    /// Creates an empty store over an ordered column layout.
    ///
    /// `primary_key` is the index of the key column, if one is declared.
    /// `foreign_keys` maps column names to the referenced table name.
    pub fn new(
        name: String,
        columns: Vec<Column>,
        primary_key: Option<usize>,
        foreign_keys: HashMap<String, String>,
    ) -> Result<Self> {
        if let Some(pk) = primary_key {
            let column = columns
                .get(pk)
                .ok_or_else(|| Error::invalid_schema(&name, "primary key column out of range"))?;
            if !column.data_type().is_key_type() && !foreign_keys.contains_key(column.name()) {
                return Err(Error::invalid_schema(
                    &name,
                    format!("column '{}' cannot be used as a key", column.name()),
                ));
            }
        }

        let auto_counters = columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.data_type() == DataType::Auto)
            .map(|(i, _)| (i, 0))
            .collect();

        Ok(Self {
            name,
            columns,
            primary_key,
            foreign_keys,
            rows: Vec::new(),
            primary_index: HashMap::new(),
            auto_counters,
        })
    }

    /// Returns the table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the ordered column definitions.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns the primary-key column index, if declared.
    pub fn primary_key(&self) -> Option<usize> {
        self.primary_key
    }

    /// Returns the referenced table for a foreign-key column name.
    pub fn foreign_key(&self, column: &str) -> Option<&str> {
        self.foreign_keys.get(column).map(String::as_str)
    }

    /// Returns all foreign-key pairs (column name, referenced table).
    pub fn foreign_keys(&self) -> impl Iterator<Item = (&str, &str)> {
        self.foreign_keys
            .iter()
            .map(|(c, t)| (c.as_str(), t.as_str()))
    }

    /// Resolves a column name to its positional index.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name() == column)
    }

    /// Returns the values at a position, if the slot is live.
    pub fn row(&self, position: usize) -> Option<&Vec<Value>> {
        self.rows.get(position).and_then(Option::as_ref)
    }

    /// Returns the number of live rows.
    pub fn len(&self) -> usize {
        self.rows.iter().filter(|r| r.is_some()).count()
    }

    /// Returns true if no live rows remain.
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(Option::is_none)
    }

    /// Returns the total slot count including tombstones.
    pub fn slot_count(&self) -> usize {
        self.rows.len()
    }

    /// Iterates live rows in ascending position order.
    pub fn live_rows(&self) -> impl Iterator<Item = (usize, &Vec<Value>)> {
        self.rows
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.as_ref().map(|v| (i, v)))
    }

    /// Appends a row, generating values for null inputs.
    ///
    /// The input must supply one value per declared column. Null entries are
    /// replaced by the column's generator output; auto columns draw the next
    /// counter value. A duplicate primary-key value is rejected before any
    /// state changes.
    pub fn add_row(&mut self, values: Vec<Value>) -> Result<(usize, Vec<Value>)> {
        if values.len() != self.columns.len() {
            return Err(Error::length_mismatch(
                &self.name,
                self.columns.len(),
                values.len(),
            ));
        }

        let values = self.generate(values);
        let position = self.rows.len();

        if let Some(pk) = self.primary_key {
            let key = &values[pk];
            if self.primary_index.contains_key(key) {
                return Err(Error::duplicate_key(&self.name, key.clone()));
            }
            self.primary_index.insert(key.clone(), position);
            self.advance_counter_past(pk, key);
        }

        trace!(table = %self.name, position, "row added");
        self.rows.push(Some(values.clone()));
        Ok((position, values))
    }

    /// Tombstones a position and returns the removed values.
    ///
    /// Deleting a dead or out-of-range position is a no-op returning `None`.
    /// The vacated position is never reused.
    pub fn delete_row(&mut self, position: usize) -> Option<Vec<Value>> {
        let slot = self.rows.get_mut(position)?;
        let values = slot.take()?;

        if let Some(pk) = self.primary_key {
            // Only drop the index entry if it still points at this position.
            if self.primary_index.get(&values[pk]) == Some(&position) {
                self.primary_index.remove(&values[pk]);
            }
        }

        trace!(table = %self.name, position, "row deleted");
        Some(values)
    }

    /// Overwrites a live slot, or inserts when the position is dead.
    ///
    /// On the update path values are stored as given; a changed primary-key
    /// value is reindexed after a collision check. On the insert path the
    /// call behaves exactly like `add_row`.
    pub fn save_row(&mut self, position: usize, values: Vec<Value>) -> Result<SaveOutcome> {
        let live = self
            .rows
            .get(position)
            .map(Option::is_some)
            .unwrap_or(false);
        if !live {
            let (position, values) = self.add_row(values)?;
            return Ok(SaveOutcome {
                position,
                values,
                inserted: true,
            });
        }

        if values.len() != self.columns.len() {
            return Err(Error::length_mismatch(
                &self.name,
                self.columns.len(),
                values.len(),
            ));
        }

        if let Some(pk) = self.primary_key {
            let new_key = &values[pk];
            if let Some(&holder) = self.primary_index.get(new_key) {
                if holder != position {
                    return Err(Error::duplicate_key(&self.name, new_key.clone()));
                }
            }
            let old_key = self.rows[position]
                .as_ref()
                .map(|r| r[pk].clone())
                .unwrap_or(Value::Null);
            if old_key != *new_key {
                if self.primary_index.get(&old_key) == Some(&position) {
                    self.primary_index.remove(&old_key);
                }
                self.primary_index.insert(new_key.clone(), position);
            }
            self.advance_counter_past(pk, new_key);
        }

        trace!(table = %self.name, position, "row saved");
        self.rows[position] = Some(values.clone());
        Ok(SaveOutcome {
            position,
            values,
            inserted: false,
        })
    }

    /// O(1) primary-key lookup. `None` when no key is declared or absent.
    pub fn find_pk(&self, key: &Value) -> Option<usize> {
        self.primary_key?;
        self.primary_index.get(key).copied()
    }

    /// Linear scan over live rows matching `key` in one column.
    ///
    /// Matches arrive in ascending position order; a `limit` of zero means
    /// unbounded.
    pub fn find_by(&self, column: usize, key: &Value, limit: usize) -> Vec<usize> {
        let mut matches = Vec::new();
        for (position, row) in self.live_rows() {
            if row.get(column) == Some(key) {
                matches.push(position);
                if limit != 0 && matches.len() == limit {
                    break;
                }
            }
        }
        matches
    }

    /// Fills null inputs from column generators and auto counters.
    fn generate(&mut self, mut values: Vec<Value>) -> Vec<Value> {
        for (i, value) in values.iter_mut().enumerate() {
            if !value.is_null() {
                continue;
            }
            if self.columns[i].data_type() == DataType::Auto {
                let counter = self.auto_counters.entry(i).or_insert(0);
                *counter += 1;
                *value = Value::Number(*counter as f64);
            } else {
                *value = self.columns[i].default_value();
            }
        }
        values
    }

    /// Bumps an auto counter so later generated keys skip a manual value.
    ///
    /// Only applies when the auto column is also the primary key; an auto
    /// column off the key path keeps its own sequence untouched.
    fn advance_counter_past(&mut self, pk: usize, key: &Value) {
        if self.columns[pk].data_type() != DataType::Auto {
            return;
        }
        if let Some(n) = key.as_f64() {
            let n = n as i64;
            let counter = self.auto_counters.entry(pk).or_insert(0);
            if n > *counter {
                *counter = n;
            }
        }
    }
}
