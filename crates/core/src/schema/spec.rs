//! Declaration types for tables and rows.
//!
//! These are the input side of the schema: what a caller (or the text
//! parser) hands to `Database::create`. The facade validates them and
//! resolves them into `Column` definitions and stored rows.

use crate::value::Value;

/// A deferred reference: a placeholder resolved during row construction to
/// the primary-key value of the first live row in `table` whose `column`
/// equals `value`.
#[derive(Clone, Debug, PartialEq)]
pub struct Ref {
    pub table: String,
    pub column: String,
    pub value: Value,
}

impl Ref {
    /// Creates a deferred reference.
    pub fn new(table: impl Into<String>, column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
            value: value.into(),
        }
    }
}

/// One cell of row-construction input: either a plain value or a deferred
/// reference.
#[derive(Clone, Debug, PartialEq)]
pub enum Field {
    Value(Value),
    Ref(Ref),
}

impl Field {
    /// A null field: asks the engine to generate the column default.
    pub fn null() -> Self {
        Field::Value(Value::Null)
    }

    /// Wraps a plain value.
    pub fn value(v: impl Into<Value>) -> Self {
        Field::Value(v.into())
    }
}

impl From<Value> for Field {
    fn from(v: Value) -> Self {
        Field::Value(v)
    }
}

impl From<Ref> for Field {
    fn from(r: Ref) -> Self {
        Field::Ref(r)
    }
}

/// A row declaration: positional (column order) or named.
#[derive(Clone, Debug, PartialEq)]
pub enum RowSpec {
    Tuple(Vec<Field>),
    Named(Vec<(String, Field)>),
}

impl RowSpec {
    /// Builds a positional row.
    pub fn tuple(fields: impl IntoIterator<Item = Field>) -> Self {
        RowSpec::Tuple(fields.into_iter().collect())
    }

    /// Builds a named row.
    pub fn named(fields: impl IntoIterator<Item = (String, Field)>) -> Self {
        RowSpec::Named(fields.into_iter().collect())
    }
}

impl From<Vec<Field>> for RowSpec {
    fn from(fields: Vec<Field>) -> Self {
        RowSpec::Tuple(fields)
    }
}

impl From<Vec<Value>> for RowSpec {
    fn from(values: Vec<Value>) -> Self {
        RowSpec::Tuple(values.into_iter().map(Field::Value).collect())
    }
}

/// What a column declaration carries: a concrete type, or a foreign-key
/// target whose primary-key type it inherits (`auto` coerced to `number`).
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnKind {
    Typed(crate::types::DataType),
    ForeignKey(String),
}

/// A column declaration.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnSpec {
    pub name: String,
    pub kind: ColumnKind,
    pub primary_key: bool,
    pub generator: Option<Value>,
}

impl ColumnSpec {
    /// Declares a typed column.
    pub fn typed(name: impl Into<String>, data_type: crate::types::DataType) -> Self {
        Self {
            name: name.into(),
            kind: ColumnKind::Typed(data_type),
            primary_key: false,
            generator: None,
        }
    }

    /// Declares a foreign-key column referencing another table.
    pub fn foreign_key(name: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ColumnKind::ForeignKey(table.into()),
            primary_key: false,
            generator: None,
        }
    }

    /// Marks this column as the primary key.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Attaches a custom default-value generator.
    pub fn generator(mut self, value: impl Into<Value>) -> Self {
        self.generator = Some(value.into());
        self
    }
}

/// A full table declaration: columns plus initial rows.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TableSpec {
    pub columns: Vec<ColumnSpec>,
    pub rows: Vec<RowSpec>,
}

impl TableSpec {
    /// Creates a table declaration from column specs.
    pub fn new(columns: impl IntoIterator<Item = ColumnSpec>) -> Self {
        Self {
            columns: columns.into_iter().collect(),
            rows: Vec::new(),
        }
    }

    /// Appends an initial row declaration.
    pub fn row(mut self, row: impl Into<RowSpec>) -> Self {
        self.rows.push(row.into());
        self
    }
}
