//! Data type definitions for Tabula.
//!
//! This module defines the fixed set of column types and their built-in
//! default generators.

use crate::value::{RegexpValue, Value};
use chrono::Utc;

/// Supported column types.
///
/// The lowercase tag of each variant is the form used by the text grammar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Counter-assigned number, monotonically increasing per table.
    Auto,
    /// UTF-8 string.
    String,
    /// 64-bit floating point number.
    Number,
    /// Boolean (true/false).
    Boolean,
    /// Date and time (UTC).
    Date,
    /// Ordered list of values.
    Array,
    /// Ordered field/value mapping.
    Object,
    /// Compiled regular expression.
    Regexp,
    /// Function type. Accepted as a schema tag, but function bodies are
    /// not data; values of this type are always null.
    Function,
}

impl DataType {
    /// Returns the stable lowercase tag for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Auto => "auto",
            DataType::String => "string",
            DataType::Number => "number",
            DataType::Boolean => "boolean",
            DataType::Date => "date",
            DataType::Array => "array",
            DataType::Object => "object",
            DataType::Regexp => "regexp",
            DataType::Function => "function",
        }
    }

    /// Parses a type tag back into a `DataType`.
    pub fn parse(tag: &str) -> Option<DataType> {
        match tag {
            "auto" => Some(DataType::Auto),
            "string" => Some(DataType::String),
            "number" => Some(DataType::Number),
            "boolean" => Some(DataType::Boolean),
            "date" => Some(DataType::Date),
            "array" => Some(DataType::Array),
            "object" => Some(DataType::Object),
            "regexp" => Some(DataType::Regexp),
            "function" => Some(DataType::Function),
            _ => None,
        }
    }

    /// Returns whether this type may back a primary-key column.
    #[inline]
    pub fn is_key_type(&self) -> bool {
        matches!(self, DataType::Auto | DataType::String | DataType::Number)
    }

    /// Returns the built-in default for this type when it is a constant.
    ///
    /// `date` has no constant default (its built-in generator yields the
    /// current time); the exporter uses this to decide whether a column's
    /// generator is observably equivalent to the built-in one.
    pub fn constant_default(&self) -> Option<Value> {
        match self {
            DataType::Auto => Some(Value::Number(-1.0)),
            DataType::String => Some(Value::String(String::new())),
            DataType::Number => Some(Value::Number(0.0)),
            DataType::Boolean => Some(Value::Boolean(false)),
            DataType::Date => None,
            DataType::Array => Some(Value::Array(Vec::new())),
            DataType::Object => Some(Value::Object(Vec::new())),
            DataType::Regexp => Some(Value::Regexp(RegexpValue::wildcard())),
            DataType::Function => Some(Value::Null),
        }
    }

    /// Runs the built-in default generator for this type.
    pub fn default_value(&self) -> Value {
        match self {
            DataType::Date => Value::Date(Utc::now()),
            _ => self.constant_default().unwrap_or(Value::Null),
        }
    }
}
