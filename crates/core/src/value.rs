//! Value type definitions for Tabula.
//!
//! This module defines the `Value` enum which represents any value that can
//! be stored in a table cell, and the `RegexpValue` wrapper for compiled
//! regular expressions.

use crate::types::DataType;
use chrono::{DateTime, Utc};
use core::hash::{Hash, Hasher};
use regex::Regex;

/// A compiled regular expression value.
///
/// Equality and hashing go by the pattern source text, the way the engine
/// compares every other value by content.
#[derive(Clone, Debug)]
pub struct RegexpValue(Regex);

impl RegexpValue {
    /// Compiles a pattern into a regexp value.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(Self)
    }

    /// Returns the wildcard regexp `/^.*$/`, the built-in default.
    pub fn wildcard() -> Self {
        // The pattern is statically valid.
        Self(Regex::new("^.*$").unwrap())
    }

    /// Returns the pattern source text.
    #[inline]
    pub fn pattern(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the compiled regex.
    #[inline]
    pub fn regex(&self) -> &Regex {
        &self.0
    }
}

impl PartialEq for RegexpValue {
    fn eq(&self, other: &Self) -> bool {
        self.pattern() == other.pattern()
    }
}

impl Eq for RegexpValue {}

impl Hash for RegexpValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pattern().hash(state);
    }
}

/// A value that can be stored in a table cell.
#[derive(Clone, Debug)]
pub enum Value {
    /// Null value. In row-construction input a null asks the engine to
    /// generate the column's default.
    Null,
    /// Boolean value.
    Boolean(bool),
    /// 64-bit floating point number. Auto-counter values are numbers too.
    Number(f64),
    /// UTF-8 string.
    String(String),
    /// Date and time (UTC).
    Date(DateTime<Utc>),
    /// Ordered list of values.
    Array(Vec<Value>),
    /// Field/value mapping preserving source field order.
    Object(Vec<(String, Value)>),
    /// Compiled regular expression.
    Regexp(RegexpValue),
}

impl Value {
    /// Returns the data type of this value, or None if it is Null.
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Value::Null => None,
            Value::Boolean(_) => Some(DataType::Boolean),
            Value::Number(_) => Some(DataType::Number),
            Value::String(_) => Some(DataType::String),
            Value::Date(_) => Some(DataType::Date),
            Value::Array(_) => Some(DataType::Array),
            Value::Object(_) => Some(DataType::Object),
            Value::Regexp(_) => Some(DataType::Regexp),
        }
    }

    /// Returns true if this value is Null.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns whether this value may be stored in a column of the given
    /// type. Null matches any type; `auto` columns hold numbers.
    pub fn matches_type(&self, data_type: DataType) -> bool {
        match (self, data_type) {
            (Value::Null, _) => true,
            (Value::Number(_), DataType::Number | DataType::Auto) => true,
            (Value::String(_), DataType::String) => true,
            (Value::Boolean(_), DataType::Boolean) => true,
            (Value::Date(_), DataType::Date) => true,
            (Value::Array(_), DataType::Array) => true,
            (Value::Object(_), DataType::Object) => true,
            (Value::Regexp(_), DataType::Regexp) => true,
            _ => false,
        }
    }

    /// Returns the boolean if this is a Boolean, None otherwise.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the number if this is a Number, None otherwise.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns a reference to the string if this is a String, None otherwise.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v.as_str()),
            _ => None,
        }
    }

    /// Returns the date if this is a Date, None otherwise.
    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Date(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the items if this is an Array, None otherwise.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// Returns the fields if this is an Object, None otherwise.
    pub fn as_object(&self) -> Option<&[(String, Value)]> {
        match self {
            Value::Object(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// Returns the regexp if this is a Regexp, None otherwise.
    pub fn as_regexp(&self) -> Option<&RegexpValue> {
        match self {
            Value::Regexp(v) => Some(v),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => {
                // NaN compares equal to itself so the index stays coherent.
                if a.is_nan() && b.is_nan() {
                    true
                } else {
                    a == b
                }
            }
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Regexp(a), Value::Regexp(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Boolean(b) => b.hash(state),
            Value::Number(n) => n.to_bits().hash(state),
            Value::String(s) => s.hash(state),
            Value::Date(d) => {
                d.timestamp().hash(state);
                d.timestamp_subsec_nanos().hash(state);
            }
            Value::Array(items) => items.hash(state),
            Value::Object(fields) => fields.hash(state),
            Value::Regexp(r) => r.hash(state),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Number(v as f64)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Number(v as f64)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Date(v)
    }
}

impl From<RegexpValue> for Value {
    fn from(v: RegexpValue) -> Self {
        Value::Regexp(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(val) => val.into(),
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(v: &Value) -> u64 {
        let mut hasher = DefaultHasher::new();
        v.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_value_type_check() {
        assert_eq!(Value::Number(42.0).data_type(), Some(DataType::Number));
        assert_eq!(Value::Null.data_type(), None);
        assert!(Value::Null.is_null());
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(Value::Boolean(true).as_bool(), Some(true));
        assert_eq!(Value::Number(3.5).as_f64(), Some(3.5));
        assert_eq!(Value::String("hello".into()).as_str(), Some("hello"));
        assert!(Value::Number(1.0).as_str().is_none());
    }

    #[test]
    fn test_value_equality() {
        assert_eq!(Value::Number(42.0), Value::Number(42.0));
        assert_ne!(Value::Number(42.0), Value::String("42".into()));
        assert_eq!(Value::Null, Value::Null);
        assert_eq!(Value::Number(f64::NAN), Value::Number(f64::NAN));
    }

    #[test]
    fn test_value_hash_consistent_with_eq() {
        let a = Value::Number(7.0);
        let b = Value::from(7i64);
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_value_from_impls() {
        let v: Value = 42i64.into();
        assert_eq!(v.as_f64(), Some(42.0));

        let v: Value = "hello".into();
        assert_eq!(v.as_str(), Some("hello"));

        let v: Value = None::<i32>.into();
        assert!(v.is_null());
    }

    #[test]
    fn test_matches_type() {
        assert!(Value::Number(5.0).matches_type(DataType::Number));
        assert!(Value::Number(5.0).matches_type(DataType::Auto));
        assert!(Value::Null.matches_type(DataType::String));
        assert!(!Value::String("x".into()).matches_type(DataType::Number));
        assert!(!Value::Boolean(true).matches_type(DataType::Function));
    }

    #[test]
    fn test_regexp_equality_by_pattern() {
        let a = RegexpValue::new("a+").unwrap();
        let b = RegexpValue::new("a+").unwrap();
        let c = RegexpValue::new("b+").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(RegexpValue::wildcard().pattern(), "^.*$");
    }

    #[test]
    fn test_object_field_order_significant() {
        let a = Value::Object(vec![
            ("x".into(), Value::Number(1.0)),
            ("y".into(), Value::Number(2.0)),
        ]);
        let b = Value::Object(vec![
            ("y".into(), Value::Number(2.0)),
            ("x".into(), Value::Number(1.0)),
        ]);
        assert_ne!(a, b);
    }
}
