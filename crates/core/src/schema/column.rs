//! Column definition for Tabula table schemas.

use super::check_name;
use crate::error::{Error, Result};
use crate::types::DataType;
use crate::value::Value;

/// A resolved column definition: the immutable schema unit of a table.
///
/// A custom default-value generator is modeled as a constant `Value`; when
/// absent, `default_value` falls back to the type's built-in generator.
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    name: String,
    data_type: DataType,
    default: Option<Value>,
}

impl Column {
    /// Creates a new column, validating the name.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Result<Self> {
        let name = name.into();
        check_name(&name)?;
        Ok(Self {
            name,
            data_type,
            default: None,
        })
    }

    /// Attaches a custom default value, which must be consistent with the
    /// column type.
    pub fn with_default(mut self, value: Value) -> Result<Self> {
        if !value.matches_type(self.data_type) {
            return Err(Error::invalid_name(
                &self.name,
                format!(
                    "generator value {:?} does not match column type '{}'",
                    value,
                    self.data_type.as_str()
                ),
            ));
        }
        self.default = Some(value);
        Ok(self)
    }

    /// Returns the column name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the data type.
    #[inline]
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Returns the custom default value, if one was declared.
    #[inline]
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Produces the column's default value: the custom default when
    /// declared, the type's built-in generator otherwise.
    pub fn default_value(&self) -> Value {
        match &self.default {
            Some(v) => v.clone(),
            None => self.data_type.default_value(),
        }
    }

    /// Returns the custom default when it is observably different from the
    /// type's built-in generator. The exporter emits a `'generator'` entry
    /// exactly in that case.
    pub fn custom_generator(&self) -> Option<&Value> {
        let default = self.default.as_ref()?;
        if self.data_type.constant_default().as_ref() == Some(default) {
            None
        } else {
            Some(default)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_new() {
        let col = Column::new("name", DataType::String).unwrap();
        assert_eq!(col.name(), "name");
        assert_eq!(col.data_type(), DataType::String);
        assert!(col.default().is_none());
        assert_eq!(col.default_value(), Value::String(String::new()));
    }

    #[test]
    fn test_column_invalid_name() {
        assert!(Column::new("", DataType::String).is_err());
        assert!(Column::new("$hidden", DataType::Number).is_err());
    }

    #[test]
    fn test_column_custom_default() {
        let col = Column::new("name", DataType::String)
            .unwrap()
            .with_default(Value::String("n/a".into()))
            .unwrap();
        assert_eq!(col.default_value(), Value::String("n/a".into()));
        assert_eq!(col.custom_generator(), Some(&Value::String("n/a".into())));
    }

    #[test]
    fn test_column_default_matching_builtin_not_custom() {
        let col = Column::new("count", DataType::Number)
            .unwrap()
            .with_default(Value::Number(0.0))
            .unwrap();
        // Observably equivalent to the built-in generator.
        assert_eq!(col.custom_generator(), None);
    }

    #[test]
    fn test_column_default_type_mismatch() {
        let result = Column::new("count", DataType::Number)
            .unwrap()
            .with_default(Value::String("zero".into()));
        assert!(result.is_err());
    }
}
