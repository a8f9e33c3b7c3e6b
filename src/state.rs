//! Explicit conversion between JSON attribute objects and typed records.
//!
//! Every resource and data source record implements [`StateRecord`] by hand,
//! field by field, using the readers below. Absent and null attributes read as
//! the type's empty value; attributes of the wrong JSON type are rejected.

use serde_json::{Map, Value};

use crate::error::ProviderError;

/// A typed record that round-trips through a JSON attribute object.
pub trait StateRecord: Sized + Send + Sync + 'static {
    /// Build the record from an attribute object.
    fn from_value(value: &Value) -> Result<Self, ProviderError>;

    /// Render the record as an attribute object.
    fn to_value(&self) -> Value;
}

/// Field readers over one attribute object.
pub(crate) struct Fields<'a> {
    map: Option<&'a Map<String, Value>>,
}

impl<'a> Fields<'a> {
    pub(crate) fn new(value: &'a Value) -> Result<Self, ProviderError> {
        match value {
            Value::Object(map) => Ok(Self { map: Some(map) }),
            Value::Null => Ok(Self { map: None }),
            _ => Err(ProviderError::InvalidState {
                attribute: String::new(),
                expected: "object",
            }),
        }
    }

    fn get(&self, name: &str) -> Option<&'a Value> {
        self.map
            .and_then(|map| map.get(name))
            .filter(|v| !v.is_null())
    }

    pub(crate) fn string(&self, name: &str) -> Result<String, ProviderError> {
        Ok(self.optional_string(name)?.unwrap_or_default())
    }

    pub(crate) fn optional_string(&self, name: &str) -> Result<Option<String>, ProviderError> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(invalid(name, "string")),
        }
    }

    pub(crate) fn int64(&self, name: &str) -> Result<i64, ProviderError> {
        match self.get(name) {
            None => Ok(0),
            Some(v) => v.as_i64().ok_or_else(|| invalid(name, "int64")),
        }
    }

    pub(crate) fn bool(&self, name: &str) -> Result<bool, ProviderError> {
        match self.get(name) {
            None => Ok(false),
            Some(v) => v.as_bool().ok_or_else(|| invalid(name, "bool")),
        }
    }

    pub(crate) fn list(&self, name: &str) -> Result<&'a [Value], ProviderError> {
        match self.get(name) {
            None => Ok(&[]),
            Some(Value::Array(items)) => Ok(items),
            Some(_) => Err(invalid(name, "list")),
        }
    }
}

fn invalid(attribute: &str, expected: &'static str) -> ProviderError {
    ProviderError::InvalidState {
        attribute: attribute.to_string(),
        expected,
    }
}

/// Render an optional computed value, unknown (null) when absent.
pub(crate) fn optional(value: &Option<String>) -> Value {
    match value {
        Some(s) => Value::String(s.clone()),
        None => Value::Null,
    }
}

/// Fail with a validation error if `value` is empty.
pub(crate) fn require(value: &str, attribute: &str, purpose: &str) -> Result<(), ProviderError> {
    if value.is_empty() {
        Err(ProviderError::missing(
            attribute,
            format!("Attribute '{}' is required to {}.", attribute, purpose),
        ))
    } else {
        Ok(())
    }
}

/// Fail with a validation error if a computed identifier is absent.
pub(crate) fn require_id<'a>(
    id: &'a Option<String>,
    purpose: &str,
) -> Result<&'a str, ProviderError> {
    let id = id.as_deref().unwrap_or_default();
    require(id, "id", purpose)?;
    Ok(id)
}
