use crate::core::FieldName;
use crate::core::value::Value;
use crate::error::{FormError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Current values of every field a form edits, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormState {
    values: IndexMap<FieldName, Value>,
}

impl FormState {
    pub fn new(values: IndexMap<FieldName, Value>) -> Self {
        Self { values }
    }

    /// Builds a form state from a JSON object such as an API record.
    pub fn from_json(json: serde_json::Value) -> Result<Self> {
        let serde_json::Value::Object(map) = json else {
            return Err(FormError::NotAnObject);
        };
        Ok(Self {
            values: map
                .into_iter()
                .map(|(key, value)| (FieldName::from(key), Value::from(value)))
                .collect(),
        })
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_text)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldName, &Value)> {
        self.values.iter()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &FieldName> {
        self.values.keys()
    }

    pub fn values(&self) -> &IndexMap<FieldName, Value> {
        &self.values
    }

    /// Replaces the value of an existing field and returns the previous one.
    /// Unknown fields are rejected so the field set never changes.
    pub(crate) fn replace(&mut self, name: &str, value: Value) -> Result<Value> {
        let Some(slot) = self.values.get_mut(name) else {
            return Err(FormError::UnknownField(name.into()));
        };
        Ok(std::mem::replace(slot, value))
    }

    /// Fields whose value differs from `baseline`.
    pub fn changed_fields<'a>(&'a self, baseline: &'a FormState) -> impl Iterator<Item = &'a FieldName> + 'a {
        self.values
            .iter()
            .filter(move |(name, value)| baseline.get(name.as_str()) != Some(*value))
            .map(|(name, _)| name)
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.values
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_json()))
                .collect(),
        )
    }
}

impl<K, V> FromIterator<(K, V)> for FormState
where
    K: Into<FieldName>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}
