use crate::core::FieldName;
use crate::core::value::Value;
use crate::error::{FormError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    #[default]
    Any,
    Text,
    Number,
    Bool,
    List,
    Object,
}

impl FieldKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Text => "text",
            Self::Number => "number",
            Self::Bool => "bool",
            Self::List => "list",
            Self::Object => "object",
        }
    }

    /// `Value::None` is accepted by every kind and stands for an empty field.
    pub fn accepts(self, value: &Value) -> bool {
        match (self, value) {
            (Self::Any, _) | (_, Value::None) => true,
            (Self::Text, Value::Text(_)) => true,
            (Self::Number, Value::Number(_)) => true,
            (Self::Bool, Value::Bool(_)) => true,
            (Self::List, Value::List(_)) => true,
            (Self::Object, Value::Object(_)) => true,
            _ => false,
        }
    }

    pub fn default_value(self) -> Value {
        match self {
            Self::Any => Value::None,
            Self::Text => Value::Text(String::new()),
            Self::Number => Value::None,
            Self::Bool => Value::Bool(false),
            Self::List => Value::List(Vec::new()),
            Self::Object => Value::Object(IndexMap::new()),
        }
    }
}

/// Declared field set of a form, in display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormSchema {
    fields: IndexMap<FieldName, FieldKind>,
}

impl FormSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<FieldName>, kind: FieldKind) -> Self {
        self.fields.insert(name.into(), kind);
        self
    }

    pub fn kind(&self, name: &str) -> Option<FieldKind> {
        self.fields.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldName, FieldKind)> {
        self.fields.iter().map(|(name, kind)| (name, *kind))
    }

    pub fn defaults(&self) -> IndexMap<FieldName, Value> {
        self.fields
            .iter()
            .map(|(name, kind)| (name.clone(), kind.default_value()))
            .collect()
    }

    pub fn check_value(&self, name: &str, value: &Value) -> Result<()> {
        let Some(kind) = self.kind(name) else {
            return Err(FormError::UnknownField(name.into()));
        };
        if kind.accepts(value) {
            Ok(())
        } else {
            Err(FormError::KindMismatch {
                field: name.into(),
                expected: kind.as_str(),
                actual: value.type_name(),
            })
        }
    }

    /// Checks that `values` holds exactly the declared fields with matching kinds.
    pub fn check(&self, values: &IndexMap<FieldName, Value>) -> Result<()> {
        if let Some(missing) = self.fields.keys().find(|name| !values.contains_key(name.as_str())) {
            return Err(FormError::MissingField(missing.clone()));
        }
        for (name, value) in values {
            self.check_value(name.as_str(), value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldKind, FormSchema};
    use crate::core::FieldName;
    use crate::core::value::Value;
    use crate::error::FormError;
    use indexmap::IndexMap;

    fn part_schema() -> FormSchema {
        FormSchema::new()
            .field("part_name", FieldKind::Text)
            .field("quantity", FieldKind::Number)
            .field("categories", FieldKind::List)
    }

    #[test]
    fn defaults_follow_declared_kinds() {
        let defaults = part_schema().defaults();
        assert_eq!(defaults.get("part_name"), Some(&Value::text("")));
        assert_eq!(defaults.get("quantity"), Some(&Value::None));
        assert_eq!(defaults.get("categories"), Some(&Value::List(Vec::new())));
    }

    #[test]
    fn check_reports_missing_unknown_and_mismatch() {
        let schema = part_schema();
        let mut values = schema.defaults();
        assert!(schema.check(&values).is_ok());

        values.insert(FieldName::from("quantity"), Value::text("ten"));
        assert!(matches!(
            schema.check(&values),
            Err(FormError::KindMismatch { expected: "number", actual: "text", .. })
        ));

        let mut partial = IndexMap::new();
        partial.insert(FieldName::from("part_name"), Value::text("resistor"));
        assert!(matches!(schema.check(&partial), Err(FormError::MissingField(_))));

        assert!(matches!(
            schema.check_value("location", &Value::None),
            Err(FormError::UnknownField(_))
        ));
    }

    #[test]
    fn none_is_accepted_for_every_kind() {
        for kind in [FieldKind::Text, FieldKind::Number, FieldKind::Bool, FieldKind::Object] {
            assert!(kind.accepts(&Value::None));
        }
    }
}
