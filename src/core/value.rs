use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single form field value.
///
/// Field values are heterogeneous; the variant is the tag that a
/// [`FormSchema`](crate::core::schema::FormSchema) checks against.
///
/// Numbers are `f64`, as in the JSON the forms exchange: integers are exact
/// up to 2^53 in magnitude and lose precision beyond that.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    None,
    Text(String),
    Number(f64),
    Bool(bool),
    List(Vec<Value>),
    Object(IndexMap<String, Value>),
}

impl Value {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::None => true,
            Self::Text(v) => v.is_empty(),
            Self::List(v) => v.is_empty(),
            Self::Object(v) => v.is_empty(),
            _ => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Self::Object(v) => Some(v),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Text(_) => "text",
            Self::Number(_) => "number",
            Self::Bool(_) => "bool",
            Self::List(_) => "list",
            Self::Object(_) => "object",
        }
    }

    /// Converts back to JSON. Whole numbers that fit an `i64` are emitted as
    /// integers; non-finite numbers become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::None => serde_json::Value::Null,
            Self::Text(v) => serde_json::Value::String(v.clone()),
            Self::Bool(v) => serde_json::Value::Bool(*v),
            Self::Number(v) => number_to_json(*v),
            Self::List(items) => serde_json::Value::Array(items.iter().map(Value::to_json).collect()),
            Self::Object(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
        }
    }
}

fn number_to_json(value: f64) -> serde_json::Value {
    // i64::MAX as f64 rounds up to 2^63, which does not fit.
    if value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 {
        return serde_json::Value::from(value as i64);
    }
    serde_json::Number::from_f64(value)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::None,
            serde_json::Value::Bool(v) => Self::Bool(v),
            serde_json::Value::Number(n) => n.as_f64().map(Self::Number).unwrap_or(Self::None),
            serde_json::Value::String(v) => Self::Text(v),
            serde_json::Value::Array(items) => Self::List(items.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(map) => Self::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        value.to_json()
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// Rounds to the nearest `f64` above 2^53 in magnitude.
impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Self::List(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => Ok(()),
            Self::Text(v) => f.write_str(v),
            other => write!(f, "{}", other.to_json()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Value;
    use serde_json::json;

    #[test]
    fn json_integers_round_trip_as_integers() {
        let value = Value::from(json!({ "quantity": 12, "price": 2.5, "tags": ["a"], "note": null }));
        let Value::Object(map) = &value else {
            panic!("expected object");
        };
        assert_eq!(map.get("quantity").and_then(Value::as_number), Some(12.0));
        assert!(map.get("note").is_some_and(Value::is_none));

        assert_eq!(
            value.to_json(),
            json!({ "quantity": 12, "price": 2.5, "tags": ["a"], "note": null })
        );
    }

    #[test]
    fn untagged_deserialize_picks_variant_by_shape() {
        let value: Value = serde_json::from_str(r#"[true, "x", 3, null]"#).expect("value");
        assert_eq!(
            value,
            Value::List(vec![
                Value::Bool(true),
                Value::text("x"),
                Value::Number(3.0),
                Value::None,
            ])
        );
    }

    #[test]
    fn whole_numbers_outside_i64_stay_floats() {
        let two_pow_63 = 2f64.powi(63);
        let json = Value::Number(two_pow_63).to_json();
        assert!(!json.is_i64() && !json.is_u64());
        assert_eq!(json.as_f64(), Some(two_pow_63));

        assert_eq!(Value::Number(-two_pow_63).to_json(), json!(i64::MIN));
        assert_eq!(Value::from(1i64 << 53).to_json(), json!(1i64 << 53));
    }

    #[test]
    fn emptiness_by_variant() {
        assert!(Value::None.is_empty());
        assert!(Value::text("").is_empty());
        assert!(!Value::Bool(false).is_empty());
        assert!(!Value::Number(0.0).is_empty());
    }
}
