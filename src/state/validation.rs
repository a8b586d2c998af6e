use crate::core::FieldName;
use crate::state::form_state::FormState;
use indexmap::IndexMap;
use serde::Serialize;

/// Local validator: inspects the whole form and returns the field errors.
pub type FormValidator = Box<dyn Fn(&FormState) -> ErrorMap>;

/// Field-keyed error messages currently shown next to the inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorMap {
    entries: IndexMap<FieldName, String>,
}

impl ErrorMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_error(&mut self, field: impl Into<FieldName>, error: impl Into<String>) {
        self.entries.insert(field.into(), error.into());
    }

    /// Returns whether an error was present.
    pub fn clear_error(&mut self, field: &str) -> bool {
        self.entries.shift_remove(field).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.entries.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(field, error)| (field.as_str(), error.as_str()))
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldName> {
        self.entries.keys()
    }

    pub fn extend(&mut self, other: ErrorMap) {
        self.entries.extend(other.entries);
    }
}

impl<K, V> FromIterator<(K, V)> for ErrorMap
where
    K: Into<FieldName>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(field, error)| (field.into(), error.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ErrorMap;

    #[test]
    fn later_errors_replace_earlier_ones_for_the_same_field() {
        let mut errors = ErrorMap::new();
        errors.set_error("email", "required");
        errors.set_error("email", "invalid");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("email"), Some("invalid"));
    }

    #[test]
    fn clear_error_reports_presence_and_keeps_order() {
        let mut errors: ErrorMap = [("a", "1"), ("b", "2"), ("c", "3")].into_iter().collect();
        assert!(errors.clear_error("b"));
        assert!(!errors.clear_error("b"));
        assert_eq!(errors.iter().map(|(f, _)| f).collect::<Vec<_>>(), vec!["a", "c"]);
    }

    #[test]
    fn serializes_as_flat_object() {
        let errors: ErrorMap = [("email", "invalid")].into_iter().collect();
        assert_eq!(
            serde_json::to_value(&errors).expect("json"),
            serde_json::json!({ "email": "invalid" })
        );
    }
}
