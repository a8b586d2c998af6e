use crate::core::FieldName;
use crate::core::value_path::{PathSegment, ValuePath};
use crate::state::ErrorMap;
use crate::submit::error::ValidationDetail;
use tracing::debug;

/// Turns the location of a server-reported error into a form field name.
///
/// Mapping is lossy: nested fields that share a leaf name collide under the
/// default [`LastSegment`] strategy.
pub trait PathResolver {
    fn resolve(&self, path: &ValuePath) -> Option<FieldName>;
}

impl<F> PathResolver for F
where
    F: Fn(&ValuePath) -> Option<FieldName>,
{
    fn resolve(&self, path: &ValuePath) -> Option<FieldName> {
        self(path)
    }
}

/// Uses the terminal segment as-is, indexes included.
#[derive(Debug, Clone, Copy, Default)]
pub struct LastSegment;

impl PathResolver for LastSegment {
    fn resolve(&self, path: &ValuePath) -> Option<FieldName> {
        path.last().map(|segment| FieldName::from(segment.to_string()))
    }
}

/// Uses the last key, so `["body", "tags", 2]` resolves to `tags`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LastKeySegment;

impl PathResolver for LastKeySegment {
    fn resolve(&self, path: &ValuePath) -> Option<FieldName> {
        path.last_key().map(FieldName::from)
    }
}

/// Uses the whole dotted path, minus an optional leading segment such as
/// `body`. Keeps nested fields apart: `address.city` vs `city`.
#[derive(Debug, Clone)]
pub struct FullPath {
    skip_prefix: Option<String>,
}

impl FullPath {
    pub fn new(skip_prefix: Option<String>) -> Self {
        Self { skip_prefix }
    }
}

impl Default for FullPath {
    fn default() -> Self {
        Self::new(Some("body".to_string()))
    }
}

impl PathResolver for FullPath {
    fn resolve(&self, path: &ValuePath) -> Option<FieldName> {
        let path = match &self.skip_prefix {
            Some(prefix) => path.without_prefix(prefix),
            None => path.clone(),
        };
        match path.segments() {
            [] => None,
            [PathSegment::Index(index)] => Some(FieldName::from(index.to_string())),
            _ => Some(FieldName::from(path.to_string())),
        }
    }
}

/// Builds field errors from structured validation entries. Entries without
/// a usable location or message are skipped.
pub fn map_validation_errors(entries: &[ValidationDetail], resolver: &dyn PathResolver) -> ErrorMap {
    let mut errors = ErrorMap::new();
    for entry in entries {
        let (Some(loc), Some(msg)) = (entry.loc.as_deref(), entry.msg.as_deref()) else {
            continue;
        };
        if loc.is_empty() || msg.is_empty() {
            continue;
        }
        let path = match ValuePath::from_location(loc) {
            Ok(path) => path,
            Err(err) => {
                debug!(error = %err, "skipping validation entry with unusable location");
                continue;
            }
        };
        if let Some(field) = resolver.resolve(&path) {
            errors.set_error(field, msg);
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::{FullPath, LastKeySegment, LastSegment, PathResolver, map_validation_errors};
    use crate::core::FieldName;
    use crate::core::value_path::ValuePath;
    use crate::submit::error::ValidationDetail;
    use serde_json::json;

    fn entry(loc: serde_json::Value, msg: &str) -> ValidationDetail {
        serde_json::from_value(json!({ "loc": loc, "msg": msg })).expect("entry")
    }

    #[test]
    fn last_segment_collides_on_nested_names() {
        let entries = vec![
            entry(json!(["body", "name"]), "Name taken"),
            entry(json!(["body", "contact", "name"]), "Contact name missing"),
        ];
        let errors = map_validation_errors(&entries, &LastSegment);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("name"), Some("Contact name missing"));
    }

    #[test]
    fn full_path_keeps_nested_names_apart() {
        let entries = vec![
            entry(json!(["body", "name"]), "Name taken"),
            entry(json!(["body", "contact", "name"]), "Contact name missing"),
        ];
        let errors = map_validation_errors(&entries, &FullPath::default());
        assert_eq!(errors.get("name"), Some("Name taken"));
        assert_eq!(errors.get("contact.name"), Some("Contact name missing"));
    }

    #[test]
    fn index_terminal_segments_depend_on_strategy() {
        let path = ValuePath::from_location(&[json!("body"), json!("tags"), json!(1)]).expect("path");
        assert_eq!(LastSegment.resolve(&path), Some(FieldName::from("1")));
        assert_eq!(LastKeySegment.resolve(&path), Some(FieldName::from("tags")));
    }

    #[test]
    fn incomplete_entries_are_skipped() {
        let entries = vec![
            ValidationDetail::default(),
            entry(json!([]), "no location"),
            entry(json!(["body", "email"]), ""),
            serde_json::from_value(json!({ "loc": ["body", "sku"] })).expect("entry"),
            entry(json!(["body", { "odd": true }]), "bad location"),
            entry(json!(["body", "email"]), "invalid"),
        ];
        let errors = map_validation_errors(&entries, &LastSegment);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("email"), Some("invalid"));
    }

    #[test]
    fn closures_work_as_resolvers() {
        let prefixed = |path: &ValuePath| path.last_key().map(|key| FieldName::from(format!("supplier_{key}")));
        let errors = map_validation_errors(&[entry(json!(["body", "url"]), "bad url")], &prefixed);
        assert_eq!(errors.get("supplier_url"), Some("bad url"));
    }
}
