//! Per-field validation rules and their composition into a form validator.
//!
//! Rules other than [`required`] pass on empty values, so optional fields
//! only get checked once the user has typed something.

use crate::core::FieldName;
use crate::core::value::Value;
use crate::error::{FormError, Result};
use crate::state::{ErrorMap, FormState, FormValidator};
use indexmap::IndexMap;
use regex::Regex;

pub type ValidationError = String;
pub type Validator = Box<dyn Fn(&Value) -> Result<(), ValidationError>>;

/// Run a list of validators against `value`, returning the first error.
pub fn run_validators(validators: &[Validator], value: &Value) -> Result<(), ValidationError> {
    for validator in validators {
        validator(value)?;
    }
    Ok(())
}

pub fn required(message: impl Into<String>) -> Validator {
    let message = message.into();
    Box::new(move |value: &Value| {
        let blank = match value {
            Value::Text(text) => text.trim().is_empty(),
            other => other.is_empty(),
        };
        if blank { Err(message.clone()) } else { Ok(()) }
    })
}

pub fn min_length(min_len: usize, message: impl Into<String>) -> Validator {
    let message = message.into();
    Box::new(move |value: &Value| match length_of(value) {
        Some(len) if len > 0 && len < min_len => Err(message.clone()),
        _ => Ok(()),
    })
}

pub fn max_length(max_len: usize, message: impl Into<String>) -> Validator {
    let message = message.into();
    Box::new(move |value: &Value| match length_of(value) {
        Some(len) if len > max_len => Err(message.clone()),
        _ => Ok(()),
    })
}

pub fn pattern(pattern: &str, message: impl Into<String>) -> Result<Validator, FormError> {
    let re = Regex::new(pattern).map_err(|source| FormError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })?;
    let message = message.into();
    Ok(Box::new(move |value: &Value| match value.as_text() {
        Some(text) if !text.is_empty() && !re.is_match(text) => Err(message.clone()),
        _ => Ok(()),
    }))
}

pub fn email(message: impl Into<String>) -> Validator {
    let re = email_regex();
    let message = message.into();
    Box::new(move |value: &Value| match value.as_text() {
        Some(text) if !text.is_empty() && !re.is_match(text) => Err(message.clone()),
        _ => Ok(()),
    })
}

pub fn custom<F>(f: F, message: impl Into<String>) -> Validator
where
    F: Fn(&Value) -> bool + 'static,
{
    let message = message.into();
    Box::new(move |value: &Value| if f(value) { Ok(()) } else { Err(message.clone()) })
}

fn length_of(value: &Value) -> Option<usize> {
    match value {
        Value::Text(text) => Some(text.chars().count()),
        Value::List(items) => Some(items.len()),
        _ => None,
    }
}

fn email_regex() -> Regex {
    static EMAIL: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    EMAIL
        .get_or_init(|| {
            Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
                .expect("email pattern is valid")
        })
        .clone()
}

/// Rules grouped by field; the first failing rule of a field wins.
#[derive(Default)]
pub struct FieldRules {
    rules: IndexMap<FieldName, Vec<Validator>>,
}

impl FieldRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule(mut self, field: impl Into<FieldName>, validator: Validator) -> Self {
        self.rules.entry(field.into()).or_default().push(validator);
        self
    }

    pub fn validate(&self, state: &FormState) -> ErrorMap {
        let mut errors = ErrorMap::new();
        let empty = Value::None;
        for (field, validators) in &self.rules {
            let value = state.get(field.as_str()).unwrap_or(&empty);
            if let Err(error) = run_validators(validators, value) {
                errors.set_error(field.clone(), error);
            }
        }
        errors
    }

    pub fn into_validator(self) -> FormValidator {
        Box::new(move |state: &FormState| self.validate(state))
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldRules, custom, email, max_length, min_length, pattern, required};
    use crate::core::value::Value;
    use crate::error::FormError;
    use crate::state::FormState;

    #[test]
    fn required_treats_whitespace_as_blank() {
        let rule = required("Name is required");
        assert_eq!(rule(&Value::text("   ")), Err("Name is required".to_string()));
        assert_eq!(rule(&Value::None), Err("Name is required".to_string()));
        assert!(rule(&Value::Bool(false)).is_ok());
    }

    #[test]
    fn length_rules_count_chars_and_skip_empty() {
        let min = min_length(3, "too short");
        assert!(min(&Value::text("")).is_ok());
        assert!(min(&Value::text("ab")).is_err());
        assert!(min(&Value::text("äöü")).is_ok());

        let max = max_length(2, "too many");
        assert!(max(&Value::List(vec![Value::None; 3])).is_err());
    }

    #[test]
    fn pattern_rejects_invalid_regex() {
        assert!(matches!(pattern("([a-z", "bad"), Err(FormError::InvalidPattern { .. })));

        let sku = pattern(r"^[A-Z]{3}-\d+$", "Use ABC-123").expect("valid pattern");
        assert!(sku(&Value::text("RES-10")).is_ok());
        assert_eq!(sku(&Value::text("res-10")), Err("Use ABC-123".to_string()));
    }

    #[test]
    fn field_rules_report_first_failure_per_field() {
        let rules = FieldRules::new()
            .rule("email", required("Email is required"))
            .rule("email", email("Email is invalid"))
            .rule("quantity", custom(|v| v.as_number().is_some_and(|n| n >= 0.0), "Must be positive"));

        let state: FormState = [
            ("email", Value::text("not-an-email")),
            ("quantity", Value::Number(-1.0)),
        ]
        .into_iter()
        .collect();
        let errors = rules.validate(&state);
        assert_eq!(errors.get("email"), Some("Email is invalid"));
        assert_eq!(errors.get("quantity"), Some("Must be positive"));

        let blank: FormState = [("email", Value::text("")), ("quantity", Value::Number(2.0))]
            .into_iter()
            .collect();
        let errors = rules.validate(&blank);
        assert_eq!(errors.get("email"), Some("Email is required"));
        assert!(!errors.contains("quantity"));
    }
}
