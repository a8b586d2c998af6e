use crate::core::FieldName;
use thiserror::Error;

/// Errors raised by form configuration and field updates.
///
/// Submission failures are not represented here; they travel as
/// [`SubmitError`](crate::submit::SubmitError) values.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("unknown field `{0}`")]
    UnknownField(FieldName),
    #[error("field `{0}` is missing from the initial values")]
    MissingField(FieldName),
    #[error("field `{field}` expects {expected}, got {actual}")]
    KindMismatch {
        field: FieldName,
        expected: &'static str,
        actual: &'static str,
    },
    #[error("invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("initial values must be a JSON object")]
    NotAnObject,
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T, E = FormError> = std::result::Result<T, E>;
