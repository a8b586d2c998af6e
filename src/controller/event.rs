use crate::core::FieldName;
use crate::core::value::Value;

/// Lifecycle notifications queued by the controller for the UI loop.
#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    Initialized,
    FieldChanged { field: FieldName, value: Value },
    ErrorCleared { field: FieldName },
    ValidationFailed { fields: Vec<FieldName> },
    SubmitStarted,
    SubmitSucceeded,
    SubmitFailed { field_errors: usize },
    Reset,
    Closed,
    CloseRefused,
}
