pub mod controller;
pub mod core;
pub mod error;
pub mod permissions;
pub mod state;
pub mod submit;
pub mod validators;

pub use controller::{FormController, FormEvent, FormOptions, SubmitOutcome};
pub use crate::core::FieldName;
pub use crate::core::schema::{FieldKind, FormSchema};
pub use crate::core::value::Value;
pub use crate::core::value_path::{PathSegment, ValuePath};
pub use error::FormError;
pub use permissions::{Action, PermissionEvaluator, Permissions, Session};
pub use state::{ErrorMap, FormState, SubmissionStatus};
pub use submit::{Notification, Notifier, PathResolver, SubmitError};
