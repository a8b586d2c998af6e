pub mod form_state;
pub mod status;
pub mod validation;

pub use form_state::FormState;
pub use status::SubmissionStatus;
pub use validation::{ErrorMap, FormValidator};
