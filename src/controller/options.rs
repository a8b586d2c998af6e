use crate::error::Result;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ERROR_MESSAGE: &str = "An error occurred";
pub const DEFAULT_VALIDATION_STATUS: u16 = 422;

/// Per-form behaviour switches.
///
/// Reset behaviour differs between call sites, so both knobs are explicit:
/// values survive a successful submit unless `reset_on_success` is set, and
/// closing a form resets it unless `reset_on_close` is cleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormOptions {
    pub reset_on_success: bool,
    pub reset_on_close: bool,
    pub success_message: Option<String>,
    pub error_message: String,
    /// Re-run the validator after every field update.
    pub continuous_validation: bool,
    /// Failure status whose `detail` list is mapped onto fields.
    pub validation_status: u16,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            reset_on_success: false,
            reset_on_close: true,
            success_message: None,
            error_message: DEFAULT_ERROR_MESSAGE.to_string(),
            continuous_validation: false,
            validation_status: DEFAULT_VALIDATION_STATUS,
        }
    }
}

impl FormOptions {
    pub fn from_json_str(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn from_yaml_str(input: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(input)?)
    }

    pub fn with_reset_on_success(mut self, reset_on_success: bool) -> Self {
        self.reset_on_success = reset_on_success;
        self
    }

    pub fn with_reset_on_close(mut self, reset_on_close: bool) -> Self {
        self.reset_on_close = reset_on_close;
        self
    }

    pub fn with_success_message(mut self, message: impl Into<String>) -> Self {
        self.success_message = Some(message.into());
        self
    }

    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = message.into();
        self
    }

    pub fn with_continuous_validation(mut self, enabled: bool) -> Self {
        self.continuous_validation = enabled;
        self
    }

    pub fn with_validation_status(mut self, status: u16) -> Self {
        self.validation_status = status;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_ERROR_MESSAGE, FormOptions};
    use crate::error::FormError;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let options = FormOptions::from_json_str(r#"{ "reset_on_success": true }"#).expect("options");
        assert!(options.reset_on_success);
        assert!(options.reset_on_close);
        assert_eq!(options.error_message, DEFAULT_ERROR_MESSAGE);
        assert_eq!(options.validation_status, 422);
    }

    #[test]
    fn yaml_options_parse() {
        let options = FormOptions::from_yaml_str(
            "reset_on_close: false\nsuccess_message: Supplier saved\ncontinuous_validation: true\n",
        )
        .expect("options");
        assert!(!options.reset_on_close);
        assert_eq!(options.success_message.as_deref(), Some("Supplier saved"));
        assert!(options.continuous_validation);
    }

    #[test]
    fn malformed_input_is_reported() {
        assert!(matches!(FormOptions::from_json_str("{"), Err(FormError::Json(_))));
        assert!(matches!(
            FormOptions::from_yaml_str("reset_on_close: [1"),
            Err(FormError::Yaml(_))
        ));
    }
}
