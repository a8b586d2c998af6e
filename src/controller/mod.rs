//! Form lifecycle: edit, validate, submit, feedback, reset.
//!
//! [`FormController`] is a synchronous state machine driven by the UI loop.
//! [`FormController::submit`] runs a whole submission in one call. Loops that
//! must keep applying edits while a request is in flight use
//! [`FormController::begin_submit`] and [`FormController::complete_submit`]
//! instead; the payload is captured by `begin_submit`.

pub mod event;
pub mod options;

pub use event::FormEvent;
pub use options::FormOptions;

use crate::core::FieldName;
use crate::core::schema::FormSchema;
use crate::core::value::Value;
use crate::error::Result;
use crate::state::{ErrorMap, FormState, FormValidator, SubmissionStatus};
use crate::submit::{
    LastSegment, Notification, Notifier, PathResolver, SubmitError, TracingNotifier,
    map_validation_errors,
};
use crate::validators::FieldRules;
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, info, warn};

type SuccessHook = Box<dyn FnMut(&FormState, &dyn Any)>;
type FailureHook = Box<dyn FnMut(&SubmitError)>;

/// Result of [`FormController::submit`].
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome<T> {
    /// Local validation failed; the handler was not called.
    Invalid(ErrorMap),
    Succeeded(T),
    Failed(SubmitError),
}

impl<T> SubmitOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }
}

pub struct FormController {
    schema: Option<FormSchema>,
    snapshot: FormState,
    state: FormState,
    errors: ErrorMap,
    status: SubmissionStatus,
    options: FormOptions,
    validator: Option<FormValidator>,
    resolver: Box<dyn PathResolver>,
    notifier: Box<dyn Notifier>,
    on_success: Option<SuccessHook>,
    on_failure: Option<FailureHook>,
    events: Vec<FormEvent>,
}

impl FormController {
    /// Controller whose field set is taken from `initial`, any value kind allowed.
    pub fn new(initial: FormState) -> Self {
        Self {
            schema: None,
            snapshot: initial.clone(),
            state: initial,
            errors: ErrorMap::new(),
            status: SubmissionStatus::Idle,
            options: FormOptions::default(),
            validator: None,
            resolver: Box::new(LastSegment),
            notifier: Box::new(TracingNotifier),
            on_success: None,
            on_failure: None,
            events: vec![FormEvent::Initialized],
        }
    }

    /// Controller whose initial values must match `schema`.
    pub fn with_schema(schema: FormSchema, initial: FormState) -> Result<Self> {
        schema.check(initial.values())?;
        let mut controller = Self::new(initial);
        controller.schema = Some(schema);
        Ok(controller)
    }

    /// Controller starting from the schema's default values.
    pub fn from_schema(schema: FormSchema) -> Self {
        let initial = FormState::new(schema.defaults());
        let mut controller = Self::new(initial);
        controller.schema = Some(schema);
        controller
    }

    pub fn with_options(mut self, options: FormOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&FormState) -> ErrorMap + 'static,
    {
        self.validator = Some(Box::new(validator));
        self
    }

    pub fn with_rules(mut self, rules: FieldRules) -> Self {
        self.validator = Some(rules.into_validator());
        self
    }

    pub fn with_resolver(mut self, resolver: impl PathResolver + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    /// Called with the submitted payload and the handler's result, which
    /// can be recovered with `downcast_ref`.
    pub fn on_success(mut self, hook: impl FnMut(&FormState, &dyn Any) + 'static) -> Self {
        self.on_success = Some(Box::new(hook));
        self
    }

    pub fn on_failure(mut self, hook: impl FnMut(&SubmitError) + 'static) -> Self {
        self.on_failure = Some(Box::new(hook));
        self
    }

    // -----------------------------------------------------------------------
    // State
    // -----------------------------------------------------------------------

    pub fn values(&self) -> &FormState {
        &self.state
    }

    pub fn value(&self, field: &str) -> Option<&Value> {
        self.state.get(field)
    }

    pub fn snapshot(&self) -> &FormState {
        &self.snapshot
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field)
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status
    }

    pub fn is_submitting(&self) -> bool {
        self.status.is_submitting()
    }

    pub fn options(&self) -> &FormOptions {
        &self.options
    }

    /// True while the values differ from the initialization snapshot.
    pub fn has_changes(&self) -> bool {
        self.state != self.snapshot
    }

    pub fn changed_fields(&self) -> Vec<FieldName> {
        self.state.changed_fields(&self.snapshot).cloned().collect()
    }

    pub fn take_events(&mut self) -> Vec<FormEvent> {
        self.events.drain(..).collect()
    }

    // -----------------------------------------------------------------------
    // Editing
    // -----------------------------------------------------------------------

    /// Replaces all state with `initial`, which becomes the new snapshot.
    pub fn initialize(&mut self, initial: FormState) -> Result<()> {
        if let Some(schema) = &self.schema {
            schema.check(initial.values())?;
        }
        debug!(fields = initial.len(), "form initialized");
        self.snapshot = initial.clone();
        self.state = initial;
        self.errors.clear();
        self.status = SubmissionStatus::Idle;
        self.events.push(FormEvent::Initialized);
        Ok(())
    }

    /// Re-initializes only when `initial` differs from the current snapshot.
    pub fn sync_initial_values(&mut self, initial: FormState) -> Result<bool> {
        if initial == self.snapshot {
            return Ok(false);
        }
        self.initialize(initial)?;
        Ok(true)
    }

    /// Sets one field and clears its error. Edits are applied while a
    /// submission is in flight; the captured payload is unaffected.
    pub fn update_field(&mut self, field: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        if let Some(schema) = &self.schema {
            schema.check_value(field, &value)?;
        }
        let previous = self.state.replace(field, value.clone())?;
        if previous != value {
            debug!(field, "field updated");
            self.events.push(FormEvent::FieldChanged {
                field: field.into(),
                value,
            });
        }
        if self.errors.clear_error(field) {
            self.events.push(FormEvent::ErrorCleared {
                field: field.into(),
            });
        }
        if self.options.continuous_validation {
            self.validate();
        }
        Ok(())
    }

    /// Shows an error next to `field`, e.g. from a separate availability check.
    pub fn set_field_error(&mut self, field: impl Into<FieldName>, error: impl Into<String>) {
        self.errors.set_error(field, error);
    }

    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }

    /// Runs the local validator and stores its result. Without a validator
    /// the error map is emptied and the form counts as valid.
    pub fn validate(&mut self) -> &ErrorMap {
        self.errors = match &self.validator {
            Some(validator) => validator(&self.state),
            None => ErrorMap::new(),
        };
        if !self.errors.is_empty() {
            debug!(errors = self.errors.len(), "local validation failed");
            self.events.push(FormEvent::ValidationFailed {
                fields: self.errors.fields().cloned().collect(),
            });
        }
        &self.errors
    }

    pub fn reset(&mut self) {
        debug!("form reset");
        self.restore_snapshot();
        self.status = SubmissionStatus::Idle;
        self.events.push(FormEvent::Reset);
    }

    /// Runs `close` unless a submission is in flight. Returns whether the
    /// form closed.
    pub fn handle_close(&mut self, close: impl FnOnce()) -> bool {
        if self.is_submitting() {
            warn!("close refused while submitting");
            self.events.push(FormEvent::CloseRefused);
            return false;
        }
        if self.options.reset_on_close {
            self.reset();
        }
        close();
        info!("form closed");
        self.events.push(FormEvent::Closed);
        true
    }

    // -----------------------------------------------------------------------
    // Submission
    // -----------------------------------------------------------------------

    /// Validates and, when valid, enters `Submitting` and returns the payload
    /// to send. Returns `None` with the status untouched when invalid.
    ///
    /// Overlapping submissions are the caller's to prevent.
    pub fn begin_submit(&mut self) -> Option<FormState> {
        if self.is_submitting() {
            warn!("submission started while another is in flight");
        }
        if !self.validate().is_empty() {
            return None;
        }
        info!(fields = self.state.len(), "submitting form");
        self.status = SubmissionStatus::Submitting;
        self.events.push(FormEvent::SubmitStarted);
        Some(self.state.clone())
    }

    /// Applies the handler result for `payload` and leaves `Submitting`.
    pub fn complete_submit<T: Any>(&mut self, payload: &FormState, result: &Result<T, SubmitError>) {
        match result {
            Ok(response) => self.finish_success(payload, response),
            Err(error) => self.finish_failure(error),
        }
    }

    /// Full submission: validate, call `handler` with the captured payload,
    /// then apply the outcome. A handler that panics counts as a failure.
    pub async fn submit<F, Fut, T>(&mut self, handler: F) -> SubmitOutcome<T>
    where
        F: FnOnce(FormState) -> Fut,
        Fut: Future<Output = Result<T, SubmitError>>,
        T: Any,
    {
        let Some(payload) = self.begin_submit() else {
            return SubmitOutcome::Invalid(self.errors.clone());
        };
        let result = run_handler(handler, payload.clone()).await;
        self.complete_submit(&payload, &result);
        match result {
            Ok(value) => SubmitOutcome::Succeeded(value),
            Err(error) => SubmitOutcome::Failed(error),
        }
    }

    fn finish_success(&mut self, payload: &FormState, response: &dyn Any) {
        info!("form submitted");
        self.status = SubmissionStatus::Succeeded;
        if let Some(message) = &self.options.success_message {
            self.notifier.notify(Notification::Success(message.clone()));
        }
        if let Some(hook) = self.on_success.as_mut() {
            hook(payload, response);
        }
        if self.options.reset_on_success {
            self.restore_snapshot();
        }
        self.events.push(FormEvent::SubmitSucceeded);
    }

    fn finish_failure(&mut self, error: &SubmitError) {
        self.status = SubmissionStatus::Failed;

        let field_errors = error
            .validation_entries(self.options.validation_status)
            .map(|entries| map_validation_errors(&entries, &*self.resolver))
            .unwrap_or_default();
        let mapped = field_errors.len();

        if field_errors.is_empty() {
            let message = error.user_message(&self.options.error_message);
            warn!(error = %error, %message, "form submission failed");
            self.notifier.notify(Notification::Error(message));
        } else {
            warn!(error = %error, fields = mapped, "form submission rejected by server validation");
            self.errors.extend(field_errors);
        }

        if let Some(hook) = self.on_failure.as_mut() {
            hook(error);
        }
        self.events.push(FormEvent::SubmitFailed {
            field_errors: mapped,
        });
    }

    fn restore_snapshot(&mut self) {
        self.state = self.snapshot.clone();
        self.errors.clear();
    }
}

async fn run_handler<F, Fut, T>(handler: F, payload: FormState) -> Result<T, SubmitError>
where
    F: FnOnce(FormState) -> Fut,
    Fut: Future<Output = Result<T, SubmitError>>,
{
    let future = match panic::catch_unwind(AssertUnwindSafe(move || handler(payload))) {
        Ok(future) => future,
        Err(panic) => return Err(SubmitError::Panicked(panic_message(&*panic))),
    };
    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(result) => result,
        Err(panic) => Err(SubmitError::Panicked(panic_message(&*panic))),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        return (*message).to_string();
    }
    if let Some(message) = panic.downcast_ref::<String>() {
        return message.clone();
    }
    "unknown panic".to_string()
}
