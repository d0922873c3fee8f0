//! The registration form.
//!
//! [`RegistrationForm`] owns the current values, one [`FieldRegistration`]
//! per field, the error set from the latest validation pass, and the submit
//! collaborator. Validation runs as `Idle -> Validating -> {Valid, Invalid}`
//! and always returns to `Idle`; a valid pass hands the typed values to the
//! collaborator exactly once.
//!
//! ## Example
//!
//! ```
//! use regform_forms::prelude::*;
//!
//! let form: RegistrationForm = RegistrationForm::default();
//! form.register(Field::Email).report_change("not-an-email".into());
//!
//! let errors = form.validate().unwrap_err();
//! assert_eq!(errors.message("email"), Some("Invalid email"));
//! assert_eq!(form.state(), ValidationState::Idle);
//! ```

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use serde_json::json;
use tracing::Instrument;

use regform_core::logging::submission_span;
use regform_core::{RegformError, RegformResult, Settings, ValidationError, ValidationErrors};
use regform_signals::SignalReceiver;

use crate::binding::FieldBinding;
use crate::fields::{Field, FieldValue};
use crate::querydict::QueryDict;
use crate::registration::{FieldChange, FieldRegistration, FormStore, Registration};
use crate::schema::{registration_schema, Schema};
use crate::submit::{LoggingSubmitHandler, SubmitHandler};
use crate::values::{FormValues, RawValues};
use crate::widgets::{self, escape_html};

/// Where the form is in a validation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationState {
    /// The user is editing. Initial state, and the state after every pass.
    Idle,
    /// A validation pass is evaluating the current values.
    Validating,
    /// The last pass succeeded.
    Valid,
    /// The last pass produced errors.
    Invalid,
}

/// The state of the submit collaborator call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitStatus {
    /// No submission has happened since mount or reset.
    Idle,
    /// The collaborator is being awaited; the submit control is disabled.
    Submitting,
    /// The last submission was accepted.
    Succeeded,
    /// The last submission failed with the given user-facing message.
    Failed(String),
}

impl SubmitStatus {
    /// Returns a short machine-readable name for the status.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Submitting => "submitting",
            Self::Succeeded => "succeeded",
            Self::Failed(_) => "failed",
        }
    }
}

/// The result of one call to [`RegistrationForm::handle_submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation passed and the collaborator accepted the data.
    Submitted,
    /// Validation failed; the collaborator was not called.
    Invalid(ValidationErrors),
    /// Another submission was still pending; nothing was done.
    Blocked,
    /// The collaborator failed; carries the user-facing message.
    Failed(String),
}

/// Claim on the form's submitting flag for one collaborator call.
///
/// Dropping the guard releases the flag and returns a status still marked
/// `Submitting` to `Idle`, so a cancelled or panicking call never leaves
/// the submit control disabled.
struct SubmitGuard<'a> {
    flag: &'a AtomicBool,
    status: &'a RwLock<SubmitStatus>,
}

impl<'a> SubmitGuard<'a> {
    /// Sets the flag, or returns `None` if it is already set.
    fn claim(flag: &'a AtomicBool, status: &'a RwLock<SubmitStatus>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        *status.write().unwrap_or_else(PoisonError::into_inner) = SubmitStatus::Submitting;
        Some(Self { flag, status })
    }
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        let mut status = self.status.write().unwrap_or_else(PoisonError::into_inner);
        if *status == SubmitStatus::Submitting {
            tracing::warn!("Submission abandoned before the collaborator finished");
            *status = SubmitStatus::Idle;
        }
        drop(status);
        self.flag.store(false, Ordering::Release);
    }
}

/// A registration form with five fields and an async submit collaborator.
pub struct RegistrationForm<H = LoggingSubmitHandler> {
    schema: Schema,
    settings: Settings,
    store: Arc<FormStore>,
    registrations: Vec<FieldRegistration>,
    errors: RwLock<ValidationErrors>,
    state: RwLock<ValidationState>,
    status: RwLock<SubmitStatus>,
    is_submitting: AtomicBool,
    attempts: AtomicU64,
    handler: H,
}

impl Default for RegistrationForm<LoggingSubmitHandler> {
    fn default() -> Self {
        Self::from_settings(Settings::default())
    }
}

impl RegistrationForm<LoggingSubmitHandler> {
    /// Creates a form whose collaborator logs submissions, honoring
    /// `settings.redact_secrets`.
    pub fn from_settings(settings: Settings) -> Self {
        let handler = LoggingSubmitHandler {
            redact_secrets: settings.redact_secrets,
        };
        Self::with_settings(handler, settings)
    }
}

impl<H: SubmitHandler> RegistrationForm<H> {
    /// Creates a form with default settings.
    pub fn new(handler: H) -> Self {
        Self::with_settings(handler, Settings::default())
    }

    /// Creates a form with the given settings.
    pub fn with_settings(handler: H, settings: Settings) -> Self {
        let store = Arc::new(FormStore::new());
        let registrations = Field::ALL
            .into_iter()
            .map(|field| FieldRegistration::new(field, Arc::clone(&store)))
            .collect();
        Self {
            schema: registration_schema(),
            settings,
            store,
            registrations,
            errors: RwLock::new(ValidationErrors::new()),
            state: RwLock::new(ValidationState::Idle),
            status: RwLock::new(SubmitStatus::Idle),
            is_submitting: AtomicBool::new(false),
            attempts: AtomicU64::new(0),
            handler,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// Returns the settings.
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns the validation schema.
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns the submit collaborator.
    pub const fn handler(&self) -> &H {
        &self.handler
    }

    /// Returns the registration for `field`.
    ///
    /// The same registration is returned for the lifetime of the form.
    pub fn register(&self, field: Field) -> &FieldRegistration {
        &self.registrations[field.index()]
    }

    /// Returns a copy of the current values.
    pub fn values(&self) -> RawValues {
        self.store.snapshot()
    }

    /// Returns the errors of the latest validation pass.
    pub fn errors(&self) -> ValidationErrors {
        self.errors.read().expect("form errors lock poisoned").clone()
    }

    /// Returns the error for `field` from the latest validation pass.
    pub fn error(&self, field: Field) -> Option<ValidationError> {
        self.errors
            .read()
            .expect("form errors lock poisoned")
            .get(field.name())
            .cloned()
    }

    /// Returns the validation state.
    pub fn state(&self) -> ValidationState {
        *self.state.read().expect("form state lock poisoned")
    }

    /// Returns the submission status.
    pub fn status(&self) -> SubmitStatus {
        self.status.read().expect("form status lock poisoned").clone()
    }

    /// Returns `true` while the collaborator is being awaited.
    pub fn is_submitting(&self) -> bool {
        self.is_submitting.load(Ordering::Acquire)
    }

    // ── Input ────────────────────────────────────────────────────────

    /// Builds the binding that renders `field` with its current error.
    ///
    /// # Errors
    ///
    /// Returns an error if the binding cannot be constructed.
    pub fn binding(&self, field: Field) -> RegformResult<FieldBinding<'_>> {
        Ok(FieldBinding::new(
            field.name(),
            field.label(),
            field.input_type(),
            self.register(field),
        )?
        .with_error(self.error(field))
        .disabled(self.is_submitting()))
    }

    /// Replaces the values with those found in submitted form data.
    ///
    /// Every value is reported through the field's registration, so
    /// watchers see each one. A missing checkbox is reported as unchecked;
    /// missing text fields stay absent. Errors from earlier passes are
    /// cleared.
    pub fn bind(&self, data: &QueryDict) {
        self.store.clear();
        self.replace_errors(ValidationErrors::new());
        for field in Field::ALL {
            let widget = widgets::create_widget(field.input_type());
            if let Some(value) = widget.value_from_data(data, field.name()) {
                self.register(field).report_change(value);
            }
        }
    }

    /// Connects `receiver` to value-change notifications under `id`.
    ///
    /// Connecting again with the same `id` replaces the earlier receiver.
    pub fn watch<F>(&self, id: impl Into<String>, receiver: F)
    where
        F: Fn(&FieldChange) + Send + Sync + 'static,
    {
        let receiver: SignalReceiver<FieldChange> = Arc::new(receiver);
        self.store.changed.connect(id, receiver);
    }

    /// Disconnects the watcher registered under `id`.
    ///
    /// Returns `true` if one was connected.
    pub fn unwatch(&self, id: &str) -> bool {
        self.store.changed.disconnect(id)
    }

    // ── Validation & submission ─────────────────────────────────────

    fn set_state(&self, state: ValidationState) {
        *self.state.write().expect("form state lock poisoned") = state;
    }

    fn set_status(&self, status: SubmitStatus) {
        *self.status.write().expect("form status lock poisoned") = status;
    }

    fn replace_errors(&self, errors: ValidationErrors) {
        *self.errors.write().expect("form errors lock poisoned") = errors;
    }

    /// Runs one validation pass over a snapshot of the current values.
    ///
    /// The pass replaces the error set entirely and leaves the form
    /// `Idle`.
    ///
    /// # Errors
    ///
    /// Returns the errors of the pass if any rule fails.
    pub fn validate(&self) -> Result<FormValues, ValidationErrors> {
        self.set_state(ValidationState::Validating);
        let snapshot = self.store.snapshot();
        let result = self.schema.validate(&snapshot);

        match &result {
            Ok(_) => {
                self.set_state(ValidationState::Valid);
                tracing::debug!("Validation passed");
                self.replace_errors(ValidationErrors::new());
            }
            Err(errors) => {
                self.set_state(ValidationState::Invalid);
                tracing::debug!(error_count = errors.len(), errors = %errors, "Validation failed");
                self.replace_errors(errors.clone());
            }
        }

        self.set_state(ValidationState::Idle);
        result
    }

    /// Validates and, if valid, submits the values to the collaborator.
    ///
    /// A call made while an earlier submission is still pending returns
    /// [`SubmitOutcome::Blocked`] without validating or calling the
    /// collaborator.
    pub async fn handle_submit(&self) -> SubmitOutcome {
        if self.is_submitting() {
            tracing::warn!("Submission blocked: another submission is pending");
            return SubmitOutcome::Blocked;
        }

        let data = match self.validate() {
            Ok(data) => data,
            Err(errors) => return SubmitOutcome::Invalid(errors),
        };

        let Some(_guard) = SubmitGuard::claim(&self.is_submitting, &self.status) else {
            tracing::warn!("Submission blocked: another submission is pending");
            return SubmitOutcome::Blocked;
        };

        let attempt = self.attempts.fetch_add(1, Ordering::Relaxed) + 1;
        let span = submission_span(attempt);
        let result = self.handler.submit(data).instrument(span.clone()).await;

        span.in_scope(|| self.finish_submission(result))
    }

    fn finish_submission(&self, result: RegformResult<()>) -> SubmitOutcome {
        match result {
            Ok(()) => {
                tracing::info!("Submission succeeded");
                self.set_status(SubmitStatus::Succeeded);
                if self.settings.reset_on_success {
                    self.store.clear();
                }
                SubmitOutcome::Submitted
            }
            Err(RegformError::Validation(rejected)) => {
                tracing::debug!(errors = %rejected, "Submission rejected with field errors");
                let merged = {
                    let mut errors = self.errors.write().expect("form errors lock poisoned");
                    for (field, error) in rejected.iter() {
                        errors.add(field, error.clone());
                    }
                    errors.clone()
                };
                self.set_status(SubmitStatus::Idle);
                SubmitOutcome::Invalid(merged)
            }
            Err(error) => {
                tracing::warn!(error = %error, "Submission failed");
                let message = self.settings.submission_failed_message.clone();
                self.set_status(SubmitStatus::Failed(message.clone()));
                SubmitOutcome::Failed(message)
            }
        }
    }

    /// Clears values, errors, and submission status.
    pub fn reset(&self) {
        self.store.clear();
        self.replace_errors(ValidationErrors::new());
        self.set_status(SubmitStatus::Idle);
        self.set_state(ValidationState::Idle);
    }

    // ── Rendering ────────────────────────────────────────────────────

    /// Renders the whole form as HTML.
    ///
    /// # Errors
    ///
    /// Returns an error if a field binding cannot be constructed.
    pub fn render(&self) -> RegformResult<String> {
        let mut html = String::from(r#"<form class="registration" novalidate>"#);
        html.push_str(&format!("<h1>{}</h1>", escape_html(&self.settings.heading)));

        if let SubmitStatus::Failed(message) = self.status() {
            html.push_str(&format!(
                r#"<p class="form-error" role="alert">{}</p>"#,
                escape_html(&message)
            ));
        }

        for field in Field::ALL {
            html.push_str(&self.binding(field)?.render());
        }

        let disabled = if self.is_submitting() { " disabled" } else { "" };
        html.push_str(&format!(
            r#"<button type="submit"{disabled}>{}</button>"#,
            escape_html(&self.settings.submit_label)
        ));
        html.push_str("</form>");
        Ok(html)
    }

    /// Returns a JSON context describing the form for external templates.
    ///
    /// Secret values are never included.
    pub fn as_context(&self) -> serde_json::Value {
        let values = self.values();
        let errors = self.errors();
        let status = self.status();

        let fields: Vec<serde_json::Value> = Field::ALL
            .into_iter()
            .map(|field| {
                let value = if field.is_secret() {
                    serde_json::Value::Null
                } else {
                    match values.get(field) {
                        Some(FieldValue::Text(text)) => json!(text),
                        Some(FieldValue::Checked(checked)) => json!(checked),
                        None => serde_json::Value::Null,
                    }
                };
                json!({
                    "name": field.name(),
                    "id": field.name(),
                    "label": field.label(),
                    "type": field.input_type().as_str(),
                    "value": value,
                    "error": errors.message(field.name()),
                })
            })
            .collect();

        let message = match &status {
            SubmitStatus::Failed(message) => Some(message.clone()),
            _ => None,
        };

        json!({
            "heading": self.settings.heading,
            "submit_label": self.settings.submit_label,
            "fields": fields,
            "errors": errors,
            "is_submitting": self.is_submitting(),
            "status": status.as_str(),
            "status_message": message,
        })
    }
}
