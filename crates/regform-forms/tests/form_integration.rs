//! Integration tests for the registration form.
//!
//! These tests drive the form the way a page would: values arrive through
//! registrations or submitted data, `handle_submit` validates them, and the
//! collaborator sees only validated records.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use regform_core::{RegformError, RegformResult, Settings, ValidationError, ValidationErrors};
use regform_forms::prelude::*;

// ============================================================================
// Shared helpers
// ============================================================================

/// What the recording collaborator does with a submission.
enum Behavior {
    Accept,
    Fail(&'static str),
    Reject(&'static str, &'static str),
}

/// Collaborator that records every call.
struct RecordingHandler {
    behavior: Behavior,
    calls: Mutex<Vec<FormValues>>,
}

impl RecordingHandler {
    fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<FormValues> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SubmitHandler for RecordingHandler {
    async fn submit(&self, data: FormValues) -> RegformResult<()> {
        self.calls.lock().unwrap().push(data);
        match self.behavior {
            Behavior::Accept => Ok(()),
            Behavior::Fail(reason) => Err(RegformError::Submission(reason.to_string())),
            Behavior::Reject(field, message) => {
                let mut errors = ValidationErrors::new();
                errors.add(field, ValidationError::new(message, "taken"));
                Err(RegformError::Validation(errors))
            }
        }
    }
}

/// Collaborator that stays pending until released.
#[derive(Default)]
struct GatedHandler {
    calls: AtomicUsize,
    started: Notify,
    release: Notify,
}

#[async_trait]
impl SubmitHandler for GatedHandler {
    async fn submit(&self, _data: FormValues) -> RegformResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.started.notify_one();
        self.release.notified().await;
        Ok(())
    }
}

/// Collaborator whose first call never finishes; later calls succeed.
#[derive(Default)]
struct StallingHandler {
    calls: AtomicUsize,
}

#[async_trait]
impl SubmitHandler for StallingHandler {
    async fn submit(&self, _data: FormValues) -> RegformResult<()> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            std::future::pending::<()>().await;
        }
        Ok(())
    }
}

/// Collaborator that panics.
struct PanickingHandler;

#[async_trait]
impl SubmitHandler for PanickingHandler {
    async fn submit(&self, _data: FormValues) -> RegformResult<()> {
        panic!("collaborator crashed");
    }
}

fn recording_form(behavior: Behavior) -> RegistrationForm<RecordingHandler> {
    RegistrationForm::new(RecordingHandler::new(behavior))
}

fn fill<H: SubmitHandler>(
    form: &RegistrationForm<H>,
    email: &str,
    password: &str,
    confirm: &str,
    terms: bool,
) {
    form.register(Field::Username).report_change("alice".into());
    form.register(Field::Email).report_change(email.into());
    form.register(Field::Password).report_change(password.into());
    form.register(Field::ConfirmPassword).report_change(confirm.into());
    form.register(Field::Terms).report_change(terms.into());
}

fn fill_valid<H: SubmitHandler>(form: &RegistrationForm<H>) {
    fill(form, "alice@example.com", "hunter2hunter2", "hunter2hunter2", true);
}

// ============================================================================
// Validation outcomes
// ============================================================================

#[tokio::test]
async fn test_valid_submission_calls_collaborator_once_with_exact_values() {
    let form = recording_form(Behavior::Accept);
    fill_valid(&form);

    assert_eq!(form.handle_submit().await, SubmitOutcome::Submitted);
    assert!(form.errors().is_empty());

    let calls = form.handler().calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0],
        FormValues {
            username: Some("alice".into()),
            email: "alice@example.com".into(),
            password: "hunter2hunter2".into(),
            confirm_password: "hunter2hunter2".into(),
            terms: true,
        }
    );
}

#[tokio::test]
async fn test_password_mismatch_is_single_error_on_confirm_password() {
    let form = recording_form(Behavior::Accept);
    fill(&form, "alice@example.com", "hunter2hunter2", "hunter3hunter3", true);

    let SubmitOutcome::Invalid(errors) = form.handle_submit().await else {
        panic!("expected validation failure");
    };
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.message("confirmPassword"), Some("Passwords do not match"));
    assert!(form.handler().calls().is_empty());
}

#[tokio::test]
async fn test_rejected_terms_hides_password_mismatch() {
    let form = recording_form(Behavior::Accept);
    fill(&form, "alice@example.com", "hunter2hunter2", "hunter3hunter3", false);

    let errors = form.validate().unwrap_err();
    assert_eq!(errors.fields(), vec!["terms"]);

    form.register(Field::Terms).report_change(true.into());
    let errors = form.validate().unwrap_err();
    assert_eq!(errors.fields(), vec!["confirmPassword"]);
    assert!(form.handler().calls().is_empty());
}

#[tokio::test]
async fn test_empty_email_is_required() {
    let form = recording_form(Behavior::Accept);
    fill(&form, "", "hunter2hunter2", "hunter2hunter2", true);

    let SubmitOutcome::Invalid(errors) = form.handle_submit().await else {
        panic!("expected validation failure");
    };
    assert_eq!(errors.message("email"), Some("Email is required"));
    assert_eq!(errors.len(), 1);
}

#[tokio::test]
async fn test_malformed_email_is_invalid() {
    let form = recording_form(Behavior::Accept);
    fill(&form, "not-an-email", "hunter2hunter2", "hunter2hunter2", true);

    let SubmitOutcome::Invalid(errors) = form.handle_submit().await else {
        panic!("expected validation failure");
    };
    assert_eq!(errors.message("email"), Some("Invalid email"));
    assert_eq!(
        form.error(Field::Email).map(|e| e.message),
        Some("Invalid email".to_string())
    );
}

#[tokio::test]
async fn test_short_password() {
    let form = recording_form(Behavior::Accept);
    fill(&form, "alice@example.com", "short1", "short1", true);

    let SubmitOutcome::Invalid(errors) = form.handle_submit().await else {
        panic!("expected validation failure");
    };
    assert_eq!(
        errors.message("password"),
        Some("Password must have more than 8 characters")
    );
    assert!(!errors.contains("confirmPassword"));
}

#[tokio::test]
async fn test_unchecked_terms_blocks_submission() {
    let form = recording_form(Behavior::Accept);
    fill(&form, "alice@example.com", "hunter2hunter2", "hunter2hunter2", false);

    let SubmitOutcome::Invalid(errors) = form.handle_submit().await else {
        panic!("expected validation failure");
    };
    assert_eq!(
        errors.message("terms"),
        Some("You must accept the terms and conditions")
    );
    assert!(form.handler().calls().is_empty());
}

#[tokio::test]
async fn test_omitted_terms_blocks_submission() {
    let form = recording_form(Behavior::Accept);
    form.register(Field::Email).report_change("alice@example.com".into());
    form.register(Field::Password).report_change("hunter2hunter2".into());
    form.register(Field::ConfirmPassword).report_change("hunter2hunter2".into());

    let SubmitOutcome::Invalid(errors) = form.handle_submit().await else {
        panic!("expected validation failure");
    };
    assert_eq!(errors.fields(), vec!["terms"]);
    assert!(form.handler().calls().is_empty());
}

#[tokio::test]
async fn test_validation_is_idempotent() {
    let form = recording_form(Behavior::Accept);
    fill(&form, "nope", "short", "other", false);

    let first = form.validate().unwrap_err();
    let second = form.validate().unwrap_err();
    assert_eq!(first, second);
    assert_eq!(form.errors(), second);
}

#[tokio::test]
async fn test_fixing_values_clears_previous_errors() {
    let form = recording_form(Behavior::Accept);
    fill(&form, "", "hunter2hunter2", "hunter2hunter2", true);
    assert!(matches!(form.handle_submit().await, SubmitOutcome::Invalid(_)));
    assert!(form.error(Field::Email).is_some());

    form.register(Field::Email).report_change("alice@example.com".into());
    assert_eq!(form.handle_submit().await, SubmitOutcome::Submitted);
    assert!(form.errors().is_empty());
}

// ============================================================================
// Submission lifecycle
// ============================================================================

#[tokio::test]
async fn test_second_submit_while_pending_is_blocked() {
    let form = RegistrationForm::new(GatedHandler::default());
    fill_valid(&form);

    let (first, second) = tokio::join!(form.handle_submit(), async {
        form.handler().started.notified().await;
        assert!(form.is_submitting());
        assert_eq!(form.status(), SubmitStatus::Submitting);
        assert!(form
            .render()
            .unwrap()
            .contains(r#"<button type="submit" disabled>"#));

        let outcome = form.handle_submit().await;
        form.handler().release.notify_one();
        outcome
    });

    assert_eq!(first, SubmitOutcome::Submitted);
    assert_eq!(second, SubmitOutcome::Blocked);
    assert_eq!(form.handler().calls.load(Ordering::SeqCst), 1);
    assert!(!form.is_submitting());
}

#[tokio::test]
async fn test_abandoned_submit_releases_control() {
    let form = RegistrationForm::new(StallingHandler::default());
    fill_valid(&form);

    let timed_out =
        tokio::time::timeout(Duration::from_millis(20), form.handle_submit()).await;
    assert!(timed_out.is_err());
    assert!(!form.is_submitting());
    assert_eq!(form.status(), SubmitStatus::Idle);
    assert!(form.render().unwrap().contains(r#"<button type="submit">"#));

    assert_eq!(form.handle_submit().await, SubmitOutcome::Submitted);
    assert_eq!(form.handler().calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_panicking_collaborator_releases_control() {
    let form = Arc::new(RegistrationForm::new(PanickingHandler));
    fill_valid(&form);

    let task_form = Arc::clone(&form);
    let joined = tokio::spawn(async move { task_form.handle_submit().await }).await;
    assert!(joined.is_err());
    assert!(!form.is_submitting());
    assert_eq!(form.status(), SubmitStatus::Idle);
}

#[tokio::test]
async fn test_collaborator_failure_reenables_submit() {
    let form = recording_form(Behavior::Fail("backend unavailable"));
    fill_valid(&form);

    let expected = Settings::default().submission_failed_message;
    assert_eq!(
        form.handle_submit().await,
        SubmitOutcome::Failed(expected.clone())
    );
    assert!(!form.is_submitting());
    assert_eq!(form.status(), SubmitStatus::Failed(expected.clone()));

    let html = form.render().unwrap();
    assert!(html.contains(&expected));
    assert!(!html.contains("backend unavailable"));
    assert!(html.contains(r#"<button type="submit">"#));

    // Values are kept so the user can retry.
    assert_eq!(form.values().text(Field::Email), Some("alice@example.com"));
    assert!(matches!(form.handle_submit().await, SubmitOutcome::Failed(_)));
    assert_eq!(form.handler().calls().len(), 2);
}

#[tokio::test]
async fn test_collaborator_field_errors_are_shown() {
    let form = recording_form(Behavior::Reject("email", "Email is already registered"));
    fill_valid(&form);

    let SubmitOutcome::Invalid(errors) = form.handle_submit().await else {
        panic!("expected rejection");
    };
    assert_eq!(errors.message("email"), Some("Email is already registered"));
    assert_eq!(
        form.binding(Field::Email).unwrap().error().map(|e| e.code.as_str()),
        Some("taken")
    );
    assert!(!form.is_submitting());
}

#[tokio::test]
async fn test_values_reset_after_success() {
    let form = recording_form(Behavior::Accept);
    fill_valid(&form);
    assert_eq!(form.handle_submit().await, SubmitOutcome::Submitted);
    assert!(form.values().is_empty());
    assert_eq!(form.status(), SubmitStatus::Succeeded);
}

#[tokio::test]
async fn test_values_kept_after_success_when_configured() {
    let settings = Settings {
        reset_on_success: false,
        ..Settings::default()
    };
    let form = RegistrationForm::with_settings(RecordingHandler::new(Behavior::Accept), settings);
    fill_valid(&form);
    assert_eq!(form.handle_submit().await, SubmitOutcome::Submitted);
    assert_eq!(form.values().checked(Field::Terms), Some(true));
}

#[tokio::test]
async fn test_shared_handler_through_arc() {
    let handler = Arc::new(RecordingHandler::new(Behavior::Accept));
    let form = RegistrationForm::new(Arc::clone(&handler));
    fill_valid(&form);
    assert_eq!(form.handle_submit().await, SubmitOutcome::Submitted);
    assert_eq!(handler.calls().len(), 1);
}

// ============================================================================
// Binding, observation, and rendering
// ============================================================================

#[tokio::test]
async fn test_bind_from_submitted_data() {
    let form = recording_form(Behavior::Accept);
    form.bind(&QueryDict::parse(
        "username=Jane+Doe&email=jane%40example.com&password=correct+horse\
         &confirmPassword=correct+horse&terms=on",
    ));

    assert_eq!(form.handle_submit().await, SubmitOutcome::Submitted);
    let calls = form.handler().calls();
    assert_eq!(calls[0].username.as_deref(), Some("Jane Doe"));
    assert_eq!(calls[0].password, "correct horse");
    assert!(calls[0].terms);
}

#[test]
fn test_watch_sees_every_change() {
    let form = recording_form(Behavior::Accept);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    form.watch("test", move |change: &FieldChange| {
        sink.lock().unwrap().push(change.field);
    });

    fill_valid(&form);
    form.bind(&QueryDict::parse("email=x%40y.co"));
    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            Field::Username,
            Field::Email,
            Field::Password,
            Field::ConfirmPassword,
            Field::Terms,
            Field::Email,
            Field::Terms,
        ]
    );

    assert!(form.unwatch("test"));
    form.register(Field::Email).report_change("z@y.co".into());
    assert_eq!(seen.lock().unwrap().len(), 7);
    assert!(!form.unwatch("test"));
}

#[test]
fn test_binding_input_updates_form() {
    let form = recording_form(Behavior::Accept);
    let binding = form.binding(Field::Username).unwrap();
    binding.input("alice");
    assert_eq!(form.values().text(Field::Username), Some("alice"));
}

#[test]
fn test_render_after_failed_validation() {
    let form = recording_form(Behavior::Accept);
    fill(&form, "not-an-email", "hunter2hunter2", "mismatch!", true);
    let _ = form.validate();

    let html = form.render().unwrap();
    for field in Field::ALL {
        assert!(html.contains(&format!(r#"id="{}""#, field.name())));
        assert!(html.contains(&format!(r#"for="{}""#, field.name())));
    }
    assert!(html.contains(r#"<span class="error" role="alert">Invalid email</span>"#));
    assert!(!html.contains("Passwords do not match"));
    assert!(html.contains(r#"value="not-an-email""#));
    assert!(!html.contains("hunter2hunter2"));
    assert!(html.contains("I accept the Terms and Conditions"));
}

#[test]
fn test_context_exposes_errors() {
    let form = recording_form(Behavior::Accept);
    let _ = form.validate();
    let ctx = form.as_context();
    assert_eq!(ctx["errors"]["email"]["message"], "Email is required");
    assert_eq!(ctx["fields"][0]["error"], serde_json::Value::Null);
    assert_eq!(ctx["fields"][4]["type"], "checkbox");
    assert_eq!(ctx["submit_label"], "Create an account");
}
