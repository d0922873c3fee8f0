//! Settings for regform.
//!
//! [`Settings`] holds the presentation strings, post-submit behavior, and
//! logging configuration. Every field has a default, so partial
//! configuration files only override what they name (see
//! [`settings_loader`](crate::settings_loader)).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The complete set of regform settings.
///
/// # Examples
///
/// ```
/// use regform_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(settings.reset_on_success);
/// assert_eq!(settings.submit_label, "Create an account");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    // ── Core ─────────────────────────────────────────────────────────

    /// Whether debug mode is enabled. Controls the log output format.
    pub debug: bool,

    // ── Form behavior ────────────────────────────────────────────────

    /// Whether values are cleared after a successful submission.
    pub reset_on_success: bool,
    /// Whether secret fields are masked when submitted data is logged.
    pub redact_secrets: bool,

    // ── Presentation ─────────────────────────────────────────────────

    /// The heading rendered above the form.
    pub heading: String,
    /// The text of the submit button.
    pub submit_label: String,
    /// The generic message shown when the submit collaborator fails.
    pub submission_failed_message: String,

    // ── Logging ──────────────────────────────────────────────────────

    /// The log level (e.g. "info", "debug", "warn").
    pub log_level: String,

    // ── Escape hatch ─────────────────────────────────────────────────

    /// Custom settings that don't fit into the above categories.
    pub extra: HashMap<String, serde_json::Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            reset_on_success: true,
            redact_secrets: true,
            heading: "Create an account".to_string(),
            submit_label: "Create an account".to_string(),
            submission_failed_message: "Something went wrong. Please try again.".to_string(),
            log_level: "info".to_string(),
            extra: HashMap::new(),
        }
    }
}
