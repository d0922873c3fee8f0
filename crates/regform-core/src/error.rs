//! Core error types for regform.
//!
//! [`ValidationError`] is a single field-level failure, [`ValidationErrors`]
//! is the complete result of one validation pass, and [`RegformError`] is the
//! top-level error enum covering validation, submission, and configuration.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// A single validation failure attached to one field.
///
/// # Examples
///
/// ```
/// use regform_core::error::ValidationError;
///
/// let err = ValidationError::new("Email is required", "required");
/// assert_eq!(err.to_string(), "Email is required");
/// assert_eq!(err.code, "required");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// The human-readable message shown next to the field.
    pub message: String,
    /// A short code identifying the failed rule (e.g. "required", "invalid").
    pub code: String,
}

impl ValidationError {
    /// Creates a new `ValidationError` with a message and code.
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}

/// The errors produced by one validation pass, keyed by field path.
///
/// Entries keep the order in which rules were evaluated. A field holds at
/// most one error: the first rule that failed for it.
///
/// # Examples
///
/// ```
/// use regform_core::error::{ValidationError, ValidationErrors};
///
/// let mut errors = ValidationErrors::new();
/// assert!(errors.add("email", ValidationError::new("Email is required", "required")));
/// assert!(!errors.add("email", ValidationError::new("Invalid email", "invalid")));
/// assert_eq!(errors.message("email"), Some("Email is required"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    entries: Vec<(String, ValidationError)>,
}

impl ValidationErrors {
    /// Creates an empty error set.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Records `error` for `field` unless the field already has one.
    ///
    /// Returns `true` if the error was recorded.
    pub fn add(&mut self, field: impl Into<String>, error: ValidationError) -> bool {
        let field = field.into();
        if self.contains(&field) {
            return false;
        }
        self.entries.push((field, error));
        true
    }

    /// Returns the error for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&ValidationError> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, error)| error)
    }

    /// Returns the message for `field`, if any.
    pub fn message(&self, field: &str) -> Option<&str> {
        self.get(field).map(|e| e.message.as_str())
    }

    /// Returns `true` if `field` has an error.
    pub fn contains(&self, field: &str) -> bool {
        self.entries.iter().any(|(name, _)| name == field)
    }

    /// Returns `true` if no errors were recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of fields with errors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterates over `(field, error)` pairs in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ValidationError)> {
        self.entries.iter().map(|(name, error)| (name.as_str(), error))
    }

    /// Returns the field paths that have errors, in evaluation order.
    pub fn fields(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, error) in &self.entries {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{field}: {error}")?;
            first = false;
        }
        Ok(())
    }
}

impl Serialize for ValidationErrors {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, error) in &self.entries {
            map.serialize_entry(field, error)?;
        }
        map.end()
    }
}

/// The primary error type for regform.
#[derive(Error, Debug)]
pub enum RegformError {
    // ── Validation ───────────────────────────────────────────────────

    /// One or more fields failed validation.
    #[error("Validation error: {0}")]
    Validation(ValidationErrors),

    // ── Submission ───────────────────────────────────────────────────

    /// The submit collaborator failed after validation succeeded.
    #[error("Submission failed: {0}")]
    Submission(String),

    /// A submission was attempted while another one was still pending.
    #[error("A submission is already in progress")]
    SubmitInProgress,

    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // ── Serialization ────────────────────────────────────────────────

    /// An error occurred during serialization or deserialization.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl RegformError {
    /// Returns `true` for errors the user can fix by editing the form.
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<ValidationErrors> for RegformError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

/// A convenience type alias for `Result<T, RegformError>`.
pub type RegformResult<T> = Result<T, RegformError>;
