//! Field bindings: a labeled input wired to a registration.
//!
//! A [`FieldBinding`] renders one input with its label and, when a
//! validation error is attached, the error message directly below the
//! input. It holds no validation logic; input reaches the form only through
//! the [`Registration`] it was given.

use std::collections::BTreeMap;
use std::fmt;

use regform_core::{RegformError, RegformResult, ValidationError};

use crate::fields::FieldValue;
use crate::registration::Registration;
use crate::widgets::{self, escape_html, InputType, Widget};

/// A labeled input bound to a form field.
pub struct FieldBinding<'a> {
    id: String,
    label: String,
    input_type: InputType,
    registration: &'a dyn Registration,
    error: Option<ValidationError>,
    disabled: bool,
    widget: Box<dyn Widget>,
}

impl fmt::Debug for FieldBinding<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldBinding")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("input_type", &self.input_type)
            .field("field", &self.registration.field())
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<'a> FieldBinding<'a> {
    /// Creates a binding with no error attached.
    ///
    /// # Errors
    ///
    /// Returns [`RegformError::ConfigurationError`] if `id` is empty.
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        input_type: InputType,
        registration: &'a dyn Registration,
    ) -> RegformResult<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(RegformError::ConfigurationError(format!(
                "field binding for '{}' needs a non-empty id",
                registration.field()
            )));
        }
        Ok(Self {
            id,
            label: label.into(),
            input_type,
            registration,
            error: None,
            disabled: false,
            widget: widgets::create_widget(input_type),
        })
    }

    /// Attaches the error from the latest validation pass, if any.
    #[must_use]
    pub fn with_error(mut self, error: Option<ValidationError>) -> Self {
        self.error = error;
        self
    }

    /// Renders the input as disabled.
    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Returns the HTML `id` of the input.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the display label, also used as the placeholder.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the input kind.
    pub const fn input_type(&self) -> InputType {
        self.input_type
    }

    /// Returns the attached error, if any.
    pub const fn error(&self) -> Option<&ValidationError> {
        self.error.as_ref()
    }

    /// Returns `true` if an error is attached.
    pub const fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Forwards a new input value to the registration.
    pub fn input(&self, value: impl Into<FieldValue>) {
        self.registration.report_change(value.into());
    }

    /// Renders the `<label>` element.
    pub fn label_tag(&self) -> String {
        format!(
            r#"<label for="{}">{}</label>"#,
            escape_html(&self.widget.id_for_label(&self.id)),
            escape_html(&self.label)
        )
    }

    /// Renders the `<input>` element with the field's current value.
    pub fn render_input(&self) -> String {
        let mut attrs = BTreeMap::new();
        attrs.insert("id".to_string(), self.id.clone());
        if self.input_type.is_textual() {
            attrs.insert("placeholder".to_string(), self.label.clone());
        }
        if self.error.is_some() {
            attrs.insert("aria-invalid".to_string(), "true".to_string());
        }
        if self.disabled {
            attrs.insert("disabled".to_string(), String::new());
        }
        let value = self.registration.current_value();
        self.widget
            .render(self.registration.field().name(), value.as_ref(), &attrs)
    }

    /// Renders the error line, or an empty string without an error.
    pub fn render_error(&self) -> String {
        self.error.as_ref().map_or_else(String::new, |error| {
            format!(
                r#"<span class="error" role="alert">{}</span>"#,
                escape_html(&error.message)
            )
        })
    }

    /// Renders the label, the input, and the error line.
    ///
    /// Checkboxes place the input before its label.
    pub fn render(&self) -> String {
        let (first, second) = if self.input_type == InputType::Checkbox {
            (self.render_input(), self.label_tag())
        } else {
            (self.label_tag(), self.render_input())
        };
        format!(
            r#"<div class="field">{first}{second}{}</div>"#,
            self.render_error()
        )
    }
}

impl fmt::Display for FieldBinding<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}
