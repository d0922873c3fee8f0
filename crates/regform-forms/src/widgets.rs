//! Widget system for rendering HTML inputs.
//!
//! Each widget knows how to render itself for a field, read the field's
//! value back out of submitted form data, and name the `id` its `<label>`
//! points at.

use std::collections::BTreeMap;
use std::fmt;

use crate::fields::FieldValue;
use crate::querydict::QueryDict;

/// The input kinds a field can be rendered as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputType {
    /// `<input type="text">`.
    Text,
    /// `<input type="email">`.
    Email,
    /// `<input type="password">`.
    Password,
    /// `<input type="checkbox">`.
    Checkbox,
}

impl InputType {
    /// Returns the HTML `type` attribute value.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Password => "password",
            Self::Checkbox => "checkbox",
        }
    }

    /// Returns `true` for the kinds that hold text.
    pub const fn is_textual(self) -> bool {
        !matches!(self, Self::Checkbox)
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A trait for HTML input widgets.
///
/// All widgets must be `Send + Sync` so bindings can be rendered from any
/// thread.
pub trait Widget: Send + Sync + fmt::Debug {
    /// Returns the input kind.
    fn input_type(&self) -> InputType;

    /// Renders the input as an HTML string.
    ///
    /// # Arguments
    /// - `name` - The HTML `name` attribute
    /// - `value` - The current value (if any)
    /// - `attrs` - Additional HTML attributes
    fn render(&self, name: &str, value: Option<&FieldValue>, attrs: &BTreeMap<String, String>)
        -> String;

    /// Extracts the value for `name` from submitted form data.
    ///
    /// Returns `None` if the data carries no value for this input.
    fn value_from_data(&self, data: &QueryDict, name: &str) -> Option<FieldValue>;

    /// Returns the `id` a label targeting this widget should use.
    fn id_for_label(&self, id: &str) -> String {
        id.to_string()
    }
}

/// Escapes text for use in HTML content and attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Formats an attributes map into a string like ` key="value" key2="value2"`.
///
/// An empty value renders as a bare boolean attribute (` disabled`).
fn render_attrs(attrs: &BTreeMap<String, String>) -> String {
    attrs
        .iter()
        .map(|(k, v)| {
            if v.is_empty() {
                format!(" {k}")
            } else {
                format!(r#" {k}="{}""#, escape_html(v))
            }
        })
        .collect()
}

fn render_text_input(
    input_type: InputType,
    name: &str,
    value: Option<&FieldValue>,
    attrs: &BTreeMap<String, String>,
) -> String {
    let val = value.and_then(FieldValue::as_text).unwrap_or("");
    format!(
        r#"<input type="{input_type}" name="{}" value="{}"{} />"#,
        escape_html(name),
        escape_html(val),
        render_attrs(attrs)
    )
}

// ---------------------------------------------------------------------------
// Built-in widgets
// ---------------------------------------------------------------------------

/// A basic `<input type="text">` widget.
#[derive(Debug, Clone)]
pub struct TextInput;

impl Widget for TextInput {
    fn input_type(&self) -> InputType {
        InputType::Text
    }

    fn render(
        &self,
        name: &str,
        value: Option<&FieldValue>,
        attrs: &BTreeMap<String, String>,
    ) -> String {
        render_text_input(InputType::Text, name, value, attrs)
    }

    fn value_from_data(&self, data: &QueryDict, name: &str) -> Option<FieldValue> {
        data.get(name).map(FieldValue::from)
    }
}

/// A `<input type="email">` widget.
#[derive(Debug, Clone)]
pub struct EmailInput;

impl Widget for EmailInput {
    fn input_type(&self) -> InputType {
        InputType::Email
    }

    fn render(
        &self,
        name: &str,
        value: Option<&FieldValue>,
        attrs: &BTreeMap<String, String>,
    ) -> String {
        render_text_input(InputType::Email, name, value, attrs)
    }

    fn value_from_data(&self, data: &QueryDict, name: &str) -> Option<FieldValue> {
        data.get(name).map(FieldValue::from)
    }
}

/// A `<input type="password">` widget.
///
/// By default, does not render the current value.
#[derive(Debug, Clone, Default)]
pub struct PasswordInput {
    /// Whether to render the value attribute. Defaults to `false`.
    pub render_value: bool,
}

impl Widget for PasswordInput {
    fn input_type(&self) -> InputType {
        InputType::Password
    }

    fn render(
        &self,
        name: &str,
        value: Option<&FieldValue>,
        attrs: &BTreeMap<String, String>,
    ) -> String {
        let value = if self.render_value { value } else { None };
        render_text_input(InputType::Password, name, value, attrs)
    }

    fn value_from_data(&self, data: &QueryDict, name: &str) -> Option<FieldValue> {
        data.get(name).map(FieldValue::from)
    }
}

/// A `<input type="checkbox">` widget.
#[derive(Debug, Clone)]
pub struct CheckboxInput;

impl Widget for CheckboxInput {
    fn input_type(&self) -> InputType {
        InputType::Checkbox
    }

    fn render(
        &self,
        name: &str,
        value: Option<&FieldValue>,
        attrs: &BTreeMap<String, String>,
    ) -> String {
        let checked = value.and_then(FieldValue::as_checked).unwrap_or(false);
        let checked_attr = if checked { " checked" } else { "" };
        format!(
            r#"<input type="checkbox" name="{}"{checked_attr}{} />"#,
            escape_html(name),
            render_attrs(attrs)
        )
    }

    fn value_from_data(&self, data: &QueryDict, name: &str) -> Option<FieldValue> {
        // Browsers omit unchecked boxes, so absence means unchecked.
        let checked = data
            .get(name)
            .is_some_and(|v| matches!(v.to_lowercase().as_str(), "on" | "true" | "1" | "yes"));
        Some(FieldValue::Checked(checked))
    }
}

/// Creates a boxed widget for an input kind.
pub fn create_widget(input_type: InputType) -> Box<dyn Widget> {
    match input_type {
        InputType::Text => Box::new(TextInput),
        InputType::Email => Box::new(EmailInput),
        InputType::Password => Box::new(PasswordInput::default()),
        InputType::Checkbox => Box::new(CheckboxInput),
    }
}
