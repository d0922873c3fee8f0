//! Form state before and after validation.
//!
//! [`RawValues`] is what the user has typed so far, keyed by [`Field`].
//! [`FormValues`] is the typed record produced by a successful validation
//! pass and handed to the submit collaborator.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::fields::{Field, FieldValue};

/// Mask used in place of secret values when data is logged or serialized for display.
pub const REDACTED: &str = "********";

/// The current, unvalidated values of the form.
///
/// A field is absent until a value is reported for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawValues {
    values: BTreeMap<Field, FieldValue>,
}

impl RawValues {
    /// Creates an empty set of values, as at form mount.
    pub const fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Sets a text value, returning `self` for chaining.
    #[must_use]
    pub fn with_text(mut self, field: Field, text: impl Into<String>) -> Self {
        self.set(field, FieldValue::Text(text.into()));
        self
    }

    /// Sets a checkbox value, returning `self` for chaining.
    #[must_use]
    pub fn with_checked(mut self, field: Field, checked: bool) -> Self {
        self.set(field, FieldValue::Checked(checked));
        self
    }

    /// Returns the value of `field`, if one was reported.
    pub fn get(&self, field: Field) -> Option<&FieldValue> {
        self.values.get(&field)
    }

    /// Returns the text of `field`, if it holds text.
    pub fn text(&self, field: Field) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_text)
    }

    /// Returns the checkbox state of `field`, if it holds one.
    pub fn checked(&self, field: Field) -> Option<bool> {
        self.get(field).and_then(FieldValue::as_checked)
    }

    /// Replaces the value of `field`.
    pub fn set(&mut self, field: Field, value: FieldValue) {
        self.values.insert(field, value);
    }

    /// Removes the value of `field`.
    pub fn remove(&mut self, field: Field) -> Option<FieldValue> {
        self.values.remove(&field)
    }

    /// Removes every value.
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Returns `true` if no value has been reported.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<&FormValues> for RawValues {
    fn from(values: &FormValues) -> Self {
        let mut raw = Self::new()
            .with_text(Field::Email, values.email.clone())
            .with_text(Field::Password, values.password.clone())
            .with_text(Field::ConfirmPassword, values.confirm_password.clone())
            .with_checked(Field::Terms, values.terms);
        if let Some(username) = &values.username {
            raw.set(Field::Username, FieldValue::Text(username.clone()));
        }
        raw
    }
}

/// The validated registration data.
///
/// Serializes with the externally visible field names
/// (`confirmPassword`, not `confirm_password`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormValues {
    /// Optional display name, at most 100 characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Account email address.
    pub email: String,
    /// Account password.
    pub password: String,
    /// Repetition of the password.
    pub confirm_password: String,
    /// Whether the terms were accepted. Always `true` after validation.
    pub terms: bool,
}

impl FormValues {
    /// Builds the typed record from raw values.
    ///
    /// Missing text is read as empty and a missing checkbox as unchecked;
    /// callers are expected to have validated `raw` first.
    pub fn from_raw(raw: &RawValues) -> Self {
        let text = |field| raw.text(field).unwrap_or_default().to_string();
        Self {
            username: raw.text(Field::Username).map(str::to_string),
            email: text(Field::Email),
            password: text(Field::Password),
            confirm_password: text(Field::ConfirmPassword),
            terms: raw.checked(Field::Terms).unwrap_or(false),
        }
    }

    /// Returns a JSON view of the values with secret fields masked.
    pub fn redacted(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or(serde_json::Value::Null);
        if let serde_json::Value::Object(map) = &mut value {
            for field in Field::ALL.iter().filter(|f| f.is_secret()) {
                if let Some(slot) = map.get_mut(field.name()) {
                    *slot = serde_json::Value::String(REDACTED.to_string());
                }
            }
        }
        value
    }
}
