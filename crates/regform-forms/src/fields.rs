//! Field identities and raw field values.
//!
//! [`Field`] names the five inputs of the registration form. Its `name` is
//! the externally visible contract: it is used as the HTML `id` and `name`
//! attributes and as the key of every validation error.

use std::fmt;

use crate::widgets::InputType;

/// One input of the registration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    /// Optional display name.
    Username,
    /// Account email address.
    Email,
    /// Account password.
    Password,
    /// Repetition of the password.
    ConfirmPassword,
    /// Terms and conditions checkbox.
    Terms,
}

impl Field {
    /// All fields in rendering and evaluation order.
    pub const ALL: [Self; 5] = [
        Self::Username,
        Self::Email,
        Self::Password,
        Self::ConfirmPassword,
        Self::Terms,
    ];

    /// Returns the field name used for ids, form data keys, and error paths.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Email => "email",
            Self::Password => "password",
            Self::ConfirmPassword => "confirmPassword",
            Self::Terms => "terms",
        }
    }

    /// Looks a field up by its name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Returns the position of this field in [`Field::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the input kind the field is rendered with.
    pub const fn input_type(self) -> InputType {
        match self {
            Self::Username => InputType::Text,
            Self::Email => InputType::Email,
            Self::Password | Self::ConfirmPassword => InputType::Password,
            Self::Terms => InputType::Checkbox,
        }
    }

    /// Returns the display label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Username => "Your username",
            Self::Email => "Your email",
            Self::Password => "Password",
            Self::ConfirmPassword => "Confirm password",
            Self::Terms => "I accept the Terms and Conditions",
        }
    }

    /// Returns `true` for fields whose values must never be echoed or logged.
    pub const fn is_secret(self) -> bool {
        matches!(self, Self::Password | Self::ConfirmPassword)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The raw, unvalidated value of one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Text typed into a text, email, or password input.
    Text(String),
    /// State of a checkbox.
    Checked(bool),
}

impl FieldValue {
    /// Returns the text, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Checked(_) => None,
        }
    }

    /// Returns the checkbox state, if this is a checkbox value.
    pub const fn as_checked(&self) -> Option<bool> {
        match self {
            Self::Checked(b) => Some(*b),
            Self::Text(_) => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Checked(b)
    }
}
