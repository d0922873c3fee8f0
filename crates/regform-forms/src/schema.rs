//! Declarative validation schema.
//!
//! A [`Schema`] is an ordered list of [`FieldSchema`]s, each holding the
//! per-field [`FieldRule`]s for one input, followed by whole-object
//! [`Refinement`]s that may read several fields and attribute their error to
//! one of them. Running a schema lives in [`validation`](crate::validation).
//!
//! [`registration_schema`] builds the schema used by the registration form.

use once_cell::sync::Lazy;
use regex::Regex;

use regform_core::ValidationError;

use crate::fields::{Field, FieldValue};
use crate::values::RawValues;

/// Maximum length of the optional username.
pub const USERNAME_MAX_LENGTH: usize = 100;

/// Minimum length of the password.
pub const PASSWORD_MIN_LENGTH: usize = 8;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[A-Z0-9_'+\-.]*[A-Z0-9_+\-]@([A-Z0-9][A-Z0-9\-]*\.)+[A-Z]{2,}$")
        .expect("valid regex")
});

/// Returns `true` if `s` is a syntactically valid email address.
///
/// The local part may not start with a dot or contain consecutive dots.
pub fn is_valid_email(s: &str) -> bool {
    !s.starts_with('.') && !s.contains("..") && EMAIL_RE.is_match(s)
}

/// A predicate over a single field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// Text must be non-empty. A missing value counts as empty.
    Required,
    /// Text must have at least this many UTF-16 code units.
    MinLength(usize),
    /// Text must have at most this many UTF-16 code units.
    MaxLength(usize),
    /// Text must be a valid email address.
    Email,
    /// Checkbox must be checked. A missing value counts as unchecked.
    IsTrue,
}

impl Check {
    /// Returns `true` if `value` satisfies this check.
    pub fn passes(self, value: Option<&FieldValue>) -> bool {
        let text = value.and_then(FieldValue::as_text).unwrap_or_default();
        match self {
            Self::Required => !text.is_empty(),
            Self::MinLength(min) => text.encode_utf16().count() >= min,
            Self::MaxLength(max) => text.encode_utf16().count() <= max,
            Self::Email => is_valid_email(text),
            Self::IsTrue => value.and_then(FieldValue::as_checked) == Some(true),
        }
    }

    /// Returns the error code reported when this check fails.
    pub const fn code(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::MinLength(_) => "min_length",
            Self::MaxLength(_) => "max_length",
            Self::Email => "invalid",
            Self::IsTrue => "literal",
        }
    }
}

/// A check paired with the message shown when it fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    /// The predicate.
    pub check: Check,
    /// The message attached to the field on failure.
    pub message: String,
}

impl FieldRule {
    /// Creates a new rule.
    pub fn new(check: Check, message: impl Into<String>) -> Self {
        Self {
            check,
            message: message.into(),
        }
    }

    /// Builds the error reported when this rule fails.
    pub fn error(&self) -> ValidationError {
        ValidationError::new(self.message.clone(), self.check.code())
    }
}

/// The ordered rules for one field.
///
/// Rules are evaluated in order and the first failure is the field's error.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    /// The field the rules apply to.
    pub field: Field,
    /// Whether an absent value skips all rules.
    pub optional: bool,
    /// The rules, in evaluation order.
    pub rules: Vec<FieldRule>,
}

impl FieldSchema {
    /// Creates a required field schema with no rules.
    pub const fn new(field: Field) -> Self {
        Self {
            field,
            optional: false,
            rules: Vec::new(),
        }
    }

    /// Marks the field optional: an absent value passes.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Appends a rule.
    #[must_use]
    pub fn rule(mut self, check: Check, message: impl Into<String>) -> Self {
        self.rules.push(FieldRule::new(check, message));
        self
    }

    /// Returns the first failing rule for `value`, if any.
    pub fn first_failure(&self, value: Option<&FieldValue>) -> Option<&FieldRule> {
        if self.optional && value.is_none() {
            return None;
        }
        self.rules.iter().find(|rule| !rule.check.passes(value))
    }
}

/// A whole-object rule whose failure is attributed to one field.
#[derive(Debug, Clone)]
pub struct Refinement {
    /// The field that receives the error.
    pub target: Field,
    /// Returns `true` if the values satisfy the rule.
    pub predicate: fn(&RawValues) -> bool,
    /// The message attached to `target` on failure.
    pub message: String,
    /// The error code reported on failure.
    pub code: String,
}

impl Refinement {
    /// Creates a new refinement.
    pub fn new(
        target: Field,
        predicate: fn(&RawValues) -> bool,
        message: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            target,
            predicate,
            message: message.into(),
            code: code.into(),
        }
    }

    /// Builds the error reported when this refinement fails.
    pub fn error(&self) -> ValidationError {
        ValidationError::new(self.message.clone(), self.code.clone())
    }
}

/// A complete validation schema.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<FieldSchema>,
    refinements: Vec<Refinement>,
}

impl Schema {
    /// Creates an empty schema.
    pub const fn new() -> Self {
        Self {
            fields: Vec::new(),
            refinements: Vec::new(),
        }
    }

    /// Appends a field schema.
    #[must_use]
    pub fn field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self
    }

    /// Appends a whole-object refinement.
    #[must_use]
    pub fn refine(mut self, refinement: Refinement) -> Self {
        self.refinements.push(refinement);
        self
    }

    /// Returns the field schemas in evaluation order.
    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    /// Returns the refinements in evaluation order.
    pub fn refinements(&self) -> &[Refinement] {
        &self.refinements
    }

    /// Returns the schema for `field`, if the schema declares one.
    pub fn field_schema(&self, field: Field) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.field == field)
    }
}

fn passwords_match(values: &RawValues) -> bool {
    values.text(Field::Password) == values.text(Field::ConfirmPassword)
}

/// Builds the registration form schema.
///
/// Per-field rules run in the order username, email, password,
/// confirmPassword, terms; the password equality refinement runs last and
/// reports on `confirmPassword`.
pub fn registration_schema() -> Schema {
    Schema::new()
        .field(
            FieldSchema::new(Field::Username).optional().rule(
                Check::MaxLength(USERNAME_MAX_LENGTH),
                format!("String must contain at most {USERNAME_MAX_LENGTH} character(s)"),
            ),
        )
        .field(
            FieldSchema::new(Field::Email)
                .rule(Check::Required, "Email is required")
                .rule(Check::Email, "Invalid email"),
        )
        .field(
            FieldSchema::new(Field::Password)
                .rule(Check::Required, "Password is required")
                .rule(
                    Check::MinLength(PASSWORD_MIN_LENGTH),
                    "Password must have more than 8 characters",
                ),
        )
        .field(
            FieldSchema::new(Field::ConfirmPassword)
                .rule(Check::Required, "Password confirmation is required"),
        )
        .field(FieldSchema::new(Field::Terms).rule(
            Check::IsTrue,
            "You must accept the terms and conditions",
        ))
        .refine(Refinement::new(
            Field::ConfirmPassword,
            passwords_match,
            "Passwords do not match",
            "mismatch",
        ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> FieldValue {
        FieldValue::Text(s.to_string())
    }

    #[test]
    fn test_email_syntax() {
        assert!(is_valid_email("alice@example.com"));
        assert!(is_valid_email("first.last+tag@mail.example.org"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("alice@localhost"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email(".alice@example.com"));
        assert!(!is_valid_email("a..b@example.com"));
        assert!(!is_valid_email("alice@@example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_check_required() {
        assert!(Check::Required.passes(Some(&text("x"))));
        assert!(!Check::Required.passes(Some(&text(""))));
        assert!(!Check::Required.passes(None));
    }

    #[test]
    fn test_check_lengths_count_utf16_units() {
        assert!(Check::MinLength(8).passes(Some(&text("12345678"))));
        assert!(!Check::MinLength(8).passes(Some(&text("1234567"))));
        assert!(Check::MaxLength(3).passes(Some(&text("äöü"))));
        assert!(!Check::MaxLength(3).passes(Some(&text("äöüß"))));

        // Astral characters are surrogate pairs.
        assert!(Check::MinLength(8).passes(Some(&text("😀😀😀😀"))));
        assert!(!Check::MinLength(8).passes(Some(&text("😀😀😀"))));
        assert!(!Check::MaxLength(3).passes(Some(&text("😀😀"))));
    }

    #[test]
    fn test_check_is_true() {
        assert!(Check::IsTrue.passes(Some(&FieldValue::Checked(true))));
        assert!(!Check::IsTrue.passes(Some(&FieldValue::Checked(false))));
        assert!(!Check::IsTrue.passes(Some(&text("true"))));
        assert!(!Check::IsTrue.passes(None));
    }

    #[test]
    fn test_first_failure_order() {
        let schema = FieldSchema::new(Field::Password)
            .rule(Check::Required, "required")
            .rule(Check::MinLength(8), "short");
        assert_eq!(
            schema.first_failure(Some(&text(""))).map(|r| r.message.as_str()),
            Some("required")
        );
        assert_eq!(
            schema.first_failure(Some(&text("abc"))).map(|r| r.message.as_str()),
            Some("short")
        );
        assert!(schema.first_failure(Some(&text("abcdefgh"))).is_none());
    }

    #[test]
    fn test_optional_absent_skips_rules() {
        let schema = FieldSchema::new(Field::Username)
            .optional()
            .rule(Check::MaxLength(2), "too long");
        assert!(schema.first_failure(None).is_none());
        assert!(schema.first_failure(Some(&text("abc"))).is_some());
    }

    #[test]
    fn test_registration_schema_shape() {
        let schema = registration_schema();
        let fields: Vec<Field> = schema.fields().iter().map(|f| f.field).collect();
        assert_eq!(fields, Field::ALL.to_vec());
        assert_eq!(schema.refinements().len(), 1);
        assert_eq!(schema.refinements()[0].target, Field::ConfirmPassword);
        assert!(schema.field_schema(Field::Username).unwrap().optional);
    }

    #[test]
    fn test_rule_error_codes() {
        let schema = registration_schema();
        let email = schema.field_schema(Field::Email).unwrap();
        assert_eq!(email.rules[0].error().code, "required");
        assert_eq!(email.rules[1].error().code, "invalid");
        assert_eq!(schema.refinements()[0].error().code, "mismatch");
    }
}
