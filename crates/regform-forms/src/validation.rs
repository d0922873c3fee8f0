//! Validation pipeline.
//!
//! A validation pass runs in two steps over one snapshot of the values:
//! 1. Field-level rules, field by field in schema order
//! 2. Whole-object refinements
//!
//! Errors accumulate across fields rather than short-circuiting, but each
//! field reports only its first failure. Refinements run only when every
//! field passed its own rules.

use regform_core::{ValidationError, ValidationErrors};

use crate::fields::Field;
use crate::schema::Schema;
use crate::values::{FormValues, RawValues};

/// Runs the per-field rules of `schema` against `values`.
pub fn clean_fields(schema: &Schema, values: &RawValues, errors: &mut ValidationErrors) {
    for field_schema in schema.fields() {
        if let Some(rule) = field_schema.first_failure(values.get(field_schema.field)) {
            errors.add(field_schema.field.name(), rule.error());
        }
    }
}

/// Runs the whole-object refinements of `schema` against `values`.
pub fn clean_form(schema: &Schema, values: &RawValues, errors: &mut ValidationErrors) {
    for refinement in schema.refinements() {
        if !(refinement.predicate)(values) {
            errors.add(refinement.target.name(), refinement.error());
        }
    }
}

/// Performs a complete validation pass.
///
/// # Returns
///
/// - `Ok(values)` with the typed record if every rule passes
/// - `Err(errors)` with a fresh error set otherwise
pub fn full_clean(schema: &Schema, values: &RawValues) -> Result<FormValues, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    clean_fields(schema, values, &mut errors);
    if errors.is_empty() {
        clean_form(schema, values, &mut errors);
    }

    if errors.is_empty() {
        Ok(FormValues::from_raw(values))
    } else {
        Err(errors)
    }
}

/// Validates a single field with its per-field rules only.
///
/// Refinements are not evaluated, since they depend on other fields.
pub fn validate_field(schema: &Schema, values: &RawValues, field: Field) -> Option<ValidationError> {
    schema
        .field_schema(field)
        .and_then(|fs| fs.first_failure(values.get(field)))
        .map(|rule| rule.error())
}

impl Schema {
    /// Runs a complete validation pass. See [`full_clean`].
    pub fn validate(&self, values: &RawValues) -> Result<FormValues, ValidationErrors> {
        full_clean(self, values)
    }

    /// Returns the first per-field error for `field`. See [`validate_field`].
    pub fn validate_field(&self, values: &RawValues, field: Field) -> Option<ValidationError> {
        validate_field(self, values, field)
    }
}
