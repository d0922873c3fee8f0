//! # regform-forms
//!
//! The registration form: five fields, a declarative validation schema,
//! widgets, field bindings, and an async submit collaborator.
//!
//! ## Modules
//!
//! - [`fields`] - Field identities and raw values
//! - [`values`] - Unvalidated and validated form state
//! - [`schema`] - Per-field rules and whole-object refinements
//! - [`validation`] - Running a schema over a snapshot of values
//! - [`querydict`] - URL-encoded submitted data
//! - [`widgets`] - HTML input rendering
//! - [`registration`] - The capability inputs report changes through
//! - [`binding`] - Labeled inputs with inline errors
//! - [`submit`] - The submit collaborator trait and default handler
//! - [`form`] - The registration form state machine

pub mod binding;
pub mod fields;
pub mod form;
pub mod querydict;
pub mod registration;
pub mod schema;
pub mod submit;
pub mod validation;
pub mod values;
pub mod widgets;

pub use binding::FieldBinding;
pub use fields::{Field, FieldValue};
pub use form::{RegistrationForm, SubmitOutcome, SubmitStatus, ValidationState};
pub use querydict::QueryDict;
pub use registration::{FieldChange, FieldRegistration, Registration};
pub use schema::{registration_schema, Schema};
pub use submit::{LoggingSubmitHandler, SubmitHandler};
pub use values::{FormValues, RawValues};
pub use widgets::InputType;

/// The types needed to build, fill, and submit a form.
pub mod prelude {
    pub use crate::binding::FieldBinding;
    pub use crate::fields::{Field, FieldValue};
    pub use crate::form::{RegistrationForm, SubmitOutcome, SubmitStatus, ValidationState};
    pub use crate::querydict::QueryDict;
    pub use crate::registration::{FieldChange, Registration};
    pub use crate::submit::{LoggingSubmitHandler, SubmitHandler};
    pub use crate::values::FormValues;
    pub use crate::widgets::InputType;
    pub use regform_core::{RegformError, RegformResult, Settings, ValidationError, ValidationErrors};
}
