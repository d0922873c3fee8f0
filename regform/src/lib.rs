//! # regform
//!
//! A schema-validated account registration form.
//!
//! This is the meta-crate that re-exports all sub-crates for convenient access.
//! You can depend on `regform` to get everything, or depend on individual
//! crates for finer-grained control.
//!
//! ```
//! use regform::prelude::*;
//!
//! let form: RegistrationForm = RegistrationForm::default();
//! form.bind(&QueryDict::parse("email=alice%40example.com&terms=on"));
//!
//! let errors = form.validate().unwrap_err();
//! assert_eq!(errors.fields(), vec!["password", "confirmPassword"]);
//! ```

/// Error types, settings, settings loading, and logging.
pub use regform_core as core;

/// Fields, schema, widgets, field bindings, and the registration form.
#[cfg(feature = "forms")]
pub use regform_forms as forms;

/// Signal dispatcher for value-change notifications.
#[cfg(feature = "signals")]
pub use regform_signals as signals;

/// Commonly used types, importable with `use regform::prelude::*`.
pub mod prelude {
    pub use regform_core::logging::setup_logging;
    pub use regform_core::settings_loader;
    pub use regform_core::{RegformError, RegformResult, Settings, ValidationError, ValidationErrors};

    #[cfg(feature = "forms")]
    pub use regform_forms::prelude::*;

    #[cfg(feature = "signals")]
    pub use regform_signals::{Signal, SignalReceiver};
}
