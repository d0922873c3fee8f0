//! # regform-core
//!
//! Core types, settings, and error types for regform. This crate has no
//! form-specific knowledge and provides the foundation for the other crates.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`settings`] - Form settings and defaults
//! - [`settings_loader`] - Loading settings from TOML/JSON and the environment
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;

// Re-export the most commonly used types at the crate root.
pub use error::{RegformError, RegformResult, ValidationError, ValidationErrors};
pub use settings::Settings;
