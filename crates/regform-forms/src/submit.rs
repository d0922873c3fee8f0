//! The submit collaborator.
//!
//! [`RegistrationForm`](crate::form::RegistrationForm) calls its
//! [`SubmitHandler`] exactly once per successful validation pass and awaits
//! it. Handlers report failure through [`RegformError`]; a
//! [`RegformError::Validation`] result is shown on the form like any other
//! validation error, anything else as a generic submission failure.

use async_trait::async_trait;

use regform_core::{RegformError, RegformResult};

use crate::values::FormValues;

/// Receives validated registration data.
#[async_trait]
pub trait SubmitHandler: Send + Sync {
    /// Handles one submission.
    ///
    /// # Errors
    ///
    /// Returns an error if the data could not be accepted.
    async fn submit(&self, data: FormValues) -> RegformResult<()>;
}

/// The default collaborator: logs the submitted data and accepts it.
#[derive(Debug, Clone)]
pub struct LoggingSubmitHandler {
    /// Whether secret fields are masked in the log output.
    pub redact_secrets: bool,
}

impl Default for LoggingSubmitHandler {
    fn default() -> Self {
        Self {
            redact_secrets: true,
        }
    }
}

impl LoggingSubmitHandler {
    /// Creates a handler that masks secret fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the JSON that is logged for `data`.
    pub fn log_payload(&self, data: &FormValues) -> RegformResult<serde_json::Value> {
        if self.redact_secrets {
            Ok(data.redacted())
        } else {
            serde_json::to_value(data).map_err(|e| RegformError::SerializationError(e.to_string()))
        }
    }
}

#[async_trait]
impl SubmitHandler for LoggingSubmitHandler {
    async fn submit(&self, data: FormValues) -> RegformResult<()> {
        let payload = self.log_payload(&data)?;
        tracing::info!(data = %payload, "Registration submitted");
        Ok(())
    }
}

#[async_trait]
impl<H: SubmitHandler + ?Sized> SubmitHandler for std::sync::Arc<H> {
    async fn submit(&self, data: FormValues) -> RegformResult<()> {
        (**self).submit(data).await
    }
}
