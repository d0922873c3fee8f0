//! Logging integration for regform.
//!
//! Provides helpers for configuring [`tracing`]-based logging from
//! [`Settings`](crate::settings::Settings) and for creating per-submission spans.

use tracing_subscriber::EnvFilter;

use crate::settings::Settings;

/// Sets up the global tracing subscriber based on the given settings.
///
/// The filter comes from `RUST_LOG` when it is set, otherwise from
/// `settings.log_level` (see [`build_filter`]). In debug mode a pretty,
/// human-readable format is used; otherwise structured JSON. If a
/// subscriber is already installed this does nothing.
pub fn setup_logging(settings: &Settings) {
    use tracing_subscriber::fmt;

    let filter = build_filter(settings);

    if settings.debug {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .pretty()
            .try_init()
            .ok();
    } else {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .try_init()
            .ok();
    }
}

/// Builds the event filter for `settings`.
///
/// A non-empty `RUST_LOG` takes precedence over `settings.log_level`. An
/// unparsable directive falls back to `settings.log_level`, then to `info`.
pub fn build_filter(settings: &Settings) -> EnvFilter {
    let directive = filter_directive(settings, std::env::var("RUST_LOG").ok());
    EnvFilter::try_new(&directive)
        .or_else(|_| EnvFilter::try_new(&settings.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

fn filter_directive(settings: &Settings, rust_log: Option<String>) -> String {
    rust_log
        .filter(|directive| !directive.trim().is_empty())
        .unwrap_or_else(|| settings.log_level.clone())
}

/// Creates a tracing span for one submit attempt.
///
/// # Examples
///
/// ```
/// use regform_core::logging::submission_span;
///
/// let span = submission_span(1);
/// let _guard = span.enter();
/// tracing::info!("validating");
/// ```
pub fn submission_span(attempt: u64) -> tracing::Span {
    tracing::info_span!("submission", attempt)
}
