//! Result and error types for Ensayo.

use thiserror::Error;

/// Result type for Ensayo operations
pub type EnsayoResult<T> = Result<T, EnsayoError>;

/// Errors that can occur while driving a scenario
#[derive(Debug, Error)]
pub enum EnsayoError {
    /// Browser process failed to start. Fatal for the scenario.
    #[error("Failed to launch browser: {message}")]
    Launch {
        /// Error message
        message: String,
    },

    /// Isolated context or page creation failed after the process started.
    /// The partially built process is torn down before this propagates.
    #[error("Failed to create browser context: {message}")]
    Context {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// A wait exceeded its timeout before the element reached the
    /// required state. The action was not attempted.
    #[error("Element not found: {selector} (waited {timeout_ms}ms)")]
    ElementNotFound {
        /// Selector that never became actionable
        selector: String,
        /// How long we waited
        timeout_ms: u64,
    },

    /// A dropdown/autocomplete option never resolved within the retry budget
    #[error("Option {expected:?} not found among {observed:?}")]
    OptionNotFound {
        /// Text of the option we were looking for
        expected: String,
        /// Options that were actually on offer when the budget ran out
        observed: Vec<String>,
    },

    /// A nested fixture path resolved to a missing segment. Hard failure:
    /// misconfigured test data must not flow into assertions as defaults.
    #[error("Fixture not found for key: {key}")]
    FixtureNotFound {
        /// Dot-separated lookup path
        key: String,
    },

    /// A symbolic locator name is absent from the locator store
    #[error("Locator {name:?} not defined for page {page:?}")]
    LocatorMissing {
        /// Page / feature-area section
        page: String,
        /// Logical locator name
        name: String,
    },

    /// Driver-level failure while interacting with the page
    #[error("Driver error: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// Screenshot capture failed
    #[error("Screenshot failed: {message}")]
    Screenshot {
        /// Error message
        message: String,
    },

    /// A step's expectation did not hold. Carries the human-readable
    /// expectation for the report; the cause stays in the log sink.
    #[error("Step failed: {expectation}")]
    StepFailed {
        /// What the step expected to observe
        expectation: String,
    },

    /// Operation called in the wrong lifecycle phase
    #[error("Invalid state: {message}")]
    InvalidState {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl EnsayoError {
    /// Translate a driver-level failure into an assertion-style step
    /// failure so report output reads as an expectation, not a stack trace.
    #[must_use]
    pub fn into_step_failure(self, expectation: impl Into<String>) -> Self {
        let expectation = expectation.into();
        tracing::error!(cause = %self, "step expectation not met: {expectation}");
        Self::StepFailed { expectation }
    }

    /// Whether this error means the scenario could not even start
    #[must_use]
    pub const fn is_fatal_setup(&self) -> bool {
        matches!(self, Self::Launch { .. } | Self::Context { .. })
    }
}
