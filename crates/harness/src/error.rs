//! Test-level errors.

use thiserror::Error;

use crate::fixtures::FixtureError;

/// Outcome-bearing error type for suite test bodies.
///
/// `Status`, `Http` and `Check` represent genuine failures; `Skipped`
/// signals that a precondition (usually a fixture) was unavailable and
/// the test should be reported as skipped rather than failed.
#[derive(Debug, Error)]
pub enum TestError {
    /// Observed status code was not in the accepted set.
    #[error("unexpected status {actual} from {url} (expected one of {expected:?}): {body}")]
    Status {
        expected: Vec<u16>,
        actual: u16,
        url: String,
        body: String,
    },

    /// Transport-level HTTP failure.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Fixture graph misconfiguration (unknown provider, cycle).
    #[error(transparent)]
    Fixture(#[from] FixtureError),

    /// A response-content assertion that did not hold.
    #[error("check failed: {0}")]
    Check(String),

    /// Precondition unavailable; the test is skipped, not failed.
    #[error("skipped: {0}")]
    Skipped(String),
}

impl TestError {
    /// Shorthand for a failed content check.
    pub fn check(message: impl Into<String>) -> Self {
        Self::Check(message.into())
    }

    /// Shorthand for a skip with a reason.
    pub fn skip(reason: impl Into<String>) -> Self {
        Self::Skipped(reason.into())
    }
}
