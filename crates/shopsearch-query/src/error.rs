use thiserror::Error;

/// Errors surfaced through [`crate::QueryOutcome::error`].
#[derive(Debug, Error)]
pub enum QueryError {
    /// The merchant source reported a failure. The message is passed through unmodified.
    #[error("merchant source error: {0}")]
    Source(String),

    /// The source did not answer within the configured limit.
    #[error("merchant search timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },

    /// A query capability was created outside a Tokio runtime.
    #[error("no Tokio runtime available to run merchant searches")]
    NoRuntime,
}
