//! Crate-level error handling for the guardrail pipeline
//!
//! Only system and collaborator failures live here. Structural problems and
//! business-rule rejections are ordinary validation outcomes: they are
//! recovered into the [`Verdict`](crate::guardrails::Verdict) and the call
//! still returns `Ok`. A `GuardrailError` means "we could not check your
//! data", never "your data is invalid".

use thiserror::Error;

/// System-level failures of a guardrail call
#[derive(Debug, Error)]
pub enum GuardrailError {
    #[error("fiscal period lookup failed: {0}")]
    PeriodLookup(#[from] anyhow::Error),

    #[error("fiscal period lookup timed out after {duration_ms}ms")]
    PeriodLookupTimeout { duration_ms: u64 },

    #[error("unknown guardrail table '{table}': expected entities, relationships or transactions")]
    UnknownTable { table: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for guardrail operations
pub type GuardrailResult<T> = Result<T, GuardrailError>;
