//! hera-guardrails - Guardrail Validation & Auto-Fix Pipeline
//!
//! The write-path subsystem of a multi-tenant business-data platform that
//! stores every business fact in a handful of generic tables. Before an
//! entity, relationship or transaction payload reaches storage, this crate
//! inspects it against the platform's structural and accounting invariants,
//! applies deterministic confidence-scored corrections, and returns a single
//! verdict: pass or fail, the corrected payload, the fixes applied and the
//! violations found.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use hera_guardrails::{
//!     FiscalPeriodLookup, GuardrailConfig, GuardrailOrchestrator, GuardrailPayload,
//!     GuardrailTable, RequestContext,
//! };
//!
//! # async fn run(lookup: Arc<dyn FiscalPeriodLookup>, payload: GuardrailPayload)
//! # -> anyhow::Result<()> {
//! let orchestrator = GuardrailOrchestrator::new(lookup, GuardrailConfig::default());
//! let verdict = orchestrator
//!     .validate(GuardrailTable::Entities, payload, &RequestContext::new())
//!     .await?;
//! assert!(verdict.validation_passed);
//! # Ok(())
//! # }
//! ```
//!
//! Persistence, authorization and retries are the caller's business: the
//! only I/O this crate performs is the injected fiscal-period lookup.

// Core error handling
pub mod error;

// Typed payload shapes for the three generic record kinds
pub mod payload;

// Smart code grammar: normalizer, validator, builder
pub mod smart_code;

// Validators and the auto-fix orchestrator
pub mod guardrails;

// Public surface re-exports
pub use error::{GuardrailError, GuardrailResult};
pub use guardrails::{
    canonicalize, is_ledger_account_type, normalize_gl_account, validate_balance,
    validate_balance_with_epsilon, BalanceError, BalanceReport, CanonicalType, FiscalPeriod,
    FiscalPeriodLookup, Fix, GuardrailConfig, GuardrailOrchestrator, PeriodCloseValidator,
    PeriodStatus, PostingCheck, RequestContext, Severity, Verdict, Violation,
};
pub use payload::{
    EntityPayload, GuardrailPayload, GuardrailTable, LineSide, RelationshipPayload,
    TransactionLine, TransactionPayload,
};
pub use smart_code::{SmartCodeBuilder, SmartCodeError};
