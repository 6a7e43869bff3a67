//! Guardrail validators and the auto-fix orchestrator
//!
//! Each submodule is a standalone check usable on its own (a form wanting to
//! validate a single field, a report wanting a balance summary); the
//! orchestrator composes them into the one-pass pipeline every write goes
//! through.

pub mod entity_types;
pub mod fiscal;
pub mod gl_balance;
pub mod orchestrator;

pub use entity_types::{canonicalize, CanonicalType};
pub use fiscal::{
    FiscalPeriod, FiscalPeriodLookup, PeriodCloseValidator, PeriodStatus, PostingCheck,
};
pub use gl_balance::{
    is_ledger_account_type, normalize_gl_account, validate_balance,
    validate_balance_with_epsilon, BalanceError, BalanceReport,
};
pub use orchestrator::{
    Fix, GuardrailConfig, GuardrailOrchestrator, RequestContext, Severity, Verdict, Violation,
};
