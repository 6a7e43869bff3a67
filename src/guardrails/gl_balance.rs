//! GL balance validation
//!
//! For transactions whose smart code denotes a general-ledger-affecting
//! class, the debit and credit line totals must net to zero. All sums use
//! `rust_decimal::Decimal`; floating-point equality never decides whether a
//! journal balances. Non-GL transactions are a no-op here.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::debug;

use crate::payload::{LineSide, TransactionLine};
use crate::smart_code::is_gl_code;

/// Ledger-account label aliases. Narrower than the generic entity-type
/// table: these only apply when a payload denotes a ledger account.
const GL_ACCOUNT_ALIASES: &[(&str, &str)] =
    &[("gl_account", "account"), ("ledger_account", "account")];

fn gl_account_alias_table() -> &'static HashMap<&'static str, &'static str> {
    static TABLE: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    TABLE.get_or_init(|| GL_ACCOUNT_ALIASES.iter().copied().collect())
}

/// One itemized imbalance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceError {
    pub message: String,
    /// Absolute difference between the debit and credit totals.
    pub delta: Decimal,
    /// The side whose total is short.
    pub short_side: LineSide,
}

/// Outcome of a balance check, totals included for the caller's reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceReport {
    pub is_balanced: bool,
    pub debit_total: Decimal,
    pub credit_total: Decimal,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<BalanceError>,
}

impl BalanceReport {
    fn balanced(debit_total: Decimal, credit_total: Decimal) -> Self {
        Self {
            is_balanced: true,
            debit_total,
            credit_total,
            errors: Vec::new(),
        }
    }
}

/// Validate that GL-affecting lines balance, with zero epsilon.
pub fn validate_balance(lines: &[TransactionLine], smart_code: &str) -> BalanceReport {
    validate_balance_with_epsilon(lines, smart_code, Decimal::ZERO)
}

/// Validate that GL-affecting lines balance.
///
/// `epsilon` absorbs legitimate sub-unit rounding when the business currency
/// defines fractional minor units; it defaults to zero and should stay there
/// unless the currency demands otherwise.
pub fn validate_balance_with_epsilon(
    lines: &[TransactionLine],
    smart_code: &str,
    epsilon: Decimal,
) -> BalanceReport {
    if !is_gl_code(smart_code) {
        // Not a ledger-affecting class; nothing to enforce.
        return BalanceReport::balanced(Decimal::ZERO, Decimal::ZERO);
    }

    let mut debit_total = Decimal::ZERO;
    let mut credit_total = Decimal::ZERO;
    for line in lines {
        match line.resolved_side() {
            LineSide::Debit => debit_total += line.amount_abs(),
            LineSide::Credit => credit_total += line.amount_abs(),
        }
    }

    let delta = (debit_total - credit_total).abs();
    debug!(%debit_total, %credit_total, %delta, "gl balance check");

    if delta <= epsilon {
        return BalanceReport::balanced(debit_total, credit_total);
    }

    let short_side = if credit_total < debit_total {
        LineSide::Credit
    } else {
        LineSide::Debit
    };
    BalanceReport {
        is_balanced: false,
        debit_total,
        credit_total,
        errors: vec![BalanceError {
            message: format!(
                "GL lines do not balance: debits {debit_total}, credits {credit_total}, \
                 {short_side} side short by {delta}"
            ),
            delta,
            short_side,
        }],
    }
}

/// Rewrite a legacy ledger-account entity-type label to the canonical
/// `account`. Layered on top of the generic entity-type canonicalizer by the
/// orchestrator; unknown labels pass through.
pub fn normalize_gl_account(entity_type: &str) -> String {
    let lowered = entity_type.to_ascii_lowercase();
    match gl_account_alias_table().get(lowered.as_str()) {
        Some(canonical) => (*canonical).to_string(),
        None => entity_type.to_string(),
    }
}

/// True when the entity-type label denotes a ledger account, canonical or
/// legacy spelling.
pub fn is_ledger_account_type(entity_type: &str) -> bool {
    let lowered = entity_type.to_ascii_lowercase();
    lowered == "account" || gl_account_alias_table().contains_key(lowered.as_str())
}
