//! Guardrail auto-fix orchestrator
//!
//! The single entry point the write path calls before anything reaches
//! storage. One [`validate`](GuardrailOrchestrator::validate) call runs
//! every applicable check against the payload, applies the deterministic
//! corrections it can, and returns a [`Verdict`] carrying the corrected
//! payload, the fixes applied and the violations found.
//!
//! All checks run even after a violation is found, so a caller sees the
//! complete picture in one pass; only system failures from the period-lookup
//! collaborator abort the call. The orchestrator holds no per-request state:
//! tenancy is threaded through [`RequestContext`] on every call, which keeps
//! concurrent requests for different organizations from ever observing each
//! other's context.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::GuardrailResult;
use crate::guardrails::entity_types;
use crate::guardrails::fiscal::{FiscalPeriodLookup, PeriodCloseValidator};
use crate::guardrails::gl_balance;
use crate::payload::{GuardrailPayload, GuardrailTable};
use crate::smart_code;

/// Severity of a violation. `Error` blocks the write; lower severities are
/// advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
            Severity::Info => f.write_str("info"),
        }
    }
}

/// One applied correction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fix {
    pub field: String,
    pub old_value: String,
    pub new_value: String,
    pub reason: String,
    /// Confidence in `[0, 1]`. Deterministic remaps carry `1.0`.
    pub confidence: f64,
}

/// One uncorrectable problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub field: String,
    pub message: String,
    pub severity: Severity,
}

impl Violation {
    fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            severity: Severity::Error,
        }
    }
}

/// Aggregate result of one orchestration run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub validation_passed: bool,
    pub corrected_payload: GuardrailPayload,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fixes: Vec<Fix>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<Violation>,
    /// Mean confidence of the applied fixes; `1.0` when nothing needed
    /// fixing.
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor_id: Option<Uuid>,
}

/// Per-request context threaded explicitly through every call.
///
/// There is deliberately no "set current organization" mutator on the
/// orchestrator: a caller-side default organization travels here, per
/// request, never on shared state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Default organization for collaborator lookups when the payload
    /// carries one of its own it always wins. Never used to fill a missing
    /// `organization_id` on the payload itself.
    pub organization_id: Option<Uuid>,
    /// Audit metadata echoed into the verdict.
    pub actor_id: Option<Uuid>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_organization(mut self, organization_id: Uuid) -> Self {
        self.organization_id = Some(organization_id);
        self
    }

    pub fn with_actor(mut self, actor_id: Uuid) -> Self {
        self.actor_id = Some(actor_id);
        self
    }
}

/// Configuration for the orchestrator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardrailConfig {
    /// Tolerance for GL balance comparison. Keep at zero unless the business
    /// currency defines fractional minor units that legitimately round.
    pub balance_epsilon: Decimal,
    /// Deadline for the fiscal-period lookup; `None` waits indefinitely.
    pub period_lookup_timeout_ms: Option<u64>,
    /// Policy switch for dates with no covering period record. The platform
    /// default is to allow them.
    pub allow_unconfigured_periods: bool,
}

impl Default for GuardrailConfig {
    fn default() -> Self {
        Self {
            balance_epsilon: Decimal::ZERO,
            period_lookup_timeout_ms: None,
            allow_unconfigured_periods: true,
        }
    }
}

/// Top-level guardrail pipeline
pub struct GuardrailOrchestrator {
    period_validator: PeriodCloseValidator,
    config: GuardrailConfig,
}

impl GuardrailOrchestrator {
    pub fn new(lookup: Arc<dyn FiscalPeriodLookup>, config: GuardrailConfig) -> Self {
        let period_validator = PeriodCloseValidator::new(
            lookup,
            config.period_lookup_timeout_ms.map(Duration::from_millis),
            config.allow_unconfigured_periods,
        );
        Self {
            period_validator,
            config,
        }
    }

    /// Run every applicable guardrail against the payload.
    ///
    /// Structural and business-rule problems land in the verdict; only
    /// system failures (period-lookup I/O errors, timeouts) come back as
    /// `Err`.
    pub async fn validate(
        &self,
        table: GuardrailTable,
        payload: GuardrailPayload,
        ctx: &RequestContext,
    ) -> GuardrailResult<Verdict> {
        debug!(table = %table, kind = %payload.table(), "guardrail validation started");

        let mut corrected = payload;
        let mut fixes: Vec<Fix> = Vec::new();
        let mut violations: Vec<Violation> = Vec::new();

        if table != corrected.table() {
            violations.push(Violation::error(
                "table",
                format!(
                    "payload kind '{}' does not match target table '{}'",
                    corrected.table(),
                    table
                ),
            ));
        }

        self.check_smart_codes(&mut corrected, &mut fixes, &mut violations);
        self.check_entity_type(table, &mut corrected, &mut fixes);

        if corrected.organization_id().is_none() {
            // Tenant scope is never defaulted, not even from the request
            // context; a missing boundary must fail loudly.
            violations.push(Violation::error(
                "organization_id",
                "organization_id is required on every write",
            ));
        }

        self.check_posting_period(table, &corrected, ctx, &mut violations)
            .await?;
        self.check_gl_balance(table, &corrected, &mut violations);

        let validation_passed = !violations.iter().any(|v| v.severity == Severity::Error);
        let confidence = if fixes.is_empty() {
            1.0
        } else {
            fixes.iter().map(|f| f.confidence).sum::<f64>() / fixes.len() as f64
        };

        if !validation_passed {
            warn!(
                table = %table,
                violations = violations.len(),
                fixes = fixes.len(),
                "guardrail validation failed"
            );
        } else {
            debug!(fixes = fixes.len(), "guardrail validation passed");
        }

        Ok(Verdict {
            validation_passed,
            corrected_payload: corrected,
            fixes,
            violations,
            confidence,
            actor_id: ctx.actor_id,
        })
    }

    /// Normalize and validate the header smart code, and the per-line codes
    /// on transactions. A normalization is only kept when the normalized
    /// code validates; otherwise the field stays at its original value so
    /// the caller can see exactly what failed.
    fn check_smart_codes(
        &self,
        corrected: &mut GuardrailPayload,
        fixes: &mut Vec<Fix>,
        violations: &mut Vec<Violation>,
    ) {
        if let Some(code) = corrected.smart_code().map(str::to_string) {
            if let Some(fixed) = Self::check_one_smart_code("smart_code", &code, fixes, violations)
            {
                corrected.set_smart_code(fixed);
            }
        }

        if let GuardrailPayload::Transaction(txn) = corrected {
            for (index, line) in txn.lines.iter_mut().enumerate() {
                let Some(code) = line.smart_code.clone() else {
                    continue;
                };
                let field = format!("lines[{index}].smart_code");
                if let Some(fixed) = Self::check_one_smart_code(&field, &code, fixes, violations) {
                    line.smart_code = Some(fixed);
                }
            }
        }
    }

    fn check_one_smart_code(
        field: &str,
        code: &str,
        fixes: &mut Vec<Fix>,
        violations: &mut Vec<Violation>,
    ) -> Option<String> {
        let normalized = smart_code::normalize(code);
        match smart_code::validate(&normalized) {
            Ok(()) if normalized != code => {
                debug!(field, old = code, new = %normalized, "smart code normalized");
                fixes.push(Fix {
                    field: field.to_string(),
                    old_value: code.to_string(),
                    new_value: normalized.clone(),
                    reason: "uppercase version marker rewritten to canonical lowercase form"
                        .to_string(),
                    confidence: 1.0,
                });
                Some(normalized)
            }
            Ok(()) => None,
            Err(err) => {
                violations.push(Violation::error(field, err.to_string()));
                None
            }
        }
    }

    /// Canonicalize the entity type, layering the narrow ledger-account
    /// alias fix on top of the generic table when the type denotes one.
    fn check_entity_type(
        &self,
        table: GuardrailTable,
        corrected: &mut GuardrailPayload,
        fixes: &mut Vec<Fix>,
    ) {
        if table != GuardrailTable::Entities {
            return;
        }
        let GuardrailPayload::Entity(entity) = corrected else {
            return;
        };
        let Some(original) = entity.entity_type.clone() else {
            return;
        };

        let canonical = entity_types::canonicalize(table, &original);
        let final_type = if gl_balance::is_ledger_account_type(&canonical.type_name) {
            gl_balance::normalize_gl_account(&canonical.type_name)
        } else {
            canonical.type_name
        };

        if final_type != original {
            debug!(old = %original, new = %final_type, "entity type canonicalized");
            fixes.push(Fix {
                field: "entity_type".to_string(),
                old_value: original,
                new_value: final_type.clone(),
                reason: "deprecated entity type alias remapped to canonical form".to_string(),
                confidence: 1.0,
            });
            entity.entity_type = Some(final_type);
        }
    }

    async fn check_posting_period(
        &self,
        table: GuardrailTable,
        corrected: &GuardrailPayload,
        ctx: &RequestContext,
        violations: &mut Vec<Violation>,
    ) -> GuardrailResult<()> {
        if table != GuardrailTable::Transactions {
            return Ok(());
        }
        let GuardrailPayload::Transaction(txn) = corrected else {
            return Ok(());
        };
        let Some(date) = txn.transaction_date else {
            return Ok(());
        };
        // The payload's own organization wins; the context default only
        // scopes the lookup when the payload is silent (the missing-tenant
        // violation has already been recorded in that case).
        let Some(organization_id) = txn.organization_id.or(ctx.organization_id) else {
            return Ok(());
        };

        let check = self
            .period_validator
            .check_posting_allowed(
                organization_id,
                date,
                txn.transaction_type.as_deref(),
                txn.smart_code.as_deref(),
            )
            .await?;

        if !check.allowed {
            violations.push(Violation::error(
                "transaction_date",
                check
                    .reason
                    .unwrap_or_else(|| "posting is not allowed for this date".to_string()),
            ));
        }
        Ok(())
    }

    fn check_gl_balance(
        &self,
        table: GuardrailTable,
        corrected: &GuardrailPayload,
        violations: &mut Vec<Violation>,
    ) {
        if table != GuardrailTable::Transactions {
            return;
        }
        let GuardrailPayload::Transaction(txn) = corrected else {
            return;
        };
        let Some(code) = txn.smart_code.as_deref() else {
            return;
        };
        if !smart_code::is_gl_code(code) || txn.lines.is_empty() {
            return;
        }

        let report =
            gl_balance::validate_balance_with_epsilon(&txn.lines, code, self.config.balance_epsilon);
        if !report.is_balanced {
            for error in report.errors {
                violations.push(Violation::error("lines", error.message));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guardrails::fiscal::{FiscalPeriod, PeriodStatus};
    use crate::payload::{EntityPayload, LineSide, TransactionLine, TransactionPayload};
    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone, Utc};
    use std::collections::HashMap;

    struct FixedLookup(Option<FiscalPeriod>);

    #[async_trait]
    impl FiscalPeriodLookup for FixedLookup {
        async fn fiscal_period_for(
            &self,
            _organization_id: Uuid,
            _date: DateTime<Utc>,
        ) -> anyhow::Result<Option<FiscalPeriod>> {
            Ok(self.0.clone())
        }
    }

    struct FailingLookup;

    #[async_trait]
    impl FiscalPeriodLookup for FailingLookup {
        async fn fiscal_period_for(
            &self,
            _organization_id: Uuid,
            _date: DateTime<Utc>,
        ) -> anyhow::Result<Option<FiscalPeriod>> {
            Err(anyhow::anyhow!("period service unreachable"))
        }
    }

    fn orchestrator_with(period: Option<FiscalPeriod>) -> GuardrailOrchestrator {
        GuardrailOrchestrator::new(Arc::new(FixedLookup(period)), GuardrailConfig::default())
    }

    fn open_period() -> Option<FiscalPeriod> {
        Some(FiscalPeriod {
            period_label: "2025-04".to_string(),
            status: PeriodStatus::Open,
        })
    }

    fn org() -> Uuid {
        Uuid::new_v4()
    }

    fn entity_payload(entity_type: &str, smart_code: &str) -> GuardrailPayload {
        GuardrailPayload::Entity(EntityPayload {
            organization_id: Some(org()),
            entity_type: Some(entity_type.to_string()),
            entity_name: Some("Cash at bank".to_string()),
            smart_code: Some(smart_code.to_string()),
            extra: HashMap::new(),
        })
    }

    fn gl_line(amount: i64, side: LineSide) -> TransactionLine {
        TransactionLine {
            line_number: None,
            entity_id: None,
            side: Some(side),
            amount: Decimal::from(amount),
            smart_code: None,
            extra: HashMap::new(),
        }
    }

    fn journal_payload(lines: Vec<TransactionLine>) -> GuardrailPayload {
        GuardrailPayload::Transaction(TransactionPayload {
            organization_id: Some(org()),
            transaction_type: Some("journal_entry".to_string()),
            transaction_date: Some(Utc.with_ymd_and_hms(2025, 4, 15, 12, 0, 0).unwrap()),
            smart_code: Some("HERA.SALON.GL.JE.POST.v1".to_string()),
            lines,
            extra: HashMap::new(),
        })
    }

    #[tokio::test]
    async fn test_missing_organization_id_blocks_write() {
        let orchestrator = orchestrator_with(open_period());
        let payload = GuardrailPayload::Entity(EntityPayload {
            organization_id: None,
            entity_type: Some("customer".to_string()),
            smart_code: Some("HERA.SALON.CRM.CUST.PROFILE.v1".to_string()),
            ..Default::default()
        });

        let verdict = orchestrator
            .validate(GuardrailTable::Entities, payload, &RequestContext::new())
            .await
            .unwrap();

        assert!(!verdict.validation_passed);
        let errors: Vec<_> = verdict
            .violations
            .iter()
            .filter(|v| v.severity == Severity::Error)
            .collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "organization_id");
        assert!(verdict.fixes.is_empty());
    }

    #[tokio::test]
    async fn test_entity_alias_is_fixed_with_full_confidence() {
        let orchestrator = orchestrator_with(open_period());
        let payload = entity_payload("gl_account", "HERA.SALON.GL.ACC.ASSET.v1");

        let verdict = orchestrator
            .validate(GuardrailTable::Entities, payload, &RequestContext::new())
            .await
            .unwrap();

        assert!(verdict.validation_passed);
        assert_eq!(verdict.fixes.len(), 1);
        let fix = &verdict.fixes[0];
        assert_eq!(fix.field, "entity_type");
        assert_eq!(fix.old_value, "gl_account");
        assert_eq!(fix.new_value, "account");
        assert_eq!(fix.confidence, 1.0);
        assert_eq!(verdict.confidence, 1.0);

        let GuardrailPayload::Entity(corrected) = verdict.corrected_payload else {
            panic!("expected entity payload");
        };
        assert_eq!(corrected.entity_type.as_deref(), Some("account"));
    }

    #[tokio::test]
    async fn test_uppercase_version_marker_is_normalized() {
        let orchestrator = orchestrator_with(open_period());
        let payload = entity_payload("customer", "HERA.SALON.CRM.CUST.PROFILE.V1");

        let verdict = orchestrator
            .validate(GuardrailTable::Entities, payload, &RequestContext::new())
            .await
            .unwrap();

        assert!(verdict.validation_passed);
        assert_eq!(verdict.fixes.len(), 1);
        assert_eq!(verdict.fixes[0].field, "smart_code");
        assert_eq!(
            verdict.corrected_payload.smart_code(),
            Some("HERA.SALON.CRM.CUST.PROFILE.v1")
        );
    }

    #[tokio::test]
    async fn test_invalid_smart_code_keeps_original_value() {
        let orchestrator = orchestrator_with(open_period());
        // Too few segments even after the version marker is normalized.
        let payload = entity_payload("customer", "HERA.SALON.V1");

        let verdict = orchestrator
            .validate(GuardrailTable::Entities, payload, &RequestContext::new())
            .await
            .unwrap();

        assert!(!verdict.validation_passed);
        assert!(verdict.fixes.is_empty());
        assert!(verdict
            .violations
            .iter()
            .any(|v| v.field == "smart_code" && v.severity == Severity::Error));
        // The rejected fix is not applied; the caller sees what failed.
        assert_eq!(verdict.corrected_payload.smart_code(), Some("HERA.SALON.V1"));
    }

    #[tokio::test]
    async fn test_closed_period_rejects_posting() {
        let orchestrator = orchestrator_with(Some(FiscalPeriod {
            period_label: "2025-03".to_string(),
            status: PeriodStatus::Closed,
        }));
        let payload = journal_payload(vec![
            gl_line(100, LineSide::Debit),
            gl_line(100, LineSide::Credit),
        ]);

        let verdict = orchestrator
            .validate(GuardrailTable::Transactions, payload, &RequestContext::new())
            .await
            .unwrap();

        assert!(!verdict.validation_passed);
        let violation = verdict
            .violations
            .iter()
            .find(|v| v.field == "transaction_date")
            .expect("expected a period violation");
        assert!(violation.message.contains("2025-03"));
    }

    #[tokio::test]
    async fn test_no_period_configured_allows_posting() {
        let orchestrator = orchestrator_with(None);
        let payload = journal_payload(vec![
            gl_line(100, LineSide::Debit),
            gl_line(100, LineSide::Credit),
        ]);

        let verdict = orchestrator
            .validate(GuardrailTable::Transactions, payload, &RequestContext::new())
            .await
            .unwrap();

        assert!(verdict.validation_passed);
        assert!(verdict.violations.is_empty());
    }

    #[tokio::test]
    async fn test_unbalanced_gl_lines_block_write() {
        let orchestrator = orchestrator_with(open_period());
        let payload = journal_payload(vec![
            gl_line(100, LineSide::Debit),
            gl_line(90, LineSide::Credit),
        ]);

        let verdict = orchestrator
            .validate(GuardrailTable::Transactions, payload, &RequestContext::new())
            .await
            .unwrap();

        assert!(!verdict.validation_passed);
        let violation = verdict
            .violations
            .iter()
            .find(|v| v.field == "lines")
            .expect("expected a balance violation");
        assert!(violation.message.contains("short by 10"));
        assert!(violation.message.contains("credit"));
    }

    #[tokio::test]
    async fn test_non_gl_transaction_skips_balance_check() {
        let orchestrator = orchestrator_with(open_period());
        let mut payload = journal_payload(vec![
            gl_line(100, LineSide::Debit),
            gl_line(90, LineSide::Credit),
        ]);
        payload.set_smart_code("HERA.SALON.POS.SALE.TXN.v1".to_string());

        let verdict = orchestrator
            .validate(GuardrailTable::Transactions, payload, &RequestContext::new())
            .await
            .unwrap();

        assert!(verdict.validation_passed);
    }

    #[tokio::test]
    async fn test_line_smart_codes_are_normalized() {
        let orchestrator = orchestrator_with(open_period());
        let mut lines = vec![gl_line(100, LineSide::Debit), gl_line(100, LineSide::Credit)];
        lines[1].smart_code = Some("HERA.SALON.GL.JE.LINE.V1".to_string());
        let payload = journal_payload(lines);

        let verdict = orchestrator
            .validate(GuardrailTable::Transactions, payload, &RequestContext::new())
            .await
            .unwrap();

        assert!(verdict.validation_passed);
        let fix = verdict
            .fixes
            .iter()
            .find(|f| f.field == "lines[1].smart_code")
            .expect("expected a line smart code fix");
        assert_eq!(fix.new_value, "HERA.SALON.GL.JE.LINE.v1");
    }

    #[tokio::test]
    async fn test_payload_kind_must_match_table() {
        let orchestrator = orchestrator_with(open_period());
        let payload = entity_payload("customer", "HERA.SALON.CRM.CUST.PROFILE.v1");

        let verdict = orchestrator
            .validate(GuardrailTable::Transactions, payload, &RequestContext::new())
            .await
            .unwrap();

        assert!(!verdict.validation_passed);
        assert!(verdict.violations.iter().any(|v| v.field == "table"));
    }

    #[tokio::test]
    async fn test_all_checks_run_in_one_pass() {
        // Missing tenant and unbalanced lines are both reported together.
        let orchestrator = orchestrator_with(open_period());
        let payload = GuardrailPayload::Transaction(TransactionPayload {
            organization_id: None,
            transaction_type: Some("journal_entry".to_string()),
            transaction_date: None,
            smart_code: Some("HERA.SALON.GL.JE.POST.v1".to_string()),
            lines: vec![gl_line(100, LineSide::Debit), gl_line(40, LineSide::Credit)],
            extra: HashMap::new(),
        });

        let verdict = orchestrator
            .validate(GuardrailTable::Transactions, payload, &RequestContext::new())
            .await
            .unwrap();

        assert!(!verdict.validation_passed);
        let fields: Vec<_> = verdict.violations.iter().map(|v| v.field.as_str()).collect();
        assert!(fields.contains(&"organization_id"));
        assert!(fields.contains(&"lines"));
    }

    #[tokio::test]
    async fn test_validation_is_idempotent() {
        let orchestrator = orchestrator_with(open_period());
        let payload = entity_payload("gl_account", "HERA.SALON.GL.ACC.ASSET.V1");

        let first = orchestrator
            .validate(GuardrailTable::Entities, payload, &RequestContext::new())
            .await
            .unwrap();
        assert!(first.validation_passed);
        assert_eq!(first.fixes.len(), 2);

        let second = orchestrator
            .validate(
                GuardrailTable::Entities,
                first.corrected_payload.clone(),
                &RequestContext::new(),
            )
            .await
            .unwrap();
        assert!(second.validation_passed);
        assert!(second.fixes.is_empty());
        assert_eq!(second.confidence, 1.0);
        assert_eq!(second.corrected_payload, first.corrected_payload);
    }

    #[tokio::test]
    async fn test_lookup_failure_fails_the_call_not_the_verdict() {
        let orchestrator = GuardrailOrchestrator::new(
            Arc::new(FailingLookup),
            GuardrailConfig::default(),
        );
        let payload = journal_payload(vec![
            gl_line(100, LineSide::Debit),
            gl_line(100, LineSide::Credit),
        ]);

        let result = orchestrator
            .validate(GuardrailTable::Transactions, payload, &RequestContext::new())
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_context_organization_scopes_lookup_but_never_fills_payload() {
        let orchestrator = orchestrator_with(Some(FiscalPeriod {
            period_label: "2025-04".to_string(),
            status: PeriodStatus::Closed,
        }));
        let payload = GuardrailPayload::Transaction(TransactionPayload {
            organization_id: None,
            transaction_date: Some(Utc.with_ymd_and_hms(2025, 4, 15, 12, 0, 0).unwrap()),
            smart_code: Some("HERA.SALON.GL.JE.POST.v1".to_string()),
            ..Default::default()
        });
        let ctx = RequestContext::new().with_organization(org());

        let verdict = orchestrator
            .validate(GuardrailTable::Transactions, payload, &ctx)
            .await
            .unwrap();

        // The context org scoped the period lookup (closed period found)...
        assert!(verdict
            .violations
            .iter()
            .any(|v| v.field == "transaction_date"));
        // ...but the payload's missing tenant is still a violation, and the
        // corrected payload was not silently defaulted.
        assert!(verdict
            .violations
            .iter()
            .any(|v| v.field == "organization_id"));
        assert_eq!(verdict.corrected_payload.organization_id(), None);
    }

    #[tokio::test]
    async fn test_relationship_write_gets_same_structural_checks() {
        use crate::payload::RelationshipPayload;

        let orchestrator = orchestrator_with(open_period());
        let payload = GuardrailPayload::Relationship(RelationshipPayload {
            organization_id: Some(org()),
            from_entity_id: Some(Uuid::new_v4()),
            to_entity_id: Some(Uuid::new_v4()),
            relationship_type: Some("member_of".to_string()),
            smart_code: Some("HERA.SALON.CRM.REL.MEMBER.V2".to_string()),
            extra: HashMap::new(),
        });

        let verdict = orchestrator
            .validate(GuardrailTable::Relationships, payload, &RequestContext::new())
            .await
            .unwrap();

        assert!(verdict.validation_passed);
        assert_eq!(verdict.fixes.len(), 1);
        assert_eq!(
            verdict.corrected_payload.smart_code(),
            Some("HERA.SALON.CRM.REL.MEMBER.v2")
        );
    }

    #[tokio::test]
    async fn test_actor_id_is_echoed_into_verdict() {
        let orchestrator = orchestrator_with(open_period());
        let actor = Uuid::new_v4();
        let verdict = orchestrator
            .validate(
                GuardrailTable::Entities,
                entity_payload("customer", "HERA.SALON.CRM.CUST.PROFILE.v1"),
                &RequestContext::new().with_actor(actor),
            )
            .await
            .unwrap();
        assert_eq!(verdict.actor_id, Some(actor));
    }
}
