//! Period-close posting checks
//!
//! Decides whether a transaction's effective date falls inside a fiscal
//! period still open for posting. The period data itself is owned by an
//! external system and reached through the injected [`FiscalPeriodLookup`]
//! collaborator; this module never mutates it.
//!
//! Policy: a date with no covering period record is allowed. Absence of
//! period configuration must not block normal operation. That default is a
//! business decision, so it is exposed as the `allow_unconfigured` switch
//! rather than buried in the match arm.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

use crate::error::{GuardrailError, GuardrailResult};

/// Open/closed posting status of a fiscal period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodStatus {
    Open,
    Closed,
}

impl fmt::Display for PeriodStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodStatus::Open => f.write_str("open"),
            PeriodStatus::Closed => f.write_str("closed"),
        }
    }
}

/// The slice of a fiscal-period record the guardrails consume
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiscalPeriod {
    /// Human-readable period label, e.g. `2025-04` or `FY2025-Q2`.
    pub period_label: String,
    pub status: PeriodStatus,
}

/// Injected collaborator resolving the fiscal period covering a date for an
/// organization. Returns `None` when no period record covers the date.
#[async_trait]
pub trait FiscalPeriodLookup: Send + Sync {
    async fn fiscal_period_for(
        &self,
        organization_id: Uuid,
        date: DateTime<Utc>,
    ) -> anyhow::Result<Option<FiscalPeriod>>;
}

/// Result of a posting-allowed check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingCheck {
    pub allowed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl PostingCheck {
    fn allowed() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    fn rejected(reason: String) -> Self {
        Self {
            allowed: false,
            reason: Some(reason),
        }
    }
}

/// Validates transaction dates against per-organization fiscal periods.
pub struct PeriodCloseValidator {
    lookup: Arc<dyn FiscalPeriodLookup>,
    timeout: Option<Duration>,
    allow_unconfigured: bool,
}

impl PeriodCloseValidator {
    pub fn new(
        lookup: Arc<dyn FiscalPeriodLookup>,
        timeout: Option<Duration>,
        allow_unconfigured: bool,
    ) -> Self {
        Self {
            lookup,
            timeout,
            allow_unconfigured,
        }
    }

    /// Check whether a posting dated `transaction_date` is allowed for the
    /// organization.
    ///
    /// Lookup failures and timeouts come back as `Err`: they are system
    /// failures, distinct from a normal "period closed" rejection, so the
    /// caller can decide whether to retry.
    pub async fn check_posting_allowed(
        &self,
        organization_id: Uuid,
        transaction_date: DateTime<Utc>,
        transaction_type: Option<&str>,
        smart_code: Option<&str>,
    ) -> GuardrailResult<PostingCheck> {
        debug!(
            %organization_id,
            %transaction_date,
            transaction_type = transaction_type.unwrap_or("-"),
            smart_code = smart_code.unwrap_or("-"),
            "checking fiscal period for posting"
        );

        let period = match self.timeout {
            Some(deadline) => {
                match tokio::time::timeout(
                    deadline,
                    self.lookup.fiscal_period_for(organization_id, transaction_date),
                )
                .await
                {
                    Ok(result) => result?,
                    Err(_) => {
                        return Err(GuardrailError::PeriodLookupTimeout {
                            duration_ms: deadline.as_millis() as u64,
                        })
                    }
                }
            }
            None => {
                self.lookup
                    .fiscal_period_for(organization_id, transaction_date)
                    .await?
            }
        };

        let check = match period {
            None if self.allow_unconfigured => PostingCheck::allowed(),
            None => PostingCheck::rejected(format!(
                "no fiscal period is configured for {} and unconfigured periods are blocked",
                transaction_date.date_naive()
            )),
            Some(period) if period.status == PeriodStatus::Closed => {
                PostingCheck::rejected(format!(
                    "fiscal period '{}' is {} for posting",
                    period.period_label, period.status
                ))
            }
            Some(_) => PostingCheck::allowed(),
        };

        Ok(check)
    }
}
