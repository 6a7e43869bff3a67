//! Typed payload shapes for the guardrail pipeline
//!
//! The platform stores every business fact in a handful of generic tables,
//! and writes arrive as loosely-shaped records. The guardrails only inspect
//! a small, fixed set of fields, so the three record kinds are modelled as a
//! tagged union with those fields as named members plus an open extension
//! map for everything the pipeline does not care about. Domain modules keep
//! their flexibility; the guardrail core gets compile-time safety over the
//! fields it actually reads.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::GuardrailError;

/// The closed set of logical record kinds a write can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardrailTable {
    Entities,
    Relationships,
    Transactions,
}

impl GuardrailTable {
    pub fn as_str(&self) -> &'static str {
        match self {
            GuardrailTable::Entities => "entities",
            GuardrailTable::Relationships => "relationships",
            GuardrailTable::Transactions => "transactions",
        }
    }
}

impl fmt::Display for GuardrailTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GuardrailTable {
    type Err = GuardrailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "entities" | "core_entities" => Ok(GuardrailTable::Entities),
            "relationships" | "core_relationships" => Ok(GuardrailTable::Relationships),
            "transactions" | "universal_transactions" => Ok(GuardrailTable::Transactions),
            other => Err(GuardrailError::UnknownTable {
                table: other.to_string(),
            }),
        }
    }
}

/// Debit/credit side of a transaction line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineSide {
    Debit,
    Credit,
}

impl fmt::Display for LineSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineSide::Debit => f.write_str("debit"),
            LineSide::Credit => f.write_str("credit"),
        }
    }
}

/// One line of a transaction payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionLine {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_number: Option<u32>,
    /// Optional reference to the entity this line posts against
    /// (e.g. a ledger account).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<LineSide>,
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smart_code: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl TransactionLine {
    /// Resolve the effective side: an explicit indicator wins, otherwise the
    /// sign of the amount decides (negative amounts are credits).
    pub fn resolved_side(&self) -> LineSide {
        match self.side {
            Some(side) => side,
            None if self.amount.is_sign_negative() => LineSide::Credit,
            None => LineSide::Debit,
        }
    }

    /// Magnitude of the line amount, sign convention stripped.
    pub fn amount_abs(&self) -> Decimal {
        self.amount.abs()
    }
}

/// An entity write: any business "thing", typed by `entity_type` and
/// `smart_code` rather than a dedicated table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EntityPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smart_code: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// A relationship write: a typed link between two entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RelationshipPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_entity_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_entity_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smart_code: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// A transaction write: header plus lines, covering both operational events
/// and ledger postings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TransactionPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smart_code: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lines: Vec<TransactionLine>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// The tagged union of the three record kinds the pipeline accepts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardrailPayload {
    Entity(EntityPayload),
    Relationship(RelationshipPayload),
    Transaction(TransactionPayload),
}

impl GuardrailPayload {
    /// The table this payload kind belongs to.
    pub fn table(&self) -> GuardrailTable {
        match self {
            GuardrailPayload::Entity(_) => GuardrailTable::Entities,
            GuardrailPayload::Relationship(_) => GuardrailTable::Relationships,
            GuardrailPayload::Transaction(_) => GuardrailTable::Transactions,
        }
    }

    pub fn organization_id(&self) -> Option<Uuid> {
        match self {
            GuardrailPayload::Entity(p) => p.organization_id,
            GuardrailPayload::Relationship(p) => p.organization_id,
            GuardrailPayload::Transaction(p) => p.organization_id,
        }
    }

    pub fn smart_code(&self) -> Option<&str> {
        match self {
            GuardrailPayload::Entity(p) => p.smart_code.as_deref(),
            GuardrailPayload::Relationship(p) => p.smart_code.as_deref(),
            GuardrailPayload::Transaction(p) => p.smart_code.as_deref(),
        }
    }

    pub fn set_smart_code(&mut self, code: String) {
        match self {
            GuardrailPayload::Entity(p) => p.smart_code = Some(code),
            GuardrailPayload::Relationship(p) => p.smart_code = Some(code),
            GuardrailPayload::Transaction(p) => p.smart_code = Some(code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_from_str_accepts_logical_and_storage_names() {
        assert_eq!(
            "entities".parse::<GuardrailTable>().unwrap(),
            GuardrailTable::Entities
        );
        assert_eq!(
            "universal_transactions".parse::<GuardrailTable>().unwrap(),
            GuardrailTable::Transactions
        );
        assert!(matches!(
            "widgets".parse::<GuardrailTable>(),
            Err(GuardrailError::UnknownTable { .. })
        ));
    }

    #[test]
    fn test_line_side_resolution() {
        let explicit = TransactionLine {
            line_number: Some(1),
            entity_id: None,
            side: Some(LineSide::Credit),
            amount: Decimal::from(100),
            smart_code: None,
            extra: HashMap::new(),
        };
        assert_eq!(explicit.resolved_side(), LineSide::Credit);

        let by_sign = TransactionLine {
            side: None,
            amount: Decimal::from(-50),
            ..explicit.clone()
        };
        assert_eq!(by_sign.resolved_side(), LineSide::Credit);
        assert_eq!(by_sign.amount_abs(), Decimal::from(50));

        let positive = TransactionLine {
            side: None,
            amount: Decimal::from(50),
            ..explicit
        };
        assert_eq!(positive.resolved_side(), LineSide::Debit);
    }

    #[test]
    fn test_extension_fields_round_trip() {
        let json = serde_json::json!({
            "organization_id": "c0ffee00-0000-4000-8000-000000000001",
            "entity_type": "customer",
            "smart_code": "HERA.SALON.CRM.CUST.PROFILE.v1",
            "loyalty_tier": "gold"
        });
        let payload: EntityPayload = serde_json::from_value(json).unwrap();
        assert_eq!(payload.entity_type.as_deref(), Some("customer"));
        assert_eq!(
            payload.extra.get("loyalty_tier"),
            Some(&Value::String("gold".to_string()))
        );

        let back = serde_json::to_value(&payload).unwrap();
        assert_eq!(back["loyalty_tier"], "gold");
    }
}
