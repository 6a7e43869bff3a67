//! Entity-type canonicalization
//!
//! Maps deprecated or drifted entity-type labels to their canonical form.
//! The alias table is scoped by record kind: the same label may mean
//! different things on different tables, and only entity-table aliases are
//! registered today. Remaps are deterministic, so the orchestrator records
//! them as fixes with confidence 1.0.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::payload::GuardrailTable;

/// Alias pairs for the entities table. Plain data on purpose: this is a
/// lookup table, not a dispatch point.
const ENTITY_ALIASES: &[(&str, &str)] = &[("gl_account", "account")];

fn entity_alias_table() -> &'static HashMap<&'static str, &'static str> {
    static TABLE: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    TABLE.get_or_init(|| ENTITY_ALIASES.iter().copied().collect())
}

/// Outcome of a canonicalization attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalType {
    pub type_name: String,
    pub fix_applied: bool,
}

/// Map an entity-type label to its canonical form for the given table.
///
/// Unknown labels pass through unchanged; the canonicalizer only fixes
/// drift it can resolve deterministically.
pub fn canonicalize(table: GuardrailTable, entity_type: &str) -> CanonicalType {
    if table != GuardrailTable::Entities {
        return CanonicalType {
            type_name: entity_type.to_string(),
            fix_applied: false,
        };
    }

    let lowered = entity_type.to_ascii_lowercase();
    match entity_alias_table().get(lowered.as_str()) {
        Some(canonical) => CanonicalType {
            type_name: (*canonical).to_string(),
            fix_applied: true,
        },
        None => CanonicalType {
            type_name: entity_type.to_string(),
            fix_applied: false,
        },
    }
}
