use serde::{Deserialize, Serialize};

/// Immutable mint record. Created only by the ledger; the identifier
/// is derived from action, impact and mint time by the ledger's id
/// scheme and is informational, not an authenticated token.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Transaction {
    pub action: String,
    pub impact: f64,
    pub amount: u64,
    pub id: String,
    pub timestamp: u64,
}
