use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A redeemable reward with a fixed token cost.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Perk {
    pub name: String,
    pub cost: u64,
}

/// Static read-only `name -> cost` mapping consumed by the redeem
/// path. Whether a perk exists is the caller's concern; the ledger
/// only ever sees the numeric cost.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PerkCatalog {
    perks: BTreeMap<String, u64>,
}

impl PerkCatalog {
    pub fn new(entries: impl IntoIterator<Item = (String, u64)>) -> Self {
        Self {
            perks: entries.into_iter().collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<Perk> {
        self.perks.get(name).map(|&cost| Perk {
            name: name.to_string(),
            cost,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = Perk> + '_ {
        self.perks.iter().map(|(name, &cost)| Perk {
            name: name.clone(),
            cost,
        })
    }

    pub fn len(&self) -> usize {
        self.perks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.perks.is_empty()
    }
}

impl Default for PerkCatalog {
    /// The standard reward lineup.
    fn default() -> Self {
        Self::new([
            ("Free Water (1L)".to_string(), 10),
            ("Coffee Discount".to_string(), 20),
            ("Bus Pass Extension".to_string(), 50),
            ("Grocery Voucher".to_string(), 100),
            ("Cashback ($5)".to_string(), 200),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_returns_cost_for_known_perks() {
        let catalog = PerkCatalog::default();
        let perk = catalog.get("Coffee Discount").unwrap();
        assert_eq!(perk.cost, 20);
        assert!(catalog.get("Jetpack").is_none());
    }

    #[test]
    fn default_catalog_carries_five_perks() {
        assert_eq!(PerkCatalog::default().len(), 5);
    }
}
