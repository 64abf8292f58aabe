use cleantoken_types::{Perk, Transaction};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

pub mod clock;
pub mod ident;

pub use clock::{Clock, FixedClock, SystemClock};
pub use ident::{Blake3IdScheme, IdScheme, DEFAULT_ID_LENGTH};

pub const MIN_IMPACT: f64 = 1.0;
pub const MAX_IMPACT: f64 = 10.0;
pub const BASE_TOKENS_PER_IMPACT: f64 = 10.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("impact {0} outside the accepted 1-10 range")]
    ImpactOutOfRange(f64),
    #[error("multiplier {0} must be finite and at least 1")]
    MultiplierOutOfRange(f64),
    #[error("minted amount {0} is not representable")]
    AmountNotRepresentable(f64),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("balance {balance} cannot cover {cost}, short {shortfall} tokens")]
    InsufficientBalance {
        cost: u64,
        balance: u64,
        shortfall: u64,
    },
}

/// Owns the wallet balance and the append-only mint log for one
/// session. Created per session, discarded at session end; nothing is
/// persisted. All mutation goes through `mint` and `redeem`, each a
/// single read-modify-write over `&mut self`, so wrapping one ledger
/// in a mutex is enough to keep the balance invariant under
/// concurrent callers.
pub struct Ledger {
    balance: u64,
    log: Vec<Transaction>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdScheme>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::with_capabilities(
            Arc::new(SystemClock),
            Arc::new(Blake3IdScheme::default()),
        )
    }

    /// Injects the time source and identifier scheme, the two inputs
    /// that make mint records reproducible under test.
    pub fn with_capabilities(clock: Arc<dyn Clock>, ids: Arc<dyn IdScheme>) -> Self {
        Self {
            balance: 0,
            log: Vec::new(),
            clock,
            ids,
        }
    }

    /// Mints tokens for a reported eco-action.
    ///
    /// `amount = round_half_up(impact * 10 * multiplier)`. Rejects an
    /// impact outside [1, 10] or a multiplier below 1 before touching
    /// any state.
    pub fn mint(
        &mut self,
        action: &str,
        impact: f64,
        multiplier: f64,
    ) -> Result<Transaction, LedgerError> {
        if !impact.is_finite() || !(MIN_IMPACT..=MAX_IMPACT).contains(&impact) {
            return Err(ValidationError::ImpactOutOfRange(impact).into());
        }
        if !multiplier.is_finite() || multiplier < 1.0 {
            return Err(ValidationError::MultiplierOutOfRange(multiplier).into());
        }

        let raw = impact * BASE_TOKENS_PER_IMPACT * multiplier;
        if !raw.is_finite() {
            return Err(ValidationError::AmountNotRepresentable(raw).into());
        }
        // Round half up: for non-negative inputs floor(x + 0.5) is the
        // documented rule exactly.
        let amount = (raw + 0.5).floor() as u64;

        let timestamp = self.clock.now_unix();
        let id = self.ids.derive_id(action, impact, timestamp);
        let tx = Transaction {
            action: action.to_string(),
            impact,
            amount,
            id,
            timestamp,
        };

        self.balance = self.balance.saturating_add(amount);
        self.log.push(tx.clone());
        info!(amount, id = %tx.id, action, "minted tokens for eco-action");
        Ok(tx)
    }

    /// Debits the perk cost, or reports how many tokens are missing.
    /// The balance is untouched on failure and can never go negative.
    pub fn redeem(&mut self, perk: &Perk) -> Result<(), LedgerError> {
        if self.balance < perk.cost {
            return Err(LedgerError::InsufficientBalance {
                cost: perk.cost,
                balance: self.balance,
                shortfall: perk.cost - self.balance,
            });
        }
        self.balance -= perk.cost;
        info!(perk = %perk.name, cost = perk.cost, balance = self.balance, "perk redeemed");
        Ok(())
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.log
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}
