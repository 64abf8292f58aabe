use serde::Serialize;

pub const DEFAULT_ID_LENGTH: usize = 10;

/// Derives the informational identifier stamped on each mint record.
/// Injected alongside the clock so tests can fix both inputs; the
/// default scheme is deterministic given (action, impact, timestamp).
pub trait IdScheme: Send + Sync {
    fn derive_id(&self, action: &str, impact: f64, timestamp: u64) -> String;
}

/// blake3 over the bincode-serialized preimage, hex-encoded and
/// truncated. Collisions are possible in principle for identical
/// inputs within one clock second; that is acceptable for an
/// informational tag.
#[derive(Debug, Clone, Copy)]
pub struct Blake3IdScheme {
    pub length: usize,
}

impl Default for Blake3IdScheme {
    fn default() -> Self {
        Self {
            length: DEFAULT_ID_LENGTH,
        }
    }
}

impl IdScheme for Blake3IdScheme {
    fn derive_id(&self, action: &str, impact: f64, timestamp: u64) -> String {
        #[derive(Serialize)]
        struct IdPreimage<'a> {
            action: &'a str,
            impact: f64,
            timestamp: u64,
        }

        let preimage = IdPreimage {
            action,
            impact,
            timestamp,
        };
        let bytes = bincode::serialize(&preimage).expect("id preimage serialization");
        let mut id = hex::encode(blake3::hash(&bytes).as_bytes());
        id.truncate(self.length);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_are_deterministic_and_truncated() {
        let scheme = Blake3IdScheme::default();
        let a = scheme.derive_id("Planted 3 trees", 3.0, 100);
        let b = scheme.derive_id("Planted 3 trees", 3.0, 100);
        assert_eq!(a, b);
        assert_eq!(a.len(), DEFAULT_ID_LENGTH);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn any_input_change_moves_the_identifier() {
        let scheme = Blake3IdScheme::default();
        let base = scheme.derive_id("Planted 3 trees", 3.0, 100);
        assert_ne!(base, scheme.derive_id("Planted 3 trees", 3.0, 101));
        assert_ne!(base, scheme.derive_id("Planted 4 trees", 3.0, 100));
        assert_ne!(base, scheme.derive_id("Planted 3 trees", 4.0, 100));
    }
}
