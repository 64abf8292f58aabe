#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use cleantoken_ledger::Ledger;

#[derive(Arbitrary, Debug)]
struct MintInput {
    action: String,
    impact: f64,
    multiplier: f64,
}

fuzz_target!(|input: MintInput| {
    let mut ledger = Ledger::new();

    match ledger.mint(&input.action, input.impact, input.multiplier) {
        Ok(tx) => {
            assert_eq!(ledger.balance(), tx.amount);
            assert_eq!(ledger.transactions().len(), 1);
        }
        Err(_) => {
            assert_eq!(ledger.balance(), 0);
            assert!(ledger.transactions().is_empty());
        }
    }
});
