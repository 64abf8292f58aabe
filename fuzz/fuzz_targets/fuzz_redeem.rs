#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use cleantoken_ledger::Ledger;
use cleantoken_types::Perk;

#[derive(Arbitrary, Debug)]
enum Op {
    Mint { impact: u8, doubled: bool },
    Redeem { cost: u16 },
}

fuzz_target!(|ops: Vec<Op>| {
    let mut ledger = Ledger::new();
    let mut expected: u64 = 0;

    for op in ops {
        match op {
            Op::Mint { impact, doubled } => {
                let impact = f64::from(impact % 10) + 1.0;
                let multiplier = if doubled { 2.0 } else { 1.0 };
                let tx = ledger
                    .mint("fuzzed action", impact, multiplier)
                    .expect("in-range mint");
                expected += tx.amount;
            }
            Op::Redeem { cost } => {
                let perk = Perk {
                    name: "fuzzed perk".to_string(),
                    cost: u64::from(cost),
                };
                match ledger.redeem(&perk) {
                    Ok(()) => expected -= perk.cost,
                    Err(_) => assert!(expected < perk.cost),
                }
            }
        }
        assert_eq!(ledger.balance(), expected);
    }
});
