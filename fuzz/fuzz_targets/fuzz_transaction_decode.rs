#![no_main]

use covenant_transactions::{validate_transaction, SignedTransaction, Transaction};
use covenant_types::ChainParams;
use libfuzzer_sys::fuzz_target;

// Decoding, stateless validation and authority extraction must never panic,
// whatever bytes arrive.
fuzz_target!(|data: &[u8]| {
    let params = ChainParams::mainnet();

    if let Ok(tx) = bincode::deserialize::<Transaction>(data) {
        let _ = validate_transaction(&tx, &params);
        let _ = tx.required_authorities();
        let _ = tx.id();
    }

    if let Ok(signed) = serde_json::from_slice::<SignedTransaction>(data) {
        let _ = validate_transaction(&signed.transaction, &params);
        let _ = signed.transaction.required_authorities();
    }
});
