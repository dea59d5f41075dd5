//! Blocks as the state machine sees them.

use covenant_transactions::SignedTransaction;
use covenant_types::Timestamp;
use serde::{Deserialize, Serialize};

/// A numbered, timestamped batch of signed transactions.
///
/// Production, witness signatures and fork choice happen elsewhere; here a
/// block is only the unit of atomic application.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub number: u64,
    pub timestamp: Timestamp,
    #[serde(default)]
    pub transactions: Vec<SignedTransaction>,
}

impl Block {
    pub fn new(number: u64, timestamp: Timestamp, transactions: Vec<SignedTransaction>) -> Self {
        Self {
            number,
            timestamp,
            transactions,
        }
    }

    /// A block carrying no transactions. Still runs maintenance.
    pub fn empty(number: u64, timestamp: Timestamp) -> Self {
        Self::new(number, timestamp, Vec::new())
    }
}
