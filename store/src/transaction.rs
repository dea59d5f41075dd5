//! Recently applied transaction ids, kept until they expire.

use crate::StoreError;
use covenant_types::{Timestamp, TransactionId};

pub trait TransactionStore {
    fn has_transaction(&self, id: &TransactionId) -> Result<bool, StoreError>;
    fn insert_transaction(
        &mut self,
        id: &TransactionId,
        expiration: Timestamp,
    ) -> Result<(), StoreError>;
    /// Drop every id whose expiration is strictly before `now`. Returns how many were removed.
    fn remove_expired_transactions(&mut self, now: Timestamp) -> Result<usize, StoreError>;
}
