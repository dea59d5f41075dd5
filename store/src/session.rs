//! Nested undo sessions.

use crate::StoreError;

/// Staged writes that can be committed into the enclosing session or rolled back.
///
/// Sessions nest: a block opens one, each transaction opens another inside it.
/// Committing the inner session folds its undo records into the outer one, so
/// rolling back the block still reverts every committed transaction.
pub trait UndoSession {
    fn begin_session(&mut self);
    fn commit_session(&mut self) -> Result<(), StoreError>;
    fn rollback_session(&mut self) -> Result<(), StoreError>;
    fn session_depth(&self) -> usize;
}
