//! Account recovery for the covenant ledger.
//!
//! Every owner authority change is remembered for a recovery period. If an
//! account is compromised, its recovery partner files a request naming a new
//! owner authority; the rightful owner then proves control of a recent owner
//! authority together with the new one, and the request executes.

pub mod flow;
pub mod owner;

pub use flow::AccountRecoveryFlow;
pub use owner::update_owner_authority;
