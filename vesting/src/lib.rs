//! Vesting stake for the covenant ledger.
//!
//! - [`pool`]: converting liquid STEEM into vesting shares at the pool price.
//! - [`delegation`]: lending vesting shares to another account, with a
//!   reserve that stays locked for the return period after cancellation.
//! - [`withdraw`]: powering vesting shares down over a fixed number of
//!   weekly payments, optionally split across withdraw routes.

pub mod delegation;
pub mod pool;
pub mod withdraw;

pub use delegation::DelegationLedger;
pub use pool::create_vesting;
pub use withdraw::WithdrawalScheduler;
