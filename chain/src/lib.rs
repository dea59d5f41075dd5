//! The Covenant state machine.
//!
//! [`Chain`] owns a [`LedgerStore`](covenant_store::LedgerStore) and applies
//! blocks to it. Each block runs its transactions in order, each inside its
//! own undo session, then the per-block maintenance pass:
//!
//! 1. release expired delegation reserves
//! 2. pay due power-down installments
//! 3. decay reward fund claims
//! 4. expire recovery requests, prune owner history, apply partner changes
//!
//! A block either applies completely or leaves the store untouched.

pub mod account;
pub mod block;
pub mod chain;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod genesis;
pub mod invariants;
pub mod metrics;
pub mod snapshot;

pub use block::Block;
pub use chain::Chain;
pub use config::ChainConfig;
pub use error::ChainError;
pub use genesis::{apply_genesis, GenesisAccount, GenesisConfig, GenesisRewardFund};
pub use invariants::validate_invariants;
pub use metrics::ChainMetrics;
pub use snapshot::StateSnapshot;
