//! Fundamental types for the Covenant governance core.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! account names, assets and the vesting price, authorities, keys, hashes, timestamps,
//! chain parameters, the error taxonomy and the events emitted by state transitions.

pub mod asset;
pub mod authority;
pub mod error;
pub mod event;
pub mod hash;
pub mod keys;
pub mod name;
pub mod params;
pub mod time;

pub use asset::{Asset, Symbol, VestingPrice};
pub use authority::{Authority, AuthorityTier};
pub use error::{AuthorityError, LedgerError, StateError, StoreError, ValidationError};
pub use event::LedgerEvent;
pub use hash::{ChainId, TransactionId};
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
pub use name::AccountName;
pub use params::ChainParams;
pub use time::Timestamp;
