//! Nullable infrastructure for deterministic testing and replay.
//!
//! The indexed store the governance core runs on is abstracted behind traits.
//! This crate provides an in-memory implementation that:
//! - Returns deterministic values, in index order
//! - Can be seeded programmatically
//! - Never touches the filesystem or network
//!
//! [`NullStore`] is a complete implementation of `LedgerStore`, with an undo
//! journal per table, so it also backs the replay daemon.

pub mod journal;
pub mod store;

pub use journal::{JournaledMap, JournaledValue};
pub use store::NullStore;
