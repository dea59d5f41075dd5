//! Witness voting for the covenant ledger.
//!
//! Every account either votes for witnesses directly or names a proxy that
//! votes on its behalf. Proxies form a forest: a root (no proxy) applies its
//! own shares plus everything proxied to it onto each witness it approves.
//! Weight that arrives through a proxy is tracked per depth in
//! `Account::proxied_vsf_votes`, so moving an account between chains only
//! touches the accounts on the old and new path.

pub mod audit;
pub mod proxy;
pub mod witness;

pub use audit::audit_vote_weights;
pub use proxy::{ProxyDelta, ProxyVoteGraph};
pub use witness::update_witness;
