//! Authority resolution.
//!
//! Decides whether the keys that signed a transaction satisfy every
//! authority its operations require. Owner satisfies active and posting
//! requirements, active satisfies posting, and every supplied signature must
//! be needed by something.

pub mod required;
pub mod sign_state;
pub mod signers;
pub mod source;
pub mod validate;
pub mod verify;

pub use required::RequiredAuthorities;
pub use sign_state::SignState;
pub use signers::collect_signers;
pub use source::AuthoritySource;
pub use validate::validate_authority_accounts;
pub use verify::verify_authority;
