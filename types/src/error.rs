//! Error taxonomy shared across crates.
//!
//! Every error is a whole-transaction rejection: the caller rolls back the
//! transaction's undo session and nothing it did persists.

use crate::asset::Symbol;
use crate::name::AccountName;
use thiserror::Error;

/// Signatures do not satisfy the authorities a transaction requires.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorityError {
    #[error("missing owner authority of {0}")]
    MissingOwnerAuth(AccountName),

    #[error("missing active authority of {0}")]
    MissingActiveAuth(AccountName),

    #[error("missing posting authority of {0}")]
    MissingPostingAuth(AccountName),

    #[error("missing explicit authority required by the operation")]
    MissingOtherAuth,

    #[error("transaction carries signatures that are not required")]
    IrrelevantSignature,

    #[error("duplicate signature from the same key")]
    DuplicateSignature,

    #[error("signature does not verify against the transaction digest")]
    InvalidSignature,

    #[error("posting authority cannot be combined with active or owner authority")]
    PostingMixedWithActive,
}

/// A transaction is malformed, independent of or against the current state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("amount must not be negative")]
    NegativeAmount,

    #[error("amount must be positive")]
    ZeroAmount,

    #[error("wrong asset symbol: expected {expected}, got {found}")]
    WrongSymbol { expected: Symbol, found: Symbol },

    #[error("route percentages sum to {0}, above 100%")]
    PercentOverflow(u32),

    #[error("cannot create a 0% withdraw route")]
    EmptyRoute,

    #[error("account already has the maximum of {0} withdraw routes")]
    TooManyRoutes(u16),

    #[error("unknown account: {0}")]
    UnknownAccount(AccountName),

    #[error("{0} is not a witness")]
    NotAWitness(AccountName),

    #[error("malformed json metadata: {0}")]
    MalformedMetadata(String),

    #[error("unsupported extensions must be empty")]
    UnsupportedExtensions,

    #[error("invalid account name: {0:?}")]
    InvalidAccountName(String),

    #[error("authority has {members} members, maximum is {max}")]
    AuthorityTooLarge { members: usize, max: usize },

    #[error("authority can never be satisfied")]
    ImpossibleAuthority,

    #[error("cannot delegate to self")]
    SelfDelegation,

    #[error("cannot proxy to self")]
    SelfProxy,

    #[error("must claim a positive amount of at least one reward")]
    NothingToClaim,

    #[error("invalid witness url")]
    InvalidUrl,

    #[error("transaction contains no operations")]
    EmptyTransaction,

    #[error("transaction has expired")]
    TransactionExpired,

    #[error("transaction expiration is too far in the future")]
    ExpirationTooFar,
}

/// A well-formed transaction conflicts with the current chain state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("insufficient available vesting shares: available {available}, requested {requested}")]
    InsufficientAvailableStake { available: i64, requested: i64 },

    #[error("insufficient balance: available {available}, requested {requested}")]
    InsufficientBalance { available: i64, requested: i64 },

    #[error("insufficient balance to pay fee: available {available}, fee {fee}")]
    InsufficientFeeBalance { available: i64, fee: i64 },

    #[error("fee must equal the account creation fee: expected {expected}, paid {paid}")]
    FeeMismatch { expected: i64, paid: i64 },

    #[error("account name already taken: {0}")]
    DuplicateAccountName(AccountName),

    #[error("owner authority can only be updated once per cooldown period")]
    OwnerUpdateTooSoon,

    #[error("account was recovered too recently")]
    RecoveryWindowNotElapsed,

    #[error("no active recovery request for {0}")]
    NoRecoveryRequest(AccountName),

    #[error("new owner authority does not match the recovery request")]
    RecoveryAuthorityMismatch,

    #[error("recent owner authority not found in authority history")]
    RecentAuthorityNotFound,

    #[error("{0} is not the recovery partner of this account")]
    NotRecoveryPartner(AccountName),

    #[error("claim exceeds pending {0} reward balance")]
    ClaimExceedsPending(Symbol),

    #[error("proxy must change")]
    ProxyUnchanged,

    #[error("proxy would create a loop")]
    ProxyLoop,

    #[error("proxy chain exceeds the maximum depth")]
    ProxyChainTooLong,

    #[error("a proxy is set; vote through the proxy")]
    VotingThroughProxy,

    #[error("vote for {0} already exists")]
    VoteAlreadyCast(AccountName),

    #[error("no vote for {0} to remove")]
    VoteNotFound(AccountName),

    #[error("account has voted for the maximum number of witnesses")]
    TooManyWitnessVotes,

    #[error("delegation amount is unchanged")]
    DelegationUnchanged,

    #[error("operation would not change the vesting withdraw rate")]
    WithdrawUnchanged,

    #[error("no claimed accounts pending")]
    NoPendingClaimedAccounts,

    #[error("duplicate transaction")]
    DuplicateTransaction,

    #[error("arithmetic overflow")]
    Overflow,
}

/// Errors from the indexed store backing the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("duplicate key: {0}")]
    Duplicate(String),

    #[error("no open undo session")]
    NoSession,

    #[error("backend error: {0}")]
    Backend(String),
}

/// Top-level error returned by transaction and block application.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Authority(#[from] AuthorityError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    State(#[from] StateError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("invalid block: {0}")]
    InvalidBlock(String),

    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}
