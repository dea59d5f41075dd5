use covenant_types::LedgerError;
use thiserror::Error;

/// Failures outside block application: configuration, files and metrics.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}
