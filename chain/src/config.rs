//! Chain configuration with TOML file support.

use crate::genesis::GenesisConfig;
use crate::ChainError;
use covenant_crypto::blake2b_256;
use covenant_types::{ChainId, ChainParams};
use covenant_utils::LogFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything needed to start a chain from genesis.
///
/// Load with [`ChainConfig::from_toml_file`] or build programmatically for
/// tests. Every field has a default, so an empty file is a valid testnet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Network name. Also seeds the chain id when none is given.
    #[serde(default = "default_network")]
    pub network: String,

    /// Hex chain id mixed into every signing digest. Empty derives it from `network`.
    #[serde(default)]
    pub chain_id: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Run the full invariant check after every block.
    #[serde(default)]
    pub check_invariants: bool,

    /// Testnet values when absent. Fields missing inside a `[params]` table
    /// take their mainnet values.
    #[serde(default = "ChainParams::testnet")]
    pub params: ChainParams,

    #[serde(default)]
    pub genesis: GenesisConfig,
}

fn default_network() -> String {
    "testnet".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ChainConfig {
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ChainError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ChainError> {
        toml::from_str(s).map_err(|e| ChainError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String, ChainError> {
        toml::to_string_pretty(self).map_err(|e| ChainError::Config(e.to_string()))
    }

    pub fn chain_id(&self) -> Result<ChainId, ChainError> {
        if self.chain_id.is_empty() {
            return Ok(ChainId::new(blake2b_256(self.network.as_bytes())));
        }
        ChainId::from_hex(&self.chain_id)
            .ok_or_else(|| ChainError::Config(format!("invalid chain id {:?}", self.chain_id)))
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            network: default_network(),
            chain_id: String::new(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            check_invariants: false,
            params: ChainParams::testnet(),
            genesis: GenesisConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genesis::GenesisAccount;
    use covenant_types::{AccountName, PublicKey, Timestamp};
    use std::io::Write;

    #[test]
    fn default_config_round_trips_through_toml() {
        let mut config = ChainConfig::default();
        config.genesis.accounts.push(GenesisAccount {
            name: AccountName::new("initminer").unwrap(),
            key: PublicKey([9; 32]),
            balance: 1_000,
            vesting: 10,
            recovery_account: None,
            witness_url: Some("https://example.com".into()),
        });
        let text = config.to_toml_string().unwrap();
        let parsed = ChainConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn empty_toml_is_a_testnet() {
        let config = ChainConfig::from_toml_str("").unwrap();
        assert_eq!(config.network, "testnet");
        assert_eq!(config.params, ChainParams::testnet());
        assert_eq!(config.log_format, LogFormat::Human);
        assert_eq!(config.genesis.reward_funds.len(), 1);
    }

    #[test]
    fn partial_overrides() {
        let toml = r#"
            network = "mainnet"
            log_format = "json"

            [params]
            max_withdraw_routes = 4

            [genesis]
            time = 1700000000
            account_creation_fee = 100
        "#;
        let config = ChainConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.params.max_withdraw_routes, 4);
        assert_eq!(config.params.vesting_withdraw_intervals, 13);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.genesis.time, Timestamp::new(1_700_000_000));
        assert_eq!(config.genesis.account_creation_fee, 100);
    }

    #[test]
    fn chain_id_derivation_and_parsing() {
        let mut config = ChainConfig::default();
        let derived = config.chain_id().unwrap();
        config.network = "other".into();
        assert_ne!(config.chain_id().unwrap(), derived);

        config.chain_id = "ab".repeat(32);
        assert_eq!(config.chain_id().unwrap(), ChainId::new([0xab; 32]));
        config.chain_id = "xyz".into();
        assert!(matches!(config.chain_id(), Err(ChainError::Config(_))));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "network = \"local\"\ncheck_invariants = true").unwrap();
        let config = ChainConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(config.network, "local");
        assert!(config.check_invariants);

        assert!(matches!(
            ChainConfig::from_toml_file("/nonexistent/covenant.toml"),
            Err(ChainError::Io(_))
        ));
    }
}
