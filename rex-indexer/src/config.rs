//! Indexer configuration, persisted with `confy`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use rex_core::{LedgerError, Result};
use rex_shared_types::{Address, Asset};

pub const APP_NAME: &str = "rex-indexer";
pub const CONFIG_NAME: &str = "indexer-config";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexerConfig {
    /// Directory holding the sled ledger database.
    pub data_dir: PathBuf,
    /// Address of the REX token contract.
    pub rex_contract: Option<String>,
    /// Address of the stkREX staking contract.
    pub stk_rex_contract: Option<String>,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("rex-ledger-db"),
            rex_contract: None,
            stk_rex_contract: None,
            log_level: "info".to_string(),
        }
    }
}

impl IndexerConfig {
    /// Loads the configuration from `path`, or from the platform config
    /// directory when no path is given. A missing file is created with defaults.
    pub fn load(path: Option<&Path>) -> std::result::Result<Self, confy::ConfyError> {
        match path {
            Some(path) => confy::load_path(path),
            None => confy::load(APP_NAME, CONFIG_NAME),
        }
    }

    pub fn contracts(&self) -> Result<ContractRegistry> {
        let mut registry = ContractRegistry::default();
        if let Some(contract) = &self.rex_contract {
            registry.register(contract, Asset::Rex)?;
        }
        if let Some(contract) = &self.stk_rex_contract {
            registry.register(contract, Asset::StkRex)?;
        }
        Ok(registry)
    }
}

/// Maps emitting contract addresses to the asset they carry.
#[derive(Debug, Clone, Default)]
pub struct ContractRegistry {
    contracts: HashMap<Address, Asset>,
}

impl ContractRegistry {
    pub fn register(&mut self, contract: &str, asset: Asset) -> Result<()> {
        let address = Address::parse(contract)?;
        if let Some(existing) = self.contracts.get(&address) {
            if *existing != asset {
                return Err(LedgerError::Other(format!(
                    "contract {} is configured for both {} and {}",
                    address,
                    existing.label(),
                    asset.label()
                )));
            }
        }
        self.contracts.insert(address, asset);
        Ok(())
    }

    pub fn asset_for(&self, contract: &Address) -> Result<Asset> {
        self.contracts
            .get(contract)
            .copied()
            .ok_or_else(|| LedgerError::UnknownContract(contract.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REX: &str = "0x00000000000000000000000000000000000000Aa";
    const STK_REX: &str = "0x00000000000000000000000000000000000000bb";

    fn config() -> IndexerConfig {
        IndexerConfig {
            rex_contract: Some(REX.to_string()),
            stk_rex_contract: Some(STK_REX.to_string()),
            ..IndexerConfig::default()
        }
    }

    #[test]
    fn test_registry_maps_contracts_case_insensitively() {
        let registry = config().contracts().unwrap();
        let rex = Address::parse("0x00000000000000000000000000000000000000aa").unwrap();
        let stk = Address::parse(STK_REX).unwrap();
        assert_eq!(registry.asset_for(&rex).unwrap(), Asset::Rex);
        assert_eq!(registry.asset_for(&stk).unwrap(), Asset::StkRex);
    }

    #[test]
    fn test_unknown_contract_is_rejected() {
        let registry = config().contracts().unwrap();
        let other = Address::parse("0x00000000000000000000000000000000000000cc").unwrap();
        assert!(matches!(
            registry.asset_for(&other),
            Err(LedgerError::UnknownContract(_))
        ));
    }

    #[test]
    fn test_same_contract_for_both_assets_is_rejected() {
        let cfg = IndexerConfig {
            stk_rex_contract: Some(REX.to_string()),
            ..config()
        };
        assert!(cfg.contracts().is_err());
    }

    #[test]
    fn test_load_path_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("indexer.toml");
        let cfg = IndexerConfig::load(Some(path.as_path())).unwrap();
        assert_eq!(cfg, IndexerConfig::default());
        assert!(path.exists());
    }
}
