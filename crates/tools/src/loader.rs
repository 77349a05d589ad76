//! Assembles the configuration record from the static literal and environment secrets.
//!
//! Construction never fails. A missing secret leaves the corresponding field
//! absent (or the credential list empty); the toolchain rejects it later, at
//! the point it actually needs to sign.

use std::collections::BTreeMap;

use crate::config::{
    AccountSelector, ConfigurationRecord, NetworkEndpoint, Variant, BUILTIN_NETWORK,
    COMPILER_VERSION, DEPLOYER_ROLE, REMOTE_NETWORK,
};
use crate::env::{self, EnvSource, ProcessEnv, INFURA_RPC_URL, PRIVATE_KEY};

#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigLoader {
    variant: Variant,
}

impl ConfigLoader {
    pub fn new(variant: Variant) -> Self {
        Self { variant }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Load `.env` if present, then build from the process environment
    pub fn load(&self) -> ConfigurationRecord {
        env::load_dotenv();
        self.from_env(&ProcessEnv)
    }

    /// Build the record from an explicit environment
    pub fn from_env(&self, source: &impl EnvSource) -> ConfigurationRecord {
        let mut named_accounts = BTreeMap::new();
        named_accounts.insert(DEPLOYER_ROLE.to_string(), AccountSelector::new(0));

        let record = match self.variant {
            Variant::Networked => {
                let url = source.var(INFURA_RPC_URL);
                let accounts: Vec<String> = source.var(PRIVATE_KEY).into_iter().collect();

                if url.is_none() {
                    tracing::warn!(var = INFURA_RPC_URL, network = REMOTE_NETWORK, "secret not set");
                }
                if accounts.is_empty() {
                    tracing::warn!(var = PRIVATE_KEY, network = REMOTE_NETWORK, "secret not set");
                }

                let mut networks = BTreeMap::new();
                networks.insert(BUILTIN_NETWORK.to_string(), NetworkEndpoint::simulated());
                networks.insert(REMOTE_NETWORK.to_string(), NetworkEndpoint { url, accounts });

                ConfigurationRecord {
                    compiler_version: COMPILER_VERSION.to_string(),
                    default_network: Some(BUILTIN_NETWORK.to_string()),
                    networks: Some(networks),
                    named_accounts,
                }
            }
            Variant::Minimal => ConfigurationRecord {
                compiler_version: COMPILER_VERSION.to_string(),
                default_network: None,
                networks: None,
                named_accounts,
            },
        };

        tracing::debug!(
            variant = %self.variant,
            networks = record.networks.as_ref().map_or(0, |n| n.len()),
            "configuration record built"
        );
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MapEnv;

    fn full_env() -> MapEnv {
        MapEnv::new()
            .with(INFURA_RPC_URL, "https://x")
            .with(PRIVATE_KEY, "abc")
    }

    #[test]
    fn test_networked_with_secrets() {
        let record = ConfigLoader::new(Variant::Networked).from_env(&full_env());
        let rinkeby = record.network(REMOTE_NETWORK).unwrap();
        assert_eq!(rinkeby.url.as_deref(), Some("https://x"));
        assert_eq!(rinkeby.accounts, vec!["abc".to_string()]);
        assert_eq!(record.default_network.as_deref(), Some(BUILTIN_NETWORK));
        assert_eq!(record.network(BUILTIN_NETWORK), Some(&NetworkEndpoint::simulated()));
    }

    #[test]
    fn test_networked_json_shape() {
        let record = ConfigLoader::new(Variant::Networked).from_env(&full_env());
        let value: serde_json::Value = serde_json::from_str(&record.to_json().unwrap()).unwrap();
        assert_eq!(
            value["networks"]["rinkeby"],
            serde_json::json!({ "url": "https://x", "accounts": ["abc"] })
        );
    }

    #[test]
    fn test_networked_without_secrets() {
        let record = ConfigLoader::new(Variant::Networked).from_env(&MapEnv::new());
        let rinkeby = record.network(REMOTE_NETWORK).unwrap();
        assert_eq!(rinkeby.url, None);
        assert!(rinkeby.accounts.is_empty());
    }

    #[test]
    fn test_networked_with_only_url() {
        let env = MapEnv::new().with(INFURA_RPC_URL, "https://x");
        let record = ConfigLoader::new(Variant::Networked).from_env(&env);
        let rinkeby = record.network(REMOTE_NETWORK).unwrap();
        assert_eq!(rinkeby.url.as_deref(), Some("https://x"));
        assert!(rinkeby.accounts.is_empty());
    }

    #[test]
    fn test_networked_with_only_key() {
        let env = MapEnv::new().with(PRIVATE_KEY, "abc");
        let record = ConfigLoader::new(Variant::Networked).from_env(&env);
        let rinkeby = record.network(REMOTE_NETWORK).unwrap();
        assert_eq!(rinkeby.url, None);
        assert_eq!(rinkeby.accounts, vec!["abc".to_string()]);
    }

    #[test]
    fn test_empty_key_yields_no_credential() {
        let env = MapEnv::new().with(PRIVATE_KEY, "");
        let record = ConfigLoader::new(Variant::Networked).from_env(&env);
        assert!(record.network(REMOTE_NETWORK).unwrap().accounts.is_empty());
    }

    #[test]
    fn test_minimal_omits_networks() {
        let record = ConfigLoader::new(Variant::Minimal).from_env(&full_env());
        assert!(record.networks.is_none());
        assert!(record.default_network.is_none());
        let value: serde_json::Value = serde_json::from_str(&record.to_json().unwrap()).unwrap();
        let obj = value.as_object().unwrap();
        assert!(!obj.contains_key("networks"));
        assert!(!obj.contains_key("defaultNetwork"));
    }

    #[test]
    fn test_constants_in_both_variants() {
        for variant in [Variant::Networked, Variant::Minimal] {
            for env in [full_env(), MapEnv::new()] {
                let record = ConfigLoader::new(variant).from_env(&env);
                assert_eq!(record.compiler_version, "0.8.7");
                assert_eq!(record.named_accounts[DEPLOYER_ROLE].default, 0);
                assert!(record.named_accounts[DEPLOYER_ROLE].overrides.is_empty());
            }
        }
    }

    #[test]
    fn test_round_trip_both_variants() {
        for variant in [Variant::Networked, Variant::Minimal] {
            let record = ConfigLoader::new(variant).from_env(&full_env());
            let parsed = ConfigurationRecord::from_json(&record.to_json().unwrap()).unwrap();
            assert_eq!(parsed, record);
        }
    }

    #[test]
    fn test_default_loader_is_networked() {
        assert_eq!(ConfigLoader::default().variant(), Variant::Networked);
    }
}
