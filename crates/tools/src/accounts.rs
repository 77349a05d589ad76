//! Named account resolution
//!
//! Turns a role such as `deployer` into the concrete account the toolchain
//! would pick on a given network.

use crate::config::{AccountSelector, ConfigError, ConfigurationRecord};

/// Where a role's account comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedAccount {
    /// An entry of the network's configured `accounts`
    Configured { index: usize, secret: String },
    /// The network has no configured accounts; the toolchain's own list fills the role
    Framework { index: usize },
}

impl ResolvedAccount {
    pub fn index(&self) -> usize {
        match self {
            ResolvedAccount::Configured { index, .. } | ResolvedAccount::Framework { index } => {
                *index
            }
        }
    }
}

impl AccountSelector {
    /// Index for `network`: its override if any, else `default`
    pub fn index_for(&self, network: &str) -> usize {
        self.overrides.get(network).copied().unwrap_or(self.default)
    }
}

impl ConfigurationRecord {
    /// Resolve `role` on `network`, or on the effective default network when `None`
    pub fn resolve_account(
        &self,
        role: &str,
        network: Option<&str>,
    ) -> Result<ResolvedAccount, ConfigError> {
        let selector = self
            .named_accounts
            .get(role)
            .ok_or_else(|| ConfigError::UnknownRole(role.to_string()))?;
        let network = network.unwrap_or_else(|| self.effective_default_network());
        let index = selector.index_for(network);

        let accounts = match self.network(network) {
            Some(endpoint) if !endpoint.accounts.is_empty() => &endpoint.accounts,
            _ => return Ok(ResolvedAccount::Framework { index }),
        };

        accounts
            .get(index)
            .map(|secret| ResolvedAccount::Configured {
                index,
                secret: secret.clone(),
            })
            .ok_or_else(|| ConfigError::AccountIndexOutOfRange {
                role: role.to_string(),
                network: network.to_string(),
                index,
                available: accounts.len(),
            })
    }
}
