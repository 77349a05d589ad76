//! Build/deploy configuration record
//!
//! This module defines the typed record handed to the external contract
//! toolchain: the compiler version to invoke, the known networks, and the
//! named account roles. The record is assembled once by
//! [`ConfigLoader`](crate::loader::ConfigLoader) and is read-only afterwards.
//!
//! The serialized shape matches what the toolchain consumes:
//!
//! ```text
//! {
//!   "solidity": "0.8.7",
//!   "defaultNetwork": "hardhat",
//!   "networks": { "rinkeby": { "url": "...", "accounts": ["..."] } },
//!   "namedAccounts": { "deployer": { "default": 0 } }
//! }
//! ```
//!
//! # Examples
//!
//! ```rust,no_run
//! use deploy_tools::{ConfigLoader, Variant};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let record = ConfigLoader::new(Variant::Networked).load();
//! println!("{}", record.redacted().to_json()?);
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Write as _;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Compiler version pinned by both record variants.
pub const COMPILER_VERSION: &str = "0.8.7";

/// Built-in simulated network supplied by the toolchain.
pub const BUILTIN_NETWORK: &str = "hardhat";

/// Remote test network declared by the networked variant.
pub const REMOTE_NETWORK: &str = "rinkeby";

/// Role that signs deployment transactions.
pub const DEPLOYER_ROLE: &str = "deployer";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Invalid variant: {0}. Must be: networked or minimal")]
    InvalidVariant(String),

    #[error("Unknown named account: {0}")]
    UnknownRole(String),

    #[error(
        "Named account '{role}' selects index {index} on network '{network}', \
         but only {available} account(s) are configured"
    )]
    AccountIndexOutOfRange {
        role: String,
        network: String,
        index: usize,
        available: usize,
    },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// The two observed shapes of the configuration record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Declares `defaultNetwork` plus the `hardhat` and `rinkeby` networks
    #[default]
    Networked,
    /// Compiler version and named accounts only; networks fall back to toolchain defaults
    Minimal,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Networked => "networked",
            Variant::Minimal => "minimal",
        }
    }
}

impl FromStr for Variant {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "networked" => Ok(Variant::Networked),
            "minimal" => Ok(Variant::Minimal),
            other => Err(ConfigError::InvalidVariant(other.to_string())),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One deployment/execution target
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkEndpoint {
    /// Connection string; absent for simulated networks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Signing credentials, in the order account indices refer to them
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accounts: Vec<String>,
}

impl NetworkEndpoint {
    /// Endpoint for a simulated network: no url, no credentials
    pub fn simulated() -> Self {
        Self::default()
    }

    pub fn is_remote(&self) -> bool {
        self.url.is_some()
    }

    fn redacted(&self) -> Self {
        Self {
            url: self.url.clone(),
            accounts: self.accounts.iter().map(|a| mask_secret(a)).collect(),
        }
    }
}

// Credentials never reach Debug output.
impl fmt::Debug for NetworkEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let masked: Vec<String> = self.accounts.iter().map(|a| mask_secret(a)).collect();
        f.debug_struct("NetworkEndpoint")
            .field("url", &self.url)
            .field("accounts", &masked)
            .finish()
    }
}

/// Maps a role to an account index
///
/// `default` applies on every network without an entry in `overrides`.
/// Override keys are network names (or chain ids written as strings).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSelector {
    pub default: usize,
    #[serde(flatten)]
    pub overrides: BTreeMap<String, usize>,
}

impl AccountSelector {
    pub fn new(default: usize) -> Self {
        Self {
            default,
            overrides: BTreeMap::new(),
        }
    }

    /// Select `index` on `network`; the key `default` replaces the default index
    pub fn with_override(mut self, network: impl Into<String>, index: usize) -> Self {
        let network = network.into();
        if network == "default" {
            self.default = index;
        } else {
            self.overrides.insert(network, index);
        }
        self
    }
}

/// The complete configuration record consumed by the toolchain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationRecord {
    /// Compiler version tag
    #[serde(rename = "solidity")]
    pub compiler_version: String,
    /// Network used when none is chosen explicitly
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_network: Option<String>,
    /// Known networks; `None` means the toolchain's built-in set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub networks: Option<BTreeMap<String, NetworkEndpoint>>,
    /// Logical roles mapped to account indices
    #[serde(default)]
    pub named_accounts: BTreeMap<String, AccountSelector>,
}

impl ConfigurationRecord {
    /// Look up a declared network
    pub fn network(&self, name: &str) -> Option<&NetworkEndpoint> {
        self.networks.as_ref().and_then(|n| n.get(name))
    }

    /// Network the toolchain selects when none is given
    pub fn effective_default_network(&self) -> &str {
        self.default_network.as_deref().unwrap_or(BUILTIN_NETWORK)
    }

    /// Copy of the record with every credential masked
    pub fn redacted(&self) -> Self {
        Self {
            compiler_version: self.compiler_version.clone(),
            default_network: self.default_network.clone(),
            networks: self.networks.as_ref().map(|networks| {
                networks
                    .iter()
                    .map(|(name, endpoint)| (name.clone(), endpoint.redacted()))
                    .collect()
            }),
            named_accounts: self.named_accounts.clone(),
        }
    }

    /// Get configuration as JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Get configuration as TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Write the record as pretty JSON
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let mut json = self.to_json()?;
        json.push('\n');
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn read_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Render the human-readable summary, credentials masked
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let rule = "═".repeat(64);
        let _ = writeln!(out, "╔{rule}╗");
        let _ = writeln!(out, "║{:^64}║", "DEPLOY CONFIGURATION RESOLVED");
        let _ = writeln!(out, "╚{rule}╝");
        let _ = writeln!(out, "  Compiler:            {}", self.compiler_version);

        match &self.default_network {
            Some(network) => {
                let _ = writeln!(out, "  Default Network:     {network}");
            }
            None => {
                let _ = writeln!(out, "  Default Network:     (toolchain default: {BUILTIN_NETWORK})");
            }
        }

        match &self.networks {
            Some(networks) => {
                let _ = writeln!(out, "  Networks:");
                for (name, endpoint) in networks {
                    let url = endpoint.url.as_deref().unwrap_or("(simulated)");
                    let _ = writeln!(out, "    {name:<18} {url}");
                    if endpoint.is_remote() && endpoint.accounts.is_empty() {
                        let _ = writeln!(out, "    {:<18} accounts: (none configured)", "");
                    }
                    for (i, account) in endpoint.accounts.iter().enumerate() {
                        let _ = writeln!(out, "    {:<18} [{i}] {}", "", mask_secret(account));
                    }
                }
            }
            None => {
                let _ = writeln!(out, "  Networks:            (toolchain defaults)");
            }
        }

        let _ = writeln!(out, "  Named Accounts:");
        for (role, selector) in &self.named_accounts {
            let _ = write!(out, "    {role:<18} default={}", selector.default);
            for (network, index) in &selector.overrides {
                let _ = write!(out, " {network}={index}");
            }
            out.push('\n');
        }

        let _ = writeln!(out, "╚{rule}╝");
        out
    }

    /// Print the resolved configuration
    pub fn print_summary(&self) {
        print!("{}", self.summary());
    }
}

/// Mask a credential, keeping at most the first and last four characters
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}…{tail}")
}
