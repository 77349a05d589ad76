//! Deploy Tools Library
//!
//! Provides the typed build/deploy configuration record for a smart contract
//! toolchain: assembly from environment secrets, named account resolution,
//! and pre-deploy linting.

pub mod accounts;
pub mod config;
pub mod env;
pub mod lint;
pub mod loader;
pub mod logging;

pub use accounts::ResolvedAccount;
pub use config::{AccountSelector, ConfigError, ConfigurationRecord, NetworkEndpoint, Variant};
pub use env::{EnvSource, MapEnv, ProcessEnv};
pub use lint::{LintIssue, Severity};
pub use loader::ConfigLoader;
