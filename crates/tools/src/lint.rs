//! Opt-in checks over a built record
//!
//! Construction never validates. These checks report what the toolchain would
//! reject later, so problems surface before a deploy is attempted.

use std::fmt;

use crate::config::{ConfigError, ConfigurationRecord, BUILTIN_NETWORK};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintIssue {
    pub severity: Severity,
    /// Dotted path of the offending field, e.g. `networks.rinkeby.url`
    pub field: String,
    pub message: String,
}

impl LintIssue {
    fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            field: field.into(),
            message: message.into(),
        }
    }

    fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for LintIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.severity, self.field, self.message)
    }
}

const URL_SCHEMES: [&str; 4] = ["http://", "https://", "ws://", "wss://"];

fn is_version_triple(version: &str) -> bool {
    let parts: Vec<&str> = version.split('.').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
}

impl ConfigurationRecord {
    /// Collect every issue; an empty list means the record is clean
    pub fn lint(&self) -> Vec<LintIssue> {
        let mut issues = Vec::new();

        if !is_version_triple(&self.compiler_version) {
            issues.push(LintIssue::error(
                "solidity",
                format!(
                    "compiler version must be MAJOR.MINOR.PATCH: {}",
                    self.compiler_version
                ),
            ));
        }

        if let Some(default) = &self.default_network {
            if default != BUILTIN_NETWORK && self.network(default).is_none() {
                issues.push(LintIssue::error(
                    "defaultNetwork",
                    format!("'{default}' is not a declared network"),
                ));
            }
        }

        for (name, endpoint) in self.networks.iter().flatten() {
            if let Some(url) = &endpoint.url {
                if !URL_SCHEMES.iter().any(|s| url.starts_with(s)) {
                    issues.push(LintIssue::error(
                        format!("networks.{name}.url"),
                        format!("URL must start with http://, https://, ws:// or wss://: {url}"),
                    ));
                }
                if endpoint.accounts.is_empty() {
                    issues.push(LintIssue::warning(
                        format!("networks.{name}.accounts"),
                        "remote network has no signing accounts",
                    ));
                }
            } else if name != BUILTIN_NETWORK {
                issues.push(LintIssue::warning(
                    format!("networks.{name}.url"),
                    "network has no URL",
                ));
            }

            if endpoint.accounts.is_empty() {
                continue;
            }
            for (role, selector) in &self.named_accounts {
                let index = selector.index_for(name);
                if index >= endpoint.accounts.len() {
                    issues.push(LintIssue::error(
                        format!("namedAccounts.{role}"),
                        format!(
                            "index {index} out of range on '{name}' ({} account(s))",
                            endpoint.accounts.len()
                        ),
                    ));
                }
            }
        }

        issues
    }

    /// Fail on the first error-level issue
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self
            .lint()
            .into_iter()
            .find(|i| i.severity == Severity::Error)
        {
            Some(issue) => Err(ConfigError::ValidationError(issue.to_string())),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AccountSelector, Variant, DEPLOYER_ROLE, REMOTE_NETWORK};
    use crate::env::{MapEnv, INFURA_RPC_URL, PRIVATE_KEY};
    use crate::loader::ConfigLoader;

    fn networked(env: MapEnv) -> ConfigurationRecord {
        ConfigLoader::new(Variant::Networked).from_env(&env)
    }

    fn complete() -> ConfigurationRecord {
        networked(
            MapEnv::new()
                .with(INFURA_RPC_URL, "https://rinkeby.infura.io/v3/abc")
                .with(PRIVATE_KEY, "abc"),
        )
    }

    #[test]
    fn test_complete_record_is_clean() {
        assert!(complete().lint().is_empty());
        assert!(complete().validate().is_ok());
    }

    #[test]
    fn test_minimal_record_is_clean() {
        let record = ConfigLoader::new(Variant::Minimal).from_env(&MapEnv::new());
        assert!(record.lint().is_empty());
    }

    #[test]
    fn test_missing_secrets_are_warnings() {
        let record = networked(MapEnv::new());
        let issues = record.lint();
        assert!(!issues.is_empty());
        assert!(issues.iter().all(|i| i.severity == Severity::Warning));
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_missing_key_with_url() {
        let record = networked(MapEnv::new().with(INFURA_RPC_URL, "https://x"));
        let issues = record.lint();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "networks.rinkeby.accounts");
    }

    #[test]
    fn test_bad_url_scheme() {
        let record = networked(
            MapEnv::new()
                .with(INFURA_RPC_URL, "ftp://example.com")
                .with(PRIVATE_KEY, "abc"),
        );
        let err = record.validate().unwrap_err();
        assert!(err.to_string().contains("networks.rinkeby.url"));
    }

    #[test]
    fn test_websocket_urls_accepted() {
        for url in ["ws://localhost:8546", "wss://rinkeby.infura.io/ws/v3/abc"] {
            let record = networked(MapEnv::new().with(INFURA_RPC_URL, url).with(PRIVATE_KEY, "abc"));
            assert!(record.lint().is_empty(), "{url} should lint clean");
        }
    }

    #[test]
    fn test_missing_url_is_warning() {
        let record = networked(MapEnv::new().with(PRIVATE_KEY, "abc"));
        let issues = record.lint();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "networks.rinkeby.url");
        assert_eq!(issues[0].severity, Severity::Warning);
    }

    #[test]
    fn test_bad_compiler_version() {
        let mut record = complete();
        record.compiler_version = "0.8".to_string();
        assert!(record.lint().iter().any(|i| i.field == "solidity"));
        record.compiler_version = "^0.8.7".to_string();
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_undeclared_default_network() {
        let mut record = complete();
        record.default_network = Some("goerli".to_string());
        let issues = record.lint();
        assert!(issues
            .iter()
            .any(|i| i.field == "defaultNetwork" && i.severity == Severity::Error));
    }

    #[test]
    fn test_named_account_out_of_range() {
        let mut record = complete();
        record.named_accounts.insert(
            DEPLOYER_ROLE.to_string(),
            AccountSelector::new(0).with_override(REMOTE_NETWORK, 1),
        );
        let issues = record.lint();
        assert!(issues.iter().any(|i| i.field == "namedAccounts.deployer"));
    }

    #[test]
    fn test_issue_display() {
        let issue = LintIssue::warning("networks.x.url", "network has no URL");
        assert_eq!(issue.to_string(), "warning: networks.x.url: network has no URL");
    }
}
