//! Tracing subscriber setup for the CLI.

use tracing_subscriber::EnvFilter;

use crate::env::{EnvSource, ProcessEnv};

/// Environment variable holding the log filter directive
pub const LOG_ENV: &str = "DEPLOY_TOOLS_LOG";

/// Filter from `DEPLOY_TOOLS_LOG` in `source`, else `default_directive`
pub fn filter_from(source: &impl EnvSource, default_directive: &str) -> EnvFilter {
    source
        .var(LOG_ENV)
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::new(default_directive))
}

/// Install a stderr subscriber filtered by `DEPLOY_TOOLS_LOG`, falling back to `default_directive`
///
/// Load `.env` first so a directive set there takes effect.
pub fn init(default_directive: &str) -> Result<(), tracing_subscriber::util::TryInitError> {
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::fmt()
        .with_env_filter(filter_from(&ProcessEnv, default_directive))
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish()
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MapEnv;

    #[test]
    fn test_filter_uses_env_directive() {
        let env = MapEnv::new().with(LOG_ENV, "debug");
        assert_eq!(filter_from(&env, "warn").to_string(), "debug");
    }

    #[test]
    fn test_filter_falls_back_to_default() {
        assert_eq!(filter_from(&MapEnv::new(), "warn").to_string(), "warn");
    }
}
