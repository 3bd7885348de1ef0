use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use serde::Deserialize;
use thiserror::Error;

use crate::provider::revocation;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration parsing error: `{0}`")]
    Parsing(#[from] figment::Error),
}

/// Runtime configuration, merged from an optional YAML file and `ATTEST__`
/// prefixed environment variables.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoreConfig {
    pub formatter: FormatterConfig,
    pub revocation: RevocationConfig,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormatterConfig {
    pub leeway: u64,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self { leeway: 60 }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RevocationConfig {
    pub fail_open: bool,
    pub fetch_timeout_seconds: u64,
}

impl Default for RevocationConfig {
    fn default() -> Self {
        let defaults = revocation::Params::default();
        Self {
            fail_open: defaults.fail_open,
            fetch_timeout_seconds: defaults.fetch_timeout.as_secs(),
        }
    }
}

impl CoreConfig {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Ok(Figment::new()
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed("ATTEST__").split("__"))
            .extract()?)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Figment::new()
            .merge(Env::prefixed("ATTEST__").split("__"))
            .extract()?)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CoreConfig::default();
        assert_eq!(config.formatter.leeway, 60);
        assert!(config.revocation.fail_open);
        assert_eq!(config.revocation.fetch_timeout_seconds, 10);
    }

    #[test]
    fn test_extract_from_figment() {
        let config: CoreConfig = Figment::new()
            .merge(Yaml::string(
                r#"
                formatter:
                  leeway: 5
                revocation:
                  failOpen: false
                "#,
            ))
            .extract()
            .unwrap();

        assert_eq!(config.formatter.leeway, 5);
        assert!(!config.revocation.fail_open);
        assert_eq!(config.revocation.fetch_timeout_seconds, 10);
    }
}
