mod args;
mod error;
mod extract;
mod log;
mod node;

pub use args::Args;
pub use error::ConfigError;
pub use extract::ExtractConfig;
pub use log::LogConfig;
pub use node::NodeConfig;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractorConfig {
    #[serde(default)]
    pub node: NodeConfig,

    #[serde(default)]
    pub extract: ExtractConfig,

    #[serde(default)]
    pub log: LogConfig,
}

impl ExtractorConfig {
    /// Load the given .env file (if present), then read configuration from
    /// `BMX_`-prefixed environment variables.
    pub fn load(env_file: &str) -> Result<Self, ConfigError> {
        dotenv::from_filename(env_file).ok();
        Self::from_env()
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let config = envy::prefixed("BMX_").from_env::<Self>()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.node.validate()?;
        self.extract.validate()?;
        self.log.validate()?;
        Ok(())
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            node: NodeConfig::default(),
            extract: ExtractConfig::default(),
            log: LogConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ExtractorConfig::default();
        assert_eq!(config.node.timeout_secs, 10);
        assert_eq!(config.extract.out_dir, "out");
        assert_eq!(config.extract.max_concurrent, 8);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_default_config_validates() {
        assert!(ExtractorConfig::default().validate().is_ok());
    }
}
