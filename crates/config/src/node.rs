use crate::ConfigError;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct NodeConfig {
    /// Block-query endpoint of the RPC node
    ///
    /// Env: BMX_NODE_URL
    /// Default: https://babylon-testnet-rpc.polkachu.com/block
    #[serde(default = "default_url")]
    pub url: String,

    /// Request timeout for a single block query, in seconds
    ///
    /// Env: BMX_NODE_TIMEOUT_SECS
    /// Default: 10
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_url() -> String {
    "https://babylon-testnet-rpc.polkachu.com/block".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl NodeConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.url.is_empty() {
            return Err(ConfigError::ValidateError(
                "Node URL cannot be empty".to_string(),
            ));
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::ValidateError(
                "Node timeout cannot be 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
