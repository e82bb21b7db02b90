use crate::ConfigError;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractConfig {
    /// Directory for cached blocks and output artifacts, created if absent
    ///
    /// Env: BMX_EXTRACT_OUT_DIR
    /// Default: out
    #[serde(default = "default_out_dir")]
    pub out_dir: String,

    /// Maximum number of heights processed concurrently
    ///
    /// Env: BMX_EXTRACT_MAX_CONCURRENT
    /// Default: 8
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
}

fn default_out_dir() -> String {
    "out".to_string()
}

fn default_max_concurrent() -> usize {
    8
}

impl ExtractConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.out_dir.is_empty() {
            return Err(ConfigError::ValidateError(
                "Output directory cannot be empty".to_string(),
            ));
        }

        if self.max_concurrent == 0 {
            return Err(ConfigError::ValidateError(
                "Max concurrency cannot be 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            out_dir: default_out_dir(),
            max_concurrent: default_max_concurrent(),
        }
    }
}
