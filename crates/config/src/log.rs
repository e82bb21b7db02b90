use crate::ConfigError;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Log Level
    ///
    /// Env: BMX_LOG_LEVEL
    /// Valid values: trace, debug, info, warn, error
    /// Default: info
    #[serde(default = "default_level")]
    pub level: String,

    /// Strip ANSI color codes from logs
    ///
    /// Env: BMX_LOG_STRIP_ANSI
    /// Default: false
    #[serde(default)]
    pub strip_ansi: bool,
}

fn default_level() -> String {
    "info".to_string()
}

impl LogConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];

        if !valid_levels.contains(&self.level.as_str()) {
            return Err(ConfigError::ValidateError(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.level,
                valid_levels.join(", ")
            )));
        }

        Ok(())
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            strip_ansi: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_config() {
        let config = LogConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.strip_ansi, false);
    }

    #[test]
    fn test_validate_valid_levels() {
        for level in ["trace", "debug", "info", "warn", "error"] {
            let config = LogConfig {
                level: level.to_string(),
                ..Default::default()
            };
            assert!(config.validate().is_ok(), "Level {} should be valid", level);
        }
    }

    #[test]
    fn test_validate_invalid_levels() {
        let config = LogConfig {
            level: "invalid".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
