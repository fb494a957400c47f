//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all settings. Every
//! section is optional; an empty file yields the defaults.
//!
//! # Example
//!
//! ```no_run
//! use craftledger::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::Deserialize;
use url::Url;

use super::cache::CacheConfig;
use super::engine::EngineConfig;
use super::logging::LoggingConfig;
use super::recipes::RecipesConfig;
use crate::adapter::outbound::universalis::MarketConfig;
use crate::error::{ConfigError, Result};

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Market board endpoint, rate limit and retry policy.
    #[serde(default)]
    pub market: MarketConfig,

    /// Listings cache file and TTL.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Cost engine settings.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Recipe reference data.
    #[serde(default)]
    pub recipes: RecipesConfig,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or validation fails.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML is malformed,
    /// or validation fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Initialize tracing from the `[logging]` section.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    /// Check values are present and within range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] or [`ConfigError::InvalidValue`].
    pub fn validate(&self) -> Result<()> {
        let market = &self.market;
        if market.base_url.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "base_url" }.into());
        }
        if let Err(e) = Url::parse(&market.base_url) {
            return Err(ConfigError::InvalidValue {
                field: "base_url",
                reason: e.to_string(),
            }
            .into());
        }
        if market.market.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "market" }.into());
        }
        if market.min_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "min_interval_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if market.retry_max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "retry_max_attempts",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if market.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeout_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        if self.cache.ttl_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "ttl_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.cache.path.as_os_str().is_empty() {
            return Err(ConfigError::MissingField { field: "cache.path" }.into());
        }

        let gather_cost = self.engine.gather_cost;
        if gather_cost.is_nan() || gather_cost < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "gather_cost",
                reason: "must be 0 or greater (inf allowed)".to_string(),
            }
            .into());
        }
        if self.engine.channel_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "channel_capacity",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        if self.recipes.catalog.as_os_str().is_empty() {
            return Err(ConfigError::MissingField {
                field: "recipes.catalog",
            }
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse_toml("").unwrap();
        assert_eq!(config.market.base_url, "https://universalis.app/api/v2");
        assert_eq!(config.market.min_interval_ms, 50);
        assert_eq!(config.market.retry_max_attempts, 10);
        assert_eq!(config.cache.ttl_secs, 3600);
        assert!(config.engine.gather_cost.is_infinite());
        assert_eq!(config.engine.breakdown_depth, 8);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_inf_gather_cost_parses() {
        let config = Config::parse_toml("[engine]\ngather_cost = inf\n").unwrap();
        assert_eq!(config.engine.gather_cost, f64::INFINITY);
    }

    #[test]
    fn test_nan_gather_cost_rejected() {
        let err = Config::parse_toml("[engine]\ngather_cost = nan\n").unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue {
                field: "gather_cost",
                ..
            })
        ));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let err = Config::parse_toml("[market]\nmin_interval_ms = 0\n").unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue {
                field: "min_interval_ms",
                ..
            })
        ));
    }

    #[test]
    fn test_bad_base_url_rejected() {
        let err = Config::parse_toml("[market]\nbase_url = \"not a url\"\n").unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue {
                field: "base_url",
                ..
            })
        ));
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let err = Config::parse_toml("[market\n").unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
    }
}
