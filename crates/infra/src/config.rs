//! Ledger configuration, loaded from the environment with defaults.

use thiserror::Error;

use foodtrace_core::DEFAULT_MAX_ARGUMENT_LEN;

pub const ENV_MAX_ARGUMENT_LEN: &str = "FOODTRACE_MAX_ARG_LEN";
pub const ENV_CHAINCODE_VERSION: &str = "FOODTRACE_VERSION";

/// Version string written under the `food_reg_ui` key at init.
pub const DEFAULT_CHAINCODE_VERSION: &str = "4.0.1";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },

    #[error("{0} must not be empty")]
    Empty(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Upper bound (in characters) on every positional argument.
    pub max_argument_len: usize,
    pub chaincode_version: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            max_argument_len: DEFAULT_MAX_ARGUMENT_LEN,
            chaincode_version: DEFAULT_CHAINCODE_VERSION.to_string(),
        }
    }
}

impl LedgerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source; unset variables keep their default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_MAX_ARGUMENT_LEN) {
            config.max_argument_len = match value.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidNumber {
                        var: ENV_MAX_ARGUMENT_LEN,
                        value,
                    });
                }
            };
        }

        if let Some(value) = lookup(ENV_CHAINCODE_VERSION) {
            if value.trim().is_empty() {
                return Err(ConfigError::Empty(ENV_CHAINCODE_VERSION));
            }
            config.chaincode_version = value;
        }

        Ok(config)
    }
}
