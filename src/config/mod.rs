//! Configuration Management Module
//!
//! This module handles loading the configuration of the withdraw middleware.
//! Configuration includes the local chain's address prefix and native
//! denomination, and the initial withdraw params.

use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::keeper::ParamsStore;
use crate::types::params::DEFAULT_PACKET_TIMEOUT;
use crate::types::Params;

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "IBC_WITHDRAW_CONFIG_PATH";

/// Default location of the config file.
pub const DEFAULT_CONFIG_PATH: &str = "config/ibc-withdraw.toml";

// ============================================================================
// CONFIGURATION STRUCTURES
// ============================================================================

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Local chain settings
    pub chain: ChainConfig,
    /// Initial withdraw params
    #[serde(default)]
    pub withdraw: WithdrawConfig,
}

/// Local chain settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Chain identifier, e.g. `evmos_9001-2`
    pub chain_id: String,
    /// Bech32 human-readable prefix of account addresses, e.g. `evmos`
    pub bech32_prefix: String,
    /// Native base denomination, e.g. `aevmos`
    pub native_denom: String,
}

/// Withdraw params as written in the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawConfig {
    /// Global switch (default: true)
    #[serde(default = "default_enable_withdraw")]
    pub enable_withdraw: bool,
    /// Destination channels the middleware acts on; empty means all
    #[serde(default)]
    pub enabled_channels: Vec<String>,
    /// Channels connected to EVM chains, never reversed
    #[serde(default)]
    pub evm_channels: Vec<String>,
    /// Timeout recorded for withdrawal packets, in seconds (default: 4 hours)
    #[serde(default = "default_packet_timeout_secs")]
    pub packet_timeout_secs: u64,
}

fn default_enable_withdraw() -> bool {
    true
}

fn default_packet_timeout_secs() -> u64 {
    DEFAULT_PACKET_TIMEOUT.as_secs()
}

impl Default for WithdrawConfig {
    fn default() -> Self {
        Self {
            enable_withdraw: default_enable_withdraw(),
            enabled_channels: Vec::new(),
            evm_channels: Vec::new(),
            packet_timeout_secs: default_packet_timeout_secs(),
        }
    }
}

impl WithdrawConfig {
    pub fn to_params(&self) -> Params {
        Params {
            enable_withdraw: self.enable_withdraw,
            enabled_channels: self.enabled_channels.iter().cloned().collect::<BTreeSet<_>>(),
            packet_timeout: Duration::from_secs(self.packet_timeout_secs),
            evm_channels: self.evm_channels.iter().cloned().collect::<BTreeSet<_>>(),
        }
    }
}

// ============================================================================
// CONFIGURATION LOADING AND MANAGEMENT
// ============================================================================

impl Config {
    /// Validates chain settings and params.
    ///
    /// # Returns
    ///
    /// - `Ok(())` - Configuration is valid
    /// - `Err(anyhow::Error)` - A field is empty or params are invalid
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.chain.chain_id.trim().is_empty() {
            anyhow::bail!("Configuration error: chain.chain_id cannot be empty");
        }
        if self.chain.bech32_prefix.trim().is_empty() {
            anyhow::bail!("Configuration error: chain.bech32_prefix cannot be empty");
        }
        if self.chain.bech32_prefix.chars().any(|c| c.is_ascii_uppercase()) {
            anyhow::bail!(
                "Configuration error: chain.bech32_prefix '{}' must be lowercase",
                self.chain.bech32_prefix
            );
        }
        if self.chain.native_denom.trim().is_empty() {
            anyhow::bail!("Configuration error: chain.native_denom cannot be empty");
        }
        if self.chain.native_denom.starts_with(crate::types::IBC_DENOM_PREFIX) {
            anyhow::bail!(
                "Configuration error: chain.native_denom '{}' cannot be an IBC voucher",
                self.chain.native_denom
            );
        }

        self.withdraw
            .to_params()
            .validate()
            .context("Configuration error: invalid withdraw params")?;

        Ok(())
    }

    /// Loads configuration from the TOML file at `IBC_WITHDRAW_CONFIG_PATH`,
    /// or `config/ibc-withdraw.toml` when the variable is unset.
    pub fn load() -> anyhow::Result<Self> {
        let config_path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from_path(&config_path)
    }

    /// Loads and validates configuration from a specific file.
    pub fn load_from_path(config_path: &str) -> anyhow::Result<Self> {
        if !Path::new(config_path).exists() {
            return Err(anyhow::anyhow!(
                "Configuration file '{}' not found. Please copy the template:\n\
                cp config/ibc-withdraw.template.toml config/ibc-withdraw.toml\n\
                Then edit config/ibc-withdraw.toml with your actual values.",
                config_path
            ));
        }

        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read configuration file '{}'", config_path))?;
        Self::from_toml_str(&content)
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Params store seeded with the configured params.
    pub fn params_store(&self) -> anyhow::Result<ParamsStore> {
        ParamsStore::new(self.withdraw.to_params()).context("Failed to initialize params store")
    }

    /// Creates a default configuration for local development and tests.
    #[allow(clippy::should_implement_trait)]
    pub fn default() -> Self {
        Self {
            chain: ChainConfig {
                chain_id: "evmos_9000-1".to_string(),
                bech32_prefix: "evmos".to_string(),
                native_denom: "aevmos".to_string(),
            },
            withdraw: WithdrawConfig::default(),
        }
    }
}
