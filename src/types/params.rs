//! Module parameters.
//!
//! Params are owned by the governance path of the host chain and are read
//! fresh for every packet; nothing here caches them.

use std::collections::BTreeSet;
use std::time::Duration;

use crate::error::{Result, WithdrawError};

/// Default timeout carried in the params record: 4 hours.
pub const DEFAULT_PACKET_TIMEOUT: Duration = Duration::from_secs(4 * 60 * 60);

const CHANNEL_PREFIX: &str = "channel-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Params {
    /// Global switch for the middleware.
    pub enable_withdraw: bool,
    /// Destination channels the middleware acts on. Empty means all channels.
    pub enabled_channels: BTreeSet<String>,
    /// Timeout recorded for withdrawal packets by governance.
    pub packet_timeout: Duration,
    /// Channels to EVM chains. Senders there already use the local key type,
    /// so packets on these channels are never reversed.
    pub evm_channels: BTreeSet<String>,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            enable_withdraw: true,
            enabled_channels: BTreeSet::new(),
            packet_timeout: DEFAULT_PACKET_TIMEOUT,
            evm_channels: BTreeSet::new(),
        }
    }
}

impl Params {
    pub fn is_channel_enabled(&self, channel_id: &str) -> bool {
        self.enabled_channels.is_empty() || self.enabled_channels.contains(channel_id)
    }

    pub fn is_evm_channel(&self, channel_id: &str) -> bool {
        self.evm_channels.contains(channel_id)
    }

    /// Whether a packet arriving on `channel_id` is in scope at all.
    pub fn applies_to(&self, channel_id: &str) -> bool {
        self.enable_withdraw && self.is_channel_enabled(channel_id) && !self.is_evm_channel(channel_id)
    }

    pub fn validate(&self) -> Result<()> {
        for channel in self.enabled_channels.iter().chain(self.evm_channels.iter()) {
            validate_channel_id(channel)?;
        }

        if let Some(channel) = self.enabled_channels.intersection(&self.evm_channels).next() {
            return Err(WithdrawError::InvalidParams(format!(
                "channel {} cannot be both enabled and an EVM channel",
                channel
            )));
        }

        Ok(())
    }
}

/// Checks that a channel identifier has the `channel-<n>` form.
pub fn validate_channel_id(channel_id: &str) -> Result<()> {
    let valid = channel_id
        .strip_prefix(CHANNEL_PREFIX)
        .map(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
        .unwrap_or(false);

    if !valid {
        return Err(WithdrawError::InvalidParams(format!(
            "invalid channel identifier: {:?}",
            channel_id
        )));
    }
    Ok(())
}
