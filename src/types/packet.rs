//! Channel packets and the ICS-20 fungible token payload they carry.

use serde::{Deserialize, Serialize};

use crate::error::{Result, WithdrawError};
use crate::types::coin::validate_amount;

/// Block height on a counterparty chain, used for packet timeouts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Height {
    pub revision_number: u64,
    pub revision_height: u64,
}

impl Height {
    pub fn new(revision_number: u64, revision_height: u64) -> Self {
        Self {
            revision_number,
            revision_height,
        }
    }

    /// Height that disables height-based timeouts.
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn is_zero(&self) -> bool {
        self.revision_number == 0 && self.revision_height == 0
    }
}

/// A packet delivered over a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Packet {
    pub sequence: u64,
    pub source_port: String,
    pub source_channel: String,
    pub destination_port: String,
    pub destination_channel: String,
    pub data: Vec<u8>,
    pub timeout_height: Height,
    pub timeout_timestamp: u64,
}

/// ICS-20 transfer payload.
///
/// Amount is the decimal string sent on the wire. `memo` is optional on the
/// wire and omitted when empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FungibleTokenPacketData {
    pub denom: String,
    pub amount: String,
    pub sender: String,
    pub receiver: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub memo: String,
}

impl FungibleTokenPacketData {
    pub fn new(
        denom: impl Into<String>,
        amount: impl Into<String>,
        sender: impl Into<String>,
        receiver: impl Into<String>,
    ) -> Self {
        Self {
            denom: denom.into(),
            amount: amount.into(),
            sender: sender.into(),
            receiver: receiver.into(),
            memo: String::new(),
        }
    }

    /// Decodes and validates the JSON payload of a transfer packet.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let decoded: Self = serde_json::from_slice(data)
            .map_err(|e| WithdrawError::UnknownRequest(e.to_string()))?;
        decoded.validate_basic()?;
        Ok(decoded)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        // Serializing a struct of plain strings cannot fail.
        serde_json::to_vec(self).unwrap_or_default()
    }

    /// Stateless checks on the payload fields.
    pub fn validate_basic(&self) -> Result<()> {
        validate_amount(&self.amount)?;
        if self.denom.trim().is_empty() {
            return Err(WithdrawError::InvalidDenom("empty denomination".to_string()));
        }
        if self.sender.trim().is_empty() {
            return Err(WithdrawError::InvalidAddress("missing sender address".to_string()));
        }
        if self.receiver.trim().is_empty() {
            return Err(WithdrawError::InvalidAddress("missing recipient address".to_string()));
        }
        Ok(())
    }
}
