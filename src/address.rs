//! Address correlation across chain prefixes.
//!
//! The same private key yields the same raw account bytes on every chain
//! that derives addresses the same way; only the bech32 human-readable
//! prefix (`cosmos1...`, `osmo1...`, `evmos1...`) differs. Two addresses
//! that decode to identical bytes therefore belong to the same key holder.

use std::fmt;

use bech32::{FromBase32, ToBase32, Variant};

use crate::error::{Result, WithdrawError};

/// Upper bound on raw address length accepted by the host chain.
pub const MAX_ADDR_LEN: usize = 255;

/// Raw account address bytes, independent of any prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccAddress(Vec<u8>);

impl AccAddress {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Encodes the address under `prefix`.
    pub fn to_bech32(&self, prefix: &str) -> Result<String> {
        bech32::encode(prefix, self.0.to_base32(), Variant::Bech32)
            .map_err(|e| WithdrawError::InvalidAddress(format!("cannot encode with prefix {}: {}", prefix, e)))
    }
}

impl fmt::Display for AccAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode_upper(&self.0))
    }
}

/// Decodes a bech32 address, returning its prefix and raw bytes.
///
/// The prefix comes from the decoder itself, so a payload that happens to
/// contain the separator character cannot shift the split point.
pub fn decode_bech32(address: &str) -> Result<(String, AccAddress)> {
    if address.trim().is_empty() {
        return Err(WithdrawError::InvalidAddress("empty address string is not allowed".to_string()));
    }

    let (hrp, data, variant) = bech32::decode(address)
        .map_err(|e| WithdrawError::InvalidAddress(format!("{}: {}", address, e)))?;
    if variant != Variant::Bech32 {
        return Err(WithdrawError::InvalidAddress(format!(
            "{}: bech32m encoding is not supported",
            address
        )));
    }

    let bytes = Vec::<u8>::from_base32(&data)
        .map_err(|e| WithdrawError::InvalidAddress(format!("{}: {}", address, e)))?;
    verify_address_format(address, &bytes)?;

    Ok((hrp, AccAddress(bytes)))
}

/// Decodes `address` and requires it to carry `expected_prefix`.
pub fn decode_with_prefix(address: &str, expected_prefix: &str) -> Result<AccAddress> {
    let (hrp, addr) = decode_bech32(address)?;
    if hrp != expected_prefix {
        return Err(WithdrawError::InvalidAddress(format!(
            "invalid Bech32 prefix; expected {}, got {}",
            expected_prefix, hrp
        )));
    }
    Ok(addr)
}

fn verify_address_format(address: &str, bytes: &[u8]) -> Result<()> {
    if bytes.is_empty() {
        return Err(WithdrawError::InvalidAddress(format!("{}: addresses cannot be empty", address)));
    }
    if bytes.len() > MAX_ADDR_LEN {
        return Err(WithdrawError::InvalidAddress(format!(
            "{}: address max length is {}, got {}",
            address,
            MAX_ADDR_LEN,
            bytes.len()
        )));
    }
    Ok(())
}

/// Outcome of comparing a transfer's sender and receiver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correlation {
    pub same_account: bool,
    /// Sender bytes, i.e. the sender as it would appear on this chain.
    pub sender: AccAddress,
    /// Receiver bytes decoded under the local prefix.
    pub recipient: AccAddress,
}

/// Decides whether a foreign sender and a local receiver are one account.
#[derive(Debug, Clone)]
pub struct AddressCorrelator {
    local_prefix: String,
}

impl AddressCorrelator {
    pub fn new(local_prefix: impl Into<String>) -> Self {
        Self {
            local_prefix: local_prefix.into(),
        }
    }

    pub fn local_prefix(&self) -> &str {
        &self.local_prefix
    }

    /// Compares `sender` (any prefix) with `receiver` (local prefix).
    pub fn correlate(&self, sender: &str, receiver: &str) -> Result<Correlation> {
        let (_, sender_addr) = decode_bech32(sender)
            .map_err(|e| WithdrawError::InvalidAddress(format!("invalid sender {}", strip_kind(&e))))?;
        let recipient_addr = decode_with_prefix(receiver, &self.local_prefix)
            .map_err(|e| WithdrawError::InvalidAddress(format!("invalid receiver {}", strip_kind(&e))))?;

        Ok(Correlation {
            same_account: sender_addr == recipient_addr,
            sender: sender_addr,
            recipient: recipient_addr,
        })
    }

    /// Re-encodes any bech32 address under the local prefix.
    pub fn to_local(&self, address: &str) -> Result<String> {
        let (_, addr) = decode_bech32(address)?;
        addr.to_bech32(&self.local_prefix)
    }
}

fn strip_kind(err: &WithdrawError) -> String {
    match err {
        WithdrawError::InvalidAddress(msg) => msg.clone(),
        other => other.to_string(),
    }
}
