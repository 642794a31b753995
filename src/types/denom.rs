//! Denomination traces and IBC voucher denominations.
//!
//! A voucher minted for a token that arrived over IBC is named
//! `ibc/<HASH>`, where `HASH` is the upper-case hex SHA-256 digest of the
//! token's full trace (`{path}/{base_denom}`). The trace itself is recorded
//! by the transfer application when the token first arrives and is looked up
//! here by hash.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Result, WithdrawError};

/// Prefix of every IBC voucher denomination.
pub const IBC_DENOM_PREFIX: &str = "ibc/";

const CHANNEL_PREFIX: &str = "channel-";

/// One inter-chain leg a token has crossed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hop {
    pub port_id: String,
    pub channel_id: String,
}

impl Hop {
    pub fn new(port_id: impl Into<String>, channel_id: impl Into<String>) -> Self {
        Self {
            port_id: port_id.into(),
            channel_id: channel_id.into(),
        }
    }
}

impl fmt::Display for Hop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.port_id, self.channel_id)
    }
}

/// Recorded hop path and base denomination of a voucher.
///
/// `path` is ordered nearest hop first: `path[0]` is the (port, channel) on
/// this chain over which the token most recently arrived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenomTrace {
    pub path: Vec<Hop>,
    pub base_denom: String,
}

impl DenomTrace {
    pub fn new(path: Vec<Hop>, base_denom: impl Into<String>) -> Self {
        Self {
            path,
            base_denom: base_denom.into(),
        }
    }

    /// Hop path in its textual form, e.g. `transfer/channel-0/transfer/channel-3`.
    pub fn path_string(&self) -> String {
        self.path
            .iter()
            .map(|hop| hop.to_string())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Full trace string the voucher hash is computed over.
    pub fn full_path(&self) -> String {
        if self.path.is_empty() {
            return self.base_denom.clone();
        }
        format!("{}/{}", self.path_string(), self.base_denom)
    }

    pub fn hash(&self) -> [u8; 32] {
        Sha256::digest(self.full_path().as_bytes()).into()
    }

    /// Local denomination of the token: the base denomination when the trace
    /// has no hops, `ibc/<HASH>` otherwise.
    pub fn ibc_denom(&self) -> String {
        if self.path.is_empty() {
            return self.base_denom.clone();
        }
        format!("{}{}", IBC_DENOM_PREFIX, hex::encode_upper(self.hash()))
    }

    /// Nearest hop, if the token crossed any chain at all.
    pub fn nearest_hop(&self) -> Option<&Hop> {
        self.path.first()
    }
}

impl FromStr for DenomTrace {
    type Err = WithdrawError;

    /// Parses a full denomination such as `transfer/channel-0/uatom`.
    ///
    /// Leading `port/channel-N` pairs form the path; whatever follows is the
    /// base denomination, which may itself contain `/`.
    fn from_str(full_denom: &str) -> Result<Self> {
        let segments: Vec<&str> = full_denom.split('/').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(WithdrawError::InvalidDenom(format!(
                "empty segment in denomination trace: {}",
                full_denom
            )));
        }

        let mut path = Vec::new();
        let mut idx = 0;
        // A pair only counts as a hop if at least one base segment follows it.
        while idx + 2 < segments.len() && segments[idx + 1].starts_with(CHANNEL_PREFIX) {
            path.push(Hop::new(segments[idx], segments[idx + 1]));
            idx += 2;
        }

        Ok(Self {
            path,
            base_denom: segments[idx..].join("/"),
        })
    }
}

/// Extracts the trace hash from an `ibc/<HASH>` denomination.
pub fn parse_voucher_hash(denom: &str) -> Result<[u8; 32]> {
    let hash_hex = denom.strip_prefix(IBC_DENOM_PREFIX).ok_or_else(|| {
        WithdrawError::InvalidDenom(format!("{} is not of the form ibc/{{hash}}", denom))
    })?;
    parse_hex_hash(hash_hex)
        .map_err(|reason| WithdrawError::InvalidDenom(format!("invalid denom trace hash {}: {}", hash_hex, reason)))
}

fn parse_hex_hash(hash_hex: &str) -> std::result::Result<[u8; 32], String> {
    let bytes = hex::decode(hash_hex).map_err(|e| e.to_string())?;
    <[u8; 32]>::try_from(bytes.as_slice())
        .map_err(|_| format!("expected 32 bytes, got {}", bytes.len()))
}
