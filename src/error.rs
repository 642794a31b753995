//! Error definitions for the withdraw middleware.
//!
//! Every variant renders a stable message. The engine writes that message
//! verbatim into the error acknowledgement it returns for an inbound packet,
//! so the wording is part of the observable behaviour of the chain.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WithdrawError {
    #[error("cannot unmarshal ICS-20 transfer packet data: {0}")]
    UnknownRequest(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid coins: {0}")]
    InvalidCoins(String),

    #[error("sender ({sender}) or recipient ({recipient}) address are in the deny list for sending and receiving transfers")]
    BlockedAddress { sender: String, recipient: String },

    #[error("denomination {0} is not an IBC voucher")]
    NotAnIbcDenom(String),

    #[error("invalid denomination: {0}")]
    InvalidDenom(String),

    #[error("denomination trace not found for {denom} held by {holder}")]
    TraceNotFound { denom: String, holder: String },

    #[error("channel not found: port {port_id}, channel {channel_id}")]
    ChannelNotFound { port_id: String, channel_id: String },

    #[error("channel has no counterparty: port {port_id}, channel {channel_id}")]
    CounterpartyNotFound { port_id: String, channel_id: String },

    #[error("failed to transfer {coin} via {port_id}/{channel_id}: {reason}")]
    TransferFailed {
        coin: String,
        port_id: String,
        channel_id: String,
        reason: String,
    },

    #[error("reverted IBC transfer from {sender} to recipient {recipient}: balances {amount} sent back to sender")]
    TransferReversed {
        sender: String,
        recipient: String,
        amount: String,
    },

    #[error("failed to withdraw IBC vouchers back to sender '{sender}' in the corresponding IBC chain: {source}")]
    WithdrawFailed {
        sender: String,
        #[source]
        source: Box<WithdrawError>,
    },

    #[error("missing required dependency: {0}")]
    MissingDependency(&'static str),

    #[error("invalid params: {0}")]
    InvalidParams(String),
}

impl WithdrawError {
    /// Numeric code reported alongside the message, following the registered
    /// error codes of the host chain's withdraw module.
    pub fn code(&self) -> u32 {
        match self {
            WithdrawError::UnknownRequest(_) => 2,
            WithdrawError::InvalidAddress(_) => 3,
            WithdrawError::InvalidCoins(_) => 4,
            WithdrawError::BlockedAddress { .. } => 5,
            WithdrawError::NotAnIbcDenom(_) => 6,
            WithdrawError::InvalidDenom(_) => 7,
            WithdrawError::TraceNotFound { .. } => 8,
            WithdrawError::ChannelNotFound { .. } => 9,
            WithdrawError::TransferFailed { .. } => 10,
            WithdrawError::TransferReversed { .. } => 11,
            WithdrawError::WithdrawFailed { .. } => 12,
            WithdrawError::MissingDependency(_) => 13,
            WithdrawError::InvalidParams(_) => 14,
            WithdrawError::CounterpartyNotFound { .. } => 15,
        }
    }
}

pub type Result<T> = std::result::Result<T, WithdrawError>;
