//! IBC Withdraw Middleware Library
//!
//! This crate provides an IBC middleware for ICS-20 transfers. When a
//! transfer's sender and receiver are the same account under different
//! bech32 prefixes, the middleware sends every balance of that account back
//! to the sender over IBC and voids the original transfer with an error
//! acknowledgement.

pub mod address;
pub mod config;
pub mod error;
pub mod keeper;
pub mod middleware;
pub mod types;

// Re-export commonly used types
pub use address::{AccAddress, AddressCorrelator, Correlation};
pub use config::{ChainConfig, Config, WithdrawConfig};
pub use error::WithdrawError;
pub use keeper::{DenomTraceResolver, Keeper, KeeperBuilder, ParamsStore};
pub use middleware::{IbcMiddleware, IbcModule, Ics4Wrapper};
pub use types::{Acknowledgement, Channel, Coin, DenomTrace, FungibleTokenPacketData, Hop, Packet, Params};
