//! Capabilities the keeper needs from other modules of the host chain.
//!
//! Each trait is implemented by whichever module owns the state: balances
//! by the bank module, denomination traces and outbound transfers by the
//! transfer application, channels by the channel registry. All reads see the
//! state of the current block, including writes made earlier in the same
//! packet callback.

use crate::address::AccAddress;
use crate::types::{Channel, Coin, DenomTrace, Event, Height, Params};

pub trait BankKeeper {
    /// Every non-zero balance held by `addr`.
    fn get_all_balances(&self, addr: &AccAddress) -> Vec<Coin>;

    /// Balance of a single denomination; zero amount when nothing is held.
    fn get_balance(&self, addr: &AccAddress, denom: &str) -> Coin;

    /// Whether `addr` is on the deny list for sending and receiving funds.
    fn blocked_addr(&self, addr: &AccAddress) -> bool;
}

pub trait TransferKeeper {
    /// Sends `token` from `sender` over `source_port`/`source_channel` to the
    /// counterparty `receiver` string. Returns the packet sequence.
    #[allow(clippy::too_many_arguments)]
    fn send_transfer(
        &self,
        source_port: &str,
        source_channel: &str,
        token: Coin,
        sender: &AccAddress,
        receiver: &str,
        timeout_height: Height,
        timeout_timestamp: u64,
    ) -> anyhow::Result<u64>;

    /// Trace recorded for a voucher hash.
    fn get_denom_trace(&self, hash: &[u8; 32]) -> Option<DenomTrace>;
}

pub trait ChannelKeeper {
    fn get_channel(&self, port_id: &str, channel_id: &str) -> Option<Channel>;
}

pub trait ParamsKeeper {
    fn get_params(&self) -> Params;
}

/// Kind of account stored by the account module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountKind {
    Base,
    Module,
    Vesting,
}

/// Public key algorithm of an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PubKeyType {
    Secp256k1,
    EthSecp256k1,
    Ed25519,
    LegacyMultisig,
    Other(String),
}

impl PubKeyType {
    /// Key types whose holders can sign on this chain, so funds sent to them
    /// are not stuck.
    pub fn is_supported(&self) -> bool {
        matches!(
            self,
            PubKeyType::EthSecp256k1 | PubKeyType::Ed25519 | PubKeyType::LegacyMultisig
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountInfo {
    pub kind: AccountKind,
    pub pub_key_type: Option<PubKeyType>,
}

pub trait AccountKeeper {
    fn get_account(&self, addr: &AccAddress) -> Option<AccountInfo>;
}

pub trait EventEmitter {
    fn emit(&self, event: Event);
}
