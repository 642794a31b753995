//! Withdraw Keeper Module
//!
//! The keeper holds the collaborators the withdraw middleware reads from and
//! writes through. It carries no state of its own: params, balances, traces
//! and channels are all read from their owning modules on every call.
//!
//! ## Components
//!
//! - `callbacks`: the `on_recv_packet` reversal state machine
//! - `resolver`: maps a voucher denomination to its next return hop
//! - `params`: a `ParamsKeeper` backed by an in-process params record
//! - `expected`: capability traits implemented by other modules

pub mod callbacks;
pub mod expected;
pub mod params;
pub mod resolver;

use std::sync::Arc;

use tracing::debug;

use crate::address::AddressCorrelator;
use crate::error::{Result, WithdrawError};
pub use callbacks::PendingReversal;
pub use expected::{
    AccountInfo, AccountKeeper, AccountKind, BankKeeper, ChannelKeeper, EventEmitter, ParamsKeeper,
    PubKeyType, TransferKeeper,
};
pub use params::ParamsStore;
pub use resolver::DenomTraceResolver;

// ============================================================================
// KEEPER
// ============================================================================

pub struct Keeper {
    correlator: AddressCorrelator,
    native_denom: String,
    bank_keeper: Arc<dyn BankKeeper>,
    transfer_keeper: Arc<dyn TransferKeeper>,
    channel_keeper: Arc<dyn ChannelKeeper>,
    params_keeper: Arc<dyn ParamsKeeper>,
    account_keeper: Option<Arc<dyn AccountKeeper>>,
    event_emitter: Option<Arc<dyn EventEmitter>>,
}

impl Keeper {
    /// Starts building a keeper for a chain with the given address prefix and
    /// native base denomination.
    ///
    /// Without an account keeper, every same-account transfer with a non-zero
    /// balance is reversed and answered with an error acknowledgement. Wiring
    /// one narrows that: recipients that are module or vesting accounts, or
    /// that hold a key able to sign on this chain, keep the incoming
    /// acknowledgement and their funds.
    pub fn builder(bech32_prefix: impl Into<String>, native_denom: impl Into<String>) -> KeeperBuilder {
        KeeperBuilder {
            bech32_prefix: bech32_prefix.into(),
            native_denom: native_denom.into(),
            bank_keeper: None,
            transfer_keeper: None,
            channel_keeper: None,
            params_keeper: None,
            account_keeper: None,
            event_emitter: None,
        }
    }

    pub fn correlator(&self) -> &AddressCorrelator {
        &self.correlator
    }

    pub fn native_denom(&self) -> &str {
        &self.native_denom
    }

    /// Params as they stand right now.
    pub fn get_params(&self) -> crate::types::Params {
        self.params_keeper.get_params()
    }

    /// Resolver over the current trace and channel state.
    pub fn resolver(&self) -> DenomTraceResolver<'_> {
        DenomTraceResolver::new(
            &self.native_denom,
            self.transfer_keeper.as_ref(),
            self.channel_keeper.as_ref(),
        )
    }

    /// Port and channel over which `denom` should leave to unwind one hop.
    ///
    /// `holder` is the local address holding the voucher and is only used to
    /// annotate errors.
    pub fn get_ibc_denom_destination_identifiers(&self, denom: &str, holder: &str) -> Result<(String, String)> {
        self.resolver().resolve(denom, holder)
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Collects collaborators and checks that every required one is present.
pub struct KeeperBuilder {
    bech32_prefix: String,
    native_denom: String,
    bank_keeper: Option<Arc<dyn BankKeeper>>,
    transfer_keeper: Option<Arc<dyn TransferKeeper>>,
    channel_keeper: Option<Arc<dyn ChannelKeeper>>,
    params_keeper: Option<Arc<dyn ParamsKeeper>>,
    account_keeper: Option<Arc<dyn AccountKeeper>>,
    event_emitter: Option<Arc<dyn EventEmitter>>,
}

impl KeeperBuilder {
    pub fn bank_keeper(mut self, keeper: Arc<dyn BankKeeper>) -> Self {
        self.bank_keeper = Some(keeper);
        self
    }

    pub fn transfer_keeper(mut self, keeper: Arc<dyn TransferKeeper>) -> Self {
        self.transfer_keeper = Some(keeper);
        self
    }

    pub fn channel_keeper(mut self, keeper: Arc<dyn ChannelKeeper>) -> Self {
        self.channel_keeper = Some(keeper);
        self
    }

    pub fn params_keeper(mut self, keeper: Arc<dyn ParamsKeeper>) -> Self {
        self.params_keeper = Some(keeper);
        self
    }

    /// Optional. Without it, recipient key types are not inspected and no
    /// same-account transfer is exempt from reversal.
    pub fn account_keeper(mut self, keeper: Arc<dyn AccountKeeper>) -> Self {
        self.account_keeper = Some(keeper);
        self
    }

    /// Optional. Without it, withdrawals are only logged.
    pub fn event_emitter(mut self, emitter: Arc<dyn EventEmitter>) -> Self {
        self.event_emitter = Some(emitter);
        self
    }

    pub fn build(self) -> Result<Keeper> {
        if self.bech32_prefix.is_empty() {
            return Err(WithdrawError::InvalidParams("bech32 prefix cannot be empty".to_string()));
        }
        if self.native_denom.is_empty() {
            return Err(WithdrawError::InvalidParams("native denomination cannot be empty".to_string()));
        }

        let keeper = Keeper {
            correlator: AddressCorrelator::new(self.bech32_prefix),
            native_denom: self.native_denom,
            bank_keeper: self.bank_keeper.ok_or(WithdrawError::MissingDependency("bank keeper"))?,
            transfer_keeper: self
                .transfer_keeper
                .ok_or(WithdrawError::MissingDependency("transfer keeper"))?,
            channel_keeper: self
                .channel_keeper
                .ok_or(WithdrawError::MissingDependency("channel keeper"))?,
            params_keeper: self
                .params_keeper
                .ok_or(WithdrawError::MissingDependency("params keeper"))?,
            account_keeper: self.account_keeper,
            event_emitter: self.event_emitter,
        };

        debug!(
            prefix = keeper.correlator.local_prefix(),
            native_denom = %keeper.native_denom,
            "withdraw keeper initialized"
        );
        Ok(keeper)
    }
}
