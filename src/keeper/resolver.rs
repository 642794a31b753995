//! Return-route resolution for IBC vouchers.
//!
//! A voucher leaves the chain over the same (port, channel) it most recently
//! arrived on, which is the nearest hop of its recorded trace. One resolution
//! unwinds exactly one hop. A token that crossed several chains goes back one
//! chain at a time, with each intermediate chain resolving its own next hop
//! when the returning packet arrives there.

use tracing::debug;

use crate::error::{Result, WithdrawError};
use crate::keeper::expected::{ChannelKeeper, TransferKeeper};
use crate::types::denom::{parse_voucher_hash, IBC_DENOM_PREFIX};

pub struct DenomTraceResolver<'a> {
    native_denom: &'a str,
    transfer_keeper: &'a dyn TransferKeeper,
    channel_keeper: &'a dyn ChannelKeeper,
}

impl<'a> DenomTraceResolver<'a> {
    pub fn new(
        native_denom: &'a str,
        transfer_keeper: &'a dyn TransferKeeper,
        channel_keeper: &'a dyn ChannelKeeper,
    ) -> Self {
        Self {
            native_denom,
            transfer_keeper,
            channel_keeper,
        }
    }

    /// Returns the (port, channel) over which `denom` should be sent back.
    ///
    /// Depends only on stored trace and channel state, so repeated calls
    /// within a block return the same route.
    pub fn resolve(&self, denom: &str, holder: &str) -> Result<(String, String)> {
        if denom == self.native_denom {
            return Err(WithdrawError::NotAnIbcDenom(denom.to_string()));
        }
        if !denom.starts_with(IBC_DENOM_PREFIX) {
            return Err(WithdrawError::InvalidDenom(format!(
                "{} is neither the native denomination nor an IBC voucher",
                denom
            )));
        }

        let hash = parse_voucher_hash(denom)?;

        // A balance without a trace means the voucher was minted without being
        // recorded: corrupted state, reported instead of routed.
        let trace = self
            .transfer_keeper
            .get_denom_trace(&hash)
            .ok_or_else(|| WithdrawError::TraceNotFound {
                denom: denom.to_string(),
                holder: holder.to_string(),
            })?;

        let hop = trace.nearest_hop().ok_or_else(|| {
            WithdrawError::InvalidDenom(format!("denomination trace for {} has an empty path", denom))
        })?;

        if self.channel_keeper.get_channel(&hop.port_id, &hop.channel_id).is_none() {
            return Err(WithdrawError::ChannelNotFound {
                port_id: hop.port_id.clone(),
                channel_id: hop.channel_id.clone(),
            });
        }

        debug!(
            denom,
            base_denom = %trace.base_denom,
            port = %hop.port_id,
            channel = %hop.channel_id,
            "resolved voucher return hop"
        );

        Ok((hop.port_id.clone(), hop.channel_id.clone()))
    }
}
