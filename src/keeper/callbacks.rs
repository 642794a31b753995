//! Receive callback of the withdraw middleware.
//!
//! A user who sends tokens from `cosmos1xyz...` to `evmos1xyz...` (same
//! bytes, different prefix) usually means to move funds to their own
//! account. On this chain that account is controlled by an `eth_secp256k1`
//! key, which the sender's `secp256k1` key cannot sign for, so the funds
//! would be stuck. Instead of accepting the deposit, the callback sends every
//! balance of the account back out over IBC to the original sender and
//! returns an error acknowledgement so the sending chain voids the transfer.
//!
//! ## Flow
//!
//! 1. Params: middleware disabled, channel not enabled or EVM channel -> pass through
//! 2. Decode payload and correlate sender/receiver bytes
//! 3. Different accounts, or recipient holds a supported key -> pass through
//!    (a blocked sender or recipient of a same-account transfer -> error)
//! 4. Plan a return transfer for every held denomination
//! 5. Issue the planned transfers
//! 6. Return an error acknowledgement
//!
//! ## Transactional policy
//!
//! Every denomination is resolved and checked before the first transfer is
//! issued. A resolution failure on any denomination therefore leaves all
//! balances untouched. A submission failure stops the loop; transfers issued
//! before it stay issued and the acknowledgement reports the failure.

use std::collections::BTreeSet;

use tracing::{debug, error, info};

use crate::address::AccAddress;
use crate::error::{Result, WithdrawError};
use crate::keeper::expected::AccountKind;
use crate::keeper::Keeper;
use crate::types::coin::coins_to_string;
use crate::types::event::{
    ATTRIBUTE_KEY_AMOUNT, ATTRIBUTE_KEY_DST_CHANNEL, ATTRIBUTE_KEY_DST_PORT, ATTRIBUTE_KEY_RECEIVER,
    ATTRIBUTE_KEY_SENDER, ATTRIBUTE_KEY_SRC_CHANNEL, ATTRIBUTE_KEY_SRC_PORT, EVENT_TYPE_WITHDRAW,
};
use crate::types::{Acknowledgement, Coin, Event, FungibleTokenPacketData, Height, Packet};

/// A transfer planned during one callback, not yet issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedTransfer {
    pub coin: Coin,
    pub source_port: String,
    pub source_channel: String,
}

/// All transfers needed to empty the recipient's account. Lives only for the
/// duration of one callback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingReversal {
    pub transfers: Vec<PlannedTransfer>,
}

impl PendingReversal {
    pub fn coins(&self) -> Vec<Coin> {
        self.transfers.iter().map(|t| t.coin.clone()).collect()
    }
}

impl Keeper {
    /// Receive callback. `ack` is the acknowledgement produced by the
    /// transfer application beneath this middleware, which has already
    /// credited the packet's tokens to the receiver.
    ///
    /// Returns `ack` unchanged whenever the packet is out of scope, and an
    /// error acknowledgement whenever a reversal was attempted.
    pub fn on_recv_packet(&self, packet: &Packet, ack: Acknowledgement) -> Acknowledgement {
        let params = self.get_params();

        if !params.applies_to(&packet.destination_channel) {
            debug!(
                enabled = params.enable_withdraw,
                channel = %packet.destination_channel,
                "withdraw middleware does not apply to packet"
            );
            return ack;
        }

        // Nothing was credited if the application itself rejected the packet.
        if !ack.is_success() {
            return ack;
        }

        let data = match FungibleTokenPacketData::decode(&packet.data) {
            Ok(data) => data,
            Err(err) => return Acknowledgement::error(&err),
        };

        let correlation = match self.correlator().correlate(&data.sender, &data.receiver) {
            Ok(correlation) => correlation,
            Err(err) => return Acknowledgement::error(&err),
        };

        if !correlation.same_account {
            return ack;
        }

        // Only gates reversals: transfers between different accounts are left
        // to the transfer application's own deny-list handling.
        if self.bank_keeper.blocked_addr(&correlation.sender)
            || self.bank_keeper.blocked_addr(&correlation.recipient)
        {
            return Acknowledgement::error(&WithdrawError::BlockedAddress {
                sender: data.sender.clone(),
                recipient: data.receiver.clone(),
            });
        }

        let recipient = correlation.recipient;

        if self.recipient_can_sign(&recipient) {
            return ack;
        }

        let mut balances: Vec<Coin> = self
            .bank_keeper
            .get_all_balances(&recipient)
            .into_iter()
            .filter(|coin| !coin.is_zero())
            .collect();
        if balances.is_empty() {
            return ack;
        }
        balances.sort_by(|a, b| a.denom.cmp(&b.denom));

        match self.reverse_balances(packet, &data, &recipient, balances) {
            Ok(reversed) => {
                let amount = coins_to_string(&reversed);
                info!(
                    sender = %data.sender,
                    receiver = %data.receiver,
                    amount = %amount,
                    source_port = %packet.source_port,
                    source_channel = %packet.source_channel,
                    "balances withdrawn to sender address"
                );
                self.emit_withdraw_event(packet, &data, &amount);

                Acknowledgement::error(&WithdrawError::TransferReversed {
                    sender: data.sender,
                    recipient: data.receiver,
                    amount,
                })
            }
            Err(err) => {
                error!(
                    sender = %data.sender,
                    receiver = %data.receiver,
                    source_port = %packet.source_port,
                    source_channel = %packet.source_channel,
                    error = %err,
                    "failed to withdraw IBC vouchers"
                );
                Acknowledgement::error(&WithdrawError::WithdrawFailed {
                    sender: data.sender,
                    source: Box::new(err),
                })
            }
        }
    }

    /// Resolves the return route of every balance and checks that each
    /// transfer can be issued. Issues nothing.
    ///
    /// Fails on a zero or repeated denomination, an unresolvable voucher, or
    /// a route whose channel is missing or has no counterparty.
    pub fn plan_reversal(&self, packet: &Packet, holder: &str, balances: Vec<Coin>) -> Result<PendingReversal> {
        let resolver = self.resolver();
        let mut seen = BTreeSet::new();
        let mut pending = PendingReversal::default();

        for coin in balances {
            if coin.is_zero() {
                return Err(WithdrawError::InvalidCoins(format!("zero balance for {}", coin.denom)));
            }
            if !seen.insert(coin.denom.clone()) {
                return Err(WithdrawError::InvalidCoins(format!("duplicate denomination {}", coin.denom)));
            }

            let (source_port, source_channel) = if coin.denom == self.native_denom() {
                // Native tokens leave over the channel the packet arrived on.
                (packet.destination_port.clone(), packet.destination_channel.clone())
            } else {
                resolver.resolve(&coin.denom, holder)?
            };
            self.check_route(&source_port, &source_channel)?;

            pending.transfers.push(PlannedTransfer {
                coin,
                source_port,
                source_channel,
            });
        }

        Ok(pending)
    }

    /// The route's channel must exist and be connected to a counterparty.
    fn check_route(&self, port_id: &str, channel_id: &str) -> Result<()> {
        let channel = self
            .channel_keeper
            .get_channel(port_id, channel_id)
            .ok_or_else(|| WithdrawError::ChannelNotFound {
                port_id: port_id.to_string(),
                channel_id: channel_id.to_string(),
            })?;

        if channel.counterparty_port_id.is_empty() || channel.counterparty_channel_id.is_empty() {
            return Err(WithdrawError::CounterpartyNotFound {
                port_id: port_id.to_string(),
                channel_id: channel_id.to_string(),
            });
        }
        Ok(())
    }

    /// Plans and then issues the return transfers. Returns the coins sent.
    fn reverse_balances(
        &self,
        packet: &Packet,
        data: &FungibleTokenPacketData,
        recipient: &AccAddress,
        balances: Vec<Coin>,
    ) -> Result<Vec<Coin>> {
        let pending = self.plan_reversal(packet, &data.receiver, balances)?;

        for transfer in &pending.transfers {
            // Roles swap: the local account sends to the original sender
            // string. Timeouts are disabled so the return cannot expire.
            let sequence = self
                .transfer_keeper
                .send_transfer(
                    &transfer.source_port,
                    &transfer.source_channel,
                    transfer.coin.clone(),
                    recipient,
                    &data.sender,
                    Height::zero(),
                    0,
                )
                .map_err(|e| WithdrawError::TransferFailed {
                    coin: transfer.coin.to_string(),
                    port_id: transfer.source_port.clone(),
                    channel_id: transfer.source_channel.clone(),
                    reason: e.to_string(),
                })?;

            debug!(
                coin = %transfer.coin,
                port = %transfer.source_port,
                channel = %transfer.source_channel,
                sequence,
                "issued withdraw transfer"
            );
        }

        Ok(pending.coins())
    }

    /// Whether the recipient account can already sign on this chain, or is
    /// an account type withdrawals never apply to.
    fn recipient_can_sign(&self, recipient: &AccAddress) -> bool {
        let Some(account_keeper) = &self.account_keeper else {
            return false;
        };
        let Some(account) = account_keeper.get_account(recipient) else {
            return false;
        };

        match account.kind {
            AccountKind::Module | AccountKind::Vesting => true,
            AccountKind::Base => account
                .pub_key_type
                .map(|key| key.is_supported())
                .unwrap_or(false),
        }
    }

    fn emit_withdraw_event(&self, packet: &Packet, data: &FungibleTokenPacketData, amount: &str) {
        let Some(emitter) = &self.event_emitter else {
            return;
        };

        emitter.emit(
            Event::new(EVENT_TYPE_WITHDRAW)
                .with_attribute(ATTRIBUTE_KEY_SENDER, &data.sender)
                .with_attribute(ATTRIBUTE_KEY_RECEIVER, &data.receiver)
                .with_attribute(ATTRIBUTE_KEY_AMOUNT, amount)
                .with_attribute(ATTRIBUTE_KEY_SRC_PORT, &packet.source_port)
                .with_attribute(ATTRIBUTE_KEY_SRC_CHANNEL, &packet.source_channel)
                .with_attribute(ATTRIBUTE_KEY_DST_PORT, &packet.destination_port)
                .with_attribute(ATTRIBUTE_KEY_DST_CHANNEL, &packet.destination_channel),
        );
    }
}
