//! Shared test helpers for integration tests
//!
//! This module provides an in-memory chain implementing every collaborator
//! the withdraw keeper depends on, plus builders for packets and keepers.
//!
//! The module is organized into several categories:
//! - **Constants**: Prefixes, denominations, ports and channels
//! - **Mock Chain**: Balances, traces, channels, accounts and issued transfers
//! - **Builders**: Addresses, packets and keepers

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex};

use anyhow::bail;
use ibc_withdraw::address::AccAddress;
use ibc_withdraw::keeper::{
    AccountInfo, AccountKeeper, BankKeeper, ChannelKeeper, EventEmitter, Keeper, TransferKeeper,
};
use ibc_withdraw::middleware::{IbcModule, Ics4Wrapper};
use ibc_withdraw::types::{
    Acknowledgement, Channel, ChannelCapability, Coin, DenomTrace, Event, FungibleTokenPacketData,
    Height, Packet, Params,
};
use ibc_withdraw::ParamsStore;
use rand::RngCore;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Bech32 prefix of the local chain
pub const LOCAL_PREFIX: &str = "evmos";

/// Bech32 prefix of the counterparty chain
pub const FOREIGN_PREFIX: &str = "cosmos";

/// Native base denomination of the local chain
pub const NATIVE_DENOM: &str = "aevmos";

/// Transfer port on both chains
pub const TRANSFER_PORT: &str = "transfer";

/// Local channel the test packets arrive on
pub const DEST_CHANNEL: &str = "channel-0";

/// Counterparty channel the test packets leave from
pub const SOURCE_CHANNEL: &str = "channel-292";

/// A second local channel, to another chain
pub const OTHER_CHANNEL: &str = "channel-3";

/// Counterparty of `OTHER_CHANNEL`
pub const OTHER_COUNTERPARTY_CHANNEL: &str = "channel-204";

// ============================================================================
// MOCK CHAIN
// ============================================================================

/// Transfer issued through the mock transfer keeper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentTransfer {
    pub source_port: String,
    pub source_channel: String,
    pub token: Coin,
    pub sender: AccAddress,
    pub receiver: String,
    pub timeout_height: Height,
    pub timeout_timestamp: u64,
    pub sequence: u64,
}

/// In-memory state shared by every mock keeper.
#[derive(Default)]
pub struct MockChain {
    balances: Mutex<HashMap<AccAddress, BTreeMap<String, u128>>>,
    traces: Mutex<HashMap<[u8; 32], DenomTrace>>,
    channels: Mutex<HashMap<(String, String), Channel>>,
    blocked: Mutex<HashSet<AccAddress>>,
    accounts: Mutex<HashMap<AccAddress, AccountInfo>>,
    failing_denoms: Mutex<HashSet<String>>,
    sent: Mutex<Vec<SentTransfer>>,
    events: Mutex<Vec<Event>>,
}

impl MockChain {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_balance(&self, addr: &AccAddress, denom: &str, amount: u128) {
        self.balances
            .lock()
            .unwrap()
            .entry(addr.clone())
            .or_default()
            .insert(denom.to_string(), amount);
    }

    pub fn balance_of(&self, addr: &AccAddress, denom: &str) -> u128 {
        self.balances
            .lock()
            .unwrap()
            .get(addr)
            .and_then(|coins| coins.get(denom).copied())
            .unwrap_or(0)
    }

    /// Records a trace and returns its voucher denomination.
    pub fn set_denom_trace(&self, trace: DenomTrace) -> String {
        let denom = trace.ibc_denom();
        self.traces.lock().unwrap().insert(trace.hash(), trace);
        denom
    }

    pub fn set_channel(&self, port_id: &str, channel_id: &str, counterparty_channel_id: &str) {
        self.channels.lock().unwrap().insert(
            (port_id.to_string(), channel_id.to_string()),
            Channel::new(port_id, channel_id, TRANSFER_PORT, counterparty_channel_id),
        );
    }

    pub fn block(&self, addr: &AccAddress) {
        self.blocked.lock().unwrap().insert(addr.clone());
    }

    pub fn set_account(&self, addr: &AccAddress, info: AccountInfo) {
        self.accounts.lock().unwrap().insert(addr.clone(), info);
    }

    /// Makes every later `send_transfer` of `denom` fail.
    pub fn fail_sends_for(&self, denom: &str) {
        self.failing_denoms.lock().unwrap().insert(denom.to_string());
    }

    pub fn sent_transfers(&self) -> Vec<SentTransfer> {
        self.sent.lock().unwrap().clone()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }
}

impl BankKeeper for MockChain {
    fn get_all_balances(&self, addr: &AccAddress) -> Vec<Coin> {
        self.balances
            .lock()
            .unwrap()
            .get(addr)
            .map(|coins| {
                coins
                    .iter()
                    .filter(|(_, amount)| **amount > 0)
                    .map(|(denom, amount)| Coin::new(denom.clone(), *amount))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn get_balance(&self, addr: &AccAddress, denom: &str) -> Coin {
        Coin::new(denom, self.balance_of(addr, denom))
    }

    fn blocked_addr(&self, addr: &AccAddress) -> bool {
        self.blocked.lock().unwrap().contains(addr)
    }
}

impl TransferKeeper for MockChain {
    fn send_transfer(
        &self,
        source_port: &str,
        source_channel: &str,
        token: Coin,
        sender: &AccAddress,
        receiver: &str,
        timeout_height: Height,
        timeout_timestamp: u64,
    ) -> anyhow::Result<u64> {
        if self.failing_denoms.lock().unwrap().contains(&token.denom) {
            bail!("send disabled for {}", token.denom);
        }

        let held = self.balance_of(sender, &token.denom);
        if held < token.amount {
            bail!("insufficient funds: {} < {}", held, token);
        }
        self.set_balance(sender, &token.denom, held - token.amount);

        let mut sent = self.sent.lock().unwrap();
        let sequence = sent.len() as u64 + 1;
        sent.push(SentTransfer {
            source_port: source_port.to_string(),
            source_channel: source_channel.to_string(),
            token,
            sender: sender.clone(),
            receiver: receiver.to_string(),
            timeout_height,
            timeout_timestamp,
            sequence,
        });
        Ok(sequence)
    }

    fn get_denom_trace(&self, hash: &[u8; 32]) -> Option<DenomTrace> {
        self.traces.lock().unwrap().get(hash).cloned()
    }
}

impl ChannelKeeper for MockChain {
    fn get_channel(&self, port_id: &str, channel_id: &str) -> Option<Channel> {
        self.channels
            .lock()
            .unwrap()
            .get(&(port_id.to_string(), channel_id.to_string()))
            .cloned()
    }
}

impl AccountKeeper for MockChain {
    fn get_account(&self, addr: &AccAddress) -> Option<AccountInfo> {
        self.accounts.lock().unwrap().get(addr).cloned()
    }
}

impl EventEmitter for MockChain {
    fn emit(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

/// Transfer application stand-in: credits the received voucher to the
/// receiver and acknowledges with success, like the ICS-20 app does.
pub struct MockTransferApp {
    pub chain: Arc<MockChain>,
}

impl IbcModule for MockTransferApp {
    fn on_recv_packet(&self, packet: &Packet, _relayer: &str) -> Acknowledgement {
        let data = match FungibleTokenPacketData::decode(&packet.data) {
            Ok(data) => data,
            Err(err) => return Acknowledgement::error(&err),
        };
        let receiver = match ibc_withdraw::address::decode_with_prefix(&data.receiver, LOCAL_PREFIX) {
            Ok(addr) => addr,
            Err(err) => return Acknowledgement::error(&err),
        };

        let trace: DenomTrace = match format!("{}/{}/{}", packet.destination_port, packet.destination_channel, data.denom).parse() {
            Ok(trace) => trace,
            Err(err) => return Acknowledgement::error(&err),
        };
        let denom = self.chain.set_denom_trace(trace);
        let amount: u128 = data.amount.parse().unwrap_or(0);
        let held = self.chain.balance_of(&receiver, &denom);
        self.chain.set_balance(&receiver, &denom, held + amount);

        Acknowledgement::success()
    }

    fn on_acknowledgement_packet(&self, _packet: &Packet, _acknowledgement: &[u8], _relayer: &str) -> anyhow::Result<()> {
        Ok(())
    }

    fn on_timeout_packet(&self, _packet: &Packet, _relayer: &str) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Records packets handed down the stack.
#[derive(Default)]
pub struct MockIcs4Wrapper {
    pub sent_packets: Mutex<Vec<Packet>>,
    pub written_acks: Mutex<Vec<Acknowledgement>>,
}

impl Ics4Wrapper for MockIcs4Wrapper {
    fn send_packet(&self, _channel_cap: &ChannelCapability, packet: Packet) -> anyhow::Result<u64> {
        let mut sent = self.sent_packets.lock().unwrap();
        sent.push(packet);
        Ok(sent.len() as u64)
    }

    fn write_acknowledgement(
        &self,
        _channel_cap: &ChannelCapability,
        _packet: &Packet,
        acknowledgement: Acknowledgement,
    ) -> anyhow::Result<()> {
        self.written_acks.lock().unwrap().push(acknowledgement);
        Ok(())
    }
}

// ============================================================================
// BUILDERS
// ============================================================================

/// Random 20-byte account.
pub fn random_account() -> AccAddress {
    let mut bytes = [0u8; 20];
    rand::thread_rng().fill_bytes(&mut bytes);
    AccAddress::new(bytes.to_vec())
}

pub fn bech32(addr: &AccAddress, prefix: &str) -> String {
    addr.to_bech32(prefix).unwrap()
}

/// Transfer packet arriving on `DEST_CHANNEL` from the counterparty.
pub fn transfer_packet(denom: &str, amount: &str, sender: &str, receiver: &str) -> Packet {
    let data = FungibleTokenPacketData::new(denom, amount, sender, receiver);
    packet_with_data(data.to_bytes())
}

pub fn packet_with_data(data: Vec<u8>) -> Packet {
    Packet {
        sequence: 1,
        source_port: TRANSFER_PORT.to_string(),
        source_channel: SOURCE_CHANNEL.to_string(),
        destination_port: TRANSFER_PORT.to_string(),
        destination_channel: DEST_CHANNEL.to_string(),
        data,
        timeout_height: Height::new(0, 100),
        timeout_timestamp: 0,
    }
}

/// Voucher of `base_denom` received over `DEST_CHANNEL`.
pub fn dest_channel_voucher(chain: &MockChain, base_denom: &str) -> String {
    chain.set_denom_trace(DenomTrace::new(
        vec![ibc_withdraw::Hop::new(TRANSFER_PORT, DEST_CHANNEL)],
        base_denom,
    ))
}

/// Keeper wired to a mock chain and params store.
pub struct TestEnv {
    pub chain: Arc<MockChain>,
    pub params: Arc<ParamsStore>,
    pub keeper: Keeper,
}

impl TestEnv {
    pub fn new() -> Self {
        Self::with_params(Params::default())
    }

    pub fn with_params(params: Params) -> Self {
        let chain = MockChain::new();
        chain.set_channel(TRANSFER_PORT, DEST_CHANNEL, SOURCE_CHANNEL);
        chain.set_channel(TRANSFER_PORT, OTHER_CHANNEL, OTHER_COUNTERPARTY_CHANNEL);

        let params = Arc::new(ParamsStore::new(params).unwrap());
        let keeper = build_keeper(&chain, &params);
        Self { chain, params, keeper }
    }
}

pub fn build_keeper(chain: &Arc<MockChain>, params: &Arc<ParamsStore>) -> Keeper {
    Keeper::builder(LOCAL_PREFIX, NATIVE_DENOM)
        .bank_keeper(chain.clone())
        .transfer_keeper(chain.clone())
        .channel_keeper(chain.clone())
        .params_keeper(params.clone())
        .account_keeper(chain.clone())
        .event_emitter(chain.clone())
        .build()
        .unwrap()
}
