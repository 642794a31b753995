//! IBC Middleware Module
//!
//! Places the withdraw keeper between the core channel layer and the transfer
//! application. Inbound packets go to the application first; its
//! acknowledgement is then handed to the keeper, which may replace it.
//! Outbound sends and acknowledgement writes are forwarded down the stack
//! unchanged.

use anyhow::Result;

use crate::keeper::Keeper;
use crate::types::{Acknowledgement, ChannelCapability, Packet};

/// Packet callbacks of an IBC application or middleware.
pub trait IbcModule {
    fn on_recv_packet(&self, packet: &Packet, relayer: &str) -> Acknowledgement;

    fn on_acknowledgement_packet(&self, packet: &Packet, acknowledgement: &[u8], relayer: &str) -> Result<()>;

    fn on_timeout_packet(&self, packet: &Packet, relayer: &str) -> Result<()>;
}

/// Outbound side of a middleware stack.
pub trait Ics4Wrapper {
    /// Sends a packet, returning its sequence.
    fn send_packet(&self, channel_cap: &ChannelCapability, packet: Packet) -> Result<u64>;

    fn write_acknowledgement(
        &self,
        channel_cap: &ChannelCapability,
        packet: &Packet,
        acknowledgement: Acknowledgement,
    ) -> Result<()>;
}

pub struct IbcMiddleware<A, W> {
    app: A,
    keeper: Keeper,
    ics4_wrapper: W,
}

impl<A: IbcModule, W: Ics4Wrapper> IbcMiddleware<A, W> {
    pub fn new(app: A, keeper: Keeper, ics4_wrapper: W) -> Self {
        Self {
            app,
            keeper,
            ics4_wrapper,
        }
    }

    pub fn keeper(&self) -> &Keeper {
        &self.keeper
    }

    pub fn app(&self) -> &A {
        &self.app
    }

    pub fn ics4_wrapper(&self) -> &W {
        &self.ics4_wrapper
    }
}

impl<A: IbcModule, W: Ics4Wrapper> IbcModule for IbcMiddleware<A, W> {
    fn on_recv_packet(&self, packet: &Packet, relayer: &str) -> Acknowledgement {
        let ack = self.app.on_recv_packet(packet, relayer);
        self.keeper.on_recv_packet(packet, ack)
    }

    fn on_acknowledgement_packet(&self, packet: &Packet, acknowledgement: &[u8], relayer: &str) -> Result<()> {
        self.app.on_acknowledgement_packet(packet, acknowledgement, relayer)
    }

    fn on_timeout_packet(&self, packet: &Packet, relayer: &str) -> Result<()> {
        self.app.on_timeout_packet(packet, relayer)
    }
}

impl<A: IbcModule, W: Ics4Wrapper> Ics4Wrapper for IbcMiddleware<A, W> {
    fn send_packet(&self, channel_cap: &ChannelCapability, packet: Packet) -> Result<u64> {
        self.ics4_wrapper.send_packet(channel_cap, packet)
    }

    fn write_acknowledgement(
        &self,
        channel_cap: &ChannelCapability,
        packet: &Packet,
        acknowledgement: Acknowledgement,
    ) -> Result<()> {
        self.ics4_wrapper
            .write_acknowledgement(channel_cap, packet, acknowledgement)
    }
}
