use serde::{Deserialize, Serialize};

/// An open channel end on this chain and the end it connects to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub port_id: String,
    pub channel_id: String,
    pub counterparty_port_id: String,
    pub counterparty_channel_id: String,
}

impl Channel {
    pub fn new(
        port_id: impl Into<String>,
        channel_id: impl Into<String>,
        counterparty_port_id: impl Into<String>,
        counterparty_channel_id: impl Into<String>,
    ) -> Self {
        Self {
            port_id: port_id.into(),
            channel_id: channel_id.into(),
            counterparty_port_id: counterparty_port_id.into(),
            counterparty_channel_id: counterparty_channel_id.into(),
        }
    }
}

/// Capability authorising a module to send on a channel. Opaque to the
/// middleware, which only hands it down the stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelCapability {
    pub index: u64,
    pub name: String,
}
