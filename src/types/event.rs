use serde::{Deserialize, Serialize};

/// Event type emitted when balances are sent back to the original sender.
pub const EVENT_TYPE_WITHDRAW: &str = "withdraw";

pub const ATTRIBUTE_KEY_SENDER: &str = "sender";
pub const ATTRIBUTE_KEY_RECEIVER: &str = "receiver";
pub const ATTRIBUTE_KEY_AMOUNT: &str = "amount";
pub const ATTRIBUTE_KEY_SRC_PORT: &str = "packet_src_port";
pub const ATTRIBUTE_KEY_SRC_CHANNEL: &str = "packet_src_channel";
pub const ATTRIBUTE_KEY_DST_PORT: &str = "packet_dst_port";
pub const ATTRIBUTE_KEY_DST_CHANNEL: &str = "packet_dst_channel";

/// A typed event with ordered key/value attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub kind: String,
    pub attributes: Vec<(String, String)>,
}

impl Event {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}
