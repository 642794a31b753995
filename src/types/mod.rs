//! Domain types shared by the keeper and the middleware.

pub mod acknowledgement;
pub mod channel;
pub mod coin;
pub mod denom;
pub mod event;
pub mod packet;
pub mod params;

pub use acknowledgement::Acknowledgement;
pub use channel::{Channel, ChannelCapability};
pub use coin::Coin;
pub use denom::{DenomTrace, Hop, IBC_DENOM_PREFIX};
pub use event::Event;
pub use packet::{FungibleTokenPacketData, Height, Packet};
pub use params::Params;
