//! Protocol module containing message types and the line codec.

pub mod codec;
pub mod messages;

pub use codec::ProtocolError;
pub use messages::*;
