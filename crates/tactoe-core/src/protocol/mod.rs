//! Protocol module containing the JSON message types and the text codec.

pub mod codec;
pub mod messages;

pub use codec::{decode_server_message, encode_client_message, ProtocolError};
pub use messages::*;
