//! JSON codec for the WebSocket text frames exchanged with the game server.
//!
//! Wire format: one JSON object per text frame.
//! ```text
//! {"type":"<kind>", ...kind-specific fields...}
//! ```
//!
//! Decoding happens in two steps so that the three failure modes can be told
//! apart: the frame is first parsed into a generic JSON value and its
//! `"type"` checked against [`KNOWN_SERVER_KINDS`]; only then is it
//! converted into a typed [`ServerMessage`].  A frame of an unknown kind is
//! not an error in the connection, just a message this client version does
//! not understand, and callers log and skip it.

use serde_json::Value;
use thiserror::Error;

use crate::protocol::messages::{ClientMessage, ServerMessage, KNOWN_SERVER_KINDS};

/// Errors that can occur during message encoding or decoding.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The frame is not valid JSON (or could not be serialized).
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The frame is JSON but has no string `"type"` field.
    #[error("message has no \"type\" field")]
    MissingType,

    /// The `"type"` field names a kind this client does not handle.
    #[error("unknown message type: {0:?}")]
    UnknownMessageType(String),

    /// The kind is known but its fields do not match the expected shape.
    #[error("malformed {kind} message: {source}")]
    Malformed {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ProtocolError {
    /// `true` for errors caused by a newer server speaking kinds this client
    /// does not know, as opposed to a broken frame.
    pub fn is_unknown_kind(&self) -> bool {
        matches!(self, ProtocolError::UnknownMessageType(_))
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Decodes one inbound text frame.
///
/// # Errors
///
/// - [`ProtocolError::Json`] if `text` is not JSON.
/// - [`ProtocolError::MissingType`] if there is no string `"type"`.
/// - [`ProtocolError::UnknownMessageType`] for kinds outside
///   [`KNOWN_SERVER_KINDS`].
/// - [`ProtocolError::Malformed`] if a known kind has the wrong fields.
///
/// # Examples
///
/// ```rust
/// use tactoe_core::{decode_server_message, ServerMessage};
///
/// let msg = decode_server_message(r#"{"type":"play_card_success","target_slot":4}"#).unwrap();
/// assert_eq!(msg, ServerMessage::PlayCardSuccess { target_slot: 4 });
/// ```
pub fn decode_server_message(text: &str) -> Result<ServerMessage, ProtocolError> {
    let value: Value = serde_json::from_str(text)?;

    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or(ProtocolError::MissingType)?
        .to_string();

    if !KNOWN_SERVER_KINDS.contains(&kind.as_str()) {
        return Err(ProtocolError::UnknownMessageType(kind));
    }

    serde_json::from_value(value).map_err(|source| ProtocolError::Malformed { kind, source })
}

/// Encodes an outbound message into a text frame.
///
/// # Errors
///
/// Returns [`ProtocolError::Json`] if serialization fails.
pub fn encode_client_message(msg: &ClientMessage) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(msg)?)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
