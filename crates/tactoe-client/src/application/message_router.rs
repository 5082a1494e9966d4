//! Message router: turns inbound text frames into [`GameSession`] calls.
//!
//! Decoding failures never reach the session.  A frame of an unknown kind is
//! logged at `warn` and skipped, so a newer server can add message kinds
//! without breaking older clients; a broken frame is logged the same way.

use tactoe_core::{decode_server_message, ProtocolError, ServerMessage};
use tracing::{debug, warn};

use crate::application::game_session::GameSession;

/// Decodes one text frame and applies it.
///
/// Returns the decoded message kind, or `None` when the frame was skipped.
pub fn route_frame(session: &mut GameSession, text: &str) -> Option<&'static str> {
    match decode_server_message(text) {
        Ok(msg) => {
            let kind = msg.kind();
            dispatch_server_message(session, msg);
            Some(kind)
        }
        Err(ProtocolError::UnknownMessageType(kind)) => {
            warn!(%kind, "ignoring message of unknown type");
            None
        }
        Err(e) => {
            warn!("ignoring undecodable frame: {e}");
            None
        }
    }
}

/// Applies one decoded server message to the session.
pub fn dispatch_server_message(session: &mut GameSession, msg: ServerMessage) {
    debug!(kind = msg.kind(), "server message");
    match msg {
        ServerMessage::GameStart { cards_to_add } => session.start_game(cards_to_add),
        ServerMessage::DrawCard(spec) => {
            session.grant_card(spec);
        }
        ServerMessage::PlayCardSuccess { target_slot } => session.confirm_play(target_slot),
        ServerMessage::GameState { board_state } => session.reconcile_board(&board_state),
        ServerMessage::TurnStart => session.start_turn(),
        ServerMessage::RemoveCards { cards_to_remove } => session.remove_cards(&cards_to_remove),
        ServerMessage::Error { reason } => {
            session.reject_pending_play(reason.as_deref().unwrap_or("rejected by server"))
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
