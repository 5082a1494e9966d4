//! All message types exchanged with the game server.
//!
//! Every message is a JSON object with a `"type"` field naming its kind.
//! Card and board payloads use the server's PascalCase field names
//! (`Name`, `GraphicPath`, `IsDisplayable`, ...); envelope fields use
//! snake_case (`cards_to_add`, `target_slot`).  Fields the client does not
//! understand are ignored, and every field the server may omit has a
//! default, because the server leaves out zero values.

use serde::{Deserialize, Serialize};

use crate::domain::hand::CardData;

// ── Message kinds ─────────────────────────────────────────────────────────────

/// Every inbound `"type"` the client understands.
pub const KNOWN_SERVER_KINDS: [&str; 7] = [
    "game_start",
    "draw_card",
    "play_card_success",
    "game_state",
    "turn_start",
    "remove_cards",
    "error",
];

// ── Payload structs ───────────────────────────────────────────────────────────

/// A card as described by the server.
///
/// The server sends more fields than these (type, impact, effects); they are
/// rules data and are ignored on the client.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CardSpec {
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Description", default)]
    pub description: String,
    #[serde(rename = "GraphicPath", default)]
    pub graphic_path: String,
    #[serde(rename = "MarkerPath", default)]
    pub marker_path: String,
}

impl From<CardSpec> for CardData {
    fn from(spec: CardSpec) -> Self {
        CardData {
            name: spec.name,
            description: spec.description,
            graphic_path: spec.graphic_path,
            marker_path: spec.marker_path,
        }
    }
}

/// One effect stacked on a board slot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SlotEffect {
    #[serde(rename = "GraphicPath", default)]
    pub graphic_path: String,
    /// Invisible effects (e.g. traps) are present on the server but never
    /// drawn.
    #[serde(rename = "IsDisplayable", default)]
    pub is_displayable: bool,
}

/// The authoritative state of one slot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SlotState {
    /// Raw slot id; validated when applied to the board.
    #[serde(rename = "ID", default)]
    pub id: i64,
    /// Effects in the order they were applied.
    #[serde(rename = "Effects", default)]
    pub effects: Vec<SlotEffect>,
}

impl SlotState {
    /// The effect whose graphic the slot shows.
    ///
    /// Effects are searched newest-first; the first displayable one wins.
    /// `None` means the slot's current marker is left as is.
    pub fn displayed_effect(&self) -> Option<&SlotEffect> {
        self.effects.iter().rev().find(|e| e.is_displayable)
    }
}

// ── Server → client ───────────────────────────────────────────────────────────

/// Messages sent by the game server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// A new game: reset everything, then deal these cards.
    GameStart {
        #[serde(default)]
        cards_to_add: Vec<CardSpec>,
    },
    /// One card added to the hand.  The card fields sit next to `"type"`.
    DrawCard(CardSpec),
    /// The player's last play was accepted.
    PlayCardSuccess {
        /// Omitted by the server when it is zero.
        #[serde(default)]
        target_slot: i64,
    },
    /// Authoritative board contents.
    GameState {
        #[serde(default)]
        board_state: Vec<SlotState>,
    },
    /// It is now this player's turn.
    TurnStart,
    /// Cards to take out of the hand, matched by name.
    RemoveCards {
        #[serde(default)]
        cards_to_remove: Vec<CardSpec>,
    },
    /// The server rejected the last request (e.g. a play out of turn).
    Error {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
}

impl ServerMessage {
    /// The wire `"type"` of this message.
    pub fn kind(&self) -> &'static str {
        match self {
            ServerMessage::GameStart { .. } => "game_start",
            ServerMessage::DrawCard(_) => "draw_card",
            ServerMessage::PlayCardSuccess { .. } => "play_card_success",
            ServerMessage::GameState { .. } => "game_state",
            ServerMessage::TurnStart => "turn_start",
            ServerMessage::RemoveCards { .. } => "remove_cards",
            ServerMessage::Error { .. } => "error",
        }
    }
}

// ── Client → server ───────────────────────────────────────────────────────────

/// Messages sent by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Development trigger: ask the server to deal a named card.
    DrawCard {
        #[serde(rename = "cardName")]
        card_name: String,
        #[serde(rename = "graphicPath")]
        graphic_path: String,
    },
    /// Play a card onto a slot.
    PlayCard {
        name: String,
        description: String,
        #[serde(rename = "graphicPath")]
        graphic_path: String,
        target_slot: u8,
    },
}

impl ClientMessage {
    /// Builds the `play_card` message for a card and slot.
    pub fn play_card(card: &CardData, target_slot: u8) -> Self {
        ClientMessage::PlayCard {
            name: card.name.clone(),
            description: card.description.clone(),
            graphic_path: card.graphic_path.clone(),
            target_slot,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ClientMessage::DrawCard { .. } => "draw_card",
            ClientMessage::PlayCard { .. } => "play_card",
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn effect(path: &str, displayable: bool) -> SlotEffect {
        SlotEffect {
            graphic_path: path.to_string(),
            is_displayable: displayable,
        }
    }

    #[test]
    fn test_displayed_effect_prefers_latest_displayable() {
        let state = SlotState {
            id: 3,
            effects: vec![effect("old.png", true), effect("new.png", true)],
        };
        assert_eq!(state.displayed_effect().unwrap().graphic_path, "new.png");
    }

    #[test]
    fn test_displayed_effect_skips_invisible_effects() {
        let state = SlotState {
            id: 3,
            effects: vec![effect("mark.png", true), effect("trap.png", false)],
        };
        assert_eq!(state.displayed_effect().unwrap().graphic_path, "mark.png");
    }

    #[test]
    fn test_displayed_effect_none_when_nothing_displayable() {
        let state = SlotState {
            id: 0,
            effects: vec![effect("trap.png", false)],
        };
        assert!(state.displayed_effect().is_none());
    }

    #[test]
    fn test_card_spec_converts_to_card_data() {
        let spec = CardSpec {
            name: "Mark".into(),
            description: "Place a mark".into(),
            graphic_path: "src/card_test_mark.png".into(),
            marker_path: "src/mark.png".into(),
        };
        let data = CardData::from(spec);
        assert_eq!(data.name, "Mark");
        assert_eq!(data.marker_path, "src/mark.png");
    }

    #[test]
    fn test_kind_matches_known_kinds() {
        let msgs = [
            ServerMessage::GameStart {
                cards_to_add: vec![],
            },
            ServerMessage::DrawCard(CardSpec::default()),
            ServerMessage::PlayCardSuccess { target_slot: 0 },
            ServerMessage::GameState {
                board_state: vec![],
            },
            ServerMessage::TurnStart,
            ServerMessage::RemoveCards {
                cards_to_remove: vec![],
            },
            ServerMessage::Error { reason: None },
        ];
        for msg in &msgs {
            assert!(KNOWN_SERVER_KINDS.contains(&msg.kind()));
        }
    }
}
