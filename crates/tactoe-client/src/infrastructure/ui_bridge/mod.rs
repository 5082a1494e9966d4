//! Renderer bridge: serializable scene snapshots.
//!
//! The game session keeps its state in domain types that are not meant to
//! cross a process or language boundary.  A renderer (a scene graph, a web
//! view, or the console `dump` command) instead receives a
//! [`SceneSnapshot`]: a plain DTO describing everything that should be on
//! screen this frame.
//!
//! # DTOs (Data Transfer Objects)
//!
//! Each DTO derives `serde::Serialize` + `serde::Deserialize` so it can be
//! turned into JSON for any frontend.  Only *current* visual state is
//! exported (where things are drawn now), never targets; targets are an
//! implementation detail of the animation.
//!
//! ```json
//! {
//!   "viewport": {"width": 1280.0, "height": 720.0},
//!   "connection": "Connected",
//!   "slots": [{"id": 4, "x": 640.0, "y": 254.0, "marker": {"graphic_path": "src/mark.png", "x": 640.0, "y": 254.0, "scale": 1.0}}],
//!   "cards": [{"id": 1, "name": "Mark", "x": 640.0, "y": 636.0, "scale": 0.55, "z_index": 0, "selected": false, "interactive": true}],
//!   "panel": null,
//!   "ghost": null
//! }
//! ```

use serde::{Deserialize, Serialize};
use tactoe_core::{LayoutTier, Marker};

use crate::application::game_session::GameSession;

/// Connection status of the client as shown by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConnectionStatus {
    /// Not connected; the network task is retrying.
    #[default]
    Disconnected,
    /// WebSocket open.
    Connected,
}

// ── DTOs ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportDto {
    pub width: f32,
    pub height: f32,
}

/// A marker drawn on (or flying toward) a slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerDto {
    pub graphic_path: String,
    pub x: f32,
    pub y: f32,
    pub scale: f32,
}

impl From<&Marker> for MarkerDto {
    fn from(marker: &Marker) -> Self {
        let at = marker.motion().current();
        Self {
            graphic_path: marker.graphic_path().to_string(),
            x: at.x,
            y: at.y,
            scale: marker.motion().scale(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotDto {
    pub id: u8,
    /// Slot centre.
    pub x: f32,
    pub y: f32,
    pub marker: Option<MarkerDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardDto {
    pub id: u64,
    pub name: String,
    pub graphic_path: String,
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    pub z_index: i32,
    pub selected: bool,
    /// `false` while the artwork is loading or after it failed.
    pub interactive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelDto {
    pub title: String,
    pub body: String,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub viewport: ViewportDto,
    pub tier: LayoutTier,
    pub slot_size: f32,
    pub connection: ConnectionStatus,
    pub is_my_turn: bool,
    pub slots: Vec<SlotDto>,
    /// Back to front (ascending z-index).
    pub cards: Vec<CardDto>,
    pub panel: Option<PanelDto>,
    /// The optimistic marker of a play awaiting confirmation.
    pub ghost: Option<MarkerDto>,
}

impl SceneSnapshot {
    /// Captures the session's current visual state.
    pub fn capture(session: &GameSession, connection: ConnectionStatus) -> Self {
        let viewport = session.viewport();

        let slots = session
            .board()
            .slots()
            .map(|slot| SlotDto {
                id: u8::from(slot.id()),
                x: slot.screen().x,
                y: slot.screen().y,
                marker: slot.marker().map(MarkerDto::from),
            })
            .collect();

        let mut cards: Vec<CardDto> = session
            .hand()
            .cards()
            .iter()
            .map(|card| {
                let at = card.motion().current();
                CardDto {
                    id: card.id().raw(),
                    name: card.name().to_string(),
                    graphic_path: card.graphic_path().to_string(),
                    x: at.x,
                    y: at.y,
                    scale: card.motion().scale(),
                    z_index: card.z_index(),
                    selected: card.is_selected(),
                    interactive: card.is_interactive(),
                }
            })
            .collect();
        cards.sort_by_key(|c| c.z_index);

        Self {
            viewport: ViewportDto {
                width: viewport.width,
                height: viewport.height,
            },
            tier: session.layout().tier,
            slot_size: session.layout().slot_size,
            connection,
            is_my_turn: session.is_my_turn(),
            slots,
            cards,
            panel: session.panel().map(|p| PanelDto {
                title: p.title.clone(),
                body: p.body.clone(),
            }),
            ghost: session
                .pending_play()
                .and_then(|p| p.ghost.as_ref())
                .map(MarkerDto::from),
        }
    }

    /// Pretty JSON for the console `dump` command.
    ///
    /// # Errors
    ///
    /// Returns the serializer error (only possible for non-finite floats,
    /// which the layout engine never produces).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
