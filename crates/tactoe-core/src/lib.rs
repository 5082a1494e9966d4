//! # tactoe-core
//!
//! Shared library for the card tic-tac-toe client containing the board and
//! hand entity model, the selection state machine, the animation driver, the
//! viewport layout engine, and the JSON wire protocol spoken with the game
//! server.
//!
//! It has zero dependencies on sockets, files, timers, windowing, or
//! rendering libraries.
//!
//! # Architecture overview (for beginners)
//!
//! The game server decides everything that matters: whose turn it is, which
//! cards a player holds, and which marks are on the board.  The client's job
//! is to *show* that state and to let the player pick a card and a slot.
//! Because the network is slow compared to the screen, the client animates
//! every visual change instead of teleporting things around.
//!
//! This crate is the foundation of that client.  It defines:
//!
//! - **`domain`** – Pure game-state logic.  The 3×3 [`Board`], the player's
//!   [`Hand`], the [`Selection`] state machine, the [`AnimationDriver`] that
//!   eases every entity toward its target, and [`compute_layout`], which turns
//!   a viewport size into sizes and spacings.
//!
//! - **`protocol`** – How messages travel over the WebSocket.  Every message is
//!   a JSON object with a `"type"` field; [`decode_server_message`] and
//!   [`encode_client_message`] convert between text frames and typed enums.

// Declare the two top-level modules.  Rust will look for each in a
// subdirectory with the same name (e.g., src/protocol/mod.rs).
pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `tactoe_core::Board` instead of `tactoe_core::domain::board::Board`.
pub use domain::animation::AnimationDriver;
pub use domain::board::{Board, BoardError, Marker, Slot, SlotId};
pub use domain::geometry::{Motion, Vec2};
pub use domain::hand::{Card, CardData, CardId, Hand, HandGeometry, SpriteHandle, SpriteState};
pub use domain::layout::{compute_layout, Layout, LayoutTier, Viewport};
pub use domain::selection::{DescriptionPanel, Selection, SelectionChange, SelectionState};
pub use protocol::codec::{decode_server_message, encode_client_message, ProtocolError};
pub use protocol::messages::{CardSpec, ClientMessage, ServerMessage, SlotEffect, SlotState};
