//! tactoe-client library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does tactoe-client do? (for beginners)
//!
//! The client is what a player runs to take part in a game of card
//! tic-tac-toe.  The game server owns the rules; the client:
//!
//! 1. Connects to the server over a WebSocket and reconnects if it drops.
//! 2. Applies every server message (`game_start`, `draw_card`,
//!    `play_card_success`, `game_state`, ...) to a single
//!    [`application::game_session::GameSession`].
//! 3. Lets the player select a card and click a board slot, sending
//!    `play_card` and showing an optimistic ghost marker until the server
//!    answers.
//! 4. Eases every card and marker toward its target once per frame and
//!    exposes the result as a serializable scene snapshot for a renderer.

/// Application layer: the game session, message routing, and ports.
pub mod application;

/// Infrastructure layer: WebSocket transport, asset files, config, console.
pub mod infrastructure;
