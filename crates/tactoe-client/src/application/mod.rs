//! Application layer for the client.
//!
//! # What lives here?
//!
//! - **`game_session`** – The single state container.  Every event (server
//!   message, click, resize, frame tick, finished asset load) is applied by
//!   one synchronous `GameSession` method.
//!
//! - **`message_router`** – Decodes inbound text frames and calls the
//!   matching session operation.  Unknown message kinds are logged and
//!   skipped.
//!
//! - **`load_assets`** – The `AssetLoader` port through which the session
//!   asks for card artwork.  The file-system implementation is injected at
//!   construction time from the infrastructure layer.

pub mod game_session;
pub mod load_assets;
pub mod message_router;
