//! Infrastructure layer for the client application.
//!
//! Contains the adapters that touch sockets, files, and stdin.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `tactoe_core`, but MUST NOT be imported by the `application` or domain
//! layers.
//!
//! # Sub-modules
//!
//! - **`network`** – WebSocket client that connects to the game server,
//!   forwards text frames, and reconnects automatically if the connection
//!   drops.
//!
//! - **`assets`** – `FsAssetLoader`, which reads card artwork under an asset
//!   root on the Tokio runtime.  A recording loader is provided for tests.
//!
//! - **`storage`** – TOML configuration file.
//!
//! - **`console`** – stdin command reader standing in for a window system.
//!
//! - **`ui_bridge`** – serializable scene snapshots for a renderer.

pub mod assets;
pub mod console;
pub mod network;
pub mod storage;
pub mod ui_bridge;
