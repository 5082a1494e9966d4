//! Asset loading port.
//!
//! The session never touches the file system.  It asks an [`AssetLoader`] to
//! fetch a card's artwork and later receives the result as a
//! [`SpriteLoaded`] event through the same event loop as every other input.
//! Implementations live in the infrastructure layer.

use tactoe_core::SpriteHandle;
use thiserror::Error;

/// Errors reported for a failed artwork load.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssetError {
    /// No file exists at the resolved path.
    #[error("asset not found: {0}")]
    NotFound(String),

    /// The file exists but could not be read.
    #[error("failed to read asset {path}: {reason}")]
    Io { path: String, reason: String },
}

/// The outcome of one [`AssetLoader::request`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteLoaded {
    /// The path exactly as it was requested (the card's graphic path).
    pub path: String,
    pub outcome: Result<SpriteHandle, AssetError>,
}

/// Fetches card artwork asynchronously.
///
/// `request` must return immediately; the result is delivered later as a
/// [`SpriteLoaded`] event.  The session requests each distinct path once.
#[cfg_attr(test, mockall::automock)]
pub trait AssetLoader: Send {
    fn request(&self, path: &str);
}
