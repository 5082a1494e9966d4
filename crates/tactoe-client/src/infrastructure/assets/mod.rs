//! File-system asset loader.
//!
//! [`FsAssetLoader`] resolves card graphic paths against an asset root and
//! reads them on the Tokio runtime.  Each finished read is delivered as a
//! [`SpriteLoaded`] event on an unbounded channel that the event loop
//! selects on, so the session learns about it the same way it learns about
//! network frames.
//!
//! Decoding the bytes into a texture belongs to the renderer; here a sprite
//! is just the raw file contents behind an `Arc`.

pub mod mock;

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use tactoe_core::SpriteHandle;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::debug;

use crate::application::load_assets::{AssetError, AssetLoader, SpriteLoaded};

/// Reads card artwork from a directory.
pub struct FsAssetLoader {
    root: PathBuf,
    runtime: Handle,
    tx: mpsc::UnboundedSender<SpriteLoaded>,
}

impl FsAssetLoader {
    /// Creates a loader and the receiver its results arrive on.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(root: impl Into<PathBuf>) -> (Self, mpsc::UnboundedReceiver<SpriteLoaded>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let loader = Self {
            root: root.into(),
            runtime: Handle::current(),
            tx,
        };
        (loader, rx)
    }

    /// Joins `path` onto the asset root.
    ///
    /// Returns `None` for absolute paths and paths that climb out of the root
    /// with `..`, which the server has no business sending.
    pub fn resolve(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if path.is_empty() || escapes {
            None
        } else {
            Some(self.root.join(relative))
        }
    }
}

impl AssetLoader for FsAssetLoader {
    fn request(&self, path: &str) {
        let requested = path.to_string();
        let resolved = self.resolve(path);
        let tx = self.tx.clone();

        self.runtime.spawn(async move {
            let outcome = match resolved {
                None => Err(AssetError::NotFound(requested.clone())),
                Some(file) => read_sprite(&requested, &file).await,
            };
            debug!(path = %requested, ok = outcome.is_ok(), "asset read finished");
            // The receiver is gone only during shutdown.
            let _ = tx.send(SpriteLoaded {
                path: requested,
                outcome,
            });
        });
    }
}

async fn read_sprite(requested: &str, file: &Path) -> Result<SpriteHandle, AssetError> {
    match tokio::fs::read(file).await {
        Ok(bytes) => Ok(SpriteHandle {
            path: requested.to_string(),
            bytes: Arc::from(bytes),
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(AssetError::NotFound(requested.to_string()))
        }
        Err(e) => Err(AssetError::Io {
            path: requested.to_string(),
            reason: e.to_string(),
        }),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
