//! Recording asset loader for tests.
//!
//! `RecordingAssetLoader` performs no I/O.  Every requested path is pushed into a
//! shared `Mutex<Vec<String>>` so integration tests can assert which artwork
//! the session asked for, then feed results back with
//! [`GameSession::on_sprite_loaded`](crate::application::game_session::GameSession::on_sprite_loaded).
//!
//! # Usage in tests
//!
//! ```ignore
//! let loader = RecordingAssetLoader::new();
//! let requests = loader.requests();
//! let mut session = GameSession::new(SessionConfig::default(), Box::new(loader));
//!
//! session.grant_card(spec);
//! assert_eq!(requests.lock().unwrap().as_slice(), ["src/card.png"]);
//! ```

use std::sync::{Arc, Mutex};

use crate::application::load_assets::AssetLoader;

/// An asset loader that only records requests.
#[derive(Debug, Default, Clone)]
pub struct RecordingAssetLoader {
    requests: Arc<Mutex<Vec<String>>>,
}

impl RecordingAssetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to the recorded paths; stays valid after the loader is
    /// moved into a session.
    pub fn requests(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.requests)
    }
}

impl AssetLoader for RecordingAssetLoader {
    fn request(&self, path: &str) {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(path.to_string());
        }
    }
}
