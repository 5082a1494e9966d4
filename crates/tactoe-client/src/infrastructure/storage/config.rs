//! TOML-based configuration for the client.
//!
//! Reads `AppConfig` from an explicit path (`--config`) or from the
//! platform-appropriate config file:
//! - Windows:  `%APPDATA%\Tactoe\config.toml`
//! - Linux:    `~/.config/tactoe/config.toml`
//! - macOS:    `~/Library/Application Support/Tactoe/config.toml`
//!
//! Example file:
//!
//! ```toml
//! [network]
//! server_url = "ws://game.example.org:8080/ws"
//! reconnect_interval_ms = 3000
//!
//! [gameplay]
//! pending_play_timeout_ms = 0   # keep plays pending until the server answers
//! ```
//!
//! # Serde default values
//!
//! Every field carries `#[serde(default = "some_fn")]`, so a file only needs
//! the settings it changes and a missing file yields [`AppConfig::default`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tactoe_core::AnimationDriver;
use thiserror::Error;

use crate::application::game_session::SessionConfig;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level client configuration stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
    #[serde(default)]
    pub gameplay: GameplayConfig,
}

/// General client behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    /// `RUST_LOG` takes precedence when set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Game server connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkConfig {
    /// WebSocket endpoint of the game server.
    #[serde(default = "default_server_url")]
    pub server_url: String,
    /// Delay between reconnection attempts.
    #[serde(default = "default_reconnect_interval_ms")]
    pub reconnect_interval_ms: u64,
}

/// Initial viewport and frame pacing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplayConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    /// Animation ticks per second.
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
}

/// Easing parameters for the animation driver.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnimationConfig {
    /// Share of the remaining distance covered per frame.
    #[serde(default = "default_fraction")]
    pub fraction: f32,
    /// Snap threshold in screen units.
    #[serde(default = "default_epsilon")]
    pub epsilon: f32,
}

/// Play confirmation and development settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameplayConfig {
    /// How long a play may wait for the server before it is rolled back.
    /// `0` disables the timeout.
    #[serde(default = "default_pending_play_timeout_ms")]
    pub pending_play_timeout_ms: u64,
    /// Card requested by the development draw key.
    #[serde(default = "default_dev_card_name")]
    pub dev_card_name: String,
    #[serde(default = "default_dev_card_graphic")]
    pub dev_card_graphic: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_server_url() -> String {
    "ws://localhost:8080/ws".to_string()
}
fn default_reconnect_interval_ms() -> u64 {
    3000
}
fn default_width() -> u32 {
    1280
}
fn default_height() -> u32 {
    720
}
fn default_frame_rate() -> u32 {
    60
}
fn default_fraction() -> f32 {
    tactoe_core::domain::animation::DEFAULT_FRACTION
}
fn default_epsilon() -> f32 {
    tactoe_core::domain::animation::DEFAULT_EPSILON
}
fn default_pending_play_timeout_ms() -> u64 {
    10_000
}
fn default_dev_card_name() -> String {
    crate::application::game_session::DEFAULT_DEV_CARD_NAME.to_string()
}
fn default_dev_card_graphic() -> String {
    crate::application::game_session::DEFAULT_DEV_CARD_GRAPHIC.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            reconnect_interval_ms: default_reconnect_interval_ms(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            frame_rate: default_frame_rate(),
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            fraction: default_fraction(),
            epsilon: default_epsilon(),
        }
    }
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            pending_play_timeout_ms: default_pending_play_timeout_ms(),
            dev_card_name: default_dev_card_name(),
            dev_card_graphic: default_dev_card_graphic(),
        }
    }
}

impl AppConfig {
    /// Translates the file settings into what the game session needs.
    pub fn session_config(&self) -> SessionConfig {
        let timeout = self.gameplay.pending_play_timeout_ms;
        SessionConfig {
            viewport_width: self.display.width as f32,
            viewport_height: self.display.height as f32,
            animation: AnimationDriver::new(self.animation.fraction, self.animation.epsilon),
            pending_play_timeout: (timeout > 0).then(|| Duration::from_millis(timeout)),
            dev_card_name: self.gameplay.dev_card_name.clone(),
            dev_card_graphic: self.gameplay.dev_card_graphic.clone(),
        }
    }

    pub fn reconnect_interval(&self) -> Duration {
        Duration::from_millis(self.network.reconnect_interval_ms)
    }

    /// Time between frame ticks; a frame rate of `0` is treated as `1`.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.display.frame_rate.max(1)
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the default config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads `AppConfig`.
///
/// With an explicit `path` the file must exist.  Without one the platform
/// default path is used, and a missing file (or an undeterminable config
/// directory) yields `AppConfig::default()`.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors and
/// [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    if let Some(path) = path {
        return read_config_file(path);
    }

    let Ok(path) = config_file_path() else {
        return Ok(AppConfig::default());
    };
    match read_config_file(&path) {
        Err(ConfigError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
            Ok(AppConfig::default())
        }
        other => other,
    }
}

fn read_config_file(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

/// Persists `config` to `path`.
///
/// Creates the parent directory if it does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Resolves the platform config base directory including the `Tactoe`
/// subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        // %APPDATA% e.g. C:\Users\<user>\AppData\Roaming
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("Tactoe"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("tactoe"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("Tactoe")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
