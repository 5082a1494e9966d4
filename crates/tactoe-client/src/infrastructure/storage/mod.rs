//! Storage infrastructure: configuration file persistence.
//!
//! The `config` sub-module reads the TOML configuration file from an explicit
//! path or from the platform-appropriate directory, falls back to defaults on
//! first run, and can write the effective configuration back to disk.

pub mod config;
