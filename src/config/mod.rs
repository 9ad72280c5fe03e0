// src/config/mod.rs

//! Configuration loading and validation for taskcenter.
//!
//! Responsibilities:
//! - Define the TOML/JSON-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Turn the raw `[config]` section into typed [`Settings`] (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_from_path, load_or_default};
pub use model::{ConfigSection, RawCommand, RawConfigFile, RawTask};
pub use validate::{parse_duration, Settings};
