// src/config/mod.rs

//! Configuration loading and validation for watchbuild.
//!
//! Responsibilities:
//! - Define the TOML-backed data model and validated settings (`model.rs`).
//! - Load a config file from disk and layer CLI flags over it (`loader.rs`).
//! - Validate roots, pattern and commands (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_from_path, load_settings};
pub use model::{CommandsSection, RawConfig, RelaySection, Settings, WatchSection};
