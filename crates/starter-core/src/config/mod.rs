//! Project configuration files
//!
//! Tracks the choices a project was generated with so it can be compiled
//! again later (for `explain` and similar tooling).

pub mod persisted;

pub use persisted::{read_config, write_config, PersistedConfig, CONFIG_FILE, CONFIG_VERSION};
