//! Configuration management for Foundry modes
//!
//! This module contains the configuration system components:
//! - `loader`: main config and mode file discovery and parsing
//! - `store`: the immutable, dot-path addressable view handed to the pipeline
//! - `flags`: `--custom` overrides applied while the store is built
//! - `toggles`: per-system `*_enabled` switches

pub mod flags;
pub mod loader;
pub mod store;
pub mod toggles;


pub use flags::{apply_cli_flags, parse_provided_flags};
pub use loader::{
    find_mode, list_modes, load_mode, read_yaml, ConfigLocation, LoadedMode, MainConfig,
    ModeSelection, ResolvedSelection,
};
pub use store::{is_truthy, scalar_to_string, ConfigStore};
pub use toggles::{assert_enabled, System};

use crate::error::Result;

/// Builds the store for a loaded mode, applying `--custom` overrides when the
/// cli flags system is enabled.
pub fn build_store<S: AsRef<str>>(mode: &LoadedMode, custom: &[S]) -> Result<ConfigStore> {
    let store = ConfigStore::new(mode.value.clone(), mode.dir());
    if !assert_enabled(&store, System::CliFlags) {
        return Ok(store);
    }
    apply_cli_flags(store, &parse_provided_flags(custom))
}
