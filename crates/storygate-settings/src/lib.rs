//! # storygate-settings
//!
//! Configuration management with layered sources.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`StorygateSettings::default()`]
//! 2. **Settings file**: `./storygate.json` or a path given on the command
//!    line (deep-merged over defaults)
//! 3. **Environment variables**: `STORYGATE_*` and `ADMIN_PASSWORD`
//!    overrides (highest priority)

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{DEFAULT_SETTINGS_FILE, deep_merge, load_settings, load_settings_from_path};
pub use types::*;
