//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`StorygateSettings::default()`]
//! 2. If the settings file exists, deep-merge its values over defaults
//! 3. Apply environment variable overrides (highest priority)
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::errors::Result;
use crate::types::StorygateSettings;

/// Settings file read when no path is given.
pub const DEFAULT_SETTINGS_FILE: &str = "storygate.json";

/// Load settings from [`DEFAULT_SETTINGS_FILE`] with env var overrides.
pub fn load_settings() -> Result<StorygateSettings> {
    load_settings_from_path(Path::new(DEFAULT_SETTINGS_FILE))
}

/// Load settings from a specific path with env var overrides.
///
/// If the file does not exist, returns defaults. If the file contains
/// invalid JSON, returns an error.
pub fn load_settings_from_path(path: &Path) -> Result<StorygateSettings> {
    let mut settings = load_file_layer(path)?;
    apply_env_overrides(&mut settings);
    settings.validate()?;
    Ok(settings)
}

fn load_file_layer(path: &Path) -> Result<StorygateSettings> {
    let defaults = serde_json::to_value(StorygateSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    Ok(serde_json::from_value(merged)?)
}

/// Recursive deep merge of two JSON values.
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply process environment overrides to loaded settings.
pub fn apply_env_overrides(settings: &mut StorygateSettings) {
    apply_overrides_from(settings, |name| std::env::var(name).ok());
}

/// Apply overrides read through `lookup`.
///
/// Invalid values are logged and ignored, falling back to file/default.
pub fn apply_overrides_from<F>(settings: &mut StorygateSettings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let read = |name: &str| lookup(name).filter(|v| !v.is_empty());

    // ── Server ──────────────────────────────────────────────────────
    if let Some(v) = read("STORYGATE_HOST") {
        settings.server.host = v;
    }
    if let Some(v) = read("STORYGATE_PORT") {
        match parse_u16_range(&v, 1, 65535) {
            Some(port) => settings.server.port = port,
            None => warn_invalid("STORYGATE_PORT", &v),
        }
    }
    if let Some(v) = lookup("STORYGATE_BASE_PATH") {
        settings.server.base_path = v;
    }

    // ── Database ────────────────────────────────────────────────────
    if let Some(v) = read("STORYGATE_DATABASE_PATH") {
        settings.database.path = v;
    }
    if let Some(v) = read("STORYGATE_DB_POOL_SIZE") {
        match parse_u32_range(&v, 1, 64) {
            Some(size) => settings.database.pool_size = size,
            None => warn_invalid("STORYGATE_DB_POOL_SIZE", &v),
        }
    }

    // ── Admin ───────────────────────────────────────────────────────
    if let Some(v) = read("ADMIN_PASSWORD") {
        settings.admin.password = v;
    }
    if let Some(v) = read("STORYGATE_ADMIN_PASSWORD") {
        settings.admin.password = v;
    }

    // ── Cookies ─────────────────────────────────────────────────────
    if let Some(v) = read("STORYGATE_SECURE_COOKIES") {
        match parse_bool(&v) {
            Some(secure) => settings.cookies.secure = secure,
            None => warn_invalid("STORYGATE_SECURE_COOKIES", &v),
        }
    }

    // ── Logging ─────────────────────────────────────────────────────
    if let Some(v) = read("STORYGATE_LOG_LEVEL") {
        settings.logging.level = v;
    }
    if let Some(v) = read("STORYGATE_LOG_JSON") {
        match parse_bool(&v) {
            Some(json) => settings.logging.json = json,
            None => warn_invalid("STORYGATE_LOG_JSON", &v),
        }
    }
}

fn warn_invalid(key: &str, value: &str) {
    tracing::warn!(key, value, "invalid env var, ignoring");
}

// ── Pure parsing functions ──────────────────────────────────────────────────

/// Parse a string as a boolean.
///
/// Accepts (case-insensitive): `true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`.
pub fn parse_bool(val: &str) -> Option<bool> {
    match val.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a string as a `u16` within a range.
pub fn parse_u16_range(val: &str, min: u16, max: u16) -> Option<u16> {
    let n: u16 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as a `u32` within a range.
pub fn parse_u32_range(val: &str, min: u32, max: u32) -> Option<u32> {
    let n: u32 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}
