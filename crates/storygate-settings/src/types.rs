//! Settings type definitions.
//!
//! Field names are camelCase in JSON. Every section carries
//! `#[serde(default)]` so a settings file only needs the values it changes.

use serde::{Deserialize, Serialize};

/// Root settings type.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorygateSettings {
    /// HTTP listener.
    pub server: ServerSettings,
    /// SQLite database.
    pub database: DatabaseSettings,
    /// Admin console credential.
    pub admin: AdminSettings,
    /// Cookie attributes.
    pub cookies: CookieSettings,
    /// Log output.
    pub logging: LoggingSettings,
}

impl StorygateSettings {
    /// Check values the type system cannot.
    pub fn validate(&self) -> crate::Result<()> {
        if self.database.pool_size == 0 {
            return Err(crate::SettingsError::InvalidValue(
                "database.poolSize must be at least 1".to_string(),
            ));
        }
        if self.admin.password.is_empty() {
            return Err(crate::SettingsError::InvalidValue(
                "admin.password must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// HTTP listener settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerSettings {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Prefix for every `/api` route, e.g. `"/story"`. Empty means root.
    pub base_path: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            base_path: String::new(),
        }
    }
}

impl ServerSettings {
    /// `base_path` with a leading `/` and no trailing `/`; root is `""`.
    pub fn normalized_base_path(&self) -> String {
        let trimmed = self.base_path.trim().trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{trimmed}")
        }
    }
}

/// SQLite settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DatabaseSettings {
    /// Database file path.
    pub path: String,
    /// Maximum pooled connections.
    pub pool_size: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: "storygate.db".to_string(),
            pool_size: 8,
        }
    }
}

/// Admin console settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdminSettings {
    /// Shared secret. Also the value of the admin cookie.
    pub password: String,
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            password: "changeme".to_string(),
        }
    }
}

/// Cookie attributes.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CookieSettings {
    /// Add the `Secure` attribute (enable behind HTTPS).
    pub secure: bool,
    /// Lifetime of the visitor identity cookie.
    pub visitor_max_age_secs: i64,
    /// Lifetime of the admin cookie.
    pub admin_max_age_secs: i64,
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self {
            secure: false,
            visitor_max_age_secs: 60 * 60 * 24 * 365,
            admin_max_age_secs: 60 * 60 * 24,
        }
    }
}

/// Log output settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Default filter when `RUST_LOG` is unset.
    pub level: String,
    /// Emit JSON lines instead of human-readable text.
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_path_normalization() {
        let mut server = ServerSettings::default();
        assert_eq!(server.normalized_base_path(), "");
        server.base_path = "/".to_string();
        assert_eq!(server.normalized_base_path(), "");
        server.base_path = "story".to_string();
        assert_eq!(server.normalized_base_path(), "/story");
        server.base_path = "/story/".to_string();
        assert_eq!(server.normalized_base_path(), "/story");
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let settings: StorygateSettings =
            serde_json::from_str(r#"{"server": {"port": 8080}}"#).unwrap();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.database.pool_size, 8);
    }

    #[test]
    fn json_uses_camel_case() {
        let json = serde_json::to_value(StorygateSettings::default()).unwrap();
        assert!(json["server"]["basePath"].is_string());
        assert!(json["database"]["poolSize"].is_number());
        assert!(json["cookies"]["adminMaxAgeSecs"].is_number());
    }

    #[test]
    fn validate_rejects_zero_pool() {
        let mut settings = StorygateSettings::default();
        settings.database.pool_size = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_password() {
        let mut settings = StorygateSettings::default();
        settings.admin.password.clear();
        assert!(settings.validate().is_err());
        assert!(StorygateSettings::default().validate().is_ok());
    }
}
