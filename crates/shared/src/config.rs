//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtSettings,
    /// Signup and role policy.
    #[serde(default)]
    pub auth: AuthSettings,
    /// Report export settings.
    #[serde(default)]
    pub export: ExportSettings,
    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT settings as they appear in configuration files.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
    /// Refresh token expiration in seconds.
    #[serde(default = "default_refresh_token_expiry")]
    pub refresh_token_expiry_secs: u64,
}

fn default_access_token_expiry() -> u64 {
    86_400 // 24 hours
}

fn default_refresh_token_expiry() -> u64 {
    604_800 // 7 days
}

/// Signup policy.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthSettings {
    /// Whether a signup request may ask for the ADMIN role.
    #[serde(default)]
    pub allow_admin_signup: bool,
}

/// Export settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportSettings {
    /// Currency code used when a user has no stored preference.
    #[serde(default = "default_currency")]
    pub default_currency: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            default_currency: default_currency(),
        }
    }
}

fn default_currency() -> String {
    "INR".to_string()
}

/// Logging settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingSettings {
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FINTRACK").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("FINTRACK__DATABASE__URL", Some("sqlite::memory:")),
                ("FINTRACK__JWT__SECRET", Some("test-secret")),
                ("FINTRACK__SERVER__PORT", Some("9090")),
                ("RUN_MODE", Some("test-nonexistent")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.database.url, "sqlite::memory:");
                assert_eq!(config.jwt.secret, "test-secret");
                assert_eq!(config.server.port, 9090);
                assert_eq!(config.server.host, "0.0.0.0");
                assert_eq!(config.database.max_connections, 10);
                assert_eq!(config.jwt.access_token_expiry_secs, 86_400);
                assert!(!config.auth.allow_admin_signup);
                assert_eq!(config.export.default_currency, "INR");
                assert!(!config.logging.json);
            },
        );
    }

    #[test]
    fn test_missing_secret_fails() {
        temp_env::with_vars(
            [
                ("FINTRACK__DATABASE__URL", Some("sqlite::memory:")),
                ("FINTRACK__JWT__SECRET", None),
                ("RUN_MODE", Some("test-nonexistent")),
            ],
            || {
                assert!(AppConfig::load().is_err());
            },
        );
    }
}
