//! Configuration management for the shop server.
//!
//! This module provides a centralized configuration structure populated
//! from environment variables (a `.env` file is honored) with sensible
//! defaults for local development.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Main configuration structure for the shop server.
///
/// This struct contains all configurable aspects of the server,
/// organized by concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// HTTP listener configuration.
    pub http: HttpConfig,

    /// Document store configuration.
    pub store: StoreConfig,

    /// Credential signing configuration.
    pub auth: AuthConfig,

    /// Payment gateway configuration.
    pub gateway: GatewayConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported on the liveness endpoint.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Host address to bind to.
    pub host: String,

    /// Port number to listen on.
    pub port: u16,

    /// Enable permissive CORS for browser clients.
    pub enable_cors: bool,
}

/// Document store configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Database name.
    pub database: String,

    /// Store user, for backends that authenticate.
    pub user: Option<String>,

    /// Store password, for backends that authenticate.
    pub password: Option<String>,
}

/// Credential signing configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret used to sign and verify bearer credentials.
    pub access_token_secret: String,

    /// Credential lifetime in seconds.
    pub token_ttl_secs: i64,
}

/// Payment gateway configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Secret key presented to the gateway.
    pub secret_key: String,

    /// Base URL of the gateway API.
    pub base_url: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Custom Debug implementations to redact secrets from logs.
impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("access_token_secret", &"[REDACTED]")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .finish()
    }
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("secret_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "parts-shop-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            http: HttpConfig {
                host: "127.0.0.1".to_string(),
                port: 5000,
                enable_cors: true,
            },
            store: StoreConfig {
                database: "parts-shop".to_string(),
                user: None,
                password: None,
            },
            auth: AuthConfig {
                access_token_secret: "dev-access-token-secret".to_string(),
                token_ttl_secs: 3600,
            },
            gateway: GatewayConfig {
                secret_key: String::new(),
                base_url: "https://api.stripe.com".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables are prefixed with `SHOP_`, for example
    /// `SHOP_HTTP_PORT` or `SHOP_ACCESS_TOKEN_SECRET`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(level) = std::env::var("SHOP_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(host) = std::env::var("SHOP_HTTP_HOST") {
            config.http.host = host;
        }
        if let Ok(port) = std::env::var("SHOP_HTTP_PORT") {
            config.http.port = port.parse().unwrap_or(config.http.port);
        }
        if let Ok(cors) = std::env::var("SHOP_HTTP_CORS") {
            config.http.enable_cors = cors.to_lowercase() != "false" && cors != "0";
        }

        if let Ok(database) = std::env::var("SHOP_DB_NAME") {
            config.store.database = database;
        }
        config.store.user = std::env::var("SHOP_DB_USER").ok();
        config.store.password = std::env::var("SHOP_DB_PASS").ok();

        if let Ok(secret) = std::env::var("SHOP_ACCESS_TOKEN_SECRET") {
            config.auth.access_token_secret = secret;
        } else {
            warn!(
                "SHOP_ACCESS_TOKEN_SECRET not set - using the development \
                 signing secret. Credentials issued with it are worthless \
                 outside local testing."
            );
        }

        if let Ok(key) = std::env::var("SHOP_GATEWAY_SECRET_KEY") {
            config.gateway.secret_key = key;
        } else {
            warn!(
                "SHOP_GATEWAY_SECRET_KEY not set - payment intent creation \
                 will be rejected by the gateway"
            );
        }
        if let Ok(url) = std::env::var("SHOP_GATEWAY_URL") {
            config.gateway.base_url = url;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_secret_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("SHOP_ACCESS_TOKEN_SECRET", "env-secret");
        }
        let config = Config::from_env();
        assert_eq!(config.auth.access_token_secret, "env-secret");
        unsafe {
            std::env::remove_var("SHOP_ACCESS_TOKEN_SECRET");
        }
    }

    #[test]
    fn test_port_default_and_override() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::remove_var("SHOP_HTTP_PORT");
        }
        assert_eq!(Config::from_env().http.port, 5000);

        unsafe {
            std::env::set_var("SHOP_HTTP_PORT", "8081");
        }
        assert_eq!(Config::from_env().http.port, 8081);
        unsafe {
            std::env::remove_var("SHOP_HTTP_PORT");
        }
    }

    #[test]
    fn test_cors_disabled_by_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("SHOP_HTTP_CORS", "false");
        }
        assert!(!Config::from_env().http.enable_cors);
        unsafe {
            std::env::remove_var("SHOP_HTTP_CORS");
        }
    }

    #[test]
    fn test_secrets_redacted_in_debug() {
        let config = Config {
            auth: AuthConfig {
                access_token_secret: "super_secret".to_string(),
                token_ttl_secs: 3600,
            },
            gateway: GatewayConfig {
                secret_key: "sk_live_secret".to_string(),
                base_url: "https://api.stripe.com".to_string(),
            },
            store: StoreConfig {
                database: "parts-shop".to_string(),
                user: Some("shop".to_string()),
                password: Some("hunter2".to_string()),
            },
            ..Config::default()
        };
        let debug_str = format!("{config:?}");
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("super_secret"));
        assert!(!debug_str.contains("sk_live_secret"));
        assert!(!debug_str.contains("hunter2"));
    }
}
