use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub static_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Full connection URL; takes precedence over the individual parts below
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
    /// Seconds to wait for a free pooled connection
    pub connection_timeout: u64,
    pub query_timeout_ms: u64,
    pub enable_slow_query_warning: bool,
    pub slow_query_threshold_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub auth_enabled: bool,
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    /// Empty means any origin is allowed
    pub cors_origins: Vec<String>,
}

impl DatabaseConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }

    pub fn slow_query_threshold(&self) -> Option<Duration> {
        self.enable_slow_query_warning
            .then(|| Duration::from_millis(self.slow_query_threshold_ms))
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source. `from_env` passes the
    /// process environment; tests pass a map.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_overrides(lookup)
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        // Server overrides
        if let Some(v) = lookup("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Some(v) = lookup("STATIC_DIR") {
            self.server.static_dir = PathBuf::from(v);
        }

        // Database overrides
        if let Some(v) = lookup("DATABASE_URL") {
            self.database.url = Some(v).filter(|url| !url.trim().is_empty());
        }
        if let Some(v) = lookup("DB_HOST") {
            self.database.host = v;
        }
        if let Some(v) = lookup("DB_PORT") {
            self.database.port = v.parse().unwrap_or(self.database.port);
        }
        if let Some(v) = lookup("DB_USER") {
            self.database.user = v;
        }
        if let Some(v) = lookup("DB_PASSWORD") {
            self.database.password = v;
        }
        if let Some(v) = lookup("DB_NAME") {
            self.database.name = v;
        }
        if let Some(v) = lookup("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Some(v) = lookup("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }
        if let Some(v) = lookup("DATABASE_QUERY_TIMEOUT_MS") {
            self.database.query_timeout_ms = v.parse().unwrap_or(self.database.query_timeout_ms);
        }
        if let Some(v) = lookup("DATABASE_ENABLE_SLOW_QUERY_WARNING") {
            self.database.enable_slow_query_warning = v.parse().unwrap_or(self.database.enable_slow_query_warning);
        }
        if let Some(v) = lookup("DATABASE_SLOW_QUERY_THRESHOLD_MS") {
            self.database.slow_query_threshold_ms = v.parse().unwrap_or(self.database.slow_query_threshold_ms);
        }

        // Security overrides
        if let Some(v) = lookup("AUTH_ENABLED") {
            self.security.auth_enabled = v.parse().unwrap_or(self.security.auth_enabled);
        }
        if let Some(v) = lookup("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Some(v) = lookup("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Some(v) = lookup("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig::default(),
            database: DatabaseConfig {
                connection_timeout: 30,
                query_timeout_ms: 30_000,
                enable_slow_query_warning: true,
                slow_query_threshold_ms: 100,
                ..DatabaseConfig::default()
            },
            security: SecurityConfig::default(),
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig::default(),
            database: DatabaseConfig {
                connection_timeout: 10,
                query_timeout_ms: 10_000,
                enable_slow_query_warning: true,
                slow_query_threshold_ms: 500,
                ..DatabaseConfig::default()
            },
            security: SecurityConfig {
                cors_origins: vec!["https://staging.example.com".to_string()],
                ..SecurityConfig::default()
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig::default(),
            database: DatabaseConfig {
                connection_timeout: 5,
                query_timeout_ms: 5_000,
                enable_slow_query_warning: true,
                slow_query_threshold_ms: 1000,
                ..DatabaseConfig::default()
            },
            security: SecurityConfig {
                cors_origins: vec!["https://app.example.com".to_string()],
                ..SecurityConfig::default()
            },
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            static_dir: PathBuf::from("client/public"),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: String::new(),
            name: "squares".to_string(),
            max_connections: 5,
            connection_timeout: 30,
            query_timeout_ms: 30_000,
            enable_slow_query_warning: false,
            slow_query_threshold_ms: 100,
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            auth_enabled: true,
            jwt_secret: String::new(),
            jwt_expiry_hours: 1,
            cors_origins: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.max_connections, 5);
        assert!(config.security.auth_enabled);
        assert_eq!(config.security.jwt_expiry_hours, 1);
        assert!(config.security.cors_origins.is_empty());
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::from_lookup(lookup_from(&[("APP_ENV", "prod")]));
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.database.query_timeout(), Duration::from_secs(5));
        assert_eq!(config.security.cors_origins, vec!["https://app.example.com"]);
    }

    #[test]
    fn test_env_overrides_connection_parts() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DB_HOST", "db.internal"),
            ("DB_PORT", "6543"),
            ("DB_USER", "squares"),
            ("DB_PASSWORD", "hunter2"),
            ("DB_NAME", "squares_test"),
            ("DATABASE_MAX_CONNECTIONS", "not-a-number"),
            ("AUTH_ENABLED", "false"),
            ("JWT_SECRET", "s3cret"),
            ("SECURITY_CORS_ORIGINS", "http://a.test, ,http://b.test"),
        ]));
        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.port, 6543);
        assert_eq!(config.database.user, "squares");
        assert_eq!(config.database.password, "hunter2");
        assert_eq!(config.database.name, "squares_test");
        // Unparseable values keep the preset
        assert_eq!(config.database.max_connections, 5);
        assert!(!config.security.auth_enabled);
        assert_eq!(config.security.jwt_secret, "s3cret");
        assert_eq!(config.security.cors_origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn test_blank_database_url_is_ignored() {
        let config = AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "  ")]));
        assert!(config.database.url.is_none());
    }

    #[test]
    fn test_slow_query_threshold_disabled() {
        let config = AppConfig::from_lookup(lookup_from(&[(
            "DATABASE_ENABLE_SLOW_QUERY_WARNING",
            "false",
        )]));
        assert!(config.database.slow_query_threshold().is_none());
    }
}
