//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use blogflow_infra::JwtConfig;
use blogflow_infra::database::DatabaseConfig;

use crate::telemetry::TelemetryConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    pub telemetry: TelemetryConfig,
    pub admin: Option<AdminSeed>,
}

/// Superuser created at startup when it does not exist yet.
#[derive(Clone)]
pub struct AdminSeed {
    pub email: String,
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for AdminSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSeed")
            .field("email", &self.email)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| {
            let defaults = DatabaseConfig::new(url);
            DatabaseConfig {
                max_connections: parse_var("DB_MAX_CONNECTIONS").unwrap_or(defaults.max_connections),
                min_connections: parse_var("DB_MIN_CONNECTIONS").unwrap_or(defaults.min_connections),
                connect_timeout: parse_var("DB_CONNECT_TIMEOUT_SECS")
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.connect_timeout),
                sqlx_logging: env::var("DB_LOG_STATEMENTS")
                    .map(|v| v != "false" && v != "0")
                    .unwrap_or(defaults.sqlx_logging),
                ..defaults
            }
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT").unwrap_or(8080),
            database,
            jwt: JwtConfig::from_env(),
            telemetry: TelemetryConfig::from_env(),
            admin: Self::parse_admin_seed(),
        }
    }

    /// Format: ADMIN_EMAIL, ADMIN_PASSWORD and optional ADMIN_USERNAME (default "admin").
    fn parse_admin_seed() -> Option<AdminSeed> {
        let email = env::var("ADMIN_EMAIL").ok()?;
        let password = env::var("ADMIN_PASSWORD").ok()?;

        Some(AdminSeed {
            email,
            username: env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string()),
            password,
        })
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}
