//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

use blogicum_infra::JwtConfig;
#[cfg(feature = "postgres")]
use blogicum_infra::database::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` when `DATABASE_URL` is unset.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub page_size: u64,
    pub session: JwtConfig,
    pub secure_cookies: bool,
    pub production: bool,
}

fn parsed<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn flag(key: &str) -> bool {
    env::var(key)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = JwtConfig::default();
        let session = JwtConfig {
            secret: env::var("SESSION_SECRET").unwrap_or(defaults.secret),
            expiration_hours: parsed("SESSION_TTL_HOURS", defaults.expiration_hours),
            issuer: env::var("SESSION_ISSUER").unwrap_or(defaults.issuer),
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parsed("PORT", 8080),
            database_url: env::var("DATABASE_URL").ok().filter(|u| !u.trim().is_empty()),
            db_max_connections: parsed("DB_MAX_CONNECTIONS", 20),
            db_min_connections: parsed("DB_MIN_CONNECTIONS", 2),
            page_size: parsed("PAGE_SIZE", 10u64).max(1),
            session,
            secure_cookies: flag("SECURE_COOKIES"),
            production: env::var("RUST_ENV")
                .map(|v| v.eq_ignore_ascii_case("production"))
                .unwrap_or(false),
        }
    }

    #[cfg(feature = "postgres")]
    pub fn database(&self) -> Option<DatabaseConfig> {
        self.database_url.clone().map(|url| DatabaseConfig {
            url,
            max_connections: self.db_max_connections,
            min_connections: self.db_min_connections,
        })
    }

    /// Complain about the built-in session secret, loudly in production.
    pub fn warn_on_default_secret(&self) {
        if !self.session.uses_default_secret() {
            return;
        }
        if self.production {
            tracing::error!("SESSION_SECRET is not set; sessions are signed with the public default");
        } else {
            tracing::warn!("SESSION_SECRET is not set; using the development default");
        }
    }
}
