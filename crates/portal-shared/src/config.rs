//! Configuration management

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::constants::{DEFAULT_BCRYPT_COST, SESSION_COOKIE_NAME, SESSION_TTL_SECONDS};
use crate::error::AppError;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    pub session: SessionSettings,
    pub redis: RedisSettings,
    pub security: SecuritySettings,
    pub log: LogSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub env: String,
    pub host: String,
    pub port: u16,
    pub name: String,
    pub public_dir: String,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserStoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub backend: UserStoreBackend,
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub run_migrations: bool,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionBackend {
    Redis,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionSettings {
    pub backend: SessionBackend,
    pub ttl_seconds: u64,
    pub cookie_name: String,
    pub cookie_secure: bool,
    /// Sweep interval for the in-memory store; ignored by redis.
    pub cleanup_interval_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RedisSettings {
    pub url: String,
    pub max_connections: usize,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PasswordScheme {
    Bcrypt,
    Argon2,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SecuritySettings {
    pub password_scheme: PasswordScheme,
    pub bcrypt_cost: u32,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogSettings {
    pub filter: String,
    pub format: LogFormat,
    /// Directory for daily-rotated log files. Empty disables the file sink.
    pub dir: String,
}

impl AppConfig {
    pub fn load() -> Result<Self, AppError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let config = Self::builder()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::default().separator("__").try_parsing(true))
            .build()?;
        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Builder preloaded with every default, so an empty environment still
    /// yields a runnable in-memory setup.
    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("app.env", "development")?
            .set_default("app.host", "127.0.0.1")?
            .set_default("app.port", 3000)?
            .set_default("app.name", "portal-server")?
            .set_default("app.public_dir", "public")?
            .set_default("database.backend", "memory")?
            .set_default("database.url", "")?
            .set_default("database.max_connections", 5)?
            .set_default("database.min_connections", 1)?
            .set_default("database.run_migrations", true)?
            .set_default("session.backend", "memory")?
            .set_default("session.ttl_seconds", SESSION_TTL_SECONDS as i64)?
            .set_default("session.cookie_name", SESSION_COOKIE_NAME)?
            .set_default("session.cookie_secure", false)?
            .set_default("session.cleanup_interval_seconds", 300)?
            .set_default("redis.url", "redis://127.0.0.1:6379")?
            .set_default("redis.max_connections", 16)?
            .set_default("security.password_scheme", "bcrypt")?
            .set_default("security.bcrypt_cost", i64::from(DEFAULT_BCRYPT_COST))?
            .set_default("log.filter", "info,portal=debug")?
            .set_default("log.format", "json")?
            .set_default("log.dir", "")
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.database.backend == UserStoreBackend::Postgres && self.database.url.is_empty() {
            return Err(AppError::InvalidConfig(
                "database.url is required when database.backend = postgres".into(),
            ));
        }
        if self.session.ttl_seconds == 0 {
            return Err(AppError::InvalidConfig("session.ttl_seconds must be positive".into()));
        }
        if !(4..=31).contains(&self.security.bcrypt_cost) {
            return Err(AppError::InvalidConfig(format!(
                "security.bcrypt_cost must be within 4..=31, got {}",
                self.security.bcrypt_cost
            )));
        }
        if self.session.cookie_name.is_empty() {
            return Err(AppError::InvalidConfig("session.cookie_name must not be empty".into()));
        }
        Ok(())
    }
}
