use crate::error::ConfigError;
use std::env;

pub const DEFAULT_SERVER_PORT: u16 = 4000;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 4;
/// Token lifetimes from one hour up to one year.
pub const TOKEN_TTL_HOURS_RANGE: std::ops::RangeInclusive<i64> = 1..=24 * 365;

/// Settings read once at startup and passed down to the pool, the token
/// issuer and the server.
#[derive(Debug, Clone)]
pub struct Config {
    database_url: String,
    jwt_secret: String,
    server_port: u16,
    db_max_connections: u32,
    token_ttl_hours: i64,
}

impl Config {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Config::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let token_ttl_hours = parse_or(&lookup, "TOKEN_TTL_HOURS", DEFAULT_TOKEN_TTL_HOURS)?;
        if !TOKEN_TTL_HOURS_RANGE.contains(&token_ttl_hours) {
            return Err(ConfigError::Invalid(
                "TOKEN_TTL_HOURS",
                token_ttl_hours.to_string(),
            ));
        }

        Ok(Config {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            server_port: parse_or(&lookup, "SERVER_PORT", DEFAULT_SERVER_PORT)?,
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)?,
            token_ttl_hours,
        })
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
    }

    pub fn token_ttl_hours(&self) -> i64 {
        self.token_ttl_hours
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&'static str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(key, raw)),
    }
}
