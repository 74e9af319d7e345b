//! Server configuration.
//!
//! Everything comes from the environment (optionally seeded from `.env`):
//! required values abort startup when missing, the rest carry defaults.
//!
//! | Variable | Required | Default |
//! |---|---|---|
//! | `PORT` | no | 3001 |
//! | `HOST` | no | 0.0.0.0 |
//! | `DATABASE_URL` | yes | — |
//! | `REDIS_HOST` | outside test mode | — |
//! | `REDIS_PORT` | outside test mode | — |
//! | `JWT_SECRET` | yes | — |
//! | `JWT_EXPIRATION` | no | `1h` |
//! | `APP_ENV` | no | `development` |
//! | `CACHE_TTL_SECS` | no | 120 |

use std::net::SocketAddr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} is not defined in environment variables")]
    Missing { name: &'static str },

    #[error("{name} is invalid: {message}")]
    Invalid { name: &'static str, message: String },
}

impl ConfigError {
    fn missing(name: &'static str) -> Self {
        Self::Missing { name }
    }

    fn invalid(name: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            name,
            message: message.into(),
        }
    }
}

/// Runtime mode, mirroring the classic development/production/test split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnv {
    Development,
    Production,
    Test,
}

impl RuntimeEnv {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Test => "test",
        }
    }

    pub fn is_test(&self) -> bool {
        matches!(self, Self::Test)
    }
}

impl std::str::FromStr for RuntimeEnv {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" => Ok(Self::Development),
            "production" => Ok(Self::Production),
            "test" => Ok(Self::Test),
            other => Err(format!(
                "must be one of development, production, test (got {other:?})"
            )),
        }
    }
}

impl std::fmt::Display for RuntimeEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_size: u32,
}

/// Redis connection settings; absent in test mode, where the cache runs
/// local-only.
#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl RedisConfig {
    /// Connection URL when both host and port are configured.
    pub fn url(&self) -> Option<String> {
        match (&self.host, self.port) {
            (Some(host), Some(port)) => Some(format!("redis://{host}:{port}")),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub jwt_expiration: Duration,
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub ttl: Duration,
}

/// Fully resolved application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: RuntimeEnv,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub auth: AuthSettings,
    pub cache: CacheConfig,
}

impl AppConfig {
    /// Loads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration from an arbitrary lookup function (injectable for
    /// tests, which must not mutate the process environment).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env: RuntimeEnv = match lookup("APP_ENV") {
            Some(raw) => raw
                .parse()
                .map_err(|e: String| ConfigError::invalid("APP_ENV", e))?,
            None => RuntimeEnv::Development,
        };

        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| ConfigError::invalid("PORT", e.to_string()))?,
            None => 3001,
        };
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConfigError::missing("DATABASE_URL"))?;
        let pool_size = match lookup("DATABASE_POOL_SIZE") {
            Some(raw) => raw
                .parse::<u32>()
                .map_err(|e| ConfigError::invalid("DATABASE_POOL_SIZE", e.to_string()))?,
            None => 10,
        };

        // Redis is mandatory outside test mode; in test mode the cache
        // backend degrades to local-only.
        let redis_host = lookup("REDIS_HOST").filter(|v| !v.is_empty());
        let redis_port = match lookup("REDIS_PORT") {
            Some(raw) => Some(
                raw.parse::<u16>()
                    .map_err(|e| ConfigError::invalid("REDIS_PORT", e.to_string()))?,
            ),
            None => None,
        };
        if !env.is_test() {
            if redis_host.is_none() {
                return Err(ConfigError::missing("REDIS_HOST"));
            }
            if redis_port.is_none() {
                return Err(ConfigError::missing("REDIS_PORT"));
            }
        }

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConfigError::missing("JWT_SECRET"))?;
        let jwt_expiration = match lookup("JWT_EXPIRATION") {
            Some(raw) => humantime::parse_duration(&raw)
                .map_err(|e| ConfigError::invalid("JWT_EXPIRATION", e.to_string()))?,
            None => Duration::from_secs(3600),
        };

        let cache_ttl = match lookup("CACHE_TTL_SECS") {
            Some(raw) => Duration::from_secs(
                raw.parse::<u64>()
                    .map_err(|e| ConfigError::invalid("CACHE_TTL_SECS", e.to_string()))?,
            ),
            None => Duration::from_secs(120),
        };

        let config = Self {
            env,
            server: ServerConfig { host, port },
            database: DatabaseConfig {
                url: database_url,
                pool_size,
            },
            redis: RedisConfig {
                host: redis_host,
                port: redis_port,
            },
            auth: AuthSettings {
                jwt_secret,
                jwt_expiration,
            },
            cache: CacheConfig { ttl: cache_ttl },
        };
        config.validate()?;
        Ok(config)
    }

    /// Cross-field validation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::invalid("PORT", "must be > 0"));
        }
        if self.database.pool_size == 0 {
            return Err(ConfigError::invalid("DATABASE_POOL_SIZE", "must be > 0"));
        }
        if self.auth.jwt_expiration.is_zero() {
            return Err(ConfigError::invalid("JWT_EXPIRATION", "must be > 0"));
        }
        if self.cache.ttl.is_zero() {
            return Err(ConfigError::invalid("CACHE_TTL_SECS", "must be > 0"));
        }
        Ok(())
    }

    /// Socket address to bind.
    pub fn addr(&self) -> SocketAddr {
        use std::net::{IpAddr, Ipv4Addr};
        let host: IpAddr = self
            .server
            .host
            .parse()
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));
        SocketAddr::from((host, self.server.port))
    }
}
