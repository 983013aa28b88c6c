//! Runtime configuration, read from `BLOGQA_*` environment variables.

use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::Duration;
use rand::RngCore;
use thiserror::Error;
use tracing::{info, warn};

/// One year.
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365;

/// 32 random bytes, base64url. Used when no secret is configured; tokens
/// signed with it stop verifying once the process exits.
fn random_secret() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: String, reason: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("expected pretty or json, got {}", other)),
        }
    }
}

/// Account created on startup when no user with this email exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapAdmin {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub token_secret: String,
    pub token_ttl_hours: i64,
    /// JSON snapshot loaded at startup and written on shutdown.
    pub data_file: Option<PathBuf>,
    pub bootstrap_admin: Option<BootstrapAdmin>,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
            token_secret: random_secret(),
            token_ttl_hours: 24,
            data_file: None,
            bootstrap_admin: None,
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Config::default();

        let token_secret = match lookup("BLOGQA_TOKEN_SECRET") {
            Some(secret) if secret.trim().is_empty() => {
                return Err(ConfigError::Invalid {
                    key: "BLOGQA_TOKEN_SECRET".into(),
                    reason: "must not be empty".into(),
                });
            }
            Some(secret) => secret,
            None => {
                warn!("BLOGQA_TOKEN_SECRET not set, using a random secret; issued tokens will not survive a restart");
                defaults.token_secret.clone()
            }
        };

        let token_ttl_hours: i64 = try_load(&lookup, "BLOGQA_TOKEN_TTL_HOURS", defaults.token_ttl_hours)?;
        if !(1..=MAX_TOKEN_TTL_HOURS).contains(&token_ttl_hours) {
            return Err(ConfigError::Invalid {
                key: "BLOGQA_TOKEN_TTL_HOURS".into(),
                reason: format!("must be between 1 and {MAX_TOKEN_TTL_HOURS}"),
            });
        }

        let bootstrap_admin = match (lookup("BLOGQA_ADMIN_EMAIL"), lookup("BLOGQA_ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(BootstrapAdmin {
                name: lookup("BLOGQA_ADMIN_NAME").unwrap_or_else(|| "Administrator".into()),
                email,
                password,
            }),
            (Some(_), None) | (None, Some(_)) => {
                warn!("BLOGQA_ADMIN_EMAIL and BLOGQA_ADMIN_PASSWORD must both be set; skipping bootstrap admin");
                None
            }
            (None, None) => None,
        };

        Ok(Self {
            host: lookup("BLOGQA_HOST").unwrap_or(defaults.host),
            port: try_load(&lookup, "BLOGQA_PORT", defaults.port)?,
            token_secret,
            token_ttl_hours,
            data_file: lookup("BLOGQA_DATA_FILE").filter(|p| !p.is_empty()).map(PathBuf::from),
            bootstrap_admin,
            log_format: try_load(&lookup, "BLOGQA_LOG_FORMAT", defaults.log_format)?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Token lifetime, clamped to `1..=MAX_TOKEN_TTL_HOURS` for configs
    /// built by hand rather than loaded.
    pub fn token_ttl(&self) -> Duration {
        Duration::hours(self.token_ttl_hours.clamp(1, MAX_TOKEN_TTL_HOURS))
    }
}

fn try_load<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key: key.to_string(),
            reason: e.to_string(),
        }),
        None => {
            info!("{key} not set, using default");
            Ok(default)
        }
    }
}
