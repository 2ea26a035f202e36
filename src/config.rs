use std::time::Duration;

use crate::domain::promo::{DiscountEffect, Promotion};
use crate::utils::CircuitBreakerConfig;

// ============================================================================
// Application Configuration
// ============================================================================
//
// Read once at startup from the environment (and an optional .env file),
// then passed into components explicitly.
//
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable '{0}'")]
    Missing(&'static str),

    #[error("Invalid value for '{name}': {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum StorageBackend {
    Memory { seed: bool },
    Postgres { database_url: String },
}

#[derive(Debug, Clone)]
pub enum PromoBackend {
    Memory { promotions: Vec<Promotion> },
    Redis { url: String, breaker: CircuitBreakerConfig },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_host: String,
    pub server_port: u16,
    pub api_key: String,
    pub storage: StorageBackend,
    pub promo: PromoBackend,
    pub call_timeout: Duration,
    pub health_interval: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any key lookup; `from_env` is the production caller.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let server_host = get("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let server_port = parse_or("SERVER_PORT", get("SERVER_PORT"), 8080u16)?;
        let api_key = get("API_KEY").unwrap_or_else(|| "dev-api-key".to_string());

        let storage = match get("STORAGE_BACKEND").as_deref().unwrap_or("memory") {
            "memory" => StorageBackend::Memory {
                seed: parse_or("SEED_CATALOG", get("SEED_CATALOG"), true)?,
            },
            "postgres" => StorageBackend::Postgres {
                database_url: get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            },
            other => {
                return Err(ConfigError::Invalid {
                    name: "STORAGE_BACKEND",
                    reason: format!("expected 'memory' or 'postgres', got '{}'", other),
                })
            }
        };

        let promo = match get("PROMO_BACKEND").as_deref().unwrap_or("memory") {
            "memory" => PromoBackend::Memory {
                promotions: parse_promotions(get("PROMO_CODES").as_deref().unwrap_or(""))?,
            },
            "redis" => PromoBackend::Redis {
                url: get("REDIS_URL").ok_or(ConfigError::Missing("REDIS_URL"))?,
                breaker: CircuitBreakerConfig {
                    failure_threshold: parse_or("PROMO_BREAKER_FAILURES", get("PROMO_BREAKER_FAILURES"), 5u32)?,
                    cooldown: Duration::from_secs(parse_or(
                        "PROMO_BREAKER_COOLDOWN_SECS",
                        get("PROMO_BREAKER_COOLDOWN_SECS"),
                        30u64,
                    )?),
                    call_timeout: Duration::from_millis(parse_or(
                        "PROMO_CALL_TIMEOUT_MS",
                        get("PROMO_CALL_TIMEOUT_MS"),
                        1000u64,
                    )?),
                    ..CircuitBreakerConfig::default()
                },
            },
            other => {
                return Err(ConfigError::Invalid {
                    name: "PROMO_BACKEND",
                    reason: format!("expected 'memory' or 'redis', got '{}'", other),
                })
            }
        };

        let call_timeout = Duration::from_millis(parse_or("CALL_TIMEOUT_MS", get("CALL_TIMEOUT_MS"), 2000u64)?);
        if call_timeout.is_zero() {
            return Err(ConfigError::Invalid {
                name: "CALL_TIMEOUT_MS",
                reason: "must be greater than zero".to_string(),
            });
        }
        let health_interval =
            Duration::from_secs(parse_or("HEALTH_INTERVAL_SECS", get("HEALTH_INTERVAL_SECS"), 10u64)?.max(1));

        tracing::info!("Application configuration loaded");

        Ok(Self {
            server_host,
            server_port,
            api_key,
            storage,
            promo,
            call_timeout,
            health_interval,
        })
    }
}

fn parse_or<T>(name: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: format!("'{}': {}", raw, e),
        }),
    }
}

/// Parses `CODE=percent:10,OTHER=amount:5.00` into always-on promotions.
fn parse_promotions(raw: &str) -> Result<Vec<Promotion>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let invalid = |reason: String| ConfigError::Invalid {
                name: "PROMO_CODES",
                reason,
            };
            let (code, effect) = entry
                .split_once('=')
                .ok_or_else(|| invalid(format!("expected CODE=kind:value, got '{}'", entry)))?;
            let effect: DiscountEffect = effect
                .trim()
                .parse()
                .map_err(|e| invalid(format!("{}: {}", code.trim(), e)))?;
            Ok(Promotion::active(code.trim(), effect))
        })
        .collect()
}
