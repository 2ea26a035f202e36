use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use std::collections::HashMap;

use crate::actors::{HealthProbe, HealthStatus};
use crate::domain::promo::{
    evaluate, is_well_formed_code, DiscountEffect, PromoCodeValidator, PromoError, PromoValidation,
    Promotion,
};
use crate::utils::{
    retry_with_backoff, CircuitBreaker, CircuitBreakerConfig, CircuitBreakerError, CircuitState,
    RetryConfig,
};

// ============================================================================
// Redis Promo Validator
// ============================================================================
//
// Promotions live in hashes keyed `promo:{CODE}`:
//   kind      percent | amount
//   value     decimal
//   active    true | false   (default true)
//   starts_at RFC 3339       (optional)
//   ends_at   RFC 3339       (optional)
//
// Only the Redis round trip runs inside the circuit breaker: connection
// errors and hung calls trip it, a malformed record does not. While it is
// open every check is reported as unavailable without touching Redis.
//
// ============================================================================

pub struct RedisPromoValidator {
    connection: MultiplexedConnection,
    circuit_breaker: CircuitBreaker,
}

impl RedisPromoValidator {
    pub async fn connect(url: &str, breaker: CircuitBreakerConfig) -> anyhow::Result<Self> {
        let client = redis::Client::open(url)?;
        let connection = retry_with_backoff("redis connect", RetryConfig::default(), |_attempt| {
            client.get_multiplexed_async_connection()
        })
        .await?;

        tracing::info!("Connected to Redis promo backend");

        Ok(Self {
            connection,
            circuit_breaker: CircuitBreaker::new("promo_validator", breaker),
        })
    }

    async fn fetch_fields(&self, code: &str) -> Result<HashMap<String, String>, PromoError> {
        let mut connection = self.connection.clone();
        let key = format!("promo:{}", code);

        connection
            .hgetall(&key)
            .await
            .map_err(|e| PromoError::Unavailable(e.to_string()))
    }
}

/// Fetch a record through `breaker`, then parse and evaluate it outside it.
async fn check_code<F>(breaker: &CircuitBreaker, code: &str, fetch: F) -> Result<PromoValidation, PromoError>
where
    F: std::future::Future<Output = Result<HashMap<String, String>, PromoError>>,
{
    let fields = match breaker.call(fetch).await {
        Ok(fields) => fields,
        Err(CircuitBreakerError::CircuitOpen) => {
            tracing::warn!(code = %code, "Promo backend circuit open");
            return Err(PromoError::Unavailable("promo backend circuit open".to_string()));
        }
        Err(CircuitBreakerError::Timeout) => {
            tracing::error!(code = %code, "Promo lookup timed out");
            return Err(PromoError::Unavailable("promo backend timed out".to_string()));
        }
        Err(CircuitBreakerError::OperationFailed(e)) => {
            tracing::error!(code = %code, error = %e, "Promo lookup failed");
            return Err(e);
        }
    };

    let promotion = if fields.is_empty() {
        None
    } else {
        Some(parse_promotion(code, &fields).inspect_err(|e| {
            tracing::error!(code = %code, error = %e, "Malformed promo record");
        })?)
    };

    Ok(evaluate(promotion.as_ref(), Utc::now()))
}

fn parse_promotion(code: &str, fields: &HashMap<String, String>) -> Result<Promotion, PromoError> {
    let malformed = |reason: String| PromoError::MalformedRecord {
        code: code.to_string(),
        reason,
    };

    let field = |name: &str| fields.get(name).map(String::as_str);

    let effect = DiscountEffect::from_parts(
        field("kind").ok_or_else(|| malformed("missing 'kind'".to_string()))?,
        field("value").ok_or_else(|| malformed("missing 'value'".to_string()))?,
    )
    .map_err(|e| malformed(e.to_string()))?;

    let active = match field("active") {
        None => true,
        Some(raw) => raw
            .trim()
            .parse::<bool>()
            .map_err(|_| malformed(format!("invalid 'active' value '{}'", raw)))?,
    };

    let timestamp = |name: &str| -> Result<Option<DateTime<Utc>>, PromoError> {
        field(name)
            .map(|raw| {
                DateTime::parse_from_rfc3339(raw.trim())
                    .map(|ts| ts.with_timezone(&Utc))
                    .map_err(|e| malformed(format!("invalid '{}': {}", name, e)))
            })
            .transpose()
    };

    Ok(Promotion {
        code: code.to_string(),
        effect,
        active,
        starts_at: timestamp("starts_at")?,
        ends_at: timestamp("ends_at")?,
    })
}

#[async_trait]
impl PromoCodeValidator for RedisPromoValidator {
    async fn validate(&self, code: &str) -> Result<PromoValidation, PromoError> {
        let code = code.trim();
        if !is_well_formed_code(code) {
            return Ok(PromoValidation::rejected());
        }

        check_code(&self.circuit_breaker, code, self.fetch_fields(code)).await
    }
}

#[async_trait]
impl HealthProbe for RedisPromoValidator {
    fn component_name(&self) -> &str {
        "promo_validator"
    }

    async fn probe(&self) -> HealthStatus {
        match self.circuit_breaker.state().await {
            CircuitState::Closed => HealthStatus::Healthy,
            CircuitState::HalfOpen => HealthStatus::Degraded("circuit breaker half-open".to_string()),
            CircuitState::Open => HealthStatus::Unhealthy("circuit breaker open".to_string()),
        }
    }
}
