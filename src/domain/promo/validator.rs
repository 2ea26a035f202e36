use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

use super::errors::PromoError;
use super::value_objects::{PromoValidation, Promotion};

// ============================================================================
// Promo Code Validator
// ============================================================================
//
// A pure function from code to (valid, effect). It never sees order contents
// and repeated calls with no administrative change return the same answer.
//
// ============================================================================

pub const MAX_CODE_LEN: usize = 32;

#[async_trait]
pub trait PromoCodeValidator: Send + Sync {
    async fn validate(&self, code: &str) -> Result<PromoValidation, PromoError>;
}

/// Syntax check applied before any backend is consulted.
pub fn is_well_formed_code(code: &str) -> bool {
    !code.is_empty()
        && code.len() <= MAX_CODE_LEN
        && code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Decide validity for a looked-up promotion (or its absence) at `now`.
pub fn evaluate(promotion: Option<&Promotion>, now: DateTime<Utc>) -> PromoValidation {
    match promotion {
        Some(promo) if promo.is_redeemable_at(now) => PromoValidation::accepted(promo.effect.clone()),
        _ => PromoValidation::rejected(),
    }
}

/// Promotions fixed at construction, typically from configuration.
pub struct InMemoryPromoValidator {
    promotions: HashMap<String, Promotion>,
}

impl InMemoryPromoValidator {
    pub fn new(promotions: impl IntoIterator<Item = Promotion>) -> Self {
        let promotions = promotions
            .into_iter()
            .map(|promo| (promo.code.clone(), promo))
            .collect();
        Self { promotions }
    }

    pub fn len(&self) -> usize {
        self.promotions.len()
    }
}

#[async_trait]
impl PromoCodeValidator for InMemoryPromoValidator {
    async fn validate(&self, code: &str) -> Result<PromoValidation, PromoError> {
        let code = code.trim();
        if !is_well_formed_code(code) {
            tracing::debug!(code = %code, "Rejecting malformed promo code");
            return Ok(PromoValidation::rejected());
        }

        Ok(evaluate(self.promotions.get(code), Utc::now()))
    }
}
