use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::errors::DiscountParseError;

// ============================================================================
// Promo Value Objects
// ============================================================================

/// What a redeemable code does to an order's subtotal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DiscountEffect {
    /// Percentage off the subtotal, 0 < p <= 100.
    PercentOff(Decimal),
    /// Fixed amount off the subtotal, a > 0.
    AmountOff(Decimal),
}

impl DiscountEffect {
    pub fn percent(value: Decimal) -> Result<Self, DiscountParseError> {
        let effect = Self::PercentOff(value);
        effect.check_range()?;
        Ok(effect)
    }

    pub fn amount(value: Decimal) -> Result<Self, DiscountParseError> {
        let effect = Self::AmountOff(value);
        effect.check_range()?;
        Ok(effect)
    }

    /// Variants are public and deserializable, so a value built without the
    /// constructors can still be out of range.
    pub fn check_range(&self) -> Result<(), DiscountParseError> {
        match *self {
            Self::PercentOff(p) if p <= Decimal::ZERO || p > Decimal::ONE_HUNDRED => {
                Err(DiscountParseError::OutOfRange(format!("percent {}", p)))
            }
            Self::AmountOff(a) if a <= Decimal::ZERO => {
                Err(DiscountParseError::OutOfRange(format!("amount {}", a)))
            }
            _ => Ok(()),
        }
    }

    /// Build an effect from its stored `kind` and `value` fields.
    pub fn from_parts(kind: &str, value: &str) -> Result<Self, DiscountParseError> {
        let value = Decimal::from_str(value.trim())
            .map_err(|_| DiscountParseError::InvalidValue(value.to_string()))?;

        match kind.trim().to_ascii_lowercase().as_str() {
            "percent" => Self::percent(value),
            "amount" => Self::amount(value),
            other => Err(DiscountParseError::UnknownKind(other.to_string())),
        }
    }
}

/// Parses `percent:10` or `amount:5.00`.
impl FromStr for DiscountEffect {
    type Err = DiscountParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, value) = s
            .split_once(':')
            .ok_or_else(|| DiscountParseError::MissingSeparator(s.to_string()))?;
        Self::from_parts(kind, value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Promotion {
    pub code: String,
    pub effect: DiscountEffect,
    pub active: bool,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
}

impl Promotion {
    /// An always-on promotion.
    pub fn active(code: impl Into<String>, effect: DiscountEffect) -> Self {
        Self {
            code: code.into(),
            effect,
            active: true,
            starts_at: None,
            ends_at: None,
        }
    }

    pub fn is_redeemable_at(&self, now: DateTime<Utc>) -> bool {
        if !self.active {
            return false;
        }
        if matches!(self.starts_at, Some(start) if now < start) {
            return false;
        }
        if matches!(self.ends_at, Some(end) if now >= end) {
            return false;
        }
        true
    }
}

/// Outcome of checking a code: validity plus the effect when valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromoValidation {
    pub valid: bool,
    pub effect: Option<DiscountEffect>,
}

impl PromoValidation {
    pub fn accepted(effect: DiscountEffect) -> Self {
        Self {
            valid: true,
            effect: Some(effect),
        }
    }

    pub fn rejected() -> Self {
        Self {
            valid: false,
            effect: None,
        }
    }
}
