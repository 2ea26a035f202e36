// ============================================================================
// Promo Validation Errors
// ============================================================================
//
// A rejected code is not an error: it is `PromoValidation::rejected()`.
// Errors here mean the code could not be checked at all.
//
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum PromoError {
    #[error("Promo validation backend unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed promotion record for {code}: {reason}")]
    MalformedRecord { code: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DiscountParseError {
    #[error("Expected '<kind>:<value>', got '{0}'")]
    MissingSeparator(String),

    #[error("Unknown discount kind '{0}' (expected 'percent' or 'amount')")]
    UnknownKind(String),

    #[error("Invalid discount value '{0}'")]
    InvalidValue(String),

    #[error("Discount value out of range: {0}")]
    OutOfRange(String),
}
