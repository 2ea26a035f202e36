// ============================================================================
// Order Placement Errors
// ============================================================================
//
// Every variant has a stable discriminant (`kind`) and a readable message.
// Status-code mapping belongs to the transport, not here.
//
// ============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OrderError {
    #[error("Invalid order request: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Unknown product id(s): {}", .0.join(", "))]
    ProductNotFound(Vec<String>),

    #[error("Promo code '{0}' is not valid")]
    InvalidPromoCode(String),

    #[error("Promo code could not be checked: {0}")]
    ValidatorUnavailable(String),

    #[error("Product catalog unavailable: {0}")]
    CatalogUnavailable(String),

    #[error("Order could not be recorded: {0}")]
    Persistence(String),
}

impl OrderError {
    pub fn kind(&self) -> &'static str {
        match self {
            OrderError::Validation(_) => "validation_error",
            OrderError::ProductNotFound(_) => "product_not_found",
            OrderError::InvalidPromoCode(_) => "invalid_promo_code",
            OrderError::ValidatorUnavailable(_) => "validator_unavailable",
            OrderError::CatalogUnavailable(_) => "catalog_unavailable",
            OrderError::Persistence(_) => "persistence_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_list_offenders() {
        let err = OrderError::ProductNotFound(vec!["7".into(), "9".into()]);
        assert_eq!(err.to_string(), "Unknown product id(s): 7, 9");
        assert_eq!(err.kind(), "product_not_found");

        let err = OrderError::Validation(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "Invalid order request: a; b");
    }
}
