use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;

use crate::domain::catalog::CatalogError;
use crate::domain::order::OrderError;

// ============================================================================
// API Errors - the single place errors become HTTP statuses
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Missing or invalid api_key header")]
    Unauthorized,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Order(e) => e.kind(),
            ApiError::Catalog(_) => "catalog_unavailable",
            ApiError::Unauthorized => "unauthorized",
            ApiError::NotFound(_) => "not_found",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Order(e) => match e {
                OrderError::Validation(_) => StatusCode::BAD_REQUEST,
                OrderError::ProductNotFound(_) => StatusCode::NOT_FOUND,
                OrderError::InvalidPromoCode(_) => StatusCode::UNPROCESSABLE_ENTITY,
                OrderError::ValidatorUnavailable(_) | OrderError::CatalogUnavailable(_) => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
                OrderError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Catalog(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, kind = self.kind(), "Responding with server error");
        } else {
            tracing::debug!(error = %self, kind = self.kind(), "Responding with client error");
        }

        HttpResponse::build(status).json(json!({
            "error": self.kind(),
            "message": self.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_errors_map_to_statuses() {
        let cases = [
            (OrderError::Validation(vec!["x".into()]), 400),
            (OrderError::ProductNotFound(vec!["9".into()]), 404),
            (OrderError::InvalidPromoCode("SAVE10".into()), 422),
            (OrderError::ValidatorUnavailable("down".into()), 503),
            (OrderError::CatalogUnavailable("down".into()), 503),
            (OrderError::Persistence("down".into()), 500),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status_code().as_u16(), status);
        }
    }

    #[test]
    fn test_kind_passes_through() {
        let err = ApiError::from(OrderError::InvalidPromoCode("X".into()));
        assert_eq!(err.kind(), "invalid_promo_code");
        assert_eq!(err.to_string(), "Promo code 'X' is not valid");
    }
}
