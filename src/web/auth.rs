use actix_web::HttpRequest;

use super::errors::ApiError;

pub const API_KEY_HEADER: &str = "api_key";

/// Order placement requires the configured key in the `api_key` header.
pub fn require_api_key(req: &HttpRequest, expected: &str) -> Result<(), ApiError> {
    let supplied = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    match supplied {
        Some(key) if key == expected => Ok(()),
        Some(_) => {
            tracing::warn!(path = %req.path(), "Rejected request with wrong api key");
            Err(ApiError::Unauthorized)
        }
        None => Err(ApiError::Unauthorized),
    }
}
