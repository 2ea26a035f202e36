use actix_web::{web, HttpRequest, HttpResponse};
use std::time::Instant;
use tracing::instrument;

use super::auth::require_api_key;
use super::errors::ApiError;
use super::pagination::{link_header, PageQuery};
use super::state::AppState;
use crate::actors::GetSystemHealth;
use crate::domain::order::{OrderError, OrderRequest};

// ============================================================================
// Handlers
// ============================================================================

#[instrument(name = "handler::list_products", skip(state, req, query))]
pub async fn list_products(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, ApiError> {
    let (page, per_page) = query.resolve();
    let listing = state.catalog.list(page, per_page).await?;

    tracing::debug!(page, per_page, total = listing.total, "Listed products");

    Ok(HttpResponse::Ok()
        .insert_header(("Link", link_header(req.path(), page, per_page, listing.last_page())))
        .insert_header(("X-Total-Count", listing.total.to_string()))
        .json(listing.items))
}

#[instrument(name = "handler::get_product", skip(state, path), fields(product_id = %path.as_str()))]
pub async fn get_product(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let product_id = path.into_inner();

    match state.catalog.find_by_id(&product_id).await? {
        Some(product) => Ok(HttpResponse::Ok().json(product)),
        None => Err(ApiError::NotFound(format!("Product '{}' not found", product_id))),
    }
}

/// The key is checked before the body is parsed, so a bad body without a
/// key is still a 401.
#[instrument(name = "handler::place_order", skip_all)]
pub async fn place_order(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    require_api_key(&req, &state.api_key)?;

    let request: OrderRequest = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("Malformed order body: {}", e)))?;

    let started = Instant::now();
    let result = state.engine.place_order(request).await;
    state.metrics.record_placement(
        started.elapsed().as_secs_f64(),
        result.as_ref().err().map(OrderError::kind),
    );

    let order = result?;
    tracing::info!(order_id = %order.id, total = %order.pricing.total, "Order placed");

    Ok(HttpResponse::Ok().json(order))
}

pub async fn health(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let health = state
        .health
        .send(GetSystemHealth)
        .await
        .map_err(|e| ApiError::Internal(format!("Health actor unreachable: {}", e)))?;

    if health.overall_status.is_unhealthy() {
        Ok(HttpResponse::ServiceUnavailable().json(health))
    } else {
        Ok(HttpResponse::Ok().json(health))
    }
}

pub async fn metrics(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let body = state
        .metrics
        .render()
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(body))
}

pub async fn preflight() -> HttpResponse {
    HttpResponse::NoContent().finish()
}
