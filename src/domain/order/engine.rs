use chrono::Utc;
use futures_util::future::join_all;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{timeout_at, Instant};

use crate::domain::catalog::{Product, ProductCatalog};
use crate::domain::promo::{DiscountEffect, PromoCodeValidator, PromoValidation};

use super::errors::OrderError;
use super::pricing;
use super::store::OrderStore;
use super::value_objects::{NewOrder, Order, OrderItem, OrderRequest};

// ============================================================================
// Order Pricing Engine
// ============================================================================
//
// Orchestrates: Validate -> Resolve (catalog) -> Price -> Promo -> Store
//
// - Validation runs before any I/O.
// - Resolution is all-or-nothing.
// - Exactly one store write per successful placement, none otherwise.
// - Every outbound call is bounded by the placement deadline.
// - No retries; callers decide.
//
// ============================================================================

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Deadline applied by `place_order` when the caller gives none.
    pub call_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(2),
        }
    }
}

pub struct OrderPricingEngine {
    catalog: Arc<dyn ProductCatalog>,
    promos: Arc<dyn PromoCodeValidator>,
    store: Arc<dyn OrderStore>,
    config: EngineConfig,
}

impl OrderPricingEngine {
    pub fn new(
        catalog: Arc<dyn ProductCatalog>,
        promos: Arc<dyn PromoCodeValidator>,
        store: Arc<dyn OrderStore>,
        config: EngineConfig,
    ) -> Self {
        Self {
            catalog,
            promos,
            store,
            config,
        }
    }

    /// Place an order using the configured default deadline.
    pub async fn place_order(&self, request: OrderRequest) -> Result<Order, OrderError> {
        let deadline = Instant::now() + self.config.call_timeout;
        self.place_order_until(request, deadline).await
    }

    /// Place an order; all catalog, promo and store calls finish by `deadline`.
    pub async fn place_order_until(
        &self,
        request: OrderRequest,
        deadline: Instant,
    ) -> Result<Order, OrderError> {
        validate_request(&request)?;

        let coupon = request.coupon().map(str::to_string);
        let ids = distinct_product_ids(&request.items);

        tracing::debug!(
            item_count = request.items.len(),
            distinct_products = ids.len(),
            has_coupon = coupon.is_some(),
            "Placing order"
        );

        let products = self.resolve(&ids, deadline).await?;
        let index: HashMap<&str, &Product> = ids.iter().copied().zip(products.iter()).collect();
        let subtotal = pricing::subtotal(&request.items, &index)?;

        let effect = match coupon.as_deref() {
            Some(code) => Some(self.check_promo(code, deadline).await?),
            None => None,
        };
        let pricing = pricing::price(subtotal, effect.as_ref(), coupon)?;

        let new_order = NewOrder {
            items: request.items,
            products,
            pricing,
            created_at: Utc::now(),
        };

        let order = self.persist(new_order, deadline).await?;

        tracing::info!(
            order_id = %order.id,
            subtotal = %order.pricing.subtotal,
            discount = %order.pricing.discount,
            total = %order.pricing.total,
            "Order placed"
        );

        Ok(order)
    }

    /// Look up every id; the result is aligned with `ids`.
    async fn resolve(&self, ids: &[&str], deadline: Instant) -> Result<Vec<Product>, OrderError> {
        let lookups = join_all(ids.iter().map(|id| self.catalog.find_by_id(id)));
        let results = timeout_at(deadline, lookups).await.map_err(|_| {
            tracing::warn!(product_count = ids.len(), "Catalog lookups exceeded deadline");
            OrderError::CatalogUnavailable("product lookup timed out".to_string())
        })?;

        let mut products = Vec::with_capacity(ids.len());
        let mut missing = Vec::new();

        for (id, result) in ids.iter().zip(results) {
            match result {
                Ok(Some(product)) => products.push(product),
                Ok(None) => missing.push(id.to_string()),
                Err(e) => {
                    tracing::error!(product_id = %id, error = %e, "Catalog lookup failed");
                    return Err(OrderError::CatalogUnavailable(e.to_string()));
                }
            }
        }

        if !missing.is_empty() {
            tracing::warn!(missing = ?missing, "Order references unknown products");
            return Err(OrderError::ProductNotFound(missing));
        }

        Ok(products)
    }

    async fn check_promo(&self, code: &str, deadline: Instant) -> Result<DiscountEffect, OrderError> {
        let validation = timeout_at(deadline, self.promos.validate(code))
            .await
            .map_err(|_| OrderError::ValidatorUnavailable("promo check timed out".to_string()))?
            .map_err(|e| {
                tracing::error!(code = %code, error = %e, "Promo validator failed");
                OrderError::ValidatorUnavailable(e.to_string())
            })?;

        match validation {
            PromoValidation { valid: true, effect: Some(effect) } => match effect.check_range() {
                Ok(()) => Ok(effect),
                Err(e) => {
                    tracing::error!(code = %code, error = %e, "Promo validator returned an invalid effect");
                    Err(OrderError::ValidatorUnavailable(e.to_string()))
                }
            },
            PromoValidation { valid: true, effect: None } => Err(OrderError::ValidatorUnavailable(
                "validator accepted the code without a discount effect".to_string(),
            )),
            PromoValidation { valid: false, .. } => {
                tracing::warn!(code = %code, "Rejected promo code");
                Err(OrderError::InvalidPromoCode(code.to_string()))
            }
        }
    }

    async fn persist(&self, order: NewOrder, deadline: Instant) -> Result<Order, OrderError> {
        if Instant::now() >= deadline {
            return Err(OrderError::Persistence(
                "deadline elapsed before the order was recorded".to_string(),
            ));
        }

        match timeout_at(deadline, self.store.create(order)).await {
            Ok(Ok(order)) => Ok(order),
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Order store write failed");
                Err(OrderError::Persistence(e.to_string()))
            }
            Err(_) => {
                tracing::error!("Order store write timed out");
                Err(OrderError::Persistence(
                    "order store timed out; nothing was committed".to_string(),
                ))
            }
        }
    }
}

/// Semantic checks that hold regardless of what the transport already did.
/// Reports every violation at once.
pub fn validate_request(request: &OrderRequest) -> Result<(), OrderError> {
    let mut violations = Vec::new();

    if request.items.is_empty() {
        violations.push("order must contain at least one item".to_string());
    }

    for (index, item) in request.items.iter().enumerate() {
        if item.product_id.trim().is_empty() {
            violations.push(format!("items[{}]: productId must not be empty", index));
        }
        if item.quantity < 1 {
            violations.push(format!(
                "items[{}]: quantity must be at least 1, got {}",
                index, item.quantity
            ));
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(OrderError::Validation(violations))
    }
}

/// Distinct product ids in first-occurrence order.
pub fn distinct_product_ids(items: &[OrderItem]) -> Vec<&str> {
    let mut seen = HashSet::new();
    items
        .iter()
        .map(|item| item.product_id.as_str())
        .filter(|id| seen.insert(*id))
        .collect()
}

// ============================================================================
// Unit Tests
// ============================================================================
