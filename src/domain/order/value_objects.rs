use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::catalog::Product;

// ============================================================================
// Order Value Objects
// ============================================================================

/// A requested line. `quantity` is signed so that bad input reaches
/// validation instead of failing deserialization.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: String,
    pub quantity: i32,
}

impl OrderItem {
    pub fn new(product_id: impl Into<String>, quantity: i32) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    #[serde(default)]
    pub coupon_code: Option<String>,
    pub items: Vec<OrderItem>,
}

impl OrderRequest {
    pub fn new(items: Vec<OrderItem>) -> Self {
        Self {
            coupon_code: None,
            items,
        }
    }

    pub fn with_coupon(mut self, code: impl Into<String>) -> Self {
        self.coupon_code = Some(code.into());
        self
    }

    /// The coupon code if one was actually supplied (present and non-blank).
    pub fn coupon(&self) -> Option<&str> {
        self.coupon_code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
    }
}

/// Money breakdown for a placed order, all values at currency precision.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderPricing {
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub coupon_code: Option<String>,
}

/// A fully priced order that has not been given an identity yet.
#[derive(Clone, Debug)]
pub struct NewOrder {
    pub items: Vec<OrderItem>,
    pub products: Vec<Product>,
    pub pricing: OrderPricing,
    pub created_at: DateTime<Utc>,
}

impl NewOrder {
    pub fn into_order(self, id: String) -> Order {
        Order {
            id,
            items: self.items,
            products: self.products,
            pricing: self.pricing,
            created_at: self.created_at,
        }
    }
}

/// A placed order. `products` holds each distinct matched product once,
/// in first-occurrence order of the request.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub items: Vec<OrderItem>,
    pub products: Vec<Product>,
    pub pricing: OrderPricing,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Unit Tests
// ============================================================================
