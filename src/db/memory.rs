use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::actors::{HealthProbe, HealthStatus};
use crate::domain::catalog::{CatalogError, Page, Product, ProductCatalog};
use crate::domain::order::{NewOrder, Order, OrderStore, StoreError};
use crate::domain::promo::InMemoryPromoValidator;

// ============================================================================
// In-Memory Backends
// ============================================================================
//
// Catalog: fixed product set, sorted by id.
// Store: ids are UUID v7 strings, inserted under a lock.
//
// ============================================================================

pub struct InMemoryCatalog {
    products: Vec<Product>,
    by_id: HashMap<String, usize>,
}

impl InMemoryCatalog {
    pub fn new(products: impl IntoIterator<Item = Product>) -> Self {
        let mut products: Vec<Product> = products.into_iter().collect();
        products.sort_by(|a, b| a.id.cmp(&b.id));
        products.dedup_by(|a, b| a.id == b.id);

        let by_id = products
            .iter()
            .enumerate()
            .map(|(index, product)| (product.id.clone(), index))
            .collect();

        Self { products, by_id }
    }

    /// Demo menu used when no database is configured.
    pub fn seeded() -> Self {
        let item = |id: &str, name: &str, cents: i64, category: &str| {
            Product::new(id, name, Decimal::new(cents, 2), category)
        };

        Self::new(vec![
            item("10", "Chicken Waffle", 999, "Waffle"),
            item("11", "Belgian Waffle", 750, "Waffle"),
            item("20", "Sweet Potato Fries", 425, "Sides"),
            item("21", "Onion Rings", 399, "Sides"),
            item("30", "Fresh Lemonade", 250, "Drinks"),
            item("31", "Iced Coffee", 325, "Drinks"),
            item("40", "Chocolate Brownie", 475, "Dessert"),
        ])
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }
}

#[async_trait]
impl ProductCatalog for InMemoryCatalog {
    async fn find_by_id(&self, id: &str) -> Result<Option<Product>, CatalogError> {
        Ok(self.by_id.get(id).map(|&index| self.products[index].clone()))
    }

    async fn list(&self, page: u32, per_page: u32) -> Result<Page<Product>, CatalogError> {
        let offset = (page.saturating_sub(1) as usize).saturating_mul(per_page as usize);
        let items = self
            .products
            .iter()
            .skip(offset)
            .take(per_page as usize)
            .cloned()
            .collect();

        Ok(Page {
            items,
            page,
            per_page,
            total: self.products.len() as u64,
        })
    }
}

#[async_trait]
impl HealthProbe for InMemoryCatalog {
    fn component_name(&self) -> &str {
        "catalog"
    }

    async fn probe(&self) -> HealthStatus {
        HealthStatus::Healthy
    }
}

#[derive(Default)]
pub struct InMemoryOrderStore {
    orders: Mutex<HashMap<String, Order>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code)]
    pub async fn get(&self, id: &str) -> Option<Order> {
        self.orders.lock().await.get(id).cloned()
    }

    #[allow(dead_code)]
    pub async fn len(&self) -> usize {
        self.orders.lock().await.len()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn create(&self, order: NewOrder) -> Result<Order, StoreError> {
        let mut orders = self.orders.lock().await;

        let id = Uuid::now_v7().to_string();
        if orders.contains_key(&id) {
            return Err(StoreError::DuplicateId(id));
        }

        let order = order.into_order(id.clone());
        orders.insert(id, order.clone());

        tracing::debug!(order_id = %order.id, stored = orders.len(), "Order stored in memory");
        Ok(order)
    }
}

#[async_trait]
impl HealthProbe for InMemoryOrderStore {
    fn component_name(&self) -> &str {
        "order_store"
    }

    async fn probe(&self) -> HealthStatus {
        HealthStatus::Healthy
    }
}

#[async_trait]
impl HealthProbe for InMemoryPromoValidator {
    fn component_name(&self) -> &str {
        "promo_validator"
    }

    async fn probe(&self) -> HealthStatus {
        HealthStatus::Healthy
    }
}
