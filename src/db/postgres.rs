use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use uuid::Uuid;

use crate::actors::{HealthProbe, HealthStatus};
use crate::domain::catalog::{CatalogError, Page, Product, ProductCatalog};
use crate::domain::order::{NewOrder, Order, OrderStore, StoreError};
use crate::utils::{retry_with_backoff, RetryConfig};

// ============================================================================
// PostgreSQL Backends
// ============================================================================
//
// Catalog reads `products`. The store writes one order as a single
// transaction across `orders`, `order_items` and `order_products`; an
// uncommitted transaction is rolled back when dropped.
//
// ============================================================================

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS products (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        price NUMERIC NOT NULL CHECK (price >= 0),
        category TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS orders (
        id TEXT PRIMARY KEY,
        coupon_code TEXT,
        subtotal NUMERIC NOT NULL,
        discount NUMERIC NOT NULL,
        total NUMERIC NOT NULL,
        created_at TIMESTAMPTZ NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS order_items (
        order_id TEXT NOT NULL REFERENCES orders (id),
        position INT NOT NULL,
        product_id TEXT NOT NULL,
        quantity INT NOT NULL CHECK (quantity >= 1),
        PRIMARY KEY (order_id, position)
    )",
    "CREATE TABLE IF NOT EXISTS order_products (
        order_id TEXT NOT NULL REFERENCES orders (id),
        position INT NOT NULL,
        product_id TEXT NOT NULL,
        name TEXT NOT NULL,
        price NUMERIC NOT NULL,
        category TEXT NOT NULL,
        PRIMARY KEY (order_id, position)
    )",
];

/// Connect with backoff and make sure the tables exist.
pub async fn connect(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = retry_with_backoff("postgres connect", RetryConfig::default(), |_attempt| {
        PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(3))
            .connect(database_url)
    })
    .await?;

    for statement in SCHEMA {
        sqlx::query(statement).execute(&pool).await?;
    }

    tracing::info!("Connected to PostgreSQL, schema ensured");
    Ok(pool)
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: String,
    name: String,
    price: Decimal,
    category: String,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product::new(row.id, row.name, row.price, row.category)
    }
}

fn catalog_error(e: sqlx::Error) -> CatalogError {
    CatalogError::Backend(e.to_string())
}

async fn ping(pool: &PgPool) -> HealthStatus {
    match sqlx::query("SELECT 1").execute(pool).await {
        Ok(_) => HealthStatus::Healthy,
        Err(e) => HealthStatus::Unhealthy(e.to_string()),
    }
}

pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductCatalog for PgCatalog {
    async fn find_by_id(&self, id: &str) -> Result<Option<Product>, CatalogError> {
        let row: Option<ProductRow> =
            sqlx::query_as("SELECT id, name, price, category FROM products WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(catalog_error)?;

        Ok(row.map(Product::from))
    }

    async fn list(&self, page: u32, per_page: u32) -> Result<Page<Product>, CatalogError> {
        let offset = i64::from(page.saturating_sub(1)) * i64::from(per_page);

        let rows: Vec<ProductRow> = sqlx::query_as(
            "SELECT id, name, price, category FROM products ORDER BY id LIMIT $1 OFFSET $2",
        )
        .bind(i64::from(per_page))
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(catalog_error)?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await
            .map_err(catalog_error)?;

        Ok(Page {
            items: rows.into_iter().map(Product::from).collect(),
            page,
            per_page,
            total: total.max(0) as u64,
        })
    }
}

#[async_trait]
impl HealthProbe for PgCatalog {
    fn component_name(&self) -> &str {
        "catalog"
    }

    async fn probe(&self) -> HealthStatus {
        ping(&self.pool).await
    }
}

pub struct PgOrderStore {
    pool: PgPool,
}

impl PgOrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert(&self, id: &str, order: &NewOrder) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO orders (id, coupon_code, subtotal, discount, total, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(id)
        .bind(order.pricing.coupon_code.as_deref())
        .bind(order.pricing.subtotal)
        .bind(order.pricing.discount)
        .bind(order.pricing.total)
        .bind(order.created_at)
        .execute(&mut *tx)
        .await?;

        for (position, item) in order.items.iter().enumerate() {
            sqlx::query(
                "INSERT INTO order_items (order_id, position, product_id, quantity)
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(id)
            .bind(position as i32)
            .bind(&item.product_id)
            .bind(item.quantity)
            .execute(&mut *tx)
            .await?;
        }

        for (position, product) in order.products.iter().enumerate() {
            sqlx::query(
                "INSERT INTO order_products (order_id, position, product_id, name, price, category)
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(id)
            .bind(position as i32)
            .bind(&product.id)
            .bind(&product.name)
            .bind(product.price)
            .bind(&product.category)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await
    }
}

#[async_trait]
impl OrderStore for PgOrderStore {
    async fn create(&self, order: NewOrder) -> Result<Order, StoreError> {
        let id = Uuid::now_v7().to_string();

        match self.insert(&id, &order).await {
            Ok(()) => {
                tracing::debug!(order_id = %id, "Order committed to PostgreSQL");
                Ok(order.into_order(id))
            }
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(StoreError::DuplicateId(id)),
            Err(e) => Err(StoreError::Backend(e.to_string())),
        }
    }
}

#[async_trait]
impl HealthProbe for PgOrderStore {
    fn component_name(&self) -> &str {
        "order_store"
    }

    async fn probe(&self) -> HealthStatus {
        ping(&self.pool).await
    }
}
