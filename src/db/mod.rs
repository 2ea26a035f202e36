// ============================================================================
// Backends - catalog, order store and promo validator implementations
// ============================================================================
//
// memory   - in-process catalog/store (demo and tests)
// postgres - sqlx catalog and transactional order store
// redis    - promotion records behind a circuit breaker
//
// ============================================================================

pub mod memory;
pub mod postgres;
pub mod redis;

use std::sync::Arc;

use crate::actors::HealthProbe;
use crate::config::{AppConfig, PromoBackend, StorageBackend};
use crate::domain::catalog::ProductCatalog;
use crate::domain::order::OrderStore;
use crate::domain::promo::{InMemoryPromoValidator, PromoCodeValidator};

/// The three ports the engine depends on, plus their health probes.
pub struct Backends {
    pub catalog: Arc<dyn ProductCatalog>,
    pub store: Arc<dyn OrderStore>,
    pub promos: Arc<dyn PromoCodeValidator>,
    pub probes: Vec<Arc<dyn HealthProbe>>,
}

pub async fn build(config: &AppConfig) -> anyhow::Result<Backends> {
    let mut probes: Vec<Arc<dyn HealthProbe>> = Vec::new();

    let (catalog, store): (Arc<dyn ProductCatalog>, Arc<dyn OrderStore>) = match &config.storage {
        StorageBackend::Memory { seed } => {
            let catalog = Arc::new(if *seed {
                memory::InMemoryCatalog::seeded()
            } else {
                memory::InMemoryCatalog::new(Vec::new())
            });
            let store = Arc::new(memory::InMemoryOrderStore::new());
            tracing::info!(products = catalog.len(), "Using in-memory catalog and order store");

            probes.push(catalog.clone());
            probes.push(store.clone());
            (catalog, store)
        }
        StorageBackend::Postgres { database_url } => {
            let pool = postgres::connect(database_url).await?;
            let catalog = Arc::new(postgres::PgCatalog::new(pool.clone()));
            let store = Arc::new(postgres::PgOrderStore::new(pool));

            probes.push(catalog.clone());
            probes.push(store.clone());
            (catalog, store)
        }
    };

    let promos: Arc<dyn PromoCodeValidator> = match &config.promo {
        PromoBackend::Memory { promotions } => {
            let validator = Arc::new(InMemoryPromoValidator::new(promotions.clone()));
            tracing::info!(promotions = validator.len(), "Using in-memory promo validator");

            probes.push(validator.clone());
            validator
        }
        PromoBackend::Redis { url, breaker } => {
            let validator = Arc::new(redis::RedisPromoValidator::connect(url, breaker.clone()).await?);

            probes.push(validator.clone());
            validator
        }
    };

    Ok(Backends {
        catalog,
        store,
        promos,
        probes,
    })
}
