use async_trait::async_trait;

use super::value_objects::{NewOrder, Order};

// ============================================================================
// Order Store - consumed interface
// ============================================================================
//
// `create` assigns the identifier (unique across all time, collision-free
// under concurrent calls) and durably records the order in one atomic step.
// A future dropped before completion must leave nothing behind.
//
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Order store backend error: {0}")]
    Backend(String),

    #[error("Order id collision: {0}")]
    DuplicateId(String),
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn create(&self, order: NewOrder) -> Result<Order, StoreError>;
}
