use async_trait::async_trait;

use super::value_objects::{Page, Product};

// ============================================================================
// Product Catalog - consumed interface
// ============================================================================
//
// The placement engine only reads through `find_by_id`. Listing serves the
// HTTP surface. Nothing here mutates the catalog.
//
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Catalog backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// `Ok(None)` means the id is not cataloged.
    async fn find_by_id(&self, id: &str) -> Result<Option<Product>, CatalogError>;

    /// List products ordered by id. `page` is 1-based.
    async fn list(&self, page: u32, per_page: u32) -> Result<Page<Product>, CatalogError>;
}
