// ============================================================================
// Catalog Domain - Orderable Products
// ============================================================================

pub mod value_objects;
pub mod repository;

pub use value_objects::*;
pub use repository::*;
