// ============================================================================
// Order Domain - Placement and Pricing
// ============================================================================
//
// - Value objects (OrderItem, OrderRequest, Order, OrderPricing)
// - Errors (OrderError taxonomy)
// - Pricing (exact decimal totals and discounts)
// - Store contract (OrderStore)
// - Engine (OrderPricingEngine: validate -> resolve -> price -> promo -> store)
//
// ============================================================================

pub mod value_objects;
pub mod errors;
pub mod pricing;
pub mod store;
pub mod engine;

pub use value_objects::*;
pub use errors::*;
pub use store::*;
pub use engine::*;
