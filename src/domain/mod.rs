// ============================================================================
// Domain Layer - Ordering Business Logic
// ============================================================================
//
// Each area has its own subdirectory with value objects, errors and the
// narrow traits (ports) it consumes:
// - catalog/ - Products and the read-only catalog contract
// - promo/   - Promotions, discount effects, promo code validation
// - order/   - Order requests, pricing and the placement engine
//
// Backends implementing the ports live in src/db/.
//
// ============================================================================

pub mod catalog;
pub mod promo;
pub mod order;
