// ============================================================================
// Promo Domain - Promotions and Code Validation
// ============================================================================
//
// - Value objects (DiscountEffect, Promotion, PromoValidation)
// - Errors (PromoError)
// - Validator contract plus the config-backed in-memory validator
//
// ============================================================================

pub mod value_objects;
pub mod errors;
pub mod validator;

pub use value_objects::*;
pub use errors::*;
pub use validator::*;
