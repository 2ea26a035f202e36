// ============================================================================
// Web Layer - HTTP transport (actix-web)
// ============================================================================
//
// Thin plumbing around the ordering domain: routing, API key check, CORS,
// pagination links and error-to-status mapping. No business rules here.
//
// ============================================================================

mod auth;
mod errors;
mod handlers;
mod pagination;
mod routes;
mod state;

pub use routes::{configure, cors};
pub use state::AppState;
