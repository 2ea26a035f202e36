// ============================================================================
// Actors Module
// ============================================================================
//
// Actor-based infrastructure, kept out of the ordering domain.
//
// Structure:
// - core/         - Health abstractions (HealthStatus, HealthProbe)
// - health_check  - Actor that polls probes and serves system health
//
// ============================================================================

mod core;
mod health_check;

pub use core::{HealthProbe, HealthStatus};
pub use health_check::{GetSystemHealth, HealthCheckActor};
