use actix::Addr;
use std::sync::Arc;

use crate::actors::HealthCheckActor;
use crate::domain::catalog::ProductCatalog;
use crate::domain::order::OrderPricingEngine;
use crate::metrics::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<OrderPricingEngine>,
    pub catalog: Arc<dyn ProductCatalog>,
    pub metrics: Arc<Metrics>,
    pub health: Addr<HealthCheckActor>,
    pub api_key: Arc<str>,
}
