use actix::prelude::*;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use crate::metrics::Metrics;
use super::core::{ComponentHealth, HealthProbe, HealthStatus};

// ============================================================================
// Health Check Actor - Monitors backend health
// ============================================================================
//
// Responsibilities:
// - Poll every registered probe on an interval
// - Keep the latest status per component
// - Aggregate a system-wide status (worst component wins)
// - Mirror statuses into the component_health_status gauge
//
// ============================================================================

#[derive(Message)]
#[rtype(result = "()")]
pub struct UpdateHealth {
    pub component: String,
    pub status: HealthStatus,
}

#[derive(Message)]
#[rtype(result = "SystemHealth")]
pub struct GetSystemHealth;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemHealth {
    pub overall_status: HealthStatus,
    pub components: BTreeMap<String, ComponentHealth>,
    pub check_time: DateTime<Utc>,
}

pub struct HealthCheckActor {
    components: BTreeMap<String, ComponentHealth>,
    probes: Vec<Arc<dyn HealthProbe>>,
    metrics: Arc<Metrics>,
    interval: Duration,
}

impl HealthCheckActor {
    pub fn new(probes: Vec<Arc<dyn HealthProbe>>, metrics: Arc<Metrics>, interval: Duration) -> Self {
        Self {
            components: BTreeMap::new(),
            probes,
            metrics,
            interval,
        }
    }

    fn compute_overall_status(&self) -> HealthStatus {
        let mut degraded = Vec::new();
        let mut unhealthy = Vec::new();

        for (name, health) in &self.components {
            match &health.status {
                HealthStatus::Unhealthy(msg) => unhealthy.push(format!("{}: {}", name, msg)),
                HealthStatus::Degraded(msg) => degraded.push(format!("{}: {}", name, msg)),
                HealthStatus::Healthy => {}
            }
        }

        if !unhealthy.is_empty() {
            HealthStatus::Unhealthy(unhealthy.join(", "))
        } else if !degraded.is_empty() {
            HealthStatus::Degraded(degraded.join(", "))
        } else {
            HealthStatus::Healthy
        }
    }

    fn poll_probes(&self, ctx: &mut Context<Self>) {
        let probes = self.probes.clone();
        let addr = ctx.address();

        actix::spawn(async move {
            for probe in probes {
                let status = probe.probe().await;
                addr.do_send(UpdateHealth {
                    component: probe.component_name().to_string(),
                    status,
                });
            }
        });
    }
}

impl Actor for HealthCheckActor {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        tracing::info!(probes = self.probes.len(), "HealthCheckActor started");

        self.poll_probes(ctx);
        ctx.run_interval(self.interval, |act, ctx| act.poll_probes(ctx));
    }
}

impl Handler<UpdateHealth> for HealthCheckActor {
    type Result = ();

    fn handle(&mut self, msg: UpdateHealth, _: &mut Self::Context) {
        let previous = self.components.get(&msg.component).map(|h| h.status.clone());
        if previous.as_ref() != Some(&msg.status) {
            tracing::info!(component = %msg.component, status = ?msg.status, "Component health changed");
        }

        self.metrics
            .component_health_status
            .with_label_values(&[msg.component.as_str()])
            .set(msg.status.as_gauge());

        self.components
            .insert(msg.component.clone(), ComponentHealth::new(msg.component, msg.status));
    }
}

impl Handler<GetSystemHealth> for HealthCheckActor {
    type Result = MessageResult<GetSystemHealth>;

    fn handle(&mut self, _msg: GetSystemHealth, _: &mut Self::Context) -> Self::Result {
        MessageResult(SystemHealth {
            overall_status: self.compute_overall_status(),
            components: self.components.clone(),
            check_time: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedProbe {
        name: &'static str,
        status: HealthStatus,
    }

    #[async_trait]
    impl HealthProbe for FixedProbe {
        fn component_name(&self) -> &str {
            self.name
        }

        async fn probe(&self) -> HealthStatus {
            self.status.clone()
        }
    }

    fn actor() -> HealthCheckActor {
        HealthCheckActor::new(vec![], Arc::new(Metrics::new().unwrap()), Duration::from_secs(60))
    }

    #[actix::test]
    async fn test_empty_system_is_healthy() {
        let addr = actor().start();
        let health = addr.send(GetSystemHealth).await.unwrap();
        assert_eq!(health.overall_status, HealthStatus::Healthy);
    }

    #[actix::test]
    async fn test_worst_component_wins() {
        let addr = actor().start();

        addr.send(UpdateHealth {
            component: "catalog".to_string(),
            status: HealthStatus::Healthy,
        })
        .await
        .unwrap();
        addr.send(UpdateHealth {
            component: "promo_validator".to_string(),
            status: HealthStatus::Degraded("circuit breaker half-open".to_string()),
        })
        .await
        .unwrap();

        let health = addr.send(GetSystemHealth).await.unwrap();
        assert!(matches!(health.overall_status, HealthStatus::Degraded(_)));

        addr.send(UpdateHealth {
            component: "order_store".to_string(),
            status: HealthStatus::Unhealthy("connection refused".to_string()),
        })
        .await
        .unwrap();

        let health = addr.send(GetSystemHealth).await.unwrap();
        assert_eq!(
            health.overall_status,
            HealthStatus::Unhealthy("order_store: connection refused".to_string())
        );
        assert_eq!(health.components.len(), 3);
    }

    #[actix::test]
    async fn test_probes_are_polled_on_start() {
        let probes: Vec<Arc<dyn HealthProbe>> = vec![
            Arc::new(FixedProbe { name: "catalog", status: HealthStatus::Healthy }),
            Arc::new(FixedProbe {
                name: "promo_validator",
                status: HealthStatus::Unhealthy("circuit breaker open".to_string()),
            }),
        ];
        let metrics = Arc::new(Metrics::new().unwrap());
        let addr = HealthCheckActor::new(probes, metrics.clone(), Duration::from_secs(60)).start();

        tokio::time::sleep(Duration::from_millis(50)).await;

        let health = addr.send(GetSystemHealth).await.unwrap();
        assert!(health.overall_status.is_unhealthy());
        assert_eq!(health.components.len(), 2);
        assert_eq!(
            metrics
                .component_health_status
                .with_label_values(&["promo_validator"])
                .get(),
            0
        );
    }
}
