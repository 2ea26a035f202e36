use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGaugeVec, Opts, Registry, TextEncoder};

// ============================================================================
// Metrics Module - Prometheus metrics for observability
// ============================================================================
//
// - Order placement outcomes and latency
// - Per-component health (fed by the health-check actor)
//
// Owned by AppState, exposed at GET /metrics.
// ============================================================================

pub struct Metrics {
    registry: Registry,

    pub orders_placed: IntCounter,
    pub order_failures: IntCounterVec,
    pub placement_duration: Histogram,

    pub component_health_status: IntGaugeVec,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let orders_placed = IntCounter::new("orders_placed_total", "Orders successfully placed")?;
        registry.register(Box::new(orders_placed.clone()))?;

        let order_failures = IntCounterVec::new(
            Opts::new("order_failures_total", "Rejected or failed order placements"),
            &["kind"],
        )?;
        registry.register(Box::new(order_failures.clone()))?;

        let placement_duration = Histogram::with_opts(
            HistogramOpts::new("order_placement_duration_seconds", "Order placement duration")
                .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
        )?;
        registry.register(Box::new(placement_duration.clone()))?;

        let component_health_status = IntGaugeVec::new(
            Opts::new(
                "component_health_status",
                "Component health (0=Unhealthy, 1=Degraded, 2=Healthy)",
            ),
            &["component"],
        )?;
        registry.register(Box::new(component_health_status.clone()))?;

        Ok(Self {
            registry,
            orders_placed,
            order_failures,
            placement_duration,
            component_health_status,
        })
    }

    /// Record one placement attempt; `failure_kind` is `None` on success.
    pub fn record_placement(&self, duration_secs: f64, failure_kind: Option<&str>) {
        match failure_kind {
            None => self.orders_placed.inc(),
            Some(kind) => self.order_failures.with_label_values(&[kind]).inc(),
        }
        self.placement_duration.observe(duration_secs);
    }

    /// Prometheus text exposition of every registered metric.
    pub fn render(&self) -> anyhow::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
