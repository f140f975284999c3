//! Prometheus metrics for item creation and request latency.

use std::time::{Duration, Instant};

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::ServiceError;

// === Metric Name Constants ===

/// Items created counter metric name.
pub const METRIC_ITEMS_CREATED: &str = "items_created_total";
/// HTTP request latency metric name.
pub const METRIC_HTTP_REQUEST_LATENCY: &str = "http_request_latency_ms";

/// How often buffered histogram samples are drained when nobody scrapes.
pub const UPKEEP_INTERVAL: Duration = Duration::from_secs(5);

/// Install the global Prometheus recorder and describe all metrics.
///
/// Call this once at startup. A second call in the same process fails.
/// The returned handle must be passed to [`spawn_upkeep`].
pub fn install_recorder() -> Result<PrometheusHandle, ServiceError> {
    let handle = PrometheusBuilder::new()
        .upkeep_timeout(UPKEEP_INTERVAL)
        .install_recorder()?;
    init_metrics();
    Ok(handle)
}

/// Recorder maintenance run on a timer.
pub trait Upkeep: Send + 'static {
    /// Drain buffered samples into their summaries.
    fn run_upkeep(&self);
}

impl Upkeep for PrometheusHandle {
    fn run_upkeep(&self) {
        PrometheusHandle::run_upkeep(self);
    }
}

/// Run `upkeep` every `every` until the task is aborted or the runtime stops.
///
/// Without this, histogram samples only drain on a `/metrics` scrape and
/// grow with every request.
pub fn spawn_upkeep<U: Upkeep>(upkeep: U, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            upkeep.run_upkeep();
        }
    })
}

/// Initialize all metric descriptions.
pub fn init_metrics() {
    describe_counter!(METRIC_ITEMS_CREATED, "Total number of items created");
    describe_histogram!(
        METRIC_HTTP_REQUEST_LATENCY,
        "HTTP request latency in milliseconds"
    );

    debug!("Metrics initialized");
}

/// Increment items created counter.
pub fn inc_items_created() {
    counter!(METRIC_ITEMS_CREATED).increment(1);
}

/// Record HTTP request latency.
pub fn record_http_latency(start: Instant, method: &str, endpoint: &str, status: u16) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(
        METRIC_HTTP_REQUEST_LATENCY,
        "method" => method.to_string(),
        "endpoint" => endpoint.to_string(),
        "status" => status.to_string()
    )
    .record(latency_ms);
}
