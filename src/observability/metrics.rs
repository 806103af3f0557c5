use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry};
use tracing::info;
use std::sync::Arc;
use tokio::sync::OnceCell;


// Declare the static OnceCell to hold the Metrics.
static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Asynchronously initializes and gets a reference to the process-wide `Metrics`.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE.get_or_init(|| async {
        info!("Initializing Metrics ...");
        Metrics::new()}
    ).await
}


#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Cache metrics
    pub cache_lookups: IntCounterVec,
    pub cached_tokens: IntGauge,

    // Identity provider metrics
    pub provider_requests: IntCounter,
    pub provider_failures: IntCounterVec,
    pub provider_duration: HistogramVec,

    // HTTP surface
    pub http_requests: IntCounterVec,

    // Config/runtime
    pub config_validation_errors: IntCounter,
    pub up: IntGauge,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("tokengateway".into()), None).unwrap();

        let metrics: Arc<Metrics> = Arc::new(Self {
            // Cache
            cache_lookups: IntCounterVec::new(Opts::new("cache_lookups_total", "Token cache lookups by result"),&["result"],).unwrap(),
            cached_tokens: IntGauge::new("cached_tokens", "Cache entries, expired ones included").unwrap(),

            // Identity provider
            provider_requests: IntCounter::new("provider_requests_total", "Token requests sent to the identity provider").unwrap(),
            provider_failures: IntCounterVec::new(Opts::new("provider_failures_total", "Identity provider failures by reason"),&["reason"],).unwrap(),
            provider_duration: HistogramVec::new(HistogramOpts::new("provider_request_duration_seconds", "Identity provider round trip seconds").buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]),&["outcome"],).unwrap(),

            // HTTP
            http_requests: IntCounterVec::new(Opts::new("http_requests_total", "HTTP requests by route and status"),&["route", "status"],).unwrap(),

            // Config/runtime
            config_validation_errors: IntCounter::new("config_validation_errors_total","Validation errors during startup",).unwrap(),
            up: IntGauge::new("up", "1 if service is healthy").unwrap(),

            registry,
        });

        // Register all metrics in the registry
        let reg = &metrics.registry;
        reg.register(Box::new(metrics.cache_lookups.clone())).unwrap();
        reg.register(Box::new(metrics.cached_tokens.clone())).unwrap();
        reg.register(Box::new(metrics.provider_requests.clone())).unwrap();
        reg.register(Box::new(metrics.provider_failures.clone())).unwrap();
        reg.register(Box::new(metrics.provider_duration.clone())).unwrap();
        reg.register(Box::new(metrics.http_requests.clone())).unwrap();
        reg.register(Box::new(metrics.config_validation_errors.clone())).unwrap();
        reg.register(Box::new(metrics.up.clone())).unwrap();

        metrics
    }
}
