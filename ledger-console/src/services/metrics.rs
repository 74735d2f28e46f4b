use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::OnceLock;

static METRICS: OnceLock<Metrics> = OnceLock::new();

/// The console's collectors and the registry they are registered in.
pub struct Metrics {
    registry: Registry,
    http_requests_total: IntCounterVec,
    http_request_duration_seconds: HistogramVec,
    api_calls_total: IntCounterVec,
}

impl Metrics {
    fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total number of HTTP requests"),
            &["method", "path", "status"],
        )?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request duration in seconds",
            ),
            &["method", "path", "status"],
        )?;

        let api_calls_total = IntCounterVec::new(
            Opts::new("api_calls_total", "Calls made to the accounting API"),
            &["method", "status"],
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(api_calls_total.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            api_calls_total,
        })
    }
}

/// Register the console's collectors. Safe to call more than once, from any thread.
///
/// Concurrent first callers may each build a set; exactly one is installed whole.
pub fn init_metrics() -> Result<&'static Metrics, prometheus::Error> {
    if let Some(metrics) = METRICS.get() {
        return Ok(metrics);
    }
    let metrics = Metrics::new()?;
    Ok(METRICS.get_or_init(|| metrics))
}

pub fn record_http_request(method: &str, path: &str, status: u16, seconds: f64) {
    let Some(metrics) = METRICS.get() else {
        return;
    };
    let status = status.to_string();
    let labels = [method, path, status.as_str()];
    metrics.http_requests_total.with_label_values(&labels).inc();
    metrics
        .http_request_duration_seconds
        .with_label_values(&labels)
        .observe(seconds);
}

/// `status` is the HTTP status, or "error" when no response arrived.
pub fn record_api_call(method: &str, status: &str) {
    if let Some(metrics) = METRICS.get() {
        metrics
            .api_calls_total
            .with_label_values(&[method, status])
            .inc();
    }
}

/// Text exposition of every registered metric; empty before `init_metrics`.
pub fn get_metrics() -> Result<String, prometheus::Error> {
    let Some(metrics) = METRICS.get() else {
        return Ok(String::new());
    };
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&metrics.registry.gather(), &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
