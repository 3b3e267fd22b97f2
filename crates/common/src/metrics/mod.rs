//! Metrics and observability utilities
//!
//! Prometheus metric descriptions and recording helpers with
//! standardized naming conventions.

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use std::time::Instant;

/// Metrics prefix for all Broadsheet metrics
pub const METRICS_PREFIX: &str = "broadsheet";

/// Histogram buckets for request latency (in seconds); every request is a
/// single storage round trip, so the interesting range is small
pub const LATENCY_BUCKETS: &[f64] = &[
    0.001,  // 1ms
    0.005,  // 5ms
    0.010,  // 10ms
    0.025,  // 25ms
    0.050,  // 50ms
    0.100,  // 100ms
    0.250,  // 250ms
    0.500,  // 500ms
    1.000,  // 1s
    5.000,  // 5s
];

/// Register all metric descriptions
pub fn register_metrics() {
    // Request metrics
    describe_counter!(
        format!("{}_requests_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of HTTP requests"
    );

    describe_histogram!(
        format!("{}_request_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "HTTP request latency in seconds"
    );

    // Article metrics
    describe_counter!(
        format!("{}_articles_created_total", METRICS_PREFIX),
        Unit::Count,
        "Total articles created"
    );

    describe_counter!(
        format!("{}_articles_deleted_total", METRICS_PREFIX),
        Unit::Count,
        "Total articles deleted"
    );

    describe_histogram!(
        format!("{}_list_page_size", METRICS_PREFIX),
        Unit::Count,
        "Number of articles returned per list call"
    );

    describe_counter!(
        format!("{}_list_pages_total", METRICS_PREFIX),
        Unit::Count,
        "Total list calls, labelled by whether a next cursor was emitted"
    );

    tracing::info!("Metrics registered");
}

/// Helper to record request metrics
pub struct RequestMetrics {
    start: Instant,
    endpoint: String,
    method: String,
}

impl RequestMetrics {
    /// Start tracking a request
    pub fn start(method: &str, endpoint: &str) -> Self {
        Self {
            start: Instant::now(),
            endpoint: endpoint.to_string(),
            method: method.to_string(),
        }
    }

    /// Record request completion
    pub fn finish(self, status: u16) {
        let duration = self.start.elapsed().as_secs_f64();

        counter!(
            format!("{}_requests_total", METRICS_PREFIX),
            "method" => self.method.clone(),
            "endpoint" => self.endpoint.clone(),
            "status" => status.to_string()
        )
        .increment(1);

        histogram!(
            format!("{}_request_duration_seconds", METRICS_PREFIX),
            "method" => self.method,
            "endpoint" => self.endpoint
        )
        .record(duration);
    }
}

pub fn record_article_created() {
    counter!(format!("{}_articles_created_total", METRICS_PREFIX)).increment(1);
}

pub fn record_article_deleted() {
    counter!(format!("{}_articles_deleted_total", METRICS_PREFIX)).increment(1);
}

/// Helper to record list pagination metrics
pub fn record_list_page(returned: usize, has_more: bool) {
    histogram!(format!("{}_list_page_size", METRICS_PREFIX)).record(returned as f64);

    counter!(
        format!("{}_list_pages_total", METRICS_PREFIX),
        "has_more" => has_more.to_string()
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latency_buckets() {
        let mut prev = 0.0;
        for &bucket in LATENCY_BUCKETS {
            assert!(bucket > prev);
            prev = bucket;
        }
    }

    #[test]
    fn test_recorders_without_exporter() {
        // No recorder installed: every call is a no-op and must not panic
        register_metrics();
        let metrics = RequestMetrics::start("GET", "/articles");
        metrics.finish(200);
        record_article_created();
        record_article_deleted();
        record_list_page(3, true);
    }
}
