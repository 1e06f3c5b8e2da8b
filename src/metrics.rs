use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Initialize Prometheus metrics exporter
pub fn init_metrics() -> PrometheusHandle {
    let builder = PrometheusBuilder::new();

    let handle = builder
        .install_recorder()
        .expect("Failed to install Prometheus recorder");

    init_metric_descriptions();

    handle
}

/// Initialize metric descriptions (can be called multiple times safely)
fn init_metric_descriptions() {
    describe_counter!("pricer_quotes_total", "Total number of quotes computed");
    describe_counter!(
        "pricer_rejections_total",
        "Total number of rejected analyze requests"
    );
    describe_histogram!(
        "pricer_quote_duration_seconds",
        "Analyze request duration in seconds"
    );
    describe_histogram!("pricer_upload_bytes", "Uploaded model file size in bytes");
    describe_gauge!("pricer_info", "Pricer version and build information");

    gauge!("pricer_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
}

/// Record a successfully computed quote
pub fn record_quote(material: &str, includes_supports: bool) {
    counter!(
        "pricer_quotes_total",
        "material" => material.to_string(),
        "supports" => if includes_supports { "true" } else { "false" },
    )
    .increment(1);
}

/// Record a rejected analyze request
pub fn record_rejection(kind: &'static str) {
    counter!("pricer_rejections_total", "kind" => kind).increment(1);
}

/// Record the duration of an analyze request
pub fn record_quote_duration(duration: Duration) {
    histogram!("pricer_quote_duration_seconds").record(duration.as_secs_f64());
}

/// Record the size of an accepted upload
pub fn record_upload_size(bytes: u64) {
    histogram!("pricer_upload_bytes").record(bytes as f64);
}
