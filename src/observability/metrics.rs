//! # Metrics Collection
//!
//! Prometheus metrics for authentication outcomes, form operations, and HTTP
//! traffic. Recording is a no-op until [`init_metrics`] installs the exporter.

use crate::config::ObservabilityConfig;
use crate::errors::{Error, Result};
use ::tracing::{info, warn};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram, Unit};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Metrics recorder that tracks application metrics
#[derive(Debug, Clone, Default)]
pub struct MetricsRecorder;

impl MetricsRecorder {
    /// Create a new metrics recorder instance
    pub fn new() -> Self {
        Self
    }

    /// Record an HTTP request
    pub fn record_http_request(&self, method: &str, path: &str, status: u16, duration: f64) {
        let request_labels = [
            ("method", method.to_string()),
            ("path", path.to_string()),
            ("status", status.to_string()),
        ];
        counter!("http_requests_total", &request_labels).increment(1);

        let duration_labels = [("method", method.to_string())];
        histogram!("http_request_duration_seconds", &duration_labels).record(duration);
    }

    /// Record authentication attempt outcome
    pub fn record_authentication(&self, status: &str) {
        let labels = [("status", status.to_string())];
        counter!("auth_attempts_total", &labels).increment(1);
    }

    /// Record a token issued or rotated from the CLI
    pub fn record_token_issued(&self, rotated: bool) {
        let kind = if rotated { "rotated" } else { "created" };
        counter!("auth_tokens_issued_total", "kind" => kind).increment(1);
    }

    /// Record the outcome of a form service operation
    pub fn record_form_operation(&self, operation: &str, outcome: &str) {
        let labels = [("operation", operation.to_string()), ("outcome", outcome.to_string())];
        counter!("form_operations_total", &labels).increment(1);
    }

    /// Update the stored-forms gauge
    pub fn set_forms_total(&self, count: i64) {
        gauge!("forms_stored_total").set(count as f64);
    }

    fn register(&self) {
        describe_counter!("http_requests_total", Unit::Count, "HTTP requests by method, path and status");
        describe_histogram!(
            "http_request_duration_seconds",
            Unit::Seconds,
            "HTTP request latency"
        );
        describe_counter!(
            "auth_attempts_total",
            Unit::Count,
            "Authentication attempts grouped by outcome"
        );
        describe_counter!("auth_tokens_issued_total", Unit::Count, "Bearer tokens issued");
        describe_counter!(
            "form_operations_total",
            Unit::Count,
            "Form operations grouped by operation and outcome"
        );
        describe_gauge!("forms_stored_total", Unit::Count, "Forms currently stored");
    }
}

static METRICS: once_cell::sync::Lazy<Arc<RwLock<Option<MetricsRecorder>>>> =
    once_cell::sync::Lazy::new(|| Arc::new(RwLock::new(None)));

/// Initialize metrics collection and Prometheus exporter
pub async fn init_metrics(config: &ObservabilityConfig) -> Result<()> {
    if !config.enable_metrics {
        return Ok(());
    }

    let metrics_addr = match config.metrics_bind_address() {
        Some(addr) => addr,
        None => {
            warn!("Metrics disabled: no bind address configured");
            return Ok(());
        }
    };

    let socket_addr: SocketAddr = metrics_addr.parse().map_err(|e| {
        Error::config(format!("Invalid metrics bind address '{}': {}", metrics_addr, e))
    })?;

    PrometheusBuilder::new()
        .with_http_listener(socket_addr)
        .add_global_label("service", &config.service_name)
        .install()
        .map_err(|e| Error::config(format!("Failed to initialize metrics exporter: {}", e)))?;

    let recorder = MetricsRecorder::new();
    {
        let mut metrics = METRICS.write().await;
        *metrics = Some(recorder.clone());
    }
    recorder.register();

    info!(
        metrics_addr = %metrics_addr,
        service_name = %config.service_name,
        "Metrics collection initialized"
    );

    Ok(())
}

/// Get the global metrics recorder
pub async fn get_metrics() -> Option<MetricsRecorder> {
    METRICS.read().await.clone()
}

/// Record an HTTP request using the global metrics recorder
pub async fn record_http_request(method: &str, path: &str, status: u16, duration: f64) {
    if let Some(metrics) = get_metrics().await {
        metrics.record_http_request(method, path, status, duration);
    }
}

/// Record authentication attempt outcome via the global recorder
pub async fn record_authentication(status: &str) {
    if let Some(metrics) = get_metrics().await {
        metrics.record_authentication(status);
    }
}

/// Record token issuance via the global recorder
pub async fn record_token_issued(rotated: bool) {
    if let Some(metrics) = get_metrics().await {
        metrics.record_token_issued(rotated);
    }
}

/// Record a form operation outcome via the global recorder
pub async fn record_form_operation(operation: &str, outcome: &str) {
    if let Some(metrics) = get_metrics().await {
        metrics.record_form_operation(operation, outcome);
    }
}

/// Update the stored-forms gauge via the global recorder
pub async fn set_forms_total(count: i64) {
    if let Some(metrics) = get_metrics().await {
        metrics.set_forms_total(count);
    }
}
