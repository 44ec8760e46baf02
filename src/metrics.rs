//! Prometheus counters for the command layer, exposed in text format at
//! `/metrics`. Counters live here rather than in the command files so a
//! single registry owns everything the endpoint reports.

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounter, Registry, TextEncoder};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();
    pub static ref PO_CREATIONS: IntCounter = register(IntCounter::new(
        "purchase_order_creations_total",
        "Total number of purchase orders created"
    )
    .expect("metric can be created"));
    pub static ref PO_CREATION_FAILURES: IntCounter = register(IntCounter::new(
        "purchase_order_creation_failures_total",
        "Total number of failed purchase order creations"
    )
    .expect("metric can be created"));
    pub static ref PO_DELETIONS: IntCounter = register(IntCounter::new(
        "purchase_order_deletions_total",
        "Total number of purchase orders deleted"
    )
    .expect("metric can be created"));
    pub static ref PO_VOIDS: IntCounter = register(IntCounter::new(
        "purchase_order_voids_total",
        "Total number of purchase orders voided"
    )
    .expect("metric can be created"));
}

fn register(counter: IntCounter) -> IntCounter {
    REGISTRY
        .register(Box::new(counter.clone()))
        .expect("metric can be registered");
    counter
}

/// Renders the registry in Prometheus text exposition format.
pub fn export() -> Result<String, prometheus::Error> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&REGISTRY.gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}

pub async fn metrics_handler() -> impl IntoResponse {
    match export() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics error: {}", e),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_includes_registered_counters() {
        PO_CREATIONS.inc();
        PO_VOIDS.inc();

        let body = export().expect("export should succeed");
        assert!(body.contains("purchase_order_creations_total"));
        assert!(body.contains("purchase_order_creation_failures_total"));
        assert!(body.contains("purchase_order_deletions_total"));
        assert!(body.contains("purchase_order_voids_total"));
    }
}
