//! Document store metrics.

use metrics::counter;

/// Metric name constants for consistency.
pub mod names {
    /// Total store operations by collection, operation and outcome.
    pub const OPERATIONS_TOTAL: &str = "jobboard_docstore_operations_total";
}

/// Record a completed store operation.
pub fn record_operation(collection: &str, operation: &str, ok: bool) {
    counter!(
        names::OPERATIONS_TOTAL,
        "collection" => collection.to_string(),
        "operation" => operation.to_string(),
        "outcome" => if ok { "ok" } else { "error" }
    )
    .increment(1);
}
