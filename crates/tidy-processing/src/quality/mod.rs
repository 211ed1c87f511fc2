//! Run metrics.
//!
//! This module compares the final table against the input row count and
//! counts plausibly valid emails and phone numbers.

mod metrics;

pub use metrics::{
    FINAL_ROWS, Metric, MetricsCollector, MetricsReport, ORIGINAL_ROWS, ROWS_CLEANED,
    TOTAL_COLUMNS, VALID_EMAILS, VALID_PHONES, compute_metrics,
};
