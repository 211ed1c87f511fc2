//! Before/after row counts and simple validity counts.

use crate::types::{ColumnRole, DEFAULT_SENTINEL};
use crate::utils::{digits_only, has_column, string_values};
use anyhow::Result;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const ORIGINAL_ROWS: &str = "Original Rows";
pub const FINAL_ROWS: &str = "Final Rows";
pub const ROWS_CLEANED: &str = "Rows Cleaned";
pub const TOTAL_COLUMNS: &str = "Total Columns";
pub const VALID_EMAILS: &str = "Valid Emails";
pub const VALID_PHONES: &str = "Valid Phones";

/// Minimum digit count for a phone number to count as valid.
const MIN_PHONE_DIGITS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    pub label: String,
    pub value: usize,
}

/// Ordered list of `(label, value)` pairs describing a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricsReport {
    metrics: Vec<Metric>,
}

impl MetricsReport {
    fn push(&mut self, label: &str, value: usize) {
        self.metrics.push(Metric {
            label: label.to_string(),
            value,
        });
    }

    /// Value of the metric with the given label.
    pub fn get(&self, label: &str) -> Option<usize> {
        self.metrics
            .iter()
            .find(|m| m.label == label)
            .map(|m| m.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Metric> {
        self.metrics.iter()
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// Two-column `Metric` / `Value` table, as written to the summary file.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let labels: Vec<&str> = self.metrics.iter().map(|m| m.label.as_str()).collect();
        let values: Vec<u64> = self.metrics.iter().map(|m| m.value as u64).collect();
        df!(
            "Metric" => labels,
            "Value" => values
        )
    }
}

/// Computes the metrics table for a cleaned table.
#[derive(Debug, Clone)]
pub struct MetricsCollector {
    sentinel: String,
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new(DEFAULT_SENTINEL)
    }
}

impl MetricsCollector {
    /// `sentinel` is the fill value of the run; cells equal to it, or to
    /// `"N/A"`, never count as valid.
    pub fn new(sentinel: impl Into<String>) -> Self {
        Self {
            sentinel: sentinel.into(),
        }
    }

    fn is_sentinel(&self, value: &str) -> bool {
        value == DEFAULT_SENTINEL || value == self.sentinel
    }

    pub fn collect(&self, df: &DataFrame, original_rows: usize) -> Result<MetricsReport> {
        let mut report = MetricsReport::default();
        report.push(ORIGINAL_ROWS, original_rows);
        report.push(FINAL_ROWS, df.height());
        report.push(ROWS_CLEANED, original_rows.saturating_sub(df.height()));
        report.push(TOTAL_COLUMNS, df.width());

        let email = ColumnRole::Email.as_str();
        if has_column(df, email) {
            let valid = string_values(df, email)?
                .iter()
                .flatten()
                .filter(|v| v.contains('@') && !self.is_sentinel(v))
                .count();
            report.push(VALID_EMAILS, valid);
        }

        let phone = ColumnRole::Phone.as_str();
        if has_column(df, phone) {
            let valid = string_values(df, phone)?
                .iter()
                .flatten()
                .filter(|v| digits_only(v).len() >= MIN_PHONE_DIGITS && !self.is_sentinel(v))
                .count();
            report.push(VALID_PHONES, valid);
        }

        debug!("Collected {} metric(s)", report.len());
        Ok(report)
    }
}

/// Compute metrics with the default `"N/A"` sentinel.
pub fn compute_metrics(df: &DataFrame, original_rows: usize) -> Result<MetricsReport> {
    MetricsCollector::default().collect(df, original_rows)
}
