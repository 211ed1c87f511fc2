//! Contact Table Cleanup Library
//!
//! Instruction-driven cleanup and merge of contact tables, built with Rust and Polars.
//!
//! # Overview
//!
//! A run takes one or more contact tables plus a free-text instruction such as
//! `"dedup by phone, sort by name and fill missing with Unknown"` and produces a
//! single cleaned table:
//!
//! - **Instruction Parsing**: Keyword rules turn the text into a [`CleaningDirective`]
//! - **Header Standardization**: `Full Name`, `customer_name`, ... become `name`
//! - **Normalization**: Lower-cased emails with common domain typos fixed, US phone formatting
//! - **Filtering**: Rows empty in required columns, or incomplete rows, are dropped
//! - **Deduplication**: Per table and again across the merged table
//! - **Metrics & Reports**: Row counts, valid email/phone counts, CSV and JSON outputs
//! - **Progress Reporting**: Stage updates for a host UI
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tidy_processing::{CleanupConfig, Pipeline, ingest::load_sources};
//!
//! let tables = load_sources(&["contacts_a.csv", "contacts_b.csv"])?;
//!
//! let result = Pipeline::builder()
//!     .config(CleanupConfig::builder().output_dir("outputs").build()?)
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .process(&tables, "Remove duplicate phones and sort by name")?;
//!
//! println!("{} -> {} rows", result.summary.rows_before, result.summary.rows_after);
//! for metric in result.metrics.iter() {
//!     println!("{}: {}", metric.label, metric.value);
//! }
//! ```
//!
//! # Instructions
//!
//! Instructions are matched case-insensitively against keyword rules.
//! Unrecognized text falls back to the default directive: deduplicate by
//! email, fill missing values with `N/A`, no sorting and no filtering.
//!
//! ```rust,ignore
//! use tidy_processing::{DedupStrategy, SortKey, parse_instructions};
//!
//! let directive = parse_instructions("Dedup by name and phone, then sort by age");
//! assert_eq!(directive.dedup_strategy, DedupStrategy::NamePhone);
//! assert_eq!(directive.sort_key, Some(SortKey::Age));
//! ```

pub mod cleaner;
pub mod config;
pub mod decisions;
pub mod error;
pub mod ingest;
pub mod pipeline;
pub mod quality;
pub mod reporting;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use cleaner::{
    concat_tables, dedup, fill_missing, normalize_email, normalize_phone, sort_by_column,
    standardize_headers,
};
pub use config::{CleanupConfig, CleanupConfigBuilder, ConfigValidationError};
pub use decisions::{DirectiveParser, RuleBasedInstructionParser, parse_instructions};
pub use error::{CleanupError, Result as TidyResult, ResultExt};
pub use ingest::{load_source, load_sources};
pub use pipeline::{
    CleanedTable, CleaningExecutor, CleanupStage, ClosureProgressReporter, Pipeline,
    PipelineBuilder, ProgressReporter, ProgressUpdate,
};
pub use quality::{Metric, MetricsCollector, MetricsReport, compute_metrics};
pub use reporting::{CleanupReport, ReportGenerator, ReportParams};
pub use types::{
    ActionType, Cell, CleaningDirective, CleanupAction, CleanupResult, CleanupSummary,
    ColumnRole, DEFAULT_SENTINEL, DedupStrategy, SortKey, SourceTable, TableSummary,
};
pub use utils::{clean_numeric_string, is_blank, is_missing_marker, parse_numeric_string};
