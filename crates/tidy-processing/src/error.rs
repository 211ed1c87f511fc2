//! Custom error types for the cleanup pipeline.
//!
//! This module provides the error hierarchy using `thiserror`.
//!
//! Errors are serializable as `{code, message}` so a host application
//! (GUI, web handler, CLI `--json` mode) can surface them without
//! matching on the enum directly.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the cleanup pipeline.
#[derive(Error, Debug)]
pub enum CleanupError {
    /// A source table could not be read. Fatal for the whole run.
    #[error("Couldn't read {path}: {reason}")]
    SourceRead { path: String, reason: String },

    /// The pipeline was invoked without any input tables.
    #[error("No input tables provided")]
    NoInputTables,

    /// Column was not found in a table.
    #[error("Column '{0}' not found in table")]
    ColumnNotFound(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A cleaning stage failed.
    #[error("Failed to clean data: {0}")]
    CleaningFailed(String),

    /// Merging the per-table results failed.
    #[error("Failed to merge tables: {0}")]
    MergeFailed(String),

    /// Writing output files or building the run report failed.
    #[error("Failed to generate report: {0}")]
    ReportGenerationFailed(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<CleanupError>,
    },
}

impl CleanupError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        CleanupError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get a stable error code for programmatic handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::SourceRead { .. } => "SOURCE_READ_FAILED",
            Self::NoInputTables => "NO_INPUT_TABLES",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::CleaningFailed(_) => "CLEANING_FAILED",
            Self::MergeFailed(_) => "MERGE_FAILED",
            Self::ReportGenerationFailed(_) => "REPORT_GENERATION_FAILED",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error came from reading an input source.
    pub fn is_source_error(&self) -> bool {
        match self {
            Self::SourceRead { .. } => true,
            Self::WithContext { source, .. } => source.is_source_error(),
            _ => false,
        }
    }

    /// Check if this error is recoverable (the caller can fix the input and retry).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::SourceRead { .. } | Self::NoInputTables | Self::InvalidConfig(_)
        )
    }
}

impl Serialize for CleanupError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("CleanupError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for cleanup operations.
pub type Result<T> = std::result::Result<T, CleanupError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| CleanupError::Polars(e).with_context(context))
    }
}
