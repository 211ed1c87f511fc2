//! Progress reporting for the cleanup pipeline.
//!
//! # Example
//!
//! ```rust,ignore
//! use tidy_processing::Pipeline;
//!
//! let result = Pipeline::builder()
//!     .on_progress(|update| {
//!         println!("[{:?}] {}", update.stage, update.message);
//!     })
//!     .build()?
//!     .process(&tables, "dedup by phone");
//! ```

use serde::{Deserialize, Serialize};

/// Stages of the cleanup pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleanupStage {
    /// Validating inputs
    Initializing,
    /// Turning the instruction text into a directive
    ParsingInstructions,
    /// Standardizing, normalizing, filtering and deduplicating each table
    CleaningTables,
    /// Concatenating the cleaned tables
    Merging,
    /// Deduplicating the merged table
    Deduplicating,
    /// Sorting the merged table
    Sorting,
    /// Computing row counts and validity metrics
    Metrics,
    /// Writing output files and building the report
    ReportGeneration,
    /// Pipeline completed successfully
    Complete,
    /// Pipeline failed with an error
    Failed,
}

impl CleanupStage {
    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Initializing => "Initializing",
            Self::ParsingInstructions => "Understanding Instructions",
            Self::CleaningTables => "Cleaning Tables",
            Self::Merging => "Merging Tables",
            Self::Deduplicating => "Removing Duplicates",
            Self::Sorting => "Sorting",
            Self::Metrics => "Computing Metrics",
            Self::ReportGeneration => "Generating Reports",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
        }
    }

    /// Returns the typical weight of this stage in the overall pipeline (0.0 - 1.0).
    ///
    /// Weights of the processing stages sum to 1.0.
    pub fn weight(&self) -> f32 {
        match self {
            Self::Initializing => 0.02,
            Self::ParsingInstructions => 0.03,
            Self::CleaningTables => 0.50,
            Self::Merging => 0.10,
            Self::Deduplicating => 0.10,
            Self::Sorting => 0.05,
            Self::Metrics => 0.05,
            Self::ReportGeneration => 0.15,
            Self::Complete | Self::Failed => 0.0,
        }
    }

    /// Returns the cumulative progress at the start of this stage.
    pub fn base_progress(&self) -> f32 {
        match self {
            Self::Initializing => 0.0,
            Self::ParsingInstructions => 0.02,
            Self::CleaningTables => 0.05,
            Self::Merging => 0.55,
            Self::Deduplicating => 0.65,
            Self::Sorting => 0.75,
            Self::Metrics => 0.80,
            Self::ReportGeneration => 0.85,
            Self::Complete => 1.0,
            Self::Failed => 0.0,
        }
    }
}

/// Progress update sent to a [`ProgressReporter`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Current pipeline stage
    pub stage: CleanupStage,

    /// Optional sub-stage description (e.g., "Table: contacts.csv")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_stage: Option<String>,

    /// Overall progress (0.0 - 1.0)
    pub progress: f32,

    /// Progress within current stage (0.0 - 1.0)
    pub stage_progress: f32,

    /// Human-readable message describing current activity
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items_processed: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items_total: Option<usize>,
}

impl ProgressUpdate {
    /// Creates a new progress update for a stage without sub-stage info.
    pub fn new(stage: CleanupStage, stage_progress: f32, message: impl Into<String>) -> Self {
        let progress = stage.base_progress() + (stage.weight() * stage_progress);
        Self {
            stage,
            sub_stage: None,
            progress: progress.clamp(0.0, 1.0),
            stage_progress: stage_progress.clamp(0.0, 1.0),
            message: message.into(),
            items_processed: None,
            items_total: None,
        }
    }

    /// Creates a new progress update with item counts.
    pub fn with_items(
        stage: CleanupStage,
        sub_stage: impl Into<String>,
        current: usize,
        total: usize,
        message: impl Into<String>,
    ) -> Self {
        let stage_progress = if total > 0 {
            current as f32 / total as f32
        } else {
            0.0
        };
        let mut update = Self::new(stage, stage_progress, message);
        update.sub_stage = Some(sub_stage.into());
        update.items_processed = Some(current);
        update.items_total = Some(total);
        update
    }

    /// Creates a completion progress update.
    pub fn complete(message: impl Into<String>) -> Self {
        Self {
            stage: CleanupStage::Complete,
            sub_stage: None,
            progress: 1.0,
            stage_progress: 1.0,
            message: message.into(),
            items_processed: None,
            items_total: None,
        }
    }

    /// Creates a failed progress update.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            stage: CleanupStage::Failed,
            sub_stage: None,
            progress: 0.0,
            stage_progress: 0.0,
            message: message.into(),
            items_processed: None,
            items_total: None,
        }
    }
}

/// Trait for receiving progress updates during a cleanup run.
///
/// Implementations must be `Send + Sync` so a host can run the pipeline on a
/// worker thread and forward updates to its UI.
pub trait ProgressReporter: Send + Sync {
    /// Called at each stage boundary and once per input table.
    fn report(&self, update: ProgressUpdate);
}

/// Wrapper that implements [`ProgressReporter`] using a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}

static_assertions::assert_impl_all!(ProgressUpdate: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const PROCESSING_STAGES: [CleanupStage; 8] = [
        CleanupStage::Initializing,
        CleanupStage::ParsingInstructions,
        CleanupStage::CleaningTables,
        CleanupStage::Merging,
        CleanupStage::Deduplicating,
        CleanupStage::Sorting,
        CleanupStage::Metrics,
        CleanupStage::ReportGeneration,
    ];

    #[test]
    fn test_stage_weights_sum() {
        let total: f32 = PROCESSING_STAGES.iter().map(|s| s.weight()).sum();
        assert!((total - 1.0).abs() < 0.01, "Weights should sum to ~1.0");
    }

    #[test]
    fn test_base_progress_is_cumulative() {
        let mut expected = 0.0;
        for stage in PROCESSING_STAGES {
            assert!(
                (stage.base_progress() - expected).abs() < 0.001,
                "{:?} starts at {} instead of {}",
                stage,
                stage.base_progress(),
                expected
            );
            expected += stage.weight();
        }
    }

    #[test]
    fn test_progress_update_with_items() {
        let update = ProgressUpdate::with_items(
            CleanupStage::CleaningTables,
            "Table: a.csv",
            1,
            2,
            "Cleaning a.csv",
        );
        assert_eq!(update.sub_stage.as_deref(), Some("Table: a.csv"));
        assert_eq!(update.stage_progress, 0.5);
        assert!((update.progress - 0.30).abs() < 0.001);
        assert_eq!(update.items_total, Some(2));
    }

    #[test]
    fn test_progress_update_complete() {
        let update = ProgressUpdate::complete("Done!");
        assert_eq!(update.stage, CleanupStage::Complete);
        assert_eq!(update.progress, 1.0);
    }

    #[test]
    fn test_stage_json_values() {
        let json = serde_json::to_string(&CleanupStage::ParsingInstructions).unwrap();
        assert_eq!(json, "\"parsing_instructions\"");
        let json = serde_json::to_string(&CleanupStage::ReportGeneration).unwrap();
        assert_eq!(json, "\"report_generation\"");
    }

    #[test]
    fn test_closure_progress_reporter_across_threads() {
        let call_count = Arc::new(AtomicUsize::new(0));
        let call_count_clone = call_count.clone();

        let reporter = Arc::new(ClosureProgressReporter::new(move |_update| {
            call_count_clone.fetch_add(1, Ordering::SeqCst);
        }));

        let reporter_clone = reporter.clone();
        let handle = std::thread::spawn(move || {
            reporter_clone.report(ProgressUpdate::new(CleanupStage::Merging, 0.5, "Test"));
        });

        handle.join().expect("Thread should not panic");
        reporter.report(ProgressUpdate::complete("Done"));
        assert_eq!(call_count.load(Ordering::SeqCst), 2);
    }
}
