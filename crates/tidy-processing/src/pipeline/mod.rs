//! Pipeline module.
//!
//! This module provides the main cleanup pipeline and related components.

mod builder;
mod executor;
pub mod progress;

pub use builder::{Pipeline, PipelineBuilder};
pub use executor::{CleanedTable, CleaningExecutor};
pub use progress::{ClosureProgressReporter, CleanupStage, ProgressReporter, ProgressUpdate};
