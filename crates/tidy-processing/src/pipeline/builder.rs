//! Main cleanup pipeline module.
//!
//! This module provides the core `Pipeline` struct and builder for
//! orchestrating the cleanup workflow across one or more input tables.

use crate::cleaner::{concat_tables, dedup, fill_missing, sort_by_column};
use crate::config::{CleanupConfig, ConfigValidationError};
use crate::decisions::{DirectiveParser, RuleBasedInstructionParser};
use crate::error::{CleanupError, Result};
use crate::pipeline::CleaningExecutor;
use crate::pipeline::progress::{
    CleanupStage, ClosureProgressReporter, ProgressReporter, ProgressUpdate,
};
use crate::quality::MetricsCollector;
use crate::reporting::{ReportGenerator, ReportParams};
use crate::types::{
    ActionType, CleaningDirective, CleanupAction, CleanupResult, CleanupSummary, SourceTable,
    TableSummary,
};
use crate::utils::{column_names, has_column};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// The main cleanup pipeline.
///
/// Use [`Pipeline::builder()`] to create a new pipeline with custom configuration.
///
/// # Example
///
/// ```rust,ignore
/// use tidy_processing::{CleanupConfig, Pipeline, SourceTable};
///
/// let result = Pipeline::builder()
///     .config(CleanupConfig::builder().output_name("contacts").build()?)
///     .on_progress(|update| {
///         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
///     })
///     .build()?
///     .process(&tables, "Remove duplicate phones and sort by name")?;
///
/// println!("{}", result.cleaned);
/// ```
pub struct Pipeline {
    config: CleanupConfig,
    parser: Arc<dyn DirectiveParser>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
    executor: CleaningExecutor,
    reporter: ReportGenerator,
}

// Ensure Pipeline is Send (can be moved to another thread)
static_assertions::assert_impl_all!(Pipeline: Send);

fn cleaning_failed(e: anyhow::Error) -> CleanupError {
    CleanupError::CleaningFailed(format!("{:#}", e))
}

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn config(&self) -> &CleanupConfig {
        &self.config
    }

    /// Interpret an instruction without touching any data.
    pub fn parse_instruction(&self, text: &str) -> CleaningDirective {
        self.parser.parse(text)
    }

    /// Clean, merge and summarize `tables` according to a free-text instruction.
    ///
    /// One directive is parsed from `instruction` and shared by every table.
    ///
    /// # Errors
    ///
    /// Returns `Err(CleanupError::NoInputTables)` if `tables` is empty.
    /// Other errors may occur while cleaning or writing outputs.
    pub fn process(&self, tables: &[SourceTable], instruction: &str) -> Result<CleanupResult> {
        let directive = self.parse_instruction(instruction);
        self.run(tables, instruction, directive)
    }

    /// Clean, merge and summarize `tables` with an explicit directive.
    ///
    /// `instruction` is only recorded in the report; pass the text the
    /// directive was derived from, or an empty string.
    pub fn process_with_directive(
        &self,
        tables: &[SourceTable],
        instruction: &str,
        directive: CleaningDirective,
    ) -> Result<CleanupResult> {
        self.run(tables, instruction, directive)
    }

    fn run(
        &self,
        tables: &[SourceTable],
        instruction: &str,
        directive: CleaningDirective,
    ) -> Result<CleanupResult> {
        match self.process_internal(tables, instruction, directive) {
            Ok(result) => {
                self.report_progress(ProgressUpdate::complete("Cleanup completed successfully"));
                Ok(result)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Pipeline error: {}", e);
                Err(e)
            }
        }
    }

    /// Report progress if a reporter is configured.
    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn process_internal(
        &self,
        tables: &[SourceTable],
        instruction: &str,
        directive: CleaningDirective,
    ) -> Result<CleanupResult> {
        let start_time = Instant::now();

        info!("Starting cleanup pipeline...");
        self.report_progress(ProgressUpdate::new(
            CleanupStage::Initializing,
            0.0,
            "Starting cleanup pipeline...",
        ));

        if tables.is_empty() {
            return Err(CleanupError::NoInputTables);
        }

        self.report_progress(ProgressUpdate::new(
            CleanupStage::ParsingInstructions,
            1.0,
            "Instructions understood",
        ));
        info!("Understood actions: {}", directive.describe().join("; "));

        let mut summary = CleanupSummary::new();
        summary.rows_before = tables.iter().map(SourceTable::height).sum();

        // Step 1: Clean every table independently
        info!("Step 1: Cleaning {} table(s)...", tables.len());
        let mut cleaned_tables = Vec::with_capacity(tables.len());
        for (i, table) in tables.iter().enumerate() {
            self.report_progress(ProgressUpdate::with_items(
                CleanupStage::CleaningTables,
                format!("Table: {}", table.name),
                i,
                tables.len(),
                format!("Cleaning {}...", table.name),
            ));

            let cleaned = self
                .executor
                .clean_table(table, &directive)
                .map_err(cleaning_failed)?;

            summary.tables.push(TableSummary {
                source: cleaned.source.clone(),
                rows_in: cleaned.rows_in,
                rows_out: cleaned.rows_out(),
                columns: column_names(&cleaned.data),
            });
            for action in &cleaned.actions {
                summary.add_action(action.clone());
            }
            cleaned_tables.push(cleaned.data);
        }

        // Step 2: Merge in input order
        self.report_progress(ProgressUpdate::new(
            CleanupStage::Merging,
            0.0,
            "Merging tables...",
        ));
        info!("Step 2: Merging tables...");
        let table_count = cleaned_tables.len();
        let merged = concat_tables(cleaned_tables)
            .map_err(|e| CleanupError::MergeFailed(format!("{:#}", e)))?;
        // Tables were filled during cleaning; only cells created by the
        // column union are still null here.
        let merged = fill_missing(merged, &directive.fill_value).map_err(cleaning_failed)?;
        if table_count > 1 {
            summary.add_action(CleanupAction::new(
                ActionType::TablesMerged,
                "merged",
                format!("Merged {} tables into {} row(s)", table_count, merged.height()),
            ));
        }

        // Step 3: Deduplicate across tables
        self.report_progress(ProgressUpdate::new(
            CleanupStage::Deduplicating,
            0.0,
            "Removing duplicates across tables...",
        ));
        info!("Step 3: Removing duplicates across tables...");
        let before = merged.height();
        let merged = dedup(merged, directive.dedup_strategy).map_err(cleaning_failed)?;
        if merged.height() < before {
            summary.add_action(CleanupAction::new(
                ActionType::DuplicatesRemoved,
                "merged",
                format!(
                    "Removed {} duplicate row(s) across tables by {}",
                    before - merged.height(),
                    directive.dedup_strategy
                ),
            ));
        }

        // Step 4: Sort
        let mut cleaned = match directive.sort_key {
            Some(key) if has_column(&merged, key.column()) => {
                self.report_progress(ProgressUpdate::new(
                    CleanupStage::Sorting,
                    0.0,
                    format!("Sorting by {}...", key),
                ));
                info!("Step 4: Sorting by {}...", key);
                let sorted = sort_by_column(merged, key.column(), &directive.fill_value)
                    .map_err(cleaning_failed)?;
                summary.add_action(CleanupAction::new(
                    ActionType::RowsSorted,
                    key.column(),
                    format!("Sorted rows by {}", key),
                ));
                sorted
            }
            Some(key) => {
                debug!("Step 4: Sort column '{}' not present, skipping", key);
                merged
            }
            None => merged,
        };

        // Step 5: Metrics
        self.report_progress(ProgressUpdate::new(
            CleanupStage::Metrics,
            0.0,
            "Computing metrics...",
        ));
        info!("Step 5: Computing metrics...");
        let metrics = MetricsCollector::new(directive.fill_value.clone())
            .collect(&cleaned, summary.rows_before)
            .map_err(cleaning_failed)?;

        summary.rows_after = cleaned.height();
        summary.rows_removed = summary.rows_before.saturating_sub(summary.rows_after);
        summary.columns_after = cleaned.width();

        let loss = summary.rows_removed_percentage();
        if f64::from(loss) > self.config.high_loss_warning_threshold * 100.0 {
            let warning = format!("High data loss: {:.1}% of rows were removed", loss);
            warn!("{}", warning);
            summary.add_warning(warning);
        }

        // Step 6: Output files
        let mut output_files = Vec::new();
        if self.config.save_to_disk {
            self.report_progress(ProgressUpdate::new(
                CleanupStage::ReportGeneration,
                0.0,
                "Saving output files...",
            ));
            info!("Step 6: Saving output files...");

            output_files.push(
                self.reporter
                    .write_cleaned_data(&mut cleaned)
                    .map_err(|e| CleanupError::ReportGenerationFailed(format!("{:#}", e)))?,
            );
            output_files.push(
                self.reporter
                    .write_summary(&metrics)
                    .map_err(|e| CleanupError::ReportGenerationFailed(format!("{:#}", e)))?,
            );
            if self.config.generate_reports {
                output_files.push(self.reporter.report_path());
            }
        }

        summary.duration_ms = start_time.elapsed().as_millis() as u64;

        let input_files: Vec<String> = tables.iter().map(|t| t.name.clone()).collect();
        let report = ReportGenerator::build_report(ReportParams {
            input_files: &input_files,
            output_files: &output_files,
            instruction,
            directive: &directive,
            metrics: &metrics,
            summary: &summary,
            cleaned: &cleaned,
        })
        .map_err(|e| CleanupError::ReportGenerationFailed(format!("{:#}", e)))?;

        if self.config.save_to_disk && self.config.generate_reports {
            self.reporter
                .write_report_to_file(&report)
                .map_err(|e| CleanupError::ReportGenerationFailed(format!("{:#}", e)))?;
        }

        self.report_progress(ProgressUpdate::new(
            CleanupStage::ReportGeneration,
            1.0,
            "Report ready",
        ));

        info!(
            "Cleanup finished: {} -> {} row(s) in {} ms",
            summary.rows_before, summary.rows_after, summary.duration_ms
        );

        Ok(CleanupResult {
            directive,
            cleaned,
            metrics,
            summary,
            report,
            output_files,
        })
    }
}

/// Builder for creating a [`Pipeline`] instance.
///
/// Use [`Pipeline::builder()`] to get started.
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<CleanupConfig>,
    parser: Option<Arc<dyn DirectiveParser>>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

// Ensure PipelineBuilder is Send (can be moved to another thread during construction)
static_assertions::assert_impl_all!(PipelineBuilder: Send);

impl PipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: CleanupConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Replace the instruction parser.
    ///
    /// Defaults to [`RuleBasedInstructionParser`].
    pub fn parser(mut self, parser: Arc<dyn DirectiveParser>) -> Self {
        self.parser = Some(parser);
        self
    }

    /// Set a progress reporter for receiving updates during processing.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    ///
    /// This is a convenience method for simple progress handling.
    /// For more complex scenarios, use [`progress_reporter`](Self::progress_reporter).
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> std::result::Result<Pipeline, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let reporter = ReportGenerator::new(config.output_dir.clone(), config.output_name.clone());

        Ok(Pipeline {
            config,
            parser: self
                .parser
                .unwrap_or_else(|| Arc::new(RuleBasedInstructionParser::new())),
            progress_reporter: self.progress_reporter,
            executor: CleaningExecutor,
            reporter,
        })
    }
}
