use crate::cleaner::is_well_formed_email;
use crate::quality::MetricsReport;
use crate::types::{CleaningDirective, CleanupSummary, ColumnRole};
use crate::utils::{has_column, string_values};
use anyhow::Result;
use chrono::Local;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

// ============================================================================
// Run Report Types
// ============================================================================

/// Full record of a cleanup run.
///
/// Use this for both JSON output (`--json`) and file writing (`--emit-report`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupReport {
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Names of the input sources, in merge order
    pub input_files: Vec<String>,
    /// Files written by the run (empty when nothing was saved)
    pub output_files: Vec<String>,
    /// Instruction text as given by the user
    pub instruction: String,
    pub directive: CleaningDirective,
    /// "Here's what I understood" list shown before cleaning
    pub understood_actions: Vec<String>,
    pub metrics: MetricsReport,
    pub summary: CleanupSummary,
    /// Emails passing a format check. Informational only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub well_formed_emails: Option<usize>,
}

/// Parameters for building a run report.
pub struct ReportParams<'a> {
    pub input_files: &'a [String],
    pub output_files: &'a [PathBuf],
    pub instruction: &'a str,
    pub directive: &'a CleaningDirective,
    pub metrics: &'a MetricsReport,
    pub summary: &'a CleanupSummary,
    pub cleaned: &'a DataFrame,
}

/// Writes the cleaned table, the summary table and the run report.
pub struct ReportGenerator {
    output_dir: PathBuf,
    output_name: String,
}

impl ReportGenerator {
    /// Create a new ReportGenerator with custom output settings.
    pub fn new(output_dir: impl Into<PathBuf>, output_name: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            output_name: output_name.into(),
        }
    }

    pub fn cleaned_data_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}_Cleaned_Data.csv", self.output_name))
    }

    pub fn summary_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}_Summary.csv", self.output_name))
    }

    pub fn report_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}_report.json", self.output_name))
    }

    /// Write the cleaned table as CSV.
    pub fn write_cleaned_data(&self, df: &mut DataFrame) -> Result<PathBuf> {
        let path = self.cleaned_data_path();
        write_csv(&path, df)?;
        info!("Cleaned data saved: {}", path.display());
        Ok(path)
    }

    /// Write the metrics table as CSV.
    pub fn write_summary(&self, metrics: &MetricsReport) -> Result<PathBuf> {
        let path = self.summary_path();
        let mut df = metrics.to_dataframe()?;
        write_csv(&path, &mut df)?;
        info!("Summary saved: {}", path.display());
        Ok(path)
    }

    /// Build a run report from pipeline results.
    ///
    /// This method creates a single, unified report structure that can be:
    /// - Serialized to JSON and printed to stdout (`--json`)
    /// - Written to a file (`--emit-report`)
    /// - Used programmatically in library mode
    pub fn build_report(params: ReportParams<'_>) -> Result<CleanupReport> {
        let ReportParams {
            input_files,
            output_files,
            instruction,
            directive,
            metrics,
            summary,
            cleaned,
        } = params;

        let email = ColumnRole::Email.as_str();
        let well_formed_emails = if has_column(cleaned, email) {
            Some(
                string_values(cleaned, email)?
                    .iter()
                    .flatten()
                    .filter(|v| is_well_formed_email(v))
                    .count(),
            )
        } else {
            None
        };

        Ok(CleanupReport {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input_files: input_files.to_vec(),
            output_files: output_files
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            instruction: instruction.to_string(),
            directive: directive.clone(),
            understood_actions: directive.describe(),
            metrics: metrics.clone(),
            summary: summary.clone(),
            well_formed_emails,
        })
    }

    /// Write a run report to `<output_name>_report.json`.
    pub fn write_report_to_file(&self, report: &CleanupReport) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let report_path = self.report_path();
        let mut file = File::create(&report_path)?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());

        Ok(report_path)
    }
}

fn write_csv(path: &Path, df: &mut DataFrame) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .finish(df)?;
    Ok(())
}
