//! Report generation module.
//!
//! This module writes the cleaned table (`<name>_Cleaned_Data.csv`), the
//! metrics table (`<name>_Summary.csv`) and the JSON run report
//! (`<name>_report.json`).
//!
//! # Example
//!
//! ```rust,ignore
//! use tidy_processing::reporting::ReportGenerator;
//!
//! let generator = ReportGenerator::new("outputs", "contacts");
//! generator.write_cleaned_data(&mut result.cleaned)?;
//! generator.write_summary(&result.metrics)?;
//! generator.write_report_to_file(&result.report)?;
//! ```

mod generator;

pub use generator::{CleanupReport, ReportGenerator, ReportParams};
