//! Configuration types for the cleanup pipeline.
//!
//! Run-level settings (where output goes, what gets written) live here.
//! What to *do* to the data lives in [`CleaningDirective`](crate::types::CleaningDirective),
//! which is parsed from the user's instruction on every run.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default base name for output files.
pub const DEFAULT_OUTPUT_NAME: &str = "cleaned_data";

/// Configuration for the cleanup pipeline.
///
/// Use [`CleanupConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use tidy_processing::config::CleanupConfig;
///
/// let config = CleanupConfig::builder()
///     .output_dir("results")
///     .output_name("contacts")
///     .save_to_disk(true)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupConfig {
    /// Directory for the cleaned table, summary table and JSON report.
    /// Default: "outputs"
    pub output_dir: PathBuf,

    /// Base name (without extension) for output files.
    /// Default: "cleaned_data"
    pub output_name: String,

    /// Whether to write the cleaned table and summary table to disk.
    /// When false, results are kept in memory only.
    /// Default: true
    pub save_to_disk: bool,

    /// Whether to also write the JSON run report next to the tables.
    /// Only honoured when `save_to_disk` is true.
    /// Default: true
    pub generate_reports: bool,

    /// Fraction of input rows (0.0 - 1.0) that may be removed before the
    /// run summary carries a data-loss warning.
    /// Default: 0.3
    pub high_loss_warning_threshold: f64,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("outputs"),
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
            save_to_disk: true,
            generate_reports: true,
            high_loss_warning_threshold: 0.3,
        }
    }
}

impl CleanupConfig {
    /// Create a new configuration builder.
    pub fn builder() -> CleanupConfigBuilder {
        CleanupConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let name = self.output_name.trim();
        if name.is_empty() {
            return Err(ConfigValidationError::EmptyOutputName);
        }
        if name.contains(['/', '\\']) {
            return Err(ConfigValidationError::InvalidOutputName(
                self.output_name.clone(),
            ));
        }

        if !(0.0..=1.0).contains(&self.high_loss_warning_threshold) {
            return Err(ConfigValidationError::InvalidThreshold {
                field: "high_loss_warning_threshold".to_string(),
                value: self.high_loss_warning_threshold,
            });
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Output name must not be empty")]
    EmptyOutputName,

    #[error("Invalid output name '{0}': must not contain path separators")]
    InvalidOutputName(String),

    #[error("Invalid threshold for '{field}': {value} (must be between 0.0 and 1.0)")]
    InvalidThreshold { field: String, value: f64 },
}

/// Builder for [`CleanupConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct CleanupConfigBuilder {
    output_dir: Option<PathBuf>,
    output_name: Option<String>,
    save_to_disk: Option<bool>,
    generate_reports: Option<bool>,
    high_loss_warning_threshold: Option<f64>,
}

impl CleanupConfigBuilder {
    /// Set the output directory for the cleaned data and reports.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Set the base output file name (without extension).
    ///
    /// Output files are named `<name>_Cleaned_Data.csv`, `<name>_Summary.csv`
    /// and `<name>_report.json`.
    pub fn output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = Some(name.into());
        self
    }

    /// Enable or disable saving output tables to disk.
    pub fn save_to_disk(mut self, save: bool) -> Self {
        self.save_to_disk = Some(save);
        self
    }

    /// Enable or disable writing the JSON run report.
    pub fn generate_reports(mut self, generate: bool) -> Self {
        self.generate_reports = Some(generate);
        self
    }

    /// Set the removed-rows fraction above which a warning is recorded.
    ///
    /// # Arguments
    /// * `threshold` - Value between 0.0 and 1.0 (e.g., 0.3 = 30%)
    pub fn high_loss_warning_threshold(mut self, threshold: f64) -> Self {
        self.high_loss_warning_threshold = Some(threshold);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `CleanupConfig` or an error if validation fails.
    pub fn build(self) -> Result<CleanupConfig, ConfigValidationError> {
        let defaults = CleanupConfig::default();
        let config = CleanupConfig {
            output_dir: self.output_dir.unwrap_or(defaults.output_dir),
            output_name: self.output_name.unwrap_or(defaults.output_name),
            save_to_disk: self.save_to_disk.unwrap_or(defaults.save_to_disk),
            generate_reports: self.generate_reports.unwrap_or(defaults.generate_reports),
            high_loss_warning_threshold: self
                .high_loss_warning_threshold
                .unwrap_or(defaults.high_loss_warning_threshold),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CleanupConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("outputs"));
        assert_eq!(config.output_name, "cleaned_data");
        assert!(config.save_to_disk);
        assert!(config.generate_reports);
        assert_eq!(config.high_loss_warning_threshold, 0.3);
    }

    #[test]
    fn test_builder_custom_values() {
        let config = CleanupConfig::builder()
            .output_dir("results")
            .output_name("contacts")
            .save_to_disk(false)
            .generate_reports(false)
            .high_loss_warning_threshold(0.5)
            .build()
            .unwrap();

        assert_eq!(config.output_dir, PathBuf::from("results"));
        assert_eq!(config.output_name, "contacts");
        assert!(!config.save_to_disk);
        assert!(!config.generate_reports);
        assert_eq!(config.high_loss_warning_threshold, 0.5);
    }

    #[test]
    fn test_validation_empty_output_name() {
        let result = CleanupConfig::builder().output_name("  ").build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::EmptyOutputName
        ));
    }

    #[test]
    fn test_validation_output_name_with_separator() {
        let result = CleanupConfig::builder().output_name("../escape").build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidOutputName(_)
        ));
    }

    #[test]
    fn test_validation_invalid_threshold() {
        let result = CleanupConfig::builder()
            .high_loss_warning_threshold(1.5)
            .build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidThreshold { .. }
        ));
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "output_dir": "custom_output",
            "output_name": "merged",
            "save_to_disk": false,
            "generate_reports": false,
            "high_loss_warning_threshold": 0.25
        }"#;

        let config: CleanupConfig = serde_json::from_str(json).expect("Should deserialize");
        assert_eq!(config.output_dir.to_str().unwrap(), "custom_output");
        assert_eq!(config.output_name, "merged");
        assert!(!config.save_to_disk);
        assert!(!config.generate_reports);
        assert_eq!(config.high_loss_warning_threshold, 0.25);
    }
}
