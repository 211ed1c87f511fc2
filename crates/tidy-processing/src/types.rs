use crate::quality::MetricsReport;
use crate::reporting::CleanupReport;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Marker written in place of a missing value unless the directive says otherwise.
pub const DEFAULT_SENTINEL: &str = "N/A";

// ============================================================================
// Cells and column roles
// ============================================================================

/// A single cell value after missing-value resolution.
///
/// Raw data carries "missing" in several shapes (true nulls, stringified
/// markers like `"nan"`, the business sentinel `"N/A"`). They are all folded
/// into [`Cell::Missing`] once, so later stages never re-test string literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell<'a> {
    Text(&'a str),
    Missing,
}

impl<'a> Cell<'a> {
    pub fn as_text(&self) -> Option<&'a str> {
        match self {
            Cell::Text(s) => Some(s),
            Cell::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }
}

impl<'a> From<Option<&'a str>> for Cell<'a> {
    fn from(value: Option<&'a str>) -> Self {
        match value {
            Some(s) => Cell::Text(s),
            None => Cell::Missing,
        }
    }
}

impl<'a> From<&'a str> for Cell<'a> {
    fn from(value: &'a str) -> Self {
        Cell::Text(value)
    }
}

impl<'a> From<&'a String> for Cell<'a> {
    fn from(value: &'a String) -> Self {
        Cell::Text(value.as_str())
    }
}

/// Canonical semantic role of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnRole {
    Name,
    Email,
    Age,
    Phone,
    Notes,
}

impl ColumnRole {
    pub const ALL: [ColumnRole; 5] = [
        ColumnRole::Name,
        ColumnRole::Email,
        ColumnRole::Age,
        ColumnRole::Phone,
        ColumnRole::Notes,
    ];

    /// Canonical column name for this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Age => "age",
            Self::Phone => "phone",
            Self::Notes => "notes",
        }
    }
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Cleaning directive
// ============================================================================

/// Column the merged table can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Name,
    Age,
}

impl SortKey {
    pub fn role(&self) -> ColumnRole {
        match self {
            Self::Name => ColumnRole::Name,
            Self::Age => ColumnRole::Age,
        }
    }

    pub fn column(&self) -> &'static str {
        self.role().as_str()
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

const EMAIL_KEY: &[&str] = &["email"];
const PHONE_KEY: &[&str] = &["phone"];
const NAME_EMAIL_KEY: &[&str] = &["name", "email"];
const NAME_PHONE_KEY: &[&str] = &["name", "phone"];

/// Which columns decide that two records are duplicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupStrategy {
    #[default]
    Email,
    Phone,
    NameEmail,
    NamePhone,
    AllColumns,
}

impl DedupStrategy {
    /// Key columns for this strategy, or `None` when every column is the key.
    pub fn key_columns(&self) -> Option<&'static [&'static str]> {
        match self {
            Self::Email => Some(EMAIL_KEY),
            Self::Phone => Some(PHONE_KEY),
            Self::NameEmail => Some(NAME_EMAIL_KEY),
            Self::NamePhone => Some(NAME_PHONE_KEY),
            Self::AllColumns => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Phone => "phone",
            Self::NameEmail => "name_email",
            Self::NamePhone => "name_phone",
            Self::AllColumns => "all_columns",
        }
    }

    /// Human-readable description of the duplicate rule.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Email => "Remove duplicate rows (by email)",
            Self::Phone => "Remove duplicate rows (by phone)",
            Self::NameEmail => "Remove duplicates (by name + email)",
            Self::NamePhone => "Remove duplicates (by name + phone)",
            Self::AllColumns => "Remove exact duplicate rows",
        }
    }
}

impl fmt::Display for DedupStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured form of a free-text cleaning request.
///
/// One directive is shared by every input table of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningDirective {
    /// Value written into missing cells of the output.
    pub fill_value: String,
    pub sort_key: Option<SortKey>,
    /// Rows missing a value in any of these columns are dropped.
    pub filter_empty_columns: Vec<ColumnRole>,
    pub keep_only_complete_rows: bool,
    pub dedup_strategy: DedupStrategy,
    /// Not settable from instruction text.
    pub normalize_email: bool,
    /// Not settable from instruction text.
    pub normalize_phone: bool,
}

impl Default for CleaningDirective {
    fn default() -> Self {
        Self {
            fill_value: DEFAULT_SENTINEL.to_string(),
            sort_key: None,
            filter_empty_columns: Vec::new(),
            keep_only_complete_rows: false,
            dedup_strategy: DedupStrategy::default(),
            normalize_email: true,
            normalize_phone: true,
        }
    }
}

impl CleaningDirective {
    /// Add a row filter for `role`, ignoring repeats.
    pub fn add_filter(&mut self, role: ColumnRole) {
        if !self.filter_empty_columns.contains(&role) {
            self.filter_empty_columns.push(role);
        }
    }

    /// List the actions this directive will perform, for confirmation by the user.
    pub fn describe(&self) -> Vec<String> {
        let mut actions = vec![self.dedup_strategy.description().to_string()];

        if self.fill_value.is_empty() {
            actions.push("Leave empty fields blank".to_string());
        } else {
            actions.push(format!("Fill empty fields with '{}'", self.fill_value));
        }

        if let Some(key) = self.sort_key {
            actions.push(format!("Sort data by {}", key));
        }

        if !self.filter_empty_columns.is_empty() {
            let columns: Vec<&str> = self
                .filter_empty_columns
                .iter()
                .map(|role| role.as_str())
                .collect();
            actions.push(format!("Remove rows with empty {}", columns.join(", ")));
        }

        if self.keep_only_complete_rows {
            actions.push("Keep only rows with complete data".to_string());
        }

        actions.push("Standardize column names (Full Name → name, etc.)".to_string());
        if self.normalize_email {
            actions.push("Clean email formats and fix typos".to_string());
        }
        if self.normalize_phone {
            actions.push("Format phone numbers consistently".to_string());
        }

        actions
    }
}

// ============================================================================
// Inputs and results
// ============================================================================

/// A raw input table together with the identity of its source.
#[derive(Debug, Clone)]
pub struct SourceTable {
    /// File path or caller-chosen label, used in logs and errors.
    pub name: String,
    pub data: DataFrame,
}

impl SourceTable {
    pub fn new(name: impl Into<String>, data: DataFrame) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    pub fn height(&self) -> usize {
        self.data.height()
    }
}

/// Output of a pipeline run.
#[derive(Debug, Clone)]
pub struct CleanupResult {
    pub directive: CleaningDirective,
    /// Merged, deduplicated, sorted table with missing cells filled.
    pub cleaned: DataFrame,
    pub metrics: MetricsReport,
    pub summary: CleanupSummary,
    pub report: CleanupReport,
    /// Files written when saving to disk is enabled.
    pub output_files: Vec<PathBuf>,
}

// ============================================================================
// Cleanup Summary Types
// ============================================================================

/// Summary of a cleanup run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleanupSummary {
    pub duration_ms: u64,
    pub rows_before: usize,
    pub rows_after: usize,
    pub rows_removed: usize,
    pub columns_after: usize,
    pub tables: Vec<TableSummary>,
    pub actions: Vec<CleanupAction>,
    pub warnings: Vec<String>,
}

impl CleanupSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_action(&mut self, action: CleanupAction) {
        self.actions.push(action);
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Percentage of input rows that did not survive.
    pub fn rows_removed_percentage(&self) -> f32 {
        if self.rows_before == 0 {
            0.0
        } else {
            (self.rows_removed as f32 / self.rows_before as f32) * 100.0
        }
    }
}

/// Per-source row accounting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSummary {
    pub source: String,
    pub rows_in: usize,
    pub rows_out: usize,
    /// Column names after header standardization.
    pub columns: Vec<String>,
}

/// A single recorded action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupAction {
    pub action_type: ActionType,
    /// Source name, column, or "merged".
    pub target: String,
    pub description: String,
}

impl CleanupAction {
    pub fn new(
        action_type: ActionType,
        target: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            action_type,
            target: target.into(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    HeaderRenamed,
    ValuesNormalized,
    RowsFiltered,
    IncompleteRowsRemoved,
    DuplicatesRemoved,
    TablesMerged,
    RowsSorted,
}

impl ActionType {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::HeaderRenamed => "Header Renamed",
            Self::ValuesNormalized => "Values Normalized",
            Self::RowsFiltered => "Rows Filtered",
            Self::IncompleteRowsRemoved => "Incomplete Rows Removed",
            Self::DuplicatesRemoved => "Duplicates Removed",
            Self::TablesMerged => "Tables Merged",
            Self::RowsSorted => "Rows Sorted",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        let directive = CleaningDirective::default();
        assert_eq!(directive.fill_value, "N/A");
        assert_eq!(directive.sort_key, None);
        assert!(directive.filter_empty_columns.is_empty());
        assert!(!directive.keep_only_complete_rows);
        assert_eq!(directive.dedup_strategy, DedupStrategy::Email);
        assert!(directive.normalize_email);
        assert!(directive.normalize_phone);
    }

    #[test]
    fn test_add_filter_ignores_repeats() {
        let mut directive = CleaningDirective::default();
        directive.add_filter(ColumnRole::Email);
        directive.add_filter(ColumnRole::Phone);
        directive.add_filter(ColumnRole::Email);
        assert_eq!(
            directive.filter_empty_columns,
            vec![ColumnRole::Email, ColumnRole::Phone]
        );
    }

    #[test]
    fn test_describe_lists_requested_actions() {
        let directive = CleaningDirective {
            fill_value: String::new(),
            sort_key: Some(SortKey::Age),
            filter_empty_columns: vec![ColumnRole::Email, ColumnRole::Name],
            keep_only_complete_rows: true,
            dedup_strategy: DedupStrategy::NamePhone,
            normalize_email: true,
            normalize_phone: false,
        };

        let actions = directive.describe();
        assert_eq!(actions[0], "Remove duplicates (by name + phone)");
        assert!(actions.contains(&"Leave empty fields blank".to_string()));
        assert!(actions.contains(&"Sort data by age".to_string()));
        assert!(actions.contains(&"Remove rows with empty email, name".to_string()));
        assert!(actions.contains(&"Keep only rows with complete data".to_string()));
        assert!(!actions.contains(&"Format phone numbers consistently".to_string()));
    }

    #[test]
    fn test_dedup_strategy_serialization() {
        let json = serde_json::to_string(&DedupStrategy::NameEmail).unwrap();
        assert_eq!(json, "\"name_email\"");
        let parsed: DedupStrategy = serde_json::from_str("\"all_columns\"").unwrap();
        assert_eq!(parsed, DedupStrategy::AllColumns);
    }

    #[test]
    fn test_cell_from_option() {
        assert_eq!(Cell::from(Some("x")), Cell::Text("x"));
        assert!(Cell::from(None::<&str>).is_missing());
        assert_eq!(Cell::Text("y").as_text(), Some("y"));
    }
}
