//! Per-table cleaning.
//!
//! Contains the stage sequence applied to every input table before the merge.

use crate::cleaner::{
    apply_normalizations, dedup, fill_and_strip, filter_empty_columns, keep_complete_rows,
    standardize_headers,
};
use crate::types::{ActionType, CleaningDirective, CleanupAction, ColumnRole, SourceTable};
use crate::utils::{column_names, has_column};
use anyhow::{Context, Result};
use polars::prelude::*;
use tracing::debug;

/// A cleaned table with its bookkeeping.
#[derive(Debug, Clone)]
pub struct CleanedTable {
    pub source: String,
    pub data: DataFrame,
    pub rows_in: usize,
    pub actions: Vec<CleanupAction>,
}

impl CleanedTable {
    pub fn rows_out(&self) -> usize {
        self.data.height()
    }
}

/// Applies the directive to a single table.
///
/// Stages: standardize headers, fill missing values, normalize emails and
/// phones, drop rows empty in the filtered columns, optionally keep only
/// complete rows, then deduplicate. Filling runs before normalization, so a
/// filled email or phone cell is normalized like any other value.
#[derive(Debug, Default, Clone, Copy)]
pub struct CleaningExecutor;

impl CleaningExecutor {
    pub fn clean_table(
        &self,
        source: &SourceTable,
        directive: &CleaningDirective,
    ) -> Result<CleanedTable> {
        let name = source.name.as_str();
        let rows_in = source.height();
        let mut actions = Vec::new();

        let (df, renames) = standardize_headers(source.data.clone())
            .with_context(|| format!("standardizing headers of {}", name))?;
        for rename in renames {
            actions.push(CleanupAction::new(
                ActionType::HeaderRenamed,
                name,
                format!("Renamed '{}' to '{}'", rename.from, rename.to),
            ));
        }

        let df = fill_and_strip(df, &directive.fill_value)
            .with_context(|| format!("filling missing values of {}", name))?;

        let df = apply_normalizations(df, directive.normalize_email, directive.normalize_phone)
            .with_context(|| format!("normalizing values of {}", name))?;
        for (enabled, role) in [
            (directive.normalize_email, ColumnRole::Email),
            (directive.normalize_phone, ColumnRole::Phone),
        ] {
            if enabled && has_column(&df, role.as_str()) {
                actions.push(CleanupAction::new(
                    ActionType::ValuesNormalized,
                    name,
                    format!("Normalized {} values", role),
                ));
            }
        }

        let before = df.height();
        let df = filter_empty_columns(df, &directive.filter_empty_columns, &directive.fill_value)
            .with_context(|| format!("filtering rows of {}", name))?;
        if df.height() < before {
            actions.push(CleanupAction::new(
                ActionType::RowsFiltered,
                name,
                format!("Removed {} row(s) with empty required fields", before - df.height()),
            ));
        }

        let df = if directive.keep_only_complete_rows {
            let before = df.height();
            let df = keep_complete_rows(df, &directive.fill_value)
                .with_context(|| format!("removing incomplete rows of {}", name))?;
            if df.height() < before {
                actions.push(CleanupAction::new(
                    ActionType::IncompleteRowsRemoved,
                    name,
                    format!("Removed {} incomplete row(s)", before - df.height()),
                ));
            }
            df
        } else {
            df
        };

        let before = df.height();
        let df = dedup(df, directive.dedup_strategy)
            .with_context(|| format!("deduplicating {}", name))?;
        if df.height() < before {
            actions.push(CleanupAction::new(
                ActionType::DuplicatesRemoved,
                name,
                format!(
                    "Removed {} duplicate row(s) by {}",
                    before - df.height(),
                    directive.dedup_strategy
                ),
            ));
        }

        debug!(
            "Cleaned {}: {} -> {} row(s), columns {:?}",
            name,
            rows_in,
            df.height(),
            column_names(&df)
        );

        Ok(CleanedTable {
            source: name.to_string(),
            data: df,
            rows_in,
            actions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DedupStrategy;
    use crate::utils::string_values;
    use pretty_assertions::assert_eq;

    fn source() -> SourceTable {
        SourceTable::new(
            "contacts.csv",
            df!(
                "Full Name" => &[Some(" Ann "), Some("Bob"), Some("Ann"), None],
                "E-Mail" => &[Some("ANN@GAMIL.COM"), Some("nan"), Some("ann@gmail.com"), Some("d@x.com")],
                "Phone Number" => &[Some("555.123.4567"), Some("12"), None, Some("5550001111")]
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_clean_table_default_directive() {
        let cleaned = CleaningExecutor
            .clean_table(&source(), &CleaningDirective::default())
            .unwrap();

        assert_eq!(cleaned.rows_in, 4);
        assert_eq!(cleaned.rows_out(), 3);
        assert_eq!(column_names(&cleaned.data), vec!["name", "email", "phone"]);
        assert_eq!(
            string_values(&cleaned.data, "email").unwrap(),
            vec![
                Some("ann@gmail.com".to_string()),
                Some("N/A".to_string()),
                Some("d@x.com".to_string())
            ]
        );
        assert_eq!(
            string_values(&cleaned.data, "phone").unwrap()[0].as_deref(),
            Some("(555) 123-4567")
        );
        assert!(cleaned
            .actions
            .iter()
            .any(|a| a.action_type == ActionType::DuplicatesRemoved));
    }

    #[test]
    fn test_clean_table_filters_and_complete_rows() {
        let directive = CleaningDirective {
            filter_empty_columns: vec![ColumnRole::Email],
            keep_only_complete_rows: true,
            dedup_strategy: DedupStrategy::AllColumns,
            ..CleaningDirective::default()
        };

        let cleaned = CleaningExecutor.clean_table(&source(), &directive).unwrap();
        assert_eq!(
            string_values(&cleaned.data, "name").unwrap(),
            vec![Some("Ann".to_string())]
        );
    }

    #[test]
    fn test_clean_table_fill_value_goes_through_normalization() {
        let source = SourceTable::new(
            "contacts.csv",
            df!(
                "name" => &["Ann", "Bob"],
                "email" => &["", "b@x.com"],
                "phone" => &["", "5551234567"]
            )
            .unwrap(),
        );

        let blank = CleaningDirective {
            fill_value: String::new(),
            ..CleaningDirective::default()
        };
        let cleaned = CleaningExecutor.clean_table(&source, &blank).unwrap();
        assert_eq!(
            string_values(&cleaned.data, "email").unwrap(),
            vec![Some("N/A".to_string()), Some("b@x.com".to_string())]
        );
        assert_eq!(
            string_values(&cleaned.data, "phone").unwrap(),
            vec![Some("N/A".to_string()), Some("(555) 123-4567".to_string())]
        );

        let unknown = CleaningDirective {
            fill_value: "Unknown".to_string(),
            ..CleaningDirective::default()
        };
        let cleaned = CleaningExecutor.clean_table(&source, &unknown).unwrap();
        assert_eq!(
            string_values(&cleaned.data, "email").unwrap(),
            vec![Some("unknown".to_string()), Some("b@x.com".to_string())]
        );
        assert_eq!(
            string_values(&cleaned.data, "phone").unwrap(),
            vec![Some("N/A".to_string()), Some("(555) 123-4567".to_string())]
        );
    }

    #[test]
    fn test_clean_table_without_normalization() {
        let directive = CleaningDirective {
            normalize_email: false,
            normalize_phone: false,
            dedup_strategy: DedupStrategy::AllColumns,
            ..CleaningDirective::default()
        };

        let cleaned = CleaningExecutor.clean_table(&source(), &directive).unwrap();
        assert_eq!(
            string_values(&cleaned.data, "email").unwrap()[0].as_deref(),
            Some("ANN@GAMIL.COM")
        );
        assert!(!cleaned
            .actions
            .iter()
            .any(|a| a.action_type == ActionType::ValuesNormalized));
    }
}
