//! Duplicate removal.
//!
//! First occurrence wins and input order is preserved. Two cells that are
//! both missing compare equal, so records missing the same key collapse.

use crate::types::DedupStrategy;
use crate::utils::{column_names, filter_rows, has_column};
use anyhow::Result;
use polars::prelude::*;
use std::collections::HashSet;
use tracing::debug;

/// Remove duplicate rows according to `strategy`.
///
/// When a key column of the strategy is absent the table is returned
/// unchanged; [`DedupStrategy::AllColumns`] always applies.
pub fn dedup(df: DataFrame, strategy: DedupStrategy) -> Result<DataFrame> {
    let keys: Vec<String> = match strategy.key_columns() {
        Some(columns) => {
            if let Some(absent) = columns.iter().find(|c| !has_column(&df, c)) {
                debug!(
                    "Skipping dedup by {}: column '{}' not present",
                    strategy, absent
                );
                return Ok(df);
            }
            columns.iter().map(|c| c.to_string()).collect()
        }
        None => column_names(&df),
    };

    if df.height() < 2 || keys.is_empty() {
        return Ok(df);
    }

    let columns: Vec<Column> = keys
        .iter()
        .map(|name| df.column(name)?.cast(&DataType::String))
        .collect::<PolarsResult<_>>()?;
    let values: Vec<&StringChunked> = columns
        .iter()
        .map(|c| c.as_materialized_series().str())
        .collect::<PolarsResult<_>>()?;

    let mut seen: HashSet<Vec<Option<&str>>> = HashSet::with_capacity(df.height());
    let keep: Vec<bool> = (0..df.height())
        .map(|row| seen.insert(values.iter().map(|ca| ca.get(row)).collect()))
        .collect();

    let before = df.height();
    let df = filter_rows(&df, &keep)?;
    debug!(
        "Removed {} duplicate row(s) by {}",
        before - df.height(),
        strategy
    );
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::string_values;
    use pretty_assertions::assert_eq;

    fn contacts() -> DataFrame {
        df!(
            "name" => &[Some("Ann"), Some("Ann"), Some("Bob"), Some("Cy"), Some("Dee")],
            "email" => &[Some("a@x.com"), Some("a@x.com"), Some("b@x.com"), None, None],
            "phone" => &[Some("1"), Some("2"), Some("2"), Some("3"), Some("4")]
        )
        .unwrap()
    }

    #[test]
    fn test_dedup_by_email_keeps_first() {
        let df = dedup(contacts(), DedupStrategy::Email).unwrap();
        assert_eq!(
            string_values(&df, "phone").unwrap(),
            vec![Some("1".to_string()), Some("2".to_string()), Some("3".to_string())]
        );
    }

    #[test]
    fn test_dedup_missing_keys_are_equal() {
        let df = dedup(contacts(), DedupStrategy::Email).unwrap();
        let names = string_values(&df, "name").unwrap();
        assert!(names.contains(&Some("Cy".to_string())));
        assert!(!names.contains(&Some("Dee".to_string())));
    }

    #[test]
    fn test_dedup_by_phone() {
        let df = dedup(contacts(), DedupStrategy::Phone).unwrap();
        assert_eq!(df.height(), 4);
    }

    #[test]
    fn test_dedup_by_name_and_phone() {
        let df = dedup(contacts(), DedupStrategy::NamePhone).unwrap();
        assert_eq!(df.height(), 5);
    }

    #[test]
    fn test_dedup_all_columns() {
        let df = df!("a" => &["1", "1", "1"], "b" => &["x", "x", "y"]).unwrap();
        let df = dedup(df, DedupStrategy::AllColumns).unwrap();
        assert_eq!(df.height(), 2);
    }

    #[test]
    fn test_dedup_absent_key_column_is_noop() {
        let df = df!("name" => &["Ann", "Ann"]).unwrap();
        let out = dedup(df, DedupStrategy::Email).unwrap();
        assert_eq!(out.height(), 2);

        let df = df!("email" => &["a@x.com", "a@x.com"]).unwrap();
        let out = dedup(df, DedupStrategy::NamePhone).unwrap();
        assert_eq!(out.height(), 2);
    }

    #[test]
    fn test_dedup_is_idempotent() {
        for strategy in [
            DedupStrategy::Email,
            DedupStrategy::Phone,
            DedupStrategy::NameEmail,
            DedupStrategy::NamePhone,
            DedupStrategy::AllColumns,
        ] {
            let once = dedup(contacts(), strategy).unwrap();
            let twice = dedup(once.clone(), strategy).unwrap();
            assert!(once.equals_missing(&twice), "not idempotent for {}", strategy);
        }
    }
}
