//! Missing-value resolution and filling.
//!
//! Each table is filled before normalization. After the merge, only the
//! cells created by the column union still need the fill value.

use crate::utils::{column_names, map_string_column, resolve_cell};
use anyhow::Result;
use polars::prelude::*;
use tracing::debug;

/// Strip every cell and turn missing markers into nulls.
///
/// Every column comes out as `String` dtype.
pub fn resolve_missing(df: DataFrame) -> Result<DataFrame> {
    let mut df = df;
    for name in column_names(&df) {
        map_string_column(&mut df, &name, |v| {
            resolve_cell(v).as_text().map(str::to_string)
        })?;
    }
    Ok(df)
}

/// Write `fill_value` into every null cell.
pub fn fill_missing(df: DataFrame, fill_value: &str) -> Result<DataFrame> {
    let mut df = df;
    let mut filled = 0usize;
    for name in column_names(&df) {
        let nulls = df.column(&name)?.null_count();
        if nulls == 0 {
            continue;
        }
        filled += nulls;
        map_string_column(&mut df, &name, |v| {
            Some(v.map_or_else(|| fill_value.to_string(), str::to_string))
        })?;
    }
    if filled > 0 {
        debug!("Filled {} missing cell(s) with '{}'", filled, fill_value);
    }
    Ok(df)
}

/// Resolve missing values and fill them in one step.
pub fn fill_and_strip(df: DataFrame, fill_value: &str) -> Result<DataFrame> {
    fill_missing(resolve_missing(df)?, fill_value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::string_values;

    #[test]
    fn test_resolve_missing_markers_and_whitespace() {
        let df = df!("notes" => &[Some("  hi "), Some("nan"), Some("   "), None, Some("None")])
            .unwrap();
        let df = resolve_missing(df).unwrap();
        assert_eq!(
            string_values(&df, "notes").unwrap(),
            vec![Some("hi".to_string()), None, None, None, None]
        );
    }

    #[test]
    fn test_fill_and_strip() {
        let df = df!(
            "name" => &[Some(" Ann "), None],
            "age" => &[Some(30i64), None]
        )
        .unwrap();

        let df = fill_and_strip(df, "Unknown").unwrap();
        assert_eq!(
            string_values(&df, "name").unwrap(),
            vec![Some("Ann".to_string()), Some("Unknown".to_string())]
        );
        assert_eq!(
            string_values(&df, "age").unwrap(),
            vec![Some("30".to_string()), Some("Unknown".to_string())]
        );
    }

    #[test]
    fn test_fill_with_empty_value() {
        let df = df!("email" => &[Some("N/A"), Some("a@b.com")]).unwrap();
        let df = fill_and_strip(df, "").unwrap();
        assert_eq!(
            string_values(&df, "email").unwrap(),
            vec![Some(String::new()), Some("a@b.com".to_string())]
        );
    }
}
