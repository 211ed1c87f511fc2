//! Shared utilities for the cleanup pipeline.
//!
//! This module contains the missing-value vocabulary and the small
//! DataFrame helpers used by every cleaning stage.

use crate::types::{Cell, DEFAULT_SENTINEL};
use polars::prelude::*;

// =============================================================================
// Missing Value Utilities
// =============================================================================

/// Stringified forms of "no value" that raw sources commonly contain.
///
/// The list follows the default `na_values` of pandas' CSV reader, so a
/// literal value such as the note `NA` is treated as missing. Matched exactly
/// (case-sensitive) against the trimmed cell text.
pub const MISSING_MARKERS: [&str; 13] = [
    "nan", "NaN", "-nan", "-NaN", "None", "null", "NULL", "NA", "N/A", "n/a", "#N/A", "#NA",
    "<NA>",
];

/// Check if a string is a stringified missing-value marker.
pub fn is_missing_marker(s: &str) -> bool {
    let trimmed = s.trim();
    MISSING_MARKERS.iter().any(|&marker| trimmed == marker)
}

/// Resolve a raw cell into a [`Cell`], stripping surrounding whitespace.
///
/// Nulls, empty strings and missing markers all become [`Cell::Missing`].
pub fn resolve_cell(raw: Option<&str>) -> Cell<'_> {
    match raw.map(str::trim) {
        Some(s) if !s.is_empty() && !is_missing_marker(s) => Cell::Text(s),
        _ => Cell::Missing,
    }
}

/// Check if a cell counts as empty for row filtering.
///
/// Empty means null, whitespace-only, the default sentinel, or the run's fill value.
pub fn is_blank(value: Option<&str>, sentinel: &str) -> bool {
    match value {
        None => true,
        Some(s) => {
            let trimmed = s.trim();
            trimmed.is_empty() || trimmed == DEFAULT_SENTINEL || s == sentinel
        }
    }
}

// =============================================================================
// String Parsing Utilities
// =============================================================================

/// Characters commonly used in numeric formatting that should be stripped.
pub const NUMERIC_FORMAT_CHARS: [char; 6] = [',', '$', '%', '€', '£', ' '];

/// Keep only ASCII digits.
pub fn digits_only(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Clean a string for numeric parsing by removing formatting characters.
pub fn clean_numeric_string(s: &str) -> String {
    let mut result = s.trim().to_string();
    for c in NUMERIC_FORMAT_CHARS {
        result = result.replace(c, "");
    }
    result
}

/// Try to parse a string as a numeric value (f64).
pub fn parse_numeric_string(s: &str) -> Option<f64> {
    let cleaned = clean_numeric_string(s);
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

// =============================================================================
// DataFrame Utilities
// =============================================================================

/// Column names of a DataFrame as owned strings.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|s| s.to_string())
        .collect()
}

/// Check whether a column exists.
pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.column(name).is_ok()
}

/// Read a column as owned optional strings, casting non-string columns first.
pub fn string_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    let column = df.column(name)?.cast(&DataType::String)?;
    let series = column.as_materialized_series();
    Ok(series
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

/// Replace a column by mapping every cell through `f`.
///
/// The column is cast to `String` first; the result is always a `String` column.
pub fn map_string_column<F>(df: &mut DataFrame, name: &str, f: F) -> PolarsResult<()>
where
    F: Fn(Option<&str>) -> Option<String>,
{
    let column = df.column(name)?.cast(&DataType::String)?;
    let series = column.as_materialized_series();
    let values: Vec<Option<String>> = series.str()?.into_iter().map(&f).collect();
    df.replace(name, Series::new(name.into(), values))?;
    Ok(())
}

/// Keep the rows for which `keep` is true.
pub fn filter_rows(df: &DataFrame, keep: &[bool]) -> PolarsResult<DataFrame> {
    let mask = BooleanChunked::from_slice("keep".into(), keep);
    df.filter(&mask)
}

// =============================================================================
// Tests
// =============================================================================
