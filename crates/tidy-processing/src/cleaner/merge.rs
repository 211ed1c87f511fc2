//! Concatenation and ordering of cleaned tables.

use crate::utils::{column_names, has_column, is_blank, parse_numeric_string, string_values};
use anyhow::Result;
use polars::prelude::*;
use std::cmp::Ordering;
use tracing::debug;

/// Stack tables in input order.
///
/// The result carries the union of all columns in first-seen order; cells of
/// columns a table lacks are null.
pub fn concat_tables(tables: Vec<DataFrame>) -> Result<DataFrame> {
    let mut union: Vec<String> = Vec::new();
    for df in &tables {
        for name in column_names(df) {
            if !union.contains(&name) {
                union.push(name);
            }
        }
    }

    let mut merged: Option<DataFrame> = None;
    for df in tables {
        let aligned = align_columns(df, &union)?;
        match merged.as_mut() {
            Some(acc) => {
                acc.vstack_mut(&aligned)?;
            }
            None => merged = Some(aligned),
        }
    }

    let merged = merged.unwrap_or_else(DataFrame::empty);
    debug!(
        "Merged table has {} row(s) and {} column(s)",
        merged.height(),
        merged.width()
    );
    Ok(merged)
}

fn align_columns(mut df: DataFrame, union: &[String]) -> Result<DataFrame> {
    let height = df.height();
    for name in union {
        if !has_column(&df, name) {
            df.with_column(Series::full_null(
                name.as_str().into(),
                height,
                &DataType::String,
            ))?;
        } else if df.column(name)?.dtype() != &DataType::String {
            let cast = df.column(name)?.cast(&DataType::String)?;
            df.with_column(cast)?;
        }
    }
    Ok(df.select(union.iter().map(String::as_str))?)
}

/// Sort key of one cell: numbers first by value, then text, then empty cells.
#[derive(Debug, PartialEq)]
enum SortValue<'a> {
    Number(f64),
    Text(&'a str),
    Empty,
}

impl SortValue<'_> {
    fn rank(&self) -> u8 {
        match self {
            Self::Number(_) => 0,
            Self::Text(_) => 1,
            Self::Empty => 2,
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Stable ascending sort on `column`.
///
/// Empty cells (null, blank, `"N/A"` or `sentinel`) go last. A table without
/// the column is returned unchanged.
pub fn sort_by_column(df: DataFrame, column: &str, sentinel: &str) -> Result<DataFrame> {
    if !has_column(&df, column) {
        debug!("Skipping sort: column '{}' not present", column);
        return Ok(df);
    }

    let values = string_values(&df, column)?;
    let keys: Vec<SortValue> = values
        .iter()
        .map(|v| match v.as_deref() {
            v if is_blank(v, sentinel) => SortValue::Empty,
            Some(s) => match parse_numeric_string(s) {
                Some(n) => SortValue::Number(n),
                None => SortValue::Text(s.trim()),
            },
            None => SortValue::Empty,
        })
        .collect();

    let mut order: Vec<IdxSize> = (0..df.height() as IdxSize).collect();
    order.sort_by(|&a, &b| keys[a as usize].compare(&keys[b as usize]));

    let idx = IdxCa::from_vec("idx".into(), order);
    Ok(df.take(&idx)?)
}
