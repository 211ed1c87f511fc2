//! Row filters driven by the cleaning directive.

use crate::types::ColumnRole;
use crate::utils::{column_names, filter_rows, has_column, is_blank};
use anyhow::Result;
use polars::prelude::*;
use tracing::debug;

/// Drop rows that are empty in any of the given columns.
///
/// Columns the table does not have are skipped. `sentinel` is the run's
/// fill value, which also counts as empty.
pub fn filter_empty_columns(
    df: DataFrame,
    roles: &[ColumnRole],
    sentinel: &str,
) -> Result<DataFrame> {
    let mut df = df;
    for role in roles {
        let name = role.as_str();
        if !has_column(&df, name) {
            debug!("Skipping empty-{} filter: column not present", name);
            continue;
        }

        let column = df.column(name)?.cast(&DataType::String)?;
        let keep: Vec<bool> = column
            .as_materialized_series()
            .str()?
            .into_iter()
            .map(|v| !is_blank(v, sentinel))
            .collect();

        let before = df.height();
        df = filter_rows(&df, &keep)?;
        debug!(
            "Removed {} row(s) with empty {}",
            before - df.height(),
            name
        );
    }
    Ok(df)
}

/// Keep only rows with a value in every column.
pub fn keep_complete_rows(df: DataFrame, sentinel: &str) -> Result<DataFrame> {
    let mut keep = vec![true; df.height()];
    for name in column_names(&df) {
        let column = df.column(&name)?.cast(&DataType::String)?;
        for (flag, value) in keep
            .iter_mut()
            .zip(column.as_materialized_series().str()?.into_iter())
        {
            if is_blank(value, sentinel) {
                *flag = false;
            }
        }
    }

    let before = df.height();
    let df = filter_rows(&df, &keep)?;
    debug!("Removed {} incomplete row(s)", before - df.height());
    Ok(df)
}
