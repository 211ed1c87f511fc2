//! Loading source tables from CSV files.
//!
//! Every column is read as a string; type handling is left to the cleaning
//! stages. A file that cannot be read aborts the whole run.

use crate::error::{CleanupError, Result};
use crate::types::SourceTable;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Read a CSV with every column as a string.
///
/// The read is strict: a row with more fields than the header is an error,
/// not a truncated row.
pub fn read_csv_table(path: &Path) -> PolarsResult<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .with_parse_options(CsvParseOptions::default().with_truncate_ragged_lines(false))
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()?;
    debug!("Read {} with columns {:?}", path.display(), df.get_column_names());
    Ok(df)
}

/// Load one source table, naming the file on failure.
pub fn load_source(path: impl AsRef<Path>) -> Result<SourceTable> {
    let path = path.as_ref();
    let name = path.display().to_string();

    if !path.is_file() {
        return Err(CleanupError::SourceRead {
            path: name,
            reason: "file not found".to_string(),
        });
    }

    let data = read_csv_table(path).map_err(|e| CleanupError::SourceRead {
        path: name.clone(),
        reason: e.to_string(),
    })?;

    info!("Loaded {}: {:?}", name, data.shape());
    Ok(SourceTable::new(name, data))
}

/// Load every source in order. The first unreadable file aborts the run.
pub fn load_sources<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<SourceTable>> {
    if paths.is_empty() {
        return Err(CleanupError::NoInputTables);
    }
    paths.iter().map(load_source).collect()
}
