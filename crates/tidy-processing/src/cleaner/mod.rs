//! Data cleaning stages for contact tables.
//!
//! This module provides functionality for:
//! - Standardizing column headers to canonical names
//! - Resolving and filling missing values
//! - Normalizing email addresses and phone numbers
//! - Filtering rows with empty values
//! - Removing duplicate records
//! - Merging and sorting tables
//!
//! Every stage takes a table by value and returns a new one.

mod dedup;
mod filters;
mod headers;
mod merge;
mod normalizers;
mod sanitizers;

pub use dedup::dedup;
pub use filters::{filter_empty_columns, keep_complete_rows};
pub use headers::{
    HeaderRename, canonical_role, clean_header, resolve_names, standardize_headers,
};
pub use merge::{concat_tables, sort_by_column};
pub use normalizers::{
    apply_normalizations, is_well_formed_email, normalize_email, normalize_phone,
};
pub use sanitizers::{fill_and_strip, fill_missing, resolve_missing};
