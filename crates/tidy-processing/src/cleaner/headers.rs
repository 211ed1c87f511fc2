//! Column header standardization.
//!
//! Heterogeneous headers ("Full Name", "E-Mail", "telephone") are cleaned and
//! mapped onto the canonical column names of [`ColumnRole`].

use crate::types::ColumnRole;
use anyhow::Result;
use once_cell::sync::Lazy;
use polars::prelude::*;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Synonym table: cleaned header -> canonical role.
static COLUMN_MAPPING: Lazy<HashMap<&'static str, ColumnRole>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for synonym in ["name", "full_name", "customer_name", "first_name"] {
        map.insert(synonym, ColumnRole::Name);
    }
    for synonym in ["email", "email_address", "e_mail", "e-mail"] {
        map.insert(synonym, ColumnRole::Email);
    }
    for synonym in ["age", "years_old", "age_range", "years"] {
        map.insert(synonym, ColumnRole::Age);
    }
    for synonym in ["phone", "phone_number", "contact", "tel", "telephone"] {
        map.insert(synonym, ColumnRole::Phone);
    }
    map.insert("notes", ColumnRole::Notes);
    map
});

/// A header that changed during standardization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderRename {
    pub from: String,
    pub to: String,
}

/// Clean a raw header: trim, lowercase, spaces and hyphens become underscores.
pub fn clean_header(raw: &str) -> String {
    raw.trim().to_lowercase().replace([' ', '-'], "_")
}

/// Canonical role of a raw header, if it is a known synonym.
pub fn canonical_role(raw: &str) -> Option<ColumnRole> {
    COLUMN_MAPPING.get(clean_header(raw).as_str()).copied()
}

/// Resolve the final name of every header, left to right.
///
/// The leftmost header that claims a name keeps it. A later header whose
/// canonical name is taken falls back to its cleaned name, then to a
/// numbered variant of it.
pub fn resolve_names(headers: &[String]) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::with_capacity(headers.len());
    let mut resolved = Vec::with_capacity(headers.len());

    for raw in headers {
        let cleaned = clean_header(raw);
        let preferred = COLUMN_MAPPING
            .get(cleaned.as_str())
            .map(|role| role.as_str().to_string())
            .unwrap_or_else(|| cleaned.clone());

        let name = if !taken.contains(&preferred) {
            preferred
        } else if !taken.contains(&cleaned) {
            warn!(
                "Header '{}' would collide on '{}', keeping '{}'",
                raw, preferred, cleaned
            );
            cleaned
        } else {
            let mut n = 2;
            while taken.contains(&format!("{}_{}", cleaned, n)) {
                n += 1;
            }
            let numbered = format!("{}_{}", cleaned, n);
            warn!(
                "Header '{}' would collide on '{}', renamed to '{}'",
                raw, preferred, numbered
            );
            numbered
        };

        taken.insert(name.clone());
        resolved.push(name);
    }

    resolved
}

/// Rename the columns of a table to their standardized names.
///
/// Cell values are untouched. Returns the renamed table and the list of
/// headers that actually changed.
pub fn standardize_headers(mut df: DataFrame) -> Result<(DataFrame, Vec<HeaderRename>)> {
    let original = crate::utils::column_names(&df);
    let resolved = resolve_names(&original);

    let renames: Vec<HeaderRename> = original
        .iter()
        .zip(&resolved)
        .filter(|(from, to)| from != to)
        .map(|(from, to)| HeaderRename {
            from: from.clone(),
            to: to.clone(),
        })
        .collect();

    if !renames.is_empty() {
        df.set_column_names(resolved.iter().map(String::as_str))?;
        debug!("Standardized {} column header(s)", renames.len());
    }

    Ok((df, renames))
}
