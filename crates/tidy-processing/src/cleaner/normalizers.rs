//! Email and phone normalization.

use crate::types::{Cell, ColumnRole, DEFAULT_SENTINEL};
use crate::utils::{digits_only, has_column, map_string_column, resolve_cell};
use anyhow::Result;
use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;
use tracing::debug;

/// Common provider misspellings and their corrections.
static EMAIL_TYPOS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (
            Regex::new(r"@(?:gamil|gnail|gmial)\.").expect("Invalid regex: gmail typos"),
            "@gmail.",
        ),
        (
            Regex::new(r"@(?:yahooo|yaho)\.").expect("Invalid regex: yahoo typos"),
            "@yahoo.",
        ),
        (
            Regex::new(r"@(?:hotnail|hotmial)\.").expect("Invalid regex: hotmail typos"),
            "@hotmail.",
        ),
    ]
});

static WELL_FORMED_EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[A-Z0-9._%+\-]+@[A-Z0-9.\-]+\.[A-Z]{2,}$").expect("Invalid regex: email format")
});

fn email_value(raw: Option<&str>) -> Option<String> {
    let value = resolve_cell(raw).as_text()?;
    let mut email = value.to_lowercase();
    for (pattern, fix) in EMAIL_TYPOS.iter() {
        if pattern.is_match(&email) {
            email = pattern.replace_all(&email, *fix).into_owned();
        }
    }
    Some(email)
}

fn phone_value(raw: Option<&str>) -> Option<String> {
    let value = resolve_cell(raw).as_text()?;
    let digits = digits_only(value);
    match digits.len() {
        0 => None,
        10 => Some(format!(
            "({}) {}-{}",
            &digits[..3],
            &digits[3..6],
            &digits[6..]
        )),
        _ => Some(digits),
    }
}

/// Lowercase an email and correct common provider typos.
///
/// Missing input yields `"N/A"`. No validation is performed.
pub fn normalize_email<'a>(value: impl Into<Cell<'a>>) -> String {
    email_value(value.into().as_text()).unwrap_or_else(|| DEFAULT_SENTINEL.to_string())
}

/// Format a 10-digit phone number as `(AAA) BBB-CCCC`.
///
/// Other lengths come back as the bare digit string; missing input or
/// input without digits yields `"N/A"`.
pub fn normalize_phone<'a>(value: impl Into<Cell<'a>>) -> String {
    phone_value(value.into().as_text()).unwrap_or_else(|| DEFAULT_SENTINEL.to_string())
}

/// Format check used for reporting. Never alters values.
pub fn is_well_formed_email(value: &str) -> bool {
    WELL_FORMED_EMAIL.is_match(value)
}

/// Normalize the `email` and `phone` columns when present and enabled.
///
/// Cells that are missing, or equal to an empty fill value, become `"N/A"`.
/// A phone cell without digits becomes `"N/A"` as well.
pub fn apply_normalizations(df: DataFrame, do_email: bool, do_phone: bool) -> Result<DataFrame> {
    let mut df = df;

    let email = ColumnRole::Email.as_str();
    if do_email && has_column(&df, email) {
        map_string_column(&mut df, email, |raw| Some(normalize_email(raw)))?;
        debug!("Normalized '{}' column", email);
    }

    let phone = ColumnRole::Phone.as_str();
    if do_phone && has_column(&df, phone) {
        map_string_column(&mut df, phone, |raw| Some(normalize_phone(raw)))?;
        debug!("Normalized '{}' column", phone);
    }

    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::string_values;

    #[test]
    fn test_normalize_email_fixes_typos() {
        assert_eq!(normalize_email("JOHN@GAMIL.COM"), "john@gmail.com");
        assert_eq!(normalize_email(" a@gnail.com "), "a@gmail.com");
        assert_eq!(normalize_email("b@yahooo.com"), "b@yahoo.com");
        assert_eq!(normalize_email("c@yaho.co.uk"), "c@yahoo.co.uk");
        assert_eq!(normalize_email("d@hotmial.com"), "d@hotmail.com");
        assert_eq!(normalize_email("e@example.com"), "e@example.com");
    }

    #[test]
    fn test_normalize_email_missing() {
        assert_eq!(normalize_email(""), "N/A");
        assert_eq!(normalize_email("   "), "N/A");
        assert_eq!(normalize_email(None::<&str>), "N/A");
        assert_eq!(normalize_email("nan"), "N/A");
    }

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("555-123-4567"), "(555) 123-4567");
        assert_eq!(normalize_phone("(555) 123 4567"), "(555) 123-4567");
        assert_eq!(normalize_phone("123"), "123");
        assert_eq!(normalize_phone("+1 555 123 4567"), "15551234567");
        assert_eq!(normalize_phone(""), "N/A");
        assert_eq!(normalize_phone("ext."), "N/A");
        assert_eq!(normalize_phone(None::<&str>), "N/A");
    }

    #[test]
    fn test_is_well_formed_email() {
        assert!(is_well_formed_email("john@gmail.com"));
        assert!(is_well_formed_email("First.Last+tag@Example.ORG"));
        assert!(!is_well_formed_email("john@gmail"));
        assert!(!is_well_formed_email("not an email"));
    }

    #[test]
    fn test_apply_normalizations_respects_flags() {
        let df = df!(
            "email" => &[Some("X@GMIAL.COM"), None],
            "phone" => &[Some("5551234567"), Some("12")]
        )
        .unwrap();

        let only_email = apply_normalizations(df.clone(), true, false).unwrap();
        assert_eq!(
            string_values(&only_email, "email").unwrap(),
            vec![Some("x@gmail.com".to_string()), Some("N/A".to_string())]
        );
        assert_eq!(
            string_values(&only_email, "phone").unwrap()[0].as_deref(),
            Some("5551234567")
        );

        let both = apply_normalizations(df, true, true).unwrap();
        assert_eq!(
            string_values(&both, "phone").unwrap(),
            vec![Some("(555) 123-4567".to_string()), Some("12".to_string())]
        );
    }

    #[test]
    fn test_apply_normalizations_writes_sentinel_for_filled_cells() {
        let df = df!(
            "email" => &["", "Unknown", "b@x.com"],
            "phone" => &["", "Unknown", "555 123 4567"]
        )
        .unwrap();

        let out = apply_normalizations(df, true, true).unwrap();
        assert_eq!(
            string_values(&out, "email").unwrap(),
            vec![
                Some("N/A".to_string()),
                Some("unknown".to_string()),
                Some("b@x.com".to_string())
            ]
        );
        assert_eq!(
            string_values(&out, "phone").unwrap(),
            vec![
                Some("N/A".to_string()),
                Some("N/A".to_string()),
                Some("(555) 123-4567".to_string())
            ]
        );
    }

    #[test]
    fn test_apply_normalizations_without_columns() {
        let df = df!("name" => &["Ann"]).unwrap();
        let out = apply_normalizations(df.clone(), true, true).unwrap();
        assert!(out.equals_missing(&df));
    }
}
