//! Schema and type validation for each analysis family (spec.md §4.2).
//!
//! A validator consumes the input table and yields either a typed handle
//! (column names + extracted numeric arrays) or a structured
//! [`crate::error::ValidationError`]. Mirrors the `layer1_command::validation`
//! module shape (detect-then-typecheck ordering, up-to-N-offender
//! reporting), generalized to the two closed error-code sets this crate
//! actually needs.

pub mod capacidad;
pub mod msa;

pub use capacidad::{ValidatedSeries, validate_capacidad};
pub use msa::{ColumnMapping, validate_msa};

/// Parses a table cell into `f64`, accepting native numeric JSON values
/// and strings using either `.` or `,` as the decimal separator, per
/// spec.md §3/§4.2 ("strip, replace `,` with `.`").
#[must_use]
pub fn parse_cell(raw: &serde_json::Value) -> Option<f64> {
    match raw {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => {
            let cleaned = s.trim().replace(',', ".");
            if cleaned.is_empty() {
                None
            } else {
                cleaned.parse::<f64>().ok()
            }
        }
        _ => None,
    }
}

/// Renders a raw cell as a plain display label: bare numbers and strings,
/// not `Value`'s JSON-quoted `Display` form.
#[must_use]
pub fn cell_label(raw: &serde_json::Value) -> String {
    match raw {
        serde_json::Value::String(s) => s.trim().to_string(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Whether a raw cell is empty (missing, null, or a blank/whitespace-only
/// string), per spec.md §4.2's empty-cell detection.
#[must_use]
pub fn is_empty_cell(raw: &serde_json::Value) -> bool {
    match raw {
        serde_json::Value::Null => true,
        serde_json::Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Converts a 0-indexed column number to spreadsheet letter notation
/// (`0 -> "A"`, `25 -> "Z"`, `26 -> "AA"`), used by empty-cell reports.
#[must_use]
pub fn column_letter(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        let rem = index % 26;
        letters.push(b'A' + rem as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_cell_accepts_comma_decimal() {
        let raw = serde_json::Value::String(" 3,14 ".to_string());
        assert_eq!(parse_cell(&raw), Some(3.14));
    }

    #[test]
    fn parse_cell_rejects_non_numeric_string() {
        let raw = serde_json::Value::String("abc".to_string());
        assert_eq!(parse_cell(&raw), None);
    }

    #[test]
    fn column_letter_wraps_after_z() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
    }
}
