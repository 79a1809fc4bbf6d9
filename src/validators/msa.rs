//! MSA (Gauge R&R) input validator (spec.md §4.2, §3).

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::EngineLimits;
use crate::error::{CellLocation, MsaErrorCode, MsaValidationError, OffendingValue, ValidationDetails};
use crate::table::Table;
use crate::validators::{cell_label, column_letter, is_empty_cell, parse_cell};

const PART_ALIASES: [&str; 3] = ["part", "parte", "pieza"];
const OPERATOR_ALIASES: [&str; 3] = ["operator", "operador", "op"];

/// Compiled once: the measurement-column name patterns from spec.md §4.2.
static MEASUREMENT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [r"(?i)^measurement\d*$", r"(?i)^medici[oó]n\d*$", r"(?i)^med\d+$", r"(?i)^m\d+$", r"(?i)^replica\d*$", r"(?i)^rep\d+$"]
        .iter()
        .map(|p| Regex::new(p).expect("measurement-column patterns are static and valid"))
        .collect()
});

/// Column mapping produced by [`validate_msa`]: the detected part,
/// operator, and measurement column names. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    /// Name of the detected Part column.
    pub part: String,
    /// Name of the detected Operator column.
    pub operator: String,
    /// Names of the detected measurement columns, in table order.
    pub measurements: Vec<String>,
}

fn detect_alias(table: &Table, aliases: &[&str]) -> Option<String> {
    table.headers.iter().find(|h| aliases.iter().any(|a| h.eq_ignore_ascii_case(a))).cloned()
}

fn detect_measurement_columns(table: &Table) -> Vec<String> {
    table
        .headers
        .iter()
        .filter(|h| MEASUREMENT_PATTERNS.iter().any(|re| re.is_match(h)))
        .cloned()
        .collect()
}

/// Validates an MSA table, returning a [`ColumnMapping`] on success.
///
/// Detects Part/Operator/measurement columns (structure), then checks that
/// every measurement cell is numeric, that no required cell is empty, and
/// finally that there is enough distinct data (≥2 parts, ≥2 operators, ≥2
/// measurement columns), stopping at the first failing category, exactly
/// in that order (spec.md §4.2).
///
/// # Errors
/// Returns a [`MsaValidationError`] with the first failing category's code.
///
/// # Panics
/// Never panics: the `expect`s inside recover a column index for a name
/// this same function just detected from `table.headers`, so the lookup
/// cannot fail.
pub fn validate_msa(table: &Table, limits: &EngineLimits) -> Result<ColumnMapping, MsaValidationError> {
    let part = detect_alias(table, &PART_ALIASES);
    let operator = detect_alias(table, &OPERATOR_ALIASES);
    let measurements = detect_measurement_columns(table);

    let (Some(part), Some(operator)) = (part, operator) else {
        return Err(MsaValidationError::with_details(
            MsaErrorCode::MissingColumns,
            "No se pudieron detectar las columnas de Parte y/o Operador.",
            ValidationDetails::Messages(vec![
                "Se requiere una columna de Parte (part, parte, pieza).".to_string(),
                "Se requiere una columna de Operador (operator, operador, op).".to_string(),
            ]),
        ));
    };

    if measurements.len() < 2 {
        return Err(MsaValidationError::with_details(
            MsaErrorCode::MissingColumns,
            "Se requieren al menos dos columnas de mediciones.".to_string(),
            ValidationDetails::Messages(vec![format!(
                "Se detectaron {} columna(s) de medición; se requieren al menos 2.",
                measurements.len()
            )]),
        ));
    }

    let measurement_indices: Vec<usize> =
        measurements.iter().map(|m| table.column_index(m).expect("just detected from headers")).collect();
    let part_index = table.column_index(&part).expect("just detected from headers");
    let operator_index = table.column_index(&operator).expect("just detected from headers");

    let mut offenders = Vec::new();
    for row in 0..table.len() {
        for (&col, name) in measurement_indices.iter().zip(measurements.iter()) {
            let raw = table.cell(row, col);
            if is_empty_cell(&raw) {
                continue;
            }
            if parse_cell(&raw).is_none() {
                if offenders.len() < limits.max_reported_offenders {
                    offenders.push(OffendingValue { column: name.clone(), row: row + 2, raw_value: cell_label(&raw) });
                }
            }
        }
    }
    if !offenders.is_empty() {
        return Err(MsaValidationError::with_details(
            MsaErrorCode::NonNumericData,
            "Se encontraron valores no numéricos en las columnas de mediciones.",
            ValidationDetails::OffendingValues(offenders),
        ));
    }

    let mut empty_cells = Vec::new();
    for row in 0..table.len() {
        for &col in std::iter::once(&part_index).chain(std::iter::once(&operator_index)).chain(measurement_indices.iter())
        {
            if is_empty_cell(&table.cell(row, col)) {
                if empty_cells.len() < limits.max_reported_offenders {
                    empty_cells.push(CellLocation { column: column_letter(col), row: row + 2 });
                }
            }
        }
    }
    if !empty_cells.is_empty() {
        return Err(MsaValidationError::with_details(
            MsaErrorCode::EmptyCells,
            "Se encontraron celdas vacías en columnas requeridas.",
            ValidationDetails::EmptyCells(empty_cells),
        ));
    }

    let unique_parts: HashSet<String> = (0..table.len()).map(|row| table.cell(row, part_index).to_string()).collect();
    let unique_operators: HashSet<String> =
        (0..table.len()).map(|row| table.cell(row, operator_index).to_string()).collect();

    if unique_parts.len() < 2 || unique_operators.len() < 2 {
        return Err(MsaValidationError::with_details(
            MsaErrorCode::InsufficientData,
            "Se requieren al menos dos partes y dos operadores distintos.",
            ValidationDetails::Messages(vec![format!(
                "Partes distintas: {}, operadores distintos: {}.",
                unique_parts.len(),
                unique_operators.len()
            )]),
        ));
    }

    Ok(ColumnMapping { part, operator, measurements })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_table() -> Table {
        let headers = vec!["Parte".to_string(), "Operador".to_string(), "Medicion1".to_string(), "Medicion2".to_string()];
        let rows = vec![
            vec![json!(1), json!("A"), json!(10.1), json!(10.2)],
            vec![json!(1), json!("B"), json!(10.3), json!(10.0)],
            vec![json!(2), json!("A"), json!(12.1), json!(12.0)],
            vec![json!(2), json!("B"), json!(12.4), json!(12.2)],
        ];
        Table::new(headers, rows)
    }

    #[test]
    fn detects_aliases_and_measurement_columns() {
        let table = sample_table();
        let mapping = validate_msa(&table, &EngineLimits::default()).expect("valid table");
        assert_eq!(mapping.part, "Parte");
        assert_eq!(mapping.operator, "Operador");
        assert_eq!(mapping.measurements, vec!["Medicion1", "Medicion2"]);
    }

    #[test]
    fn rejects_non_numeric_measurement_cell() {
        let mut table = sample_table();
        table.rows[0][2] = json!("oops");
        let err = validate_msa(&table, &EngineLimits::default()).unwrap_err();
        assert_eq!(err.code, MsaErrorCode::NonNumericData);
    }

    #[test]
    fn rejects_single_part() {
        let mut table = sample_table();
        for row in &mut table.rows {
            row[0] = json!(1);
        }
        let err = validate_msa(&table, &EngineLimits::default()).unwrap_err();
        assert_eq!(err.code, MsaErrorCode::InsufficientData);
    }

    #[test]
    fn rejects_missing_operator_column() {
        let headers = vec!["Parte".to_string(), "Medicion1".to_string(), "Medicion2".to_string()];
        let rows = vec![vec![json!(1), json!(10.1), json!(10.2)]];
        let table = Table::new(headers, rows);
        let err = validate_msa(&table, &EngineLimits::default()).unwrap_err();
        assert_eq!(err.code, MsaErrorCode::MissingColumns);
    }
}
