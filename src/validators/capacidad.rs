//! Process Capability input validator (spec.md §4.2, §3).

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::EngineLimits;
use crate::error::{CapacidadErrorCode, CapacidadValidationError, CellLocation, OffendingValue, ValidationDetails};
use crate::table::Table;
use crate::validators::{cell_label, is_empty_cell, parse_cell};

const VALORES_COLUMN: &str = "valores";
const MIN_RECOMMENDED_VALUES: usize = 20;

/// A validated single-column numeric series (spec.md §3). Immutable once
/// constructed by [`validate_capacidad`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatedSeries {
    /// Name of the selected column.
    pub column_name: String,
    /// The column's finite float values, in row order.
    pub values: Vec<f64>,
    /// Spanish advisory strings (e.g. fewer than 20 values); non-fatal.
    pub warnings: Vec<String>,
}

fn candidate_column(table: &Table) -> Option<usize> {
    if let Some(idx) = table.column_index(VALORES_COLUMN) {
        return Some(idx);
    }
    (0..table.headers.len()).find(|&col| {
        (0..table.len()).all(|row| {
            let raw = table.cell(row, col);
            is_empty_cell(&raw) || parse_cell(&raw).is_some()
        })
    })
}

/// Validates a Process Capability table, returning a [`ValidatedSeries`]
/// on success.
///
/// Prefers a column literally named "Valores" (case-insensitive);
/// otherwise selects the first column whose non-empty cells are all
/// numeric-convertible. Empty or non-numeric cells in the selected column
/// fail the analysis; fewer than 20 values is a warning, not an error.
///
/// # Errors
/// Returns a [`CapacidadValidationError`] with the first failing
/// category's code.
pub fn validate_capacidad(table: &Table, limits: &EngineLimits) -> Result<ValidatedSeries, CapacidadValidationError> {
    let Some(col) = candidate_column(table) else {
        return Err(CapacidadValidationError::new(
            CapacidadErrorCode::NoNumericColumn,
            "No se encontró una columna 'Valores' ni ninguna columna numérica.",
        ));
    };
    let column_name = table.headers[col].clone();

    let mut empty_cells = Vec::new();
    let mut offenders = Vec::new();
    let mut values = Vec::with_capacity(table.len());

    for row in 0..table.len() {
        let raw = table.cell(row, col);
        if is_empty_cell(&raw) {
            if empty_cells.len() < limits.max_reported_offenders {
                empty_cells.push(CellLocation { column: crate::validators::column_letter(col), row: row + 2 });
            }
            continue;
        }
        match parse_cell(&raw) {
            Some(v) if v.is_finite() => values.push(v),
            _ => {
                if offenders.len() < limits.max_reported_offenders {
                    offenders.push(OffendingValue { column: column_name.clone(), row: row + 2, raw_value: cell_label(&raw) });
                }
            }
        }
    }

    if !empty_cells.is_empty() {
        return Err(CapacidadValidationError::with_details(
            CapacidadErrorCode::EmptyCells,
            "Se encontraron celdas vacías en la columna seleccionada.",
            ValidationDetails::EmptyCells(empty_cells),
        ));
    }
    if !offenders.is_empty() {
        return Err(CapacidadValidationError::with_details(
            CapacidadErrorCode::NonNumericValues,
            "Se encontraron valores no numéricos en la columna seleccionada.",
            ValidationDetails::OffendingValues(offenders),
        ));
    }

    let mut warnings = Vec::new();
    if values.len() < MIN_RECOMMENDED_VALUES {
        let message = format!(
            "Se recomienda un mínimo de {MIN_RECOMMENDED_VALUES} valores para un análisis confiable; se recibieron {}.",
            values.len()
        );
        warn!(column = %column_name, n = values.len(), "fewer than recommended values, demoting to advisory");
        warnings.push(message);
    }

    Ok(ValidatedSeries { column_name, values, warnings })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prefers_valores_column_case_insensitively() {
        let headers = vec!["id".to_string(), "VALORES".to_string()];
        let rows: Vec<Vec<serde_json::Value>> = (0..25).map(|i| vec![json!(i), json!(f64::from(i) + 1.0)]).collect();
        let table = Table::new(headers, rows);
        let series = validate_capacidad(&table, &EngineLimits::default()).expect("valid");
        assert_eq!(series.column_name, "VALORES");
        assert!(series.warnings.is_empty());
        assert_eq!(series.values.len(), 25);
    }

    #[test]
    fn warns_below_twenty_values() {
        let headers = vec!["Valores".to_string()];
        let rows: Vec<Vec<serde_json::Value>> = (0..5).map(|i| vec![json!(f64::from(i))]).collect();
        let table = Table::new(headers, rows);
        let series = validate_capacidad(&table, &EngineLimits::default()).expect("valid");
        assert_eq!(series.warnings.len(), 1);
    }

    #[test]
    fn rejects_non_numeric_cell() {
        let headers = vec!["Valores".to_string()];
        let rows = vec![vec![json!(1.0)], vec![json!("nope")]];
        let table = Table::new(headers, rows);
        let err = validate_capacidad(&table, &EngineLimits::default()).unwrap_err();
        assert_eq!(err.code, CapacidadErrorCode::NonNumericValues);
    }
}
