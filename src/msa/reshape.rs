//! Wide-to-long reshape for the MSA pipeline (spec.md §4.3).

use crate::error::AnalysisError;
use crate::msa::types::LongRow;
use crate::table::Table;
use crate::validators::{ColumnMapping, cell_label, parse_cell};

/// The long-form measurement data plus the part/operator label lists used
/// to re-attach human-readable names to indices downstream.
#[derive(Debug, Clone)]
pub struct LongForm {
    /// One row per (part, operator, replicate) observation.
    pub rows: Vec<LongRow>,
    /// Unique part labels, in first-seen order.
    pub part_labels: Vec<String>,
    /// Unique operator labels, in first-seen order.
    pub operator_labels: Vec<String>,
}

/// Converts a wide MSA table into long form: each row of the input
/// becomes `mapping.measurements.len()` long rows (spec.md §4.3).
///
/// # Errors
/// Returns [`AnalysisError::Calculation`] if a mapped column is missing
/// from the table or a measurement cell is not numeric (the validator is
/// expected to have already ruled this out).
pub fn reshape_to_long(table: &Table, mapping: &ColumnMapping) -> Result<LongForm, AnalysisError> {
    let part_col = table
        .column_index(&mapping.part)
        .ok_or_else(|| AnalysisError::Calculation(format!("part column '{}' not found", mapping.part)))?;
    let operator_col = table
        .column_index(&mapping.operator)
        .ok_or_else(|| AnalysisError::Calculation(format!("operator column '{}' not found", mapping.operator)))?;
    let measurement_cols: Vec<usize> = mapping
        .measurements
        .iter()
        .map(|m| {
            table.column_index(m).ok_or_else(|| AnalysisError::Calculation(format!("measurement column '{m}' not found")))
        })
        .collect::<Result<_, _>>()?;

    let mut part_labels: Vec<String> = Vec::new();
    let mut operator_labels: Vec<String> = Vec::new();
    let mut rows = Vec::with_capacity(table.len() * measurement_cols.len());

    for row in 0..table.len() {
        let part_raw = cell_label(&table.cell(row, part_col));
        let operator_raw = cell_label(&table.cell(row, operator_col));

        let part_index = part_labels.iter().position(|p| p == &part_raw).unwrap_or_else(|| {
            part_labels.push(part_raw.clone());
            part_labels.len() - 1
        });
        let operator_index = operator_labels.iter().position(|o| o == &operator_raw).unwrap_or_else(|| {
            operator_labels.push(operator_raw.clone());
            operator_labels.len() - 1
        });

        for &col in &measurement_cols {
            let raw = table.cell(row, col);
            let value = parse_cell(&raw)
                .ok_or_else(|| AnalysisError::Calculation(format!("non-numeric measurement cell at row {row}")))?;
            rows.push(LongRow { part: part_index, operator: operator_index, value });
        }
    }

    Ok(LongForm { rows, part_labels, operator_labels })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reshape_produces_one_row_per_measurement() {
        let headers = vec!["Parte".to_string(), "Operador".to_string(), "M1".to_string(), "M2".to_string()];
        let rows = vec![vec![json!(1), json!("A"), json!(10.0), json!(10.5)], vec![json!(1), json!("B"), json!(9.5), json!(9.8)]];
        let table = Table::new(headers, rows);
        let mapping = ColumnMapping { part: "Parte".to_string(), operator: "Operador".to_string(), measurements: vec!["M1".to_string(), "M2".to_string()] };

        let long = reshape_to_long(&table, &mapping).expect("valid reshape");
        assert_eq!(long.rows.len(), 4);
        assert_eq!(long.part_labels.len(), 1);
        assert_eq!(long.operator_labels.len(), 2);
    }
}
