//! Structured errors, modeled as typed sum types over the closed code sets
//! in `spec.md` §3/§7 (a nullable-tuple / sentinel-string encoding is
//! deliberately not used here — see `spec.md` §9).
//!
//! Two layers: a serializable, user-facing error envelope and an internal
//! `thiserror` enum for faults that never reach a caller as structured
//! data:
//!
//! - [`ValidationError`] is returned *as a value* by validators. It is the
//!   only error family a caller of [`crate::analyze_msa`] or
//!   [`crate::analyze_capacidad_proceso`] should normally see.
//! - [`AnalysisError`] covers programmer-error conditions inside the
//!   pipeline. Per spec.md §7 this is rare: the validator is the guard
//!   that makes it so; statistical degeneracies are encoded in the result
//!   type itself, never raised.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Offending-cell coordinate, reported in spreadsheet notation
/// (1-indexed row including the header row, letter column).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellLocation {
    /// Spreadsheet column letter(s), e.g. `"A"`, `"AB"`.
    pub column: String,
    /// 1-indexed row number, counting the header as row 1.
    pub row: usize,
}

/// A single offending value reported by a validator's numeric check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffendingValue {
    /// Name of the column the offending cell belongs to.
    pub column: String,
    /// 1-indexed row number, counting the header as row 1.
    pub row: usize,
    /// The raw, unparsed value as it appeared in the table.
    pub raw_value: String,
}

/// Structured detail payload carried by a [`ValidationError`].
///
/// spec.md §6 describes `details` loosely as "an array of offending
/// cells/rows or a list of Spanish strings". Modeled here as a closed enum
/// instead of an untyped array, per spec.md §9's invitation to prefer
/// tagged unions over the original's dynamically-typed encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValidationDetails {
    /// Offending numeric cells (non-numeric or unparseable values).
    OffendingValues(Vec<OffendingValue>),
    /// Empty-cell locations in spreadsheet notation.
    EmptyCells(Vec<CellLocation>),
    /// Free-form Spanish advisory strings (e.g. missing-column names).
    Messages(Vec<String>),
}

/// Closed error-code set for the MSA validator (spec.md §3, §4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MsaErrorCode {
    /// Part, Operator, or fewer than two measurement columns could not be
    /// detected by name.
    MissingColumns,
    /// A measurement cell could not be parsed as a number.
    NonNumericData,
    /// A required cell (measurement, part, or operator) was empty.
    EmptyCells,
    /// Fewer than two unique parts, operators, or measurement columns.
    InsufficientData,
    /// The pipeline faulted downstream of validation (spec.md §6) — an
    /// unbalanced design, a degenerate ANOVA, or a caller-supplied
    /// `ColumnMapping` that does not match the table.
    CalculationError,
}

impl std::fmt::Display for MsaErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = match self {
            Self::MissingColumns => "MISSING_COLUMNS",
            Self::NonNumericData => "NON_NUMERIC_DATA",
            Self::EmptyCells => "EMPTY_CELLS",
            Self::InsufficientData => "INSUFFICIENT_DATA",
            Self::CalculationError => "CALCULATION_ERROR",
        };
        f.write_str(code)
    }
}

/// Closed error-code set for the Process Capability validator (spec.md §3,
/// §4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CapacidadErrorCode {
    /// No column named "Valores" and no numeric-convertible column could
    /// be found.
    NoNumericColumn,
    /// A cell in the selected column was empty.
    EmptyCells,
    /// A cell in the selected column could not be parsed as a number.
    NonNumericValues,
    /// The caller-supplied specification limits are non-finite or
    /// inverted (`lei >= les`), per spec.md §4.7.
    InvalidSpecLimits,
}

impl std::fmt::Display for CapacidadErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = match self {
            Self::NoNumericColumn => "NO_NUMERIC_COLUMN",
            Self::EmptyCells => "EMPTY_CELLS",
            Self::NonNumericValues => "NON_NUMERIC_VALUES",
            Self::InvalidSpecLimits => "INVALID_SPEC_LIMITS",
        };
        f.write_str(code)
    }
}

/// A structured, user-facing validation error (spec.md §3, §6, §7).
///
/// `message` is always in Spanish, suitable for direct end-user display;
/// `details` is structured for programmatic formatting by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError<Code> {
    /// One of the closed per-family error codes.
    pub code: Code,
    /// Spanish, user-facing message.
    pub message: String,
    /// Structured offender list or advisory strings, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<ValidationDetails>,
}

impl<Code> ValidationError<Code> {
    /// Builds a validation error with no structured detail payload.
    pub fn new(code: Code, message: impl Into<String>) -> Self {
        Self { code, message: message.into(), details: None }
    }

    /// Builds a validation error carrying structured offender detail.
    pub fn with_details(code: Code, message: impl Into<String>, details: ValidationDetails) -> Self {
        Self { code, message: message.into(), details: Some(details) }
    }
}

/// Validation error returned by the MSA validator.
pub type MsaValidationError = ValidationError<MsaErrorCode>;
/// Validation error returned by the Process Capability validator.
pub type CapacidadValidationError = ValidationError<CapacidadErrorCode>;

impl<Code: std::fmt::Display> std::fmt::Display for ValidationError<Code> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl<Code: std::fmt::Debug + std::fmt::Display> std::error::Error for ValidationError<Code> {}

/// Internal computation fault (spec.md §7: "programmer bugs propagate as
/// exceptions"). Never returned for statistical degeneracies — those are
/// encoded in the result: `None` indices, `+∞` A², capped `ndc`, empty
/// violation lists, `method = "none"`.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A numeric primitive was called outside its domain (spec.md §4.1,
    /// §7): e.g. `normal_ppf` with `p` outside `(0, 1)`, or `log_gamma`
    /// with a non-positive argument.
    #[error("argument out of domain: {0}")]
    InvalidDomain(String),
    /// The reshape or ANOVA solver was handed a table that does not match
    /// its `ColumnMapping` — a caller contract violation, not a
    /// data-quality issue the validator would catch.
    #[error("calculation error: {0}")]
    Calculation(String),
}
