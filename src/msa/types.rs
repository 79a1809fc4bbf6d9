//! MSA result types (spec.md §3, §4.3).

use serde::{Deserialize, Serialize};

/// One long-form measurement row: part, operator, and value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LongRow {
    /// Index of the part within the unique, sorted part list.
    pub part: usize,
    /// Index of the operator within the unique, sorted operator list.
    pub operator: usize,
    /// The measurement value.
    pub value: f64,
}

/// One row of the two-way crossed ANOVA table (spec.md §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnovaRow {
    /// Sum of squares.
    pub sum_of_squares: f64,
    /// Degrees of freedom.
    pub degrees_of_freedom: f64,
    /// Mean square (`sum_of_squares / degrees_of_freedom`).
    pub mean_square: f64,
    /// F statistic, or `None` for the Equipment/Total rows which are not tested.
    pub f_statistic: Option<f64>,
    /// Upper-tail p-value from the F distribution, or `None`.
    pub p_value: Option<f64>,
}

/// The full two-way crossed ANOVA table: Part, Operator, Interaction,
/// Equipment (repeatability residual), and Total rows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnovaTable {
    /// Part (between-parts) row.
    pub part: AnovaRow,
    /// Operator (between-operators) row.
    pub operator: AnovaRow,
    /// Operator × Part interaction row.
    pub interaction: AnovaRow,
    /// Equipment / repeatability residual row.
    pub equipment: AnovaRow,
    /// Total row.
    pub total: AnovaRow,
}

/// Non-negative variance components decomposing total measurement
/// variance (spec.md §3). Invariant: every field ≥ 0 and
/// `total ≈ repeatability + reproducibility + part`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VarianceComponents {
    /// σ² repeatability (equipment variation, `MS_Equipment`).
    pub repeatability: f64,
    /// σ² operator main effect.
    pub operator: f64,
    /// σ² operator × part interaction.
    pub interaction: f64,
    /// σ² reproducibility = operator + interaction.
    pub reproducibility: f64,
    /// σ² part-to-part.
    pub part: f64,
    /// σ² total.
    pub total: f64,
}

/// GRR percentage-of-variation breakdown, relative to `σ_total`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrrPercentages {
    /// `%` repeatability.
    pub repeatability: f64,
    /// `%` reproducibility.
    pub reproducibility: f64,
    /// `%` GRR total (repeatability + reproducibility).
    pub grr_total: f64,
    /// `%` part-to-part.
    pub part_to_part: f64,
}

/// Measurement-system capability classification (spec.md §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrrClassification {
    /// GRR% < 10.
    Aceptable,
    /// 10 ≤ GRR% ≤ 30.
    Marginal,
    /// GRR% > 30.
    Inaceptable,
}

impl GrrClassification {
    /// Classifies a GRR percentage per spec.md §4.3's exact boundary
    /// semantics (9.9 → aceptable, 10.0 and 30.0 → marginal, 30.1 → inaceptable).
    #[must_use]
    pub fn from_grr_percent(grr_percent: f64) -> Self {
        if grr_percent < crate::constants::GRR_ACCEPTABLE_MAX {
            Self::Aceptable
        } else if grr_percent <= crate::constants::GRR_MARGINAL_MAX {
            Self::Marginal
        } else {
            Self::Inaceptable
        }
    }
}

/// The dominant source of measurement-system variation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DominantSource {
    /// Repeatability dominates.
    Repeatability,
    /// Reproducibility dominates.
    Reproducibility,
    /// Part-to-part variation dominates.
    PartToPart,
}

/// Per-operator descriptive stats (spec.md §4.3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatorStats {
    /// Operator label.
    pub operator: String,
    /// Mean of this operator's measurements.
    pub mean: f64,
    /// Sample standard deviation (`ddof = 1`) of this operator's measurements.
    pub std_dev: f64,
    /// Average per-part range across this operator's replicates.
    pub average_range: f64,
    /// CV-based consistency score: `std / |mean| * 100`, or `std * 100`
    /// when `|mean|` is ~0.
    pub consistency_score: f64,
    /// 1-based rank, ascending by `consistency_score` (1 = most consistent).
    pub rank: u32,
}

/// Combined numeric MSA results (spec.md §3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MsaResults {
    /// The two-way crossed ANOVA table.
    pub anova: AnovaTable,
    /// Non-negative variance components.
    pub variance_components: VarianceComponents,
    /// Percentage-of-total-variation breakdown.
    pub percentages: GrrPercentages,
    /// Number of distinct categories, capped at 999.
    pub ndc: u32,
    /// Measurement-system classification.
    pub classification: GrrClassification,
    /// Per-operator descriptive stats, ranked by consistency.
    pub operator_stats: Vec<OperatorStats>,
    /// Number of unique parts.
    pub part_count: usize,
    /// Number of unique operators.
    pub operator_count: usize,
    /// Number of replicate measurement columns.
    pub replicate_count: usize,
}
