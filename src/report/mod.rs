//! Report/chart assembler (spec.md §4.8): merges numeric results into the
//! document shape spec.md §6 describes, `{results, chartData,
//! instructions}`, plus the family-specific top-level fields.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One chart-ready data series: a type tag plus an arbitrary JSON payload.
/// Rendering is out of scope (spec.md §4.8); this is plain structured data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartEntry {
    /// Chart type tag (e.g. `"variation_breakdown"`, `"i_chart"`, `"histogram"`).
    #[serde(rename = "type")]
    pub chart_type: String,
    /// The chart's structured payload.
    pub data: Value,
}

impl ChartEntry {
    /// Builds a chart entry, serializing `data` to JSON.
    ///
    /// # Panics
    /// Panics if `data` cannot be serialized, which would indicate a
    /// programmer error (a non-serializable payload type), not a runtime
    /// data condition.
    #[must_use]
    pub fn new<T: Serialize>(chart_type: impl Into<String>, data: &T) -> Self {
        Self {
            chart_type: chart_type.into(),
            data: serde_json::to_value(data).expect("chart payload types are always JSON-serializable"),
        }
    }
}

/// The MSA analysis document (spec.md §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MsaDocument {
    /// Numeric MSA results.
    pub results: crate::msa::types::MsaResults,
    /// Chart-ready data series, in the fixed order of spec.md §4.3.
    #[serde(rename = "chartData")]
    pub chart_data: Vec<ChartEntry>,
    /// Spanish markdown narrative.
    pub instructions: String,
    /// The dominant source of variation (also top-level per spec.md §6).
    pub dominant_variation: crate::msa::types::DominantSource,
    /// The measurement-system classification (also top-level).
    pub classification: crate::msa::types::GrrClassification,
}

/// The Process Capability analysis document (spec.md §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapacidadDocument {
    /// Numeric results, nested by subsystem.
    pub results: CapacidadResults,
    /// Chart-ready data series, in the conditional order of spec.md §4.8.
    #[serde(rename = "chartData")]
    pub chart_data: Vec<ChartEntry>,
    /// Spanish markdown narrative.
    pub instructions: String,
}

/// Nested numeric results for the Process Capability document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapacidadResults {
    /// Basic descriptive statistics.
    pub basic_statistics: crate::capability::BasicStatistics,
    /// Normality test / transformation results.
    pub normality: crate::normality::NormalityResult,
    /// Best-fit non-normal distribution, present only when the data did
    /// not test as normal under any transform (spec.md §4.5, §4.7).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution_fit: Option<crate::distributions::DistributionFit>,
    /// I-MR stability analysis.
    pub stability: crate::stability::StabilityResult,
    /// Capability indices, present only when specification limits were given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capability: Option<crate::capability::CapabilityResult>,
}
