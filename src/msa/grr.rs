//! GRR percentages, classification, `ndc`, and dominant-source selection
//! (spec.md §4.3).

use crate::constants::{NDC_CAP, SIGMA_ZERO_EPSILON};
use crate::msa::types::{DominantSource, GrrClassification, GrrPercentages, VarianceComponents};

/// Converts variance components to percentage-of-`σ_total` shares.
/// Zero when `σ_total` is degenerate (spec.md §4.3).
#[must_use]
pub fn grr_percentages(vc: &VarianceComponents) -> GrrPercentages {
    let sigma_total = vc.total.sqrt();
    let pct = |sigma2: f64| -> f64 {
        if sigma_total < SIGMA_ZERO_EPSILON {
            0.0
        } else {
            100.0 * sigma2.sqrt() / sigma_total
        }
    };
    GrrPercentages {
        repeatability: pct(vc.repeatability),
        reproducibility: pct(vc.reproducibility),
        grr_total: pct(vc.repeatability + vc.reproducibility),
        part_to_part: pct(vc.part),
    }
}

/// Number of distinct categories: `floor(1.41 * sigma_part / sigma_grr)`,
/// capped at 999 when `sigma_grr` is degenerate (spec.md §4.3, §9).
#[must_use]
#[allow(clippy::cast_possible_truncation, reason = "ndc is documented as a small non-negative integer per spec.md §3")]
#[allow(clippy::cast_sign_loss, reason = "the floored value is non-negative: sigma ratios are non-negative")]
pub fn number_of_distinct_categories(vc: &VarianceComponents) -> u32 {
    let sigma_grr = (vc.repeatability + vc.reproducibility).sqrt();
    if sigma_grr < SIGMA_ZERO_EPSILON {
        return NDC_CAP;
    }
    let sigma_part = vc.part.sqrt();
    let ndc = (1.41 * sigma_part / sigma_grr).floor();
    if ndc >= f64::from(NDC_CAP) { NDC_CAP } else { ndc as u32 }
}

/// Selects the dominant source of variation by largest percentage share,
/// ties resolving `repeatability > reproducibility > part_to_part`
/// (spec.md §4.3).
#[must_use]
pub fn dominant_source(pct: &GrrPercentages) -> DominantSource {
    if pct.repeatability >= pct.reproducibility && pct.repeatability >= pct.part_to_part {
        DominantSource::Repeatability
    } else if pct.reproducibility >= pct.part_to_part {
        DominantSource::Reproducibility
    } else {
        DominantSource::PartToPart
    }
}

/// Classifies a GRR percentage (spec.md §4.3 boundary semantics).
#[must_use]
pub fn classify(pct: &GrrPercentages) -> GrrClassification {
    GrrClassification::from_grr_percent(pct.grr_total)
}
