//! Normality engine: Anderson-Darling test plus Box-Cox / Johnson-SU
//! transformation fallbacks (spec.md §4.4).

pub mod anderson_darling;
pub mod boxcox;
pub mod johnson_su;

use serde::{Deserialize, Serialize};

use crate::config::EngineLimits;
use anderson_darling::anderson_darling_normality;
use boxcox::box_cox_search;
use johnson_su::johnson_su_search;

/// Which path produced a normal result, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalityMethod {
    /// The original data tested as normal.
    Original,
    /// A Box-Cox transform tested as normal.
    BoxCox,
    /// A Johnson-SU transform tested as normal.
    JohnsonSu,
    /// No transform produced normality.
    None,
}

/// Box-Cox metadata retained even on failure (spec.md §4.4: "still
/// recording the attempted Box-Cox parameters as metadata").
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxCoxParams {
    /// Best λ found by the grid search.
    pub lambda: f64,
    /// Shift applied before transforming.
    pub shift: f64,
}

/// The full normality analysis result (spec.md §4.4, §6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalityResult {
    /// Whether the winning method's data tests as normal.
    pub is_normal: bool,
    /// Anderson-Darling A²* of the winning method.
    pub ad_statistic: f64,
    /// p-value of the winning method.
    pub p_value: f64,
    /// Which path won.
    pub method: NormalityMethod,
    /// Box-Cox parameters, always recorded if the search ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boxcox: Option<BoxCoxParams>,
    /// Johnson-SU γ, δ parameters, recorded if that path was attempted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub johnson_su: Option<(f64, f64)>,
}

/// Runs the normality orchestrator: tries `{original, Box-Cox,
/// Johnson-SU}` in order and returns the first success, tagged by
/// `method`. Metadata about attempted transforms is retained even when
/// none of them succeed (spec.md §4.4).
#[must_use]
pub fn analyze_normality(data: &[f64], limits: &EngineLimits) -> NormalityResult {
    let original = anderson_darling_normality(data);
    if original.is_normal {
        return NormalityResult {
            is_normal: true,
            ad_statistic: original.ad_statistic,
            p_value: original.p_value,
            method: NormalityMethod::Original,
            boxcox: None,
            johnson_su: None,
        };
    }

    let boxcox_attempt = box_cox_search(data, limits);
    if let Some(attempt) = boxcox_attempt {
        if attempt.ad.is_normal {
            return NormalityResult {
                is_normal: true,
                ad_statistic: attempt.ad.ad_statistic,
                p_value: attempt.ad.p_value,
                method: NormalityMethod::BoxCox,
                boxcox: Some(BoxCoxParams { lambda: attempt.lambda, shift: attempt.shift }),
                johnson_su: None,
            };
        }
    }

    let johnson_attempt = johnson_su_search(data, limits);
    if let Some(attempt) = johnson_attempt {
        if attempt.ad.is_normal {
            return NormalityResult {
                is_normal: true,
                ad_statistic: attempt.ad.ad_statistic,
                p_value: attempt.ad.p_value,
                method: NormalityMethod::JohnsonSu,
                boxcox: boxcox_attempt.map(|a| BoxCoxParams { lambda: a.lambda, shift: a.shift }),
                johnson_su: Some((attempt.gamma, attempt.delta)),
            };
        }
    }

    NormalityResult {
        is_normal: false,
        ad_statistic: original.ad_statistic,
        p_value: original.p_value,
        method: NormalityMethod::None,
        boxcox: boxcox_attempt.map(|a| BoxCoxParams { lambda: a.lambda, shift: a.shift }),
        johnson_su: johnson_attempt.map(|a| (a.gamma, a.delta)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_normal_data_uses_original_method() {
        let data: Vec<f64> = (0..20).map(|i| 100.0 + (f64::from(i) - 9.5) * 0.1).collect();
        let result = analyze_normality(&data, &EngineLimits::default());
        assert!(result.is_normal);
        assert_eq!(result.method, NormalityMethod::Original);
    }

    #[test]
    fn right_skewed_data_attempts_transforms() {
        let data = [1.2, 1.5, 1.8, 2.3, 2.9, 3.5, 4.2, 5.1, 6.3, 8.0, 10.5, 14.0, 19.0, 25.0, 35.0];
        let result = analyze_normality(&data, &EngineLimits::default());
        assert_ne!(result.method, NormalityMethod::Original);
        assert!(result.boxcox.is_some());
    }
}
