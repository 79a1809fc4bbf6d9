//! Spanish markdown narrative for the Process Capability report (spec.md
//! §4.8): basic stats, then normality, then stability, then capability
//! when present, in that fixed order.
//!
//! Grounded on [`crate::msa::narrative`]'s section-by-section
//! `writeln!`-into-`String` shape.

use std::fmt::Write as _;

use crate::capability::{BasicStatistics, CapabilityLevel, CapabilityMethod, CapabilityResult};
use crate::normality::{NormalityMethod, NormalityResult};
use crate::stability::StabilityResult;

fn normality_method_label(method: NormalityMethod) -> &'static str {
    match method {
        NormalityMethod::Original => "los datos originales",
        NormalityMethod::BoxCox => "una transformación Box-Cox",
        NormalityMethod::JohnsonSu => "una transformación Johnson-SU",
        NormalityMethod::None => "ninguna transformación",
    }
}

fn classification_label(level: CapabilityLevel) -> &'static str {
    match level {
        CapabilityLevel::Excellent => "excelente",
        CapabilityLevel::Adequate => "adecuada",
        CapabilityLevel::Marginal => "marginal",
        CapabilityLevel::Inadequate => "inadecuada",
        CapabilityLevel::Poor => "deficiente",
        CapabilityLevel::Unknown => "indeterminada",
    }
}

fn basic_statistics_section(md: &mut String, stats: &BasicStatistics) {
    writeln!(md, "## Estadísticas descriptivas").expect("writing to a String never fails");
    writeln!(md).expect("writing to a String never fails");
    writeln!(md, "- **n:** {}", stats.n).expect("writing to a String never fails");
    writeln!(md, "- **Media:** {:.4}", stats.mean).expect("writing to a String never fails");
    writeln!(md, "- **Desviación estándar:** {:.4}", stats.std_dev).expect("writing to a String never fails");
    writeln!(md, "- **Mínimo / Máximo:** {:.4} / {:.4}", stats.min, stats.max).expect("writing to a String never fails");
    writeln!(md, "- **Mediana:** {:.4}", stats.median).expect("writing to a String never fails");
    writeln!(md, "- **Asimetría / Curtosis:** {:.4} / {:.4}", stats.skewness, stats.excess_kurtosis)
        .expect("writing to a String never fails");
    writeln!(md).expect("writing to a String never fails");
}

fn normality_section(md: &mut String, normality: &NormalityResult) {
    writeln!(md, "## Prueba de normalidad").expect("writing to a String never fails");
    writeln!(md).expect("writing to a String never fails");
    if normality.is_normal {
        writeln!(
            md,
            "Los datos **son consistentes con una distribución normal** (p = {:.4}), evaluados sobre {}.",
            normality.p_value,
            normality_method_label(normality.method)
        )
        .expect("writing to a String never fails");
    } else {
        writeln!(
            md,
            "Los datos **no son consistentes con una distribución normal** (p = {:.4}) ni siquiera después de intentar \
             transformaciones Box-Cox y Johnson-SU. Los índices de capacidad se reportarán mediante el método no normal, \
             basado en percentiles de la distribución ajustada.",
            normality.p_value
        )
        .expect("writing to a String never fails");
    }
    writeln!(md).expect("writing to a String never fails");
}

fn stability_section(md: &mut String, stability: &StabilityResult) {
    writeln!(md, "## Estabilidad del proceso (I-MR)").expect("writing to a String never fails");
    writeln!(md).expect("writing to a String never fails");
    if stability.is_stable {
        writeln!(
            md,
            "El proceso se encuentra **bajo control estadístico**: ninguna de las siete reglas de Western Electric \
             detectó una causa especial de variación."
        )
        .expect("writing to a String never fails");
    } else {
        writeln!(
            md,
            "El proceso **no se encuentra bajo control estadístico**. Se detectaron violaciones en una o más de las \
             siete reglas de estabilidad; se recomienda investigar las causas especiales antes de interpretar los \
             índices de capacidad."
        )
        .expect("writing to a String never fails");
    }
    writeln!(md, "- **σ dentro de subgrupo (MR̄/d2):** {:.4}", stability.sigma_within).expect("writing to a String never fails");
    writeln!(md).expect("writing to a String never fails");
}

fn capability_section(md: &mut String, capability: &CapabilityResult) {
    writeln!(md, "## Capacidad del proceso").expect("writing to a String never fails");
    writeln!(md).expect("writing to a String never fails");
    if let Some(cp) = capability.cp {
        writeln!(md, "- **Cp:** {cp:.3}").expect("writing to a String never fails");
    }
    if let Some(cpk) = capability.cpk {
        writeln!(md, "- **Cpk:** {:.3} (capacidad {})", cpk, classification_label(capability.cpk_classification))
            .expect("writing to a String never fails");
    }
    if let Some(pp) = capability.pp {
        writeln!(md, "- **Pp:** {pp:.3}").expect("writing to a String never fails");
    }
    if let Some(ppk) = capability.ppk {
        writeln!(md, "- **Ppk:** {:.3} (desempeño {})", ppk, classification_label(capability.ppk_classification))
            .expect("writing to a String never fails");
    }
    writeln!(md, "- **PPM estimado (total):** {}", capability.ppm.total).expect("writing to a String never fails");
    writeln!(md).expect("writing to a String never fails");

    match capability.method {
        CapabilityMethod::Normal => writeln!(
            md,
            "Los índices se calcularon asumiendo una distribución normal, con el PPM estimado mediante el modelo \
             normal-teórico."
        ),
        CapabilityMethod::NonNormal => writeln!(
            md,
            "Dado que los datos no pasaron la prueba de normalidad, los índices Pp/Ppk no normales se calcularon a \
             partir de percentiles empíricos, y el PPM se estimó con la distribución ajustada de mejor desempeño."
        ),
    }
    .expect("writing to a String never fails");
    writeln!(md).expect("writing to a String never fails");
}

/// Builds the full Spanish markdown narrative for a Process Capability
/// result, concatenating sections in the fixed order basic stats →
/// normality → stability → capability (spec.md §4.8).
///
/// # Panics
/// Never panics: every `expect` guards a `write!` into a `String`, which
/// never fails.
#[must_use]
pub fn build_narrative(
    basic: &BasicStatistics,
    normality: &NormalityResult,
    stability: &StabilityResult,
    capability: Option<&CapabilityResult>,
) -> String {
    let mut md = String::new();
    writeln!(md, "# Análisis de Capacidad de Proceso").expect("writing to a String never fails");
    writeln!(md).expect("writing to a String never fails");

    basic_statistics_section(&mut md, basic);
    normality_section(&mut md, normality);
    stability_section(&mut md, stability);
    if let Some(capability) = capability {
        capability_section(&mut md, capability);
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::basic_statistics;
    use crate::normality::analyze_normality;
    use crate::stability::analyze_stability;
    use crate::config::EngineLimits;

    #[test]
    fn narrative_always_includes_basic_and_normality_and_stability_sections() {
        let values: Vec<f64> = (0..30).map(|i| 10.0 + f64::from(i) * 0.05).collect();
        let basic = basic_statistics(&values);
        let normality = analyze_normality(&values, &EngineLimits::default());
        let stability = analyze_stability(&values);
        let md = build_narrative(&basic, &normality, &stability, None);
        assert!(md.contains("Estadísticas descriptivas"));
        assert!(md.contains("Prueba de normalidad"));
        assert!(md.contains("Estabilidad del proceso"));
        assert!(!md.contains("## Capacidad del proceso"));
    }
}
