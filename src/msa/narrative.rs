//! Spanish markdown narrative for the MSA report (spec.md §4.3).
//!
//! Three parts — technical, statistical conclusion, plain-language — built
//! from the result tables and branching on classification, dominant
//! source, and an optional specification/bias side-panel.

use std::fmt::Write as _;

use crate::msa::types::{DominantSource, GrrClassification, GrrPercentages, MsaResults};

fn classification_label(c: GrrClassification) -> &'static str {
    match c {
        GrrClassification::Aceptable => "aceptable",
        GrrClassification::Marginal => "marginal",
        GrrClassification::Inaceptable => "inaceptable",
    }
}

fn dominant_label(d: DominantSource) -> &'static str {
    match d {
        DominantSource::Repeatability => "la repetibilidad (variación del equipo)",
        DominantSource::Reproducibility => "la reproducibilidad (variación entre operadores)",
        DominantSource::PartToPart => "la variación parte a parte",
    }
}

/// Builds the full Spanish markdown narrative for an MSA result.
///
/// # Panics
/// Never panics: every `expect` guards a `write!` into a `String`, which
/// never fails.
#[must_use]
pub fn build_narrative(
    results: &MsaResults,
    pct: &GrrPercentages,
    classification: GrrClassification,
    dominant: DominantSource,
    specification: Option<f64>,
) -> String {
    let mut md = String::new();

    writeln!(md, "# Análisis del Sistema de Medición (R&R)").expect("writing to a String never fails");
    writeln!(md).expect("writing to a String never fails");
    writeln!(md, "## Resumen técnico").expect("writing to a String never fails");
    writeln!(md).expect("writing to a String never fails");
    writeln!(
        md,
        "- **%GRR (Gauge R&R):** {:.2}% — clasificación **{}**",
        pct.grr_total,
        classification_label(classification)
    )
    .expect("writing to a String never fails");
    writeln!(md, "- **%Repetibilidad (EV):** {:.2}%", pct.repeatability).expect("writing to a String never fails");
    writeln!(md, "- **%Reproducibilidad (AV):** {:.2}%", pct.reproducibility).expect("writing to a String never fails");
    writeln!(md, "- **%Parte a parte:** {:.2}%", pct.part_to_part).expect("writing to a String never fails");
    writeln!(md, "- **ndc (categorías distintas):** {}", results.ndc).expect("writing to a String never fails");
    writeln!(md).expect("writing to a String never fails");

    writeln!(md, "## Conclusión estadística").expect("writing to a String never fails");
    writeln!(md).expect("writing to a String never fails");
    match classification {
        GrrClassification::Aceptable => {
            writeln!(
                md,
                "El sistema de medición es **aceptable** (%GRR = {:.2}% < 10%). La mayor parte de la variación observada \
                 proviene de {}, lo que indica que el sistema de medición discrimina adecuadamente entre piezas.",
                pct.grr_total,
                dominant_label(dominant)
            )
            .expect("writing to a String never fails");
        }
        GrrClassification::Marginal => {
            writeln!(
                md,
                "El sistema de medición es **marginal** (10% ≤ %GRR = {:.2}% ≤ 30%). Se recomienda investigar la fuente \
                 dominante de variación, {}, antes de usar este sistema en decisiones críticas de calidad.",
                pct.grr_total,
                dominant_label(dominant)
            )
            .expect("writing to a String never fails");
        }
        GrrClassification::Inaceptable => {
            writeln!(
                md,
                "El sistema de medición es **inaceptable** (%GRR = {:.2}% > 30%). La fuente dominante de variación es {}. \
                 Se recomienda no utilizar este sistema de medición hasta corregir esta causa.",
                pct.grr_total,
                dominant_label(dominant)
            )
            .expect("writing to a String never fails");
        }
    }
    writeln!(md).expect("writing to a String never fails");

    if let Some(nominal) = specification {
        writeln!(md, "### Sesgo respecto al valor de referencia").expect("writing to a String never fails");
        writeln!(md).expect("writing to a String never fails");
        let grand_mean = results.operator_stats.iter().map(|s| s.mean).sum::<f64>() / results.operator_stats.len().max(1) as f64;
        let bias = grand_mean - nominal;
        writeln!(
            md,
            "El valor de referencia especificado es {nominal:.4}; la media general observada es {grand_mean:.4} (sesgo = {bias:.4})."
        )
        .expect("writing to a String never fails");
        writeln!(md).expect("writing to a String never fails");
    }

    writeln!(md, "## En palabras simples").expect("writing to a String never fails");
    writeln!(md).expect("writing to a String never fails");
    match classification {
        GrrClassification::Aceptable => writeln!(
            md,
            "El instrumento y los operadores miden de forma consistente: se puede confiar en las mediciones para tomar \
             decisiones sobre la calidad del producto."
        ),
        GrrClassification::Marginal => writeln!(
            md,
            "El instrumento y los operadores muestran cierta inconsistencia. Las mediciones pueden usarse con precaución, \
             pero conviene mejorar el sistema de medición."
        ),
        GrrClassification::Inaceptable => writeln!(
            md,
            "Las mediciones no son confiables: gran parte de la variación observada proviene del sistema de medición y no \
             de las piezas en sí. No se recomienda tomar decisiones de calidad con estos datos hasta corregir el sistema."
        ),
    }
    .expect("writing to a String never fails");

    md
}
