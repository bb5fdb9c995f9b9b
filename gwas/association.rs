// ========================================================================================
//
//                                 THE ASSOCIATION ENGINE
//
// ========================================================================================
//
// Per-marker case/control association tests on a fully ingested, normalized
// cohort. Allele slot 0 is the reference (control-majority) allele and slot 1
// the risk allele in both groups; the ingestion engine guarantees this order.
//
// Undefined statistics are never an error: a zero denominator yields an
// infinite or NaN value that the report renders distinctly from a finite one.

use crate::cohort::Cohort;
use crate::config::{DEFAULT_ALPHA, DEFAULT_MODEL};
use crate::types::{Marker, MarkerStats};
use statrs::distribution::{ChiSquared, ContinuousCDF};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The penetrance model used to build the contingency table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssociationModel {
    /// 2x2 table of allele counts by phenotype group.
    Allelic,
    Dominant,
    Recessive,
    Genotypic,
}

impl AssociationModel {
    pub fn name(self) -> &'static str {
        match self {
            Self::Allelic => "allelic",
            Self::Dominant => "dominant",
            Self::Recessive => "recessive",
            Self::Genotypic => "genotypic",
        }
    }
}

impl fmt::Display for AssociationModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AssociationModel {
    type Err = AssociationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "allelic" => Ok(Self::Allelic),
            "dominant" => Ok(Self::Dominant),
            "recessive" => Ok(Self::Recessive),
            "genotypic" => Ok(Self::Genotypic),
            _ => Err(AssociationError::UnknownModel(s.to_string())),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssociationError {
    #[error("association model '{0}' is not implemented; only 'allelic' is available")]
    UnimplementedModel(AssociationModel),
    #[error("unknown association model '{0}'; only 'allelic' is available")]
    UnknownModel(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssociationConfig {
    pub model: String,
    /// Significance level. Only used to choose which markers to emphasize in
    /// the log; nothing is stored per marker.
    pub alpha: f64,
}

impl Default for AssociationConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            alpha: DEFAULT_ALPHA,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssociationSummary {
    pub model: AssociationModel,
    pub markers_tested: usize,
    /// Markers whose odds ratio or p-value is not finite.
    pub markers_undefined: usize,
    /// Indices of markers whose adjusted p-value fell below the threshold.
    pub significant_markers: Vec<usize>,
    pub significance_threshold: f64,
}

/// Runs the selected association test on every marker of the cohort and
/// stores the statistics in place.
///
/// The engine borrows the cohort exclusively for the duration of the call.
/// An unknown or unimplemented model is reported before any marker is
/// touched, leaving the cohort exactly as it was.
pub fn test_association(
    cohort: &mut Cohort,
    config: &AssociationConfig,
) -> Result<AssociationSummary, AssociationError> {
    let model: AssociationModel = config.model.parse()?;
    if model != AssociationModel::Allelic {
        return Err(AssociationError::UnimplementedModel(model));
    }

    let n_markers = cohort.n_markers();
    let threshold = significance_threshold(config.alpha, n_markers);
    let mut summary = AssociationSummary {
        model,
        markers_tested: 0,
        markers_undefined: 0,
        significant_markers: Vec::new(),
        significance_threshold: threshold,
    };

    log::info!(
        "Testing {n_markers} markers under the {model} model (alpha = {}, per-marker threshold = {threshold:.3e}).",
        config.alpha
    );

    for (idx, marker) in cohort.markers_mut().iter_mut().enumerate() {
        let stats = allelic_test(marker, n_markers);
        marker.stats = Some(stats);
        summary.markers_tested += 1;

        if !stats.odds_ratio.is_finite() || !stats.p_value.is_finite() {
            summary.markers_undefined += 1;
            log::debug!("Marker {marker}: statistics undefined for its allele counts.");
        }
        if stats.adjusted_p_value < threshold {
            summary.significant_markers.push(idx);
            log::info!(
                "Marker {marker} is significant: OR = {:.4}, P = {:.3e}, adjusted P = {:.3e}.",
                stats.odds_ratio,
                stats.p_value,
                stats.adjusted_p_value
            );
        }
    }

    if summary.markers_undefined > 0 {
        log::warn!(
            "{} of {} markers have undefined statistics (a zero allele count in the 2x2 table).",
            summary.markers_undefined,
            summary.markers_tested
        );
    }
    log::info!(
        "{} of {} markers reached significance.",
        summary.significant_markers.len(),
        summary.markers_tested
    );

    Ok(summary)
}

/// Allelic test for one marker: a 2x2 table of {case, control} by
/// {reference, risk} allele counts.
pub fn allelic_test(marker: &Marker, n_markers: usize) -> MarkerStats {
    let table = [
        [
            f64::from(marker.cases.reference_count()),
            f64::from(marker.cases.risk_count()),
        ],
        [
            f64::from(marker.controls.reference_count()),
            f64::from(marker.controls.risk_count()),
        ],
    ];

    let odds_ratio = odds_ratio(&table);
    let relative_risk = relative_risk(&table, odds_ratio);
    let chi_square = pearson_chi_square(&table);
    let p_value = chi_square_p_value(chi_square);
    let adjusted_p_value = sidak_adjust(p_value, n_markers);

    MarkerStats {
        odds_ratio,
        relative_risk,
        chi_square,
        p_value,
        adjusted_p_value,
    }
}

/// (case risk × control ref) / (case ref × control risk). A zero denominator
/// gives `inf`, or `NaN` when the numerator is zero too.
pub fn odds_ratio(table: &[[f64; 2]; 2]) -> f64 {
    let [[case_ref, case_risk], [control_ref, control_risk]] = *table;
    (case_risk * control_ref) / (case_ref * control_risk)
}

/// Converts an odds ratio into a relative risk using the share of risk
/// alleles carried by cases as the prevalence proxy.
pub fn relative_risk(table: &[[f64; 2]; 2], odds_ratio: f64) -> f64 {
    let case_risk = table[0][1];
    let control_risk = table[1][1];
    let prevalence = case_risk / (case_risk + control_risk);
    odds_ratio / (1.0 - prevalence + prevalence * odds_ratio)
}

/// Pearson's chi-square statistic over a 2x2 table. `NaN` when any row or
/// column total is zero, since the expected counts are then undefined.
pub fn pearson_chi_square(table: &[[f64; 2]; 2]) -> f64 {
    let row_totals = [table[0][0] + table[0][1], table[1][0] + table[1][1]];
    let col_totals = [table[0][0] + table[1][0], table[0][1] + table[1][1]];
    let grand_total = row_totals[0] + row_totals[1];

    if row_totals.contains(&0.0) || col_totals.contains(&0.0) {
        return f64::NAN;
    }

    let mut statistic = 0.0;
    for (row, observed_row) in table.iter().enumerate() {
        for (col, &observed) in observed_row.iter().enumerate() {
            let expected = row_totals[row] * col_totals[col] / grand_total;
            statistic += (observed - expected).powi(2) / expected;
        }
    }
    statistic
}

/// Upper-tail probability of a chi-square statistic on one degree of freedom.
pub fn chi_square_p_value(statistic: f64) -> f64 {
    if statistic.is_nan() {
        return f64::NAN;
    }
    let Ok(chi2) = ChiSquared::new(1.0) else {
        return f64::NAN;
    };
    chi2.sf(statistic.max(0.0)).clamp(0.0, 1.0)
}

/// Šidák correction, 1 - (1 - p)^n, evaluated through `ln_1p`/`exp_m1` so that
/// small p-values keep their precision.
pub fn sidak_adjust(p_value: f64, n_tests: usize) -> f64 {
    if p_value.is_nan() {
        return f64::NAN;
    }
    if p_value <= 0.0 {
        return 0.0;
    }
    let n = n_tests.max(1) as f64;
    (-(n * (-p_value).ln_1p()).exp_m1()).clamp(p_value, 1.0)
}

/// Per-marker significance threshold, 1 - (1 - alpha)^(1/n).
pub fn significance_threshold(alpha: f64, n_tests: usize) -> f64 {
    let n = n_tests.max(1) as f64;
    -((-alpha).ln_1p() / n).exp_m1()
}
