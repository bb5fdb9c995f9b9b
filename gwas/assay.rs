// ========================================================================================
//
//                                    THE COHORT ASSAY
//
// ========================================================================================
//
// Descriptive statistics computed on an ingested cohort before association
// testing: per-marker missingness and allele frequencies, per-sample
// missingness, and quality-control flags for both. The assay only reads the
// cohort. Flagged markers and samples are reported, never removed, because
// the marker table is fixed once the coordinate table has been read.

use crate::cohort::Cohort;
use crate::config::MissingPhenotypePolicy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssayThresholds {
    /// Highest tolerated fraction of invalid allele pairs at a marker.
    pub max_marker_missing_rate: f64,
    /// Lowest tolerated minor (risk) allele frequency among controls.
    pub min_maf: f64,
    /// Highest tolerated fraction of invalid allele pairs for an individual.
    pub max_sample_missing_rate: f64,
}

impl Default for AssayThresholds {
    fn default() -> Self {
        Self {
            max_marker_missing_rate: 0.1,
            min_maf: 0.01,
            max_sample_missing_rate: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerAssay {
    pub missing_rate: f64,
    /// Risk-allele frequency among cases. `NaN` without case data.
    pub case_risk_freq: f64,
    /// Risk-allele frequency among controls, i.e. the control minor allele
    /// frequency. `NaN` without control data.
    pub control_maf: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CohortAssay {
    pub markers: Vec<MarkerAssay>,
    /// Fraction of invalid allele pairs per sample, in registry order.
    pub sample_missing_rates: Vec<f64>,
    pub flagged_markers: Vec<usize>,
    pub flagged_samples: Vec<usize>,
}

pub fn assay_cohort(
    cohort: &Cohort,
    thresholds: &AssayThresholds,
    policy: MissingPhenotypePolicy,
) -> CohortAssay {
    let genotyped_rows = match policy {
        MissingPhenotypePolicy::Control => cohort.n_samples(),
        MissingPhenotypePolicy::Exclude => cohort.n_cases() + cohort.n_controls(),
    };

    let markers: Vec<MarkerAssay> = cohort
        .markers()
        .iter()
        .map(|marker| {
            let invalid = marker.cases.invalid + marker.controls.invalid;
            MarkerAssay {
                missing_rate: ratio(f64::from(invalid), genotyped_rows as f64),
                case_risk_freq: ratio(
                    f64::from(marker.cases.risk_count()),
                    f64::from(marker.cases.total_alleles()),
                ),
                control_maf: ratio(
                    f64::from(marker.controls.risk_count()),
                    f64::from(marker.controls.total_alleles()),
                ),
            }
        })
        .collect();

    let n_markers = cohort.n_markers();
    let sample_missing_rates: Vec<f64> = cohort
        .samples()
        .iter()
        .map(|sample| {
            if n_markers == 0 {
                0.0
            } else {
                f64::from(sample.invalid_markers) / n_markers as f64
            }
        })
        .collect();

    let flagged_markers: Vec<usize> = markers
        .iter()
        .enumerate()
        .filter(|(_, m)| {
            m.missing_rate > thresholds.max_marker_missing_rate
                || !(m.control_maf >= thresholds.min_maf)
        })
        .map(|(idx, _)| idx)
        .collect();

    let flagged_samples: Vec<usize> = sample_missing_rates
        .iter()
        .enumerate()
        .filter(|&(_, &rate)| rate > thresholds.max_sample_missing_rate)
        .map(|(idx, _)| idx)
        .collect();

    let assay = CohortAssay {
        markers,
        sample_missing_rates,
        flagged_markers,
        flagged_samples,
    };
    log_assay(cohort, &assay, thresholds);
    assay
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        f64::NAN
    }
}

fn log_assay(cohort: &Cohort, assay: &CohortAssay, thresholds: &AssayThresholds) {
    let mean_missing = if assay.markers.is_empty() {
        0.0
    } else {
        assay
            .markers
            .iter()
            .map(|m| m.missing_rate)
            .filter(|r| r.is_finite())
            .sum::<f64>()
            / assay.markers.len() as f64
    };
    log::info!(
        "Assay: {} markers, {} samples, mean marker missingness {:.4}.",
        cohort.n_markers(),
        cohort.n_samples(),
        mean_missing
    );

    if !assay.flagged_markers.is_empty() {
        log::warn!(
            "{} markers exceed missingness {} or fall below control MAF {}.",
            assay.flagged_markers.len(),
            thresholds.max_marker_missing_rate,
            thresholds.min_maf
        );
        for &idx in &assay.flagged_markers {
            let marker = &cohort.markers()[idx];
            let stats = &assay.markers[idx];
            log::debug!(
                "  {marker}: missing {:.4}, control MAF {:.4}",
                stats.missing_rate,
                stats.control_maf
            );
        }
    }
    if !assay.flagged_samples.is_empty() {
        log::warn!(
            "{} samples exceed missingness {}.",
            assay.flagged_samples.len(),
            thresholds.max_sample_missing_rate
        );
    }
}
