// ========================================================================================
//
//                                 THE ASSOCIATION REPORT
//
// ========================================================================================
//
// Tab-separated association report, one row per marker in marker table order.

use crate::cohort::Cohort;
use crate::types::chromosome_label;
use std::io::Write;
use thiserror::Error;

pub const REPORT_HEADER: [&str; 8] = ["ID", "CHR", "POS", "OR", "RR", "CHISQ", "P", "P_ADJ"];

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write report: {0}")]
    Csv(#[from] csv::Error),
    #[error("Failed to flush report: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes the statistics of every marker. Markers that have not been tested
/// print `NA`; undefined statistics print `NaN` or `Inf` so they can never be
/// mistaken for a finite value.
pub fn write_report<W: Write>(cohort: &Cohort, writer: W) -> Result<(), ReportError> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record(REPORT_HEADER)?;

    for marker in cohort.markers() {
        let chromosome = chromosome_label(marker.chromosome);
        let position = marker.position.to_string();
        let statistics: [String; 5] = match &marker.stats {
            Some(stats) => [
                format_statistic(stats.odds_ratio),
                format_statistic(stats.relative_risk),
                format_statistic(stats.chi_square),
                format_p_value(stats.p_value),
                format_p_value(stats.adjusted_p_value),
            ],
            None => std::array::from_fn(|_| "NA".to_string()),
        };

        wtr.write_field(&marker.id)?;
        wtr.write_field(&chromosome)?;
        wtr.write_field(&position)?;
        for value in &statistics {
            wtr.write_field(value)?;
        }
        wtr.write_record(None::<&[u8]>)?;
    }

    wtr.flush()?;
    Ok(())
}

fn format_non_finite(value: f64) -> Option<String> {
    if value.is_nan() {
        Some("NaN".to_string())
    } else if value == f64::INFINITY {
        Some("Inf".to_string())
    } else if value == f64::NEG_INFINITY {
        Some("-Inf".to_string())
    } else {
        None
    }
}

fn format_statistic(value: f64) -> String {
    format_non_finite(value).unwrap_or_else(|| format!("{value:.6}"))
}

fn format_p_value(value: f64) -> String {
    format_non_finite(value).unwrap_or_else(|| format!("{value:.6e}"))
}
