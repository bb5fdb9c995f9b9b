// ========================================================================================
//
//                                   RUN CONFIGURATION
//
// ========================================================================================
//
// Analysis settings loaded from an optional TOML file. Every field has a default,
// so an empty document is a valid configuration.

use crate::assay::AssayThresholds;
use crate::association::AssociationConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_MODEL: &str = "allelic";
pub const DEFAULT_ALPHA: f64 = 0.05;

/// How genotype rows whose condition code is neither 1 nor 2 contribute to the
/// per-marker allele tallies. They are always counted as missing-phenotype
/// samples regardless of this setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingPhenotypePolicy {
    /// Tally the alleles into the control group.
    #[default]
    Control,
    /// Tally the alleles into neither group.
    Exclude,
}

/// Run-level settings, loadable from a TOML file. Every field has a default so
/// a partial file (or no file at all) is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Name of the association model. Resolved by the association engine.
    pub model: String,
    /// Significance level used to emphasize markers in the log.
    pub alpha: f64,
    pub missing_phenotype: MissingPhenotypePolicy,
    pub assay: AssayThresholds,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            alpha: DEFAULT_ALPHA,
            missing_phenotype: MissingPhenotypePolicy::default(),
            assay: AssayThresholds::default(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML configuration: {0}")]
    TomlParseError(#[from] toml::de::Error),
    #[error("Significance level must lie strictly between 0 and 1, but was {0}.")]
    InvalidAlpha(f64),
    #[error("Assay threshold '{name}' must lie within [0, 1], but was {value}.")]
    InvalidThreshold { name: &'static str, value: f64 },
}

impl AnalysisConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(ConfigError::InvalidAlpha(self.alpha));
        }
        let thresholds = [
            ("max_marker_missing_rate", self.assay.max_marker_missing_rate),
            ("min_maf", self.assay.min_maf),
            ("max_sample_missing_rate", self.assay.max_sample_missing_rate),
        ];
        for (name, value) in thresholds {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidThreshold { name, value });
            }
        }
        Ok(())
    }

    pub fn association(&self) -> AssociationConfig {
        AssociationConfig {
            model: self.model.clone(),
            alpha: self.alpha,
        }
    }
}
