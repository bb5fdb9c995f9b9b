// ========================================================================================
//
//                      THE ORCHESTRATOR: CASE/CONTROL ASSOCIATION
//
// ========================================================================================
//
// Parses the command line, resolves the run configuration, and drives the phases
// strictly in order:
//
// 1.  **Ingestion:** the .map coordinate table is read to completion, then the .ped
//     genotype table is streamed row by row, then allele slots are normalized.
// 2.  **Assay (optional):** descriptive statistics and quality-control flags.
// 3.  **Association:** per-marker allelic test. An unimplemented model is reported
//     and skipped; the report is still written with untested markers.
// 4.  **Report:** tab-separated statistics to a file or standard output.

use clap::{Parser, ValueEnum};
use gwas::assay::assay_cohort;
use gwas::association::test_association;
use gwas::config::{AnalysisConfig, MissingPhenotypePolicy};
use gwas::ingest::initialize_cohort;
use gwas::io::{open_report_output, open_text_input};
use gwas::report::write_report;
use std::path::PathBuf;
use std::process;
use std::time::Instant;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum MissingPhenotypeCli {
    /// Tally missing-phenotype individuals into the control group
    Control,
    /// Leave missing-phenotype individuals out of the allele tallies
    Exclude,
}

impl From<MissingPhenotypeCli> for MissingPhenotypePolicy {
    fn from(value: MissingPhenotypeCli) -> Self {
        match value {
            MissingPhenotypeCli::Control => MissingPhenotypePolicy::Control,
            MissingPhenotypeCli::Exclude => MissingPhenotypePolicy::Exclude,
        }
    }
}

#[derive(Parser, Debug)]
#[clap(
    name = "gwas",
    version,
    about = "Allelic case/control association testing on PED/MAP genotype tables."
)]
struct Args {
    /// Path to the .ped genotype table (may be gzip-compressed)
    ped_file: PathBuf,

    /// Path to the .map coordinate table (may be gzip-compressed)
    map_file: PathBuf,

    /// Output to FILE instead of standard output
    #[clap(short, long, value_name = "FILE", default_value = "-")]
    output: PathBuf,

    /// TOML configuration file; command-line flags take precedence
    #[clap(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Association model
    #[clap(long)]
    model: Option<String>,

    /// Significance level used to highlight markers in the log
    #[clap(long)]
    alpha: Option<f64>,

    /// How to tally individuals whose phenotype is neither case nor control
    #[clap(long, value_enum)]
    missing_phenotype: Option<MissingPhenotypeCli>,

    /// Run the descriptive cohort assay before testing
    #[clap(long)]
    assay: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let start_time = Instant::now();
    let args = Args::parse();

    let config = match resolve_config(&args) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {e}");
            process::exit(1);
        }
    };

    // --- Phase 1: Ingestion ---
    let coordinates = match open_text_input(&args.map_file) {
        Ok(reader) => reader,
        Err(e) => {
            log::error!("{e}");
            process::exit(1);
        }
    };
    let genotypes = match open_text_input(&args.ped_file) {
        Ok(reader) => reader,
        Err(e) => {
            log::error!("{e}");
            process::exit(1);
        }
    };
    let mut cohort = match initialize_cohort(coordinates, genotypes, config.missing_phenotype) {
        Ok(cohort) => cohort,
        Err(e) => {
            log::error!("Fatal error during ingestion: {e}");
            process::exit(1);
        }
    };

    // --- Phase 2: Assay ---
    if args.assay {
        assay_cohort(&cohort, &config.assay, config.missing_phenotype);
    }

    // --- Phase 3: Association ---
    if let Err(e) = test_association(&mut cohort, &config.association()) {
        log::error!("{e}. No markers were tested.");
    }

    // --- Phase 4: Report ---
    let written = open_report_output(&args.output)
        .map_err(|e| e.to_string())
        .and_then(|out| write_report(&cohort, out).map_err(|e| e.to_string()));
    if let Err(e) = written {
        log::error!("Error writing report to '{}': {e}", args.output.display());
        process::exit(1);
    }

    log::info!("Finished in {:.2?}.", start_time.elapsed());
}

/// Layers the command-line flags over the configuration file (or the defaults).
fn resolve_config(args: &Args) -> Result<AnalysisConfig, gwas::config::ConfigError> {
    let mut config = match &args.config {
        Some(path) => AnalysisConfig::load(path)?,
        None => AnalysisConfig::default(),
    };
    if let Some(model) = &args.model {
        config.model = model.clone();
    }
    if let Some(alpha) = args.alpha {
        config.alpha = alpha;
    }
    if let Some(policy) = args.missing_phenotype {
        config.missing_phenotype = policy.into();
    }
    config.validate()?;
    Ok(config)
}
