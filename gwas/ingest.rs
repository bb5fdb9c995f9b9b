// ========================================================================================
//
//                                 THE INGESTION ENGINE
//
// ========================================================================================
//
// ### Purpose ###
//
// Reads the coordinate table into the marker table, then streams the genotype table
// one individual at a time, registering each sample and tallying its allele pairs
// into the per-marker case or control accumulators. Once every row has been read,
// the allele slots of each marker are put into canonical order: slot 0 holds the
// control-majority (reference) allele in both groups and slot 1 the risk allele.
//
// The coordinate table MUST be fully consumed before the first genotype row is
// read: the n-th allele pair of a genotype row belongs to the n-th marker.

use crate::cohort::Cohort;
use crate::config::MissingPhenotypePolicy;
use crate::types::{
    Allele, AlleleFreq, AlleleSlot, MAX_ID_LEN, Marker, Phenotype, Sample, parse_chromosome_label,
};
use std::collections::TryReserveError;
use std::io::{self, BufRead};
use thiserror::Error;

const COORDINATE_INPUT: &str = "coordinate table";
const GENOTYPE_INPUT: &str = "genotype table";
// Stored for condition tokens that are not integers (`NA`, `-9.0`).
const MISSING_CONDITION: i32 = 0;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("run out of memory at {context}: {source}")]
    OutOfResources {
        context: String,
        #[source]
        source: TryReserveError,
    },
    #[error("malformed record in {input} at line {line}: {message}")]
    MalformedRecord {
        input: &'static str,
        line: usize,
        message: String,
    },
    #[error("the cohort already holds {0}; ingestion must start from an empty cohort")]
    AlreadyPopulated(&'static str),
}

/// The result of tallying one allele pair into an [`AlleleFreq`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tally {
    /// Both alleles were counted.
    Counted,
    /// The pair was valid, but `dropped` of its alleles were a third distinct
    /// symbol at a locus that already tracks two.
    Multiallelic { dropped: u8 },
    /// At least one character was not A/C/G/T. Nothing was counted.
    Invalid,
}

/// Data-quality totals gathered while streaming the genotype table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenotypeIngestStats {
    pub rows: usize,
    pub invalid_pairs: u64,
    pub multiallelic_observations: u64,
    pub multiallelic_markers: usize,
    /// Missing-phenotype rows whose alleles were tallied into no group.
    pub excluded_rows: usize,
}

/// Markers whose case alleles could not be aligned onto the control alleles
/// because more than two distinct symbols were seen across both groups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlignmentReport {
    pub discordant_markers: Vec<usize>,
}

/// Builds a fully ingested, normalized cohort from the two input streams.
///
/// The coordinate stream is consumed to the end before the genotype stream is
/// touched, and allele normalization runs after the last genotype row.
pub fn initialize_cohort<M: BufRead, P: BufRead>(
    coordinates: M,
    genotypes: P,
    policy: MissingPhenotypePolicy,
) -> Result<Cohort, IngestError> {
    let mut cohort = Cohort::new();

    let n_markers = build_markers(&mut cohort, coordinates)?;
    log::info!("Read {n_markers} markers from the {COORDINATE_INPUT}.");

    let stats = build_samples(&mut cohort, genotypes, policy)?;
    log::info!(
        "Read {} samples: {} cases, {} controls, {} with missing phenotype.",
        cohort.n_samples(),
        cohort.n_cases(),
        cohort.n_controls(),
        cohort.n_missing_phenotype()
    );
    if stats.invalid_pairs > 0 {
        log::warn!(
            "{} allele pairs contained characters other than A/C/G/T and were not counted.",
            stats.invalid_pairs
        );
    }
    if stats.multiallelic_observations > 0 {
        log::warn!(
            "Multiallelic loci are unsupported: dropped {} observations of a third allele across {} markers.",
            stats.multiallelic_observations,
            stats.multiallelic_markers
        );
    }
    if stats.excluded_rows > 0 {
        log::info!(
            "{} samples with missing phenotype were excluded from the allele tallies.",
            stats.excluded_rows
        );
    }

    let alignment = sort_alleles(&mut cohort);
    if !alignment.discordant_markers.is_empty() {
        log::warn!(
            "{} markers carry different second alleles in cases and controls; their statistics compare unlike alleles.",
            alignment.discordant_markers.len()
        );
    }

    Ok(cohort)
}

/// Populates the marker table from whitespace-delimited rows of
/// `<chromosome> <marker_id> <distance> <position>`. Returns the number of
/// markers read. The genetic distance is validated but not retained.
pub fn build_markers<R: BufRead>(cohort: &mut Cohort, mut reader: R) -> Result<usize, IngestError> {
    if cohort.n_markers() > 0 {
        return Err(IngestError::AlreadyPopulated("markers"));
    }
    if cohort.n_samples() > 0 {
        return Err(IngestError::AlreadyPopulated("samples"));
    }

    let mut line = String::new();
    let mut line_no = 0usize;

    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        line_no += 1;
        if line.trim().is_empty() {
            continue;
        }

        let malformed = |message: String| IngestError::MalformedRecord {
            input: COORDINATE_INPUT,
            line: line_no,
            message,
        };

        let mut fields = line.split_whitespace();
        let (Some(chr), Some(id), Some(dist), Some(pos), None) = (
            fields.next(),
            fields.next(),
            fields.next(),
            fields.next(),
            fields.next(),
        ) else {
            return Err(malformed(
                "expected 4 whitespace-delimited fields".to_string(),
            ));
        };

        let chromosome = parse_chromosome_label(chr).map_err(malformed)?;
        check_id_len("marker identifier", id).map_err(malformed)?;
        dist.parse::<f64>()
            .map_err(|_| malformed(format!("invalid genetic distance '{dist}'")))?;
        let position = pos
            .parse::<u64>()
            .map_err(|_| malformed(format!("invalid physical position '{pos}'")))?;

        cohort
            .push_marker(Marker::new(id.to_string(), chromosome, position))
            .map_err(|source| IngestError::OutOfResources {
                context: format!("marker {id}"),
                source,
            })?;
    }

    Ok(cohort.n_markers())
}

/// Streams the genotype table: six leading fields (family, individual, father,
/// mother, sex, condition) followed by one allele pair per marker in marker
/// table order. Allele characters are read one non-whitespace character at a
/// time, so `A G` and `AG` denote the same pair.
pub fn build_samples<R: BufRead>(
    cohort: &mut Cohort,
    mut reader: R,
    policy: MissingPhenotypePolicy,
) -> Result<GenotypeIngestStats, IngestError> {
    if cohort.n_samples() > 0 {
        return Err(IngestError::AlreadyPopulated("samples"));
    }

    let n_markers = cohort.n_markers();
    let mut stats = GenotypeIngestStats::default();
    let mut warned_multiallelic = vec![false; n_markers];
    let mut alleles: Vec<char> = Vec::with_capacity(2 * n_markers);
    let mut line = String::new();
    let mut line_no = 0usize;

    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        line_no += 1;
        if line.trim().is_empty() {
            continue;
        }

        let malformed = |message: String| IngestError::MalformedRecord {
            input: GENOTYPE_INPUT,
            line: line_no,
            message,
        };

        let mut rest = line.as_str();
        let mut header = [""; 6];
        for (slot, name) in header.iter_mut().zip([
            "family id",
            "individual id",
            "father id",
            "mother id",
            "sex",
            "condition",
        ]) {
            let (token, tail) = next_token(rest);
            if token.is_empty() {
                return Err(malformed(format!("missing {name}")));
            }
            *slot = token;
            rest = tail;
        }
        let [fid, iid, pid, mid, sex, condition] = header;

        for (name, id) in [
            ("family id", fid),
            ("individual id", iid),
            ("father id", pid),
            ("mother id", mid),
        ] {
            check_id_len(name, id).map_err(malformed)?;
        }
        let sex = sex
            .parse::<i32>()
            .map_err(|_| malformed(format!("invalid sex code '{sex}'")))?;
        let condition = condition.parse::<i32>().unwrap_or_else(|_| {
            log::debug!("Sample {fid}/{iid}: unreadable condition code '{condition}'.");
            MISSING_CONDITION
        });

        alleles.clear();
        alleles.extend(rest.chars().filter(|c| !c.is_whitespace()));
        if alleles.len() != 2 * n_markers {
            return Err(malformed(format!(
                "expected {} allele characters ({} markers), found {}",
                2 * n_markers,
                n_markers,
                alleles.len()
            )));
        }

        let phenotype = Phenotype::from_code(condition);
        let target = match (phenotype, policy) {
            (Phenotype::Case, _) => Some(Group::Cases),
            (Phenotype::Control, _) | (Phenotype::Missing, MissingPhenotypePolicy::Control) => {
                Some(Group::Controls)
            }
            (Phenotype::Missing, MissingPhenotypePolicy::Exclude) => None,
        };
        if target.is_none() {
            stats.excluded_rows += 1;
        }

        let mut invalid_markers = 0u32;
        for (idx, (marker, pair)) in cohort
            .markers_mut()
            .iter_mut()
            .zip(alleles.chunks_exact(2))
            .enumerate()
        {
            let outcome = match target {
                Some(Group::Cases) => count_alleles(&mut marker.cases, pair[0], pair[1]),
                Some(Group::Controls) => count_alleles(&mut marker.controls, pair[0], pair[1]),
                None => classify_pair(pair[0], pair[1]),
            };
            match outcome {
                Tally::Counted => {}
                Tally::Invalid => invalid_markers += 1,
                Tally::Multiallelic { dropped } => {
                    stats.multiallelic_observations += u64::from(dropped);
                    if !warned_multiallelic[idx] {
                        warned_multiallelic[idx] = true;
                        stats.multiallelic_markers += 1;
                        log::warn!(
                            "Marker {marker}: multiallelic locus unsupported, observation '{}{}' of sample {iid} dropped.",
                            pair[0],
                            pair[1]
                        );
                    } else {
                        log::debug!(
                            "Marker {}: dropped third allele in sample {iid}.",
                            marker.id
                        );
                    }
                }
            }
        }
        stats.invalid_pairs += u64::from(invalid_markers);

        if condition != 1 && condition != 2 {
            log::debug!("Sample {fid}/{iid} has missing phenotype code {condition}.");
        }

        let sample = Sample {
            family_id: fid.to_string(),
            individual_id: iid.to_string(),
            father_id: pid.to_string(),
            mother_id: mid.to_string(),
            sex,
            condition,
            invalid_markers,
        };
        cohort
            .push_sample(sample)
            .map_err(|source| IngestError::OutOfResources {
                context: format!("sample {fid}/{iid}"),
                source,
            })?;
        stats.rows += 1;
    }

    Ok(stats)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Group {
    Cases,
    Controls,
}

/// Tallies one genotype call into `freq`. At most two distinct alleles are
/// tracked; observations of a third one are dropped and reported through the
/// return value.
pub fn count_alleles(freq: &mut AlleleFreq, first: char, second: char) -> Tally {
    let (Some(a), Some(b)) = (Allele::from_char(first), Allele::from_char(second)) else {
        freq.invalid += 1;
        return Tally::Invalid;
    };

    if freq.is_empty() {
        if a == b {
            freq.slots[0] = AlleleSlot {
                allele: Some(a),
                count: 2,
            };
        } else {
            freq.slots[0] = AlleleSlot {
                allele: Some(a),
                count: 1,
            };
            freq.slots[1] = AlleleSlot {
                allele: Some(b),
                count: 1,
            };
        }
        return Tally::Counted;
    }

    let dropped = [a, b]
        .into_iter()
        .filter(|&allele| !tally_one(freq, allele))
        .count() as u8;

    if dropped == 0 {
        Tally::Counted
    } else {
        Tally::Multiallelic { dropped }
    }
}

fn tally_one(freq: &mut AlleleFreq, allele: Allele) -> bool {
    match freq.slot_of(allele) {
        Some(idx) => {
            freq.slots[idx].count += 1;
            true
        }
        None if freq.slots[1].allele.is_none() => {
            freq.slots[1] = AlleleSlot {
                allele: Some(allele),
                count: 1,
            };
            true
        }
        None => false,
    }
}

/// Validity check for pairs that are not tallied into any group.
fn classify_pair(first: char, second: char) -> Tally {
    if Allele::from_char(first).is_some() && Allele::from_char(second).is_some() {
        Tally::Counted
    } else {
        Tally::Invalid
    }
}

/// Puts the allele slots of every marker into canonical order: control slot 0
/// holds the more frequent control allele (ties keep their order), and the case
/// slots are swapped when case slot 0 does not hold that same allele.
///
/// Must run after the last genotype row and before any association test.
pub fn sort_alleles(cohort: &mut Cohort) -> AlignmentReport {
    let mut report = AlignmentReport::default();
    for (idx, marker) in cohort.markers_mut().iter_mut().enumerate() {
        if !normalize_marker(marker) {
            log::debug!(
                "Marker {marker}: case alleles do not match control alleles after alignment."
            );
            report.discordant_markers.push(idx);
        }
    }
    report
}

/// Returns `false` when the case and control groups track different allele
/// pairs, so that the two slots cannot denote the same symbols in both groups.
fn normalize_marker(marker: &mut Marker) -> bool {
    let controls = &mut marker.controls;
    if controls.slots[1].count > controls.slots[0].count {
        controls.slots.swap(0, 1);
    }

    // Without control observations there is no reference allele to align to.
    let Some(reference) = controls.slots[0].allele else {
        return true;
    };

    let cases = &mut marker.cases;
    if cases.slots[0].allele != Some(reference) {
        cases.slots.swap(0, 1);
    }

    let case_alleles = [cases.slots[0].allele, cases.slots[1].allele];
    let control_alt = controls.slots[1].allele;
    let reference_matches = case_alleles[0].is_none_or(|a| a == reference);
    let alternate_matches = match (case_alleles[1], control_alt) {
        (Some(case_alt), Some(control_alt)) => case_alt == control_alt,
        (Some(case_alt), None) => case_alt != reference,
        (None, _) => true,
    };
    reference_matches && alternate_matches
}

fn next_token(text: &str) -> (&str, &str) {
    let trimmed = text.trim_start();
    let end = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
    trimmed.split_at(end)
}

fn check_id_len(name: &str, id: &str) -> Result<(), String> {
    if id.len() > MAX_ID_LEN {
        Err(format!(
            "{name} '{id}' exceeds the maximum length of {MAX_ID_LEN} bytes"
        ))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn freq(slots: [(Option<Allele>, u32); 2]) -> AlleleFreq {
        AlleleFreq {
            slots: slots.map(|(allele, count)| AlleleSlot { allele, count }),
            invalid: 0,
        }
    }

    #[test]
    fn homozygous_seed_fills_first_slot() {
        let mut f = AlleleFreq::default();
        assert_eq!(count_alleles(&mut f, 'a', 'A'), Tally::Counted);
        assert_eq!(f, freq([(Some(Allele::A), 2), (None, 0)]));
    }

    #[test]
    fn heterozygous_seed_fills_both_slots() {
        let mut f = AlleleFreq::default();
        count_alleles(&mut f, 'C', 'T');
        assert_eq!(f, freq([(Some(Allele::C), 1), (Some(Allele::T), 1)]));
    }

    #[test]
    fn second_allele_is_learned_after_homozygous_seed() {
        let mut f = AlleleFreq::default();
        count_alleles(&mut f, 'G', 'G');
        count_alleles(&mut f, 'A', 'G');
        count_alleles(&mut f, 'A', 'A');
        assert_eq!(f, freq([(Some(Allele::G), 3), (Some(Allele::A), 3)]));
    }

    #[test]
    fn third_allele_is_dropped_with_warning_outcome() {
        let mut f = AlleleFreq::default();
        count_alleles(&mut f, 'A', 'G');
        assert_eq!(
            count_alleles(&mut f, 'A', 'T'),
            Tally::Multiallelic { dropped: 1 }
        );
        assert_eq!(
            count_alleles(&mut f, 'C', 'T'),
            Tally::Multiallelic { dropped: 2 }
        );
        assert_eq!(f, freq([(Some(Allele::A), 2), (Some(Allele::G), 1)]));
        assert_eq!(f.invalid, 0);
    }

    #[test]
    fn invalid_characters_only_touch_the_invalid_counter() {
        let mut f = AlleleFreq::default();
        assert_eq!(count_alleles(&mut f, 'N', 'N'), Tally::Invalid);
        assert_eq!(count_alleles(&mut f, 'A', '0'), Tally::Invalid);
        assert!(f.is_empty());
        assert_eq!(f.invalid, 2);
        assert_eq!(f.total_alleles(), 0);
    }

    #[test]
    fn normalization_puts_control_majority_first_in_both_groups() {
        let mut marker = Marker::new("rs1".to_string(), 1, 1);
        marker.controls = freq([(Some(Allele::A), 1), (Some(Allele::G), 3)]);
        marker.cases = freq([(Some(Allele::A), 3), (Some(Allele::G), 1)]);
        assert!(normalize_marker(&mut marker));
        assert_eq!(marker.controls, freq([(Some(Allele::G), 3), (Some(Allele::A), 1)]));
        assert_eq!(marker.cases, freq([(Some(Allele::G), 1), (Some(Allele::A), 3)]));
    }

    #[test]
    fn normalization_keeps_tied_control_order() {
        let mut marker = Marker::new("rs1".to_string(), 1, 1);
        marker.controls = freq([(Some(Allele::C), 2), (Some(Allele::T), 2)]);
        marker.cases = freq([(Some(Allele::T), 5), (Some(Allele::C), 1)]);
        assert!(normalize_marker(&mut marker));
        assert_eq!(marker.controls.slots[0].allele, Some(Allele::C));
        assert_eq!(marker.cases, freq([(Some(Allele::C), 1), (Some(Allele::T), 5)]));
    }

    #[test]
    fn normalization_moves_unmatched_case_allele_to_risk_slot() {
        let mut marker = Marker::new("rs1".to_string(), 1, 1);
        marker.controls = freq([(Some(Allele::G), 4), (None, 0)]);
        marker.cases = freq([(Some(Allele::A), 4), (None, 0)]);
        assert!(normalize_marker(&mut marker));
        assert_eq!(marker.cases, freq([(None, 0), (Some(Allele::A), 4)]));
    }

    #[test]
    fn normalization_flags_discordant_allele_pairs() {
        let mut marker = Marker::new("rs1".to_string(), 1, 1);
        marker.controls = freq([(Some(Allele::G), 4), (Some(Allele::A), 1)]);
        marker.cases = freq([(Some(Allele::G), 2), (Some(Allele::T), 2)]);
        assert!(!normalize_marker(&mut marker));
    }

    #[test]
    fn coordinate_rows_must_have_four_fields() {
        let mut cohort = Cohort::new();
        let err = build_markers(&mut cohort, "1 rs1 0 1000\n1 rs2 0\n".as_bytes()).unwrap_err();
        match err {
            IngestError::MalformedRecord { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_ascii_chromosome_is_a_malformed_record() {
        let err = initialize_cohort(
            "éé rs1 0 1000\n".as_bytes(),
            "".as_bytes(),
            MissingPhenotypePolicy::Control,
        )
        .unwrap_err();
        match err {
            IngestError::MalformedRecord { input, line, .. } => {
                assert_eq!(input, COORDINATE_INPUT);
                assert_eq!(line, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn coordinate_table_cannot_be_read_twice() {
        let mut cohort = Cohort::new();
        build_markers(&mut cohort, "1 rs1 0 1000\n".as_bytes()).unwrap();
        let err = build_markers(&mut cohort, "1 rs2 0 2000\n".as_bytes()).unwrap_err();
        assert!(matches!(err, IngestError::AlreadyPopulated("markers")));
        assert_eq!(cohort.n_markers(), 1);
    }

    #[test]
    fn overlong_marker_identifiers_are_rejected() {
        let mut cohort = Cohort::new();
        let row = format!("1 {} 0 1000\n", "r".repeat(MAX_ID_LEN + 1));
        assert!(matches!(
            build_markers(&mut cohort, row.as_bytes()),
            Err(IngestError::MalformedRecord { .. })
        ));
    }

    #[test]
    fn genotype_rows_with_wrong_allele_count_are_rejected() {
        let mut cohort = Cohort::new();
        build_markers(&mut cohort, "1 rs1 0 1000\n1 rs2 0 2000\n".as_bytes()).unwrap();
        let err = build_samples(
            &mut cohort,
            "F1 I1 0 0 1 2 A A G\n".as_bytes(),
            MissingPhenotypePolicy::Control,
        )
        .unwrap_err();
        assert!(matches!(err, IngestError::MalformedRecord { line: 1, .. }));
        assert_eq!(cohort.markers()[0].cases.total_alleles(), 0);
    }

    #[test]
    fn compact_and_spaced_allele_pairs_are_equivalent() {
        let mut cohort = Cohort::new();
        build_markers(&mut cohort, "1 rs1 0 1000\n1 rs2 0 2000\n".as_bytes()).unwrap();
        build_samples(
            &mut cohort,
            "F1 I1 0 0 1 2 AG C C\nF2 I2 0 0 2 2 A G CC\n".as_bytes(),
            MissingPhenotypePolicy::Control,
        )
        .unwrap();
        let cases = &cohort.markers()[0].cases;
        assert_eq!(cases.slots[0], AlleleSlot { allele: Some(Allele::A), count: 2 });
        assert_eq!(cases.slots[1], AlleleSlot { allele: Some(Allele::G), count: 2 });
        assert_eq!(cohort.markers()[1].cases.reference_count(), 4);
    }

    #[test]
    fn exclude_policy_keeps_missing_phenotypes_out_of_tallies() {
        let mut cohort = Cohort::new();
        build_markers(&mut cohort, "1 rs1 0 1000\n".as_bytes()).unwrap();
        let stats = build_samples(
            &mut cohort,
            "F1 I1 0 0 1 -9 A A\nF2 I2 0 0 1 1 G G\nF3 I3 0 0 1 0 N N\n".as_bytes(),
            MissingPhenotypePolicy::Exclude,
        )
        .unwrap();
        assert_eq!(stats.excluded_rows, 2);
        assert_eq!(stats.invalid_pairs, 1);
        let controls = &cohort.markers()[0].controls;
        assert_eq!(controls.slots[0], AlleleSlot { allele: Some(Allele::G), count: 2 });
        assert_eq!(controls.invalid, 0);
        assert_eq!(cohort.samples()[2].invalid_markers, 1);
        assert_eq!(cohort.n_missing_phenotype(), 2);
    }

    #[test]
    fn control_policy_folds_missing_phenotypes_into_controls() {
        let mut cohort = Cohort::new();
        build_markers(&mut cohort, "1 rs1 0 1000\n".as_bytes()).unwrap();
        build_samples(
            &mut cohort,
            "F1 I1 0 0 1 -9 A A\nF2 I2 0 0 1 1 G G\n".as_bytes(),
            MissingPhenotypePolicy::Control,
        )
        .unwrap();
        assert_eq!(cohort.markers()[0].controls.total_alleles(), 4);
        assert_eq!(cohort.n_controls(), 1);
        assert_eq!(cohort.n_missing_phenotype(), 1);
    }

    #[test]
    fn unreadable_condition_codes_count_as_missing_phenotype() {
        let mut cohort = Cohort::new();
        build_markers(&mut cohort, "1 rs1 0 1000\n".as_bytes()).unwrap();
        let stats = build_samples(
            &mut cohort,
            "F1 I1 0 0 1 NA A A\nF2 I2 0 0 1 -9.0 A G\nF3 I3 0 0 1 2 G G\n".as_bytes(),
            MissingPhenotypePolicy::Exclude,
        )
        .unwrap();
        assert_eq!(stats.rows, 3);
        assert_eq!(stats.excluded_rows, 2);
        assert_eq!(cohort.n_missing_phenotype(), 2);
        assert_eq!(cohort.n_cases(), 1);
        assert_eq!(cohort.samples()[0].phenotype(), Phenotype::Missing);
        assert_eq!(cohort.markers()[0].controls.total_alleles(), 0);
    }

    #[test]
    fn third_alleles_are_counted_once_per_marker_and_per_observation() {
        let mut cohort = Cohort::new();
        build_markers(&mut cohort, "1 rs1 0 1000\n1 rs2 0 2000\n".as_bytes()).unwrap();
        let stats = build_samples(
            &mut cohort,
            "F1 I1 0 0 1 1 A G C C\nF2 I2 0 0 1 1 A T C C\nF3 I3 0 0 1 1 T A C T\n".as_bytes(),
            MissingPhenotypePolicy::Control,
        )
        .unwrap();
        assert_eq!(stats.multiallelic_markers, 1);
        assert_eq!(stats.multiallelic_observations, 2);
        assert_eq!(stats.invalid_pairs, 0);

        let controls = &cohort.markers()[0].controls;
        assert_eq!(controls.slots[0], AlleleSlot { allele: Some(Allele::A), count: 3 });
        assert_eq!(controls.slots[1], AlleleSlot { allele: Some(Allele::G), count: 1 });
    }
}
