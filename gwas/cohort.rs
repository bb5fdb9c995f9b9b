// ========================================================================================
//
//                                       THE COHORT
//
// ========================================================================================
//
// The aggregate that owns the marker table, the sample registry and the
// running cohort counters. Both tables are append-only and keep file order:
// the position of a marker in the table is the implicit key that links it to
// the allele columns of every genotype row.

use std::collections::TryReserveError;

use crate::types::{Marker, Phenotype, Sample};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cohort {
    markers: Vec<Marker>,
    samples: Vec<Sample>,
    n_cases: usize,
    n_controls: usize,
    n_missing_phenotype: usize,
}

impl Cohort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Exclusive access to the marker table. The table can be mutated in place
    /// but never resized or reordered through this handle.
    pub(crate) fn markers_mut(&mut self) -> &mut [Marker] {
        &mut self.markers
    }

    pub fn n_markers(&self) -> usize {
        self.markers.len()
    }

    pub fn n_samples(&self) -> usize {
        self.samples.len()
    }

    pub fn n_cases(&self) -> usize {
        self.n_cases
    }

    pub fn n_controls(&self) -> usize {
        self.n_controls
    }

    pub fn n_missing_phenotype(&self) -> usize {
        self.n_missing_phenotype
    }

    /// Appends a marker at the end of the table. Fails only if the table cannot
    /// grow.
    pub(crate) fn push_marker(&mut self, marker: Marker) -> Result<(), TryReserveError> {
        self.markers.try_reserve(1)?;
        self.markers.push(marker);
        Ok(())
    }

    /// Appends a sample and updates the phenotype counters so that
    /// `n_cases + n_controls + n_missing_phenotype == n_samples` holds after
    /// every call.
    pub(crate) fn push_sample(&mut self, sample: Sample) -> Result<(), TryReserveError> {
        self.samples.try_reserve(1)?;
        match sample.phenotype() {
            Phenotype::Case => self.n_cases += 1,
            Phenotype::Control => self.n_controls += 1,
            Phenotype::Missing => self.n_missing_phenotype += 1,
        }
        self.samples.push(sample);
        Ok(())
    }
}
