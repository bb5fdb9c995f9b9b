// ========================================================================================
//
//                               HIGH-LEVEL DATA CONTRACTS
//
// ========================================================================================

// This file is ONLY for types that are SHARED BETWEEN FILES, not types that only are used in one file.

use std::fmt;

/// Maximum number of bytes accepted for marker and sample identifiers.
pub const MAX_ID_LEN: usize = 64;

/// A single nucleotide allele symbol. Only the four bases are representable;
/// anything else in the genotype stream is treated as missing data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Allele {
    A,
    C,
    G,
    T,
}

impl Allele {
    /// Parses a genotype character, case-insensitively.
    #[inline]
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(Self::A),
            'C' => Some(Self::C),
            'G' => Some(Self::G),
            'T' => Some(Self::T),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::A => 'A',
            Self::C => 'C',
            Self::G => 'G',
            Self::T => 'T',
        }
    }
}

impl fmt::Display for Allele {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// One of the two tracked alleles of a group. `allele` is `None` until the slot
/// has been seeded by an observation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlleleSlot {
    pub allele: Option<Allele>,
    pub count: u32,
}

/// Allele tallies for one phenotype group at one marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlleleFreq {
    pub slots: [AlleleSlot; 2],
    /// Allele pairs rejected because a character was not A/C/G/T.
    pub invalid: u32,
}

impl AlleleFreq {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots[0].allele.is_none()
    }

    /// Count of the reference allele (slot 0).
    #[inline]
    pub fn reference_count(&self) -> u32 {
        self.slots[0].count
    }

    /// Count of the risk allele (slot 1).
    #[inline]
    pub fn risk_count(&self) -> u32 {
        self.slots[1].count
    }

    #[inline]
    pub fn total_alleles(&self) -> u32 {
        self.slots[0].count + self.slots[1].count
    }

    /// Returns the slot index holding `allele`, if it is tracked.
    pub fn slot_of(&self, allele: Allele) -> Option<usize> {
        self.slots.iter().position(|s| s.allele == Some(allele))
    }
}

/// Per-marker results of the association test. Each statistic may be a
/// non-finite value when the 2x2 table makes it undefined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStats {
    pub odds_ratio: f64,
    pub relative_risk: f64,
    pub chi_square: f64,
    pub p_value: f64,
    pub adjusted_p_value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub id: String,
    pub chromosome: u32,
    pub position: u64,
    pub cases: AlleleFreq,
    pub controls: AlleleFreq,
    /// `None` until the association engine has run.
    pub stats: Option<MarkerStats>,
}

impl Marker {
    pub fn new(id: String, chromosome: u32, position: u64) -> Self {
        Self {
            id,
            chromosome,
            position,
            cases: AlleleFreq::default(),
            controls: AlleleFreq::default(),
            stats: None,
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (chr{}:{})", self.id, chromosome_label(self.chromosome), self.position)
    }
}

/// Affection status derived from the PED condition column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phenotype {
    Case,
    Control,
    Missing,
}

impl Phenotype {
    #[inline]
    pub fn from_code(code: i32) -> Self {
        match code {
            2 => Self::Case,
            1 => Self::Control,
            _ => Self::Missing,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub family_id: String,
    pub individual_id: String,
    pub father_id: String,
    pub mother_id: String,
    pub sex: i32,
    pub condition: i32,
    /// Number of markers at which this individual's allele pair was invalid.
    pub invalid_markers: u32,
}

impl Sample {
    #[inline]
    pub fn phenotype(&self) -> Phenotype {
        Phenotype::from_code(self.condition)
    }
}

pub fn parse_chromosome_label(chr_str: &str) -> Result<u32, String> {
    let mut trimmed = chr_str.trim();

    if trimmed.get(..3).is_some_and(|prefix| prefix.eq_ignore_ascii_case("chr")) {
        trimmed = trimmed.get(3..).unwrap_or_default();
    }

    if trimmed.eq_ignore_ascii_case("X") {
        return Ok(23);
    }
    if trimmed.eq_ignore_ascii_case("Y") {
        return Ok(24);
    }
    if trimmed.eq_ignore_ascii_case("MT") {
        return Ok(25);
    }

    trimmed.parse::<u32>().map_err(|_| {
        format!(
            "Invalid chromosome format '{}'. Expected an unsigned number, 'X', 'Y', 'MT', or 'chr' prefix.",
            chr_str.trim()
        )
    })
}

pub fn chromosome_label(chromosome: u32) -> String {
    match chromosome {
        23 => "X".to_string(),
        24 => "Y".to_string(),
        25 => "MT".to_string(),
        n => format!("{n}"),
    }
}
