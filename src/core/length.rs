//! Gene length from exon loci
//!
//! The length of a gene is the number of distinct positions covered by at
//! least one of its exon/CDS loci, so overlapping parts are counted once.
//! An exon from 3 to 10 and one from 5 to 11 count as a single stretch
//! from 3 to 11.
//!
//! Loci are half-open: `[start, end)` covers `start..end`.

use crate::core::error::{LengthError, LengthResult};

/// One exon/CDS interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locus {
    pub start: u64,
    pub end: u64,
}

impl Locus {
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }
}

impl From<(u64, u64)> for Locus {
    fn from((start, end): (u64, u64)) -> Self {
        Self::new(start, end)
    }
}

/// Loci collected for one feature identifier
#[derive(Debug, Clone, Default)]
pub struct LocusGroup {
    loci: Vec<Locus>,
}

impl LocusGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, locus: Locus) {
        self.loci.push(locus);
    }

    pub fn len(&self) -> usize {
        self.loci.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loci.is_empty()
    }

    pub fn loci(&self) -> &[Locus] {
        &self.loci
    }

    /// Compute the union length and clear the group
    pub fn take_length(&mut self) -> LengthResult<u64> {
        let length = gene_length(&self.loci);
        self.loci.clear();
        length
    }
}

/// Fixed-size bit set, one bit per position
struct PositionBits {
    words: Vec<u64>,
}

impl PositionBits {
    fn with_len(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(64)],
        }
    }

    /// Set bits `from..to`
    fn set_range(&mut self, from: usize, to: usize) {
        if from >= to {
            return;
        }
        let (first_word, last_word) = (from / 64, (to - 1) / 64);
        for idx in first_word..=last_word {
            let lo = if idx == first_word { from % 64 } else { 0 };
            let hi = if idx == last_word { (to - 1) % 64 + 1 } else { 64 };
            let mask = if hi - lo == 64 {
                u64::MAX
            } else {
                ((1u64 << (hi - lo)) - 1) << lo
            };
            self.words[idx] |= mask;
        }
    }

    fn cardinality(&self) -> u64 {
        self.words.iter().map(|w| u64::from(w.count_ones())).sum()
    }
}

/// Number of distinct positions covered by `loci`
///
/// Coordinates are shifted by the smallest start so the bit set only spans
/// the observed range.
///
/// # Examples
/// ```
/// use gene_import::core::{gene_length, Locus};
///
/// assert_eq!(gene_length(&[Locus::new(3, 10)]).unwrap(), 7);
/// assert_eq!(gene_length(&[Locus::new(3, 10), Locus::new(5, 11)]).unwrap(), 8);
/// ```
pub fn gene_length(loci: &[Locus]) -> LengthResult<u64> {
    let min = loci.iter().map(|l| l.start).min().ok_or(LengthError::Empty)?;
    let max = loci.iter().map(|l| l.end).max().ok_or(LengthError::Empty)?;
    if max < min {
        return Err(LengthError::InvalidSpan { min, max });
    }

    let mut bits = PositionBits::with_len((max - min) as usize);
    for locus in loci {
        if locus.end < locus.start {
            return Err(LengthError::InvalidLocus {
                start: locus.start,
                end: locus.end,
            });
        }
        bits.set_range((locus.start - min) as usize, (locus.end - min) as usize);
    }

    Ok(bits.cardinality())
}
