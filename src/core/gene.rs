//! Canonical gene model
//!
//! A `CanonicalGene` is the unit every import pipeline hands to the gene
//! store. Genes parsed from the nomenclature file carry their NCBI gene id;
//! genes from the supplementary file carry none until the store assigns one.

use std::collections::BTreeSet;

/// Id used for genes that have not been given a gene id yet
pub const UNASSIGNED_GENE_ID: i64 = 0;

/// A gene as stored in the gene table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalGene {
    /// Numeric gene id (unique key); `UNASSIGNED_GENE_ID` if unknown
    pub gene_id: i64,
    /// Primary symbol
    pub symbol: String,
    /// Alternative symbols and locus tags
    pub aliases: BTreeSet<String>,
    /// Cytogenetic band, e.g. `1p36.33`
    pub cytoband: Option<String>,
    /// Union length of the gene's exons
    pub length: Option<u64>,
    /// Gene type, e.g. `protein-coding`
    pub gene_type: Option<String>,
}

impl CanonicalGene {
    pub fn new(gene_id: i64, symbol: impl Into<String>, aliases: BTreeSet<String>) -> Self {
        Self {
            gene_id,
            symbol: symbol.into(),
            aliases,
            cytoband: None,
            length: None,
            gene_type: None,
        }
    }

    /// Create a gene known only by its symbol
    pub fn from_symbol(symbol: impl Into<String>) -> Self {
        Self::new(UNASSIGNED_GENE_ID, symbol, BTreeSet::new())
    }

    pub fn has_gene_id(&self) -> bool {
        self.gene_id != UNASSIGNED_GENE_ID
    }

    /// Chromosome the gene's cytoband lies on
    ///
    /// The chromosome is everything before the first arm marker (`p` or `q`),
    /// so `1p36.33` gives `1` and `Xq28` gives `X`. A band without an arm
    /// (e.g. `Y`) is returned unchanged.
    pub fn chromosome(&self) -> Option<&str> {
        self.cytoband.as_deref().map(cytoband_chromosome)
    }

    /// Does `query` name this gene, either as primary symbol or alias?
    pub fn is_named(&self, query: &str) -> bool {
        self.symbol.eq_ignore_ascii_case(query)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(query))
    }
}

/// Chromosome part of a cytoband string
pub fn cytoband_chromosome(cytoband: &str) -> &str {
    match cytoband.find(['p', 'q']) {
        Some(pos) => &cytoband[..pos],
        None => cytoband,
    }
}

/// Normalize a chromosome name for comparison (handles chr1/1/CHR1 variants)
///
/// # Examples
/// ```
/// use gene_import::core::normalize_chrom;
///
/// assert_eq!(normalize_chrom("chr1"), "1");
/// assert_eq!(normalize_chrom("chrM"), "MT");
/// assert_eq!(normalize_chrom("x"), "X");
/// ```
pub fn normalize_chrom(chrom: &str) -> String {
    let without_prefix = if chrom.len() > 3 && chrom[..3].eq_ignore_ascii_case("chr") {
        &chrom[3..]
    } else {
        chrom
    };

    let upper = without_prefix.to_uppercase();
    if upper == "M" {
        "MT".to_string()
    } else {
        upper
    }
}

/// Check if two chromosome names are equivalent
///
/// # Examples
/// ```
/// use gene_import::core::chroms_equivalent;
///
/// assert!(chroms_equivalent("chr1", "1"));
/// assert!(chroms_equivalent("chrM", "MT"));
/// assert!(!chroms_equivalent("chr1", "chr2"));
/// ```
pub fn chroms_equivalent(chrom1: &str, chrom2: &str) -> bool {
    normalize_chrom(chrom1) == normalize_chrom(chrom2)
}
