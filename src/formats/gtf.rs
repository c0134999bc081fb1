//! GTF gene length import
//!
//! Scans a GTF annotation (e.g. GENCODE) and stores, for every gene, the
//! union length of its exon and CDS features.
//!
//! The scan is a single forward pass: consecutive exon/CDS records with the
//! same `gene_id` form one group. When the `gene_id` changes the previous
//! group is finalized and the next gene is looked up by `gene_name` and
//! chromosome. The input must therefore be sorted by gene, which is how
//! GENCODE and Ensembl ship their GTF files.

use crate::core::{
    chroms_equivalent, truncate_preview, CanonicalGene, GeneStore, ImportOptions, Locus, LocusGroup,
    NoticeKind, Notices, ParseError, ParseResult, Result,
};
use log::debug;
use memchr::memchr;
use std::collections::{BTreeSet, HashSet};
use std::io::BufRead;
use std::path::Path;

/// Zero-copy GTF record view for parsing
/// GTF format: seqname, source, feature, start, end, score, strand, frame, attributes
pub struct GtfRecordView<'a> {
    /// Sequence name (chromosome)
    pub seqname: &'a str,
    /// Source field
    pub source: &'a str,
    /// Feature type
    pub feature: &'a str,
    /// Start position
    pub start: u64,
    /// End position
    pub end: u64,
    /// Attributes field
    pub attributes: &'a str,
}

impl<'a> GtfRecordView<'a> {
    /// Parse a GTF line with minimal allocation
    /// GTF has exactly 9 tab-separated fields
    pub fn parse(line: &'a [u8], line_number: usize) -> ParseResult<Self> {
        // Find field boundaries using memchr for tab characters
        let mut field_bounds = Vec::with_capacity(9);
        let mut start_pos = 0;
        loop {
            match memchr(b'\t', &line[start_pos..]) {
                Some(tab_pos) => {
                    field_bounds.push((start_pos, start_pos + tab_pos));
                    start_pos += tab_pos + 1;
                }
                None => {
                    field_bounds.push((start_pos, line.len()));
                    break;
                }
            }
        }

        if field_bounds.len() < 9 {
            return Err(ParseError::TooFewFields {
                line: line_number,
                expected: 9,
                found: field_bounds.len(),
            });
        }

        let get_field = |idx: usize, name: &'static str| -> ParseResult<&'a str> {
            let (start, end) = field_bounds[idx];
            std::str::from_utf8(&line[start..end]).map_err(|_| ParseError::InvalidUtf8 {
                line: line_number,
                field: name,
            })
        };
        let get_number = |idx: usize, name: &'static str| -> ParseResult<u64> {
            let value = get_field(idx, name)?;
            value.parse().map_err(|_| ParseError::InvalidNumber {
                line: line_number,
                field: name,
                value: value.to_string(),
            })
        };

        Ok(Self {
            seqname: get_field(0, "seqname")?,
            source: get_field(1, "source")?,
            feature: get_field(2, "feature")?,
            start: get_number(3, "start")?,
            end: get_number(4, "end")?,
            attributes: get_field(8, "attributes")?,
        })
    }

    /// Exon and CDS features are the only ones that count towards gene length
    pub fn is_exonic(&self) -> bool {
        self.feature == "exon" || self.feature == "CDS"
    }

    /// Value of a `key "value"` attribute
    pub fn attribute(&self, key: &str) -> Option<&'a str> {
        self.attributes.split(';').find_map(|pair| {
            let (k, v) = pair.trim().split_once(char::is_whitespace)?;
            (k == key).then(|| v.trim().trim_matches('"')).filter(|v| !v.is_empty())
        })
    }

    pub fn gene_id(&self) -> Option<&'a str> {
        self.attribute("gene_id")
    }

    pub fn gene_name(&self) -> Option<&'a str> {
        self.attribute("gene_name")
    }

    pub fn locus(&self) -> Locus {
        Locus::new(self.start, self.end)
    }
}

/// Counters and notices of one GTF length import
#[derive(Debug, Clone, Default)]
pub struct LengthReport {
    /// Data lines read (comments excluded)
    pub records: usize,
    /// Records that are neither exon nor CDS
    pub ignored: usize,
    /// Exon/CDS records without gene_id or gene_name
    pub malformed: usize,
    /// Gene groups encountered
    pub groups: usize,
    /// Length updates written
    pub updated: usize,
    /// Groups skipped because the gene's cytoband lies on another chromosome
    pub chromosome_mismatch: usize,
    /// Symbols not found or ambiguous in the store
    pub not_found: BTreeSet<String>,
    pub notices: Notices,
}

/// Gene being collected
#[derive(Debug)]
struct ActiveGene {
    feature_id: String,
    chromosome: String,
    gene: CanonicalGene,
}

/// Single-pass gene length calculator over GTF records
pub struct LengthCalculator<'s, 'o, S: GeneStore> {
    store: &'s mut S,
    options: &'o ImportOptions,
    current_feature: Option<String>,
    active: Option<ActiveGene>,
    loci: LocusGroup,
    written: HashSet<String>,
    report: LengthReport,
}

impl<'s, 'o, S: GeneStore> LengthCalculator<'s, 'o, S> {
    pub fn new(store: &'s mut S, options: &'o ImportOptions) -> Self {
        Self {
            store,
            options,
            current_feature: None,
            active: None,
            loci: LocusGroup::new(),
            written: HashSet::new(),
            report: LengthReport::default(),
        }
    }

    /// Process one record
    pub fn feed(&mut self, record: &GtfRecordView) -> Result<()> {
        self.report.records += 1;
        if !record.is_exonic() {
            self.report.ignored += 1;
            return Ok(());
        }
        let (Some(feature_id), Some(symbol)) = (record.gene_id(), record.gene_name()) else {
            debug!("Exon record without gene_id/gene_name on {}", record.seqname);
            self.report.malformed += 1;
            return Ok(());
        };

        if self.current_feature.as_deref() != Some(feature_id) {
            self.finalize()?;
            self.current_feature = Some(feature_id.to_string());
            self.report.groups += 1;

            match self.store.find_unambiguous(symbol, record.seqname)? {
                Some(gene) => {
                    self.active = Some(ActiveGene {
                        feature_id: feature_id.to_string(),
                        chromosome: record.seqname.to_string(),
                        gene,
                    });
                }
                None => {
                    self.report.not_found.insert(symbol.to_string());
                    return Ok(());
                }
            }
        }

        if self.active.is_some() {
            self.loci.push(record.locus());
        }
        Ok(())
    }

    /// Write the length of the gene being collected, if any
    fn finalize(&mut self) -> Result<()> {
        let Some(ActiveGene { feature_id, chromosome, mut gene }) = self.active.take() else {
            self.loci = LocusGroup::new();
            return Ok(());
        };
        let length = self.loci.take_length()?;

        let on_chromosome = gene
            .chromosome()
            .map_or(true, |chrom| chroms_equivalent(chrom, &chromosome));
        if !on_chromosome {
            debug!(
                "{} ({}) lies on another chromosome than {}, length not saved",
                gene.symbol, feature_id, chromosome
            );
            self.report.chromosome_mismatch += 1;
            return Ok(());
        }

        gene.length = Some(length);
        self.store.update(&gene)?;
        self.report.updated += 1;

        if !self.written.insert(feature_id.clone()) {
            self.report
                .notices
                .push(NoticeKind::DoubleInInput, format!("{} already is double in inputfile", feature_id));
        }
        Ok(())
    }

    /// Finalize the last gene and summarize the run
    pub fn finish(mut self) -> Result<LengthReport> {
        self.finalize()?;
        let mut report = self.report;

        if !report.not_found.is_empty() {
            let listed = format!(
                "[{}]",
                report.not_found.iter().cloned().collect::<Vec<_>>().join(", ")
            );
            let message = format!(
                "Genes not found, or symbol found to be ambiguous ({} genes in total): {}",
                report.not_found.len(),
                truncate_preview(&listed, self.options.not_found_preview)
            );
            report.notices.push(NoticeKind::NotFound, message);
        }
        report
            .notices
            .push(NoticeKind::Summary, format!("Updated length info for {} genes", report.updated));
        Ok(report)
    }
}

/// Import gene lengths from a GTF file (plain, gzip or bzip2)
pub fn import_gene_lengths<P: AsRef<Path>, S: GeneStore>(
    input: P,
    store: &mut S,
    options: &ImportOptions,
) -> Result<LengthReport> {
    let reader = crate::core::open_input(input)?;
    import_gene_lengths_reader(reader, store, options)
}

/// Import gene lengths from GTF records read from any reader
pub fn import_gene_lengths_reader<R: BufRead, S: GeneStore>(
    reader: R,
    store: &mut S,
    options: &ImportOptions,
) -> Result<LengthReport> {
    let mut calculator = LengthCalculator::new(store, options);

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if crate::core::io::is_skippable(&line) {
            continue;
        }
        let record = GtfRecordView::parse(line.as_bytes(), idx + 1)?;
        calculator.feed(&record)?;
    }

    calculator.finish()
}
