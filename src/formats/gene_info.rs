//! NCBI gene_info nomenclature import
//!
//! Reads a gene_info dump, groups the genes by symbol and adds every gene
//! whose symbol is unambiguous to the gene store.
//!
//! Genes are split in two tiers: genes with a symbol from the nomenclature
//! authority (column 11) and genes that only carry a provisional symbol
//! (column 3). Official genes are resolved first; a provisional gene is
//! only imported if its symbol is unique in its tier and is not the official
//! symbol of another gene in the same file. A symbol shared by several gene
//! ids is reported and none of those genes is imported.

use crate::core::{
    CanonicalGene, GeneStore, ImportOptions, NoticeKind, Notices, ParseError, ParseResult, Result,
    StoreResult, ALREADY_IN_TABLE,
};
use std::collections::{BTreeSet, HashMap};
use std::io::BufRead;
use std::path::Path;

/// Columns a gene_info record must have
pub const GENE_INFO_MIN_FIELDS: usize = 11;

/// Zero-copy view of one gene_info line
///
/// Columns: tax_id, GeneID, Symbol, LocusTag, Synonyms, dbXrefs,
/// chromosome, map_location, description, type_of_gene,
/// Symbol_from_nomenclature_authority, ...
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneInfoRecord<'a> {
    pub taxonomy_id: u32,
    pub gene_id: i64,
    /// Provisional symbol
    pub symbol: &'a str,
    pub locus_tag: &'a str,
    /// Pipe-separated synonyms
    pub synonyms: &'a str,
    pub cytoband: &'a str,
    pub gene_type: &'a str,
    pub official_symbol: &'a str,
}

impl<'a> GeneInfoRecord<'a> {
    /// Parse a gene_info line; `line_number` is 1-based and only used for errors
    pub fn parse(line: &'a str, line_number: usize) -> ParseResult<Self> {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < GENE_INFO_MIN_FIELDS {
            return Err(ParseError::TooFewFields {
                line: line_number,
                expected: GENE_INFO_MIN_FIELDS,
                found: fields.len(),
            });
        }

        let taxonomy_id = fields[0].parse().map_err(|_| ParseError::InvalidNumber {
            line: line_number,
            field: "tax_id",
            value: fields[0].to_string(),
        })?;
        let gene_id: i64 = fields[1].parse().map_err(|_| ParseError::InvalidNumber {
            line: line_number,
            field: "GeneID",
            value: fields[1].to_string(),
        })?;
        // 0 and negative ids are reserved for genes the store numbers itself
        if gene_id <= 0 {
            return Err(ParseError::InvalidGeneId {
                line: line_number,
                value: gene_id,
            });
        }

        Ok(Self {
            taxonomy_id,
            gene_id,
            symbol: fields[2],
            locus_tag: fields[3],
            synonyms: fields[4],
            cytoband: fields[7],
            gene_type: fields[9],
            official_symbol: fields[10],
        })
    }

    /// Locus tag and synonyms, placeholders left out
    pub fn aliases(&self, options: &ImportOptions) -> BTreeSet<String> {
        let mut aliases = BTreeSet::new();
        if let Some(tag) = options.value(self.locus_tag) {
            aliases.insert(tag.to_string());
        }
        if let Some(synonyms) = options.value(self.synonyms) {
            aliases.extend(synonyms.split('|').map(str::to_string));
        }
        aliases
    }
}

/// Candidate genes per symbol, in order of first appearance
#[derive(Debug, Clone, Default)]
pub struct SymbolGroups {
    order: Vec<String>,
    groups: HashMap<String, Vec<CanonicalGene>>,
}

impl SymbolGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a candidate; returns false if the group already holds this gene id
    pub fn insert(&mut self, symbol: &str, gene: CanonicalGene) -> bool {
        if !self.groups.contains_key(symbol) {
            self.order.push(symbol.to_string());
        }
        let candidates = self.groups.entry(symbol.to_string()).or_default();
        if candidates.iter().any(|g| g.gene_id == gene.gene_id) {
            return false;
        }
        candidates.push(gene);
        true
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.groups.contains_key(symbol)
    }

    /// Number of distinct symbols
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, symbol: &str) -> Option<&[CanonicalGene]> {
        self.groups.get(symbol).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[CanonicalGene])> {
        self.order
            .iter()
            .map(move |symbol| (symbol.as_str(), self.groups[symbol].as_slice()))
    }
}

/// What happened to one input record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Record belongs to another organism
    OtherTaxonomy,
    /// microRNA, imported separately
    MicroRna,
    /// Grouped under its official symbol
    Official,
    /// Grouped under its provisional symbol
    Provisional,
    /// Neither symbol present
    NoSymbol,
}

/// Counters and notices of one gene_info import
#[derive(Debug, Clone, Default)]
pub struct ReconcileReport {
    /// Data lines read (comments excluded)
    pub records: usize,
    pub other_taxonomy: usize,
    pub microrna: usize,
    pub no_symbol: usize,
    /// Distinct official symbols
    pub official_symbols: usize,
    /// Distinct provisional symbols
    pub provisional_symbols: usize,
    pub added_official: usize,
    pub added_provisional: usize,
    /// Genes skipped because their id is already stored
    pub already_in_table: usize,
    /// Provisional symbols not imported (already stored, official elsewhere or duplicate)
    pub skipped_provisional: usize,
    /// Provisional symbols that are the official symbol of another gene
    pub official_elsewhere: usize,
    /// Symbol groups rejected because several genes share the symbol
    pub duplicate_symbols: usize,
    pub notices: Notices,
}

impl ReconcileReport {
    pub fn added(&self) -> usize {
        self.added_official + self.added_provisional
    }
}

/// Groups gene_info records and resolves them against a gene store
///
/// State lives for one import: feed every record with `push`, then call
/// `resolve` once.
#[derive(Debug)]
pub struct Reconciler<'o> {
    options: &'o ImportOptions,
    official: SymbolGroups,
    provisional: SymbolGroups,
    report: ReconcileReport,
}

impl<'o> Reconciler<'o> {
    pub fn new(options: &'o ImportOptions) -> Self {
        Self {
            options,
            official: SymbolGroups::new(),
            provisional: SymbolGroups::new(),
            report: ReconcileReport::default(),
        }
    }

    pub fn official(&self) -> &SymbolGroups {
        &self.official
    }

    pub fn provisional(&self) -> &SymbolGroups {
        &self.provisional
    }

    /// Group one record by symbol
    pub fn push(&mut self, record: &GeneInfoRecord) -> RecordOutcome {
        self.report.records += 1;
        let options = self.options;

        if record.taxonomy_id != options.taxonomy_id {
            self.report.other_taxonomy += 1;
            return RecordOutcome::OtherTaxonomy;
        }

        if options.is_microrna(record.symbol, record.gene_type) {
            self.report.microrna += 1;
            return RecordOutcome::MicroRna;
        }

        let (symbol, outcome) = if let Some(official) = options.value(record.official_symbol) {
            (official, RecordOutcome::Official)
        } else if let Some(provisional) = options.value(record.symbol) {
            (provisional, RecordOutcome::Provisional)
        } else {
            self.report.no_symbol += 1;
            return RecordOutcome::NoSymbol;
        };

        let mut gene = CanonicalGene::new(record.gene_id, symbol, record.aliases(options));
        gene.cytoband = options.value(record.cytoband).map(str::to_string);
        gene.gene_type = Some(record.gene_type.to_string());

        let groups = match outcome {
            RecordOutcome::Official => &mut self.official,
            _ => &mut self.provisional,
        };
        groups.insert(symbol, gene);
        outcome
    }

    /// Add every unambiguous gene to `store`
    pub fn resolve<S: GeneStore>(mut self, store: &mut S) -> StoreResult<ReconcileReport> {
        let mut report = std::mem::take(&mut self.report);
        report.official_symbols = self.official.len();
        report.provisional_symbols = self.provisional.len();

        for (symbol, genes) in self.official.iter() {
            match genes {
                [gene] => {
                    if store.exists(gene.gene_id)? {
                        report.notices.push(NoticeKind::AlreadyInTable, ALREADY_IN_TABLE);
                        report.already_in_table += 1;
                        continue;
                    }
                    store.add(gene.clone())?;
                    report.notices.push(NoticeKind::AddedOfficial, "New gene with official symbol added");
                    report.added_official += 1;
                }
                _ => {
                    report.notices.duplicate_symbol(symbol, genes, true);
                    report.duplicate_symbols += 1;
                }
            }
        }

        if !self.provisional.is_empty() {
            for (symbol, genes) in self.provisional.iter() {
                match genes {
                    [gene] if self.official.contains(symbol) => {
                        report.notices.push(
                            NoticeKind::OfficialElsewhere,
                            format!(
                                "Ignored line with entrez gene id {} because its 'unnoficial' symbol {} \
                                 is already an 'official symbol' of another gene",
                                gene.gene_id, symbol
                            ),
                        );
                        report.official_elsewhere += 1;
                        report.skipped_provisional += 1;
                    }
                    [gene] => {
                        if store.exists(gene.gene_id)? {
                            report.notices.push(NoticeKind::AlreadyInTable, ALREADY_IN_TABLE);
                            report.already_in_table += 1;
                            report.skipped_provisional += 1;
                            continue;
                        }
                        store.add(gene.clone())?;
                        report
                            .notices
                            .push(NoticeKind::AddedProvisional, "New gene with *no* official symbol added");
                        report.added_provisional += 1;
                    }
                    _ => {
                        report.notices.duplicate_symbol(symbol, genes, false);
                        report.duplicate_symbols += 1;
                        report.skipped_provisional += 1;
                    }
                }
            }
            report.notices.push(
                NoticeKind::Summary,
                format!(
                    "There were {} genes names in this file without an official symbol from nomenclature authority. \
                     Imported: {}. Gene names skipped (because of duplicate symbol entry or because symbol is an \
                     'official symbol' of another gene): {}",
                    self.provisional.len(),
                    report.added_provisional,
                    report.skipped_provisional
                ),
            );
        }

        if report.already_in_table > 0 {
            report.notices.push(
                NoticeKind::Summary,
                format!(
                    "Number of records skipped because the gene was already in the gene table \
                     (updates are not allowed - see specific warnings above): {}",
                    report.already_in_table
                ),
            );
        }

        Ok(report)
    }
}

/// Import a gene_info file (plain, gzip or bzip2) into `store`
pub fn import_gene_info<P: AsRef<Path>, S: GeneStore>(
    input: P,
    store: &mut S,
    options: &ImportOptions,
) -> Result<ReconcileReport> {
    let reader = crate::core::open_input(input)?;
    import_gene_info_reader(reader, store, options)
}

/// Import gene_info records from any reader
pub fn import_gene_info_reader<R: BufRead, S: GeneStore>(
    reader: R,
    store: &mut S,
    options: &ImportOptions,
) -> Result<ReconcileReport> {
    let mut reconciler = Reconciler::new(options);

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if crate::core::io::is_skippable(&line) {
            continue;
        }
        let record = GeneInfoRecord::parse(&line, idx + 1)?;
        reconciler.push(&record);
    }

    Ok(reconciler.resolve(store)?)
}
