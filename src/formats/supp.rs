//! Supplementary gene file import
//!
//! Four tab-separated columns: symbol, type, cytoband, length. Every line
//! becomes a gene; empty columns are left unset. Genes are added as they
//! are, without existence or duplicate checks.

use crate::core::{CanonicalGene, GeneStore, ParseError, ParseResult, Result};
use std::io::BufRead;
use std::path::Path;

/// One supplementary gene line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuppRecord<'a> {
    pub symbol: &'a str,
    pub gene_type: Option<&'a str>,
    pub cytoband: Option<&'a str>,
    pub length: Option<u64>,
}

impl<'a> SuppRecord<'a> {
    pub fn parse(line: &'a str, line_number: usize) -> ParseResult<Self> {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 4 {
            return Err(ParseError::TooFewFields {
                line: line_number,
                expected: 4,
                found: fields.len(),
            });
        }
        let optional = |s: &'a str| if s.is_empty() { None } else { Some(s) };
        let length = match optional(fields[3]) {
            Some(value) => Some(value.parse().map_err(|_| ParseError::InvalidNumber {
                line: line_number,
                field: "length",
                value: value.to_string(),
            })?),
            None => None,
        };

        Ok(Self {
            symbol: fields[0],
            gene_type: optional(fields[1]),
            cytoband: optional(fields[2]),
            length,
        })
    }

    pub fn to_gene(&self) -> CanonicalGene {
        let mut gene = CanonicalGene::from_symbol(self.symbol);
        gene.gene_type = self.gene_type.map(str::to_string);
        gene.cytoband = self.cytoband.map(str::to_string);
        gene.length = self.length;
        gene
    }
}

/// Statistics of one supplementary import
#[derive(Debug, Clone, Default)]
pub struct SuppStats {
    pub total: usize,
    pub added: usize,
}

/// Import a supplementary gene file (plain, gzip or bzip2)
pub fn import_supp_genes<P: AsRef<Path>, S: GeneStore>(input: P, store: &mut S) -> Result<SuppStats> {
    let reader = crate::core::open_input(input)?;
    import_supp_genes_reader(reader, store)
}

/// Import supplementary genes from any reader
pub fn import_supp_genes_reader<R: BufRead, S: GeneStore>(reader: R, store: &mut S) -> Result<SuppStats> {
    let mut stats = SuppStats::default();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if crate::core::io::is_skippable(&line) {
            continue;
        }
        stats.total += 1;
        let record = SuppRecord::parse(&line, idx + 1)?;
        store.add(record.to_gene())?;
        stats.added += 1;
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GeneImportError, MemoryGeneStore};

    #[test]
    fn test_parse_full_record() {
        let record = SuppRecord::parse("LINC01\tncRNA\t1p36.33\t2500", 1).unwrap();
        assert_eq!(record.symbol, "LINC01");
        assert_eq!(record.gene_type, Some("ncRNA"));
        assert_eq!(record.cytoband, Some("1p36.33"));
        assert_eq!(record.length, Some(2500));
    }

    #[test]
    fn test_parse_empty_optionals() {
        let record = SuppRecord::parse("LINC02\t\t\t", 1).unwrap();
        assert_eq!(record.gene_type, None);
        assert_eq!(record.cytoband, None);
        assert_eq!(record.length, None);

        let gene = record.to_gene();
        assert_eq!(gene.symbol, "LINC02");
        assert!(!gene.has_gene_id());
    }

    #[test]
    fn test_parse_invalid_length() {
        let result = SuppRecord::parse("X\tt\t1p1\tlong", 3);
        assert!(matches!(
            result,
            Err(ParseError::InvalidNumber { line: 3, field: "length", .. })
        ));
    }

    #[test]
    fn test_duplicates_are_added() {
        let input = "#symbol\ttype\tcytoband\tlength\nDUP\tncRNA\t\t\nDUP\tncRNA\t\t\n";
        let mut store = MemoryGeneStore::new();
        let stats = import_supp_genes_reader(input.as_bytes(), &mut store).unwrap();

        assert_eq!(stats.total, 2);
        assert_eq!(stats.added, 2);
        assert_eq!(store.genes().filter(|g| g.symbol == "DUP").count(), 2);
    }

    #[test]
    fn test_short_line_is_fatal() {
        let input = "GOOD\tt\t1p1\t10\nBAD\tt\n";
        let mut store = MemoryGeneStore::new();
        let err = import_supp_genes_reader(input.as_bytes(), &mut store).unwrap_err();
        assert!(matches!(
            err,
            GeneImportError::Parse(ParseError::TooFewFields { line: 2, .. })
        ));
        assert_eq!(store.len(), 1);
    }
}
