//! Gene store abstraction
//!
//! The import pipelines only talk to a `GeneStore`. Two implementations are
//! provided:
//!
//! - `MemoryGeneStore`: the whole gene table in memory, optionally loaded
//!   from and saved to a TSV file
//! - `BufferedGeneStore`: queues inserts in front of another store and writes
//!   them through in batches (bulk-load mode)

use crate::core::error::{StoreError, StoreResult};
use crate::core::gene::{chroms_equivalent, CanonicalGene, UNASSIGNED_GENE_ID};
use log::debug;
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;

/// Capabilities the import pipelines need from a gene table
pub trait GeneStore {
    /// Is a gene with this id stored?
    fn exists(&self, gene_id: i64) -> StoreResult<bool>;

    /// Insert a new gene
    ///
    /// Fails with `StoreError::DuplicateGene` if the id is already taken.
    fn add(&mut self, gene: CanonicalGene) -> StoreResult<()>;

    /// Replace a stored gene (matched by id)
    fn update(&mut self, gene: &CanonicalGene) -> StoreResult<()>;

    /// Find the single gene named `symbol`
    ///
    /// Returns `Ok(None)` when nothing matches or when the match stays
    /// ambiguous after narrowing by `chromosome`.
    fn find_unambiguous(&mut self, symbol: &str, chromosome: &str) -> StoreResult<Option<CanonicalGene>>;

    /// Make all previous writes visible to subsequent reads
    fn flush(&mut self) -> StoreResult<()> {
        Ok(())
    }
}

/// Pick the one gene named `symbol` out of `genes`
///
/// Primary symbols are tried first, aliases only when no primary symbol
/// matches. Several candidates are narrowed to those whose cytoband lies on
/// `chromosome`.
pub fn resolve_unambiguous<'a, I>(genes: I, symbol: &str, chromosome: &str) -> Option<&'a CanonicalGene>
where
    I: Iterator<Item = &'a CanonicalGene> + Clone,
{
    let mut candidates: Vec<&CanonicalGene> = genes
        .clone()
        .filter(|g| g.symbol.eq_ignore_ascii_case(symbol))
        .collect();
    if candidates.is_empty() {
        candidates = genes.filter(|g| g.is_named(symbol)).collect();
    }

    match candidates.len() {
        0 => None,
        1 => Some(candidates[0]),
        _ => {
            let mut on_chrom = candidates
                .into_iter()
                .filter(|g| g.chromosome().is_some_and(|c| chroms_equivalent(c, chromosome)));
            match (on_chrom.next(), on_chrom.next()) {
                (Some(gene), None) => Some(gene),
                _ => None,
            }
        }
    }
}

/// In-memory gene table
#[derive(Debug, Clone, Default)]
pub struct MemoryGeneStore {
    genes: BTreeMap<i64, CanonicalGene>,
}

const TABLE_HEADER: &str = "#gene_id\tsymbol\ttype\tcytoband\tlength\taliases";

impl MemoryGeneStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_genes(genes: impl IntoIterator<Item = CanonicalGene>) -> StoreResult<Self> {
        let mut store = Self::new();
        for gene in genes {
            store.add(gene)?;
        }
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn get(&self, gene_id: i64) -> Option<&CanonicalGene> {
        self.genes.get(&gene_id)
    }

    /// Genes ordered by id
    pub fn genes(&self) -> impl Iterator<Item = &CanonicalGene> + Clone {
        self.genes.values()
    }

    /// Next id for a gene without one; fake ids are negative
    fn next_fake_id(&self) -> i64 {
        self.genes.keys().next().map_or(-1, |&min| min.min(0) - 1)
    }

    /// Load a gene table written by `save`
    pub fn load<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let reader = crate::core::io::open_input(path.as_ref())?;
        Self::read_table(reader)
    }

    /// Read a gene table from any reader
    pub fn read_table<R: BufRead>(reader: R) -> StoreResult<Self> {
        let mut store = Self::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line_number = idx + 1;
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let gene = parse_table_row(&line, line_number)?;
            store.add(gene)?;
        }
        debug!("Loaded {} genes from gene table", store.len());
        Ok(store)
    }

    /// Write the gene table as TSV
    pub fn save<P: AsRef<Path>>(&self, path: P) -> StoreResult<()> {
        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::with_capacity(128 * 1024, file);
        self.write_table(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn write_table<W: Write>(&self, writer: &mut W) -> StoreResult<()> {
        writeln!(writer, "{}", TABLE_HEADER)?;
        for gene in self.genes.values() {
            writeln!(
                writer,
                "{}\t{}\t{}\t{}\t{}\t{}",
                gene.gene_id,
                gene.symbol,
                gene.gene_type.as_deref().unwrap_or(""),
                gene.cytoband.as_deref().unwrap_or(""),
                gene.length.map(|l| l.to_string()).unwrap_or_default(),
                gene.aliases.iter().cloned().collect::<Vec<_>>().join("|"),
            )?;
        }
        Ok(())
    }
}

fn parse_table_row(line: &str, line_number: usize) -> StoreResult<CanonicalGene> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 6 {
        return Err(StoreError::InvalidTable {
            line: line_number,
            message: format!("expected 6 columns, found {}", fields.len()),
        });
    }
    let gene_id: i64 = fields[0].parse().map_err(|_| StoreError::InvalidTable {
        line: line_number,
        message: format!("invalid gene id '{}'", fields[0]),
    })?;
    if gene_id == UNASSIGNED_GENE_ID {
        return Err(StoreError::InvalidTable {
            line: line_number,
            message: "gene id 0 is reserved for unassigned genes".to_string(),
        });
    }
    let optional = |s: &str| (!s.is_empty()).then(|| s.to_string());
    let length = match fields[4] {
        "" => None,
        value => Some(value.parse::<u64>().map_err(|_| StoreError::InvalidTable {
            line: line_number,
            message: format!("invalid length '{}'", value),
        })?),
    };
    let aliases: BTreeSet<String> = fields[5]
        .split('|')
        .filter(|a| !a.is_empty())
        .map(str::to_string)
        .collect();

    let mut gene = CanonicalGene::new(gene_id, fields[1], aliases);
    gene.gene_type = optional(fields[2]);
    gene.cytoband = optional(fields[3]);
    gene.length = length;
    Ok(gene)
}

impl GeneStore for MemoryGeneStore {
    fn exists(&self, gene_id: i64) -> StoreResult<bool> {
        Ok(self.genes.contains_key(&gene_id))
    }

    fn add(&mut self, mut gene: CanonicalGene) -> StoreResult<()> {
        if !gene.has_gene_id() {
            gene.gene_id = self.next_fake_id();
        }
        if self.genes.contains_key(&gene.gene_id) {
            return Err(StoreError::DuplicateGene(gene.gene_id));
        }
        self.genes.insert(gene.gene_id, gene);
        Ok(())
    }

    fn update(&mut self, gene: &CanonicalGene) -> StoreResult<()> {
        match self.genes.get_mut(&gene.gene_id) {
            Some(stored) => {
                *stored = gene.clone();
                Ok(())
            }
            None => Err(StoreError::UnknownGene(gene.gene_id)),
        }
    }

    fn find_unambiguous(&mut self, symbol: &str, chromosome: &str) -> StoreResult<Option<CanonicalGene>> {
        Ok(resolve_unambiguous(self.genes.values(), symbol, chromosome).cloned())
    }
}

/// Bulk-load wrapper that batches inserts
///
/// Inserts are queued and written to the inner store once `capacity` genes
/// are pending or on `flush`. Existence checks see queued genes; lookups
/// and updates of queued genes flush first.
#[derive(Debug)]
pub struct BufferedGeneStore<S: GeneStore> {
    inner: S,
    pending: Vec<CanonicalGene>,
    pending_ids: BTreeSet<i64>,
    capacity: usize,
}

impl<S: GeneStore> BufferedGeneStore<S> {
    pub fn new(inner: S, capacity: usize) -> Self {
        Self {
            inner,
            pending: Vec::new(),
            pending_ids: BTreeSet::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Flush and return the wrapped store
    pub fn into_inner(mut self) -> StoreResult<S> {
        self.write_pending()?;
        Ok(self.inner)
    }

    fn write_pending(&mut self) -> StoreResult<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        debug!("Flushing {} queued genes", self.pending.len());
        let mut queued = std::mem::take(&mut self.pending).into_iter();
        while let Some(gene) = queued.next() {
            let gene_id = gene.gene_id;
            if let Err(err) = self.inner.add(gene) {
                // Genes behind the failed one stay queued
                self.pending = queued.by_ref().collect();
                self.pending_ids = self
                    .pending
                    .iter()
                    .filter(|g| g.has_gene_id())
                    .map(|g| g.gene_id)
                    .collect();
                return Err(err);
            }
            self.pending_ids.remove(&gene_id);
        }
        Ok(())
    }
}

impl<S: GeneStore> GeneStore for BufferedGeneStore<S> {
    fn exists(&self, gene_id: i64) -> StoreResult<bool> {
        if self.pending_ids.contains(&gene_id) {
            return Ok(true);
        }
        self.inner.exists(gene_id)
    }

    fn add(&mut self, gene: CanonicalGene) -> StoreResult<()> {
        if gene.has_gene_id() && !self.pending_ids.insert(gene.gene_id) {
            return Err(StoreError::DuplicateGene(gene.gene_id));
        }
        self.pending.push(gene);
        if self.pending.len() >= self.capacity {
            self.write_pending()?;
        }
        Ok(())
    }

    fn update(&mut self, gene: &CanonicalGene) -> StoreResult<()> {
        if self.pending_ids.contains(&gene.gene_id) {
            self.write_pending()?;
        }
        self.inner.update(gene)
    }

    fn find_unambiguous(&mut self, symbol: &str, chromosome: &str) -> StoreResult<Option<CanonicalGene>> {
        self.write_pending()?;
        self.inner.find_unambiguous(symbol, chromosome)
    }

    fn flush(&mut self) -> StoreResult<()> {
        self.write_pending()?;
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gene(id: i64, symbol: &str, cytoband: Option<&str>, aliases: &[&str]) -> CanonicalGene {
        let mut g = CanonicalGene::new(id, symbol, aliases.iter().map(|s| s.to_string()).collect());
        g.cytoband = cytoband.map(str::to_string);
        g
    }

    #[test]
    fn test_add_and_exists() {
        let mut store = MemoryGeneStore::new();
        store.add(gene(1, "A1BG", None, &[])).unwrap();
        assert!(store.exists(1).unwrap());
        assert!(!store.exists(2).unwrap());
        assert!(matches!(store.add(gene(1, "OTHER", None, &[])), Err(StoreError::DuplicateGene(1))));
    }

    #[test]
    fn test_add_without_id_gets_fake_ids() {
        let mut store = MemoryGeneStore::new();
        store.add(gene(5, "REAL", None, &[])).unwrap();
        store.add(CanonicalGene::from_symbol("SUPP1")).unwrap();
        store.add(CanonicalGene::from_symbol("SUPP2")).unwrap();
        let ids: Vec<i64> = store.genes().map(|g| g.gene_id).collect();
        assert_eq!(ids, vec![-2, -1, 5]);
    }

    #[test]
    fn test_update_unknown_gene() {
        let mut store = MemoryGeneStore::new();
        assert!(matches!(store.update(&gene(7, "X", None, &[])), Err(StoreError::UnknownGene(7))));
    }

    #[test]
    fn test_find_unambiguous_by_symbol() {
        let mut store = MemoryGeneStore::from_genes(vec![
            gene(1, "TP53", Some("17p13.1"), &[]),
            gene(2, "BRCA1", Some("17q21.31"), &["RNF53"]),
        ])
        .unwrap();
        assert_eq!(store.find_unambiguous("TP53", "chr1").unwrap().unwrap().gene_id, 1);
        assert_eq!(store.find_unambiguous("tp53", "chr17").unwrap().unwrap().gene_id, 1);
        assert_eq!(store.find_unambiguous("RNF53", "chr17").unwrap().unwrap().gene_id, 2);
        assert!(store.find_unambiguous("NOPE", "chr17").unwrap().is_none());
    }

    #[test]
    fn test_find_unambiguous_narrows_by_chromosome() {
        let mut store = MemoryGeneStore::from_genes(vec![
            gene(1, "A", Some("1p36"), &["SHARED"]),
            gene(2, "B", Some("2q11"), &["SHARED"]),
            gene(3, "C", Some("2q12"), &["TWICE"]),
            gene(4, "D", Some("2q13"), &["TWICE"]),
        ])
        .unwrap();
        assert_eq!(store.find_unambiguous("SHARED", "chr2").unwrap().unwrap().gene_id, 2);
        assert_eq!(store.find_unambiguous("SHARED", "1").unwrap().unwrap().gene_id, 1);
        assert!(store.find_unambiguous("SHARED", "chr3").unwrap().is_none());
        assert!(store.find_unambiguous("TWICE", "chr2").unwrap().is_none());
    }

    #[test]
    fn test_primary_symbol_wins_over_alias() {
        let mut store = MemoryGeneStore::from_genes(vec![
            gene(1, "ABC", None, &[]),
            gene(2, "XYZ", None, &["ABC"]),
        ])
        .unwrap();
        assert_eq!(store.find_unambiguous("ABC", "chr1").unwrap().unwrap().gene_id, 1);
    }

    #[test]
    fn test_table_roundtrip() {
        let mut g = gene(1, "A1BG", Some("19q13.43"), &["A1B", "GAB"]);
        g.gene_type = Some("protein-coding".to_string());
        g.length = Some(1234);
        let store = MemoryGeneStore::from_genes(vec![g.clone(), gene(2, "B", None, &[])]).unwrap();

        let mut buffer = Vec::new();
        store.write_table(&mut buffer).unwrap();
        let loaded = MemoryGeneStore::read_table(buffer.as_slice()).unwrap();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.get(1), Some(&g));
        assert_eq!(loaded.get(2).unwrap().gene_type, None);
    }

    #[test]
    fn test_read_table_invalid_row() {
        let data = b"#gene_id\tsymbol\ttype\tcytoband\tlength\taliases\nabc\tX\t\t\t\t\n";
        let result = MemoryGeneStore::read_table(&data[..]);
        assert!(matches!(result, Err(StoreError::InvalidTable { line: 2, .. })));
    }

    #[test]
    fn test_read_table_rejects_unassigned_id() {
        let data = b"0\tX\t\t\t\t\n";
        let result = MemoryGeneStore::read_table(&data[..]);
        assert!(matches!(result, Err(StoreError::InvalidTable { line: 1, .. })));
    }

    /// Memory store whose `add` fails for one gene id
    #[derive(Default)]
    struct RejectingStore {
        inner: MemoryGeneStore,
        reject: i64,
    }

    impl GeneStore for RejectingStore {
        fn exists(&self, gene_id: i64) -> StoreResult<bool> {
            self.inner.exists(gene_id)
        }

        fn add(&mut self, gene: CanonicalGene) -> StoreResult<()> {
            if gene.gene_id == self.reject {
                return Err(StoreError::Io(std::io::Error::new(std::io::ErrorKind::Other, "write failed")));
            }
            self.inner.add(gene)
        }

        fn update(&mut self, gene: &CanonicalGene) -> StoreResult<()> {
            self.inner.update(gene)
        }

        fn find_unambiguous(&mut self, symbol: &str, chromosome: &str) -> StoreResult<Option<CanonicalGene>> {
            self.inner.find_unambiguous(symbol, chromosome)
        }
    }

    #[test]
    fn test_buffered_store_keeps_queue_after_failed_write() {
        let inner = RejectingStore {
            reject: 2,
            ..RejectingStore::default()
        };
        let mut store = BufferedGeneStore::new(inner, 10);
        for (id, symbol) in [(1, "A"), (2, "B"), (3, "C"), (4, "D")] {
            store.add(gene(id, symbol, None, &[])).unwrap();
        }

        assert!(matches!(store.flush(), Err(StoreError::Io(_))));
        assert!(store.inner().exists(1).unwrap());
        assert_eq!(store.pending(), 2);
        assert!(!store.exists(2).unwrap());
        assert!(store.exists(3).unwrap());
        assert!(store.exists(4).unwrap());
        assert!(matches!(store.add(gene(3, "C", None, &[])), Err(StoreError::DuplicateGene(3))));

        let inner = store.into_inner().unwrap();
        assert_eq!(inner.inner.len(), 3);
    }

    #[test]
    fn test_buffered_store_flushes_at_capacity() {
        let mut store = BufferedGeneStore::new(MemoryGeneStore::new(), 2);
        store.add(gene(1, "A", None, &[])).unwrap();
        assert_eq!(store.pending(), 1);
        assert!(store.exists(1).unwrap());
        assert!(!store.inner().exists(1).unwrap());

        store.add(gene(2, "B", None, &[])).unwrap();
        assert_eq!(store.pending(), 0);
        assert_eq!(store.inner().len(), 2);
    }

    #[test]
    fn test_buffered_store_rejects_queued_duplicate() {
        let mut store = BufferedGeneStore::new(MemoryGeneStore::new(), 10);
        store.add(gene(1, "A", None, &[])).unwrap();
        assert!(matches!(store.add(gene(1, "A", None, &[])), Err(StoreError::DuplicateGene(1))));
    }

    #[test]
    fn test_buffered_store_lookup_sees_queued_genes() {
        let mut store = BufferedGeneStore::new(MemoryGeneStore::new(), 10);
        store.add(gene(1, "A", None, &[])).unwrap();
        assert_eq!(store.find_unambiguous("A", "chr1").unwrap().unwrap().gene_id, 1);
        assert_eq!(store.pending(), 0);

        let inner = store.into_inner().unwrap();
        assert_eq!(inner.len(), 1);
    }
}
