//! gene-import - canonical gene table builder
//!
//! Reconciles NCBI gene_info nomenclature, supplementary gene records and
//! GTF exon annotation into one gene table.
//!
//! # Features
//!
//! - Symbol reconciliation across official and provisional symbols, with
//!   duplicate-symbol detection
//! - Gene length as the union of exon/CDS intervals
//! - Pluggable gene store (`GeneStore`) with in-memory and buffered
//!   implementations
//! - Support for compressed input files (gzip, bzip2)
//!
//! # Example
//!
//! ```ignore
//! use gene_import::{import_gene_info, import_gene_lengths, GeneStore, ImportOptions, MemoryGeneStore};
//!
//! let options = ImportOptions::default();
//! let mut store = MemoryGeneStore::new();
//!
//! import_gene_info("Homo_sapiens.gene_info.gz", &mut store, &options)?;
//! store.flush()?;
//! import_gene_lengths("gencode.v44.annotation.gtf.gz", &mut store, &options)?;
//! store.save("gene_table.tsv")?;
//! ```

pub mod core;
pub mod formats;

// Re-export commonly used types
pub use core::{
    gene_length, BufferedGeneStore, CanonicalGene, GeneImportError, GeneStore, ImportOptions, Locus,
    MemoryGeneStore, NoticeKind, Notices, ParseError, StoreError,
};
pub use formats::{import_gene_info, import_gene_lengths, import_supp_genes};
