//! Input file importers
//!
//! One importer per reference file: NCBI gene_info nomenclature,
//! GTF annotation (gene lengths) and the supplementary gene file.

pub mod gene_info;
pub mod gtf;
pub mod supp;

pub use gene_info::{
    import_gene_info, import_gene_info_reader, GeneInfoRecord, ReconcileReport, Reconciler,
    RecordOutcome, SymbolGroups,
};
pub use gtf::{import_gene_lengths, import_gene_lengths_reader, GtfRecordView, LengthCalculator, LengthReport};
pub use supp::{import_supp_genes, import_supp_genes_reader, SuppRecord, SuppStats};
