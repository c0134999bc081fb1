//! Core gene import functionality
//!
//! This module contains the gene model, the gene store interface,
//! the gene length computation and the notice reporting shared by
//! the import pipelines.

mod error;
mod gene;
pub mod io;
mod length;
mod options;
mod report;
mod store;

pub use error::{
    GeneImportError, LengthError, LengthResult, ParseError, ParseResult, Result, StoreError,
    StoreResult,
};
pub use gene::{chroms_equivalent, cytoband_chromosome, normalize_chrom, CanonicalGene, UNASSIGNED_GENE_ID};
pub use io::{count_lines, detect_compression, open_input, CompressionFormat, DEFAULT_BUFFER_SIZE};
pub use length::{gene_length, Locus, LocusGroup};
pub use options::{ImportOptions, DEFAULT_BULK_SIZE, DEFAULT_PLACEHOLDER, HUMAN_TAXONOMY_ID};
pub use report::{truncate_preview, Notice, NoticeKind, Notices, ALREADY_IN_TABLE};
pub use store::{resolve_unambiguous, BufferedGeneStore, GeneStore, MemoryGeneStore};
