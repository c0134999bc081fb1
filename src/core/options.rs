//! Import settings shared by the pipelines

/// NCBI taxonomy id for Homo sapiens
pub const HUMAN_TAXONOMY_ID: u32 = 9606;

/// Value used by NCBI gene_info for an empty column
pub const DEFAULT_PLACEHOLDER: &str = "-";

/// Number of queued adds after which a buffered store flushes
pub const DEFAULT_BULK_SIZE: usize = 10_000;

/// Settings for one import run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptions {
    /// Only nomenclature records of this organism are imported
    pub taxonomy_id: u32,
    /// Column value meaning "no value"
    pub placeholder: String,
    /// Provisional-symbol prefix of microRNA genes
    pub microrna_prefix: String,
    /// Gene type of microRNA genes (compared case-insensitively)
    pub microrna_type: String,
    /// Max characters of the "genes not found" preview
    pub not_found_preview: usize,
    /// Adds queued before a buffered store writes them through
    pub buffer_size: usize,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            taxonomy_id: HUMAN_TAXONOMY_ID,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            microrna_prefix: "MIR".to_string(),
            microrna_type: "miscRNA".to_string(),
            not_found_preview: 100,
            buffer_size: DEFAULT_BULK_SIZE,
        }
    }
}

impl ImportOptions {
    /// Options for a different organism
    pub fn for_taxonomy(taxonomy_id: u32) -> Self {
        Self {
            taxonomy_id,
            ..Self::default()
        }
    }

    /// Field value, or `None` for the placeholder
    pub fn value<'a>(&self, field: &'a str) -> Option<&'a str> {
        if field == self.placeholder {
            None
        } else {
            Some(field)
        }
    }

    /// Is this record a microRNA handled by the separate microRNA import?
    pub fn is_microrna(&self, symbol: &str, gene_type: &str) -> bool {
        symbol.starts_with(&self.microrna_prefix) && gene_type.eq_ignore_ascii_case(&self.microrna_type)
    }
}
