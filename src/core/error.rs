//! Error types for gene-import
//!
//! Defines all error types used throughout the library.

use thiserror::Error;

/// Main error type for gene-import operations
#[derive(Debug, Error)]
pub enum GeneImportError {
    /// Input file parsing errors
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Gene store errors
    #[error("Gene store error: {0}")]
    Store(#[from] StoreError),

    /// Gene length computation errors
    #[error("Gene length error: {0}")]
    Length(#[from] LengthError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while parsing an input record
#[derive(Debug, Error)]
pub enum ParseError {
    /// Record has fewer tab-separated columns than required
    #[error("Too few fields at line {line}: expected at least {expected}, found {found}")]
    TooFewFields {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// Failed to parse integer
    #[error("Failed to parse integer '{value}' in field {field} at line {line}")]
    InvalidNumber {
        line: usize,
        field: &'static str,
        value: String,
    },

    /// Gene id is not a positive number
    #[error("Invalid gene id '{value}' at line {line}: gene ids must be positive")]
    InvalidGeneId { line: usize, value: i64 },

    /// Field is not valid UTF-8
    #[error("Invalid UTF-8 in field {field} at line {line}")]
    InvalidUtf8 { line: usize, field: &'static str },
}

impl ParseError {
    /// Line number (1-based) the error was raised on
    pub fn line(&self) -> usize {
        match self {
            ParseError::TooFewFields { line, .. }
            | ParseError::InvalidNumber { line, .. }
            | ParseError::InvalidGeneId { line, .. }
            | ParseError::InvalidUtf8 { line, .. } => *line,
        }
    }
}

/// Errors raised by a gene store backend
#[derive(Debug, Error)]
pub enum StoreError {
    /// Unique key violation on insert
    #[error("Gene {0} already exists in the gene table")]
    DuplicateGene(i64),

    /// Update of a gene the store does not hold
    #[error("Gene {0} not found in the gene table")]
    UnknownGene(i64),

    /// Malformed persisted gene table
    #[error("Invalid gene table at line {line}: {message}")]
    InvalidTable { line: usize, message: String },

    /// I/O error while reading or writing the table
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while computing a gene length
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LengthError {
    /// No loci were collected for the gene
    #[error("Cannot compute the length of an empty locus group")]
    Empty,

    /// Largest end lies before the smallest start
    #[error("Invalid locus span: max={max}, min={min}")]
    InvalidSpan { min: u64, max: u64 },

    /// A single locus ends before it starts
    #[error("Invalid locus: start ({start}) > end ({end})")]
    InvalidLocus { start: u64, end: u64 },
}

/// Result type alias for gene-import operations
pub type Result<T> = std::result::Result<T, GeneImportError>;

/// Result type alias for record parsing
pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// Result type alias for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Result type alias for length computation
pub type LengthResult<T> = std::result::Result<T, LengthError>;
