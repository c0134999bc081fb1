//! Import notices
//!
//! Every pipeline reports what it did through `Notices`: each notice is
//! logged when it is raised and kept so the caller can inspect or summarize
//! the run afterwards. Message wording is stable; operators grep for it.

use crate::core::gene::CanonicalGene;
use log::{info, warn};

/// Logged for every gene id the store already holds
pub const ALREADY_IN_TABLE: &str = "Gene is already in table. Updates are not allowed. \
If you need to update the `gene` table, please remove all studies first and empty the `gene` table.";

/// Category of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeKind {
    /// Gene id already present in the store
    AlreadyInTable,
    /// Gene added under its official symbol
    AddedOfficial,
    /// Gene added under a provisional symbol
    AddedProvisional,
    /// Provisional symbol is the official symbol of another gene
    OfficialElsewhere,
    /// Several genes share one symbol
    DuplicateSymbol,
    /// Feature identifier appears in more than one group
    DoubleInInput,
    /// Symbol missing from the store or ambiguous
    NotFound,
    /// End-of-pipeline counts
    Summary,
}

impl NoticeKind {
    /// Informational notices are logged at info level, the rest as warnings
    pub fn is_warning(&self) -> bool {
        !matches!(
            self,
            NoticeKind::AddedOfficial | NoticeKind::AddedProvisional | NoticeKind::Summary
        )
    }
}

/// A single logged message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

/// Ordered notices of one pipeline run
#[derive(Debug, Clone, Default)]
pub struct Notices {
    entries: Vec<Notice>,
}

impl Notices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log and keep a notice
    pub fn push(&mut self, kind: NoticeKind, message: impl Into<String>) {
        let message = message.into();
        if kind.is_warning() {
            warn!("{}", message);
        } else {
            info!("{}", message);
        }
        self.entries.push(Notice { kind, message });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of notices of one kind
    pub fn count(&self, kind: NoticeKind) -> usize {
        self.entries.iter().filter(|n| n.kind == kind).count()
    }

    /// Notices logged at warning level
    pub fn warnings(&self) -> impl Iterator<Item = &Notice> {
        self.entries.iter().filter(|n| n.kind.is_warning())
    }

    /// Report a symbol shared by several genes; none of them is imported
    pub fn duplicate_symbol<'a>(
        &mut self,
        symbol: &str,
        genes: impl IntoIterator<Item = &'a CanonicalGene>,
        official: bool,
    ) {
        let mut message = format!(
            "More than 1 gene has the same ({}) symbol {}:",
            if official { "official" } else { "unofficial" },
            symbol
        );
        for gene in genes {
            message.push_str(&format!(" {}. Ignore...", gene.gene_id));
        }
        self.push(NoticeKind::DuplicateSymbol, message);
    }
}

/// Truncate a preview string to `limit` characters, appending `...`
pub fn truncate_preview(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_duplicate_symbol_message() {
        let genes = vec![
            CanonicalGene::new(10, "ABC", BTreeSet::new()),
            CanonicalGene::new(20, "ABC", BTreeSet::new()),
        ];
        let mut notices = Notices::new();
        notices.duplicate_symbol("ABC", &genes, true);
        notices.duplicate_symbol("XYZ", &genes[..1], false);

        let messages: Vec<&str> = notices.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(
            messages[0],
            "More than 1 gene has the same (official) symbol ABC: 10. Ignore... 20. Ignore..."
        );
        assert_eq!(
            messages[1],
            "More than 1 gene has the same (unofficial) symbol XYZ: 10. Ignore..."
        );
        assert_eq!(notices.count(NoticeKind::DuplicateSymbol), 2);
    }

    #[test]
    fn test_warning_levels() {
        let mut notices = Notices::new();
        notices.push(NoticeKind::AddedOfficial, "New gene with official symbol added");
        notices.push(NoticeKind::AlreadyInTable, ALREADY_IN_TABLE);
        notices.push(NoticeKind::Summary, "done");
        assert_eq!(notices.len(), 3);
        assert_eq!(notices.warnings().count(), 1);
    }

    #[test]
    fn test_truncate_preview() {
        assert_eq!(truncate_preview("abcdef", 3), "abc...");
        assert_eq!(truncate_preview("abc", 3), "abc");
        assert_eq!(truncate_preview("", 3), "");
    }
}
