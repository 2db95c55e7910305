//! Bidirectional occurrence index
//!
//! Stores every recorded occurrence twice: keyed by symbol for "find all
//! references" and keyed by file for per-document queries and cleanup on
//! rebuild. Both views hold the same occurrences; sets keep recording
//! idempotent and iteration in canonical order.

use std::collections::BTreeSet;
use std::sync::Arc;

use dashmap::DashMap;

use crate::base::{Position, Uri};
use crate::semantic::model::{Symbol, SymbolOccurrence};

#[derive(Debug, Default)]
pub struct ReferenceIndex {
    by_symbol: DashMap<Arc<Symbol>, BTreeSet<SymbolOccurrence>>,
    by_file: DashMap<Uri, BTreeSet<SymbolOccurrence>>,
}

impl ReferenceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence in both views. Recording the same occurrence
    /// twice leaves the index unchanged.
    pub fn record(&self, occurrence: SymbolOccurrence) {
        self.by_file
            .entry(occurrence.location.uri.clone())
            .or_default()
            .insert(occurrence.clone());
        self.by_symbol
            .entry(occurrence.symbol.clone())
            .or_default()
            .insert(occurrence);
    }

    /// Remove every occurrence recorded for a file. Called before a document
    /// is reindexed so stale occurrences never survive a rebuild.
    pub fn delete_by_file(&self, uri: &Uri) {
        let Some((_, occurrences)) = self.by_file.remove(uri) else {
            return;
        };
        for occurrence in &occurrences {
            self.remove_from_symbol_view(occurrence);
        }
    }

    /// Remove a specific set of occurrences. Absent occurrences are a
    /// silent no-op.
    pub fn delete_occurrences(&self, occurrences: &[SymbolOccurrence]) {
        for occurrence in occurrences {
            let mut file_empty = false;
            if let Some(mut entry) = self.by_file.get_mut(&occurrence.location.uri) {
                entry.remove(occurrence);
                file_empty = entry.is_empty();
            }
            if file_empty {
                self.by_file
                    .remove_if(&occurrence.location.uri, |_, set| set.is_empty());
            }
            self.remove_from_symbol_view(occurrence);
        }
    }

    fn remove_from_symbol_view(&self, occurrence: &SymbolOccurrence) {
        let mut now_empty = false;
        if let Some(mut entry) = self.by_symbol.get_mut(&occurrence.symbol) {
            entry.remove(occurrence);
            now_empty = entry.is_empty();
        }
        if now_empty {
            self.by_symbol
                .remove_if(&occurrence.symbol, |_, set| set.is_empty());
        }
    }

    /// All occurrences of a symbol across the workspace, in canonical order
    pub fn occurrences_of(&self, symbol: &Symbol) -> Vec<SymbolOccurrence> {
        self.by_symbol
            .get(symbol)
            .map(|entry| entry.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// All occurrences recorded for a file, in canonical order
    pub fn occurrences_in(&self, uri: &Uri) -> Vec<SymbolOccurrence> {
        self.by_file
            .get(uri)
            .map(|entry| entry.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// The occurrence whose range contains the position. Occurrences cover
    /// single name tokens and never overlap, so at most one matches.
    pub fn occurrence_at(&self, uri: &Uri, position: Position) -> Option<SymbolOccurrence> {
        self.by_file.get(uri).and_then(|entry| {
            entry
                .iter()
                .find(|occ| occ.location.range.contains(position))
                .cloned()
        })
    }

    pub fn symbol_count(&self) -> usize {
        self.by_symbol.len()
    }

    pub fn occurrence_count(&self) -> usize {
        self.by_file.iter().map(|entry| entry.value().len()).sum()
    }

    pub fn clear(&self) {
        self.by_symbol.clear();
        self.by_file.clear();
    }
}
