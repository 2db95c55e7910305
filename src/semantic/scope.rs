//! Lexical scope tracking for the collection walk
//!
//! BSL has exactly two variable scopes per document: the module level and one
//! level per method. The stack still generalizes to arbitrary depth so the
//! walk code stays uniform.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use super::model::{Symbol, case_fold};

/// A stack of flat name-to-symbol maps.
///
/// Lookup walks from the innermost frame outward, so method locals and
/// parameters shadow module variables of the same name.
#[derive(Debug, Default)]
pub struct ScopeStack {
    frames: Vec<FxHashMap<SmolStr, Arc<Symbol>>>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self {
            frames: vec![FxHashMap::default()],
        }
    }

    pub fn push(&mut self) {
        self.frames.push(FxHashMap::default());
    }

    pub fn pop(&mut self) {
        // The module frame stays
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Bind a name in the innermost frame. Re-binding an existing name keeps
    /// the first symbol; in BSL a second assignment to the same variable is
    /// a use, not a new declaration.
    pub fn declare(&mut self, name: &str, symbol: Arc<Symbol>) -> bool {
        let key = case_fold(name);
        if let Some(frame) = self.frames.last_mut() {
            if frame.contains_key(&key) {
                return false;
            }
            frame.insert(key, symbol);
            true
        } else {
            false
        }
    }

    /// Innermost binding for a name, if any
    pub fn lookup(&self, name: &str) -> Option<&Arc<Symbol>> {
        let key = case_fold(name);
        self.frames.iter().rev().find_map(|frame| frame.get(&key))
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}
