//! In-source diagnostic suppression markers
//!
//! `// sema:off` and `// sema:on` comments fence regions where diagnostics
//! are dropped, either for every rule or for one rule named after the
//! marker. Regions nest per rule, an `on` without a matching `off` is
//! ignored, and an unclosed `off` runs to the end of the file. An `off`
//! marker trailing a code line suppresses that line only.

use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;

use crate::base::LineIndex;
use crate::core::text_utils::is_word_character;
use crate::semantic::model::case_fold;
use crate::syntax::ast::{AstNode, SourceFile};
use crate::syntax::SyntaxKind;

/// Which rules a fenced region applies to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum SuppressionKey {
    All,
    Rule(SmolStr),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Directive {
    Off,
    On,
}

/// Suppressed line regions of one document, inclusive on both ends
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuppressionData {
    ranges: FxHashMap<SuppressionKey, Vec<(u32, u32)>>,
}

impl SuppressionData {
    /// Whether a diagnostic of `code` starting on `line` falls inside a
    /// suppressed region.
    pub fn is_suppressed(&self, code: &str, line: u32) -> bool {
        if self.ranges.is_empty() {
            return false;
        }
        let covers = |key: &SuppressionKey| {
            self.ranges
                .get(key)
                .is_some_and(|ranges| ranges.iter().any(|&(start, end)| start <= line && line <= end))
        };
        covers(&SuppressionKey::All) || covers(&SuppressionKey::Rule(case_fold(code)))
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

/// Scan the comments of a parsed document for suppression markers.
pub fn compute_suppressions(file: &SourceFile, text: &str, index: &LineIndex) -> SuppressionData {
    let mut code_lines: FxHashSet<u32> = FxHashSet::default();
    let mut comments = Vec::new();
    let mut last_line = 0;

    for element in file.syntax().descendants_with_tokens() {
        let Some(token) = element.into_token() else {
            continue;
        };
        let line = index.position(text, token.text_range().start()).line;
        last_line = last_line.max(index.position(text, token.text_range().end()).line);
        if token.kind() == SyntaxKind::LINE_COMMENT {
            comments.push((line, SmolStr::new(token.text())));
        } else if !token.kind().is_trivia() {
            code_lines.insert(line);
        }
    }

    let mut data = SuppressionData::default();
    let mut open: FxHashMap<SuppressionKey, Vec<u32>> = FxHashMap::default();

    for (line, comment) in comments {
        let Some((directive, key)) = parse_marker(&comment) else {
            continue;
        };
        match directive {
            Directive::Off if code_lines.contains(&line) => {
                // Trailing marker: just this line
                data.ranges.entry(key).or_default().push((line, line));
            }
            Directive::Off => {
                open.entry(key).or_default().push(line);
            }
            Directive::On => {
                if let Some(start) = open.get_mut(&key).and_then(Vec::pop) {
                    data.ranges.entry(key).or_default().push((start, line));
                }
            }
        }
    }

    // Whatever is still open runs to the end of the file
    for (key, starts) in open {
        let ranges = data.ranges.entry(key).or_default();
        for start in starts {
            ranges.push((start, last_line));
        }
    }

    data
}

/// Recognize `// sema:off [RuleId]` and `// sema:on [RuleId]`. Text after
/// the rule name is free-form commentary.
fn parse_marker(comment: &str) -> Option<(Directive, SuppressionKey)> {
    let content = comment.trim_start_matches('/').trim();
    let mut words = content.split_whitespace();

    let directive = match case_fold(words.next()?).as_str() {
        "sema:off" => Directive::Off,
        "sema:on" => Directive::On,
        _ => return None,
    };

    let key = match words.next() {
        Some(word) if word.chars().all(is_word_character) => {
            SuppressionKey::Rule(case_fold(word))
        }
        _ => SuppressionKey::All,
    };

    Some((directive, key))
}
