//! Text manipulation utilities for working with source code.

/// Check if a character is considered part of a word (identifier).
///
/// Uses Unicode Standard Annex #31 rules for identifier characters, which
/// covers both Latin and Cyrillic identifiers.
#[inline]
pub fn is_word_character(c: char) -> bool {
    unicode_ident::is_xid_continue(c)
}

/// Find the boundaries of a word at the given position.
///
/// Returns `Some((start, end))` where `start` is the character index of the word start
/// and `end` is the character index after the last word character.
/// Returns `None` if there is no word at the position.
pub fn find_word_boundaries(chars: &[char], position: usize) -> Option<(usize, usize)> {
    if position >= chars.len() {
        return None;
    }

    if !is_word_character(chars[position]) {
        return None;
    }

    let mut start = position;
    while start > 0 && is_word_character(chars[start - 1]) {
        start -= 1;
    }

    let mut end = position;
    while end < chars.len() && is_word_character(chars[end]) {
        end += 1;
    }

    Some((start, end))
}

/// Extract the word (identifier) at the cursor position in a line of text.
///
/// Returns the word as a `String`, or `None` if there is no word at the position.
///
/// # Example
/// ```
/// use bsl_sema::core::text_utils::extract_word_at_cursor;
///
/// let line = "Результат = Слагаемое1";
/// assert_eq!(extract_word_at_cursor(line, 2), Some("Результат".to_string()));
/// assert_eq!(extract_word_at_cursor(line, 12), Some("Слагаемое1".to_string()));
/// assert_eq!(extract_word_at_cursor(line, 10), None); // equals sign
/// ```
pub fn extract_word_at_cursor(line: &str, position: usize) -> Option<String> {
    let chars: Vec<char> = line.chars().collect();

    if position >= chars.len() {
        return None;
    }

    let (start, end) = find_word_boundaries(&chars, position)?;

    Some(chars[start..end].iter().collect())
}

/// Check if a character is part of a dotted access path (identifier or `.`).
#[inline]
fn is_dotted_name_character(c: char) -> bool {
    is_word_character(c) || c == '.'
}

/// Extract the dotted access path at the cursor position in a line of text.
///
/// This extracts names that contain a `.` separator, like `Module.Method`.
/// Returns `None` if there is no dotted path at the position.
///
/// # Example
/// ```
/// use bsl_sema::core::text_utils::extract_dotted_name_at_cursor;
///
/// let line = "Сумма = ОбщийМодуль.Сложить(А, Б);";
/// assert_eq!(
///     extract_dotted_name_at_cursor(line, 10),
///     Some("ОбщийМодуль.Сложить".to_string())
/// );
/// ```
pub fn extract_dotted_name_at_cursor(line: &str, position: usize) -> Option<String> {
    let chars: Vec<char> = line.chars().collect();

    if position >= chars.len() || !is_dotted_name_character(chars[position]) {
        return None;
    }

    let mut start = position;
    while start > 0 && is_dotted_name_character(chars[start - 1]) {
        start -= 1;
    }

    let mut end = position;
    while end < chars.len() && is_dotted_name_character(chars[end]) {
        end += 1;
    }

    let result: String = chars[start..end].iter().collect();

    // A bare word is not a dotted path; trailing or leading dots are noise
    // from surrounding punctuation.
    let trimmed = result.trim_matches('.');
    trimmed.contains('.').then(|| trimmed.to_string())
}
