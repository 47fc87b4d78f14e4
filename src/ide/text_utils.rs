//! Text manipulation utilities for working with source code.

use crate::base::{TextRange, TextSize};

/// Check if a character is considered part of a word (identifier).
///
/// Uses Unicode Standard Annex #31 rules for identifier characters, plus `$`
/// which Pkl allows in identifiers.
#[inline]
pub fn is_word_character(c: char) -> bool {
    unicode_ident::is_xid_continue(c) || c == '$'
}

/// Byte offset where the identifier ending at `offset` starts.
///
/// Returns `offset` itself when the character before it is not part of a word.
pub fn word_start(text: &str, offset: usize) -> usize {
    let offset = offset.min(text.len());
    text[..offset]
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_word_character(*c))
        .last()
        .map_or(offset, |(i, _)| i)
}

/// Range of the identifier touching `offset`, on either side of it.
///
/// # Example
/// ```
/// use pklsem::ide::text_utils::word_range_at;
/// use pklsem::base::{TextRange, TextSize};
///
/// let text = "foo = bar";
/// assert_eq!(word_range_at(text, TextSize::from(7)), Some(TextRange::new(6.into(), 9.into())));
/// assert_eq!(word_range_at(text, TextSize::from(4)), None);
/// ```
pub fn word_range_at(text: &str, offset: TextSize) -> Option<TextRange> {
    let offset = usize::from(offset);
    if offset > text.len() || !text.is_char_boundary(offset) {
        return None;
    }
    let start = word_start(text, offset);
    let end = text[offset..]
        .char_indices()
        .find(|(_, c)| !is_word_character(*c))
        .map_or(text.len(), |(i, _)| offset + i);
    (start < end).then(|| TextRange::new(to_size(start), to_size(end)))
}

/// Offset of the `.` (or the `.` of `?.`) directly before the identifier being
/// typed at `offset`, if the cursor is completing a member.
pub fn member_dot_before(text: &str, offset: TextSize) -> Option<TextSize> {
    let offset = usize::from(offset);
    if offset > text.len() || !text.is_char_boundary(offset) {
        return None;
    }
    let start = word_start(text, offset);
    let before = &text[..start];
    if !before.ends_with('.') || before.ends_with("..") {
        return None;
    }
    Some(to_size(start - 1))
}

fn to_size(offset: usize) -> TextSize {
    TextSize::try_from(offset).unwrap_or(TextSize::from(u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_start() {
        assert_eq!(word_start("a = foo", 7), 4);
        assert_eq!(word_start("a = foo", 5), 4);
        assert_eq!(word_start("a = ", 4), 4);
        assert_eq!(word_start("$x", 2), 0);
    }

    #[test]
    fn test_member_dot_before() {
        assert_eq!(member_dot_before("x = p.na", TextSize::from(8)), Some(TextSize::from(5)));
        assert_eq!(member_dot_before("x = p?.", TextSize::from(7)), Some(TextSize::from(6)));
        assert_eq!(member_dot_before("x = na", TextSize::from(6)), None);
        assert_eq!(member_dot_before("x = ...y", TextSize::from(8)), None);
    }

    #[test]
    fn test_word_range_out_of_bounds() {
        assert_eq!(word_range_at("ab", TextSize::from(10)), None);
        assert_eq!(word_range_at("ab", TextSize::from(2)), Some(TextRange::new(0.into(), 2.into())));
    }
}
