//! Title canonicalization for prefix search.
//!
//! Method titles are stored in the host device's legacy charset, a mix of
//! one- and two-unit characters where a lead byte announces a two-unit
//! sequence. Search never looks at the raw text directly: every character
//! is first folded to one of 28 [`Symbol`]s, and both the on-disk ordering
//! and the pointer-table addressing are defined over those symbols.
//!
//! ```
//! use ccml::charset::{compare_search, CompareResult};
//!
//! assert_eq!(compare_search(b"cam", b"Cambridge Surprise"), CompareResult::Contained);
//! assert_eq!(compare_search(b"cam", b"Bristol Surprise"), CompareResult::BeforeKey);
//! ```

mod table;

use std::cmp::Ordering;

/// A canonical search symbol.
///
/// The discriminants define the sort order: anything unfoldable first, then
/// all digits (collapsed to one symbol), then the letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Symbol {
    Other = 0,
    Digit = 1,
    A = 2,
    B = 3,
    C = 4,
    D = 5,
    E = 6,
    F = 7,
    G = 8,
    H = 9,
    I = 10,
    J = 11,
    K = 12,
    L = 13,
    M = 14,
    N = 15,
    O = 16,
    P = 17,
    Q = 18,
    R = 19,
    S = 20,
    T = 21,
    U = 22,
    V = 23,
    W = 24,
    X = 25,
    Y = 26,
    Z = 27,
}

const LETTERS: [Symbol; 26] = {
    use Symbol::*;
    [
        A, B, C, D, E, F, G, H, I, J, K, L, M, N, O, P, Q, R, S, T, U, V, W, X, Y, Z,
    ]
};

impl Symbol {
    /// Size of the search alphabet
    pub const COUNT: usize = 28;

    /// Symbols that end a pointer-table descent
    pub const STOP_COUNT: u64 = 2;

    /// Symbols that continue a pointer-table descent
    pub const LETTER_COUNT: u64 = 26;

    /// Symbol for an ASCII uppercase letter. Callers guarantee `b'A'..=b'Z'`.
    fn from_ascii_upper(unit: u8) -> Symbol {
        LETTERS[usize::from(unit - b'A')]
    }

    #[inline]
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Whether this symbol terminates addressing (space-like or digit).
    #[inline]
    pub fn is_stop(self) -> bool {
        matches!(self, Symbol::Other | Symbol::Digit)
    }

    /// Zero-based letter position (A = 0), or `None` for stop symbols.
    pub fn letter_index(self) -> Option<u8> {
        if self.is_stop() {
            None
        } else {
            Some(self.index() - Symbol::STOP_COUNT as u8)
        }
    }

    /// Printable representative: space, `0`, or the uppercase letter.
    pub fn as_char(self) -> char {
        match self.letter_index() {
            Some(i) => char::from(b'A' + i),
            None if self == Symbol::Digit => '0',
            None => ' ',
        }
    }
}

/// Outcome of comparing a title against a search key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareResult {
    /// The title starts with the key.
    Contained,
    /// The title sorts before every title starting with the key.
    BeforeKey,
    /// The title sorts after every title starting with the key.
    AfterKey,
}

/// Lead bytes of the two-unit sequences.
#[inline]
pub fn is_lead_byte(unit: u8) -> bool {
    matches!(unit, 0x7f | 0xe5 | 0xe6 | 0xe7 | 0xf7 | 0xf9)
}

/// Width in code units of the character starting at `text[0]`.
///
/// A lead byte followed by the terminator (or nothing) counts as a single
/// unit so that a truncated sequence never swallows the terminator.
#[inline]
fn char_width(text: &[u8]) -> usize {
    match text {
        [lead, trail, ..] if is_lead_byte(*lead) && *trail != 0 => 2,
        _ => 1,
    }
}

/// Decode the next symbol from raw title text.
///
/// Returns the symbol and the number of code units consumed, or `None` at
/// the terminator or the end of the slice.
pub fn decode_symbol(text: &[u8]) -> Option<(Symbol, usize)> {
    let first = *text.first()?;
    if first == 0 {
        return None;
    }
    if char_width(text) == 2 {
        Some((table::double(first, text[1]), 2))
    } else if is_lead_byte(first) {
        Some((Symbol::Other, 1))
    } else {
        Some((table::single(first), 1))
    }
}

/// Iterator over the canonical symbols of a title.
#[derive(Debug, Clone)]
pub struct Symbols<'a> {
    text: &'a [u8],
}

impl<'a> Iterator for Symbols<'a> {
    type Item = Symbol;

    fn next(&mut self) -> Option<Symbol> {
        let (symbol, consumed) = decode_symbol(self.text)?;
        self.text = &self.text[consumed..];
        Some(symbol)
    }
}

/// Canonical symbol stream of `text`, ending at its terminator.
pub fn symbols(text: &[u8]) -> Symbols<'_> {
    Symbols { text }
}

/// Compare a title against a search key, symbol by symbol.
pub fn compare_search(key: &[u8], text: &[u8]) -> CompareResult {
    let mut key = symbols(key);
    let mut text = symbols(text);
    loop {
        let Some(k) = key.next() else {
            return CompareResult::Contained;
        };
        match text.next() {
            None => return CompareResult::BeforeKey,
            Some(t) if t < k => return CompareResult::BeforeKey,
            Some(t) if t > k => return CompareResult::AfterKey,
            Some(_) => {}
        }
    }
}

/// Bytes at the front of `text` whose symbols agree with the start of `key`.
pub fn matched_prefix_len(key: &[u8], text: &[u8]) -> usize {
    let mut key = symbols(key);
    let mut pos = 0;
    while let (Some(k), Some((t, width))) = (key.next(), decode_symbol(&text[pos..])) {
        if k != t {
            break;
        }
        pos += width;
    }
    pos
}

/// Total order of titles in a database file.
///
/// Shorter titles sort before longer ones that extend them.
pub fn canonical_cmp(a: &[u8], b: &[u8]) -> Ordering {
    symbols(a).cmp(symbols(b))
}

/// The part of `text` before its terminator (all of it if there is none).
pub fn until_terminator(text: &[u8]) -> &[u8] {
    match memchr::memchr(0, text) {
        Some(end) => &text[..end],
        None => text,
    }
}

/// Byte and character extent of a stretch of legacy text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CharCount {
    pub bytes: usize,
    pub characters: usize,
}

/// Longest prefix of `text` holding at most `max_chars` characters in at
/// most `max_bytes` bytes, never splitting a two-unit character.
pub fn truncate_title(text: &[u8], max_chars: usize, max_bytes: usize) -> (&[u8], CharCount) {
    let text = until_terminator(text);
    let mut count = CharCount::default();
    while count.characters < max_chars && count.bytes < text.len() {
        let width = char_width(&text[count.bytes..]);
        if count.bytes + width > max_bytes {
            break;
        }
        count.bytes += width;
        count.characters += 1;
    }
    (&text[..count.bytes], count)
}

/// Number of characters in `text` up to its terminator.
pub fn char_count(text: &[u8]) -> usize {
    truncate_title(text, usize::MAX, usize::MAX).1.characters
}

/// Lossy terminal rendering of a legacy title.
///
/// Printable ASCII passes through; every other character, one- or two-unit,
/// becomes a single replacement character.
pub fn display_title(text: &[u8]) -> String {
    let text = until_terminator(text);
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    while pos < text.len() {
        let width = char_width(&text[pos..]);
        match text[pos] {
            unit @ 0x20..=0x7e if width == 1 => out.push(char::from(unit)),
            _ => out.push(char::REPLACEMENT_CHARACTER),
        }
        pos += width;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_collapse() {
        for digit in b'0'..=b'9' {
            assert_eq!(decode_symbol(&[digit]), Some((Symbol::Digit, 1)));
        }
        assert_eq!(canonical_cmp(b"1B", b"9B"), Ordering::Equal);
        assert_eq!(compare_search(b"2", b"1st Method"), CompareResult::Contained);
    }

    #[test]
    fn test_letters_fold_case() {
        assert_eq!(decode_symbol(b"a"), Some((Symbol::A, 1)));
        assert_eq!(decode_symbol(b"Z"), Some((Symbol::Z, 1)));
        assert_eq!(symbols(b"Bob").collect::<Vec<_>>(), vec![Symbol::B, Symbol::O, Symbol::B]);
    }

    #[test]
    fn test_terminator_ends_stream() {
        assert_eq!(decode_symbol(b""), None);
        assert_eq!(decode_symbol(b"\0abc"), None);
        assert_eq!(symbols(b"ab\0cd").count(), 2);
    }

    #[test]
    fn test_two_unit_sequences() {
        // A-grave, e-acute, subscript 3
        assert_eq!(decode_symbol(&[0xe5, 0x01]), Some((Symbol::A, 2)));
        assert_eq!(decode_symbol(&[0xe6, 0x0a]), Some((Symbol::E, 2)));
        assert_eq!(decode_symbol(&[0xe7, 0x33]), Some((Symbol::Digit, 2)));
        // Unknown trail still consumes both units
        assert_eq!(decode_symbol(&[0xf7, 0x41, b'B']), Some((Symbol::Other, 2)));
    }

    #[test]
    fn test_lead_before_terminator() {
        assert_eq!(decode_symbol(&[0xe5, 0x00]), Some((Symbol::Other, 1)));
        assert_eq!(decode_symbol(&[0xe5]), Some((Symbol::Other, 1)));
        assert_eq!(symbols(&[b'A', 0xe5, 0x00, b'B']).count(), 2);
    }

    #[test]
    fn test_punctuation_is_other() {
        assert_eq!(decode_symbol(b" "), Some((Symbol::Other, 1)));
        assert_eq!(decode_symbol(b"'"), Some((Symbol::Other, 1)));
        assert_eq!(canonical_cmp(b"St Clement's", b"St Clement s"), Ordering::Equal);
    }

    #[test]
    fn test_symbol_order() {
        assert!(Symbol::Other < Symbol::Digit);
        assert!(Symbol::Digit < Symbol::A);
        assert!(Symbol::Y < Symbol::Z);
        assert_eq!(Symbol::Z.letter_index(), Some(25));
        assert_eq!(Symbol::Digit.letter_index(), None);
        assert_eq!(Symbol::Q.as_char(), 'Q');
    }

    #[test]
    fn test_compare_search() {
        assert_eq!(compare_search(b"", b"Anything"), CompareResult::Contained);
        assert_eq!(compare_search(b"AB", b"ab"), CompareResult::Contained);
        assert_eq!(compare_search(b"AB", b"A"), CompareResult::BeforeKey);
        assert_eq!(compare_search(b"AB", b"AA"), CompareResult::BeforeKey);
        assert_eq!(compare_search(b"AB", b"AC"), CompareResult::AfterKey);
        assert_eq!(compare_search(b"ZZ", b"AB"), CompareResult::BeforeKey);
        assert_eq!(compare_search(b"A B", b"A1"), CompareResult::AfterKey);
    }

    #[test]
    fn test_canonical_cmp_prefix_first() {
        assert_eq!(canonical_cmp(b"Bob", b"Bob Minor"), Ordering::Less);
        assert_eq!(canonical_cmp(b"Bob Minor", b"Bob"), Ordering::Greater);
        assert_eq!(canonical_cmp(b"Bob Minor", b"Bobs"), Ordering::Less);
        assert_eq!(canonical_cmp(b"bob", b"BOB"), Ordering::Equal);
    }

    #[test]
    fn test_truncate_title() {
        let title = [b'A', 0xe5, 0x01, b'B', 0];
        let (head, count) = truncate_title(&title, 2, 16);
        assert_eq!(head, &[b'A', 0xe5, 0x01]);
        assert_eq!(count, CharCount { bytes: 3, characters: 2 });

        // Byte limit falls inside the two-unit character
        let (head, count) = truncate_title(&title, 10, 2);
        assert_eq!(head, b"A");
        assert_eq!(count, CharCount { bytes: 1, characters: 1 });

        assert_eq!(char_count(&title), 3);
    }

    #[test]
    fn test_display_title() {
        assert_eq!(display_title(b"Plain Bob\0junk"), "Plain Bob");
        assert_eq!(display_title(&[b'S', 0xe5, 0x13, b'n']), "S\u{fffd}n");
        assert_eq!(display_title(&[0x1a]), "\u{fffd}");
    }

    #[test]
    fn test_matched_prefix_len() {
        assert_eq!(matched_prefix_len(b"camb", b"Cambridge"), 4);
        assert_eq!(matched_prefix_len(b"", b"Cambridge"), 0);
        assert_eq!(matched_prefix_len(b"Cax", b"Cambridge"), 2);
        assert_eq!(matched_prefix_len(b"Cambridge Major", b"Cambridge"), 9);
        // Two-unit characters count both units
        assert_eq!(matched_prefix_len(b"SO", &[b'S', 0xe5, 0xa2, b'n']), 3);
    }

    #[test]
    fn test_until_terminator() {
        assert_eq!(until_terminator(b"abc\0def"), b"abc");
        assert_eq!(until_terminator(b"abc"), b"abc");
    }
}
