//! UTF-8 iteration and Unicode category primitives used by every scanner and
//! parser in this crate. Callers must validate UTF-8 once at a public entry
//! point (`std::str::from_utf8` or equivalent); everything here assumes the
//! byte slice it is given is valid UTF-8 and that `i` sits on a code point
//! boundary.

use unicode_properties::{GeneralCategory, GeneralCategoryGroup, UnicodeGeneralCategory};

// Learned from: https://nullprogram.com/blog/2017/10/06/
#[rustfmt::skip]
static UTF8_LENGTH_LOOKUP: [u8; 32] = [
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    0, 0, 0, 0, 0, 0, 0, 0, 2, 2, 2, 2, 3, 3, 4, 0,
];

/// Returns true iff `b` starts a UTF-8 code point, i.e. it is not a
/// continuation byte.
#[inline(always)]
pub fn is_utf8_leading_byte(b: u8) -> bool {
    b & 0xC0 != 0x80
}

#[inline(always)]
fn char_length_from_byte(byte: u8) -> usize {
    UTF8_LENGTH_LOOKUP[byte as usize >> 3] as usize
}

/// Decodes the code point starting at byte index `i` and returns it along
/// with the index of the next code point. `i` must be a valid code point
/// boundary within `bytes`.
#[inline]
pub fn next_code_point(bytes: &[u8], i: usize) -> (char, usize) {
    let len = char_length_from_byte(bytes[i]);
    // SAFETY: `bytes` is valid UTF-8 and `i` is a code point boundary, so the
    // `len` bytes starting at `i` are exactly one well-formed code point.
    let s = unsafe { std::str::from_utf8_unchecked(&bytes[i..i + len]) };
    let c = s.chars().next().unwrap_or('\0');
    (c, i + len)
}

/// Decodes the code point that ends just before byte index `i` and returns
/// the byte index where it starts. `i` must be a valid code point boundary
/// (or `bytes.len()`).
#[inline]
pub fn prev_code_point(bytes: &[u8], i: usize) -> usize {
    let mut start = i;
    loop {
        start -= 1;
        if is_utf8_leading_byte(bytes[start]) {
            return start;
        }
    }
}

/// Reads the code point immediately before byte index `i`, or `'\0'` if `i`
/// is at the start of the slice (used by lookbehind checks, which treat
/// start-of-input the same as a non-word separator).
pub fn char_before(bytes: &[u8], i: usize) -> char {
    if i == 0 {
        return '\0';
    }
    let start = prev_code_point(bytes, i);
    next_code_point(bytes, start).0
}

/// Reads the code point at byte index `i`, or `'\0'` if `i` is at or past the
/// end of the slice (used by lookahead checks for end-of-input).
pub fn char_at(bytes: &[u8], i: usize) -> char {
    if i >= bytes.len() {
        return '\0';
    }
    next_code_point(bytes, i).0
}

/// Number of UTF-16 code units a code point occupies: 1, or 2 for a
/// surrogate-pair-encoded supplementary character.
#[inline(always)]
pub fn utf16_units(cp: char) -> usize {
    if (cp as u32) < 0x10000 {
        1
    } else {
        2
    }
}

/// Total UTF-16 code unit length of a UTF-8 string.
pub fn utf16_len(text: &str) -> usize {
    text.chars().map(utf16_units).sum()
}

/// The coarse Unicode categories this engine distinguishes. `DecimalNumber`
/// is split out from the `Number` group because hashtag/word recognition
/// treats ASCII and other decimal digits specially but not Roman numerals or
/// fractions (which fall under plain `Number`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Letter,
    DecimalNumber,
    Number,
    Separator,
    Other,
}

/// Classifies a code point's general category per Unicode UAX #44.
pub fn category(cp: char) -> Category {
    if cp.general_category() == GeneralCategory::DecimalNumber {
        return Category::DecimalNumber;
    }
    match cp.general_category_group() {
        GeneralCategoryGroup::Letter => Category::Letter,
        GeneralCategoryGroup::Number => Category::Number,
        GeneralCategoryGroup::Separator => Category::Separator,
        _ => Category::Other,
    }
}

/// Zero-width non-joiner, treated as a word-ish character inside hashtags.
pub const ZWNJ: char = '\u{200C}';
/// Zero-width joiner, allowed inside URL user-data/domain segments.
pub const ZWJ: char = '\u{200D}';

/// Letter, DecimalNumber, Number, or `_`.
pub fn is_word_char(cp: char) -> bool {
    matches!(
        category(cp),
        Category::Letter | Category::DecimalNumber | Category::Number
    ) || cp == '_'
}

/// Letter, DecimalNumber, `_`, or ZWNJ — the character set accepted inside a
/// `#tag` body.
pub fn is_hashtag_letter(cp: char) -> bool {
    matches!(category(cp), Category::Letter | Category::DecimalNumber) || cp == '_' || cp == ZWNJ
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_round_trip() {
        let bytes = "a\u{1F980}b".as_bytes();
        let (c0, i1) = next_code_point(bytes, 0);
        assert_eq!(c0, 'a');
        let (c1, i2) = next_code_point(bytes, i1);
        assert_eq!(c1, '\u{1F980}');
        let (c2, i3) = next_code_point(bytes, i2);
        assert_eq!(c2, 'b');
        assert_eq!(i3, bytes.len());
        assert_eq!(prev_code_point(bytes, i3), i2);
        assert_eq!(prev_code_point(bytes, i2), i1);
        assert_eq!(prev_code_point(bytes, i1), 0);
    }

    #[test]
    fn utf16_units_surrogate_pair() {
        assert_eq!(utf16_units('a'), 1);
        assert_eq!(utf16_units('\u{1F980}'), 2);
    }

    #[test]
    fn word_and_hashtag_chars() {
        assert!(is_word_char('a'));
        assert!(is_word_char('9'));
        assert!(is_word_char('_'));
        assert!(!is_word_char(' '));
        assert!(is_hashtag_letter(ZWNJ));
        assert!(!is_hashtag_letter(ZWJ));
    }
}
