use super::ByteSpan;
use crate::span::SpanKind;
use crate::unicode::{char_at, char_before, is_hashtag_letter};

/// Scans for `$XYZ` cashtags. See SPEC_FULL.md §4.2.
pub fn scan(bytes: &[u8]) -> Vec<ByteSpan> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'$' {
            i += 1;
            continue;
        }
        let before = char_before(bytes, i);
        if is_hashtag_letter(before) || before == '$' {
            i += 1;
            continue;
        }
        let start = i + 1;
        let mut j = start;
        while j < bytes.len() && bytes[j].is_ascii_uppercase() {
            j += 1;
        }
        let len = j - start;
        if !(3..=8).contains(&len) {
            i = j.max(i + 1);
            continue;
        }
        let after = char_at(bytes, j);
        if is_hashtag_letter(after) || after == '$' {
            i = j.max(i + 1);
            continue;
        }
        out.push(ByteSpan::new(SpanKind::Cashtag, i, j));
        i = j;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(bytes: &[u8]) -> Vec<(usize, usize)> {
        scan(bytes).into_iter().map(|s| (s.start, s.end)).collect()
    }

    #[test]
    fn basic_cashtag() {
        assert_eq!(tags(b"buy $ABC now"), vec![(4, 8)]);
    }

    #[test]
    fn length_boundaries() {
        assert_eq!(tags(b"$AB"), vec![]);
        assert_eq!(tags(b"$ABC"), vec![(0, 4)]);
        assert_eq!(tags(b"$ABCDEFGH"), vec![(0, 9)]);
        assert_eq!(tags(b"$ABCDEFGHI"), vec![]);
    }

    #[test]
    fn lowercase_rejected() {
        assert_eq!(tags(b"$abc"), vec![]);
    }
}
