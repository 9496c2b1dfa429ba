use super::whitelist::is_whitelisted_short_mention;
use super::ByteSpan;
use crate::span::SpanKind;
use crate::unicode::{char_at, char_before, is_word_char};

fn is_mention_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Scans for `@name` mentions. See SPEC_FULL.md §4.2.
pub fn scan(bytes: &[u8]) -> Vec<ByteSpan> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'@' {
            i += 1;
            continue;
        }
        if is_word_char(char_before(bytes, i)) {
            i += 1;
            continue;
        }
        let name_start = i + 1;
        let mut j = name_start;
        while j < bytes.len() && is_mention_char(bytes[j]) {
            j += 1;
        }
        let len = j - name_start;
        if !(2..=32).contains(&len) || is_word_char(char_at(bytes, j)) {
            i = j.max(i + 1);
            continue;
        }
        let name = std::str::from_utf8(&bytes[name_start..j]).unwrap_or("");
        if len <= 4 && !is_whitelisted_short_mention(name) {
            i = j;
            continue;
        }
        out.push(ByteSpan::new(SpanKind::Mention, i, j));
        i = j;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(bytes: &[u8]) -> Vec<(usize, usize)> {
        scan(bytes).into_iter().map(|s| (s.start, s.end)).collect()
    }

    #[test]
    fn basic_mention() {
        assert_eq!(names(b"hello @world!"), vec![(6, 12)]);
    }

    #[test]
    fn length_boundaries() {
        // "ab" is below the whitelist length and not itself whitelisted.
        assert_eq!(names(b"@ab"), vec![]);
        assert_eq!(names(b"@a"), vec![]);
        assert_eq!(names(format!("@{}", "a".repeat(32)).as_bytes()), vec![(0, 33)]);
        assert_eq!(names(format!("@{}", "a".repeat(33)).as_bytes()), vec![]);
    }

    #[test]
    fn short_whitelist() {
        assert_eq!(names(b"@vote"), vec![(0, 5)]);
        assert_eq!(names(b"@abcd"), vec![]);
    }

    #[test]
    fn not_after_word_char() {
        assert_eq!(names(b"foo@bar"), vec![]);
    }
}
