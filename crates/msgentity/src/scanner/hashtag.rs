use super::ByteSpan;
use crate::span::SpanKind;
use crate::unicode::{category, char_at, char_before, is_hashtag_letter, next_code_point, Category};

/// Scans for `#tag` hashtags. See SPEC_FULL.md §4.2.
pub fn scan(bytes: &[u8]) -> Vec<ByteSpan> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'#' {
            i += 1;
            continue;
        }
        if is_hashtag_letter(char_before(bytes, i)) {
            i += 1;
            continue;
        }
        let tag_start = i + 1;
        let mut j = tag_start;
        let mut char_count = 0usize;
        let mut has_letter = false;
        let mut truncated_end = None;
        while j < bytes.len() {
            let (c, next) = next_code_point(bytes, j);
            if !is_hashtag_letter(c) {
                break;
            }
            char_count += 1;
            if category(c) == Category::Letter {
                has_letter = true;
            }
            if char_count == 255 {
                truncated_end = Some(next);
            }
            j = next;
        }
        if char_count == 0 || !has_letter {
            i = j.max(i + 1);
            continue;
        }
        if char_at(bytes, j) == '#' {
            i = j;
            continue;
        }
        let end = if char_count >= 256 {
            truncated_end.unwrap_or(j)
        } else {
            j
        };
        out.push(ByteSpan::new(SpanKind::Hashtag, i, end));
        i = j;
    }
    out
}
