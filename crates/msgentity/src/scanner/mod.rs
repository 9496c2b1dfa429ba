//! Plain-text entity scanners (§4.2): mentions, hashtags, cashtags, bot
//! commands, URLs, and email addresses. Each submodule works over raw UTF-8
//! bytes and reports byte-offset spans; `find_entities` composes them,
//! resolves overlaps, and remaps to the UTF-16 offsets the rest of the crate
//! uses.

mod bot_command;
mod cashtag;
mod email;
mod hashtag;
mod mention;
mod tld;
mod url;
mod whitelist;

use crate::span::{sort_spans, Span, SpanKind};
use crate::unicode::{next_code_point, utf16_units};

/// A scanner hit expressed in byte offsets into the original UTF-8 text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteSpan {
    pub kind: SpanKind,
    pub start: usize,
    pub end: usize,
}

impl ByteSpan {
    pub fn new(kind: SpanKind, start: usize, end: usize) -> Self {
        ByteSpan { kind, start, end }
    }
}

/// Runs every plain-text scanner over `text`, resolves overlaps by earliest
/// start then longest match, and returns disjoint spans in UTF-16 offsets.
///
/// `skip_bot_commands` suppresses `/command` recognition (used when the
/// caller already knows the message is not addressed to a bot). `only_urls`
/// restricts the pass to URL/email recognition, used by `get_first_url`.
pub fn find_entities(text: &str, skip_bot_commands: bool, only_urls: bool) -> Vec<Span> {
    let bytes = text.as_bytes();
    let mut hits = if only_urls {
        url::scan(bytes)
    } else {
        let mut all = Vec::new();
        all.extend(mention::scan(bytes));
        all.extend(hashtag::scan(bytes));
        all.extend(cashtag::scan(bytes));
        if !skip_bot_commands {
            all.extend(bot_command::scan(bytes));
        }
        all.extend(url::scan(bytes));
        all
    };
    hits.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then((b.end - b.start).cmp(&(a.end - a.start)))
    });

    let mut disjoint: Vec<ByteSpan> = Vec::new();
    for hit in hits {
        if let Some(last) = disjoint.last() {
            if hit.start < last.end {
                continue;
            }
        }
        disjoint.push(hit);
    }

    let mut spans = byte_spans_to_utf16(text, &disjoint);
    sort_spans(&mut spans);
    spans
}

/// Converts non-overlapping, start-sorted `ByteSpan`s to UTF-16 `Span`s in a
/// single left-to-right pass over `text`.
pub(crate) fn byte_spans_to_utf16(text: &str, spans: &[ByteSpan]) -> Vec<Span> {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(spans.len());
    let mut spans = spans.iter().peekable();
    let mut byte_pos = 0usize;
    let mut utf16_pos = 0i64;
    let mut active: Option<(SpanKind, usize, i64)> = None;

    while byte_pos <= bytes.len() {
        if let Some(bs) = spans.peek() {
            if bs.start == byte_pos && active.is_none() {
                active = Some((bs.kind, bs.end, utf16_pos));
                spans.next();
            }
        }
        if let Some((kind, end, start_units)) = active {
            if end == byte_pos {
                out.push(Span::new(kind, start_units, utf16_pos - start_units));
                active = None;
                continue;
            }
        }
        if byte_pos == bytes.len() {
            break;
        }
        let (c, next) = next_code_point(bytes, byte_pos);
        utf16_pos += utf16_units(c) as i64;
        byte_pos = next;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composes_distinct_kinds() {
        let spans = find_entities("hi @world see #news https://example.com/x", false, false);
        let kinds: Vec<SpanKind> = spans.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![SpanKind::Mention, SpanKind::Hashtag, SpanKind::Url]);
    }

    #[test]
    fn bot_commands_skippable() {
        let with = find_entities("/start now", false, false);
        assert_eq!(with.len(), 1);
        let without = find_entities("/start now", true, false);
        assert_eq!(without.len(), 0);
    }

    #[test]
    fn only_urls_suppresses_other_kinds() {
        let spans = find_entities("@world https://example.com", false, true);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].kind, SpanKind::Url);
    }

    #[test]
    fn overlap_resolved_by_earliest_start() {
        // A bare "@a.b" could in principle be read as mention-then-url
        // fragments; the scanners must not emit overlapping hits, and if
        // they did, the earliest, highest-priority one wins.
        let spans = find_entities("contact user@mail.com now", false, false);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].kind, SpanKind::EmailAddress);
    }

    #[test]
    fn utf16_offsets_account_for_surrogate_pairs() {
        let spans = find_entities("\u{1F980}\u{1F980} @world", false, false);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].offset, 5); // two surrogate pairs + a space
    }
}
