//! `fix_formatted_text` (§4.7): the sanitizer and finalizer every caller
//! runs before sending or storing a message. Validates UTF-8, resolves span
//! nesting, strips control characters while re-mapping span offsets in
//! lock-step, trims, truncates, and optionally re-runs the entity scanners.

use bitflags::bitflags;

use crate::algebra::{merge_user_detected, normalize_disjoint, normalize_nested};
use crate::byte_lookup::{is_control_deleted, is_control_space_replaced};
use crate::error::{Error, Result};
use crate::scanner;
use crate::span::{sort_spans, utf16_slice, FormattedText, Span, MAX_TEXT_BYTES};
use crate::unicode::{next_code_point, utf16_len, utf16_units};

/// U+2028–U+202E: line/paragraph separators and bidi control marks, deleted
/// outright (not part of `byte_lookup`'s ASCII-only control tables).
fn is_deleted_line_control(c: char) -> bool {
    matches!(c as u32, 0x2028..=0x202E)
}

/// Combining marks this client strips to defeat zalgo-style rendering abuse.
fn is_deleted_combining_mark(c: char) -> bool {
    matches!(c, '\u{0333}' | '\u{033F}' | '\u{030A}')
}

bitflags! {
    /// Options controlling `fix_formatted_text` (§4.7).
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FixFlags: u8 {
        /// Accept an all-whitespace or fully-trimmed-away result instead of
        /// returning `Error::Empty`.
        const ALLOW_EMPTY = 1;
        /// Skip the final rescan step: don't run the plain-text scanners
        /// over the sanitized text to pick up newly-formed entities.
        const SKIP_NEW_ENTITIES = 1 << 1;
        /// Passed through to the rescan's `find_entities` call; suppresses
        /// `/command` recognition.
        const SKIP_BOT_COMMANDS = 1 << 2;
        /// Skip the trailing/leading whitespace trim (drafts keep it as
        /// typed).
        const FOR_DRAFT = 1 << 3;
    }
}

struct SanitizeResult {
    text: String,
    spans: Vec<Span>,
}

/// Step 3: the interleaved sanitize + offset re-map pass (§4.7).
fn sanitize_and_remap(text: &str, spans: Vec<Span>) -> Result<SanitizeResult> {
    let bytes = text.as_bytes();
    let mut sorted = spans;
    sort_spans(&mut sorted);
    let mut pending = sorted.into_iter().peekable();

    struct Open {
        span: Span,
        adjusted_offset: i64,
    }
    let mut stack: Vec<Open> = Vec::new();
    let mut finished: Vec<Span> = Vec::new();

    let mut out = String::new();
    let mut utf16_cursor: i64 = 0;
    let mut utf16_skipped: i64 = 0;
    let mut byte_pos = 0usize;

    loop {
        while let Some(top) = stack.last() {
            if top.span.end() == utf16_cursor {
                let open = stack.pop().unwrap();
                let length = utf16_cursor - utf16_skipped - open.adjusted_offset;
                let mut span = open.span;
                span.offset = open.adjusted_offset;
                span.length = length;
                finished.push(span);
            } else {
                break;
            }
        }
        while pending.peek().is_some_and(|s| s.offset == utf16_cursor) {
            let span = pending.next().unwrap();
            stack.push(Open { span, adjusted_offset: utf16_cursor - utf16_skipped });
        }

        if byte_pos >= bytes.len() {
            break;
        }
        let (c, next) = next_code_point(bytes, byte_pos);
        let units = utf16_units(c) as i64;
        if units == 2 {
            let mid = utf16_cursor + 1;
            let hits_mid = stack.iter().any(|o| o.span.end() == mid)
                || pending.peek().is_some_and(|s| s.offset == mid);
            if hits_mid {
                return Err(Error::SpanInsideSurrogate { offset: mid, byte_pos });
            }
        }

        if c.is_ascii() && is_control_space_replaced(c as u8) {
            out.push(' ');
        } else if (c.is_ascii() && is_control_deleted(c as u8))
            || is_deleted_line_control(c)
            || is_deleted_combining_mark(c)
        {
            utf16_skipped += units;
        } else {
            out.push(c);
        }
        utf16_cursor += units;
        byte_pos = next;
    }

    // Spans positioned past the end of the text never open (or open but
    // never close) and so never get adjusted coordinates; surface them
    // unadjusted so the offset check below can still reject them.
    for open in stack {
        finished.push(open.span);
    }
    for span in pending {
        finished.push(span);
    }

    Ok(SanitizeResult { text: out, spans: finished })
}

/// Sanitizes and finalizes `text`/`spans` per §4.7. `text` is raw bytes
/// since this is the one entry point expected to see not-yet-validated
/// input straight off the wire.
pub fn fix_formatted_text(text: &[u8], spans: Vec<Span>, flags: FixFlags) -> Result<FormattedText> {
    let text = std::str::from_utf8(text).map_err(|_| Error::InvalidUtf8)?;

    let nested = normalize_nested(&spans);
    let SanitizeResult { text, mut spans } = sanitize_and_remap(text, nested)?;

    spans.retain(|span| {
        let content = utf16_slice(&text, span.offset, span.length);
        let whitespace_only = !content.is_empty() && content.chars().all(char::is_whitespace);
        !whitespace_only || (span.kind.is_hidden_data() && content.contains(' '))
    });

    let total_len = utf16_len(&text) as i64;
    for span in &spans {
        if span.offset > total_len {
            return Err(Error::SpanPastEnd { offset: span.offset });
        }
    }

    sort_spans(&mut spans);

    let mut text = text;
    if !flags.contains(FixFlags::FOR_DRAFT) {
        let trimmed_end = text.trim_end_matches(char::is_whitespace);
        let new_len = utf16_len(trimmed_end) as i64;
        if new_len < utf16_len(&text) as i64 {
            text = trimmed_end.to_string();
        }
        spans.retain_mut(|span| {
            if span.end() <= new_len {
                return true;
            }
            if span.offset >= new_len {
                return false;
            }
            span.length = new_len - span.offset;
            true
        });

        let first_span_offset = spans.first().map(|s| s.offset).unwrap_or(total_len);
        let mut leading_units = 0i64;
        for c in text.chars() {
            if leading_units >= first_span_offset || (c != ' ' && c != '\n') {
                break;
            }
            leading_units += utf16_units(c) as i64;
        }
        if leading_units > 0 {
            let trimmed = utf16_slice(&text, leading_units, i64::MAX).to_string();
            text = trimmed;
            for span in &mut spans {
                span.offset -= leading_units;
            }
        }
    }

    if !flags.contains(FixFlags::ALLOW_EMPTY) && text.is_empty() {
        return Err(Error::Empty);
    }

    if text.len() > MAX_TEXT_BYTES {
        let mut boundary = MAX_TEXT_BYTES;
        while boundary > 0 && !text.is_char_boundary(boundary) {
            boundary -= 1;
        }
        let new_len = utf16_len(&text[..boundary]) as i64;
        text.truncate(boundary);
        spans.retain_mut(|span| {
            if span.offset >= new_len {
                return false;
            }
            span.length = span.length.min(new_len - span.offset);
            true
        });
    }

    if !flags.contains(FixFlags::SKIP_NEW_ENTITIES) {
        let auto = scanner::find_entities(&text, flags.contains(FixFlags::SKIP_BOT_COMMANDS), false);
        let auto = normalize_disjoint(&auto);
        spans = merge_user_detected(&spans, &auto);
    }

    sort_spans(&mut spans);
    Ok(FormattedText { text, spans })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::SpanKind;

    fn fix(text: &str, spans: Vec<Span>, flags: FixFlags) -> Result<FormattedText> {
        fix_formatted_text(text.as_bytes(), spans, flags)
    }

    #[test]
    fn trims_and_deletes_carriage_return() {
        let ft = fix("  hi\r\nthere  ", vec![], FixFlags::empty()).unwrap();
        assert_eq!(ft.text, "hi\nthere");
        assert_eq!(ft.spans, vec![]);
    }

    #[test]
    fn control_codes_become_spaces() {
        let ft = fix("a\x01b", vec![], FixFlags::ALLOW_EMPTY).unwrap();
        assert_eq!(ft.text, "a b");
    }

    #[test]
    fn span_offsets_survive_deletion_before_them() {
        let spans = vec![Span::new(SpanKind::Bold, 3, 4)];
        let ft = fix("ab\rcdef", spans, FixFlags::ALLOW_EMPTY | FixFlags::FOR_DRAFT).unwrap();
        assert_eq!(ft.text, "abcdef");
        assert_eq!(ft.spans.len(), 1);
        assert_eq!(ft.spans[0].offset, 2);
        assert_eq!(ft.spans[0].length, 4);
    }

    #[test]
    fn whitespace_only_span_dropped_unless_hidden_data() {
        let spans = vec![
            Span::new(SpanKind::Bold, 0, 2),
            Span::new(SpanKind::TextUrl, 0, 2).with_argument("https://example.com"),
        ];
        let ft = fix("  ", spans, FixFlags::ALLOW_EMPTY | FixFlags::FOR_DRAFT).unwrap();
        let kinds: Vec<SpanKind> = ft.spans.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![SpanKind::TextUrl]);
    }

    #[test]
    fn empty_text_fails_without_allow_empty() {
        let err = fix("", vec![], FixFlags::default()).unwrap_err();
        assert_eq!(err, Error::Empty);
    }

    #[test]
    fn empty_text_allowed_with_flag() {
        let ft = fix("", vec![], FixFlags::ALLOW_EMPTY).unwrap();
        assert_eq!(ft.text, "");
    }

    #[test]
    fn span_past_end_is_rejected() {
        let spans = vec![Span::new(SpanKind::Bold, 100, 4)];
        let err = fix("short", spans, FixFlags::ALLOW_EMPTY).unwrap_err();
        assert_eq!(err, Error::SpanPastEnd { offset: 100 });
    }

    #[test]
    fn new_entities_are_scanned_and_merged() {
        let ft = fix(
            "see https://example.com now",
            vec![],
            FixFlags::ALLOW_EMPTY | FixFlags::FOR_DRAFT,
        )
        .unwrap();
        assert_eq!(ft.spans.len(), 1);
        assert_eq!(ft.spans[0].kind, SpanKind::Url);
    }

    #[test]
    fn skip_new_entities_suppresses_scan() {
        let ft = fix(
            "see https://example.com now",
            vec![],
            FixFlags::ALLOW_EMPTY | FixFlags::FOR_DRAFT | FixFlags::SKIP_NEW_ENTITIES,
        )
        .unwrap();
        assert_eq!(ft.spans.len(), 0);
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let err = fix_formatted_text(&[0xFF, 0xFE], vec![], FixFlags::ALLOW_EMPTY).unwrap_err();
        assert_eq!(err, Error::InvalidUtf8);
    }
}
