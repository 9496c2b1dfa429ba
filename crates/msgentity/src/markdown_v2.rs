//! Markdown-v2 parser (§4.4): the reserved-character dialect. Every ASCII
//! punctuation byte in `` _*[]()~`>#+-=|{}.!`` must be backslash-escaped to
//! appear literally, except inside a Code/Pre/PreCode region where only the
//! backtick is reserved. Spans nest on an explicit frame stack (§4.8).

use crate::byte_lookup::is_markdown_v2_reserved;
use crate::collaborators::{UrlChecker, UserResolver};
use crate::error::{Error, MarkupKind, Result};
use crate::span::{FormattedText, Span, SpanKind};
use crate::unicode::{next_code_point, utf16_len, utf16_units};

struct Frame {
    kind: SpanKind,
    entity_offset: i64,
    entity_byte_offset: usize,
    entity_begin_pos: usize,
}

fn markup_kind_of(kind: SpanKind) -> Option<MarkupKind> {
    match kind {
        SpanKind::Italic => Some(MarkupKind::Italic),
        SpanKind::Bold => Some(MarkupKind::Bold),
        SpanKind::Underline => Some(MarkupKind::Underline),
        SpanKind::Strikethrough => Some(MarkupKind::Strikethrough),
        SpanKind::Code => Some(MarkupKind::Code),
        _ => None,
    }
}

/// Reads the URL inside `[text](...)`, which (unlike the rest of the
/// document) allows backslash-escaping any ASCII byte up to 126. Returns the
/// decoded URL and the byte index just past the closing `)`.
fn read_link_url(bytes: &[u8], start: usize) -> Option<(String, usize)> {
    let mut j = start;
    let mut url = String::new();
    while j < bytes.len() {
        if bytes[j] == b'\\' && bytes.get(j + 1).is_some_and(|&b| b <= 126) {
            url.push(bytes[j + 1] as char);
            j += 2;
            continue;
        }
        if bytes[j] == b')' {
            return Some((url, j + 1));
        }
        let (c, next) = next_code_point(bytes, j);
        url.push(c);
        j = next;
    }
    None
}

/// Parses `text` as Markdown-v2, resolving `[text](url)` links through
/// `url_checker`/`user_resolver` (§6).
pub fn parse(
    text: &str,
    url_checker: &dyn UrlChecker,
    user_resolver: &dyn UserResolver,
) -> Result<FormattedText> {
    let bytes = text.as_bytes();
    let mut i = 0usize;
    let mut out = String::new();
    let mut spans: Vec<Span> = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();
    let mut utf16_cursor: i64 = 0;

    while i < bytes.len() {
        let b = bytes[i];
        let in_code = matches!(stack.last(), Some(f) if f.kind == SpanKind::Code);
        let is_reserved_here = if in_code { b == b'`' } else { b.is_ascii() && is_markdown_v2_reserved(b) };

        if b == b'\\' && bytes.get(i + 1).is_some_and(|&next| {
            if in_code { next == b'`' } else { next.is_ascii() && is_markdown_v2_reserved(next) }
        }) {
            out.push(bytes[i + 1] as char);
            utf16_cursor += 1;
            i += 2;
            continue;
        }

        if in_code {
            if b == b'`' {
                let frame = stack.pop().unwrap();
                if utf16_cursor > frame.entity_offset {
                    spans.push(Span::new(SpanKind::Code, frame.entity_offset, utf16_cursor - frame.entity_offset));
                }
                i += 1;
            } else {
                let (c, next) = next_code_point(bytes, i);
                out.push(c);
                utf16_cursor += utf16_units(c) as i64;
                i = next;
            }
            continue;
        }

        if b == b'`' && bytes.get(i + 1) == Some(&b'`') && bytes.get(i + 2) == Some(&b'`') {
            let fence_start = i;
            let mut j = i + 3;
            let lang_start = j;
            while j < bytes.len() && !matches!(bytes[j], b' ' | b'`' | b'\n') {
                j += 1;
            }
            let lang = text[lang_start..j].to_string();
            if bytes.get(j) == Some(&b'\n') {
                j += 1;
            }
            let content_start = j;
            let mut k = j;
            let closing = loop {
                if k + 3 > bytes.len() {
                    break None;
                }
                if &bytes[k..k + 3] == b"```" {
                    break Some(k);
                }
                k += 1;
            };
            let Some(close_at) = closing else {
                return Err(Error::InvalidMarkup { byte_offset: fence_start, kind: Some(MarkupKind::Pre) });
            };
            let content = &text[content_start..close_at];
            if !content.is_empty() {
                let kind = if lang.is_empty() { SpanKind::Pre } else { SpanKind::PreCode };
                let span = Span::new(kind, utf16_cursor, utf16_len(content) as i64);
                spans.push(if lang.is_empty() { span } else { span.with_argument(lang) });
                utf16_cursor += utf16_len(content) as i64;
            }
            out.push_str(content);
            i = close_at + 3;
            continue;
        }

        if !is_reserved_here {
            let (c, next) = next_code_point(bytes, i);
            out.push(c);
            utf16_cursor += utf16_units(c) as i64;
            i = next;
            continue;
        }

        match b {
            b'`' | b'*' | b'~' => {
                let kind = match b {
                    b'`' => SpanKind::Code,
                    b'*' => SpanKind::Bold,
                    _ => SpanKind::Strikethrough,
                };
                close_or_open(&mut stack, &mut spans, kind, &mut utf16_cursor, out.len(), i);
                i += 1;
            }
            b'_' => {
                let doubled = bytes.get(i + 1) == Some(&b'_');
                let kind = if doubled { SpanKind::Underline } else { SpanKind::Italic };
                close_or_open(&mut stack, &mut spans, kind, &mut utf16_cursor, out.len(), i);
                i += if doubled { 2 } else { 1 };
            }
            b'[' => {
                stack.push(Frame {
                    kind: SpanKind::TextUrl,
                    entity_offset: utf16_cursor,
                    entity_byte_offset: i,
                    entity_begin_pos: out.len(),
                });
                i += 1;
            }
            b']' if matches!(stack.last(), Some(f) if f.kind == SpanKind::TextUrl) => {
                let frame = stack.pop().unwrap();
                let link_text = out[frame.entity_begin_pos..].to_string();
                let mut j = i + 1;
                let raw_link = if bytes.get(j) == Some(&b'(') {
                    let Some((url, after)) = read_link_url(bytes, j + 1) else {
                        return Err(Error::InvalidMarkup { byte_offset: frame.entity_byte_offset, kind: Some(MarkupKind::Link) });
                    };
                    j = after;
                    url
                } else {
                    link_text
                };
                i = j;
                if utf16_cursor > frame.entity_offset {
                    if let Some(user_id) = user_resolver.resolve_user(&raw_link) {
                        spans.push(
                            Span::new(SpanKind::MentionName, frame.entity_offset, utf16_cursor - frame.entity_offset)
                                .with_user_id(user_id),
                        );
                    } else if let Ok(fixed) = url_checker.check_url(&raw_link) {
                        spans.push(
                            Span::new(SpanKind::TextUrl, frame.entity_offset, utf16_cursor - frame.entity_offset)
                                .with_argument(fixed),
                        );
                    }
                }
            }
            _ => return Err(Error::ReservedChar { char: b as char, byte_offset: i }),
        }
    }

    if let Some(frame) = stack.last() {
        return Err(Error::InvalidMarkup {
            byte_offset: frame.entity_byte_offset,
            kind: markup_kind_of(frame.kind),
        });
    }

    Ok(FormattedText::new(out, spans))
}

/// Shared push/pop for the single- or double-byte toggle delimiters
/// (Bold, Italic, Underline, Strikethrough, Code): closes the innermost
/// frame if its kind matches, else opens a new nested frame.
fn close_or_open(
    stack: &mut Vec<Frame>,
    spans: &mut Vec<Span>,
    kind: SpanKind,
    utf16_cursor: &mut i64,
    out_len: usize,
    byte_offset: usize,
) {
    if matches!(stack.last(), Some(f) if f.kind == kind) {
        let frame = stack.pop().unwrap();
        #[cfg(feature = "debug-tracing")]
        eprintln!("markdown_v2: close {:?} at byte {byte_offset} (opened at byte {})", kind, frame.entity_byte_offset);
        if *utf16_cursor > frame.entity_offset {
            spans.push(Span::new(kind, frame.entity_offset, *utf16_cursor - frame.entity_offset));
        }
    } else {
        #[cfg(feature = "debug-tracing")]
        eprintln!("markdown_v2: open {:?} at byte {byte_offset}", kind);
        stack.push(Frame {
            kind,
            entity_offset: *utf16_cursor,
            entity_byte_offset: byte_offset,
            entity_begin_pos: out_len,
        });
    }
}
