//! Markdown-v1 parser (§4.3): the original, non-reserved-character dialect.
//! `_italic_`, `*bold*`, `` `code` ``, fenced ```` ```lang\ncode``` ````, and
//! `[text](url)` links. Delimiters nest via a small frame stack (§4.8); Code
//! and the fenced forms never recurse into the general dispatch.

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

/// Parses `text` as Markdown-v1, resolving `[text](url)` links through
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

        if b == b'\\' && matches!(bytes.get(i + 1), Some(b'_' | b'*' | b'`' | b'[')) {
            let escaped = bytes[i + 1] as char;
            out.push(escaped);
            utf16_cursor += 1;
            i += 2;
            continue;
        }

        let in_code = matches!(stack.last(), Some(f) if f.kind == SpanKind::Code);
        if in_code && b != b'`' {
            let (c, next) = next_code_point(bytes, i);
            out.push(c);
            utf16_cursor += utf16_units(c) as i64;
            i = next;
            continue;
        }

        if !in_code && b == b'`' && bytes.get(i + 1) == Some(&b'`') && bytes.get(i + 2) == Some(&b'`') {
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
                return Err(Error::InvalidMarkup {
                    byte_offset: fence_start,
                    kind: Some(MarkupKind::Pre),
                });
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

        match b {
            b'_' | b'*' | b'`' => {
                let kind = match b {
                    b'_' => SpanKind::Italic,
                    b'*' => SpanKind::Bold,
                    _ => SpanKind::Code,
                };
                if matches!(stack.last(), Some(f) if f.kind == kind) {
                    let frame = stack.pop().unwrap();
                    if utf16_cursor > frame.entity_offset {
                        spans.push(Span::new(kind, frame.entity_offset, utf16_cursor - frame.entity_offset));
                    }
                } else {
                    stack.push(Frame {
                        kind,
                        entity_offset: utf16_cursor,
                        entity_byte_offset: i,
                        entity_begin_pos: out.len(),
                    });
                }
                i += 1;
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
                    j += 1;
                    let url_start = j;
                    while j < bytes.len() && bytes[j] != b')' {
                        j += 1;
                    }
                    if j >= bytes.len() {
                        return Err(Error::InvalidMarkup {
                            byte_offset: frame.entity_byte_offset,
                            kind: Some(MarkupKind::Link),
                        });
                    }
                    let url = text[url_start..j].to_string();
                    j += 1;
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
            _ => {
                let (c, next) = next_code_point(bytes, i);
                out.push(c);
                utf16_cursor += utf16_units(c) as i64;
                i = next;
            }
        }
    }

    if let Some(frame) = stack.last() {
        let kind = match frame.kind {
            SpanKind::Italic => Some(MarkupKind::Italic),
            SpanKind::Bold => Some(MarkupKind::Bold),
            SpanKind::Code => Some(MarkupKind::Code),
            _ => None,
        };
        return Err(Error::InvalidMarkup {
            byte_offset: frame.entity_byte_offset,
            kind,
        });
    }

    Ok(FormattedText::new(out, spans))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::NullCollaborators;

    fn parse_str(text: &str) -> Result<FormattedText> {
        let c = NullCollaborators;
        parse(text, &c, &c)
    }

    #[test]
    fn bold_and_italic() {
        let ft = parse_str("*bold* and _italic_").unwrap();
        assert_eq!(ft.text, "bold and italic");
        assert_eq!(ft.spans.len(), 2);
        assert_eq!(ft.spans[0].kind, SpanKind::Bold);
        assert_eq!(ft.spans[1].kind, SpanKind::Italic);
    }

    #[test]
    fn nested_distinct_kinds() {
        let ft = parse_str("*bold _italic_ bold*").unwrap();
        assert_eq!(ft.text, "bold italic bold");
        assert_eq!(ft.spans.len(), 2);
        assert_eq!(ft.spans[0].kind, SpanKind::Bold);
        assert_eq!(ft.spans[0].offset, 0);
        assert_eq!(ft.spans[0].length, 16);
        assert_eq!(ft.spans[1].kind, SpanKind::Italic);
        assert_eq!(ft.spans[1].offset, 5);
        assert_eq!(ft.spans[1].length, 6);
    }

    #[test]
    fn code_ignores_delimiters_inside() {
        let ft = parse_str("`a*b_c`").unwrap();
        assert_eq!(ft.text, "a*b_c");
        assert_eq!(ft.spans.len(), 1);
        assert_eq!(ft.spans[0].kind, SpanKind::Code);
    }

    #[test]
    fn fenced_pre_with_language() {
        let ft = parse_str("```rust\nfn main() {}\n```").unwrap();
        assert_eq!(ft.text, "fn main() {}\n");
        assert_eq!(ft.spans.len(), 1);
        assert_eq!(ft.spans[0].kind, SpanKind::PreCode);
        assert_eq!(ft.spans[0].argument, "rust");
    }

    #[test]
    fn fenced_pre_without_language() {
        let ft = parse_str("```\nplain\n```").unwrap();
        assert_eq!(ft.text, "plain\n");
        assert_eq!(ft.spans[0].kind, SpanKind::Pre);
    }

    #[test]
    fn escapes_are_literal() {
        let ft = parse_str("\\*not bold\\*").unwrap();
        assert_eq!(ft.text, "*not bold*");
        assert_eq!(ft.spans.len(), 0);
    }

    #[test]
    fn unclosed_bold_fails() {
        let err = parse_str("*bold").unwrap_err();
        assert_eq!(
            err,
            Error::InvalidMarkup {
                byte_offset: 0,
                kind: Some(MarkupKind::Bold)
            }
        );
    }

    #[test]
    fn link_without_parens_uses_text_as_url() {
        struct Checker;
        impl UrlChecker for Checker {
            fn check_url(&self, raw: &str) -> std::result::Result<String, String> {
                Ok(raw.to_string())
            }
        }
        impl UserResolver for Checker {
            fn resolve_user(&self, _link: &str) -> Option<crate::collaborators::UserId> {
                None
            }
        }
        let c = Checker;
        let ft = parse("[https://example.com]", &c, &c).unwrap();
        assert_eq!(ft.text, "https://example.com");
        assert_eq!(ft.spans.len(), 1);
        assert_eq!(ft.spans[0].kind, SpanKind::TextUrl);
        assert_eq!(ft.spans[0].argument, "https://example.com");
    }

    #[test]
    fn invalid_link_url_dropped_silently() {
        struct RejectAll;
        impl UrlChecker for RejectAll {
            fn check_url(&self, _raw: &str) -> std::result::Result<String, String> {
                Err("bad".to_string())
            }
        }
        impl UserResolver for RejectAll {
            fn resolve_user(&self, _link: &str) -> Option<crate::collaborators::UserId> {
                None
            }
        }
        let c = RejectAll;
        let ft = parse("[text](not a url)", &c, &c).unwrap();
        assert_eq!(ft.text, "text");
        assert_eq!(ft.spans.len(), 0);
    }

    #[test]
    fn missing_close_paren_fails() {
        let err = parse_str("[text](url").unwrap_err();
        assert_eq!(
            err,
            Error::InvalidMarkup {
                byte_offset: 0,
                kind: Some(MarkupKind::Link)
            }
        );
    }
}
