//! Restricted HTML parser (§4.5): a fixed tag whitelist, entity decoding,
//! and the same frame-stack shape (§4.8) the markdown parsers use. `<pre>`
//! and `<code>` merge into a single `PreCode` span when one exactly encloses
//! the other as its sole child.

use crate::collaborators::{UrlChecker, UserResolver};
use crate::error::{Error, Result};
use crate::span::{FormattedText, Span, SpanKind};
use crate::unicode::{next_code_point, utf16_units};

struct Frame {
    kind: SpanKind,
    /// `href` for `a`, the decoded `language-XXX` suffix for `code`, empty
    /// otherwise.
    argument: String,
    entity_offset: i64,
    entity_byte_offset: usize,
    entity_begin_pos: usize,
    child_count: usize,
    child_single_kind: Option<SpanKind>,
    child_language: String,
}

fn tag_kind(name: &str) -> Option<SpanKind> {
    match name {
        "a" => Some(SpanKind::TextUrl),
        "b" | "strong" => Some(SpanKind::Bold),
        "i" | "em" => Some(SpanKind::Italic),
        "u" | "ins" => Some(SpanKind::Underline),
        "s" | "strike" | "del" => Some(SpanKind::Strikethrough),
        "pre" => Some(SpanKind::Pre),
        "code" => Some(SpanKind::Code),
        _ => None,
    }
}

/// Decodes one entity reference starting at the `&` at byte `i`. Returns
/// `Ok(None)` if `i` doesn't begin a recognizable reference (treated as a
/// literal `&`), `Ok(Some((char, next_i)))` on success.
fn decode_entity(bytes: &[u8], i: usize) -> Result<Option<(char, usize)>> {
    const MAX_REF_LEN: usize = 10;
    let scan_limit = bytes.len().min(i + 32);
    let mut semi = None;
    for (k, &b) in bytes.iter().enumerate().take(scan_limit).skip(i + 1) {
        if b == b';' {
            semi = Some(k);
            break;
        }
        if b == b'<' || b == b'&' {
            break;
        }
    }
    let Some(semi) = semi else {
        return Ok(None);
    };
    if semi + 1 - i > MAX_REF_LEN {
        return Err(Error::InvalidHtml {
            reason: "entity reference too long".to_string(),
            byte_offset: i,
        });
    }
    let body = std::str::from_utf8(&bytes[i + 1..semi]).unwrap_or("");
    if let Some(numeric) = body.strip_prefix('#') {
        let (radix, digits) = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => (16, hex),
            None => (10, numeric),
        };
        if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
            return Err(Error::InvalidHtml {
                reason: "malformed numeric entity".to_string(),
                byte_offset: i,
            });
        }
        let value = u32::from_str_radix(digits, radix).map_err(|_| Error::InvalidHtml {
            reason: "numeric entity out of range".to_string(),
            byte_offset: i,
        })?;
        if value == 0 {
            return Err(Error::InvalidHtml {
                reason: "numeric entity references null".to_string(),
                byte_offset: i,
            });
        }
        if value >= 0x10FFFF {
            return Err(Error::InvalidHtml {
                reason: "numeric entity exceeds code point range".to_string(),
                byte_offset: i,
            });
        }
        if (0xD800..=0xDFFF).contains(&value) {
            return Err(Error::InvalidUtf8After);
        }
        let c = char::from_u32(value).ok_or(Error::InvalidUtf8After)?;
        return Ok(Some((c, semi + 1)));
    }
    let c = match body {
        "lt" => '<',
        "gt" => '>',
        "amp" => '&',
        "quot" => '"',
        _ => {
            return Err(Error::InvalidHtml {
                reason: format!("unknown entity '&{body};'"),
                byte_offset: i,
            })
        }
    };
    Ok(Some((c, semi + 1)))
}

/// Appends one plain- or entity-encoded character from `bytes[i..]` into
/// `out`, returning the advanced byte index and UTF-16 units consumed.
fn copy_text_char(bytes: &[u8], i: usize, out: &mut String) -> Result<(usize, i64)> {
    if bytes[i] == b'&' {
        if let Some((c, next)) = decode_entity(bytes, i)? {
            out.push(c);
            return Ok((next, utf16_units(c) as i64));
        }
    }
    let (c, next) = next_code_point(bytes, i);
    out.push(c);
    Ok((next, utf16_units(c) as i64))
}

struct Attr {
    name: String,
    value: String,
}

/// Parses attributes up to (not including) the closing `>` of a start tag.
/// Returns the attributes and the byte index just past `>`.
fn parse_attrs(bytes: &[u8], text: &str, start: usize) -> Result<(Vec<Attr>, usize)> {
    let mut i = start;
    let mut attrs = Vec::new();
    loop {
        while bytes.get(i).is_some_and(|b| b.is_ascii_whitespace()) {
            i += 1;
        }
        match bytes.get(i) {
            None => {
                return Err(Error::InvalidHtml {
                    reason: "unclosed tag".to_string(),
                    byte_offset: start,
                })
            }
            Some(b'/') => {
                i += 1;
                continue;
            }
            Some(b'>') => return Ok((attrs, i + 1)),
            _ => {}
        }
        let name_start = i;
        while bytes.get(i).is_some_and(|&b| b.is_ascii_alphanumeric() || b == b'-') {
            i += 1;
        }
        if i == name_start {
            return Err(Error::InvalidHtml {
                reason: "bad attribute syntax".to_string(),
                byte_offset: i,
            });
        }
        let name = text[name_start..i].to_ascii_lowercase();
        while bytes.get(i).is_some_and(|b| b.is_ascii_whitespace()) {
            i += 1;
        }
        let value = if bytes.get(i) == Some(&b'=') {
            i += 1;
            while bytes.get(i).is_some_and(|b| b.is_ascii_whitespace()) {
                i += 1;
            }
            match bytes.get(i) {
                Some(&q @ (b'\'' | b'"')) => {
                    i += 1;
                    let mut value = String::new();
                    loop {
                        match bytes.get(i) {
                            None => {
                                return Err(Error::InvalidHtml {
                                    reason: "unterminated attribute value".to_string(),
                                    byte_offset: i,
                                })
                            }
                            Some(&b) if b == q => {
                                i += 1;
                                break;
                            }
                            _ => {
                                let (next, _) = copy_text_char(bytes, i, &mut value)?;
                                i = next;
                            }
                        }
                    }
                    value
                }
                _ => {
                    let token_start = i;
                    while bytes
                        .get(i)
                        .is_some_and(|&b| b.is_ascii_alphanumeric() || b == b'.' || b == b'-')
                    {
                        i += 1;
                    }
                    if i == token_start {
                        return Err(Error::InvalidHtml {
                            reason: "bad attribute syntax".to_string(),
                            byte_offset: i,
                        });
                    }
                    text[token_start..i].to_ascii_lowercase()
                }
            }
        } else {
            String::new()
        };
        attrs.push(Attr { name, value });
    }
}

/// Parses `text` as restricted HTML, resolving `<a href>` links through
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
        if bytes[i] != b'<' {
            let (next, units) = copy_text_char(bytes, i, &mut out)?;
            utf16_cursor += units;
            i = next;
            continue;
        }

        let tag_start = i;
        if bytes.get(i + 1) == Some(&b'/') {
            let name_start = i + 2;
            let mut j = name_start;
            while bytes.get(j).is_some_and(|&b| b.is_ascii_alphanumeric()) {
                j += 1;
            }
            let name = text[name_start..j].to_ascii_lowercase();
            while bytes.get(j).is_some_and(|b| b.is_ascii_whitespace()) {
                j += 1;
            }
            if bytes.get(j) != Some(&b'>') {
                return Err(Error::InvalidHtml {
                    reason: "unclosed tag".to_string(),
                    byte_offset: tag_start,
                });
            }
            let close_kind = tag_kind(&name).ok_or_else(|| Error::InvalidHtml {
                reason: format!("unknown tag '{name}'"),
                byte_offset: tag_start,
            })?;
            let Some(frame) = stack.pop().filter(|f| f.kind == close_kind) else {
                return Err(Error::InvalidHtml {
                    reason: format!("unmatched close tag '</{name}>'"),
                    byte_offset: tag_start,
                });
            };
            i = j + 1;

            if close_kind == SpanKind::TextUrl {
                let link_text = out[frame.entity_begin_pos..].to_string();
                let raw_link = if frame.argument.is_empty() { link_text } else { frame.argument };
                if utf16_cursor > frame.entity_offset {
                    let span = if let Some(user_id) = user_resolver.resolve_user(&raw_link) {
                        Some(
                            Span::new(SpanKind::MentionName, frame.entity_offset, utf16_cursor - frame.entity_offset)
                                .with_user_id(user_id),
                        )
                    } else {
                        url_checker.check_url(&raw_link).ok().map(|fixed| {
                            Span::new(SpanKind::TextUrl, frame.entity_offset, utf16_cursor - frame.entity_offset)
                                .with_argument(fixed)
                        })
                    };
                    if let Some(span) = span {
                        record_child(&mut stack, span.kind, &span.argument);
                        spans.push(span);
                    }
                }
                continue;
            }

            if utf16_cursor <= frame.entity_offset {
                continue;
            }
            let offset = frame.entity_offset;
            let length = utf16_cursor - offset;
            let (kind, argument) = resolve_pre_code(&frame, &mut spans, offset, length);
            // A bare (unmerged) Code keeps its own language for bookkeeping
            // purposes even though its displayed `argument` is blanked —
            // an enclosing <pre> that closes next still needs it to merge.
            let merge_language = if kind == SpanKind::Code { frame.argument.clone() } else { argument.clone() };
            record_child(&mut stack, kind, &merge_language);
            let span = if argument.is_empty() {
                Span::new(kind, offset, length)
            } else {
                Span::new(kind, offset, length).with_argument(argument)
            };
            spans.push(span);
            continue;
        }

        let name_start = i + 1;
        let mut j = name_start;
        while bytes.get(j).is_some_and(|&b| b.is_ascii_alphanumeric()) {
            j += 1;
        }
        if j == name_start {
            return Err(Error::InvalidHtml {
                reason: "bad tag syntax".to_string(),
                byte_offset: tag_start,
            });
        }
        let name = text[name_start..j].to_ascii_lowercase();
        let kind = tag_kind(&name).ok_or_else(|| Error::InvalidHtml {
            reason: format!("unknown tag '{name}'"),
            byte_offset: tag_start,
        })?;
        let (attrs, after) = parse_attrs(bytes, text, j)?;
        let mut argument = String::new();
        for attr in &attrs {
            match (kind, attr.name.as_str()) {
                (SpanKind::TextUrl, "href") => argument = attr.value.clone(),
                (SpanKind::Code, "class") => {
                    if let Some(lang) = attr.value.strip_prefix("language-") {
                        argument = lang.to_string();
                    }
                }
                _ => {}
            }
        }
        stack.push(Frame {
            kind,
            argument,
            entity_offset: utf16_cursor,
            entity_byte_offset: tag_start,
            entity_begin_pos: out.len(),
            child_count: 0,
            child_single_kind: None,
            child_language: String::new(),
        });
        i = after;
    }

    if let Some(frame) = stack.last() {
        return Err(Error::InvalidHtml {
            reason: format!("unclosed tag '<{:?}>'", frame.kind),
            byte_offset: frame.entity_byte_offset,
        });
    }

    Ok(FormattedText::new(out, spans))
}

/// Updates the now-topmost stack frame (the parent of whatever just closed)
/// with sole-child bookkeeping, used by the pre/code merge rule.
fn record_child(stack: &mut [Frame], kind: SpanKind, argument: &str) {
    if let Some(parent) = stack.last_mut() {
        parent.child_count += 1;
        if parent.child_count == 1 {
            parent.child_single_kind = Some(kind);
            parent.child_language = argument.to_string();
        } else {
            parent.child_single_kind = None;
        }
    }
}

/// Decides whether a closing `Pre`/`Code` frame should merge with its sole
/// child into `PreCode`, popping that child span from `spans` if so.
fn resolve_pre_code(
    frame: &Frame,
    spans: &mut Vec<Span>,
    offset: i64,
    length: i64,
) -> (SpanKind, String) {
    if !matches!(frame.kind, SpanKind::Pre | SpanKind::Code) {
        return (frame.kind, String::new());
    }
    let complement = match frame.kind {
        SpanKind::Pre => SpanKind::Code,
        _ => SpanKind::Pre,
    };
    let exact_child = frame.child_count == 1
        && frame.child_single_kind == Some(complement)
        && spans.last().is_some_and(|s| s.offset == offset && s.end() == offset + length);
    if !exact_child {
        return (frame.kind, String::new());
    }
    spans.pop();
    let language = match frame.kind {
        SpanKind::Code => frame.argument.clone(),
        _ => frame.child_language.clone(),
    };
    (SpanKind::PreCode, language)
}
