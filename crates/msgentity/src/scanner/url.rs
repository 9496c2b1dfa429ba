//! URL candidate discovery and the `fix_url` acceptance pass (§4.2). Email
//! reclassification of URL candidates lives in `email.rs` and is applied
//! here, since the engine always runs the email check over every URL.

use super::{email, tld, ByteSpan};
use crate::byte_lookup::{is_url_path_excluded_ascii, is_url_user_data_excluded_ascii};
use crate::span::SpanKind;
use crate::unicode::{char_before, is_word_char, next_code_point, prev_code_point, ZWJ};

const ACCEPTED_SCHEMES: &[&str] = &["http", "https", "ftp", "sftp"];
const TRAILING_PATH_PUNCTUATION: &[u8] = b".:;,('?!`";
const GUILLEMETS: [char; 2] = ['\u{AB}', '\u{BB}'];

fn is_separator(c: char) -> bool {
    crate::unicode::category(c) == crate::unicode::Category::Separator
}

fn is_user_data_char(c: char) -> bool {
    if c == ZWJ {
        return true;
    }
    if is_separator(c) || GUILLEMETS.contains(&c) {
        return false;
    }
    !c.is_ascii() || !is_url_user_data_excluded_ascii(c as u8)
}

fn is_domain_char(c: char) -> bool {
    if c.is_ascii() {
        c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | '~')
    } else {
        !is_separator(c)
    }
}

fn is_path_char(c: char) -> bool {
    if is_separator(c) || GUILLEMETS.contains(&c) {
        return false;
    }
    !c.is_ascii() || !is_url_path_excluded_ascii(c as u8)
}

struct Candidate {
    start: usize,
    end: usize,
    has_scheme: bool,
    host_start: usize,
    host_end: usize,
    /// Rightmost byte position considered while locating the domain, before
    /// trailing-dot stripping. Scanning must resume past this point even
    /// when the accepted span ends earlier, or the stripped trailing dot
    /// re-triggers an identical candidate on the next iteration.
    scan_end: usize,
}

fn scan_left(bytes: &[u8], mut pos: usize, pred: impl Fn(char) -> bool) -> usize {
    loop {
        if pos == 0 {
            return pos;
        }
        let prev = prev_code_point(bytes, pos);
        let (c, _) = next_code_point(bytes, prev);
        if !pred(c) {
            return pos;
        }
        pos = prev;
    }
}

fn scan_right(bytes: &[u8], mut pos: usize, pred: impl Fn(char) -> bool) -> usize {
    loop {
        if pos >= bytes.len() {
            return pos;
        }
        let (c, next) = next_code_point(bytes, pos);
        if !pred(c) {
            return pos;
        }
        pos = next;
    }
}

fn find_candidate(bytes: &[u8], dot_pos: usize) -> Option<Candidate> {
    let domain_start = scan_left(bytes, dot_pos, is_domain_char);
    let raw_domain_end = scan_right(bytes, dot_pos + 1, is_domain_char);
    let mut domain_end = raw_domain_end;
    // Dots are valid domain characters, but a trailing one belongs to
    // sentence punctuation, not the host.
    while domain_end > domain_start && bytes[domain_end - 1] == b'.' {
        domain_end -= 1;
    }
    if domain_end <= domain_start + 1 || !bytes[domain_start..domain_end].contains(&b'.') {
        return None;
    }

    // Extend left through user-data characters, tracking the leftmost `@`
    // reached so `user:pass@host` is captured whole.
    let mut cursor = domain_start;
    let mut saw_at = false;
    loop {
        if cursor == 0 {
            break;
        }
        let prev = prev_code_point(bytes, cursor);
        let (c, _) = next_code_point(bytes, prev);
        if c == '@' {
            saw_at = true;
            cursor = prev;
            continue;
        }
        if is_user_data_char(c) {
            cursor = prev;
            continue;
        }
        break;
    }
    let user_start = cursor;
    let start_before_scheme = if saw_at { user_start } else { domain_start };

    let mut has_scheme = false;
    let mut start = start_before_scheme;
    if start_before_scheme >= 3 && &bytes[start_before_scheme - 3..start_before_scheme] == b"://" {
        let scheme_end = start_before_scheme - 3;
        let scheme_start = scan_left(bytes, scheme_end, |c| c.is_ascii_alphabetic());
        let scheme = std::str::from_utf8(&bytes[scheme_start..scheme_end]).ok()?;
        if !ACCEPTED_SCHEMES.contains(&scheme.to_ascii_lowercase().as_str()) {
            return None;
        }
        has_scheme = true;
        start = scheme_start;
    } else {
        let before = char_before(bytes, start_before_scheme);
        if is_word_char(before) || matches!(before, '/' | '#' | '@') {
            return None;
        }
    }

    let mut end = domain_end;
    if end < bytes.len() && bytes[end] == b':' {
        let port_start = end + 1;
        let mut k = port_start;
        while k < bytes.len() && bytes[k].is_ascii_digit() && k - port_start < 5 {
            k += 1;
        }
        let port_len = k - port_start;
        if port_len >= 1 {
            let port_bytes = &bytes[port_start..k];
            let leading_zero = port_len > 1 && port_bytes[0] == b'0';
            let value = std::str::from_utf8(port_bytes).ok().and_then(|s| s.parse::<u32>().ok());
            if !leading_zero && value.is_some_and(|v| v <= 65535) {
                end = k;
            }
        }
    }

    if end < bytes.len() && matches!(bytes[end], b'/' | b'?' | b'#') {
        end = scan_right(bytes, end + 1, is_path_char);
    }

    while end > start && TRAILING_PATH_PUNCTUATION.contains(&bytes[end - 1]) {
        end -= 1;
    }
    if end <= start {
        return None;
    }

    Some(Candidate {
        start,
        end,
        has_scheme,
        host_start: domain_start,
        host_end: domain_end,
        scan_end: raw_domain_end.max(end),
    })
}

/// Scans for URLs and, via the email shape check, email addresses. Both are
/// emitted from the same candidate pass since the engine always checks every
/// URL candidate against the email grammar first.
pub fn scan(bytes: &[u8]) -> Vec<ByteSpan> {
    let mut out = Vec::new();
    let mut i = 0;
    let mut consumed_until = 0usize;
    while let Some(dot) = memchr::memchr(b'.', &bytes[i..]) {
        i += dot;
        if i < consumed_until {
            i += 1;
            continue;
        }
        let Some(candidate) = find_candidate(bytes, i) else {
            i += 1;
            continue;
        };
        consumed_until = candidate.scan_end;
        i = candidate.scan_end.max(i + 1);

        let Ok(text) = std::str::from_utf8(&bytes[candidate.start..candidate.end]) else {
            continue;
        };

        if let Some(rest) = email::strip_mailto_prefix(text) {
            if email::try_parse_email(rest) {
                let rest_start = candidate.end - rest.len();
                out.push(ByteSpan::new(SpanKind::EmailAddress, rest_start, candidate.end));
            }
            continue;
        }

        if !candidate.has_scheme && email::try_parse_email(text) {
            out.push(ByteSpan::new(SpanKind::EmailAddress, candidate.start, candidate.end));
            continue;
        }

        let Ok(host) = std::str::from_utf8(&bytes[candidate.host_start..candidate.host_end]) else {
            continue;
        };
        if !tld::fix_url_host(host, candidate.has_scheme) {
            continue;
        }
        out.push(ByteSpan::new(SpanKind::Url, candidate.start, candidate.end));
    }
    out
}
