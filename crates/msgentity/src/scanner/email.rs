//! Email-address shape validation, applied to URL candidates (§4.2).

fn is_local_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

fn validate_local(local: &str) -> bool {
    if local.is_empty() {
        return false;
    }
    let segments: Vec<&str> = local.split(['.', '+']).collect();
    if segments.len() > 11 {
        return false;
    }
    let Some((last, rest)) = segments.split_last() else {
        return false;
    };
    for seg in rest {
        if seg.is_empty() || seg.len() > 26 || !seg.bytes().all(is_local_char) {
            return false;
        }
    }
    if last.is_empty() || last.len() > 35 || !last.bytes().all(is_local_char) {
        return false;
    }
    true
}

fn validate_domain(domain: &str) -> bool {
    let labels: Vec<&str> = domain.split('.').collect();
    if !(2..=7).contains(&labels.len()) {
        return false;
    }
    let Some((last, rest)) = labels.split_last() else {
        return false;
    };
    if !(2..=6).contains(&last.len()) || !last.bytes().all(|b| b.is_ascii_alphabetic()) {
        return false;
    }
    for label in rest {
        if label.is_empty() || label.len() > 30 {
            return false;
        }
        let bytes = label.as_bytes();
        if !bytes.iter().all(|&b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-') {
            return false;
        }
        if !bytes[0].is_ascii_alphanumeric() || !bytes[bytes.len() - 1].is_ascii_alphanumeric() {
            return false;
        }
    }
    true
}

/// Whether `candidate` (an entire matched byte range, `local@domain`) is
/// shaped like a valid email address.
pub fn try_parse_email(candidate: &str) -> bool {
    let Some(at_pos) = candidate.find('@') else {
        return false;
    };
    if candidate[at_pos + 1..].contains('@') {
        return false;
    }
    validate_local(&candidate[..at_pos]) && validate_domain(&candidate[at_pos + 1..])
}

/// Strips a case-insensitive `mailto:` prefix, if present.
pub fn strip_mailto_prefix(candidate: &str) -> Option<&str> {
    let prefix = candidate.as_bytes().get(..7)?;
    if prefix.eq_ignore_ascii_case(b"mailto:") {
        Some(&candidate[7..])
    } else {
        None
    }
}
