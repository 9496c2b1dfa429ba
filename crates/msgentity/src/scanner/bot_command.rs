use super::ByteSpan;
use crate::span::SpanKind;
use crate::unicode::{char_at, char_before, is_word_char};

fn is_cmd_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn is_boundary_excluded(c: char) -> bool {
    matches!(c, '/' | '<' | '>')
}

/// Scans for `/cmd[@bot]` bot commands. See SPEC_FULL.md §4.2.
pub fn scan(bytes: &[u8]) -> Vec<ByteSpan> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'/' {
            i += 1;
            continue;
        }
        let before = char_before(bytes, i);
        if is_word_char(before) || is_boundary_excluded(before) {
            i += 1;
            continue;
        }
        let cmd_start = i + 1;
        let mut j = cmd_start;
        while j < bytes.len() && is_cmd_char(bytes[j]) {
            j += 1;
        }
        let cmd_len = j - cmd_start;
        if !(1..=64).contains(&cmd_len) {
            i = j.max(i + 1);
            continue;
        }
        let mut end = j;
        if end < bytes.len() && bytes[end] == b'@' {
            let bot_start = end + 1;
            let mut k = bot_start;
            while k < bytes.len() && is_cmd_char(bytes[k]) {
                k += 1;
            }
            let bot_len = k - bot_start;
            if (3..=32).contains(&bot_len) {
                end = k;
            }
        }
        let after = char_at(bytes, end);
        if is_word_char(after) || is_boundary_excluded(after) {
            i = end.max(i + 1);
            continue;
        }
        out.push(ByteSpan::new(SpanKind::BotCommand, i, end));
        i = end;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmds(bytes: &[u8]) -> Vec<(usize, usize)> {
        scan(bytes).into_iter().map(|s| (s.start, s.end)).collect()
    }

    #[test]
    fn basic_command() {
        assert_eq!(cmds(b"/start hi"), vec![(0, 6)]);
    }

    #[test]
    fn command_with_bot() {
        assert_eq!(cmds(b"/start@mybot hi"), vec![(0, 12)]);
    }

    #[test]
    fn too_long_is_rejected() {
        let long = format!("/{}", "a".repeat(65));
        assert_eq!(cmds(long.as_bytes()), vec![]);
        let ok = format!("/{}", "a".repeat(64));
        assert_eq!(cmds(ok.as_bytes()), vec![(0, 65)]);
    }

    #[test]
    fn not_after_slash_or_angle() {
        assert_eq!(cmds(b"//start"), vec![]);
        assert_eq!(cmds(b"</start"), vec![]);
    }
}
