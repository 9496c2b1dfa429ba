//! Text-entity and formatted-markup engine: scans plain text for entities
//! (mentions, hashtags, URLs, ...), parses Markdown V1/V2 and a restricted
//! HTML subset into `FormattedText`, and sanitizes/finalizes spans before a
//! message is sent. See `SPEC_FULL.md` for the full contract.

mod algebra;
mod byte_lookup;
pub mod collaborators;
pub mod error;
mod html;
mod markdown_v1;
mod markdown_v2;
mod sanitize;
mod scanner;
pub mod span;
mod unicode;

use collaborators::{UrlChecker, UserResolver};

pub use error::{Error, Result};
pub use sanitize::FixFlags;
pub use span::{FormattedText, Span, SpanKind};

/// Parses `text` as Markdown-v1 (§4.3).
pub fn parse_markdown_v1(
    text: &str,
    url_checker: &dyn UrlChecker,
    user_resolver: &dyn UserResolver,
) -> Result<FormattedText> {
    markdown_v1::parse(text, url_checker, user_resolver)
}

/// Parses `text` as Markdown-v2 (§4.4).
pub fn parse_markdown_v2(
    text: &str,
    url_checker: &dyn UrlChecker,
    user_resolver: &dyn UserResolver,
) -> Result<FormattedText> {
    markdown_v2::parse(text, url_checker, user_resolver)
}

/// Parses `text` as the restricted HTML subset (§4.5).
pub fn parse_html(
    text: &str,
    url_checker: &dyn UrlChecker,
    user_resolver: &dyn UserResolver,
) -> Result<FormattedText> {
    html::parse(text, url_checker, user_resolver)
}

/// Sanitizes and finalizes `text`/`spans` before a message is sent or
/// stored (§4.7).
pub fn fix_formatted_text(text: &[u8], spans: Vec<Span>, flags: FixFlags) -> Result<FormattedText> {
    sanitize::fix_formatted_text(text, spans, flags)
}

/// Scans `text` for mentions, hashtags, cashtags, bot commands, URLs, and
/// email addresses (§4.2). `skip_bot_commands` suppresses `/command`
/// recognition for messages not addressed to a bot. `only_urls` restricts
/// the scan to `Url`/`EmailAddress` spans, skipping the other scanners.
pub fn find_entities(text: &str, skip_bot_commands: bool, only_urls: bool) -> Vec<Span> {
    scanner::find_entities(text, skip_bot_commands, only_urls)
}

/// Returns the first URL reachable from `text`, considering both `spans`
/// (an already-parsed `TextUrl`/`Url`/`EmailAddress` carries its own
/// destination) and a fresh plain-text scan, whichever starts earliest.
/// `MentionName` spans are internal references, not URLs, and are ignored.
/// Returns `""` if none is found (§6).
pub fn get_first_url(text: &str, spans: &[Span]) -> String {
    let mut candidates: Vec<(i64, String)> = spans
        .iter()
        .filter_map(|s| match s.kind {
            SpanKind::TextUrl => Some((s.offset, s.argument.clone())),
            SpanKind::Url | SpanKind::EmailAddress => {
                Some((s.offset, span::utf16_slice(text, s.offset, s.length).to_string()))
            }
            _ => None,
        })
        .collect();
    for auto in scanner::find_entities(text, true, true) {
        candidates.push((auto.offset, span::utf16_slice(text, auto.offset, auto.length).to_string()));
    }
    candidates.sort_by_key(|(offset, _)| *offset);
    candidates.into_iter().map(|(_, url)| url).next().unwrap_or_default()
}


