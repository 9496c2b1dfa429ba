//! The `Span` / `FormattedText` data model (offsets are UTF-16 code units,
//! per the wire contract this engine's caller eventually serializes to).

/// Upper bound on an individual span's `offset` or `length`, matching the
/// server-side contract this engine mirrors.
pub const MAX_SPAN_VALUE: i64 = 1_000_000;

/// Maximum byte length of a message's text after `fix_formatted_text`.
pub const MAX_TEXT_BYTES: usize = 35_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanKind {
    Mention,
    Hashtag,
    Cashtag,
    BotCommand,
    Url,
    EmailAddress,
    PhoneNumber,
    Bold,
    Italic,
    Underline,
    Strikethrough,
    BlockQuote,
    Code,
    Pre,
    PreCode,
    TextUrl,
    MentionName,
}

impl SpanKind {
    /// Fixed priority used to break overlap ties; lower wins. See §3.
    pub fn priority(self) -> i32 {
        match self {
            SpanKind::Mention
            | SpanKind::Hashtag
            | SpanKind::BotCommand
            | SpanKind::Url
            | SpanKind::EmailAddress
            | SpanKind::Cashtag
            | SpanKind::PhoneNumber => 50,
            SpanKind::Bold => 90,
            SpanKind::Italic => 91,
            SpanKind::Underline => 92,
            SpanKind::Strikethrough => 93,
            SpanKind::BlockQuote => 0,
            SpanKind::Code => 10,
            SpanKind::Pre => 11,
            SpanKind::PreCode => 49,
            SpanKind::TextUrl => 49,
            SpanKind::MentionName => 49,
        }
    }

    /// An auto-detected entity kind found by the plain-text scanners (§4.2),
    /// as opposed to a formatting span produced by a markup parser.
    pub fn is_entity_like(self) -> bool {
        matches!(
            self,
            SpanKind::Mention
                | SpanKind::Hashtag
                | SpanKind::BotCommand
                | SpanKind::Url
                | SpanKind::EmailAddress
                | SpanKind::Cashtag
                | SpanKind::PhoneNumber
        )
    }

    /// `TextUrl`/`MentionName`: the visible text differs from the
    /// destination the span carries, so it must survive even when the
    /// visible text is all whitespace.
    pub fn is_hidden_data(self) -> bool {
        matches!(self, SpanKind::TextUrl | SpanKind::MentionName)
    }

    /// Whether a span of this kind may never contain nested formatting.
    pub fn forbids_nested_formatting(self) -> bool {
        matches!(self, SpanKind::Code | SpanKind::Pre | SpanKind::PreCode)
    }
}

/// A typed range over a `FormattedText`'s `text`, in UTF-16 code units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub kind: SpanKind,
    pub offset: i64,
    pub length: i64,
    /// The URL for `TextUrl`, the language tag for `PreCode`, empty
    /// otherwise.
    pub argument: String,
    /// Numeric user id, used only for `MentionName`.
    pub user_id: i64,
}

impl Span {
    pub fn new(kind: SpanKind, offset: i64, length: i64) -> Self {
        Span {
            kind,
            offset,
            length,
            argument: String::new(),
            user_id: 0,
        }
    }

    pub fn with_argument(mut self, argument: impl Into<String>) -> Self {
        self.argument = argument.into();
        self
    }

    pub fn with_user_id(mut self, user_id: i64) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn end(&self) -> i64 {
        self.offset + self.length
    }

    /// Whether the span's bounds are individually sane (non-negative,
    /// positive length, within the fixed magnitude cap). Does not check
    /// containment within any particular text.
    pub fn has_valid_bounds(&self) -> bool {
        self.offset >= 0
            && self.length > 0
            && self.offset <= MAX_SPAN_VALUE
            && self.length <= MAX_SPAN_VALUE
    }
}

/// Sorts spans by offset ascending, then length descending, so that an outer
/// span precedes an inner span starting at the same offset.
pub fn sort_spans(spans: &mut [Span]) {
    spans.sort_by(|a, b| a.offset.cmp(&b.offset).then(b.length.cmp(&a.length)));
}

/// Returns the UTF-8 substring of `text` spanning UTF-16 code units
/// `[offset, offset+length)`. `length` may be `i64::MAX` to mean "to the end".
pub(crate) fn utf16_slice(text: &str, offset: i64, length: i64) -> &str {
    use crate::unicode::{next_code_point, utf16_units};

    let bytes = text.as_bytes();
    let (mut units, mut start_byte, mut end_byte) = (0i64, None, text.len());
    let mut i = 0usize;
    while i < bytes.len() {
        if start_byte.is_none() && units >= offset {
            start_byte = Some(i);
        }
        if units >= offset.saturating_add(length) {
            end_byte = i;
            break;
        }
        let (c, next) = next_code_point(bytes, i);
        units += utf16_units(c) as i64;
        i = next;
    }
    let start_byte = start_byte.unwrap_or(text.len());
    &text[start_byte..end_byte.max(start_byte)]
}

/// `{text, spans}`: the result of every parser and of `fix_formatted_text`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormattedText {
    pub text: String,
    pub spans: Vec<Span>,
}

impl FormattedText {
    pub fn new(text: String, mut spans: Vec<Span>) -> Self {
        sort_spans(&mut spans);
        FormattedText { text, spans }
    }
}
