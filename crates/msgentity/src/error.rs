use thiserror::Error as ThisError;

/// The kind of markup that failed to close, for `InvalidMarkup`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupKind {
    Italic,
    Bold,
    Underline,
    Strikethrough,
    Code,
    Pre,
    Link,
}

impl std::fmt::Display for MarkupKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MarkupKind::Italic => "italic",
            MarkupKind::Bold => "bold",
            MarkupKind::Underline => "underline",
            MarkupKind::Strikethrough => "strikethrough",
            MarkupKind::Code => "code",
            MarkupKind::Pre => "pre",
            MarkupKind::Link => "link",
        };
        f.write_str(name)
    }
}

#[derive(Debug, ThisError, PartialEq, Eq)]
pub enum Error {
    #[error("text is not valid UTF-8")]
    InvalidUtf8,
    #[error("text must not be empty")]
    Empty,
    #[error("invalid markup at byte offset {byte_offset} (tag: {kind:?})")]
    InvalidMarkup {
        byte_offset: usize,
        kind: Option<MarkupKind>,
    },
    #[error("unescaped reserved character '{char}' at byte offset {byte_offset}")]
    ReservedChar { char: char, byte_offset: usize },
    #[error("invalid HTML at byte offset {byte_offset}: {reason}")]
    InvalidHtml { reason: String, byte_offset: usize },
    #[error("HTML entity decoding produced invalid UTF-8")]
    InvalidUtf8After,
    #[error("span at offset {offset} ends inside a UTF-16 surrogate pair (byte {byte_pos})")]
    SpanInsideSurrogate { offset: i64, byte_pos: usize },
    #[error("span offset {offset} is past the end of the text")]
    SpanPastEnd { offset: i64 },
}

pub type Result<T> = std::result::Result<T, Error>;
