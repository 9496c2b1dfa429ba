//! Compile-time byte classification tables for the ASCII punctuation sets
//! that recur across the scanners, markdown-v2 parser, and sanitizer. Using
//! `msgentity_macros::generate_byte_lookup_table!` catches overlapping
//! category definitions at compile time instead of via a runtime assertion.

use msgentity_macros::generate_byte_lookup_table;

generate_byte_lookup_table!(
    URL_USER_DATA_BYTES,
    UrlUserDataByte,
    EXCLUDED => b"[]{}()'`<>\""
);

/// Punctuation excluded from the "user data" (`user:pass@`) segment of a URL
/// candidate, restricted to the ASCII subset; `«»` are handled separately
/// since they aren't single bytes.
#[inline(always)]
pub(crate) fn is_url_user_data_excluded_ascii(b: u8) -> bool {
    UrlUserDataByte::is_excluded(b)
}

generate_byte_lookup_table!(
    URL_PATH_BYTES,
    UrlPathByte,
    EXCLUDED => b"<>\""
);

/// Punctuation excluded from a URL's path segment, ASCII subset.
#[inline(always)]
pub(crate) fn is_url_path_excluded_ascii(b: u8) -> bool {
    UrlPathByte::is_excluded(b)
}

generate_byte_lookup_table!(
    MARKDOWN_V2_BYTES,
    MarkdownV2Byte,
    RESERVED => b"_*[]()~`>#+-=|{}.!"
);

/// Reserved markdown-v2 characters that must be backslash-escaped outside a
/// code/pre region.
#[inline(always)]
pub(crate) fn is_markdown_v2_reserved(b: u8) -> bool {
    MarkdownV2Byte::is_reserved(b)
}

generate_byte_lookup_table!(
    CONTROL_BYTES,
    ControlByte,
    SPACE_REPLACED => b"\x00\x01\x02\x03\x04\x05\x06\x07\x08\x0B\x0C\x0E\x0F\x10\x11\x12\x13\x14\x15\x16\x17\x18\x19\x1A\x1B\x1C\x1D\x1E\x1F\x20",
    DELETED => b"\r"
);

/// Control codes replaced with a single ASCII space by the sanitizer.
#[inline(always)]
pub(crate) fn is_control_space_replaced(b: u8) -> bool {
    ControlByte::is_space_replaced(b)
}

/// Bytes deleted outright by the sanitizer (currently just `\r`).
#[inline(always)]
pub(crate) fn is_control_deleted(b: u8) -> bool {
    ControlByte::is_deleted(b)
}
