mod ascii_table;

use crate::ascii_table::generate_byte_lookup_table_impl;
use proc_macro::TokenStream;

/// Generate a byte classification table where each named category marks the
/// bytes given to it, and a byte can belong to more than one category at
/// once (stored as a bitflag byte). Bytes `0x80..=0xFF` are implicitly placed
/// in a trailing `UNICODE` category since scanners only ever classify the
/// leading byte of a multi-byte code point through these tables.
///
/// ```ignore
/// generate_byte_lookup_table!(WORD_BYTES, WordByte, ALPHA => b"abc...", UNDERSCORE => b"_");
/// ```
#[proc_macro]
pub fn generate_byte_lookup_table(input: TokenStream) -> TokenStream {
    generate_byte_lookup_table_impl(input)
}
