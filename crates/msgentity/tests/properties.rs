//! Property tests for the universal invariants in SPEC_FULL.md §8: sorted,
//! non-overlapping spans in range, idempotent HTML entity decoding, and
//! `fix_formatted_text` never growing the text.

use proptest::prelude::*;

use msgentity::collaborators::NullCollaborators;
use msgentity::{find_entities, parse_html, FixFlags, Span};

fn plain_text_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9 @#/.:_-]{0,120}").expect("valid regex")
}

fn utf16_len(text: &str) -> i64 {
    text.chars().map(|c| if (c as u32) < 0x10000 { 1 } else { 2 }).sum()
}

fn assert_sorted_and_in_bounds(text: &str, spans: &[Span]) {
    let total = utf16_len(text);
    let mut last_end: Option<(i64, i64)> = None;
    for span in spans {
        assert!(span.offset >= 0);
        assert!(span.length > 0);
        assert!(span.end() <= total);
        if let Some((prev_offset, prev_length)) = last_end {
            assert!(
                prev_offset < span.offset || (prev_offset == span.offset && prev_length >= span.length)
            );
        }
        last_end = Some((span.offset, span.length));
    }
}

proptest! {
    /// `find_entities` always returns sorted, non-overlapping, in-bounds spans.
    #[test]
    fn find_entities_spans_are_sorted_and_in_bounds(text in plain_text_strategy()) {
        let spans = find_entities(&text, false, false);
        assert_sorted_and_in_bounds(&text, &spans);
        for pair in spans.windows(2) {
            prop_assert!(pair[0].end() <= pair[1].offset);
        }
    }

    /// `fix_formatted_text` never makes the text longer.
    #[test]
    fn fix_formatted_text_never_grows_text(text in plain_text_strategy()) {
        let ft = msgentity::fix_formatted_text(
            text.as_bytes(),
            vec![],
            FixFlags::ALLOW_EMPTY | FixFlags::SKIP_NEW_ENTITIES,
        ).unwrap();
        prop_assert!(ft.text.len() <= text.len());
    }

    /// Running the HTML parser's output back through it (after escaping the
    /// three characters HTML itself reserves) reproduces the same text: no
    /// entity decoding step is left to apply twice.
    #[test]
    fn html_output_text_has_no_further_entities_to_decode(text in plain_text_strategy()) {
        let c = NullCollaborators;
        if let Ok(ft) = parse_html(&text, &c, &c) {
            let escaped = ft.text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;");
            let reparsed = parse_html(&escaped, &c, &c).unwrap();
            prop_assert_eq!(reparsed.text, ft.text);
        }
    }
}

#[test]
fn code_and_pre_spans_never_contain_nested_spans() {
    let c = NullCollaborators;
    let ft = msgentity::parse_markdown_v2("`a` and *b*", &c, &c).unwrap();
    for span in &ft.spans {
        if span.kind.forbids_nested_formatting() {
            let nested = ft
                .spans
                .iter()
                .any(|other| other.offset >= span.offset && other.end() <= span.end() && !std::ptr::eq(other, span));
            assert!(!nested);
        }
    }
}
