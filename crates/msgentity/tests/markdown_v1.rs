use msgentity::collaborators::NullCollaborators;
use msgentity::{parse_markdown_v1, SpanKind};

#[test]
fn bold_italic_and_code_compose() {
    let c = NullCollaborators;
    let ft = parse_markdown_v1("*bold* and _italic_ and `code`", &c, &c).unwrap();
    assert_eq!(ft.text, "bold and italic and code");
    let kinds: Vec<SpanKind> = ft.spans.iter().map(|s| s.kind).collect();
    assert_eq!(kinds, vec![SpanKind::Bold, SpanKind::Italic, SpanKind::Code]);
}

#[test]
fn fenced_code_block_with_language() {
    let c = NullCollaborators;
    let ft = parse_markdown_v1("```rust\nfn main() {}\n```", &c, &c).unwrap();
    assert_eq!(ft.text, "fn main() {}\n");
    assert_eq!(ft.spans.len(), 1);
    assert_eq!(ft.spans[0].kind, SpanKind::PreCode);
    assert_eq!(ft.spans[0].argument, "rust");
}

#[test]
fn unclosed_delimiter_is_an_error() {
    let c = NullCollaborators;
    assert!(parse_markdown_v1("*unterminated", &c, &c).is_err());
}
