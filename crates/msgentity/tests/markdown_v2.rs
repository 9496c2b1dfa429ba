use msgentity::collaborators::NullCollaborators;
use msgentity::error::Error;
use msgentity::{parse_markdown_v2, SpanKind};

#[test]
fn nested_italic_inside_bold() {
    let c = NullCollaborators;
    let ft = parse_markdown_v2("*bold _it_ end*", &c, &c).unwrap();
    assert_eq!(ft.text, "bold it end");
    assert_eq!(ft.spans.len(), 2);
    assert_eq!(ft.spans[0].kind, SpanKind::Bold);
    assert_eq!((ft.spans[0].offset, ft.spans[0].end()), (0, 11));
    assert_eq!(ft.spans[1].kind, SpanKind::Italic);
    assert_eq!((ft.spans[1].offset, ft.spans[1].end()), (5, 7));
}

#[test]
fn doubled_underscore_is_underline_not_italic() {
    let c = NullCollaborators;
    let ft = parse_markdown_v2("__under__", &c, &c).unwrap();
    assert_eq!(ft.text, "under");
    assert_eq!(ft.spans.len(), 1);
    assert_eq!(ft.spans[0].kind, SpanKind::Underline);
}

#[test]
fn unescaped_reserved_character_errors() {
    let c = NullCollaborators;
    let err = parse_markdown_v2("1 + 1 = 2", &c, &c).unwrap_err();
    assert!(matches!(err, Error::ReservedChar { char: '+', .. }));
}

#[test]
fn escaped_reserved_character_is_literal() {
    let c = NullCollaborators;
    let ft = parse_markdown_v2("1 \\+ 1", &c, &c).unwrap();
    assert_eq!(ft.text, "1 + 1");
    assert!(ft.spans.is_empty());
}

#[test]
fn code_only_reserves_the_backtick() {
    let c = NullCollaborators;
    let ft = parse_markdown_v2("`a+b*c_d`", &c, &c).unwrap();
    assert_eq!(ft.text, "a+b*c_d");
    assert_eq!(ft.spans.len(), 1);
    assert_eq!(ft.spans[0].kind, SpanKind::Code);
}
