use msgentity::{fix_formatted_text, FixFlags};

#[test]
fn trims_whitespace_and_deletes_carriage_return() {
    let ft = fix_formatted_text(b"  hi\r\nthere  ", vec![], FixFlags::empty()).unwrap();
    assert_eq!(ft.text, "hi\nthere");
    assert!(ft.spans.is_empty());
}

#[test]
fn empty_result_requires_allow_empty() {
    assert!(fix_formatted_text(b"   ", vec![], FixFlags::empty()).is_err());
    let ft = fix_formatted_text(b"   ", vec![], FixFlags::ALLOW_EMPTY).unwrap();
    assert_eq!(ft.text, "");
}

#[test]
fn invalid_utf8_is_rejected() {
    assert!(fix_formatted_text(&[0xFF, 0xFE], vec![], FixFlags::ALLOW_EMPTY).is_err());
}

#[test]
fn new_entities_are_picked_up_unless_skipped() {
    let with_scan = fix_formatted_text(
        b"see https://example.com now",
        vec![],
        FixFlags::ALLOW_EMPTY | FixFlags::FOR_DRAFT,
    )
    .unwrap();
    assert_eq!(with_scan.spans.len(), 1);

    let without_scan = fix_formatted_text(
        b"see https://example.com now",
        vec![],
        FixFlags::ALLOW_EMPTY | FixFlags::FOR_DRAFT | FixFlags::SKIP_NEW_ENTITIES,
    )
    .unwrap();
    assert!(without_scan.spans.is_empty());
}
