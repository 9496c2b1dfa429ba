//! Span overlap-resolution policies (§4.6): nested formatting spans allow
//! clean containment, auto-detected entities must be strictly disjoint, and
//! the two sets merge without auto spans clobbering user-authored ones.

use crate::span::{sort_spans, Span};

/// Drops spans with out-of-range bounds, then walks sorted spans with a
/// stack of open parents, keeping a span iff it nests cleanly inside its
/// innermost parent (different kind, wholly contained, parent isn't a
/// Code/Pre/PreCode leaf). Partial overlaps between siblings are dropped.
pub fn normalize_nested(spans: &[Span]) -> Vec<Span> {
    let mut candidates: Vec<Span> = spans
        .iter()
        .filter(|s| s.has_valid_bounds())
        .cloned()
        .collect();
    sort_spans(&mut candidates);

    let mut kept: Vec<Span> = Vec::with_capacity(candidates.len());
    // Indices into `kept` of the currently open ancestor chain, innermost last.
    let mut stack: Vec<usize> = Vec::new();

    for span in candidates {
        while let Some(&top) = stack.last() {
            if span.offset >= kept[top].end() {
                stack.pop();
            } else {
                break;
            }
        }
        let accepted = match stack.last() {
            None => true,
            Some(&top) => {
                let parent = &kept[top];
                span.end() <= parent.end()
                    && span.kind != parent.kind
                    && !parent.kind.forbids_nested_formatting()
            }
        };
        if !accepted {
            continue;
        }
        stack.push(kept.len());
        kept.push(span);
    }
    kept
}

/// Keeps a span iff its offset is at or past the end of the last kept span;
/// `sort_spans` orders ties by longest match first, so the longest span at a
/// given offset wins.
pub fn normalize_disjoint(spans: &[Span]) -> Vec<Span> {
    let mut candidates: Vec<Span> = spans.to_vec();
    sort_spans(&mut candidates);

    let mut kept: Vec<Span> = Vec::with_capacity(candidates.len());
    let mut last_end = i64::MIN;
    for span in candidates {
        if span.offset >= last_end {
            last_end = span.end();
            kept.push(span);
        }
    }
    kept
}

/// Merges sorted, internally-disjoint user spans `user` with sorted,
/// internally-disjoint auto-detected spans `auto`: any auto span overlapping
/// any user span is dropped, the rest are interleaved in offset order.
pub fn merge_user_detected(user: &[Span], auto: &[Span]) -> Vec<Span> {
    let mut merged: Vec<Span> = Vec::with_capacity(user.len() + auto.len());
    merged.extend_from_slice(user);
    'auto: for a in auto {
        for u in user {
            if a.offset < u.end() && u.offset < a.end() {
                continue 'auto;
            }
        }
        merged.push(a.clone());
    }
    sort_spans(&mut merged);
    merged
}
