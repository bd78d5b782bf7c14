// Copyright 2021-2025 Martin Pool

//! Pure application of a [MutationSite] to source text.
//!
//! This mirrors `Span::replace`, generalized to operate on UTF-8 byte offsets
//! rather than line/column pairs so replacement is exact regardless of
//! multibyte characters earlier in the file, and to defensively no-op rather
//! than panic if a site's offsets no longer match the text it is given (the
//! text changed out from under the caller, or the site was computed against
//! a different revision of the file).

use tracing::warn;

use crate::site::MutationSite;

/// Return a copy of `source` with `site`'s original region replaced by its
/// mutated text.
///
/// If `site`'s recorded `original_text` no longer matches the bytes at
/// `utf8_offset..utf8_offset+utf8_length` in `source`, this returns `source`
/// unchanged rather than corrupting the file; callers should treat that as a
/// sign the site is stale.
pub fn apply(source: &str, site: &MutationSite) -> String {
    let start = site.utf8_offset;
    let end = start + site.utf8_length;
    if end > source.len() || !source.is_char_boundary(start) || !source.is_char_boundary(end) {
        warn!(?site, "mutation site offsets are out of bounds for source; skipping");
        return source.to_owned();
    }
    if &source[start..end] != site.original_text {
        warn!(?site, "mutation site original text does not match source; skipping");
        return source.to_owned();
    }
    let mut out = String::with_capacity(source.len() + site.mutated_text.len());
    out.push_str(&source[..start]);
    out.push_str(&site.mutated_text);
    out.push_str(&source[end..]);
    out
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::operator::MutationOperator;
    use crate::span::{LineIndex, Span};

    fn site(source: &str, span: Span, mutated_text: &str) -> MutationSite {
        let line_index = LineIndex::new(source);
        MutationSite::new(
            MutationOperator::ArithmeticOperatorSwap,
            None,
            span,
            source,
            &line_index,
            mutated_text.to_owned(),
            None,
        )
    }

    #[test]
    fn replaces_matching_region() {
        let source = "let x = 1 + 2;\n";
        let s = site(source, Span::quad(1, 9, 1, 14), "1 - 2");
        assert_eq!(apply(source, &s), "let x = 1 - 2;\n");
    }

    #[test]
    fn stale_site_is_a_no_op() {
        let source = "let x = 1 + 2;\n";
        let mut s = site(source, Span::quad(1, 9, 1, 14), "1 - 2");
        s.original_text = "mismatched".to_owned();
        assert_eq!(apply(source, &s), source);
    }

    #[test]
    fn out_of_bounds_is_a_no_op() {
        let source = "short";
        let mut s = site(source, Span::quad(1, 1, 1, 2), "x");
        s.utf8_offset = 100;
        s.utf8_length = 1;
        assert_eq!(apply(source, &s), source);
    }
}
