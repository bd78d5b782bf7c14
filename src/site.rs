// Copyright 2021-2025 Martin Pool

//! A single candidate mutation: a location, its operator, and its replacement text.

use std::borrow::Cow;
use std::fmt;

use serde::Serialize;

use crate::operator::{Genre, MutationOperator};
use crate::span::{LineIndex, Span};

/// A candidate edit to a source file, with enough information to apply it,
/// describe it, and check that its byte offsets agree with its line/column
/// span.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct MutationSite {
    /// Which operator produced this site.
    pub operator: MutationOperator,

    /// The name of the function enclosing this site, if any.
    pub function_name: Option<String>,

    /// Line/column span of the text being replaced, kept for display.
    pub span: Span,

    /// 0-based UTF-8 byte offset where the replaced region starts.
    pub utf8_offset: usize,

    /// Length in UTF-8 bytes of the replaced region.
    pub utf8_length: usize,

    /// The exact original text being replaced, for the round-trip invariant.
    pub original_text: String,

    /// The replacement text.
    pub mutated_text: String,

    /// A short form of `original_text`, e.g. just a match pattern rather than
    /// a whole arm body; used in human-readable descriptions.
    pub short_original: Option<String>,
}

impl MutationSite {
    /// Construct a site from a span located within `source`, computing its
    /// byte offsets from `line_index`.
    pub fn new(
        operator: MutationOperator,
        function_name: Option<String>,
        span: Span,
        source: &str,
        line_index: &LineIndex,
        mutated_text: String,
        short_original: Option<String>,
    ) -> Self {
        let (utf8_offset, utf8_length) = line_index.byte_range(source, span);
        let original_text = span.extract(source);
        debug_assert_eq!(original_text, source[utf8_offset..utf8_offset + utf8_length]);
        MutationSite {
            operator,
            function_name,
            span,
            utf8_offset,
            utf8_length,
            original_text,
            mutated_text,
            short_original,
        }
    }

    pub fn genre(&self) -> Genre {
        self.operator.genre()
    }

    /// Apply this site's text substitution to the whole file, returning the
    /// mutated source text. This is a pure function: it reads `source` and
    /// returns a new `String`, it never mutates anything in place.
    pub fn apply(&self, source: &str) -> String {
        crate::applicator::apply(source, self)
    }

    /// A short, human-readable description of the change, independent of location.
    pub fn describe_change(&self) -> String {
        match self.genre() {
            Genre::FnValue => {
                let name = self.function_name.as_deref().unwrap_or("<fn>");
                format!("replace {name} with {}", self.mutated_text)
            }
            Genre::MatchArmGuard => format!(
                "replace match guard {} with {}",
                squash_lines(&self.original_text),
                self.mutated_text
            ),
            Genre::MatchArm => format!(
                "delete match arm {}",
                squash_lines(self.short_original.as_deref().unwrap_or(&self.original_text))
            ),
            Genre::StructField => format!(
                "delete field {}",
                self.short_original.as_deref().unwrap_or(&self.original_text)
            ),
            _ => {
                if self.mutated_text.is_empty() {
                    format!("delete {}", squash_lines(&self.original_text))
                } else {
                    format!(
                        "replace {} with {}",
                        squash_lines(&self.original_text),
                        self.mutated_text
                    )
                }
            }
        }
    }
}

/// Combine multiple lines into one, removing indentation following a newline.
///
/// Newlines are replaced by a space, only if there is not already a trailing space.
fn squash_lines(s: &str) -> Cow<'_, str> {
    if s.contains('\n') {
        let mut r = String::new();
        let mut in_indent = false;
        for c in s.chars() {
            match c {
                ' ' | '\t' | '\n' if in_indent => (),
                '\n' => {
                    if !r.ends_with(' ') {
                        r.push(' ');
                    }
                    in_indent = true;
                }
                c => {
                    in_indent = false;
                    r.push(c);
                }
            }
        }
        Cow::Owned(r)
    } else {
        Cow::Borrowed(s)
    }
}

impl fmt::Debug for MutationSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutationSite")
            .field("operator", &self.operator)
            .field("function_name", &self.function_name)
            .field("span", &self.span)
            .field("utf8_offset", &self.utf8_offset)
            .field("utf8_length", &self.utf8_length)
            .field("mutated_text", &self.mutated_text)
            .finish()
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::operator::MutationOperator;
    use crate::span::Span;

    #[test]
    fn squash_lines_joins_and_trims_indentation() {
        assert_eq!(squash_lines("squash_lines a b c"), "squash_lines a b c");
        assert_eq!(squash_lines("a\n    b c \n\nd  \n  e"), "a b c d  e");
    }

    #[test]
    fn byte_invariants_hold() {
        let source = "fn f() -> u32 {\n    1 + 2\n}\n";
        let line_index = LineIndex::new(source);
        let span = Span::quad(2, 5, 2, 10);
        let site = MutationSite::new(
            MutationOperator::ArithmeticOperatorSwap,
            Some("f".to_owned()),
            span,
            source,
            &line_index,
            "1 - 2".to_owned(),
            None,
        );
        assert_eq!(site.original_text, "1 + 2");
        assert_eq!(
            &source[site.utf8_offset..site.utf8_offset + site.utf8_length],
            site.original_text
        );
        let mutated = site.apply(source);
        assert_ne!(mutated, source);
        assert_eq!(
            mutated.len(),
            source.len() - site.utf8_length + site.mutated_text.len()
        );
    }
}
