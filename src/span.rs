// Copyright 2021-2025 Martin Pool

//! Locations (line/column) and spans between them in source code, plus a
//! byte-offset index used to translate those spans into UTF-8 byte ranges.
//!
//! [LineColumn]/[Span] are similar to, and can be derived from,
//! [proc_macro2::Span] and [proc_macro2::LineColumn], but are a bit more
//! convenient for our purposes, and `proc_macro2` itself never exposes byte
//! offsets: [LineIndex] fills that gap from the raw source text.

use std::fmt;

use serde::Serialize;

/// A (line, column) position in a source file.
#[derive(Clone, Copy, Eq, PartialEq, Serialize)]
pub struct LineColumn {
    /// 1-based line number.
    pub line: usize,

    /// 1-based column, measured in chars.
    pub column: usize,
}

impl From<proc_macro2::LineColumn> for LineColumn {
    fn from(l: proc_macro2::LineColumn) -> Self {
        LineColumn {
            line: l.line,
            column: l.column + 1,
        }
    }
}

impl fmt::Debug for LineColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LineColumn({}, {})", self.line, self.column)
    }
}

/// A contiguous text span in a file, identified by line/column.
#[derive(Clone, Copy, Eq, PartialEq, Serialize)]
pub struct Span {
    /// The *inclusive* position where the span starts.
    pub start: LineColumn,
    /// The *exclusive* position where the span ends.
    pub end: LineColumn,
}

impl Span {
    pub fn quad(start_line: usize, start_column: usize, end_line: usize, end_column: usize) -> Self {
        Span {
            start: LineColumn { line: start_line, column: start_column },
            end: LineColumn { line: end_line, column: end_column },
        }
    }

    /// Return the region of a multi-line string that this span covers.
    pub fn extract(&self, s: &str) -> String {
        let mut r = String::new();
        let mut line_no = 1;
        let mut col_no = 1;
        let start = self.start;
        let end = self.end;
        for c in s.chars() {
            if ((line_no == start.line && col_no >= start.column) || line_no > start.line)
                && (line_no < end.line || (line_no == end.line && col_no < end.column))
            {
                r.push(c);
            }
            if c == '\n' {
                line_no += 1;
                if line_no > end.line {
                    break;
                }
                col_no = 1;
            } else if c == '\r' {
                // counts as part of the last column, not a separate column
            } else {
                col_no += 1;
            }
            if line_no == end.line && col_no >= end.column {
                break;
            }
        }
        r
    }

    /// Return a copy of `s` with the region identified by this span replaced by `replacement`.
    pub fn replace(&self, s: &str, replacement: &str) -> String {
        let mut r = String::with_capacity(s.len() + replacement.len());
        let mut line_no = 1;
        let mut col_no = 1;
        let start = self.start;
        let end = self.end;
        for c in s.chars() {
            if line_no == start.line && col_no == start.column {
                r.push_str(replacement);
            }
            if line_no < start.line
                || line_no > end.line
                || (line_no == start.line && col_no < start.column)
                || (line_no == end.line && col_no >= end.column)
            {
                r.push(c);
            }
            if c == '\n' {
                line_no += 1;
                col_no = 1;
            } else if c == '\r' {
                // counts as part of the last column, not a separate column
            } else {
                col_no += 1;
            }
        }
        if line_no == start.line && col_no == start.column {
            r.push_str(replacement);
        }
        r
    }
}

impl From<proc_macro2::Span> for Span {
    fn from(s: proc_macro2::Span) -> Self {
        Span { start: s.start().into(), end: s.end().into() }
    }
}

impl From<&proc_macro2::Span> for Span {
    fn from(s: &proc_macro2::Span) -> Self {
        Span { start: s.start().into(), end: s.end().into() }
    }
}

impl From<proc_macro2::extra::DelimSpan> for Span {
    fn from(s: proc_macro2::extra::DelimSpan) -> Self {
        let joined = s.join();
        Span { start: joined.start().into(), end: joined.end().into() }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Span({}, {}, {}, {})", self.start.line, self.start.column, self.end.line, self.end.column)
    }
}

/// Maps (line, column) positions to UTF-8 byte offsets within a source file.
///
/// Built once per file; every mutation site discovered in that file reuses
/// it to compute `utf8Offset`/`utf8Length` without rescanning from the start
/// each time.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offset of the start of each line (0-based index = line - 1).
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        LineIndex { line_starts }
    }

    /// Convert a 1-based (line, column-in-chars) position to a UTF-8 byte offset.
    ///
    /// Returns the byte length of the file if the position is past the end.
    pub fn byte_offset(&self, source: &str, pos: LineColumn) -> usize {
        let Some(&line_start) = self.line_starts.get(pos.line.saturating_sub(1)) else {
            return source.len();
        };
        let line_end = self
            .line_starts
            .get(pos.line)
            .copied()
            .unwrap_or(source.len());
        let line = &source[line_start..line_end];
        let mut byte_offset = line_start;
        for (char_index, (byte_index, _)) in line.char_indices().enumerate() {
            if char_index + 1 == pos.column {
                return line_start + byte_index;
            }
            byte_offset = line_start + byte_index + line[byte_index..].chars().next().map_or(0, char::len_utf8);
        }
        byte_offset
    }

    /// Convert a [Span] to a `(utf8Offset, utf8Length)` pair within `source`.
    pub fn byte_range(&self, source: &str, span: Span) -> (usize, usize) {
        let start = self.byte_offset(source, span.start);
        let end = self.byte_offset(source, span.end);
        (start, end.saturating_sub(start))
    }
}

#[cfg(test)]
mod test {
    use indoc::indoc;

    use super::*;

    #[test]
    fn linecolumn_debug_form() {
        let lc = LineColumn { line: 1, column: 2 };
        assert_eq!(format!("{lc:?}"), "LineColumn(1, 2)");
    }

    #[test]
    fn span_debug_form() {
        let span = Span::quad(1, 2, 3, 4);
        assert_eq!(format!("{span:?}"), "Span(1, 2, 3, 4)");
    }

    #[test]
    fn byte_offset_ascii() {
        let source = "fn foo() {\n    bar();\n}\n";
        let index = LineIndex::new(source);
        // "bar" starts at line 2, column 5 (1-based chars)
        let offset = index.byte_offset(source, LineColumn { line: 2, column: 5 });
        assert_eq!(&source[offset..offset + 3], "bar");
    }

    #[test]
    fn byte_offset_multibyte() {
        // "é" is 2 bytes in utf-8 but one char/column.
        let source = "let s = \"é\";\nlet t = 1;\n";
        let index = LineIndex::new(source);
        let offset = index.byte_offset(source, LineColumn { line: 2, column: 5 });
        assert_eq!(&source[offset..offset + 1], "t");
    }

    #[test]
    fn byte_range_matches_extract() {
        let source = indoc! { r#"
            fn foo() {
                some();
                stuff();
            }

            const BAR: u32 = 32;
        "# };
        let span = Span::quad(1, 10, 4, 2);
        let index = LineIndex::new(source);
        let (offset, len) = index.byte_range(source, span);
        assert_eq!(&source[offset..offset + len], span.extract(source));
    }
}
