// Copyright 2021-2025 Martin Pool

//! The Coverage Provider external interface: reports which source lines are
//! covered by the existing test suite, so the orchestrator can skip mutating
//! lines nothing exercises.
//!
//! A coverage provider raising an error is always recovered locally by the
//! orchestrator (`coverageDataUnavailable`) rather than propagated: coverage
//! is an optimization, not a correctness requirement.

use camino::Utf8Path;

use crate::Result;

/// Supplies per-file line coverage.
pub trait CoverageProvider: Send + Sync {
    /// The set of covered 1-based line numbers in `for_file` (a path inside
    /// `package_path`), or `None` if coverage data isn't available for this
    /// file.
    ///
    /// An `Err` here is always recovered locally by the orchestrator
    /// (coverage is an optimization, not a correctness requirement): it logs
    /// a warning and skips the coverage filter for this file rather than
    /// propagating.
    fn covered_lines(&self, for_file: &Utf8Path, package_path: &Utf8Path) -> Result<Option<Vec<usize>>>;
}

/// A [CoverageProvider] that reports nothing is covered-filtered: every line
/// is treated as covered. Useful when no coverage data source is wired up.
#[derive(Debug, Default)]
pub struct NoCoverageFilter;

impl CoverageProvider for NoCoverageFilter {
    fn covered_lines(&self, _for_file: &Utf8Path, _package_path: &Utf8Path) -> Result<Option<Vec<usize>>> {
        Ok(None)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn no_coverage_filter_reports_none() {
        let provider = NoCoverageFilter;
        let path = Utf8Path::new("src/lib.rs");
        assert_eq!(provider.covered_lines(path, path).unwrap(), None);
    }
}
