// Copyright 2021-2025 Martin Pool

//! The outcome of testing one mutant, and the report produced for a whole file.

use std::time::Duration;

use camino::Utf8PathBuf;
use serde::Serialize;

use crate::site::MutationSite;

/// The classification of a single mutant, after the applicable outcome table
/// (passed -> survived, failed -> killed, timeout -> timeout, buildError ->
/// buildError, noTests -> buildError) has been applied to the raw test-runner
/// result.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub enum MutationOutcome {
    /// The mutant was caught: some test failed.
    Killed,
    /// No test failed; the mutant survived.
    Survived,
    /// The test run exceeded its timeout, even after retries.
    Timeout,
    /// The mutated tree failed to build, or the runner raised an error.
    BuildError,
    /// The site was never evaluated (e.g. dropped by a filter upstream of testing).
    Skipped,
}

/// The result of running the baseline (unmutated) build and test suite once,
/// before any mutants are tried.
#[derive(Debug, Clone)]
pub struct BaselineResult {
    pub passed: bool,
    pub duration: Duration,
}

/// The result of evaluating one [MutationSite].
#[derive(Debug, Clone)]
pub struct MutationResult {
    pub site: MutationSite,
    pub outcome: MutationOutcome,
    pub duration: Duration,
}

/// The aggregate result of running the whole per-file pipeline once.
#[derive(Debug, Clone, Default)]
pub struct MutationReport {
    /// The file these mutants were generated from. Empty when the report
    /// does not (yet) know its own path, e.g. a `Default`-constructed report
    /// under test.
    pub source_file: Utf8PathBuf,
    /// The measured baseline test-suite duration, in seconds. `0` when no
    /// baseline run occurred, such as the early-exit report produced when
    /// every candidate site was filtered away before testing.
    pub baseline_duration: Duration,
    pub results: Vec<MutationResult>,
}

impl MutationReport {
    /// A report for `source_file` with the given baseline duration and no
    /// results recorded yet.
    pub fn new(source_file: Utf8PathBuf, baseline_duration: Duration) -> Self {
        MutationReport { source_file, baseline_duration, results: Vec::new() }
    }

    pub fn push(&mut self, result: MutationResult) {
        self.results.push(result);
    }

    pub fn count(&self, outcome: MutationOutcome) -> usize {
        self.results.iter().filter(|r| r.outcome == outcome).count()
    }

    /// The total number of sites this report accounts for.
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// The percentage of effectively-tested mutants that were caught, counting
    /// a timeout as a catch: `(killed + timeout) / (killed + survived +
    /// timeout) * 100`. `buildError` and `skipped` mutants are excluded from
    /// both the numerator and the denominator — they never exercised the test
    /// suite against the mutant, so they carry no signal either way. Defined
    /// as `100.0` when the denominator is zero, rather than NaN.
    pub fn kill_percentage(&self) -> f64 {
        let killed = self.count(MutationOutcome::Killed);
        let survived = self.count(MutationOutcome::Survived);
        let timeout = self.count(MutationOutcome::Timeout);
        let denominator = killed + survived + timeout;
        if denominator == 0 {
            100.0
        } else {
            100.0 * (killed + timeout) as f64 / denominator as f64
        }
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::operator::MutationOperator;
    use crate::span::{LineIndex, Span};

    fn dummy_site() -> MutationSite {
        let source = "fn f() { 1 + 2; }";
        let line_index = LineIndex::new(source);
        MutationSite::new(
            MutationOperator::ArithmeticOperatorSwap,
            Some("f".to_owned()),
            Span::quad(1, 10, 1, 15),
            source,
            &line_index,
            "1 - 2".to_owned(),
            None,
        )
    }

    #[test]
    fn kill_percentage_is_100_when_empty() {
        let report = MutationReport::default();
        assert_eq!(report.kill_percentage(), 100.0);
    }

    #[test]
    fn kill_percentage_counts_correctly() {
        let mut report = MutationReport::default();
        report.push(MutationResult {
            site: dummy_site(),
            outcome: MutationOutcome::Killed,
            duration: Duration::from_secs(1),
        });
        report.push(MutationResult {
            site: dummy_site(),
            outcome: MutationOutcome::Survived,
            duration: Duration::from_secs(1),
        });
        assert_eq!(report.kill_percentage(), 50.0);
        assert_eq!(report.total(), 2);
    }
}
