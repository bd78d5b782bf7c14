// Copyright 2021-2025 Martin Pool

//! Runs the whole per-file pipeline: discover, filter, establish a baseline,
//! then evaluate every surviving mutant one at a time.
//!
//! Builds on the same `experiment`/`test_clean`/`test_mutation` shape used
//! elsewhere in this codebase, generalized from "build a scratch copy of the
//! whole tree and shell out to build bookkeeping" to a single-file,
//! single-resource contract: exactly one mutant exists on disk at a time,
//! and the file is always restored before this function returns or raises.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use camino::Utf8Path;
use tracing::{info, info_span, warn};

use crate::config::OrchestratorConfig;
use crate::coverage::CoverageProvider;
use crate::equivalence::filter_equivalent_sites;
use crate::error::Error;
use crate::outcome::{BaselineResult, MutationOutcome, MutationReport, MutationResult};
use crate::progress::{NullProgressSink, ProgressEvent, ProgressSink};
use crate::runner::{RunStatus, TestRunner};
use crate::site::MutationSite;
use crate::source_file::SourceFileManager;
use crate::tailored::TailoredOperatorConfig;
use crate::test_filter::TestFilterResolver;
use crate::Result;

/// Everything the orchestrator needs beyond the file itself and the config.
///
/// Grouped into one struct because every field is an external collaborator
/// given to the core as a named interface, and the entry point otherwise
/// grows an unreadable parameter list.
pub struct OrchestratorInputs<'a> {
    /// Root of the package the test runner invokes commands against. The
    /// mutated file lives somewhere under this directory, but test/build
    /// commands always run with `package_path` as their working directory.
    pub package_path: &'a Utf8Path,
    pub test_filter: Option<&'a str>,
    pub test_filter_resolver: Option<&'a dyn TestFilterResolver>,
    pub lines_restriction: Option<&'a HashSet<usize>>,
    pub baseline_override: Option<BaselineResult>,
    pub tailored: &'a TailoredOperatorConfig,
    pub runner: &'a dyn TestRunner,
    pub coverage: Option<&'a dyn CoverageProvider>,
    pub progress: &'a dyn ProgressSink,
}

impl<'a> OrchestratorInputs<'a> {
    /// Construct inputs with no line restriction, no coverage provider, and a
    /// [NullProgressSink], for the common case of mutating a whole file.
    pub fn new(package_path: &'a Utf8Path, runner: &'a dyn TestRunner, tailored: &'a TailoredOperatorConfig) -> Self {
        OrchestratorInputs {
            package_path,
            test_filter: None,
            test_filter_resolver: None,
            lines_restriction: None,
            baseline_override: None,
            tailored,
            runner,
            coverage: None,
            progress: &NullProgressSink,
        }
    }
}

/// Run the full pipeline against `source_path`, returning a report of every
/// mutant evaluated.
///
/// Either this returns `Ok`, with the file restored to its original
/// contents, or it returns `Err`, also with the file restored — except for
/// [Error::BackupRestoreFailed], which is the one error that is allowed to
/// leave the working tree dirty.
pub fn run_orchestrator(source_path: &Utf8Path, config: &OrchestratorConfig, inputs: &OrchestratorInputs) -> Result<MutationReport> {
    let _span = info_span!("orchestrator", path = %source_path).entered();

    // Phase 1: Recovery.
    let mut manager = SourceFileManager::open(source_path)?;
    manager.restore_if_needed()?;

    // Phase 2: Snapshot.
    manager.backup()?;
    let result = run_pipeline(&manager, config, inputs);

    // Phase 10: Restore, on every exit path.
    match &result {
        Ok(_) => manager.restore()?,
        Err(Error::BackupRestoreFailed { .. }) => {}
        Err(_) => {
            if let Err(restore_err) = manager.restore() {
                warn!(?restore_err, "failed to restore source file after an earlier error");
            }
        }
    }
    result
}

fn run_pipeline(manager: &SourceFileManager, config: &OrchestratorConfig, inputs: &OrchestratorInputs) -> Result<MutationReport> {
    let source = manager.original_text();

    // An explicit filter always wins; otherwise ask the resolver, if any,
    // for one derived from the file under test.
    let resolved_test_filter = inputs
        .test_filter_resolver
        .and_then(|resolver| resolver.resolve(manager.path()));
    let filter = inputs.test_filter.or(resolved_test_filter.as_deref());

    // Phase 3: Discover.
    let mut sites = crate::discover::discover_mutation_sites(source, inputs.tailored)?;

    // Phase 4: Filter: equivalence.
    sites = filter_equivalent_sites(sites);

    // Phase 5: Filter: lines.
    if let Some(lines) = inputs.lines_restriction {
        sites.retain(|site| lines.contains(&site.span.start.line));
    }

    // Phase 6: Filter: coverage.
    if let Some(coverage) = inputs.coverage {
        match coverage.covered_lines(manager.path(), inputs.package_path) {
            Ok(Some(covered)) => {
                let covered: HashSet<usize> = covered.into_iter().collect();
                sites.retain(|site| covered.contains(&site.span.start.line));
            }
            Ok(None) => {}
            Err(err) => {
                warn!(?err, "coverage data unavailable; skipping the coverage filter for this file");
            }
        }
    }

    inputs.progress.on_event(ProgressEvent::CandidateSitesDiscovered { count: sites.len() });

    // Phase 7: Early exit.
    if sites.is_empty() {
        return Ok(MutationReport::new(manager.path().to_owned(), Duration::ZERO));
    }

    // Phase 8: Baseline.
    let baseline = establish_baseline(config, inputs, filter)?;

    // Phase 9: Mutation loop.
    let mut report = MutationReport::new(manager.path().to_owned(), baseline.duration);
    let mut processed_mutations: u32 = 0;
    let mut build_errors_seen: u32 = 0;
    let mut build_first_mode = false;
    let total = sites.len();

    for (index, site) in sites.into_iter().enumerate() {
        let mutated_text = site.apply(source);
        manager.write_mutated(&mutated_text)?;

        let timeout = config.mutant_timeout(baseline.duration);
        let (status, duration) = evaluate_one_mutant(inputs, config, &site, filter, timeout, build_first_mode);
        let outcome = classify(status);
        if outcome == MutationOutcome::BuildError {
            build_errors_seen += 1;
        }
        processed_mutations += 1;

        let result = MutationResult { site, outcome, duration };
        inputs.progress.on_event(ProgressEvent::MutationEvaluated { result: &result, index: index + 1, total });
        report.push(result);

        if !build_first_mode
            && inputs.runner.as_split_build().is_some()
            && processed_mutations >= config.build_first_sample_size
            && f64::from(build_errors_seen) / f64::from(processed_mutations) >= config.build_first_error_ratio
        {
            info!("latching into build-first mode for the remainder of this file");
            build_first_mode = true;
        }
    }

    Ok(report)
}

fn establish_baseline(config: &OrchestratorConfig, inputs: &OrchestratorInputs, filter: Option<&str>) -> Result<BaselineResult> {
    if let Some(baseline) = &inputs.baseline_override {
        return Ok(baseline.clone());
    }
    inputs.progress.on_event(ProgressEvent::BaselineStarted { filter });
    let hard_cap = std::cmp::min(config.baseline_timeout, Duration::from_secs(600));
    let (status, duration) = inputs.runner.run_baseline(inputs.package_path, filter, hard_cap)?;
    let baseline = BaselineResult { passed: status == RunStatus::Passed, duration };
    let timeout = config.mutant_timeout(baseline.duration);
    inputs.progress.on_event(ProgressEvent::BaselineFinished { result: &baseline, timeout });
    match status {
        RunStatus::Passed => Ok(baseline),
        RunStatus::NoTests => Err(Error::NoTestsExecuted { filter: filter.map(str::to_owned) }),
        _ => Err(Error::BaselineTestsFailed),
    }
}

/// Run one mutant to completion, with timeout retries, never propagating an
/// error: any failure from the runner becomes [RunStatus::BuildError] for
/// this site so the loop can continue onto the next mutant.
fn evaluate_one_mutant(
    inputs: &OrchestratorInputs,
    config: &OrchestratorConfig,
    site: &MutationSite,
    filter: Option<&str>,
    timeout: Duration,
    build_first_mode: bool,
) -> (RunStatus, Duration) {
    let start = Instant::now();
    let mut attempts = 0;
    loop {
        let status = run_once(inputs, config, site, filter, timeout, build_first_mode);
        if status == RunStatus::Timeout && attempts < config.timeout_retries {
            attempts += 1;
            continue;
        }
        return (status, start.elapsed());
    }
}

fn run_once(
    inputs: &OrchestratorInputs,
    config: &OrchestratorConfig,
    site: &MutationSite,
    filter: Option<&str>,
    timeout: Duration,
    build_first_mode: bool,
) -> RunStatus {
    let outcome = if build_first_mode {
        run_build_first(inputs, filter, timeout)
    } else {
        inputs.runner.run_tests(inputs.package_path, filter, timeout)
    };
    outcome.unwrap_or_else(|err| {
        warn!(?err, operator = ?site.operator, "test runner raised an error; classifying as buildError");
        let _ = config;
        RunStatus::BuildError
    })
}

fn run_build_first(inputs: &OrchestratorInputs, filter: Option<&str>, timeout: Duration) -> Result<RunStatus> {
    let split = inputs.runner.as_split_build().expect("build-first mode requires a split-build-capable runner");
    match split.run_build(inputs.package_path, timeout)? {
        RunStatus::Passed => split.run_tests_without_build(inputs.package_path, filter, timeout),
        other => Ok(other),
    }
}

fn classify(status: RunStatus) -> MutationOutcome {
    match status {
        RunStatus::Passed => MutationOutcome::Survived,
        RunStatus::Failed => MutationOutcome::Killed,
        RunStatus::Timeout => MutationOutcome::Timeout,
        RunStatus::BuildError | RunStatus::NoTests => MutationOutcome::BuildError,
    }
}

#[cfg(test)]
mod test {
    use std::cell::Cell;
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    /// A fake runner whose outcome is driven entirely by whether the file on
    /// disk currently contains the string `"SURVIVE"`, so tests don't depend
    /// on a real cargo toolchain being available.
    struct FakeRunner {
        calls: Cell<u32>,
    }

    impl TestRunner for FakeRunner {
        fn run_tests(&self, package_path: &Utf8Path, _filter: Option<&str>, _timeout: Duration) -> Result<RunStatus> {
            self.calls.set(self.calls.get() + 1);
            let text = fs::read_to_string(package_path).unwrap();
            Ok(if text.contains("SURVIVE") { RunStatus::Passed } else { RunStatus::Failed })
        }

        fn run_baseline(&self, package_path: &Utf8Path, filter: Option<&str>, timeout: Duration) -> Result<(RunStatus, Duration)> {
            Ok((self.run_tests(package_path, filter, timeout)?, Duration::from_millis(1)))
        }
    }

    fn write_source(dir: &tempfile::TempDir, text: &str) -> camino::Utf8PathBuf {
        let path = Utf8Path::from_path(dir.path()).unwrap().join("lib.rs");
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn empty_after_filter_produces_no_runner_calls() {
        crate::testing::init_tracing_for_tests();
        let dir = tempdir().unwrap();
        // `new` constructors are skipped by discovery, and this body has
        // nothing else mutable, so every candidate site is filtered away.
        let path = write_source(&dir, "struct S;\nimpl S {\n    fn new() -> Self { SURVIVE; S }\n}\n");
        let runner = FakeRunner { calls: Cell::new(0) };
        let tailored = TailoredOperatorConfig::default();
        let config = OrchestratorConfig::default();
        let inputs = OrchestratorInputs::new(&path, &runner, &tailored);
        let report = run_orchestrator(&path, &config, &inputs).unwrap();
        assert_eq!(report.total(), 0);
        assert_eq!(runner.calls.get(), 0);
        assert_eq!(report.baseline_duration, Duration::ZERO);
        assert_eq!(report.source_file, path);
        assert_eq!(fs::read_to_string(&path).unwrap(), "struct S;\nimpl S {\n    fn new() -> Self { SURVIVE; S }\n}\n");
    }

    #[test]
    fn mutants_are_evaluated_and_file_is_restored() {
        let dir = tempdir().unwrap();
        let original = "fn f(a: i32, b: i32) -> bool {\n    SURVIVE;\n    a > b\n}\n";
        let path = write_source(&dir, original);
        let runner = FakeRunner { calls: Cell::new(0) };
        let tailored = TailoredOperatorConfig::default();
        let config = OrchestratorConfig::default();
        let inputs = OrchestratorInputs::new(&path, &runner, &tailored);

        let report = run_orchestrator(&path, &config, &inputs).unwrap();

        assert!(report.total() > 0);
        // Every mutant replaces `SURVIVE;` or deletes it, so the marker
        // disappears from the on-disk text during each trial and every
        // mutant is classified as killed by this fake runner.
        assert_eq!(report.count(MutationOutcome::Killed), report.total());
        assert_eq!(report.baseline_duration, Duration::from_millis(1));
        assert_eq!(report.source_file, path);
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn resolved_filter_is_used_when_no_explicit_filter_is_given() {
        struct FilterSpyRunner {
            seen_filter: std::cell::RefCell<Option<String>>,
        }

        impl TestRunner for FilterSpyRunner {
            fn run_tests(&self, package_path: &Utf8Path, filter: Option<&str>, _timeout: Duration) -> Result<RunStatus> {
                *self.seen_filter.borrow_mut() = filter.map(str::to_owned);
                let text = fs::read_to_string(package_path).unwrap();
                Ok(if text.contains("SURVIVE") { RunStatus::Passed } else { RunStatus::Failed })
            }
        }

        struct FixedResolver;
        impl crate::test_filter::TestFilterResolver for FixedResolver {
            fn resolve(&self, _source_file: &Utf8Path) -> Option<String> {
                Some("resolved_filter".to_owned())
            }
        }

        let dir = tempdir().unwrap();
        let original = "fn f(a: i32, b: i32) -> bool {\n    SURVIVE;\n    a > b\n}\n";
        let path = write_source(&dir, original);
        let runner = FilterSpyRunner { seen_filter: std::cell::RefCell::new(None) };
        let tailored = TailoredOperatorConfig::default();
        let config = OrchestratorConfig::default();
        let resolver = FixedResolver;
        let mut inputs = OrchestratorInputs::new(&path, &runner, &tailored);
        inputs.test_filter_resolver = Some(&resolver);

        run_orchestrator(&path, &config, &inputs).unwrap();
        assert_eq!(runner.seen_filter.borrow().as_deref(), Some("resolved_filter"));
    }

    #[test]
    fn explicit_filter_wins_over_resolved_filter() {
        struct FilterSpyRunner {
            seen_filter: std::cell::RefCell<Option<String>>,
        }

        impl TestRunner for FilterSpyRunner {
            fn run_tests(&self, package_path: &Utf8Path, filter: Option<&str>, _timeout: Duration) -> Result<RunStatus> {
                *self.seen_filter.borrow_mut() = filter.map(str::to_owned);
                let text = fs::read_to_string(package_path).unwrap();
                Ok(if text.contains("SURVIVE") { RunStatus::Passed } else { RunStatus::Failed })
            }
        }

        struct FixedResolver;
        impl crate::test_filter::TestFilterResolver for FixedResolver {
            fn resolve(&self, _source_file: &Utf8Path) -> Option<String> {
                Some("resolved_filter".to_owned())
            }
        }

        let dir = tempdir().unwrap();
        let original = "fn f(a: i32, b: i32) -> bool {\n    SURVIVE;\n    a > b\n}\n";
        let path = write_source(&dir, original);
        let runner = FilterSpyRunner { seen_filter: std::cell::RefCell::new(None) };
        let tailored = TailoredOperatorConfig::default();
        let config = OrchestratorConfig::default();
        let resolver = FixedResolver;
        let mut inputs = OrchestratorInputs::new(&path, &runner, &tailored);
        inputs.test_filter_resolver = Some(&resolver);
        inputs.test_filter = Some("explicit_filter");

        run_orchestrator(&path, &config, &inputs).unwrap();
        assert_eq!(runner.seen_filter.borrow().as_deref(), Some("explicit_filter"));
    }

    #[test]
    fn baseline_failure_raises_and_restores() {
        let dir = tempdir().unwrap();
        let original = "fn f(a: i32, b: i32) -> bool {\n    a > b\n}\n";
        let path = write_source(&dir, original);
        let runner = FakeRunner { calls: Cell::new(0) }; // no SURVIVE marker: baseline itself fails
        let tailored = TailoredOperatorConfig::default();
        let config = OrchestratorConfig::default();
        let inputs = OrchestratorInputs::new(&path, &runner, &tailored);

        let err = run_orchestrator(&path, &config, &inputs).unwrap_err();
        assert!(matches!(err, Error::BaselineTestsFailed));
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }
}
