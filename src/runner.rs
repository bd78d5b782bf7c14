// Copyright 2021-2025 Martin Pool

//! The Test Runner external interface: given a package path and an optional
//! test filter, run the suite and report whether it passed, failed, timed
//! out, or the build itself failed.
//!
//! The core only depends on the trait; a concrete implementation (running
//! `cargo test`, `cargo nextest run`, or something else entirely) is the
//! caller's concern. [ProcessTestRunner] is provided as a usable default,
//! built on the same subprocess-management approach used elsewhere in this
//! codebase, because *some* concrete implementation belongs in the ambient
//! stack even though CLI argument wiring does not.

use std::time::Duration;

use camino::Utf8Path;
use subprocess::{Popen, PopenConfig, Redirection};
use tracing::{debug, warn};

use crate::error::Error;
use crate::Result;

/// The outcome of one test-runner invocation, before the orchestrator maps
/// it onto a [crate::outcome::MutationOutcome].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum RunStatus {
    Passed,
    Failed,
    Timeout,
    BuildError,
    NoTests,
}

/// Runs the test suite (and optionally the baseline and build phases) for a
/// package.
pub trait TestRunner: Send + Sync {
    /// Run the suite against `package_path`, optionally restricted by
    /// `filter`, aborting after `timeout`.
    fn run_tests(&self, package_path: &Utf8Path, filter: Option<&str>, timeout: Duration) -> Result<RunStatus>;

    /// Run the suite once against a known-clean tree, to establish the
    /// baseline duration and confirm tests pass before any mutant is tried.
    /// The default forwards to `run_tests` with the same filter.
    fn run_baseline(&self, package_path: &Utf8Path, filter: Option<&str>, timeout: Duration) -> Result<(RunStatus, Duration)> {
        let start = std::time::Instant::now();
        let status = self.run_tests(package_path, filter, timeout)?;
        Ok((status, start.elapsed()))
    }

    /// Whether this runner can separate the build phase from the test phase
    /// (used by the orchestrator's build-first mode to skip straight to a
    /// cheap build check). `None` means the capability is unavailable.
    fn as_split_build(&self) -> Option<&dyn SplitBuildCapable> {
        None
    }
}

/// Optional capability: build and test can be invoked separately, so
/// build-first mode can check buildability without paying for a full test
/// run.
pub trait SplitBuildCapable: Send + Sync {
    fn run_build(&self, package_path: &Utf8Path, timeout: Duration) -> Result<RunStatus>;
    fn run_tests_without_build(
        &self,
        package_path: &Utf8Path,
        filter: Option<&str>,
        timeout: Duration,
    ) -> Result<RunStatus>;
}

/// A [TestRunner] that invokes an external command as a subprocess.
///
/// The command is run with `cwd` set to `package_path` and `argv[0]` plus
/// any fixed arguments supplied at construction; `filter` (if present) is
/// appended as a final argument.
pub struct ProcessTestRunner {
    argv: Vec<String>,
}

impl ProcessTestRunner {
    pub fn new(argv: Vec<String>) -> Self {
        ProcessTestRunner { argv }
    }
}

impl TestRunner for ProcessTestRunner {
    fn run_tests(&self, package_path: &Utf8Path, filter: Option<&str>, timeout: Duration) -> Result<RunStatus> {
        let mut argv = self.argv.clone();
        if let Some(filter) = filter {
            argv.push(filter.to_owned());
        }
        debug!(?argv, %package_path, "running test command");
        run_subprocess(&argv, package_path, timeout)
    }
}

fn run_subprocess(argv: &[String], cwd: &Utf8Path, timeout: Duration) -> Result<RunStatus> {
    let start = std::time::Instant::now();
    let mut child = Popen::create(
        argv,
        PopenConfig {
            stdin: Redirection::None,
            stdout: Redirection::Pipe,
            stderr: Redirection::Merge,
            cwd: Some(cwd.as_os_str().to_owned()),
            ..setpgid_on_unix()
        },
    )
    .map_err(|err| Error::Io { path: cwd.to_owned(), source: std::io::Error::new(std::io::ErrorKind::Other, err) })?;

    loop {
        if start.elapsed() > timeout {
            warn!(%cwd, "test run exceeded timeout, terminating");
            terminate(&mut child);
            return Ok(RunStatus::Timeout);
        }
        match child.poll() {
            Some(status) => {
                return Ok(if status.success() {
                    RunStatus::Passed
                } else {
                    RunStatus::Failed
                });
            }
            None => std::thread::sleep(Duration::from_millis(100)),
        }
    }
}

#[cfg(unix)]
fn setpgid_on_unix() -> PopenConfig {
    PopenConfig { setpgid: true, ..Default::default() }
}

#[cfg(not(unix))]
fn setpgid_on_unix() -> PopenConfig {
    PopenConfig::default()
}

#[cfg(unix)]
fn terminate(child: &mut Popen) {
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;
    if let Some(pid) = child.pid() {
        let _ = killpg(Pid::from_raw(pid as i32), Signal::SIGTERM);
    }
    let _ = child.wait();
}

#[cfg(not(unix))]
fn terminate(child: &mut Popen) {
    let _ = child.terminate();
    let _ = child.wait();
}
