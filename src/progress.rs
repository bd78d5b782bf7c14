// Copyright 2021-2025 Martin Pool

//! The Progress Sink external interface: the orchestrator reports its
//! progress through four event kinds, in strict order, so a caller can drive
//! a progress bar or log stream without depending on the core's internal
//! state.

use crate::outcome::{BaselineResult, MutationResult};

/// One step of the per-file pipeline's progress, delivered in order.
#[derive(Debug, Clone)]
pub enum ProgressEvent<'a> {
    /// Discovery (and filtering) finished; this many sites remain to evaluate.
    CandidateSitesDiscovered { count: usize },
    /// The baseline build/test run has started, under `filter` if one applies.
    BaselineStarted { filter: Option<&'a str> },
    /// The baseline build/test run finished; `timeout` is the per-mutant
    /// timeout derived from `result`'s duration.
    BaselineFinished { result: &'a BaselineResult, timeout: std::time::Duration },
    /// One mutant has been evaluated.
    MutationEvaluated { result: &'a MutationResult, index: usize, total: usize },
}

/// Receives [ProgressEvent]s from the orchestrator.
///
/// Implementations must not fail: this is a reporting sink, not a control
/// point, so its methods return nothing and may not abort the pipeline.
pub trait ProgressSink: Send + Sync {
    fn on_event(&self, event: ProgressEvent<'_>);
}

/// A [ProgressSink] that records every event it receives, for tests.
#[derive(Default)]
pub struct RecordingProgressSink {
    events: std::sync::Mutex<Vec<String>>,
}

impl RecordingProgressSink {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().expect("progress sink mutex poisoned").clone()
    }
}

impl ProgressSink for RecordingProgressSink {
    fn on_event(&self, event: ProgressEvent<'_>) {
        let label = match event {
            ProgressEvent::CandidateSitesDiscovered { count } => format!("candidateSitesDiscovered({count})"),
            ProgressEvent::BaselineStarted { filter } => format!("baselineStarted({})", filter.unwrap_or("")),
            ProgressEvent::BaselineFinished { result, timeout } => {
                format!("baselineFinished(passed={}, timeout={:?})", result.passed, timeout)
            }
            ProgressEvent::MutationEvaluated { index, total, .. } => {
                format!("mutationEvaluated({index}/{total})")
            }
        };
        self.events.lock().expect("progress sink mutex poisoned").push(label);
    }
}

/// A [ProgressSink] that discards every event.
#[derive(Debug, Default)]
pub struct NullProgressSink;

impl ProgressSink for NullProgressSink {
    fn on_event(&self, _event: ProgressEvent<'_>) {}
}
