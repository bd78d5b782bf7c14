// Copyright 2021-2025 Martin Pool

//! In-process configuration for the per-file orchestrator.

use std::time::Duration;

use serde::Deserialize;

/// Tunables controlling how the orchestrator paces the baseline and mutation
/// loop.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrchestratorConfig {
    /// Emit more detailed progress/log events.
    pub verbose: bool,

    /// Multiplier applied to the baseline duration to derive each mutant's
    /// test timeout: `timeout = max(baseline_duration * multiplier, minimum_timeout)`.
    pub timeout_multiplier: f64,

    /// Floor under the computed per-mutant timeout.
    pub minimum_timeout: Duration,

    /// Hard cap on how long the baseline run itself may take.
    pub baseline_timeout: Duration,

    /// How many times to retry a mutant evaluation that timed out before
    /// accepting `Timeout` as its final outcome.
    pub timeout_retries: u32,

    /// Number of mutations that must be processed before the build-first
    /// ratio check activates.
    pub build_first_sample_size: u32,

    /// Cumulative ratio of build errors to processed mutations that, once
    /// `build_first_sample_size` mutations have been processed, latches
    /// build-first mode on for the remainder of the file. Tracked as a
    /// cumulative ratio over the whole file, not a sliding window.
    pub build_first_error_ratio: f64,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        OrchestratorConfig {
            verbose: false,
            timeout_multiplier: 5.0,
            minimum_timeout: Duration::from_secs(30),
            baseline_timeout: Duration::from_secs(600),
            timeout_retries: 1,
            build_first_sample_size: 8,
            build_first_error_ratio: 0.5,
        }
    }
}

impl OrchestratorConfig {
    /// The timeout to use for one mutant's test run, given the baseline's
    /// measured duration.
    pub fn mutant_timeout(&self, baseline_duration: Duration) -> Duration {
        std::cmp::max(
            self.minimum_timeout,
            Duration::from_secs_f64(baseline_duration.as_secs_f64() * self.timeout_multiplier),
        )
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn mutant_timeout_respects_floor() {
        let config = OrchestratorConfig::default();
        assert_eq!(
            config.mutant_timeout(Duration::from_millis(10)),
            config.minimum_timeout
        );
    }

    #[test]
    fn mutant_timeout_scales_with_baseline() {
        let config = OrchestratorConfig {
            timeout_multiplier: 5.0,
            minimum_timeout: Duration::from_secs(1),
            ..OrchestratorConfig::default()
        };
        assert_eq!(
            config.mutant_timeout(Duration::from_secs(10)),
            Duration::from_secs(50)
        );
    }
}
