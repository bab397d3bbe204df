//! Benchmark settings, read from the environment.

use crate::cases::Sweeps;
use anyhow::{bail, Result};
use bench_core::config::{database_url, env_or, parse_count_list};
use std::env;

pub const LOG_LEVEL_VAR: &str = "PLBENCH_LOG_LEVEL";
pub const LOG_FILE_VAR: &str = "PLBENCH_LOG_FILE";
pub const LOOP_COUNTS_VAR: &str = "PLBENCH_LOOP_COUNTS";
pub const ITERATIONS_VAR: &str = "PLBENCH_ITERATIONS";
pub const SAMPLES_VAR: &str = "PLBENCH_SAMPLES";
pub const WARMUP_VAR: &str = "PLBENCH_WARMUP";
pub const FILTER_VAR: &str = "PLBENCH_FILTER";

/// Settings for the standalone report runner. Criterion picks its own
/// iteration counts and ignores these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerSettings {
    /// Iterations per timed invocation.
    pub iterations: u64,
    /// Timed invocations per case run.
    pub samples: usize,
    /// Untimed invocations before sampling.
    pub warmup: usize,
    /// Only case runs whose id contains this substring are run.
    pub filter: Option<String>,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            iterations: 1,
            samples: 10,
            warmup: 1,
            filter: None,
        }
    }
}

impl RunnerSettings {
    pub fn selects(&self, run_id: &str) -> bool {
        self.filter
            .as_deref()
            .map_or(true, |filter| run_id.contains(filter))
    }
}

#[derive(Debug, Clone)]
pub struct BenchConfig {
    pub database_url: String,
    pub sweeps: Sweeps,
    pub runner: RunnerSettings,
}

impl BenchConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = RunnerSettings::default();
        let runner = RunnerSettings {
            iterations: env_or(ITERATIONS_VAR, defaults.iterations)?,
            samples: env_or(SAMPLES_VAR, defaults.samples)?,
            warmup: env_or(WARMUP_VAR, defaults.warmup)?,
            filter: env::var(FILTER_VAR).ok().filter(|f| !f.trim().is_empty()),
        };
        if runner.iterations == 0 || runner.samples == 0 {
            bail!("{ITERATIONS_VAR} and {SAMPLES_VAR} must be at least 1");
        }

        Ok(Self {
            database_url: database_url()?,
            sweeps: sweeps_from_env()?,
            runner,
        })
    }
}

/// Default sweeps, with the shared loop counts replaced by
/// `PLBENCH_LOOP_COUNTS` when it is set.
pub fn sweeps_from_env() -> Result<Sweeps> {
    let mut sweeps = Sweeps::default();
    if let Ok(raw) = env::var(LOOP_COUNTS_VAR) {
        sweeps.loop_counts = parse_count_list(&raw)?;
    }
    Ok(sweeps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_matches_substrings_of_run_ids() {
        let settings = RunnerSettings {
            filter: Some("perl".to_string()),
            ..RunnerSettings::default()
        };
        assert!(settings.selects("select_call_perl_add/1000000 rows"));
        assert!(!settings.selects("select_1"));
    }

    #[test]
    fn no_filter_selects_everything() {
        assert!(RunnerSettings::default().selects("anything"));
    }
}
