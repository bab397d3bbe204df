//! Report module: per-case latency summary printed by the standalone runner.

use crate::cases::{CaseRun, Scale, ScaleUnit};
use std::time::Duration;

/// Samples collected for one case run.
#[derive(Debug, Clone)]
pub struct CaseResult {
    pub run_id: String,
    pub scale: Option<Scale>,
    /// Iterations inside each timed sample.
    pub iterations: u64,
    pub sample_durations: Vec<Duration>,
}

impl CaseResult {
    pub fn new(run: &CaseRun, iterations: u64) -> Self {
        Self {
            run_id: run.id(),
            scale: run.scale,
            iterations: iterations.max(1),
            sample_durations: Vec::new(),
        }
    }

    pub fn add_sample(&mut self, elapsed: Duration) {
        self.sample_durations.push(elapsed);
    }

    /// Per-iteration latencies of every sample, in microseconds.
    fn iteration_us(&self) -> Vec<f64> {
        self.sample_durations
            .iter()
            .map(|d| d.as_secs_f64() * 1e6 / self.iterations as f64)
            .collect()
    }

    /// Mean latency of one iteration in microseconds.
    pub fn mean_us(&self) -> f64 {
        let samples = self.iteration_us();
        if samples.is_empty() {
            return 0.0;
        }
        samples.iter().sum::<f64>() / samples.len() as f64
    }

    pub fn percentile_us(&self, pct: f64) -> f64 {
        let mut sorted = self.iteration_us();
        if sorted.is_empty() {
            return 0.0;
        }
        sorted.sort_by(f64::total_cmp);
        let idx = ((pct / 100.0) * (sorted.len() - 1) as f64).round() as usize;
        sorted[idx.min(sorted.len() - 1)]
    }

    /// Mean cost of one inner loop step (or one row, or one batched query)
    /// in nanoseconds. `None` for unscaled cases.
    pub fn per_unit_ns(&self) -> Option<f64> {
        let scale = self.scale?;
        if scale.count <= 0 {
            return None;
        }
        Some(self.mean_us() * 1000.0 / scale.count as f64)
    }
}

/// Print a table of results in the order the cases were run.
pub fn print_report(results: &[CaseResult]) {
    println!("\n{}", "=".repeat(96));
    println!("  PostgreSQL procedural language latency report");
    println!("{}", "=".repeat(96));

    if results.is_empty() {
        println!("  No case runs matched.");
        println!();
        return;
    }

    println!(
        "  {:48} {:>10} {:>10} {:>10} {:>12}",
        "Case", "Mean (µs)", "p50 (µs)", "p95 (µs)", "Per unit"
    );
    println!("  {}", "-".repeat(94));
    for r in results {
        let per_unit = match (r.per_unit_ns(), r.scale) {
            (Some(ns), Some(scale)) => format!("{ns:.1}ns/{}", unit_singular(&scale)),
            _ => "-".to_string(),
        };
        println!(
            "  {:48} {:>10.1} {:>10.1} {:>10.1} {:>12}",
            r.run_id,
            r.mean_us(),
            r.percentile_us(50.0),
            r.percentile_us(95.0),
            per_unit
        );
    }
    println!();
}

fn unit_singular(scale: &Scale) -> &'static str {
    match scale.unit {
        ScaleUnit::Loops => "loop",
        ScaleUnit::Rows => "row",
        ScaleUnit::Queries => "query",
    }
}
