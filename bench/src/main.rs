//! Standalone runner that prints a latency report without criterion.
//!
//! Usage:
//!   pl-bench [run]     time every case run and print the report
//!   pl-bench list      print case run ids
//!   pl-bench install   create the server-side routines
//!
//! Connection string comes from `DATABASE_URL`; see `config` for the
//! remaining `PLBENCH_*` knobs.

use anyhow::{anyhow, Context, Result};
use bench_core::config::{load_dotenv, resolve_log_file, resolve_log_level};
use log::{info, LevelFilter};
use pl_bench::cases::{standard_suite, BenchCase, CaseRun};
use pl_bench::config::{sweeps_from_env, BenchConfig, LOG_FILE_VAR, LOG_LEVEL_VAR};
use pl_bench::harness::run_case;
use pl_bench::pg::PgConnector;
use pl_bench::report::{print_report, CaseResult};
use pl_bench::schema;
use std::env;
use std::process;

fn run() -> Result<()> {
    let config = BenchConfig::from_env()?;
    let connector = PgConnector::new(config.database_url.as_str());
    let settings = &config.runner;

    let runs: Vec<CaseRun> = standard_suite(&config.sweeps)
        .iter()
        .flat_map(BenchCase::runs)
        .filter(|run| settings.selects(&run.id()))
        .collect();

    println!("Running PostgreSQL procedural language benchmark...");
    println!("  Case runs:       {}", runs.len());
    println!("  Warmup:          {}", settings.warmup);
    println!("  Samples:         {}", settings.samples);
    println!("  Iterations:      {}", settings.iterations);

    let mut results = Vec::with_capacity(runs.len());
    for run in &runs {
        let id = run.id();
        eprint!("  Benchmarking {id}...");
        let plan = run.plan();

        for _ in 0..settings.warmup {
            run_case(&connector, &plan, 1).with_context(|| format!("{id}: warmup failed"))?;
        }

        let mut result = CaseResult::new(run, settings.iterations);
        for sample in 0..settings.samples {
            let elapsed = run_case(&connector, &plan, settings.iterations)
                .with_context(|| format!("{id}: sample {sample} failed"))?;
            result.add_sample(elapsed);
        }
        eprintln!(" done ({:.1}µs mean)", result.mean_us());
        results.push(result);
    }

    print_report(&results);
    Ok(())
}

fn list() -> Result<()> {
    let sweeps = sweeps_from_env()?;
    for case in standard_suite(&sweeps) {
        for run in case.runs() {
            println!("{}", run.id());
        }
    }
    Ok(())
}

fn install() -> Result<()> {
    let config = BenchConfig::from_env()?;
    let connector = PgConnector::new(config.database_url.as_str());
    schema::install(&connector).context("failed to install routines")?;
    println!("Installed {} routines.", schema::ROUTINES.len());
    Ok(())
}

fn main() {
    if let Some(path) = load_dotenv() {
        eprintln!("  Loaded environment from {}", path.display());
    }

    let log_level = resolve_log_level(LOG_LEVEL_VAR, LevelFilter::Info);
    let log_file = resolve_log_file(LOG_FILE_VAR);
    bench_core::initialize_logger(log_level, log_file.as_deref()).unwrap_or_else(|e| {
        eprintln!("Failed to initialize logger: {e:#}. Exiting.");
        process::exit(1);
    });

    let command = env::args().nth(1).unwrap_or_else(|| "run".to_string());
    info!("pl-bench {command}");

    let outcome = match command.to_lowercase().as_str() {
        "run" => run(),
        "list" => list(),
        "install" => install(),
        other => Err(anyhow!(
            "unknown command {other:?}; expected run, list or install"
        )),
    };

    if let Err(err) = outcome {
        log::error!("{err:#}");
        process::exit(1);
    }
}
