//! Criterion harness: per-iteration latency of every case in the suite.
//!
//! Needs `DATABASE_URL` pointing at a database provisioned with
//! `pl-bench install`. Each criterion sample opens its own connection and
//! only the iteration loop is timed.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, SamplingMode};
use log::LevelFilter;
use pl_bench::cases::{find, standard_suite, BenchCase};
use pl_bench::config::BenchConfig;
use pl_bench::harness::run_case;
use pl_bench::pg::PgConnector;
use std::time::Duration;

fn setup() -> (PgConnector, Vec<BenchCase>) {
    bench_core::config::load_dotenv();
    // A second call from another group fails; the first logger stays.
    let _ = bench_core::initialize_logger(LevelFilter::Warn, None);
    let config = BenchConfig::from_env().expect("DATABASE_URL must be set to run benchmarks");
    let connector = PgConnector::new(config.database_url);
    (connector, standard_suite(&config.sweeps))
}

/// Register every run of the named cases. Heavy cases get fewer, flat
/// samples so a million-step loop does not take minutes per sample.
fn bench_cases(c: &mut Criterion, names: &[&str], heavy: bool) {
    let (connector, cases) = setup();

    for name in names {
        let case = find(&cases, name).unwrap_or_else(|| panic!("unknown case {name}"));
        let mut group = c.benchmark_group(case.name);
        if heavy {
            group.sampling_mode(SamplingMode::Flat);
            group.sample_size(10);
            group.measurement_time(Duration::from_secs(20));
        }

        for run in case.runs() {
            // Batches are assembled here, outside the timed region.
            let plan = run.plan();
            let id = run.id();
            let bench_id = match run.scale {
                Some(scale) => BenchmarkId::from_parameter(scale),
                None => BenchmarkId::from_parameter("once"),
            };
            group.bench_function(bench_id, |b| {
                b.iter_custom(|iters| {
                    run_case(&connector, &plan, iters).unwrap_or_else(|err| panic!("{id}: {err}"))
                });
            });
        }
        group.finish();
    }
}

fn bench_plain_sql(c: &mut Criterion) {
    bench_cases(c, &["select_1"], false);
    bench_cases(c, &["batch_select"], true);
}

fn bench_procedural_loops(c: &mut Criterion) {
    bench_cases(
        c,
        &[
            "plpgsql_loop_select",
            "plpgsql_empty_loop",
            "plpgsql_loop_select_increment",
            "plpgsql_loop_assign_increment",
            "plperl_loop_increment",
        ],
        true,
    );
}

fn bench_loop_calls(c: &mut Criterion) {
    bench_cases(
        c,
        &[
            "plpgsql_loop_call_plpgsql_add",
            "plpgsql_loop_call_sql_add",
            "plpgsql_loop_call_perl_add",
        ],
        true,
    );
}

fn bench_set_based_calls(c: &mut Criterion) {
    bench_cases(
        c,
        &[
            "select_call_plpgsql_add",
            "select_call_sql_add",
            "select_call_perl_add",
        ],
        true,
    );
}

criterion_group!(
    benches,
    bench_plain_sql,
    bench_procedural_loops,
    bench_loop_calls,
    bench_set_based_calls
);
criterion_main!(benches);
