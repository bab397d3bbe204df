//! PostgreSQL procedural language latency benchmark
//!
//! Measures the relative cost of plain SQL round trips, PL/pgSQL loops, and
//! scalar function calls across PL/pgSQL, SQL and PL/Perl. Each case opens
//! one connection, times a harness-chosen number of iterations, and treats
//! any error as fatal for that case.
//!
//! Provision routines: `cargo run --release -- install`
//! Run benchmarks: `cargo bench`
//! Quick report: `cargo run --release`
//! Run tests: `cargo test`

pub mod cases;
pub mod config;
pub mod error;
pub mod harness;
pub mod pg;
pub mod report;
pub mod schema;
pub mod session;

pub use error::{BenchError, Result};
